//! Label-based classification engine

use crate::types::{ClassificationResult, Label};

/// Label name that marks an image as a cat, and the parent name that marks a breed
pub const CAT_LABEL: &str = "Cat";

/// Decide whether `labels` describe a cat and collect breed names.
///
/// An image is accepted when any label named [`CAT_LABEL`] has a confidence
/// strictly greater than `confidence_threshold`. Every label with a
/// [`CAT_LABEL`] parent contributes its own name to the breed list, once per
/// matching parent. The top-level "Cat" label has no "Cat" parent and never
/// shows up as a breed.
pub fn classify(labels: &[Label], confidence_threshold: f32) -> ClassificationResult {
    let mut result = ClassificationResult::default();

    for label in labels {
        if label.name == CAT_LABEL && label.confidence > confidence_threshold {
            result.is_accepted = true;
        }

        for parent in &label.parents {
            if parent.name == CAT_LABEL {
                result.breeds.push(label.name.clone());
            }
        }
    }

    result
}
