use crate::classification::classify;
use crate::config::ClassifierConfig;
use crate::error::DetectionResult;
use crate::extension::extract_allowed_extension;
use crate::traits::LabelDetector;
use crate::types::{ClassificationResult, ImageReference, ImageSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Verdict for a stored image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Judgement {
    /// Key has no allowed extension; the detector was not called
    RejectedExtension,
    Classified(ClassificationResult),
}

impl Judgement {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Judgement::Classified(result) if result.is_accepted)
    }
}

/// Validates, detects and classifies a stored image without moving it
pub struct CatImageJudge {
    detector: Arc<dyn LabelDetector>,
    config: ClassifierConfig,
}

impl CatImageJudge {
    pub fn new(detector: Arc<dyn LabelDetector>, config: ClassifierConfig) -> Self {
        Self { detector, config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    #[tracing::instrument(skip(self), fields(bucket = %reference.bucket, key = %reference.key))]
    pub async fn judge(&self, reference: &ImageReference) -> DetectionResult<Judgement> {
        let Some(extension) = extract_allowed_extension(&reference.key) else {
            tracing::warn!("Object extension not allowed, skipping");
            return Ok(Judgement::RejectedExtension);
        };

        let labels = self
            .detector
            .detect_labels(
                ImageSource::Object(reference),
                self.config.detection_params(),
            )
            .await?;

        let result = classify(&labels, self.config.acceptance_threshold);

        tracing::info!(
            extension = %extension,
            labels = labels.len(),
            accepted = result.is_accepted,
            breeds = ?result.breeds,
            "Classified image"
        );

        Ok(Judgement::Classified(result))
    }
}
