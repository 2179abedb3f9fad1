//! Data model shared by the classification pipeline

use serde::{Deserialize, Serialize};

/// A broader concept a label is nested under (e.g. "Cat" for "Abyssinian")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentLabel {
    pub name: String,
}

impl ParentLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A concept detected in an image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Detector confidence in the range 0..=100
    pub confidence: f32,
    #[serde(default)]
    pub parents: Vec<ParentLabel>,
}

impl Label {
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
            parents: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(ParentLabel::new(parent));
        self
    }
}

/// Verdict of the classification engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "isAcceptableCatImage")]
    pub is_accepted: bool,
    /// Breed names in label order; duplicates are kept
    #[serde(rename = "typesOfCats")]
    pub breeds: Vec<String>,
}

/// Identifies a stored object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    pub bucket: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

impl ImageReference {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            version_id: None,
        }
    }

    pub fn with_version(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }
}

/// What the label detector should look at
#[derive(Debug, Clone, Copy)]
pub enum ImageSource<'a> {
    /// Raw image bytes
    Bytes(&'a [u8]),
    /// An object the detector reads from storage itself
    Object(&'a ImageReference),
}

/// Fixed parameters passed with every detection call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    /// Upper bound on returned labels (detector sorts by descending confidence)
    pub max_labels: i32,
    /// Labels below this confidence are never returned
    pub min_confidence: f32,
}

/// Position of a face relative to the image, as ratios of width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub width: f32,
    pub height: f32,
    pub left: f32,
    pub top: f32,
}

/// A face found by the face detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceDetail {
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}
