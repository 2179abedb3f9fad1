//! Collaborator contracts consumed by the pipelines

use crate::error::{DetectionResult, StorageResult};
use crate::types::{DetectionParams, FaceDetail, ImageSource, Label};

/// Label detection service
///
/// Implementations return labels sorted by descending confidence, never more
/// than `params.max_labels` and never below `params.min_confidence`.
#[async_trait::async_trait]
pub trait LabelDetector: Send + Sync {
    async fn detect_labels(
        &self,
        image: ImageSource<'_>,
        params: DetectionParams,
    ) -> DetectionResult<Vec<Label>>;
}

/// Face detection service
#[async_trait::async_trait]
pub trait FaceDetector: Send + Sync {
    async fn detect_faces(&self, image: &[u8]) -> DetectionResult<Vec<FaceDetail>>;
}

/// Server-side copy within one storage system
#[async_trait::async_trait]
pub trait ObjectCopier: Send + Sync {
    async fn copy_object(
        &self,
        source_bucket: &str,
        source_key: &str,
        destination_bucket: &str,
        destination_key: &str,
    ) -> StorageResult<()>;
}

/// Single-shot object upload
#[async_trait::async_trait]
pub trait ObjectUploader: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()>;
}

/// Source of unique object names
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random UUID v4 names
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        whisker_types::create_id()
    }
}
