//! Upload-and-recognize flow behind the synchronous API

use crate::config::{ClassifierConfig, STAGING_PREFIX};
use crate::error::{RecognitionError, RecognitionResult};
use crate::extension::ImageExtension;
use crate::traits::{FaceDetector, IdGenerator, LabelDetector, ObjectUploader};
use crate::types::{FaceDetail, ImageSource, Label};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A staged upload together with its labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizedImage {
    pub object_key: String,
    pub labels: Vec<Label>,
}

pub struct RecognitionService {
    detector: Arc<dyn LabelDetector>,
    faces: Arc<dyn FaceDetector>,
    uploader: Arc<dyn ObjectUploader>,
    ids: Arc<dyn IdGenerator>,
    config: ClassifierConfig,
    staging_bucket: String,
}

impl RecognitionService {
    pub fn new(
        detector: Arc<dyn LabelDetector>,
        faces: Arc<dyn FaceDetector>,
        uploader: Arc<dyn ObjectUploader>,
        ids: Arc<dyn IdGenerator>,
        config: ClassifierConfig,
        staging_bucket: impl Into<String>,
    ) -> Self {
        Self {
            detector,
            faces,
            uploader,
            ids,
            config,
            staging_bucket: staging_bucket.into(),
        }
    }

    /// Stage a base64 image under `tmp/` and return the labels detected in it.
    ///
    /// The staged object later triggers the relocation pipeline.
    #[tracing::instrument(skip(self, image_base64))]
    pub async fn recognize(
        &self,
        image_base64: &str,
        extension: &str,
    ) -> RecognitionResult<RecognizedImage> {
        let extension = ImageExtension::parse(extension)
            .ok_or_else(|| RecognitionError::UnsupportedExtension(extension.to_string()))?;
        let image = STANDARD.decode(image_base64)?;

        let object_key = format!("{}{}{}", STAGING_PREFIX, self.ids.generate(), extension);

        self.uploader
            .upload(
                &self.staging_bucket,
                &object_key,
                image.clone(),
                extension.content_type(),
            )
            .await
            .map_err(RecognitionError::Upload)?;

        tracing::info!(bucket = %self.staging_bucket, key = %object_key, "Staged image");

        let labels = self
            .detector
            .detect_labels(ImageSource::Bytes(&image), self.config.detection_params())
            .await?;

        Ok(RecognizedImage { object_key, labels })
    }

    #[tracing::instrument(skip_all)]
    pub async fn detect_faces(&self, image_base64: &str) -> RecognitionResult<Vec<FaceDetail>> {
        let image = STANDARD.decode(image_base64)?;
        let faces = self.faces.detect_faces(&image).await?;
        tracing::info!(faces = faces.len(), "Detected faces");
        Ok(faces)
    }
}
