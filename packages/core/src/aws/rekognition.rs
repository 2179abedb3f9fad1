use crate::error::{DetectionError, DetectionResult};
use crate::traits::{FaceDetector, LabelDetector};
use crate::types::{BoundingBox, DetectionParams, FaceDetail, ImageSource, Label, ParentLabel};
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Attribute, Image, S3Object};

pub struct RekognitionDetector {
    client: aws_sdk_rekognition::Client,
}

impl RekognitionDetector {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_rekognition::Client::new(config),
        }
    }

    pub fn from_client(client: aws_sdk_rekognition::Client) -> Self {
        Self { client }
    }
}

fn to_image(source: ImageSource<'_>) -> Image {
    match source {
        ImageSource::Bytes(bytes) => Image::builder().bytes(Blob::new(bytes.to_vec())).build(),
        ImageSource::Object(reference) => Image::builder()
            .s3_object(
                S3Object::builder()
                    .bucket(&reference.bucket)
                    .name(&reference.key)
                    .set_version(reference.version_id.clone())
                    .build(),
            )
            .build(),
    }
}

/// Labels without a name carry no meaning for classification and are dropped
fn to_label(label: &aws_sdk_rekognition::types::Label) -> Option<Label> {
    let name = label.name()?.to_string();
    let parents = label
        .parents()
        .iter()
        .filter_map(|parent| parent.name())
        .map(ParentLabel::new)
        .collect();

    Some(Label {
        name,
        confidence: label.confidence().unwrap_or_default(),
        parents,
    })
}

fn to_face(face: &aws_sdk_rekognition::types::FaceDetail) -> FaceDetail {
    FaceDetail {
        confidence: face.confidence().unwrap_or_default(),
        bounding_box: face.bounding_box().map(|b| BoundingBox {
            width: b.width().unwrap_or_default(),
            height: b.height().unwrap_or_default(),
            left: b.left().unwrap_or_default(),
            top: b.top().unwrap_or_default(),
        }),
    }
}

#[async_trait::async_trait]
impl LabelDetector for RekognitionDetector {
    async fn detect_labels(
        &self,
        image: ImageSource<'_>,
        params: DetectionParams,
    ) -> DetectionResult<Vec<Label>> {
        let output = self
            .client
            .detect_labels()
            .image(to_image(image))
            .max_labels(params.max_labels)
            .min_confidence(params.min_confidence)
            .send()
            .await
            .map_err(|e| DetectionError::Provider(format!("AWS SDK error: {}", e)))?;

        let labels: Vec<Label> = output.labels().iter().filter_map(to_label).collect();

        tracing::debug!(count = labels.len(), "Rekognition returned labels");

        Ok(labels)
    }
}

#[async_trait::async_trait]
impl FaceDetector for RekognitionDetector {
    async fn detect_faces(&self, image: &[u8]) -> DetectionResult<Vec<FaceDetail>> {
        let output = self
            .client
            .detect_faces()
            .image(to_image(ImageSource::Bytes(image)))
            .attributes(Attribute::Default)
            .send()
            .await
            .map_err(|e| DetectionError::Provider(format!("AWS SDK error: {}", e)))?;

        Ok(output.face_details().iter().map(to_face).collect())
    }
}
