//! In-memory collaborators
//!
//! Used for local runs without AWS access and as test doubles. The object
//! store keeps objects in a map keyed by `(bucket, key)`; the detector
//! returns a fixed answer and records every call it receives.

use crate::error::{DetectionError, DetectionResult, StorageError, StorageResult};
use crate::traits::{FaceDetector, LabelDetector, ObjectCopier, ObjectUploader};
use crate::types::{DetectionParams, FaceDetail, ImageReference, ImageSource, Label};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// Object store backed by a map
#[derive(Debug, Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<HashMap<(String, String), StoredObject>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, key: &str, body: Vec<u8>) {
        self.objects.write().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: None,
            },
        );
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .read()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    /// Keys stored in `bucket`, sorted
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait::async_trait]
impl ObjectCopier for InMemoryObjectStore {
    async fn copy_object(
        &self,
        source_bucket: &str,
        source_key: &str,
        destination_bucket: &str,
        destination_key: &str,
    ) -> StorageResult<()> {
        let mut objects = self.objects.write();
        let object = objects
            .get(&(source_bucket.to_string(), source_key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::Copy {
                source_bucket: source_bucket.to_string(),
                source_key: source_key.to_string(),
                destination_bucket: destination_bucket.to_string(),
                destination_key: destination_key.to_string(),
                message: "source object not found".to_string(),
            })?;

        objects.insert(
            (destination_bucket.to_string(), destination_key.to_string()),
            object,
        );
        Ok(())
    }
}

#[async_trait::async_trait]
impl ObjectUploader for InMemoryObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        self.objects.write().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: Some(content_type.to_string()),
            },
        );
        Ok(())
    }
}

/// What a [`StaticDetector`] was asked to look at
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionCall {
    Bytes {
        len: usize,
        params: DetectionParams,
    },
    Object {
        reference: ImageReference,
        params: DetectionParams,
    },
    Faces {
        len: usize,
    },
}

/// Detector with a fixed answer
#[derive(Debug, Clone, Default)]
pub struct StaticDetector {
    labels: Vec<Label>,
    faces: Vec<FaceDetail>,
    failure: Option<String>,
    calls: Arc<RwLock<Vec<DetectionCall>>>,
}

impl StaticDetector {
    pub fn new(labels: Vec<Label>) -> Self {
        Self {
            labels,
            ..Self::default()
        }
    }

    pub fn with_faces(mut self, faces: Vec<FaceDetail>) -> Self {
        self.faces = faces;
        self
    }

    /// A detector whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<DetectionCall> {
        self.calls.read().clone()
    }

    fn answer<T: Clone>(&self, value: &[T]) -> DetectionResult<Vec<T>> {
        match &self.failure {
            Some(message) => Err(DetectionError::Provider(message.clone())),
            None => Ok(value.to_vec()),
        }
    }
}

#[async_trait::async_trait]
impl LabelDetector for StaticDetector {
    async fn detect_labels(
        &self,
        image: ImageSource<'_>,
        params: DetectionParams,
    ) -> DetectionResult<Vec<Label>> {
        let call = match image {
            ImageSource::Bytes(bytes) => DetectionCall::Bytes {
                len: bytes.len(),
                params,
            },
            ImageSource::Object(reference) => DetectionCall::Object {
                reference: reference.clone(),
                params,
            },
        };
        self.calls.write().push(call);

        let mut labels = self.answer(&self.labels)?;
        labels.retain(|label| label.confidence >= params.min_confidence);
        labels.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        labels.truncate(params.max_labels.max(0) as usize);
        Ok(labels)
    }
}

#[async_trait::async_trait]
impl FaceDetector for StaticDetector {
    async fn detect_faces(&self, image: &[u8]) -> DetectionResult<Vec<FaceDetail>> {
        self.calls
            .write()
            .push(DetectionCall::Faces { len: image.len() });
        self.answer(&self.faces)
    }
}
