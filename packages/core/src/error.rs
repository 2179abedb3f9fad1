//! Error types for detection, storage and the pipelines built on them

/// Result type for label and face detection
pub type DetectionResult<T> = Result<T, DetectionError>;

/// Result type for object storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for [`crate::CatImageRelocator`]
pub type RelocationResult<T> = Result<T, RelocationError>;

/// Result type for [`crate::RecognitionService`]
pub type RecognitionResult<T> = Result<T, RecognitionError>;

/// The detection service could not produce labels
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("Detector request failed: {0}")]
    Provider(String),
}

/// The object store rejected a copy or upload
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to copy {source_bucket}/{source_key} to {destination_bucket}/{destination_key}: {message}")]
    Copy {
        source_bucket: String,
        source_key: String,
        destination_bucket: String,
        destination_key: String,
        message: String,
    },

    #[error("Failed to upload {bucket}/{key}: {message}")]
    Upload {
        bucket: String,
        key: String,
        message: String,
    },
}

/// Terminal failure states of the relocation pipeline
#[derive(Debug, thiserror::Error)]
pub enum RelocationError {
    #[error("Label detection failed for {bucket}/{key}: {source}")]
    DetectionFailed {
        bucket: String,
        key: String,
        #[source]
        source: DetectionError,
    },

    #[error("Copy to destination failed: {0}")]
    CopyFailed(#[source] StorageError),
}

/// Failures of the upload-and-recognize flow
#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("Failed to decode base64 image: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    #[error("Image extension not allowed: {0:?}")]
    UnsupportedExtension(String),

    #[error("Failed to stage image: {0}")]
    Upload(#[source] StorageError),

    #[error("Recognition failed: {0}")]
    Detection(#[from] DetectionError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
}
