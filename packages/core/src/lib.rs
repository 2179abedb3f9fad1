//! Whisker Core - cat image classification and relocation
//!
//! Turns the labels returned by an external label detector into an
//! accept/reject verdict plus a breed list, and copies accepted images from
//! the staging prefix to the destination prefix.
//!
//! ## Pipeline
//!
//! ```text
//! ImageReference -> extension check -> detect labels -> classify -> copy (if accepted)
//! ```
//!
//! The label detector and the object store are collaborators injected as
//! trait objects ([`LabelDetector`], [`ObjectCopier`], ...). Enable the `aws`
//! feature for the Rekognition and S3 implementations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use whisker_core::{CatImageRelocator, ClassifierConfig, RelocationConfig};
//!
//! let relocator = CatImageRelocator::new(
//!     detector,
//!     copier,
//!     ClassifierConfig::from_env(),
//!     RelocationConfig::from_env()?,
//! );
//! let outcome = relocator.relocate(&reference).await?;
//! ```

mod classification;
mod config;
mod error;
mod extension;
mod judge;
mod recognition;
mod relocation;
mod traits;
mod types;

#[cfg(feature = "aws")]
pub mod aws;
pub mod memory;

pub use classification::{CAT_LABEL, classify};
pub use config::{
    ClassifierConfig, DEFAULT_ACCEPTANCE_THRESHOLD, DEFAULT_MAX_LABELS, DEFAULT_MIN_CONFIDENCE,
    DESTINATION_PREFIX, RelocationConfig, STAGING_PREFIX,
};
pub use error::{
    ConfigError, DetectionError, DetectionResult, RecognitionError, RecognitionResult,
    RelocationError, RelocationResult, StorageError, StorageResult,
};
pub use extension::{ALLOWED_EXTENSIONS, ImageExtension, extract_allowed_extension};
pub use judge::{CatImageJudge, Judgement};
pub use recognition::{RecognitionService, RecognizedImage};
pub use relocation::{CatImageRelocator, RelocationOutcome, destination_key};
pub use traits::{
    FaceDetector, IdGenerator, LabelDetector, ObjectCopier, ObjectUploader, UuidGenerator,
};
pub use types::{
    BoundingBox, ClassificationResult, DetectionParams, FaceDetail, ImageReference, ImageSource,
    Label, ParentLabel,
};
