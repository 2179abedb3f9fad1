//! AWS implementations of the collaborator traits
//!
//! - [`RekognitionDetector`]: Amazon Rekognition `DetectLabels` / `DetectFaces`
//! - [`S3ObjectStorage`]: Amazon S3 `CopyObject` / `PutObject`

mod rekognition;
mod s3;

pub use rekognition::RekognitionDetector;
pub use s3::{S3ObjectStorage, copy_source};

/// Load the shared SDK configuration, honouring `REGION` when it is set
pub async fn load_aws_config() -> aws_config::SdkConfig {
    let loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    match std::env::var("REGION").ok().filter(|r| !r.is_empty()) {
        Some(region) => loader.region(aws_config::Region::new(region)).load().await,
        None => loader.load().await,
    }
}
