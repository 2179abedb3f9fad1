use crate::error::{StorageError, StorageResult};
use crate::traits::{ObjectCopier, ObjectUploader};
use aws_sdk_s3::primitives::ByteStream;

pub struct S3ObjectStorage {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStorage {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(config),
        }
    }

    pub fn from_client(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

/// `CopySource` header value: `{bucket}/{key}` with each key segment URL-encoded
pub fn copy_source(bucket: &str, key: &str) -> String {
    let encoded: Vec<String> = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("{}/{}", bucket, encoded.join("/"))
}

#[async_trait::async_trait]
impl ObjectCopier for S3ObjectStorage {
    async fn copy_object(
        &self,
        source_bucket: &str,
        source_key: &str,
        destination_bucket: &str,
        destination_key: &str,
    ) -> StorageResult<()> {
        self.client
            .copy_object()
            .copy_source(copy_source(source_bucket, source_key))
            .bucket(destination_bucket)
            .key(destination_key)
            .send()
            .await
            .map_err(|e| StorageError::Copy {
                source_bucket: source_bucket.to_string(),
                source_key: source_key.to_string(),
                destination_bucket: destination_bucket.to_string(),
                destination_key: destination_key.to_string(),
                message: format!("AWS SDK error: {}", e),
            })?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl ObjectUploader for S3ObjectStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: format!("AWS SDK error: {}", e),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_source_keeps_separators() {
        assert_eq!(copy_source("bucket", "tmp/a.jpg"), "bucket/tmp/a.jpg");
    }

    #[test]
    fn copy_source_encodes_key_segments() {
        assert_eq!(
            copy_source("bucket", "tmp/my cat+1.jpg"),
            "bucket/tmp/my%20cat%2B1.jpg"
        );
    }
}
