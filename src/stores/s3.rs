//! S3-backed object store for immutable manifest blobs.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::info;

use super::{ObjectStore, PutOutcome, StoreError};

/// Writes JSON blobs to an S3 bucket.
///
/// Manifest keys embed the content hash, so each key names write-once data
/// and the unconditional put is idempotent. Cache headers are disabled so
/// intermediaries never serve stale bytes for a freshly written key.
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    dry_run: bool,
}

impl S3ObjectStore {
    /// Create a store writing to `bucket`.
    pub fn new(client: Client, bucket: impl Into<String>, dry_run: bool) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            dry_run,
        }
    }

    /// The target bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_immutable(
        &self,
        key: &str,
        body: &serde_json::Value,
    ) -> Result<PutOutcome, StoreError> {
        let bytes =
            serde_json::to_vec(body).map_err(|e| StoreError::Serialization(e.to_string()))?;

        if self.dry_run {
            info!(
                bucket = %self.bucket,
                key,
                bytes = bytes.len(),
                "dry-run: would put object"
            );
            return Ok(PutOutcome::DryRun);
        }

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type("application/json")
            .cache_control("max-age=0,no-cache,no-store")
            .send()
            .await
            .map_err(|e| StoreError::ObjectWrite {
                key: key.to_string(),
                message: format!("{}", DisplayErrorContext(&e)),
            })?;

        info!(bucket = %self.bucket, key, "put object");
        Ok(PutOutcome::Written)
    }
}
