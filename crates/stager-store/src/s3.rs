//! S3 object store

use crate::{validate_key, ObjectInfo, ObjectMetadata, ObjectStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Objects live in `bucket` under `prefix` (empty, or ending with `/`).
///
/// Creating an S3 client is relatively expensive, so one store is opened
/// per process and shared across requests.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

impl S3Store {
    /// Create a store with a client built from the default AWS config chain
    pub async fn connect(bucket: String, prefix: String) -> Result<Self> {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let client = aws_sdk_s3::Client::new(&sdk_config);
        Ok(Self::with_client(client, bucket, prefix))
    }

    pub fn with_client(client: aws_sdk_s3::Client, bucket: String, prefix: String) -> Self {
        Self {
            client,
            bucket,
            prefix,
        }
    }

    fn full_key(&self, key: &str) -> String {
        full_key(&self.prefix, key)
    }

    fn store_key(&self, full_key: &str) -> Option<String> {
        store_key(&self.prefix, full_key)
    }
}

fn full_key(prefix: &str, key: &str) -> String {
    format!("{prefix}{key}")
}

/// Inverse of `full_key`; `None` for keys outside the prefix
fn store_key(prefix: &str, full_key: &str) -> Option<String> {
    full_key.strip_prefix(prefix).map(str::to_string)
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, key: &str, bytes: Vec<u8>, metadata: ObjectMetadata) -> Result<()> {
        validate_key(key)?;
        let full_key = self.full_key(key);
        let size = bytes.len();
        let user_metadata: HashMap<String, String> = metadata.custom.into_iter().collect();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&full_key)
            .content_type(metadata.content_type)
            .set_metadata(Some(user_metadata))
            .body(ByteStream::from(bytes))
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to upload object to S3: s3://{}/{full_key}",
                    self.bucket
                )
            })?;

        tracing::debug!("Uploaded {} bytes to s3://{}/{}", size, self.bucket, full_key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>> {
        let full_prefix = self.full_key(prefix);
        let mut results = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&full_prefix);

            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request.send().await.with_context(|| {
                format!(
                    "Failed to list S3 prefix: s3://{}/{full_prefix}",
                    self.bucket
                )
            })?;

            for object in response.contents.unwrap_or_default() {
                let Some(key) = object.key.as_deref().and_then(|k| self.store_key(k)) else {
                    continue;
                };
                // Skip "directory" markers (keys ending with /)
                if key.is_empty() || key.ends_with('/') {
                    continue;
                }
                let uploaded_at = object
                    .last_modified
                    .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()))
                    .unwrap_or_else(Utc::now);
                results.push(ObjectInfo {
                    key,
                    size: object.size.unwrap_or(0).max(0) as u64,
                    uploaded_at,
                });
            }

            // Handle pagination
            if response.is_truncated == Some(true) {
                continuation_token = response.next_continuation_token;
            } else {
                break;
            }
        }

        results.sort_by(|a, b| a.key.cmp(&b.key));

        tracing::debug!(
            "Listed {} objects in S3 prefix: s3://{}/{}",
            results.len(),
            self.bucket,
            full_prefix
        );

        Ok(results)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let full_key = self.full_key(key);
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&full_key)
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to delete object from S3: s3://{}/{full_key}",
                    self.bucket
                )
            })?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.prefix)
    }
}
