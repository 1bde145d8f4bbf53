//! Object storage for staged datasets (local filesystem, S3, in-memory)
//!
//! Staged tables are written as flat objects addressed by `/`-separated keys
//! such as `imdb/1mb/titles.jsonl`. Every backend implements [`ObjectStore`],
//! and [`StoreLocation`] turns a user-supplied URI into a backend.
//!
//! # Location Types
//!
//! - **Local**: a root directory; keys become relative file paths
//! - **S3**: `s3://bucket` or `s3://bucket/prefix`; keys are appended to the prefix
//! - **Memory**: `memory://`; process-local, used by tests
//!
//! # Example
//!
//! ```ignore
//! use stager_store::{ObjectMetadata, StoreLocation};
//!
//! let store = StoreLocation::parse("s3://datasets/staging")?.open().await?;
//! store.put("imdb/1mb/titles.jsonl", bytes, ObjectMetadata::ndjson(now)).await?;
//! for object in store.list("imdb/1mb/").await? {
//!     println!("{} {}", object.key, object.size);
//! }
//! ```

mod local;
mod memory;
mod s3;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

pub use local::LocalStore;
pub use memory::{MemoryStore, StoredObject};
pub use s3::S3Store;

/// Content type of staged tables
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// User metadata key carrying the generation timestamp
pub const GENERATED_AT_KEY: &str = "generated-at";

/// Metadata stored alongside an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub content_type: String,
    #[serde(default)]
    pub custom: BTreeMap<String, String>,
}

impl ObjectMetadata {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            custom: BTreeMap::new(),
        }
    }

    /// Metadata for a JSON Lines table generated at `generated_at`
    pub fn ndjson(generated_at: DateTime<Utc>) -> Self {
        Self::new(NDJSON_CONTENT_TYPE).with(GENERATED_AT_KEY, generated_at.to_rfc3339())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }
}

/// One entry of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Flat key/value object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object
    async fn put(&self, key: &str, bytes: Vec<u8>, metadata: ObjectMetadata) -> Result<()>;

    /// All objects whose key starts with `prefix`, sorted by key
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>>;

    /// Remove `key`; removing a missing object is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Human-readable location for logging
    fn describe(&self) -> String;
}

/// Where staged objects live
#[derive(Debug, Clone, PartialEq)]
pub enum StoreLocation {
    /// Root directory on the local filesystem
    Local(PathBuf),
    /// S3 bucket with an optional key prefix
    S3 { bucket: String, prefix: String },
    /// Process-local memory
    Memory,
}

impl StoreLocation {
    /// Parse a location URI, auto-detecting the backend
    ///
    /// - `s3://bucket[/prefix]` -> S3
    /// - `memory://` -> Memory
    /// - Everything else -> Local
    pub fn parse(uri: &str) -> Result<Self> {
        if uri.starts_with("s3://") {
            let (bucket, prefix) = parse_s3_uri(uri)?;
            Ok(StoreLocation::S3 { bucket, prefix })
        } else if uri == "memory://" || uri == "memory" {
            Ok(StoreLocation::Memory)
        } else if uri.trim().is_empty() {
            anyhow::bail!("Store location must not be empty")
        } else {
            Ok(StoreLocation::Local(PathBuf::from(uri)))
        }
    }

    /// Build the backend for this location
    pub async fn open(&self) -> Result<Arc<dyn ObjectStore>> {
        let store: Arc<dyn ObjectStore> = match self {
            StoreLocation::Local(root) => Arc::new(LocalStore::new(root.clone())),
            StoreLocation::S3 { bucket, prefix } => {
                Arc::new(S3Store::connect(bucket.clone(), prefix.clone()).await?)
            }
            StoreLocation::Memory => Arc::new(MemoryStore::new()),
        };
        tracing::debug!("Opened object store: {}", store.describe());
        Ok(store)
    }

    /// Get a display name for logging
    pub fn display_name(&self) -> String {
        match self {
            StoreLocation::Local(path) => path.display().to_string(),
            StoreLocation::S3 { bucket, prefix } if prefix.is_empty() => format!("s3://{bucket}"),
            StoreLocation::S3 { bucket, prefix } => format!("s3://{bucket}/{prefix}"),
            StoreLocation::Memory => "memory://".to_string(),
        }
    }
}

/// Parse S3 URI in the format: s3://bucket[/prefix]
///
/// A non-empty prefix is normalised to end with `/`.
pub fn parse_s3_uri(uri: &str) -> Result<(String, String)> {
    let rest = uri
        .strip_prefix("s3://")
        .context("S3 URI must start with 's3://'")?;

    let (bucket, prefix) = match rest.split_once('/') {
        Some((bucket, prefix)) => (bucket, prefix.trim_matches('/')),
        None => (rest, ""),
    };
    if bucket.is_empty() {
        anyhow::bail!("S3 URI must be in format 's3://bucket[/prefix]'");
    }

    let prefix = if prefix.is_empty() {
        String::new()
    } else {
        format!("{prefix}/")
    };
    Ok((bucket.to_string(), prefix))
}

/// Reject keys that could escape a store root
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key.starts_with('/') || key.ends_with('/') {
        anyhow::bail!("Invalid object key '{key}'");
    }
    if key
        .split('/')
        .any(|part| part.is_empty() || part == "." || part == "..")
    {
        anyhow::bail!("Invalid object key '{key}'");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local() {
        let location = StoreLocation::parse("./staged").unwrap();
        assert_eq!(location, StoreLocation::Local(PathBuf::from("./staged")));
    }

    #[test]
    fn test_parse_memory() {
        assert_eq!(
            StoreLocation::parse("memory://").unwrap(),
            StoreLocation::Memory
        );
    }

    #[test]
    fn test_parse_empty_rejected() {
        assert!(StoreLocation::parse("  ").is_err());
    }

    #[test]
    fn test_parse_s3_bucket_only() {
        let location = StoreLocation::parse("s3://datasets").unwrap();
        assert_eq!(
            location,
            StoreLocation::S3 {
                bucket: "datasets".to_string(),
                prefix: String::new(),
            }
        );
        assert_eq!(location.display_name(), "s3://datasets");
    }

    #[test]
    fn test_parse_s3_with_prefix() {
        let (bucket, prefix) = parse_s3_uri("s3://datasets/staging/v1/").unwrap();
        assert_eq!(bucket, "datasets");
        assert_eq!(prefix, "staging/v1/");

        let (_, prefix) = parse_s3_uri("s3://datasets/staging").unwrap();
        assert_eq!(prefix, "staging/");
    }

    #[test]
    fn test_parse_s3_uri_invalid() {
        assert!(parse_s3_uri("datasets/staging").is_err());
        assert!(parse_s3_uri("s3:///staging").is_err());
    }

    #[test]
    fn test_ndjson_metadata() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let metadata = ObjectMetadata::ndjson(at);
        assert_eq!(metadata.content_type, NDJSON_CONTENT_TYPE);
        assert_eq!(
            metadata.custom.get(GENERATED_AT_KEY).map(String::as_str),
            Some("2024-05-01T12:00:00+00:00")
        );
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("imdb/1mb/titles.jsonl").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("imdb/../../etc").is_err());
        assert!(validate_key("imdb//titles.jsonl").is_err());
        assert!(validate_key("imdb/1mb/").is_err());
    }
}
