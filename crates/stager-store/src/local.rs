//! Local filesystem object store

use crate::{validate_key, ObjectInfo, ObjectMetadata, ObjectStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory under the root holding one JSON metadata sidecar per object
const METADATA_DIR: &str = ".metadata";

const PARTIAL_SUFFIX: &str = ".partial";

/// Objects are files under `root`; keys map to relative paths.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn metadata_path(&self, key: &str) -> PathBuf {
        self.root.join(METADATA_DIR).join(format!("{key}.json"))
    }

    /// Read the metadata sidecar written by `put`, if any
    pub async fn metadata(&self, key: &str) -> Result<Option<ObjectMetadata>> {
        validate_key(key)?;
        let path = self.metadata_path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let metadata = serde_json::from_slice(&bytes).with_context(|| {
                    format!("Failed to parse metadata sidecar: {}", path.display())
                })?;
                Ok(Some(metadata))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read metadata sidecar: {}", path.display())),
        }
    }

    /// Remove now-empty directories between `path` and `stop`
    async fn prune_empty_dirs(path: &Path, stop: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir == stop || !dir.starts_with(stop) {
                break;
            }
            // remove_dir fails on non-empty directories, which ends the walk
            if tokio::fs::remove_dir(dir).await.is_err() {
                break;
            }
            current = dir.parent();
        }
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let mut partial = path.as_os_str().to_owned();
    partial.push(PARTIAL_SUFFIX);
    let partial = PathBuf::from(partial);

    tokio::fs::write(&partial, bytes)
        .await
        .with_context(|| format!("Failed to write file: {}", partial.display()))?;
    tokio::fs::rename(&partial, path)
        .await
        .with_context(|| format!("Failed to move file into place: {}", path.display()))?;
    Ok(())
}

async fn remove_if_exists(path: &Path) -> Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove file: {}", path.display())),
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, metadata: ObjectMetadata) -> Result<()> {
        validate_key(key)?;
        let path = self.object_path(key);
        let size = bytes.len();

        write_atomic(&path, &bytes).await?;
        let sidecar = serde_json::to_vec_pretty(&metadata)?;
        write_atomic(&self.metadata_path(key), &sidecar).await?;

        tracing::debug!("Wrote {} bytes to {}", size, path.display());
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>> {
        // Start from the deepest directory fully named by the prefix
        let start = match prefix.rfind('/') {
            Some(pos) => self.root.join(&prefix[..pos]),
            None => self.root.clone(),
        };

        let mut results = Vec::new();
        let mut pending = vec![start];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to read directory: {}", dir.display()))
                }
            };

            while let Some(entry) = entries
                .next_entry()
                .await
                .with_context(|| format!("Failed to read directory entry in: {}", dir.display()))?
            {
                let entry_path = entry.path();
                let metadata = entry.metadata().await.with_context(|| {
                    format!("Failed to get metadata for: {}", entry_path.display())
                })?;

                let Ok(relative) = entry_path.strip_prefix(&self.root) else {
                    continue;
                };
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");

                if metadata.is_dir() {
                    if key != METADATA_DIR {
                        pending.push(entry_path);
                    }
                    continue;
                }
                if !metadata.is_file() || key.ends_with(PARTIAL_SUFFIX) || !key.starts_with(prefix)
                {
                    continue;
                }

                let uploaded_at = metadata
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now());
                results.push(ObjectInfo {
                    key,
                    size: metadata.len(),
                    uploaded_at,
                });
            }
        }

        // Sort for consistent ordering
        results.sort_by(|a, b| a.key.cmp(&b.key));

        tracing::debug!(
            "Listed {} objects under '{}' in {}",
            results.len(),
            prefix,
            self.root.display()
        );

        Ok(results)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.object_path(key);
        let removed = remove_if_exists(&path).await?;
        let sidecar = self.metadata_path(key);
        remove_if_exists(&sidecar).await?;

        Self::prune_empty_dirs(&path, &self.root).await;
        Self::prune_empty_dirs(&sidecar, &self.root.join(METADATA_DIR)).await;

        if removed {
            tracing::debug!("Removed {}", path.display());
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("local directory {}", self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NDJSON_CONTENT_TYPE;
    use tempfile::TempDir;

    fn metadata() -> ObjectMetadata {
        ObjectMetadata::new(NDJSON_CONTENT_TYPE).with("generated-at", "2024-01-01T00:00:00+00:00")
    }

    #[tokio::test]
    async fn test_put_list_delete_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());

        store
            .put("imdb/1mb/titles.jsonl", b"{\"a\":1}\n".to_vec(), metadata())
            .await
            .unwrap();
        store
            .put("imdb/1mb/people.jsonl", b"{}\n{}\n".to_vec(), metadata())
            .await
            .unwrap();
        store
            .put("imdb/10mb/titles.jsonl", b"{}\n".to_vec(), metadata())
            .await
            .unwrap();

        let listed = store.list("imdb/1mb/").await.unwrap();
        let keys: Vec<&str> = listed.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["imdb/1mb/people.jsonl", "imdb/1mb/titles.jsonl"]);
        assert_eq!(listed[0].size, 6);

        let contents = std::fs::read(temp_dir.path().join("imdb/1mb/titles.jsonl")).unwrap();
        assert_eq!(contents, b"{\"a\":1}\n");
        assert_eq!(
            store.metadata("imdb/1mb/titles.jsonl").await.unwrap(),
            Some(metadata())
        );

        store.delete("imdb/1mb/titles.jsonl").await.unwrap();
        store.delete("imdb/1mb/people.jsonl").await.unwrap();
        assert!(store.list("imdb/1mb/").await.unwrap().is_empty());
        assert_eq!(store.list("imdb/").await.unwrap().len(), 1);
        assert!(!temp_dir.path().join("imdb/1mb").exists());
        assert!(store
            .metadata("imdb/1mb/titles.jsonl")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_missing_prefix_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path().join("never-created"));
        assert!(store.list("clickbench/1mb/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_error_names_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("not-a-dir");
        std::fs::write(&root, b"plain file").unwrap();
        let store = LocalStore::new(root.clone());

        let err = store.list("").await.unwrap_err();
        assert!(
            format!("{err:#}").contains(&root.display().to_string()),
            "{err:#}"
        );
    }

    #[tokio::test]
    async fn test_list_skips_metadata_sidecars() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());
        store
            .put("hits.jsonl", b"{}\n".to_vec(), metadata())
            .await
            .unwrap();

        let keys: Vec<String> = store
            .list("")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        assert_eq!(keys, vec!["hits.jsonl".to_string()]);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());
        store
            .put("a/b.jsonl", b"old".to_vec(), metadata())
            .await
            .unwrap();
        store
            .put("a/b.jsonl", b"newer".to_vec(), metadata())
            .await
            .unwrap();
        let listed = store.list("a/").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].size, 5);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());
        store.delete("imdb/1mb/titles.jsonl").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());
        assert!(store
            .put("../outside.jsonl", Vec::new(), metadata())
            .await
            .is_err());
    }
}
