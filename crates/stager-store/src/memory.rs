//! In-memory object store

use crate::{validate_key, ObjectInfo, ObjectMetadata, ObjectStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub metadata: ObjectMetadata,
    pub uploaded_at: DateTime<Utc>,
}

/// Process-local store. Counts successful puts so callers can assert that a
/// cached staging run wrote nothing.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<String, StoredObject>>,
    puts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, metadata: ObjectMetadata) -> Result<()> {
        validate_key(key)?;
        let object = StoredObject {
            bytes,
            metadata,
            uploaded_at: Utc::now(),
        };
        self.objects.write().await.insert(key.to_string(), object);
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>> {
        let objects = self.objects.read().await;
        Ok(objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| ObjectInfo {
                key: key.clone(),
                size: object.bytes.len() as u64,
                uploaded_at: object.uploaded_at,
            })
            .collect())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.objects.write().await.remove(key);
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory store".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_list() {
        let store = MemoryStore::new();
        let metadata = ObjectMetadata::new("text/plain");
        store
            .put("a/1.jsonl", b"one".to_vec(), metadata.clone())
            .await
            .unwrap();
        store
            .put("a/2.jsonl", b"two!".to_vec(), metadata.clone())
            .await
            .unwrap();
        store
            .put("ab/3.jsonl", b"x".to_vec(), metadata.clone())
            .await
            .unwrap();

        let listed = store.list("a/").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].key, "a/2.jsonl");
        assert_eq!(listed[1].size, 4);
        assert_eq!(store.get("a/1.jsonl").await.unwrap().bytes, b"one");
        assert_eq!(store.put_count(), 3);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        store
            .put("k.jsonl", Vec::new(), ObjectMetadata::new("text/plain"))
            .await
            .unwrap();
        store.delete("k.jsonl").await.unwrap();
        store.delete("k.jsonl").await.unwrap();
        assert!(store.keys().await.is_empty());
        assert_eq!(store.put_count(), 1);
    }
}
