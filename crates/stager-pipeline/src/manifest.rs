//! Staging results.

use crate::error::StageError;
use serde::{Deserialize, Serialize};
use stager_core::SizeTier;
use stager_store::ObjectInfo;
use std::time::Duration;

/// One persisted table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableArtifact {
    pub table: String,
    pub key: String,
    pub bytes: u64,
    /// Unknown for cached runs, which only see the listing
    pub records: Option<u64>,
}

/// What a staging run produced (or found already staged).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagingManifest {
    pub dataset: String,
    pub size: SizeTier,
    pub cached: bool,
    pub duration_ms: u64,
    pub tables: Vec<TableArtifact>,
}

impl StagingManifest {
    /// Manifest for objects that were already present under the prefix.
    pub fn from_listing(
        dataset: &str,
        size: SizeTier,
        objects: &[ObjectInfo],
        elapsed: Duration,
    ) -> Self {
        let tables = objects
            .iter()
            .map(|object| {
                let file = object.key.rsplit('/').next().unwrap_or(&object.key);
                TableArtifact {
                    table: file.strip_suffix(".jsonl").unwrap_or(file).to_string(),
                    key: object.key.clone(),
                    bytes: object.size,
                    records: None,
                }
            })
            .collect();

        Self {
            dataset: dataset.to_string(),
            size,
            cached: true,
            duration_ms: elapsed.as_millis() as u64,
            tables,
        }
    }

    pub fn total_bytes(&self) -> u64 {
        self.tables.iter().map(|t| t.bytes).sum()
    }

    pub fn to_json(&self) -> Result<String, StageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_from_listing() {
        let objects = vec![
            ObjectInfo {
                key: "imdb/1mb/people.jsonl".to_string(),
                size: 10,
                uploaded_at: Utc::now(),
            },
            ObjectInfo {
                key: "imdb/1mb/titles.jsonl".to_string(),
                size: 32,
                uploaded_at: Utc::now(),
            },
        ];
        let manifest =
            StagingManifest::from_listing("imdb", SizeTier::Mb1, &objects, Duration::from_millis(3));

        assert!(manifest.cached);
        assert_eq!(manifest.duration_ms, 3);
        assert_eq!(manifest.tables[1].table, "titles");
        assert_eq!(manifest.tables[1].records, None);
        assert_eq!(manifest.total_bytes(), 42);
    }

    #[test]
    fn test_json_uses_size_token() {
        let manifest = StagingManifest {
            dataset: "clickbench".to_string(),
            size: SizeTier::Mb10,
            cached: false,
            duration_ms: 0,
            tables: Vec::new(),
        };
        let json: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();
        assert_eq!(json["size"], "10mb");
    }
}
