//! The staging pipeline.
//!
//! A run moves through `Checking -> Generating -> Serializing -> Persisting
//! -> Done`, or ends in `Failed` from any state. Tables are generated in
//! dependency waves: every table of a wave runs on its own blocking worker,
//! and a wave starts only once the identifier pools of the previous waves
//! are complete. Each wave is persisted before the next one is generated,
//! so a multi-wave run repeats `Generating -> Serializing -> Persisting`
//! once per wave and only one wave's output is held in memory.

use crate::error::StageError;
use crate::manifest::{StagingManifest, TableArtifact};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use stager_core::{Catalog, ResolvedDataset, ResolvedTable};
use stager_generator::{generate_table, GeneratedTable, SharedPools};
use stager_store::{ObjectInfo, ObjectMetadata, ObjectStore};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

/// Phase of a staging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    Checking,
    Generating,
    Serializing,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageState::Checking => "checking",
            StageState::Generating => "generating",
            StageState::Serializing => "serializing",
            StageState::Persisting => "persisting",
            StageState::Done => "done",
            StageState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks and logs the state of one run.
struct Run {
    label: String,
    state: StageState,
    started: Instant,
}

impl Run {
    fn start(resolved: &ResolvedDataset) -> Self {
        let run = Run {
            label: format!("{}/{}", resolved.dataset, resolved.size),
            state: StageState::Checking,
            started: Instant::now(),
        };
        info!("Staging {}: {}", run.label, run.state);
        run
    }

    fn transition(&mut self, next: StageState) {
        info!("Staging {}: {} -> {}", self.label, self.state, next);
        self.state = next;
    }

    fn fail(&mut self, error: StageError) -> StageError {
        warn!(
            "Staging {}: {} -> {} ({})",
            self.label,
            self.state,
            StageState::Failed,
            error
        );
        self.state = StageState::Failed;
        error
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Group tables into waves: a table lands one wave after its deepest parent.
///
/// Table order inside a wave follows catalog order.
pub fn dependency_waves(tables: &[ResolvedTable]) -> Vec<Vec<ResolvedTable>> {
    let mut depth: HashMap<&str, usize> = HashMap::new();
    let mut waves: Vec<Vec<ResolvedTable>> = Vec::new();

    for table in tables {
        let level = table
            .spec
            .parents()
            .iter()
            .filter_map(|parent| depth.get(parent).map(|d| d + 1))
            .max()
            .unwrap_or(0);
        depth.insert(table.spec.name.as_str(), level);
        if waves.len() <= level {
            waves.resize_with(level + 1, Vec::new);
        }
        waves[level].push(table.clone());
    }

    waves
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn worker_error(table: &str, error: JoinError) -> StageError {
    if error.is_panic() {
        let payload = error.into_panic();
        StageError::Worker(format!(
            "table '{table}' panicked: {}",
            panic_message(payload.as_ref())
        ))
    } else {
        StageError::Worker(format!("table '{table}' was cancelled"))
    }
}

/// Stages datasets from a catalog into an object store.
pub struct Stager {
    catalog: Arc<Catalog>,
    store: Arc<dyn ObjectStore>,
}

impl Stager {
    /// Create a stager over an immutable catalog and a storage backend.
    pub fn new(catalog: Catalog, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Generate and persist `dataset` at `size`, unless it is already staged.
    ///
    /// Dataset and size are validated before any storage call. Staging the
    /// same pair twice writes nothing the second time.
    pub async fn stage(&self, dataset: &str, size: &str) -> Result<StagingManifest, StageError> {
        let resolved = self.catalog.resolve(dataset, size)?;
        let mut run = Run::start(&resolved);
        let prefix = resolved.prefix();

        // Checking
        let existing = self
            .list_tables(&prefix)
            .await
            .map_err(|e| run.fail(e))?;
        if existing.len() >= resolved.tables.len() {
            info!(
                "Staging {}: {} objects already under '{}', skipping generation",
                run.label,
                existing.len(),
                prefix
            );
            run.transition(StageState::Done);
            return Ok(StagingManifest::from_listing(
                &resolved.dataset,
                resolved.size,
                &existing,
                run.started.elapsed(),
            ));
        }

        let mut pools = SharedPools::default();
        let mut tables: Vec<TableArtifact> = Vec::with_capacity(resolved.tables.len());
        let generated_at = Utc::now();

        for (wave_index, wave) in dependency_waves(&resolved.tables).into_iter().enumerate() {
            run.transition(StageState::Generating);
            debug!("Generating wave {} ({} tables)", wave_index, wave.len());
            let generated = self
                .generate_wave(wave, &mut pools)
                .await
                .map_err(|e| run.fail(e))?;

            run.transition(StageState::Serializing);
            let artifacts: Vec<(TableArtifact, Vec<u8>)> = generated
                .into_iter()
                .map(|table| {
                    let key = resolved.table_key(&table.name);
                    let artifact = TableArtifact {
                        table: table.name,
                        key,
                        bytes: table.bytes.len() as u64,
                        records: Some(table.records),
                    };
                    (artifact, table.bytes)
                })
                .collect();

            run.transition(StageState::Persisting);
            self.persist(artifacts, generated_at, &mut tables)
                .await
                .map_err(|e| run.fail(e))?;
        }

        // Manifest lists tables in catalog order, not wave order
        tables.sort_by_key(|artifact| {
            resolved
                .tables
                .iter()
                .position(|t| t.spec.name == artifact.table)
        });

        run.transition(StageState::Done);
        let manifest = StagingManifest {
            dataset: resolved.dataset.clone(),
            size: resolved.size,
            cached: false,
            duration_ms: run.elapsed_ms(),
            tables,
        };
        info!(
            "Staged {}: {} tables, {} bytes in {} ms",
            run.label,
            manifest.tables.len(),
            manifest.total_bytes(),
            manifest.duration_ms
        );
        Ok(manifest)
    }

    /// Objects currently staged for `dataset` at `size`.
    pub async fn status(&self, dataset: &str, size: &str) -> Result<Vec<ObjectInfo>, StageError> {
        let resolved = self.catalog.resolve(dataset, size)?;
        let prefix = resolved.prefix();
        self.store
            .list(&prefix)
            .await
            .map_err(|source| StageError::Storage { prefix, source })
    }

    /// Remove every object staged for `dataset` at `size`; returns the removed keys.
    pub async fn delete(&self, dataset: &str, size: &str) -> Result<Vec<String>, StageError> {
        let resolved = self.catalog.resolve(dataset, size)?;
        let prefix = resolved.prefix();
        let objects = self
            .store
            .list(&prefix)
            .await
            .map_err(|source| StageError::Storage {
                prefix: prefix.clone(),
                source,
            })?;

        let mut removed = Vec::with_capacity(objects.len());
        for object in objects {
            self.store
                .delete(&object.key)
                .await
                .map_err(|source| StageError::Storage {
                    prefix: prefix.clone(),
                    source,
                })?;
            debug!("Deleted {}", object.key);
            removed.push(object.key);
        }

        info!("Deleted {} objects under '{}'", removed.len(), prefix);
        Ok(removed)
    }

    async fn list_tables(&self, prefix: &str) -> Result<Vec<ObjectInfo>, StageError> {
        let objects = self
            .store
            .list(prefix)
            .await
            .map_err(|source| StageError::Storage {
                prefix: prefix.to_string(),
                source,
            })?;
        Ok(objects
            .into_iter()
            .filter(|object| object.key.ends_with(".jsonl"))
            .collect())
    }

    /// Generate one wave; tables of the wave run on separate blocking
    /// workers. Identifier pools of the wave are added to `pools`.
    async fn generate_wave(
        &self,
        wave: Vec<ResolvedTable>,
        pools: &mut SharedPools,
    ) -> Result<Vec<GeneratedTable>, StageError> {
        let (names, handles): (Vec<String>, Vec<_>) = wave
            .into_iter()
            .map(|table| {
                let parents = pools.subset(&table.spec.parents());
                let name = table.spec.name.clone();
                let handle = tokio::task::spawn_blocking(move || {
                    generate_table(&table.spec, table.count, &parents)
                });
                (name, handle)
            })
            .unzip();
        let results = join_all(handles).await;

        let mut generated = Vec::with_capacity(names.len());
        for (name, result) in names.into_iter().zip(results) {
            let mut table = result.map_err(|e| worker_error(&name, e))??;
            if let Some(ids) = table.ids.take() {
                pools.insert(name, Arc::new(ids));
            }
            generated.push(table);
        }
        Ok(generated)
    }

    /// Write one wave's tables concurrently and append them to `completed`.
    /// The first failure is reported together with every table written so
    /// far in the run.
    async fn persist(
        &self,
        artifacts: Vec<(TableArtifact, Vec<u8>)>,
        generated_at: DateTime<Utc>,
        completed: &mut Vec<TableArtifact>,
    ) -> Result<(), StageError> {
        let (tables, blobs): (Vec<TableArtifact>, Vec<Vec<u8>>) = artifacts.into_iter().unzip();

        let writes = tables.iter().zip(blobs).map(|(artifact, bytes)| {
            let store = Arc::clone(&self.store);
            let key = artifact.key.clone();
            async move {
                store
                    .put(&key, bytes, ObjectMetadata::ndjson(generated_at))
                    .await
            }
        });
        let results = join_all(writes).await;

        let mut first_failure = None;
        for (artifact, result) in tables.into_iter().zip(results) {
            match result {
                Ok(()) => completed.push(artifact),
                Err(source) if first_failure.is_none() => {
                    first_failure = Some((artifact.key, source));
                }
                Err(source) => warn!("Also failed to persist '{}': {:#}", artifact.key, source),
            }
        }

        if let Some((key, source)) = first_failure {
            return Err(StageError::StorageWrite {
                key,
                completed: completed.iter().map(|t| t.table.clone()).collect(),
                source,
            });
        }
        Ok(())
    }
}
