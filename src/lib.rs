//! Dataset Stager Library
//!
//! Generates deterministic synthetic benchmark datasets and stages them as
//! JSON Lines objects in a local directory, an S3 bucket or memory.
//!
//! # Crates
//!
//! - `stager_core` (as `catalog`) - catalog, size tiers and sampler configuration
//! - `stager_generator` - seeded PRNG, samplers and record synthesizers
//! - `stager_store` - object storage backends
//! - `stager_pipeline` - the staging state machine
//!
//! # CLI Usage
//!
//! ```bash
//! # Stage the 10mb IMDb dataset into ./staged
//! dataset-stager stage imdb 10mb
//!
//! # Stage into S3 using a custom catalog
//! dataset-stager stage shop 1mb --store s3://datasets/staging --catalog shop.yaml
//!
//! # Inspect and remove
//! dataset-stager status imdb 10mb
//! dataset-stager delete imdb 10mb
//! ```

use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;

pub use stager_core as catalog;
pub use stager_generator as generator;
pub use stager_pipeline as pipeline;
pub use stager_store as store;

use stager_core::{Catalog, SizeTier};
use stager_pipeline::{CatalogArgs, StageTargetArgs, Stager};
use stager_store::{ObjectStore, StoreLocation};

/// One line of the `datasets` listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub id: String,
    pub description: String,
    pub tables: Vec<String>,
    pub sizes: Vec<SizeTier>,
}

/// Load the catalog named by `args`, or the built-in one.
pub fn load_catalog(args: &CatalogArgs) -> anyhow::Result<Catalog> {
    match &args.catalog {
        Some(path) => args
            .load()
            .with_context(|| format!("Failed to load catalog from {}", path.display())),
        None => Ok(args.load()?),
    }
}

/// Parse and open a store location.
pub async fn open_store(uri: &str) -> anyhow::Result<Arc<dyn ObjectStore>> {
    let location = StoreLocation::parse(uri)
        .with_context(|| format!("Invalid store location '{uri}'"))?;
    tracing::info!("Using store {}", location.display_name());
    location
        .open()
        .await
        .with_context(|| format!("Failed to open store {}", location.display_name()))
}

/// Build a stager for a `stage`, `status` or `delete` command.
pub async fn open_stager(target: &StageTargetArgs) -> anyhow::Result<Stager> {
    let catalog = load_catalog(&target.catalog)?;
    let store = open_store(&target.store).await?;
    Ok(Stager::new(catalog, store))
}

/// Datasets of a catalog with the size tiers every table has a count for.
pub fn dataset_summaries(catalog: &Catalog) -> Vec<DatasetSummary> {
    catalog
        .datasets
        .iter()
        .map(|dataset| DatasetSummary {
            id: dataset.id.clone(),
            description: dataset.description.clone(),
            tables: dataset.tables.iter().map(|t| t.name.clone()).collect(),
            sizes: SizeTier::ALL
                .iter()
                .copied()
                .filter(|size| dataset.tables.iter().all(|t| t.count_for(*size).is_some()))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_summaries() {
        let summaries = dataset_summaries(&Catalog::builtin());
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, "clickbench");
        assert_eq!(summaries[1].tables, vec!["titles", "people", "ratings"]);
        assert_eq!(summaries[1].sizes, SizeTier::ALL.to_vec());
    }

    #[test]
    fn test_missing_catalog_file() {
        let args = CatalogArgs {
            catalog: Some("/nonexistent/catalog.yaml".into()),
        };
        let err = load_catalog(&args).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/catalog.yaml"));
    }
}
