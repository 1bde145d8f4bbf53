//! Staging pipeline for dataset-stager.
//!
//! Resolves a `(dataset, size)` pair against a [`stager_core::Catalog`],
//! generates every table deterministically, writes one JSON Lines object per
//! table under `{dataset}/{size}/` and returns a [`StagingManifest`].
//!
//! # Example
//!
//! ```ignore
//! use stager_core::Catalog;
//! use stager_pipeline::Stager;
//! use stager_store::StoreLocation;
//!
//! let store = StoreLocation::parse("./staged")?.open().await?;
//! let stager = Stager::new(Catalog::builtin(), store);
//! let manifest = stager.stage("imdb", "1mb").await?;
//! println!("{}", manifest.to_json()?);
//! ```

pub mod args;
pub mod error;
pub mod manifest;
pub mod stager;

pub use args::{CatalogArgs, StageTargetArgs, DEFAULT_STORE};
pub use error::StageError;
pub use manifest::{StagingManifest, TableArtifact};
pub use stager::{dependency_waves, StageState, Stager};
