//! Core configuration types for dataset-stager.
//!
//! Everything in this crate is immutable configuration data:
//!
//! - [`SizeTier`] - the enumerated size labels (`1mb` .. `1gb`)
//! - [`SamplerConfig`] - one variant per distribution sampler
//! - [`Catalog`] - datasets, their tables, seeds and per-tier record counts
//!
//! A catalog is built once (either [`Catalog::builtin`] or loaded from YAML)
//! and handed to the staging pipeline at construction time.

pub mod catalog;
pub mod sampler;
pub mod tier;

pub use catalog::{
    Catalog, CatalogError, DatasetSpec, FieldSpec, ResolvedDataset, ResolvedTable,
    SynthesizerKind, TableSpec,
};
pub use sampler::{
    LongTailTier, SamplerConfig, TimestampFormat, MAX_PRECISION, VOTE_TIERS, YEAR_RANGE,
};
pub use tier::SizeTier;
