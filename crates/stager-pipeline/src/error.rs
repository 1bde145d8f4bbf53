//! Error types for the staging pipeline.

use stager_core::CatalogError;
use stager_generator::GeneratorError;
use thiserror::Error;

/// Errors that end a staging run.
#[derive(Error, Debug)]
pub enum StageError {
    /// Unknown dataset or size tier, or an unusable catalog entry.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A table could not be written. `completed` names the tables that were
    /// persisted before the run was abandoned.
    #[error("Failed to persist '{key}' (persisted tables: [{}])", .completed.join(", "))]
    StorageWrite {
        key: String,
        completed: Vec<String>,
        #[source]
        source: anyhow::Error,
    },

    /// Listing or deleting under a prefix failed.
    #[error("Storage error under '{prefix}'")]
    Storage {
        prefix: String,
        #[source]
        source: anyhow::Error,
    },

    /// A table could not be generated or encoded.
    #[error("Generation error: {0}")]
    Generation(#[from] GeneratorError),

    /// The manifest could not be encoded.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A generation worker panicked or was cancelled.
    #[error("Generation worker failed: {0}")]
    Worker(String),
}
