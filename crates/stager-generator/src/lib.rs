//! Deterministic record generation for dataset-stager.
//!
//! Each table owns a [`Mulberry32`] generator seeded from its catalog entry.
//! Samplers and synthesizers borrow that generator and consume it in record
//! order, so a table's output is a pure function of its seed, record count
//! and the identifier pools of its parent tables.
//!
//! # Example
//!
//! ```
//! use stager_core::Catalog;
//! use stager_generator::{generate_table, SharedPools};
//!
//! let catalog = Catalog::builtin();
//! let resolved = catalog.resolve("clickbench", "1mb").unwrap();
//! let hits = &resolved.tables[0];
//! let table = generate_table(&hits.spec, hits.count, &SharedPools::default()).unwrap();
//! assert_eq!(table.records, 2_000);
//! ```

pub mod pool;
pub mod rng;
pub mod samplers;
pub mod synthesizers;
pub mod table;

pub use pool::{pool_size, IdPool, SharedPools};
pub use rng::Mulberry32;
pub use synthesizers::Synthesizer;
pub use table::{generate_table, GeneratedTable, GeneratorError};
