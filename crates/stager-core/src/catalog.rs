//! Dataset catalog.
//!
//! The catalog is the static table that maps `(dataset, size tier)` to the
//! tables to generate, their PRNG seeds and their record counts. It is an
//! explicit value handed to the pipeline; there is no global registry.

use crate::sampler::SamplerConfig;
use crate::tier::SizeTier;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Unknown dataset id
    #[error("Invalid dataset '{given}', valid options: {}", .valid.join(", "))]
    InvalidDataset { given: String, valid: Vec<String> },

    /// Unknown size token
    #[error("Invalid size '{given}', valid options: {}", .valid.join(", "))]
    InvalidSizeTier { given: String, valid: Vec<String> },

    /// Table has no record count for the requested tier
    #[error("Table '{table}' of dataset '{dataset}' has no record count for size {size}")]
    MissingCount {
        dataset: String,
        table: String,
        size: SizeTier,
    },

    /// Structurally invalid catalog
    #[error("Invalid catalog: {0}")]
    Invalid(String),

    /// Error reading catalog file
    #[error("Failed to read catalog file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

// ============================================================================
// Catalog Types
// ============================================================================

/// A field of a YAML-defined table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub sampler: SamplerConfig,
}

/// Which record synthesizer produces a table.
///
/// The set of built-in record shapes is closed; `Fields` covers tables
/// described entirely in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SynthesizerKind {
    /// ClickBench web-analytics hit events
    ClickbenchHits,
    /// IMDb-style title entries
    ImdbTitles,
    /// IMDb-style people, referencing titles
    ImdbPeople { titles: String },
    /// User ratings, referencing titles
    ImdbRatings { titles: String },
    /// Generic table built from per-field sampler configs
    Fields {
        /// Field whose value feeds this table's identifier pool
        #[serde(default)]
        id_field: Option<String>,
        fields: Vec<FieldSpec>,
    },
}

impl SynthesizerKind {
    /// Whether generated records carry an identifier children can reference.
    pub fn provides_ids(&self) -> bool {
        !matches!(self, SynthesizerKind::Fields { id_field: None, .. })
    }

    /// Tables whose identifier pools this synthesizer reads.
    pub fn parents(&self) -> Vec<&str> {
        match self {
            SynthesizerKind::ClickbenchHits | SynthesizerKind::ImdbTitles => Vec::new(),
            SynthesizerKind::ImdbPeople { titles } | SynthesizerKind::ImdbRatings { titles } => {
                vec![titles.as_str()]
            }
            SynthesizerKind::Fields { fields, .. } => {
                let mut parents: Vec<&str> = Vec::new();
                for parent in fields.iter().filter_map(|f| f.sampler.parent_table()) {
                    if !parents.contains(&parent) {
                        parents.push(parent);
                    }
                }
                parents
            }
        }
    }
}

/// One table of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Table name, also the object file stem
    pub name: String,
    /// Fixed PRNG seed for this table
    pub seed: u32,
    /// Record synthesizer
    pub synthesizer: SynthesizerKind,
    /// Record count per size tier
    pub counts: BTreeMap<SizeTier, u64>,
}

impl TableSpec {
    pub fn parents(&self) -> Vec<&str> {
        self.synthesizer.parents()
    }

    pub fn count_for(&self, size: SizeTier) -> Option<u64> {
        self.counts.get(&size).copied()
    }
}

/// A dataset and its tables in generation order (parents first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub tables: Vec<TableSpec>,
}

impl DatasetSpec {
    pub fn get_table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }
}

/// A table with its resolved record count.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTable {
    pub spec: TableSpec,
    pub count: u64,
}

/// Result of resolving `(dataset, size)` against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDataset {
    pub dataset: String,
    pub size: SizeTier,
    pub tables: Vec<ResolvedTable>,
}

impl ResolvedDataset {
    /// Storage prefix shared by every table of this run.
    pub fn prefix(&self) -> String {
        format!("{}/{}/", self.dataset, self.size)
    }

    /// Deterministic storage key of one table.
    pub fn table_key(&self, table: &str) -> String {
        format!("{}{}.jsonl", self.prefix(), table)
    }
}

/// Immutable set of stageable datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub datasets: Vec<DatasetSpec>,
}

impl Catalog {
    /// Load and validate a catalog from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a catalog from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check table ordering and sampler parameters.
    ///
    /// Every parent must be declared earlier in the same dataset, so the
    /// declared order is always a valid generation order.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut ids = HashSet::new();
        for dataset in &self.datasets {
            if !ids.insert(dataset.id.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate dataset '{}'",
                    dataset.id
                )));
            }
            if dataset.tables.is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "dataset '{}' has no tables",
                    dataset.id
                )));
            }

            let mut seen: HashSet<&str> = HashSet::new();
            for table in &dataset.tables {
                for parent in table.parents() {
                    if !seen.contains(parent) {
                        return Err(CatalogError::Invalid(format!(
                            "table '{}.{}' references '{}' which is not declared before it",
                            dataset.id, table.name, parent
                        )));
                    }
                    let provides_ids = dataset
                        .get_table(parent)
                        .is_some_and(|p| p.synthesizer.provides_ids());
                    if !provides_ids {
                        return Err(CatalogError::Invalid(format!(
                            "table '{}.{}' references '{}' which has no id field",
                            dataset.id, table.name, parent
                        )));
                    }
                }
                if let SynthesizerKind::Fields { id_field, fields } = &table.synthesizer {
                    if fields.is_empty() {
                        return Err(CatalogError::Invalid(format!(
                            "table '{}.{}' has no fields",
                            dataset.id, table.name
                        )));
                    }
                    if let Some(id_field) = id_field {
                        if !fields.iter().any(|f| &f.name == id_field) {
                            return Err(CatalogError::Invalid(format!(
                                "table '{}.{}' id_field '{}' is not a field",
                                dataset.id, table.name, id_field
                            )));
                        }
                    }
                    for field in fields {
                        field.sampler.check().map_err(|reason| {
                            CatalogError::Invalid(format!(
                                "field '{}.{}.{}': {reason}",
                                dataset.id, table.name, field.name
                            ))
                        })?;
                    }
                }
                if !seen.insert(table.name.as_str()) {
                    return Err(CatalogError::Invalid(format!(
                        "duplicate table '{}.{}'",
                        dataset.id, table.name
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn dataset_ids(&self) -> Vec<String> {
        self.datasets.iter().map(|d| d.id.clone()).collect()
    }

    pub fn dataset(&self, id: &str) -> Result<&DatasetSpec, CatalogError> {
        self.datasets
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| CatalogError::InvalidDataset {
                given: id.to_string(),
                valid: self.dataset_ids(),
            })
    }

    /// Map `(dataset, size)` to per-table record counts.
    ///
    /// Pure lookup. The dataset is checked before the size token.
    pub fn resolve(&self, dataset: &str, size: &str) -> Result<ResolvedDataset, CatalogError> {
        let spec = self.dataset(dataset)?;
        let size: SizeTier = size.parse()?;

        let tables = spec
            .tables
            .iter()
            .map(|table| {
                table
                    .count_for(size)
                    .map(|count| ResolvedTable {
                        spec: table.clone(),
                        count,
                    })
                    .ok_or_else(|| CatalogError::MissingCount {
                        dataset: spec.id.clone(),
                        table: table.name.clone(),
                        size,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolvedDataset {
            dataset: spec.id.clone(),
            size,
            tables,
        })
    }

    /// The datasets shipped with the tool.
    pub fn builtin() -> Self {
        Catalog {
            datasets: vec![
                DatasetSpec {
                    id: "clickbench".to_string(),
                    description: "ClickBench web-analytics hit events".to_string(),
                    tables: vec![TableSpec {
                        name: "hits".to_string(),
                        seed: 56789,
                        synthesizer: SynthesizerKind::ClickbenchHits,
                        counts: tier_counts([2_000, 20_000, 200_000, 2_000_000]),
                    }],
                },
                DatasetSpec {
                    id: "imdb".to_string(),
                    description: "Movie titles, people and user ratings".to_string(),
                    tables: vec![
                        TableSpec {
                            name: "titles".to_string(),
                            seed: 12345,
                            synthesizer: SynthesizerKind::ImdbTitles,
                            counts: tier_counts([1_500, 15_000, 150_000, 1_500_000]),
                        },
                        TableSpec {
                            name: "people".to_string(),
                            seed: 23456,
                            synthesizer: SynthesizerKind::ImdbPeople {
                                titles: "titles".to_string(),
                            },
                            counts: tier_counts([1_200, 12_000, 120_000, 1_200_000]),
                        },
                        TableSpec {
                            name: "ratings".to_string(),
                            seed: 34567,
                            synthesizer: SynthesizerKind::ImdbRatings {
                                titles: "titles".to_string(),
                            },
                            counts: tier_counts([3_000, 30_000, 300_000, 3_000_000]),
                        },
                    ],
                },
            ],
        }
    }
}

fn tier_counts(counts: [u64; 4]) -> BTreeMap<SizeTier, u64> {
    SizeTier::ALL.into_iter().zip(counts).collect()
}
