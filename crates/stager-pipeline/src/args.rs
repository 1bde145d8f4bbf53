//! CLI argument definitions shared by the staging commands.

use clap::Args;
use stager_core::{Catalog, CatalogError};
use std::path::PathBuf;

/// Default store location when none is given.
pub const DEFAULT_STORE: &str = "./staged";

/// Where the dataset catalog comes from.
#[derive(Args, Clone, Debug, Default)]
pub struct CatalogArgs {
    /// Path to a dataset catalog YAML file (built-in datasets if omitted)
    #[arg(long, env = "DATASET_STAGER_CATALOG")]
    pub catalog: Option<PathBuf>,
}

impl CatalogArgs {
    /// Load the YAML catalog, or fall back to the built-in one.
    pub fn load(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog {
            Some(path) => Catalog::from_file(path),
            None => Ok(Catalog::builtin()),
        }
    }
}

/// Dataset, size and the store to operate on.
#[derive(Args, Clone, Debug)]
pub struct StageTargetArgs {
    /// Dataset identifier (e.g. clickbench, imdb)
    pub dataset: String,

    /// Size tier: 1mb, 10mb, 100mb or 1gb
    pub size: String,

    /// Store location: a local directory, s3://bucket[/prefix] or memory://
    #[arg(long, env = "DATASET_STAGER_STORE", default_value = DEFAULT_STORE)]
    pub store: String,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        target: StageTargetArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::try_parse_from(["test", "imdb", "10mb"]).unwrap();
        assert_eq!(cli.target.dataset, "imdb");
        assert_eq!(cli.target.size, "10mb");
    }

    #[test]
    fn test_explicit_store_and_catalog() {
        let cli = TestCli::try_parse_from([
            "test",
            "shop",
            "1mb",
            "--store",
            "s3://datasets/staging",
            "--catalog",
            "catalog.yaml",
        ])
        .unwrap();
        assert_eq!(cli.target.store, "s3://datasets/staging");
        assert_eq!(cli.target.catalog.catalog, Some(PathBuf::from("catalog.yaml")));
    }

    #[test]
    fn test_missing_size_rejected() {
        assert!(TestCli::try_parse_from(["test", "imdb"]).is_err());
    }

    #[test]
    fn test_builtin_catalog_when_no_file() {
        let catalog = CatalogArgs::default().load().unwrap();
        assert_eq!(catalog, Catalog::builtin());
    }
}
