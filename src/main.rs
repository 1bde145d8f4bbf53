//! Command-line interface for dataset-stager
//!
//! # Usage Examples
//!
//! ```bash
//! # Generate and stage the 1mb ClickBench dataset into ./staged
//! dataset-stager stage clickbench 1mb
//!
//! # Stage into S3 (credentials from the default AWS chain)
//! dataset-stager stage imdb 100mb --store s3://datasets/staging
//!
//! # Use a YAML catalog instead of the built-in datasets
//! DATASET_STAGER_CATALOG=catalog.yaml dataset-stager datasets
//!
//! # Show and remove staged objects
//! dataset-stager status imdb 100mb --store s3://datasets/staging
//! dataset-stager delete imdb 100mb --store s3://datasets/staging
//! ```
//!
//! Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=info`).

use clap::{Parser, Subcommand};
use dataset_stager::{dataset_summaries, load_catalog, open_stager};
use stager_pipeline::{CatalogArgs, StageTargetArgs};

#[derive(Parser)]
#[command(name = "dataset-stager")]
#[command(about = "Generate deterministic synthetic datasets and stage them in object storage")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a dataset at a size tier and persist it (no-op if already staged)
    Stage {
        #[command(flatten)]
        target: StageTargetArgs,
    },

    /// List the objects currently staged for a dataset and size tier
    Status {
        #[command(flatten)]
        target: StageTargetArgs,
    },

    /// Remove every staged object of a dataset and size tier
    Delete {
        #[command(flatten)]
        target: StageTargetArgs,
    },

    /// List the datasets of the catalog
    Datasets {
        #[command(flatten)]
        catalog: CatalogArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stage { target } => {
            let stager = open_stager(&target).await?;
            let manifest = stager.stage(&target.dataset, &target.size).await?;
            println!("{}", manifest.to_json()?);
        }
        Commands::Status { target } => {
            let stager = open_stager(&target).await?;
            let objects = stager.status(&target.dataset, &target.size).await?;
            if objects.is_empty() {
                tracing::info!(
                    "Nothing staged for {}/{} in {}",
                    target.dataset,
                    target.size,
                    stager.store().describe()
                );
            }
            println!("{}", serde_json::to_string_pretty(&objects)?);
        }
        Commands::Delete { target } => {
            let stager = open_stager(&target).await?;
            let removed = stager.delete(&target.dataset, &target.size).await?;
            for key in removed {
                println!("{key}");
            }
        }
        Commands::Datasets { catalog } => {
            let catalog = load_catalog(&catalog)?;
            for summary in dataset_summaries(&catalog) {
                let sizes: Vec<&str> = summary.sizes.iter().map(|s| s.as_str()).collect();
                println!(
                    "{}\t[{}]\t{}\t{}",
                    summary.id,
                    sizes.join(", "),
                    summary.tables.join(","),
                    summary.description
                );
            }
        }
    }

    Ok(())
}
