use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use cinedive::{Config, DatasetCatalog, DatasetId};

/// Load CineDive datasets and print their size.
#[derive(Debug, Parser)]
#[command(name = "cinedive", version, about)]
struct Args {
    /// TOML config file (defaults to ./cinedive.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Static site URL or directory holding the data folder
    #[arg(long)]
    base: Option<String>,

    /// Load a second time to show the cached path
    #[arg(long)]
    twice: bool,

    /// Datasets to load (all when omitted)
    datasets: Vec<DatasetId>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = Config::from_env(args.base.as_deref(), args.config.as_deref())
        .context("resolving configuration")?;
    let catalog = DatasetCatalog::from_config(&config);

    let ids = if args.datasets.is_empty() {
        DatasetId::ALL.to_vec()
    } else {
        args.datasets
    };

    let rounds = if args.twice { 2 } else { 1 };
    for round in 1..=rounds {
        for id in &ids {
            let started = Instant::now();
            let summary = catalog
                .summary(*id)
                .await
                .with_context(|| format!("loading {id} from {}", catalog.locator(*id)))?;
            println!(
                "[{round}] {id:<22} {summary} ({:.1?})",
                started.elapsed()
            );
        }
    }

    Ok(())
}
