use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wishlist_watcher::fetcher::HttpFetcher;
use wishlist_watcher::store::InMemoryItemRepository;
use wishlist_watcher::tracker::WishlistTracker;
use wishlist_watcher::{AppConfig, ExtractionOutcome, PriceExtractor, normalize};

#[derive(Parser)]
#[command(name = "wishlist-watcher", version, about = "Detect product prices on web pages")]
struct Cli {
    /// Log every extraction stage
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch pages and detect their prices
    Probe {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Detect the price in a saved HTML file
    Inspect { path: PathBuf },
    /// Normalize a raw price string
    Normalize { raw: String },
    /// Print the effective configuration as TOML
    Config,
}

fn describe(outcome: &ExtractionOutcome) -> String {
    match outcome {
        ExtractionOutcome::Resolved { price, provenance } => format!("{}\t({})", price, provenance),
        ExtractionOutcome::Exhausted => "no price detected".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "wishlist_watcher=debug"
    } else {
        "wishlist_watcher=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let extractor = PriceExtractor::from_config(&config.extractor)?;

    match cli.command {
        Command::Probe { urls } => {
            info!("Probing {} page(s)", urls.len());
            let tracker = WishlistTracker::new(
                Arc::new(HttpFetcher::new(config.fetcher.clone())?),
                Arc::new(InMemoryItemRepository::new()),
                extractor,
                config.tracker.clone(),
            );

            let mut failures = 0;
            for (url, result) in urls.iter().zip(tracker.probe_many(&urls).await) {
                match result {
                    Ok(probe) => {
                        if !probe.outcome.is_resolved() {
                            failures += 1;
                        }
                        println!("{}\t{}", url, describe(&probe.outcome));
                    }
                    Err(e) => {
                        failures += 1;
                        println!("{}\terror: {}", url, e);
                    }
                }
            }

            if failures > 0 {
                bail!("{} of {} page(s) had no detectable price", failures, urls.len());
            }
        }
        Command::Inspect { path } => {
            let body = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let outcome = extractor.extract_from_html(&body);
            println!("{}", describe(&outcome));

            if !outcome.is_resolved() {
                bail!("Unable to detect a price in {}", path.display());
            }
        }
        Command::Normalize { raw } => match normalize(&raw) {
            Some(price) => println!("{}", price),
            None => bail!("'{}' does not contain a price", raw),
        },
        Command::Config => {
            println!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
