mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediaflix_core::{
    load_config, validate_config, CacheStore, CatalogClient, Library, Organizer, TmdbClient,
};

use cli::{Cli, Command, ScanRoot};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Determine config path
    let config_path = cli
        .config
        .or_else(|| std::env::var("MEDIAFLIX_CONFIG").map(PathBuf::from).ok())
        .unwrap_or_else(|| PathBuf::from("mediaflix.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    let cache = Arc::new(CacheStore::new(config.cache.root.clone()));

    match cli.command {
        Command::Organize => {
            let organizer = Organizer::new(config.library.organizer_config());
            let report = organizer.organize().await;

            for moved in &report.moved {
                println!("{} -> {}", moved.from.display(), moved.to.display());
            }
            println!(
                "{} moved, {} skipped, {} failed",
                report.moved.len(),
                report.skipped,
                report.failed.len()
            );
        }
        Command::Scan { root } => {
            let library = library(&config, cache)?;
            let root_dir = match root {
                ScanRoot::Movies => &config.library.movies_dir,
                ScanRoot::Series => &config.library.series_dir,
            };

            let entries = library.scan(root_dir).await;
            for entry in &entries {
                let year = entry.metadata.year.as_deref().unwrap_or("????");
                let rating = entry
                    .metadata
                    .rating
                    .map(|r| format!("{:.1}", r))
                    .unwrap_or_else(|| "-".to_string());
                let genres = if entry.metadata.genres.is_empty() {
                    String::new()
                } else {
                    format!(" {}", entry.metadata.genres.join("/"))
                };
                println!(
                    "{} ({}) [{}]{} {}",
                    entry.file.search_title,
                    year,
                    rating,
                    genres,
                    entry.path.display()
                );
            }
            println!("{} entries", entries.len());
        }
        Command::Series => {
            let library = library(&config, cache)?;
            let entries = library.series(&config.library.series_dir).await;

            for series in &entries {
                println!("{} ({} episodes)", series.name, series.episode_count);
                if !series.metadata.synopsis.is_empty() {
                    println!("  {}", series.metadata.synopsis);
                }
            }
            println!("{} series", entries.len());
        }
        Command::ClearCache => {
            let removed = cache.clear_all().await;
            println!("removed {} cached files", removed);
        }
    }

    Ok(())
}

/// Wire the catalog client and library indexer from configuration.
fn library(config: &mediaflix_core::Config, cache: Arc<CacheStore>) -> Result<Library> {
    let tmdb = TmdbClient::new(config.tmdb.clone()).context("Failed to create TMDB client")?;
    let catalog = Arc::new(CatalogClient::new(Arc::new(tmdb), cache));
    Ok(Library::new(catalog))
}
