//! Sumi-Index main entry point
//!
//! This is the command-line interface for the Sumi-Index crawler and
//! inverted-index builder.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sumi_index::config::{load_config_with_hash, Config};
use sumi_index::crawler::HttpFetcher;
use sumi_index::output::{load_statistics, print_run_report, print_statistics};
use sumi_index::storage::{open_storage, SharedStorage, Storage};
use sumi_index::Pipeline;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sumi-Index: a crawling inverted-index builder
///
/// Sumi-Index crawls pages from a seed URL, following every absolute link,
/// and records which words appear on which pages and in which link texts.
#[derive(Parser, Debug)]
#[command(name = "sumi-index")]
#[command(version = "1.0.0")]
#[command(about = "A crawling inverted-index builder", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Drop and recreate the index tables before crawling
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_index=info,warn"),
            1 => EnvFilter::new("sumi_index=debug,info"),
            2 => EnvFilter::new("sumi_index=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Index Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nIndexer:");
    println!("  Page workers: {}", config.indexer.page_workers);
    println!("  Link workers: {}", config.indexer.link_workers);

    println!("\nQueues:");
    println!("  Pages: {}", capacity_label(config.queues.page_capacity));
    println!("  Links: {}", capacity_label(config.queues.link_capacity));

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling from {}", config.crawler.seed_url);
}

fn capacity_label(capacity: Option<usize>) -> String {
    match capacity {
        Some(capacity) => format!("bounded ({})", capacity),
        None => "unbounded".to_string(),
    }
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, fresh: bool) -> anyhow::Result<()> {
    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    if fresh {
        tracing::info!("Starting fresh index (dropping existing tables)");
        storage.reset()?;
    }

    let fetcher = HttpFetcher::new(&config.user_agent, &config.crawler)?;
    let storage = SharedStorage::new(storage);
    let pipeline = Pipeline::new(config, storage, Arc::new(fetcher));

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Interrupt received, finishing queued work");
                    shutdown.cancel();
                }
                Err(e) => tracing::warn!("Cannot listen for interrupts: {}", e),
            }
        });
    }

    let report = pipeline.run(shutdown).await?;
    print_run_report(&report);

    if !report.is_clean() {
        tracing::warn!("{} pipeline tasks failed, see log above", report.task_failures);
    }

    Ok(())
}
