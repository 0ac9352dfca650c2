//! Pagesweep main entry point
//!
//! This is the command-line interface for the Pagesweep catalog harvester.

use anyhow::Context;
use clap::Parser;
use pagesweep::config::{load_config_with_hash, Config};
use pagesweep::crawler::{CrawlDriver, PageFetcher};
use pagesweep::download::{DownloadDriver, YtDlp};
use pagesweep::ledger::{FileLedger, Ledger};
use pagesweep::output::{load_statistics, print_statistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pagesweep: a resumable catalog harvester
///
/// Walks numbered listing pages from the start page down to the end page,
/// records every item link in a CSV ledger, then downloads each pending item
/// with an external downloader. Progress is kept on disk, so an interrupted
/// run resumes where it stopped.
#[derive(Parser, Debug)]
#[command(name = "pagesweep")]
#[command(version = "1.0.0")]
#[command(about = "A resumable catalog harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show which pages would be requested, then exit
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the ledger and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,

    /// Only run the download phase
    #[arg(long, conflicts_with = "skip_download")]
    skip_crawl: bool,

    /// Only run the crawl phase
    #[arg(long)]
    skip_download: bool,

    /// Put failed items back to pending before downloading
    #[arg(long, conflicts_with = "skip_download")]
    retry_failed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            let config = Config::default();
            pagesweep::config::validate(&config).context("built-in defaults are invalid")?;
            config
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config);
    } else {
        if let Err(e) = handle_harvest(&config, &cli).await {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagesweep=info,warn"),
            1 => EnvFilter::new("pagesweep=debug,info"),
            2 => EnvFilter::new("pagesweep=trace,debug"),
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

/// Handles the --dry-run mode: shows the configuration and the planned requests
fn handle_dry_run(config: &Config) {
    println!("=== Pagesweep Dry Run ===\n");

    println!("Crawl:");
    println!(
        "  Pages: {} down to {}",
        config.crawl.start_page, config.crawl.end_page
    );
    println!("  Link selector: {}", config.crawl.link_selector);
    println!("  User agent: {}", config.crawl.user_agent);
    println!("  Delay between pages: {}ms", config.crawl.request_delay_ms);

    println!("\nDownload:");
    println!("  Program: {}", config.download.program);
    println!("  Format: {}", config.download.format);
    println!("  Output: {}", config.output_path());

    println!("\nLedger:");
    println!("  Pages file: {}", config.ledger.pages_file.display());
    println!("  Items file: {}", config.ledger.items_file.display());

    let page_count = (config.crawl.start_page - config.crawl.end_page).saturating_add(1);
    println!("\nWould request up to {} listing pages:", page_count);
    for page in (config.crawl.end_page..=config.crawl.start_page)
        .rev()
        .take(10)
    {
        println!("  * {}", config.page_url(page));
    }
    if page_count > 10 {
        println!("  ... and {} more", page_count - 10);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the ledger
fn handle_stats(config: &Config) {
    let mut ledger = FileLedger::from_config(&config.ledger).read_only();
    let stats = load_statistics(&mut ledger);
    print_statistics(&stats);
}

/// Runs the crawl phase and then the download phase
async fn handle_harvest(config: &Config, cli: &Cli) -> pagesweep::Result<()> {
    std::fs::create_dir_all(&config.download.directory)?;

    let mut ledger = FileLedger::from_config(&config.ledger);
    let mut visited = ledger.load_visited_pages();
    let mut items = ledger.load_item_statuses();

    tracing::info!(
        "Ledger: {} visited pages, {} known items",
        visited.len(),
        items.len()
    );

    if cli.skip_crawl {
        tracing::info!("Skipping crawl phase");
    } else {
        tracing::info!("--- STEP 1: SCRAPING NEW PAGES ---");
        let fetcher = PageFetcher::new(&config.crawl)?;
        let report = CrawlDriver::new(config, fetcher, &mut ledger)
            .run(&mut visited, &mut items)
            .await;
        println!("Crawl summary: {}", report);
    }

    if cli.skip_download {
        tracing::info!("Skipping download phase");
    } else {
        tracing::info!("--- STEP 2: DOWNLOADING PENDING ITEMS ---");
        let mut driver =
            DownloadDriver::new(config, YtDlp::from_config(&config.download), &mut ledger);
        if cli.retry_failed {
            driver.requeue_failed(&mut items);
        }
        let report = driver.download_pending(&mut items).await;
        println!("{}", report);
        for failure in &report.failures {
            println!("  ✗ {}: {}", failure.url, failure.message);
        }
    }

    tracing::info!("Harvest finished");
    Ok(())
}
