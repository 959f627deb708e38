//! Pichound main entry point
//!
//! Command-line interface for the Pichound image harvester.

use anyhow::Context;
use clap::Parser;
use pichound::config::load_config_with_hash;
use pichound::download::download_all;
use pichound::report::RunReport;
use pichound::Crawler;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pichound: a depth-bounded site image harvester
///
/// Pichound crawls seed URLs breadth-first up to a configured depth,
/// stays on the host it was seeded on, collects every image it sees, and
/// downloads them into a directory tree grouped by originating page.
#[derive(Parser, Debug)]
#[command(name = "pichound")]
#[command(version = "1.0.0")]
#[command(about = "A depth-bounded site image harvester", long_about = None)]
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

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Crawl and report, but do not download any image bodies
    #[arg(long, conflicts_with = "dry_run")]
    no_download: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_run(config, config_hash, cli.no_download).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pichound=info,warn"),
            1 => EnvFilter::new("pichound=debug,info"),
            2 => EnvFilter::new("pichound=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the plan
fn handle_dry_run(config: &pichound::Config) {
    println!("=== Pichound Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max concurrency: {}", config.crawler.max_concurrency);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Min image bytes: {}", config.crawler.min_image_bytes);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Image directory: {}", config.output.image_dir);
    println!("  Report: {}", config.output.report_path);

    println!("\nSeed URLs ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    if !config.filters.include.is_empty() {
        println!("\nInclude patterns:");
        for pattern in &config.filters.include {
            println!("  - {}", pattern);
        }
    }

    if !config.filters.exclude.is_empty() {
        println!("\nExclude patterns:");
        for pattern in &config.filters.exclude {
            println!("  - {}", pattern);
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} seed URLs", config.seeds.len());
}

/// Handles the main crawl-and-download run
async fn handle_run(
    config: pichound::Config,
    config_hash: String,
    no_download: bool,
) -> anyhow::Result<()> {
    let report_path = PathBuf::from(&config.output.report_path);
    let max_concurrency = config.crawler.max_concurrency;
    let min_image_bytes = config.crawler.min_image_bytes;

    let crawler = Crawler::new(config).context("failed to build crawler")?;

    let crawl_result = crawler.crawl().await.context("crawl rejected its input")?;

    let download_report = if no_download {
        tracing::info!(
            "Skipping downloads (--no-download): {} images discovered",
            crawl_result.images.len()
        );
        None
    } else {
        let report = download_all(
            crawler.client(),
            &crawl_result.images,
            max_concurrency,
            min_image_bytes,
        )
        .await
        .context("download batch rejected its input")?;
        Some(report)
    };

    let report = RunReport::new(config_hash, crawl_result, download_report);
    report.print();
    report
        .save(&report_path)
        .with_context(|| format!("failed to write report to {}", report_path.display()))?;

    Ok(())
}
