//! Crawlbot main entry point
//!
//! This is the command-line interface for the crawlbot polite web crawler.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use crawlbot::config::{apply_env_overrides, load_config_with_hash, Config};
use crawlbot::crawler::{parse_seed_list, CrawlRequest, CrawlResult, CrawlScheduler};
use crawlbot::output::{
    format_results, print_statistics, results_to_json, write_markdown_summary, CrawlStatistics,
    RunSummary, DEFAULT_MAX_SNIPPETS,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Crawlbot: a polite, bounded web crawler
///
/// Crawlbot crawls breadth-first from the given seed URLs while respecting
/// robots.txt, and stops when its page, depth, or time budget runs out.
#[derive(Parser, Debug)]
#[command(name = "crawlbot")]
#[command(version = "1.0.0")]
#[command(about = "A polite, bounded web crawler", long_about = None)]
struct Cli {
    /// Seed URLs (comma or whitespace separated lists are accepted)
    #[arg(value_name = "SEEDS", required = true)]
    seeds: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of pages to record
    #[arg(long)]
    max_pages: Option<usize>,

    /// Maximum link depth from the seeds
    #[arg(long)]
    max_depth: Option<u32>,

    /// Wall-clock budget for the crawl, in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Delay before each page request, in seconds
    #[arg(long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Follow links to other origins
    #[arg(long)]
    cross_origin: bool,

    /// Origin a cross-origin crawl may visit (repeatable; none means all)
    #[arg(long = "allow-origin", value_name = "ORIGIN", requires = "cross_origin")]
    allow_origins: Vec<String>,

    /// Print results as JSON instead of a text listing
    #[arg(long)]
    json: bool,

    /// Print crawl statistics after the results
    #[arg(long)]
    stats: bool,

    /// Write a markdown summary of the run to this path
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Validate configuration and show the effective request without crawling
    #[arg(long, conflicts_with_all = ["json", "stats", "summary"])]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load_configuration(&cli)?;
    let request = build_request(&cli, &config);

    if cli.dry_run {
        print_dry_run(&config, &request);
        return Ok(());
    }

    let scheduler = CrawlScheduler::new(&config).context("Failed to build HTTP client")?;

    let started_at = Utc::now();
    let results = scheduler.run(&request).await.context("Crawl failed")?;
    let finished_at = Utc::now();

    report(&cli, &request, &results, started_at, finished_at, config_hash)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that stdout carries only results.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawlbot=info,warn"),
            1 => EnvFilter::new("crawlbot=debug,info"),
            2 => EnvFilter::new("crawlbot=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), then applies environment overrides
fn load_configuration(cli: &Cli) -> anyhow::Result<(Config, Option<String>)> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    apply_env_overrides(&mut config).context("Invalid CRAWL_* environment override")?;

    Ok((config, hash))
}

fn build_request(cli: &Cli, config: &Config) -> CrawlRequest {
    let seeds: Vec<String> = cli.seeds.iter().flat_map(|s| parse_seed_list(s)).collect();

    let mut request = CrawlRequest::from_config(seeds, &config.crawler)
        .with_same_origin_only(!cli.cross_origin);

    // Zero means "use the configured default"
    if let Some(max_pages) = cli.max_pages.filter(|&n| n > 0) {
        request = request.with_max_pages(max_pages);
    }
    if let Some(max_depth) = cli.max_depth.filter(|&n| n > 0) {
        request = request.with_max_depth(max_depth);
    }
    if let Some(timeout) = cli.timeout.filter(|&n| n > 0) {
        request = request.with_timeout_seconds(timeout);
    }
    if let Some(delay) = cli.delay {
        request = request.with_request_delay_seconds(delay);
    }
    if !cli.allow_origins.is_empty() {
        request = request.with_allowed_origins(&cli.allow_origins);
    }

    request
}

fn print_dry_run(config: &Config, request: &CrawlRequest) {
    println!("=== Crawlbot Dry Run ===\n");

    println!("Request:");
    println!("  Max pages: {}", request.max_pages());
    println!("  Max depth: {}", request.max_depth());
    println!("  Timeout: {}s", request.timeout().as_secs());
    println!("  Request delay: {:.2}s", request.request_delay().as_secs_f64());
    println!("  Same origin only: {}", request.same_origin_only());
    if let Some(origins) = request.allowed_origins() {
        let mut origins: Vec<_> = origins.iter().collect();
        origins.sort();
        println!("  Allowed origins:");
        for origin in origins {
            println!("    - {}", origin);
        }
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.user_agent_string());

    println!("\nSeeds ({}):", request.seeds().len());
    for seed in request.seeds() {
        println!("  - {}", seed);
    }
}

fn report(
    cli: &Cli,
    request: &CrawlRequest,
    results: &[CrawlResult],
    started_at: chrono::DateTime<Utc>,
    finished_at: chrono::DateTime<Utc>,
    config_hash: Option<String>,
) -> anyhow::Result<()> {
    if cli.json {
        println!("{}", results_to_json(results).context("Failed to serialize results")?);
    } else {
        println!("{}", format_results(results, DEFAULT_MAX_SNIPPETS));
    }

    if cli.stats {
        println!();
        print_statistics(&CrawlStatistics::from_results(results));
    }

    if let Some(path) = &cli.summary {
        let mut summary =
            RunSummary::new(request.seeds().to_vec(), started_at, finished_at, results);
        if let Some(hash) = config_hash {
            summary = summary.with_config_hash(hash);
        }

        write_markdown_summary(&summary, results, path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        tracing::info!("Summary written to: {}", path.display());
    }

    Ok(())
}
