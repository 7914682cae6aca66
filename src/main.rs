//! Employer-harvest main entry point
//!
//! This is the command-line interface for the listing crawler and the
//! employer-profile scraper.

use anyhow::Context;
use clap::{Parser, Subcommand};
use employer_harvest::config::{load_config_with_hash, validate, Config};
use employer_harvest::crawler::{crawl, scrape, StopReason};
use employer_harvest::extract::SiteRules;
use employer_harvest::output::{export_employers, export_profiles, read_url_column};
use employer_harvest::state::build_profile_urls;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Employer-harvest: employer discovery and profile extraction
///
/// `crawl` walks paginated job listings and records every employer found;
/// `scrape` visits employer profile pages and extracts their details.
#[derive(Parser, Debug)]
#[command(name = "employer-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Job-listing employer crawler and profile scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl listing and job pages, writing one row per employer
    Crawl {
        /// First listing page
        #[arg(long, value_name = "URL")]
        seed: Option<String>,

        /// Maximum number of listing pages to visit
        #[arg(long)]
        max_listing_pages: Option<usize>,

        /// Maximum number of job pages to visit across the whole run
        #[arg(long)]
        max_job_pages: Option<usize>,

        /// CSV file to write
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Scrape the discovered profiles right after the crawl
        #[arg(long)]
        scrape_profiles: bool,
    },

    /// Scrape employer profile pages listed in a CSV file
    Scrape {
        /// CSV file holding the profile URL column
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// CSV file to write
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl {
            seed,
            max_listing_pages,
            max_job_pages,
            output,
            scrape_profiles,
        } => {
            if let Some(seed) = seed {
                config.crawl.seed_url = seed;
            }
            if let Some(max) = max_listing_pages {
                config.crawl.max_listing_pages = max;
            }
            if let Some(max) = max_job_pages {
                config.crawl.max_job_pages = max;
            }
            if let Some(output) = output {
                config.crawl.output_path = output.display().to_string();
            }
            validate(&config).context("Invalid configuration")?;
            handle_crawl(&config, scrape_profiles).await
        }
        Command::Scrape { input, output } => {
            if let Some(input) = input {
                config.profile.input_path = input.display().to_string();
            }
            if let Some(output) = output {
                config.profile.output_path = output.display().to_string();
            }
            validate(&config).context("Invalid configuration")?;
            handle_scrape(&config).await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("employer_harvest=info,warn"),
            1 => EnvFilter::new("employer_harvest=debug,info"),
            2 => EnvFilter::new("employer_harvest=trace,debug"),
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

/// Loads the configuration file, or the built-in defaults
fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Ok(Config::default())
        }
    }
}

/// Handles the crawl operation
async fn handle_crawl(config: &Config, then_scrape: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Starting crawl at {} (max {} listing pages, {} job pages)",
        config.crawl.seed_url,
        config.crawl.max_listing_pages,
        config.crawl.max_job_pages
    );

    let report = crawl(config).await.context("Crawl could not start")?;

    match &report.stop_reason {
        StopReason::NoNextPage => tracing::info!("No next listing page, crawl finished"),
        StopReason::Cycle(url) => tracing::info!("Listing pages loop back to {}", url),
        StopReason::ListingLimit => tracing::info!("Listing page limit reached"),
        StopReason::ListingUnavailable(url) => {
            tracing::warn!("Crawl ended early, listing page unavailable: {}", url)
        }
    }
    tracing::info!(
        "Visited {} listing pages and {} job pages, found {} employers",
        report.listing_pages,
        report.job_pages,
        report.registry.len()
    );

    let collected_at = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();
    let output = Path::new(&config.crawl.output_path);
    export_employers(output, report.registry.records(), &collected_at)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if then_scrape {
        let rules = SiteRules::compile(&config.site)?;
        let urls = build_profile_urls(report.registry.records(), |id| rules.profile_url(id));
        scrape_and_export(config, &urls).await?;
    }

    Ok(())
}

/// Handles the profile-scrape operation
async fn handle_scrape(config: &Config) -> anyhow::Result<()> {
    let input = Path::new(&config.profile.input_path);
    let urls = read_url_column(input, &config.profile.url_column)
        .with_context(|| format!("Failed to read profile URLs from {}", input.display()))?;

    scrape_and_export(config, &urls).await
}

async fn scrape_and_export(config: &Config, urls: &[String]) -> anyhow::Result<()> {
    tracing::info!("Scraping {} profile pages", urls.len());

    let profiles = scrape(config, urls).await.context("Profile scrape could not start")?;
    tracing::info!("Extracted {} of {} profiles", profiles.len(), urls.len());

    let output = Path::new(&config.profile.output_path);
    export_profiles(output, &profiles)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(())
}
