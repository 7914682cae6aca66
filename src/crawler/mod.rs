//! Crawler module for page fetching and traversal
//!
//! This module contains the network-facing logic, including:
//! - HTTP fetching with bounded retry and linear backoff
//! - Sleep capability and politeness delays
//! - Listing/job traversal that builds the employer registry
//! - The profile-scrape batch driver

mod coordinator;
mod fetcher;
mod pacing;
mod profiles;
mod retry;

pub use coordinator::{Coordinator, CrawlReport, CrawlSettings, StopReason};
pub use fetcher::{build_http_client, Fetcher, HttpTransport, RawResponse, StatusPolicy, Transport};
pub use pacing::{PolitenessDelay, RecordingSleeper, Sleeper, TokioSleeper};
pub use profiles::scrape_profiles;
pub use retry::{RetryDecision, RetryPolicy};

use crate::config::Config;
use crate::extract::{ExtractedProfile, ProfileRules, SiteRules};
use crate::HarvestError;
use std::time::Duration;

/// Builds the production fetcher: reqwest transport, tokio timer
pub fn build_fetcher(config: &Config) -> Result<Fetcher<HttpTransport, TokioSleeper>, HarvestError> {
    let transport = HttpTransport::from_config(&config.fetcher)?;
    Ok(Fetcher::new(
        transport,
        TokioSleeper,
        RetryPolicy::from_config(&config.fetcher),
    ))
}

/// Runs a complete listing crawl
///
/// # Arguments
///
/// * `config` - The harvester configuration (seed, bounds, site rules)
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The crawl ran; the report holds whatever was found,
///   even if a listing page failed midway
/// * `Err(HarvestError)` - The configuration could not be turned into a crawl
///
/// # Example
///
/// ```no_run
/// use employer_harvest::config::Config;
/// use employer_harvest::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl(&Config::default()).await?;
/// println!("{} employers", report.registry.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config) -> Result<CrawlReport, HarvestError> {
    let rules = SiteRules::compile(&config.site)?;
    let settings = CrawlSettings::from_config(&config.crawl)?;
    let fetcher = build_fetcher(config)?;

    Ok(Coordinator::new(fetcher, rules, settings).run().await)
}

/// Scrapes every profile URL with the production fetcher
pub async fn scrape(config: &Config, urls: &[String]) -> Result<Vec<ExtractedProfile>, HarvestError> {
    let rules = ProfileRules::compile(&config.profile)?;
    let fetcher = build_fetcher(config)?;
    let pause = Duration::from_millis(config.profile.delay_ms);

    Ok(scrape_profiles(&fetcher, &rules, urls, pause).await)
}
