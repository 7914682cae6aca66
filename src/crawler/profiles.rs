//! Profile-scrape batch driver
//!
//! Fetches each employer profile in turn and extracts its fields. A URL that
//! cannot be fetched is logged and skipped; the fixed pause follows every
//! URL, successful or not.

use crate::crawler::fetcher::{Fetcher, StatusPolicy, Transport};
use crate::crawler::pacing::Sleeper;
use crate::extract::{extract_profile, ExtractedProfile, ProfileRules};
use scraper::Html;
use std::time::Duration;

/// Scrapes profile pages sequentially
pub async fn scrape_profiles<T, S>(
    fetcher: &Fetcher<T, S>,
    rules: &ProfileRules,
    urls: &[String],
    pause: Duration,
) -> Vec<ExtractedProfile>
where
    T: Transport,
    S: Sleeper,
{
    let mut profiles = Vec::with_capacity(urls.len());

    for url in urls {
        tracing::info!("Scraping: {}", url);

        match fetcher.fetch(url, StatusPolicy::RequireSuccess).await {
            Ok(body) => profiles.push(read_profile(&body, url, rules)),
            Err(e) => tracing::error!("Failed to scrape {}: {}", url, e),
        }

        fetcher.sleeper().sleep(pause).await;
    }

    tracing::info!("Scraped {} of {} profiles", profiles.len(), urls.len());
    profiles
}

fn read_profile(body: &str, url: &str, rules: &ProfileRules) -> ExtractedProfile {
    let document = Html::parse_document(body);
    extract_profile(&document, url, rules)
}
