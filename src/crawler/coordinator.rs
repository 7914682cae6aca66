//! Crawl coordinator - listing/job traversal
//!
//! Walks listing pages from a seed, following "next page" links, and visits
//! the job-detail pages each listing page links to. Employers are registered
//! as they are found:
//! - directly on a listing page (provenance: that listing page)
//! - on a job page (provenance: that job page and its listing page)
//! - through a job page's "more about this company" link, merged so the
//!   profile URL is refreshed and unset provenance is filled
//!
//! A failed listing fetch ends the run; a failed job fetch is skipped.

use crate::config::CrawlConfig;
use crate::crawler::fetcher::{Fetcher, StatusPolicy, Transport};
use crate::crawler::pacing::{PolitenessDelay, Sleeper};
use crate::extract::{
    extract_company_url_from_job_page, extract_employer_ids, extract_job_links,
    extract_next_page_url, SiteRules,
};
use crate::state::{Frontier, Observation, Registry};
use crate::HarvestError;
use scraper::Html;
use std::collections::BTreeSet;
use url::Url;

/// Bounds and pacing of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub seed_url: Url,
    pub max_listing_pages: usize,
    pub max_job_pages: usize,
    pub delay: PolitenessDelay,
}

impl CrawlSettings {
    pub fn from_config(config: &CrawlConfig) -> Result<Self, HarvestError> {
        Ok(Self {
            seed_url: Url::parse(&config.seed_url)?,
            max_listing_pages: config.max_listing_pages,
            max_job_pages: config.max_job_pages,
            delay: PolitenessDelay::from_millis(config.delay_min_ms, config.delay_max_ms),
        })
    }
}

/// Why the listing loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The last listing page had no usable next-page link
    NoNextPage,
    /// The next-page link pointed at an already visited listing page
    Cycle(String),
    /// A listing page could not be fetched
    ListingUnavailable(String),
    /// The listing-page bound was reached with pages left
    ListingLimit,
}

/// Everything a crawl run produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub registry: Registry,
    pub listing_pages: usize,
    pub job_pages: usize,
    pub stop_reason: StopReason,
}

/// What a listing page offers
struct ListingPage {
    employer_ids: BTreeSet<String>,
    job_links: BTreeSet<Url>,
    next_page: Option<Url>,
}

/// What a job page offers
struct JobPage {
    employer_ids: BTreeSet<String>,
    company_url: Option<Url>,
}

/// Main crawl engine
///
/// Owns the frontier and the registry for the length of one run; `run`
/// consumes the engine and hands the registry back in the report.
pub struct Coordinator<T, S> {
    fetcher: Fetcher<T, S>,
    rules: SiteRules,
    settings: CrawlSettings,
    frontier: Frontier,
    registry: Registry,
}

impl<T: Transport, S: Sleeper> Coordinator<T, S> {
    pub fn new(fetcher: Fetcher<T, S>, rules: SiteRules, settings: CrawlSettings) -> Self {
        let frontier = Frontier::new(settings.max_listing_pages, settings.max_job_pages);
        Self {
            fetcher,
            rules,
            settings,
            frontier,
            registry: Registry::new(),
        }
    }

    /// Runs the listing loop to completion
    pub async fn run(mut self) -> CrawlReport {
        let mut listing_url = Some(self.settings.seed_url.clone());
        let mut stop_reason = StopReason::NoNextPage;

        while let Some(current) = listing_url.take() {
            if self.frontier.listing_limit_reached() {
                tracing::info!(
                    "Reached max listing pages ({}), stopping before {}",
                    self.settings.max_listing_pages,
                    current
                );
                stop_reason = StopReason::ListingLimit;
                break;
            }

            if !self.frontier.visit_listing(current.as_str()) {
                tracing::info!("Already visited listing: {}", current);
                stop_reason = StopReason::Cycle(current.to_string());
                break;
            }

            tracing::info!(
                "Listing page {}: {}",
                self.frontier.listings_visited(),
                current
            );

            let body = match self.fetcher.fetch(current.as_str(), StatusPolicy::RequireOk).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::error!("Stopping crawl, listing page unavailable: {}", e);
                    stop_reason = StopReason::ListingUnavailable(current.to_string());
                    break;
                }
            };

            let page = self.read_listing_page(&body, &current);
            self.register_listing_employers(&page.employer_ids, &current);
            tracing::info!("  listing: found {} job links", page.job_links.len());

            self.visit_job_pages(&page.job_links, &current).await;

            self.pause().await;

            listing_url = page.next_page;
            if listing_url.is_none() {
                stop_reason = StopReason::NoNextPage;
            }
        }

        tracing::info!(
            "Crawl finished ({:?}): {} listing pages, {} job pages, {} employers",
            stop_reason,
            self.frontier.listings_visited(),
            self.frontier.jobs_visited(),
            self.registry.len()
        );

        CrawlReport {
            listing_pages: self.frontier.listings_visited(),
            job_pages: self.frontier.jobs_visited(),
            registry: self.registry,
            stop_reason,
        }
    }

    async fn visit_job_pages(&mut self, job_links: &BTreeSet<Url>, listing_url: &Url) {
        for job_url in job_links {
            if self.frontier.job_limit_reached() {
                tracing::warn!(
                    "Reached max job pages ({})",
                    self.settings.max_job_pages
                );
                break;
            }
            if !self.frontier.visit_job(job_url.as_str()) {
                continue;
            }

            tracing::info!("  job page: {}", job_url);
            let body = match self.fetcher.fetch(job_url.as_str(), StatusPolicy::RequireOk).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("  skipping job page: {}", e);
                    continue;
                }
            };

            let page = self.read_job_page(&body, job_url);
            self.register_job_employers(&page, job_url, listing_url);

            self.pause().await;
        }
    }

    fn register_listing_employers(&mut self, ids: &BTreeSet<String>, listing_url: &Url) {
        let mut new_ids = 0;
        for id in ids {
            let observation =
                Observation::from_listing(id, self.rules.profile_url(id), listing_url.as_str());
            if self.registry.register_if_absent(&observation) {
                new_ids += 1;
            }
        }
        if new_ids > 0 {
            tracing::info!("  listing: found {} new employer IDs", new_ids);
        }
    }

    fn register_job_employers(&mut self, page: &JobPage, job_url: &Url, listing_url: &Url) {
        let mut new_ids = 0;
        for id in &page.employer_ids {
            let observation = Observation::from_job(
                id,
                self.rules.profile_url(id),
                job_url.as_str(),
                listing_url.as_str(),
            );
            if self.registry.register_if_absent(&observation) {
                new_ids += 1;
            }
        }
        if new_ids > 0 {
            tracing::info!("   job: found {} new employer IDs from {}", new_ids, job_url);
        }

        let Some(company_url) = &page.company_url else {
            return;
        };
        match self.rules.employer_id_in(company_url.path()) {
            Some(id) => {
                let observation = Observation::from_job(
                    &id,
                    company_url.to_string(),
                    job_url.as_str(),
                    listing_url.as_str(),
                );
                self.registry.merge(&observation);
            }
            None => tracing::debug!("Company link {} carries no employer ID", company_url),
        }
    }

    fn read_listing_page(&self, body: &str, url: &Url) -> ListingPage {
        let document = Html::parse_document(body);
        ListingPage {
            employer_ids: extract_employer_ids(&document, url, &self.rules),
            job_links: extract_job_links(&document, url, &self.rules),
            next_page: extract_next_page_url(&document, url, &self.rules),
        }
    }

    fn read_job_page(&self, body: &str, url: &Url) -> JobPage {
        let document = Html::parse_document(body);
        JobPage {
            employer_ids: extract_employer_ids(&document, url, &self.rules),
            company_url: extract_company_url_from_job_page(&document, url, &self.rules),
        }
    }

    async fn pause(&self) {
        self.fetcher.sleeper().sleep(self.settings.delay.sample()).await;
    }
}
