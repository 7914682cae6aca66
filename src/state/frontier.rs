//! Visited-set bookkeeping for one crawl run

use std::collections::HashSet;

/// Pages already visited during a crawl run
///
/// Lives for one run only; a restart begins empty.
#[derive(Debug, Clone)]
pub struct Frontier {
    visited_listings: HashSet<String>,
    visited_jobs: HashSet<String>,
    max_listing_pages: usize,
    max_job_pages: usize,
}

impl Frontier {
    pub fn new(max_listing_pages: usize, max_job_pages: usize) -> Self {
        Self {
            visited_listings: HashSet::new(),
            visited_jobs: HashSet::new(),
            max_listing_pages,
            max_job_pages,
        }
    }

    /// Marks a listing page visited; false if it was already visited
    pub fn visit_listing(&mut self, url: &str) -> bool {
        self.visited_listings.insert(url.to_string())
    }

    /// Marks a job page visited; false if it was already visited
    pub fn visit_job(&mut self, url: &str) -> bool {
        self.visited_jobs.insert(url.to_string())
    }

    pub fn job_visited(&self, url: &str) -> bool {
        self.visited_jobs.contains(url)
    }

    pub fn listings_visited(&self) -> usize {
        self.visited_listings.len()
    }

    pub fn jobs_visited(&self) -> usize {
        self.visited_jobs.len()
    }

    /// True once the listing-page bound is reached
    pub fn listing_limit_reached(&self) -> bool {
        self.visited_listings.len() >= self.max_listing_pages
    }

    /// True once the global job-page bound is reached
    pub fn job_limit_reached(&self) -> bool {
        self.visited_jobs.len() >= self.max_job_pages
    }
}
