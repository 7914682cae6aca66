//! Tabular record trait and the row types that implement it

use crate::extract::{ExtractedProfile, ProfileField};
use crate::state::EmployerRecord;

/// A record that can be projected onto named columns
///
/// `None` means the record has no value for that column, either because it
/// was never found or because the column is not part of the record at all.
pub trait TabularRecord {
    fn value(&self, column: &str) -> Option<&str>;
}

impl TabularRecord for ExtractedProfile {
    fn value(&self, column: &str) -> Option<&str> {
        ProfileField::from_header(column).and_then(|field| self.get(field))
    }
}

/// Columns of the crawl output, in order
pub const CRAWL_COLUMNS: [&str; 5] = [
    "company_id",
    "job_url",
    "company_url",
    "collected_at",
    "source_listing_url",
];

/// Columns of the profile output, in order
pub fn profile_columns() -> Vec<&'static str> {
    ProfileField::ALL.iter().map(|f| f.header()).collect()
}

/// One crawl output row: a registry entry plus the run's collection time
#[derive(Debug, Clone, Copy)]
pub struct CrawlRow<'a> {
    pub record: &'a EmployerRecord,
    pub collected_at: &'a str,
}

impl<'a> CrawlRow<'a> {
    /// Pairs every record with the same timestamp
    pub fn stamp(records: &'a [EmployerRecord], collected_at: &'a str) -> Vec<Self> {
        records
            .iter()
            .map(|record| Self {
                record,
                collected_at,
            })
            .collect()
    }
}

impl TabularRecord for CrawlRow<'_> {
    fn value(&self, column: &str) -> Option<&str> {
        match column {
            "company_id" => Some(self.record.employer_id.as_str()),
            "job_url" => self.record.source_job_url.as_deref(),
            "company_url" => Some(self.record.profile_url.as_str()),
            "collected_at" => Some(self.collected_at),
            "source_listing_url" => self.record.source_listing_url.as_deref(),
            _ => None,
        }
    }
}
