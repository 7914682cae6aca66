//! Employer registry
//!
//! One entry per employer identifier, accumulated over a crawl run. Later
//! evidence replaces the profile URL; the provenance fields are write-once.

use std::collections::HashMap;

/// Registry entry for one employer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployerRecord {
    /// Stable identifier taken from the site's URL scheme
    pub employer_id: String,

    /// Profile URL as most recently observed
    pub profile_url: String,

    /// First job page that led to this employer
    pub source_job_url: Option<String>,

    /// First listing page that led to this employer
    pub source_listing_url: Option<String>,
}

/// One sighting of an employer during the crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub employer_id: String,
    pub profile_url: String,
    pub job_url: Option<String>,
    pub listing_url: Option<String>,
}

impl Observation {
    /// Employer linked directly from a listing page
    pub fn from_listing(employer_id: &str, profile_url: String, listing_url: &str) -> Self {
        Self {
            employer_id: employer_id.to_string(),
            profile_url,
            job_url: None,
            listing_url: Some(listing_url.to_string()),
        }
    }

    /// Employer found on a job page reached from a listing page
    pub fn from_job(employer_id: &str, profile_url: String, job_url: &str, listing_url: &str) -> Self {
        Self {
            employer_id: employer_id.to_string(),
            profile_url,
            job_url: Some(job_url.to_string()),
            listing_url: Some(listing_url.to_string()),
        }
    }
}

/// Applies an observation to an existing entry (or to nothing)
///
/// - `profile_url` always takes the observed value
/// - `source_job_url` / `source_listing_url` are filled only while unset or empty
///
/// Applying the same observation twice gives the same entry as applying it once.
pub fn merge(existing: Option<&EmployerRecord>, observation: &Observation) -> EmployerRecord {
    match existing {
        None => EmployerRecord {
            employer_id: observation.employer_id.clone(),
            profile_url: observation.profile_url.clone(),
            source_job_url: non_empty(&observation.job_url),
            source_listing_url: non_empty(&observation.listing_url),
        },
        Some(record) => EmployerRecord {
            employer_id: record.employer_id.clone(),
            profile_url: observation.profile_url.clone(),
            source_job_url: non_empty(&record.source_job_url).or_else(|| non_empty(&observation.job_url)),
            source_listing_url: non_empty(&record.source_listing_url)
                .or_else(|| non_empty(&observation.listing_url)),
        },
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Keyed store of employer records, kept in discovery order
#[derive(Debug, Clone, Default)]
pub struct Registry {
    records: Vec<EmployerRecord>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, employer_id: &str) -> bool {
        self.index.contains_key(employer_id)
    }

    pub fn get(&self, employer_id: &str) -> Option<&EmployerRecord> {
        self.index.get(employer_id).map(|&i| &self.records[i])
    }

    /// Inserts the observation only if the identifier is unseen
    ///
    /// Returns true if a new entry was created.
    pub fn register_if_absent(&mut self, observation: &Observation) -> bool {
        if self.contains(&observation.employer_id) {
            return false;
        }
        self.insert_new(merge(None, observation));
        true
    }

    /// Merges the observation into the registry, creating the entry if needed
    pub fn merge(&mut self, observation: &Observation) -> &EmployerRecord {
        match self.index.get(&observation.employer_id).copied() {
            Some(i) => {
                let updated = merge(Some(&self.records[i]), observation);
                self.records[i] = updated;
                &self.records[i]
            }
            None => {
                let i = self.insert_new(merge(None, observation));
                &self.records[i]
            }
        }
    }

    /// Records in discovery order
    pub fn records(&self) -> &[EmployerRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EmployerRecord> {
        self.records
    }

    fn insert_new(&mut self, record: EmployerRecord) -> usize {
        let i = self.records.len();
        self.index.insert(record.employer_id.clone(), i);
        self.records.push(record);
        i
    }
}

/// Canonical profile URLs sorted by numeric identifier
///
/// Non-numeric identifiers sort after numeric ones, by text.
pub fn build_profile_urls<F>(records: &[EmployerRecord], profile_url: F) -> Vec<String>
where
    F: Fn(&str) -> String,
{
    let mut ids: Vec<&str> = records.iter().map(|r| r.employer_id.as_str()).collect();
    ids.sort_by_key(|id| (id.parse::<u64>().map_err(|_| ()), id.to_string()));
    ids.into_iter().map(profile_url).collect()
}
