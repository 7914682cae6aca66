//! Extraction from parsed markup
//!
//! This module contains everything that reads HTML:
//! - Site rules (URL patterns, listing structure, navigation phrases)
//! - Link extraction from listing and job-detail pages
//! - A generic label lookup over markup trees
//! - Field extraction from employer profile pages

mod links;
mod profile;
mod site;
pub mod tree;

pub use links::{
    extract_company_url_from_job_page, extract_employer_ids, extract_job_links,
    extract_next_page_url,
};
pub use profile::{extract_profile, extract_profile_at, ExtractedProfile, ProfileField, ProfileRules};
pub use site::{AnchorMatcher, SiteRules};
