//! State module for tracking crawl progress
//!
//! This module provides the process-local state of one crawl run.
//!
//! # Components
//!
//! - `Frontier`: visited listing and job pages, with the page-count bounds
//! - `Registry`: one `EmployerRecord` per employer identifier, with the merge rule

mod frontier;
mod registry;

// Re-export main types
pub use frontier::Frontier;
pub use registry::{build_profile_urls, merge, EmployerRecord, Observation, Registry};
