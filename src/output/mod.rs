//! Output module for tabular import and export
//!
//! This module handles:
//! - Projecting records onto fixed column schemas
//! - Writing CSV tables (optionally with a UTF-8 byte-order mark)
//! - Reading the profile URL column back from a crawl's CSV

mod csv_export;
mod input;
mod traits;

pub use csv_export::{export_table, write_table, ExportOptions};
pub use input::read_url_column;
pub use traits::{profile_columns, CrawlRow, TabularRecord, CRAWL_COLUMNS};

use crate::extract::ExtractedProfile;
use crate::state::EmployerRecord;
use crate::HarvestError;
use std::path::Path;

/// Writes the crawl table: UTF-8 without BOM, one timestamp for the whole run
pub fn export_employers(
    path: &Path,
    records: &[EmployerRecord],
    collected_at: &str,
) -> Result<usize, HarvestError> {
    let rows = CrawlRow::stamp(records, collected_at);
    export_table(path, &rows, &CRAWL_COLUMNS, ExportOptions::default())
}

/// Writes the profile table: UTF-8 with BOM, fifteen fixed columns
pub fn export_profiles(path: &Path, profiles: &[ExtractedProfile]) -> Result<usize, HarvestError> {
    export_table(
        path,
        profiles,
        &profile_columns(),
        ExportOptions {
            byte_order_mark: true,
        },
    )
}
