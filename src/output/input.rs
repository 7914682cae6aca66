//! Reading profile URLs from a CSV file

use crate::HarvestError;
use std::fs::File;
use std::path::Path;

/// Reads every non-empty value of `column` from a CSV file with a header row
///
/// A leading UTF-8 byte-order mark on the header is ignored.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Trimmed values in file order
/// * `Err(HarvestError::Io)` - The file could not be opened
/// * `Err(HarvestError::MissingColumn)` - The header lacks `column`
pub fn read_url_column(path: &Path, column: &str) -> Result<Vec<String>, HarvestError> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let position = reader
        .headers()?
        .iter()
        .position(|header| header.trim_start_matches('\u{feff}').trim() == column)
        .ok_or_else(|| HarvestError::MissingColumn {
            path: path.display().to_string(),
            column: column.to_string(),
        })?;

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(position).map(str::trim) {
            if !value.is_empty() {
                urls.push(value.to_string());
            }
        }
    }

    Ok(urls)
}
