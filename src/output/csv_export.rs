//! CSV export
//!
//! Absent values become empty cells here and nowhere earlier.

use crate::output::traits::TabularRecord;
use crate::HarvestError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encoding options for an exported table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportOptions {
    /// Prefix the file with a UTF-8 byte-order mark (spreadsheet friendly)
    pub byte_order_mark: bool,
}

/// Writes a header row and one row per record to `writer`
///
/// # Returns
///
/// * `Ok(n)` - Number of data rows written; an empty input writes nothing
/// * `Err(HarvestError)` - The writer failed
pub fn write_table<W, R>(
    mut writer: W,
    rows: &[R],
    columns: &[&str],
    options: ExportOptions,
) -> Result<usize, HarvestError>
where
    W: Write,
    R: TabularRecord,
{
    if rows.is_empty() {
        tracing::warn!("No rows to export");
        return Ok(0);
    }

    if options.byte_order_mark {
        writer.write_all(UTF8_BOM)?;
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(columns)?;

    for row in rows {
        csv_writer.write_record(columns.iter().map(|column| row.value(column).unwrap_or("")))?;
    }

    csv_writer.flush()?;
    Ok(rows.len())
}

/// Exports a table to a file
///
/// An empty input logs a warning and leaves the file system untouched.
pub fn export_table<R: TabularRecord>(
    path: &Path,
    rows: &[R],
    columns: &[&str],
    options: ExportOptions,
) -> Result<usize, HarvestError> {
    if rows.is_empty() {
        tracing::warn!("No rows to export, {} not written", path.display());
        return Ok(0);
    }

    let file = BufWriter::new(File::create(path)?);
    let written = write_table(file, rows, columns, options)?;
    tracing::info!("Saved {} rows to {}", written, path.display());
    Ok(written)
}
