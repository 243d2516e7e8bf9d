//! CSV output for the merged feed

use crate::error::Result;
use crate::merge::{OutputRow, COLUMNS};
use std::io::Write;
use std::path::Path;

/// Write rows with a header line, replacing any existing file
pub fn write_rows_to_csv(rows: &[OutputRow], path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    write_rows(rows, file)
}

/// Write rows to any sink; returns the number of data rows
pub fn write_rows<W: Write>(rows: &[OutputRow], sink: W) -> Result<usize> {
    // header written by hand so an empty feed still has one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);
    writer.write_record(COLUMNS)?;

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    Ok(rows.len())
}
