//! Positional record parsing for data regions
//!
//! Data rows carry no header of their own; cells are named by position from
//! the format's column list. Short rows are padded with empty cells. Rows
//! wider than the schema are accepted only when the surplus fields are empty
//! (trailing commas written by some firmware); anything else fails the file.
//!
//! Instrument rows are never quoted, so quote characters are kept as cell
//! text. Row numbers in errors are 1-based lines of the data region.

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::app::models::ParsedRecord;
use crate::{Error, Result};

/// Parse data lines into a record with the given positional column names
pub fn parse_records(file: &str, lines: &[String], columns: &[&str]) -> Result<ParsedRecord> {
    let width = columns.len();
    let data = lines.join("\n");

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .quoting(false)
        .from_reader(data.as_bytes());

    let mut rows = Vec::with_capacity(lines.len());
    let mut padded = 0usize;

    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            let line = e.position().map_or(index + 1, |p| p.line() as usize);
            Error::malformed_row(file, line, e.to_string())
        })?;
        // the reader skips empty lines, so records and lines can diverge
        let row_number = record.position().map_or(index + 1, |p| p.line() as usize);

        check_width(file, row_number, &record, width)?;
        if record.len() < width {
            padded += 1;
        }

        rows.push(record.iter().take(width).map(str::to_string).collect());
    }

    if padded > 0 {
        debug!("{}: padded {} short rows to {} columns", file, padded, width);
    }

    Ok(ParsedRecord::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows,
    ))
}

fn check_width(file: &str, row: usize, record: &StringRecord, width: usize) -> Result<()> {
    let surplus = record
        .iter()
        .skip(width)
        .filter(|field| !field.is_empty())
        .count();

    if surplus > 0 {
        return Err(Error::malformed_row(
            file,
            row,
            format!(
                "expected at most {} fields, found {} with {} non-empty surplus",
                width,
                record.len(),
                surplus
            ),
        ));
    }
    Ok(())
}
