//! Format dispatch for RPA exports
//!
//! This module wires the parsing stages together for one input: header
//! location, temperature extraction, data region slicing, record parsing and
//! metric derivation, driven by the selected format's layout.

use std::path::Path;
use tracing::{info, warn};

use super::header::{extract_temperature, locate_header};
use super::lines::{InputFile, RawLines};
use super::record_parser::parse_records;
use super::region::extract_region;
use super::stats::ParseStats;
use crate::Result;
use crate::app::models::{FormatSpec, ParsedFile, TestFormat};
use crate::app::services::metrics::derive_metrics;
use crate::config::{Config, FormatOverrides};

/// Parser for instrument exports of every supported test format
///
/// Holds no per-file state; one parser can be cloned into concurrent workers.
#[derive(Debug, Clone, Default)]
pub struct RpaParser {
    overrides: FormatOverrides,
}

impl RpaParser {
    /// Create a parser using the built-in format layouts
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser honouring per-format layout overrides from configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            overrides: config.formats.clone(),
        }
    }

    /// Effective layout for a format
    pub fn spec_for(&self, format: TestFormat) -> FormatSpec {
        self.overrides.apply(format.spec())
    }

    /// Read and parse a file from disk
    pub fn parse_path(&self, path: &Path, format: TestFormat) -> Result<ParsedFile> {
        let input = InputFile::from_path(path)?;
        self.parse(&input, format)
    }

    /// Parse an in-memory input
    pub fn parse(&self, input: &InputFile, format: TestFormat) -> Result<ParsedFile> {
        let lines = input.lines();
        self.parse_lines(&input.name, &lines, format)
    }

    /// Parse already decoded lines
    pub fn parse_lines(&self, name: &str, lines: &RawLines, format: TestFormat) -> Result<ParsedFile> {
        info!("Parsing {} file: {}", format.label(), name);

        let spec = self.spec_for(format);

        let header_index = locate_header(name, lines, &spec)?;
        let temperature = extract_temperature(name, lines, header_index, &spec);

        let region = extract_region(lines, header_index, spec.header_skip, spec.termination);
        let mut stats = ParseStats::new(lines.len(), header_index, &region);
        if region.is_empty() {
            warn!("{}: no data rows below the {} header", name, format);
        }

        let record = parse_records(name, region.lines, spec.column_names)?;
        stats.rows_parsed = record.row_count();

        let table = derive_metrics(record, &spec);

        info!(
            "Parsed {} rows from {} (temperature {}, {} trailing lines ignored)",
            stats.rows_parsed,
            name,
            temperature,
            stats.trailing_lines()
        );

        Ok(ParsedFile {
            name: name.to_string(),
            format,
            table,
            temperature,
            stats,
        })
    }
}
