//! Per-file parsing statistics
//!
//! Records where the header and data block were found so callers can report
//! what the parser kept and where it stopped.

use serde::Serialize;

use super::region::DataRegion;

/// Layout facts gathered while parsing one file (line indices are 0-based)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Total decoded lines in the file
    pub total_lines: usize,

    /// Index of the column-header line
    pub header_index: usize,

    /// Index of the first line of the data region
    pub data_start: usize,

    /// Number of lines in the data region
    pub region_lines: usize,

    /// Line that ended the data region, when the policy stopped early
    pub terminator_index: Option<usize>,

    /// Rows produced by the record parser
    pub rows_parsed: usize,
}

impl ParseStats {
    /// Build statistics from a located header and its data region
    pub fn new(total_lines: usize, header_index: usize, region: &DataRegion<'_>) -> Self {
        Self {
            total_lines,
            header_index,
            data_start: region.start,
            region_lines: region.len(),
            terminator_index: region.terminator,
            rows_parsed: 0,
        }
    }

    /// Lines after the data region that were not parsed
    pub fn trailing_lines(&self) -> usize {
        self.total_lines
            .saturating_sub(self.data_start + self.region_lines)
    }
}
