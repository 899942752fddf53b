//! Data region extraction
//!
//! Instrument exports append summary text after the data block. Each format
//! declares how its block ends; the region returned here never contains the
//! terminating line or anything after it.

use super::lines::RawLines;
use crate::app::models::TerminationPolicy;

/// Contiguous block of data lines taken from an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRegion<'a> {
    /// Data lines in file order
    pub lines: &'a [String],
    /// Index of the first data line in the file
    pub start: usize,
    /// Index of the line that ended the block, if the policy stopped early
    pub terminator: Option<usize>,
}

impl DataRegion<'_> {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Slice the data block that follows the header at `header_index`
///
/// `header_skip` sub-header lines directly below the header are not data.
pub fn extract_region(
    lines: &RawLines,
    header_index: usize,
    header_skip: usize,
    policy: TerminationPolicy,
) -> DataRegion<'_> {
    let all = lines.as_slice();
    let start = header_index
        .saturating_add(1)
        .saturating_add(header_skip)
        .min(all.len());
    let candidates = &all[start..];

    let stop = match policy {
        TerminationPolicy::EndOfFile => None,
        TerminationPolicy::BlankLine => candidates.iter().position(|line| is_blank_row(line)),
        TerminationPolicy::NonNumericFirstToken => candidates
            .iter()
            .position(|line| !first_token_is_numeric(line)),
    };

    match stop {
        Some(offset) => DataRegion {
            lines: &candidates[..offset],
            start,
            terminator: Some(start + offset),
        },
        None => DataRegion {
            lines: candidates,
            start,
            terminator: None,
        },
    }
}

/// A row whose comma-separated fields are all empty after trimming
pub fn is_blank_row(line: &str) -> bool {
    line.split(',').all(|field| field.trim().is_empty())
}

/// Whether the first comma-separated field parses as a number
pub fn first_token_is_numeric(line: &str) -> bool {
    line.split(',')
        .next()
        .map(|token| token.trim().parse::<f64>().is_ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank_row() {
        assert!(is_blank_row(""));
        assert!(is_blank_row("   "));
        assert!(is_blank_row(",,,,"));
        assert!(is_blank_row(" , ,\t,"));
        assert!(!is_blank_row(",,1,"));
        assert!(!is_blank_row("End of test"));
    }

    #[test]
    fn test_first_token_is_numeric() {
        assert!(first_token_is_numeric("0.05,1,2"));
        assert!(first_token_is_numeric(" -1.5e2 ,x"));
        assert!(!first_token_is_numeric("Results,1,2"));
        assert!(!first_token_is_numeric(",1,2"));
        assert!(!first_token_is_numeric(""));
    }
}
