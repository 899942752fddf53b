//! Core data structures for RPA processing
//!
//! Defines the supported test formats and their static layout descriptions,
//! the parsed and derived table types, and the per-file parse result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::app::services::rpa_parser::ParseStats;
use crate::constants::{
    CURE_COLUMNS, CURE_HEADER, DEFAULT_SMOOTHING_WINDOW, SCORCH_SMOOTHING_WINDOW, SWEEP_COLUMNS,
    SWEEP_HEADER, TEMPERATURE_OFFSET,
};
use crate::{Error, Result};

/// Test types exported by the instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestFormat {
    Cure,
    Scorch,
    Dynamic,
    Ive,
}

impl TestFormat {
    /// All supported formats in display order
    pub const ALL: [TestFormat; 4] = [
        TestFormat::Cure,
        TestFormat::Scorch,
        TestFormat::Dynamic,
        TestFormat::Ive,
    ];

    /// Short machine name used on the command line and in config files
    pub fn name(&self) -> &'static str {
        match self {
            TestFormat::Cure => "cure",
            TestFormat::Scorch => "scorch",
            TestFormat::Dynamic => "dynamic",
            TestFormat::Ive => "ive",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            TestFormat::Cure => "Cure Test",
            TestFormat::Scorch => "Scorch Test",
            TestFormat::Dynamic => "Dynamic Test",
            TestFormat::Ive => "IVE Test",
        }
    }

    /// Static layout description for this format
    pub fn spec(&self) -> FormatSpec {
        match self {
            TestFormat::Cure => FormatSpec {
                format: *self,
                header_signature: CURE_HEADER,
                temperature_anchor: CURE_HEADER,
                temperature_offset: TEMPERATURE_OFFSET,
                termination: TerminationPolicy::BlankLine,
                column_names: CURE_COLUMNS,
                header_skip: 0,
                smoothing_window: DEFAULT_SMOOTHING_WINDOW,
                keep_first_two_raw: false,
            },
            TestFormat::Scorch => FormatSpec {
                format: *self,
                header_signature: CURE_HEADER,
                temperature_anchor: CURE_HEADER,
                temperature_offset: TEMPERATURE_OFFSET,
                termination: TerminationPolicy::BlankLine,
                column_names: CURE_COLUMNS,
                header_skip: 0,
                smoothing_window: SCORCH_SMOOTHING_WINDOW,
                keep_first_two_raw: true,
            },
            TestFormat::Dynamic => FormatSpec {
                format: *self,
                header_signature: SWEEP_HEADER,
                temperature_anchor: SWEEP_HEADER,
                temperature_offset: TEMPERATURE_OFFSET,
                termination: TerminationPolicy::NonNumericFirstToken,
                column_names: SWEEP_COLUMNS,
                header_skip: 1,
                smoothing_window: DEFAULT_SMOOTHING_WINDOW,
                keep_first_two_raw: false,
            },
            // IVE exports carry the sweep header, but the temperature is read
            // relative to the cure header text.
            TestFormat::Ive => FormatSpec {
                format: *self,
                header_signature: SWEEP_HEADER,
                temperature_anchor: CURE_HEADER,
                temperature_offset: TEMPERATURE_OFFSET,
                termination: TerminationPolicy::EndOfFile,
                column_names: SWEEP_COLUMNS,
                header_skip: 1,
                smoothing_window: DEFAULT_SMOOTHING_WINDOW,
                keep_first_two_raw: false,
            },
        }
    }
}

impl fmt::Display for TestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TestFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cure" => Ok(TestFormat::Cure),
            "scorch" => Ok(TestFormat::Scorch),
            "dynamic" | "sweep" => Ok(TestFormat::Dynamic),
            "ive" => Ok(TestFormat::Ive),
            _ => Err(Error::unknown_format(s)),
        }
    }
}

/// Rule deciding where the data block of an export ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationPolicy {
    /// Every line after the header is data
    EndOfFile,
    /// Stop before the first line whose comma-separated fields are all empty
    BlankLine,
    /// Stop before the first line whose first field is not a number
    NonNumericFirstToken,
}

impl fmt::Display for TerminationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerminationPolicy::EndOfFile => "end_of_file",
            TerminationPolicy::BlankLine => "blank_line",
            TerminationPolicy::NonNumericFirstToken => "non_numeric_first_token",
        };
        f.write_str(name)
    }
}

/// Static layout description of one export variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    /// Format this layout belongs to
    pub format: TestFormat,
    /// Exact text of the column-header line
    pub header_signature: &'static str,
    /// Header text the temperature offset is measured from
    pub temperature_anchor: &'static str,
    /// Lines above the anchor where the temperature is recorded
    pub temperature_offset: usize,
    /// Where the data block ends
    pub termination: TerminationPolicy,
    /// Positional column names of data rows
    pub column_names: &'static [&'static str],
    /// Sub-header lines (units) between the header and the first data row
    pub header_skip: usize,
    /// Centered rolling-mean window
    pub smoothing_window: usize,
    /// Rows 0 and 1 of smoothed columns keep their raw values
    pub keep_first_two_raw: bool,
}

impl FormatSpec {
    /// Replace the termination policy
    pub fn with_termination(mut self, termination: TerminationPolicy) -> Self {
        self.termination = termination;
        self
    }

    /// Replace the number of skipped sub-header lines
    pub fn with_header_skip(mut self, header_skip: usize) -> Self {
        self.header_skip = header_skip;
        self
    }
}

/// Test temperature recorded in the export preamble
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestTemperature {
    /// Temperature in degrees Celsius
    Celsius(f64),
    /// The preamble line was missing or held no number
    Unavailable,
}

impl TestTemperature {
    /// Temperature value when available
    pub fn value(&self) -> Option<f64> {
        match self {
            TestTemperature::Celsius(t) => Some(*t),
            TestTemperature::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, TestTemperature::Celsius(_))
    }
}

impl fmt::Display for TestTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestTemperature::Celsius(t) => write!(f, "{t:.0}°C"),
            TestTemperature::Unavailable => f.write_str("n/a"),
        }
    }
}

/// Data rows of one export with positional column names
///
/// Cells are kept as text; every row has exactly one cell per column and
/// rows stay in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ParsedRecord {
    /// Build a record, padding short rows with empty cells
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a named column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of a named column in row order
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }
}

/// A numeric column produced by coercion or derivation; `None` marks a missing value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Parsed record plus derived numeric columns, row-aligned with the record
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTable {
    record: ParsedRecord,
    numeric: Vec<NumericColumn>,
}

impl DerivedTable {
    pub fn new(record: ParsedRecord) -> Self {
        Self {
            record,
            numeric: Vec::new(),
        }
    }

    pub fn record(&self) -> &ParsedRecord {
        &self.record
    }

    pub fn row_count(&self) -> usize {
        self.record.row_count()
    }

    /// Numeric columns in insertion order
    pub fn numeric_columns(&self) -> &[NumericColumn] {
        &self.numeric
    }

    /// Values of a numeric column
    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        self.numeric
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Add or replace a numeric column
    ///
    /// Columns whose length differs from the row count are rejected so the
    /// table stays row-aligned.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> bool {
        if values.len() != self.row_count() {
            return false;
        }
        let name = name.into();
        match self.numeric.iter_mut().find(|c| c.name == name) {
            Some(column) => column.values = values,
            None => self.numeric.push(NumericColumn { name, values }),
        }
        true
    }
}

/// Successful parse of one input file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    /// Identifying name of the input (file name or upload name)
    pub name: String,
    pub format: TestFormat,
    pub table: DerivedTable,
    pub temperature: TestTemperature,
    /// Where the header and data block were found
    pub stats: ParseStats,
}
