//! Parser for RPA rheometer export files
//!
//! Instrument exports start with a free-form preamble, followed by a fixed
//! column-header line, optional unit rows, the data block and trailing summary
//! text. This module turns one export into a typed, derived table.
//!
//! ## Architecture
//!
//! The parser is organized into logical components:
//! - [`lines`] - Input resources and lenient line decoding
//! - [`header`] - Header location and test-temperature extraction
//! - [`region`] - Data block slicing under a termination policy
//! - [`record_parser`] - Positional record parsing
//! - [`parser`] - Per-format orchestration
//! - [`stats`] - Layout statistics for reporting
//!
//! ## Usage
//!
//! ```rust
//! use rpa_processor::{InputFile, RpaParser, TestFormat};
//!
//! # fn example(bytes: Vec<u8>) -> rpa_processor::Result<()> {
//! let parser = RpaParser::new();
//! let parsed = parser.parse(&InputFile::new("mix1.erp", bytes), TestFormat::Cure)?;
//!
//! println!("{} rows at {}", parsed.table.row_count(), parsed.temperature);
//! # Ok(())
//! # }
//! ```

pub mod header;
pub mod lines;
pub mod parser;
pub mod record_parser;
pub mod region;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use lines::{InputFile, RawLines, name_for_path};
pub use parser::RpaParser;
pub use region::DataRegion;
pub use stats::ParseStats;
