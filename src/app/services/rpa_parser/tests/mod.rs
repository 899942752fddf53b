//! Test utilities for RPA export parsing
//!
//! Builders for synthetic instrument exports with a preamble, a temperature
//! line, the column header, optional unit rows, data rows and trailing text.

use std::io::Write;
use tempfile::NamedTempFile;

use crate::constants::{CURE_HEADER, SWEEP_HEADER};

// Test modules
mod header_tests;

/// Preamble line carrying the test temperature
pub const TEMPERATURE_LINE: &str = "Test Temperature,C,177.0";

/// Unit row written below the sweep header
pub const SWEEP_UNITS: &str = "Cond,Stat,min,C,C,%,Hz,%,C,,dNm,dNm,dNm,kPa,kPa,kPa,\
1/MPa,1/MPa,1/MPa,Pa-s,Pa-s,Pa-s,,kPa,,,bar";

/// Summary text appended after the data block
pub const FOOTER: &[&str] = &[
    "Results",
    "ML,dNm,1.20",
    "MH,dNm,20.50",
    "TS2,min,0.85",
    "TC90,min,4.10",
];

/// One cure/scorch data row with the given time, torque and storage modulus
pub fn cure_row(time: f64, sp: f64, gp: f64) -> String {
    format!("{time},7.0,{sp},0.1,{sp},{gp},0.2,{gp},0,0,0,0,0,0,0.05,177,177,177,4.5,0,0,0")
}

/// One sweep data row
pub fn sweep_row(strain: f64, freq: f64, gp: f64, gpp: f64, tdelt: f64) -> String {
    format!(
        "1,0,0.5,100,100,{strain},{freq},{strain},100,,{gp},0.1,{gp},{gp},{gpp},{gp},0,0,0,0,0,0,{tdelt},0,0,0,4.5"
    )
}

/// Synthetic export assembled line by line
#[derive(Debug, Clone)]
pub struct ExportBuilder {
    header_index: usize,
    header: &'static str,
    temperature: Option<String>,
    sub_header: Option<String>,
    rows: Vec<String>,
    tail: Vec<String>,
}

impl ExportBuilder {
    /// Export whose header sits at `header_index`, with the temperature line
    /// ten lines above it when there is room
    pub fn new(header: &'static str, header_index: usize) -> Self {
        Self {
            header_index,
            header,
            temperature: Some(TEMPERATURE_LINE.to_string()),
            sub_header: None,
            rows: Vec::new(),
            tail: Vec::new(),
        }
    }

    pub fn cure(header_index: usize) -> Self {
        Self::new(CURE_HEADER, header_index)
    }

    pub fn sweep(header_index: usize) -> Self {
        Self::new(SWEEP_HEADER, header_index).sub_header(SWEEP_UNITS)
    }

    pub fn temperature(mut self, line: Option<&str>) -> Self {
        self.temperature = line.map(str::to_string);
        self
    }

    pub fn sub_header(mut self, line: &str) -> Self {
        self.sub_header = Some(line.to_string());
        self
    }

    pub fn rows<I: IntoIterator<Item = String>>(mut self, rows: I) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Lines written after the data rows, in order
    pub fn tail(mut self, lines: &[&str]) -> Self {
        self.tail.extend(lines.iter().map(|l| l.to_string()));
        self
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = (0..self.header_index)
            .map(|i| format!("Preamble,{i},Operator notes"))
            .collect();

        if let (Some(temperature), Some(index)) =
            (&self.temperature, self.header_index.checked_sub(10))
        {
            lines[index] = temperature.clone();
        }

        lines.push(self.header.to_string());
        lines.extend(self.sub_header.iter().cloned());
        lines.extend(self.rows.iter().cloned());
        lines.extend(self.tail.iter().cloned());
        lines
    }

    pub fn build(&self) -> String {
        self.lines().join("\n")
    }
}

/// Cure rows with rising torque
pub fn cure_rows(count: usize) -> impl Iterator<Item = String> {
    (0..count).map(|i| cure_row(i as f64 * 0.1, 1.0 + i as f64, 2.0 + i as f64))
}

/// Sweep rows with rising strain
pub fn sweep_rows(count: usize) -> impl Iterator<Item = String> {
    (0..count).map(|i| {
        let gp = 100.0 - i as f64;
        sweep_row(1.0 + i as f64, 1.0, gp, gp / 2.0, gp / 5.0)
    })
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}
