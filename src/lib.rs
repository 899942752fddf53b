//! RPA Processor Library
//!
//! A Rust library for turning rubber process analyzer (RPA) rheometer exports
//! into typed, smoothed tables ready for plotting and reporting.
//!
//! This library provides tools for:
//! - Locating the instrument column header inside a semi-structured text export
//! - Recovering the recorded test temperature from a fixed offset above the header
//! - Slicing the valid data block under per-format termination policies
//! - Deriving smoothed torque, cure state and tan delta columns per test type
//! - Computing key values (cure times, scorch times, strain-sweep tan delta)
//! - Processing batches of files concurrently with per-file failure isolation

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod batch;
        pub mod export;
        pub mod key_values;
        pub mod metrics;
        pub mod rpa_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    DerivedTable, FormatSpec, ParsedFile, ParsedRecord, TerminationPolicy, TestFormat,
    TestTemperature,
};
pub use app::services::rpa_parser::{InputFile, RpaParser};
pub use config::Config;

/// Result type alias for the RPA processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for RPA processing operations
///
/// Structural failures (`HeaderNotFound`, `MalformedRow`) are fatal for one
/// file only; value-level problems never surface here and degrade to missing
/// values instead.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error for '{file}': {message}")]
    Io {
        file: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// No line of the file matches the expected column header
    #[error("Header not found in file '{file}': no line matches the {format} header")]
    HeaderNotFound { file: String, format: TestFormat },

    /// Data region cannot be parsed into the expected columnar shape
    #[error("Malformed row {row} in file '{file}': {message}")]
    MalformedRow {
        file: String,
        row: usize,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Writing a derived table failed
    #[error("Export error for '{file}': {message}")]
    Export {
        file: String,
        message: String,
        #[source]
        source: Option<polars::error::PolarsError>,
    },

    /// Unknown test format name
    #[error("Unknown test format: {name}")]
    UnknownFormat { name: String },

    /// A background worker failed before producing a result
    #[error("Worker task failed for '{file}': {message}")]
    Task { file: String, message: String },

    /// A report could not be serialized
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with file context
    pub fn io(file: impl Into<String>, message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a header-not-found error
    pub fn header_not_found(file: impl Into<String>, format: TestFormat) -> Self {
        Self::HeaderNotFound {
            file: file.into(),
            format,
        }
    }

    /// Create a malformed-row error; `row` is 1-based within the data region
    pub fn malformed_row(file: impl Into<String>, row: usize, message: impl Into<String>) -> Self {
        Self::MalformedRow {
            file: file.into(),
            row,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an export error
    pub fn export(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<polars::error::PolarsError>,
    ) -> Self {
        Self::Export {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an unknown format error
    pub fn unknown_format(name: impl Into<String>) -> Self {
        Self::UnknownFormat { name: name.into() }
    }

    /// Create a worker task error
    pub fn task(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Task {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// File the error is attributed to, if any
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::Io { file, .. }
            | Self::HeaderNotFound { file, .. }
            | Self::MalformedRow { file, .. }
            | Self::Export { file, .. }
            | Self::Task { file, .. } => Some(file),
            Self::Configuration { .. }
            | Self::UnknownFormat { .. }
            | Self::Serialization { .. }
            | Self::ProcessingInterrupted { .. } => None,
        }
    }

    /// Pipeline stage that produced the error
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Io { .. } => "read",
            Self::HeaderNotFound { .. } => "header",
            Self::MalformedRow { .. } => "records",
            Self::Export { .. } => "export",
            Self::Task { .. } => "worker",
            Self::Configuration { .. } | Self::UnknownFormat { .. } => "configuration",
            Self::Serialization { .. } => "report",
            Self::ProcessingInterrupted { .. } => "interrupted",
        }
    }

    /// Whether the error ends the whole run rather than a single file
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::UnknownFormat { .. } | Self::ProcessingInterrupted { .. }
        )
    }
}
