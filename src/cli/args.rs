//! Command-line argument definitions for the RPA processor
//!
//! This module defines the complete CLI interface using clap derive API.

use crate::app::models::TestFormat;
use crate::app::services::key_values::Phase;
use crate::config::ExportFormat;
use crate::constants::MAX_WORKERS;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the RPA rheometer export processor
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rpa-processor",
    version,
    about = "Parse RPA rheometer exports into smoothed, analysis-ready tables",
    long_about = "Reads the semi-structured text exports written by rubber process analyzers, \
                  locates the data block for cure, scorch, dynamic (strain sweep) and IVE tests, \
                  recovers the test temperature, derives smoothed torque, state of cure and tan \
                  delta columns, and reports key values such as cure and scorch times."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse exports of one test format and report or export the results
    Process(ProcessArgs),
    /// List supported test formats and their layouts
    Formats(FormatsArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Test format of every input
    #[arg(
        short = 'f',
        long = "format",
        value_name = "FORMAT",
        help = "Test format: cure, scorch, dynamic or ive"
    )]
    pub format: TestFormat,

    /// Input files, directories or glob patterns
    ///
    /// Directories are searched recursively for .erp, .txt and .csv files.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    /// Directory for exported tables
    ///
    /// When given, one table per parsed file is written as
    /// `<stem>.<format>.<ext>`. Created if it doesn't exist.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Export derived tables into this directory"
    )]
    pub output_path: Option<PathBuf>,

    /// File format for exported tables
    #[arg(
        long = "export-format",
        value_enum,
        help = "Export tables in this format (into the configured directory unless -o is given)"
    )]
    pub export_format: Option<ExportFormat>,

    /// Print key values for each parsed file
    #[arg(short = 's', long = "summary", help = "Print key values for each file")]
    pub summary: bool,

    /// Sweep phase reported for dynamic tests
    #[arg(
        long = "phase",
        value_enum,
        default_value = "both",
        help = "Sweep phase for dynamic key values"
    )]
    pub phase: Phase,

    /// Evaluate the cure law at this time (minutes)
    #[arg(
        long = "cure-law-at",
        value_name = "MINUTES",
        help = "Report torque at this time for cure tests"
    )]
    pub cure_law_at: Option<f64>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// ~/.config/rpa-processor/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Number of files parsed concurrently
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of parallel workers (defaults to the CPU count)"
    )]
    pub workers: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the formats command
#[derive(Debug, Clone, Parser)]
pub struct FormatsArgs {
    /// Path to configuration file whose format overrides are shown
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Output format for the listing
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the listing"
    )]
    pub output_format: OutputFormat,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable coloured report
    Human,
    /// JSON for scripting
    Json,
}

impl Args {
    /// Selected subcommand, if any
    pub fn get_command(&self) -> Option<&Commands> {
        self.command.as_ref()
    }
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err(Error::configuration(
                    "Number of workers must be greater than 0",
                ));
            }
            if workers > MAX_WORKERS {
                return Err(Error::configuration(format!(
                    "Number of workers cannot exceed {}",
                    MAX_WORKERS
                )));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        if let Some(time) = self.cure_law_at {
            if !time.is_finite() || time < 0.0 {
                return Err(Error::configuration(
                    "Cure law time must be a non-negative number of minutes",
                ));
            }
            if self.format != TestFormat::Cure {
                return Err(Error::configuration(
                    "--cure-law-at applies to cure tests only",
                ));
            }
        }

        if self.inputs.iter().all(|input| input.trim().is_empty()) {
            return Err(Error::configuration("No inputs given"));
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Whether derived tables should be written
    ///
    /// `--export-format` alone exports into the configured output directory.
    pub fn export_requested(&self) -> bool {
        self.output_path.is_some() || self.export_format.is_some()
    }

    /// Check if we should show progress bars (not in quiet or JSON mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }
}
