//! Shared components for CLI commands
//!
//! Logging setup, layered configuration loading, input discovery and
//! progress reporting used by the command implementations.

use crate::cli::args::ProcessArgs;
use crate::config::Config;
use crate::constants::INPUT_EXTENSIONS;
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Processing statistics for reporting across commands
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessingStats {
    /// Number of input files discovered
    pub files_discovered: usize,
    /// Number of files parsed successfully
    pub files_parsed: usize,
    /// Number of files that failed
    pub files_failed: usize,
    /// Paths of exported tables
    pub exported: Vec<PathBuf>,
    /// Number of parsed files whose export failed
    pub export_errors: usize,
    /// Total processing time
    #[serde(skip)]
    pub processing_time: std::time::Duration,
}

impl ProcessingStats {
    /// True when inputs were found and none of them parsed
    pub fn all_failed(&self) -> bool {
        self.files_failed > 0 && self.files_parsed == 0
    }
}

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over `level`.
pub fn setup_logging(level: &str, compact: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rpa_processor={}", level)));

    let result = if compact {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    // a subscriber installed earlier in the process stays in place
    match result {
        Ok(()) => debug!("Logging initialized at level: {}", level),
        Err(e) => debug!("Logging already initialized: {}", e),
    }
    Ok(())
}

/// Config file to load: the explicit one, else the default path when present
pub fn resolve_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Config::default_config_path()
            .ok()
            .filter(|path| path.exists()),
    }
}

/// Load configuration using layered approach (file -> env -> args)
pub fn load_configuration(args: &ProcessArgs) -> Result<Config> {
    info!("Loading configuration");

    let config_file = resolve_config_file(args.config_file.as_deref());
    if config_file.is_none() {
        info!("No config file found, using defaults and environment variables");
    }

    let mut config = Config::load_layered(config_file.as_deref())?;
    apply_cli_overrides(&mut config, args);
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &ProcessArgs) {
    if let Some(output_path) = &args.output_path {
        config.processing.output_path = output_path.clone();
    }
    if let Some(export_format) = args.export_format {
        config.processing.export_format = export_format;
    }
    if let Some(workers) = args.workers {
        config.processing.workers = workers;
    }
    if args.verbose > 0 || args.quiet {
        config.logging.level = args.get_log_level().to_string();
    }
}

/// Resolve inputs given as files, directories or glob patterns
///
/// Directories are walked recursively for files with a known export
/// extension. The result is sorted and free of duplicates. Inputs that match
/// nothing are reported and skipped.
pub fn discover_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    for input in inputs {
        let path = Path::new(input);

        if path.is_dir() {
            let found = discover_directory(path);
            debug!("Found {} files under {}", found.len(), path.display());
            files.extend(found);
        } else if path.is_file() {
            files.insert(path.to_path_buf());
        } else {
            let matches = glob::glob(input).map_err(|e| {
                Error::configuration(format!("Invalid input pattern '{}': {}", input, e))
            })?;

            let before = files.len();
            files.extend(matches.filter_map(|m| m.ok()).filter(|p| p.is_file()));
            if files.len() == before {
                warn!("No files match input: {}", input);
            }
        }
    }

    Ok(files.into_iter().collect())
}

fn discover_directory(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && has_input_extension(path))
        .collect()
}

fn has_input_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            INPUT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}
