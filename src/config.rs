//! Configuration management and validation.
//!
//! Provides the processing settings, per-format layout overrides and
//! logging defaults, loaded in layers: built-in defaults, an optional TOML
//! file, environment variables, then command-line overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::app::models::{FormatSpec, TerminationPolicy, TestFormat};
use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_OUTPUT_DIR, MAX_WORKERS};
use crate::{Error, Result};

/// Environment variable overriding the worker count
pub const ENV_WORKERS: &str = "RPA_PROCESSOR_WORKERS";

/// Environment variable overriding the export directory
pub const ENV_OUTPUT: &str = "RPA_PROCESSOR_OUTPUT";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Batch processing settings
    pub processing: ProcessingConfig,

    /// Per-format layout overrides
    pub formats: FormatOverrides,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Batch processing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of files parsed concurrently
    pub workers: usize,

    /// Directory for exported tables
    pub output_path: PathBuf,

    /// File format for exported tables
    pub export_format: ExportFormat,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().clamp(1, MAX_WORKERS),
            output_path: PathBuf::from(DEFAULT_OUTPUT_DIR),
            export_format: ExportFormat::Csv,
        }
    }
}

/// Supported export formats for derived tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated text
    Csv,
    /// Apache Parquet with Snappy compression
    Parquet,
}

impl ExportFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Layout overrides for one format
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOverride {
    /// Replacement termination policy
    pub termination: Option<TerminationPolicy>,

    /// Replacement number of sub-header lines after the header
    pub header_skip: Option<usize>,
}

/// Layout overrides keyed by format
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOverrides {
    pub cure: Option<FormatOverride>,
    pub scorch: Option<FormatOverride>,
    pub dynamic: Option<FormatOverride>,
    pub ive: Option<FormatOverride>,
}

impl FormatOverrides {
    /// Override for a format, if configured
    pub fn get(&self, format: TestFormat) -> Option<&FormatOverride> {
        match format {
            TestFormat::Cure => self.cure.as_ref(),
            TestFormat::Scorch => self.scorch.as_ref(),
            TestFormat::Dynamic => self.dynamic.as_ref(),
            TestFormat::Ive => self.ive.as_ref(),
        }
    }

    /// Apply the configured override to a built-in layout
    pub fn apply(&self, spec: FormatSpec) -> FormatSpec {
        let Some(over) = self.get(spec.format) else {
            return spec;
        };

        let mut spec = spec;
        if let Some(termination) = over.termination {
            spec = spec.with_termination(termination);
        }
        if let Some(header_skip) = over.header_skip {
            spec = spec.with_header_skip(header_skip);
        }
        spec
    }
}

impl Config {
    /// Default configuration file location
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                path.display().to_string(),
                "Failed to read config file",
                e,
            )
        })?;
        Self::from_toml(&text)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text)
            .map_err(|e| Error::configuration(format!("Invalid config file: {}", e)))
    }

    /// Load configuration using layered approach (defaults -> file -> env)
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                info!("Using config file: {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Apply environment overrides through a variable lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(workers) = lookup(ENV_WORKERS) {
            self.processing.workers = workers.trim().parse().map_err(|_| {
                Error::configuration(format!("{} must be a positive integer", ENV_WORKERS))
            })?;
        }
        if let Some(output) = lookup(ENV_OUTPUT) {
            self.processing.output_path = PathBuf::from(output);
        }
        Ok(())
    }

    /// Validate settings for consistency
    pub fn validate(&self) -> Result<()> {
        if self.processing.workers == 0 {
            return Err(Error::configuration(
                "Number of workers must be greater than 0",
            ));
        }

        if self.processing.workers > MAX_WORKERS {
            return Err(Error::configuration(format!(
                "Number of workers cannot exceed {}",
                MAX_WORKERS
            )));
        }

        for format in TestFormat::ALL {
            if let Some(skip) = self.formats.get(format).and_then(|o| o.header_skip) {
                if skip > 1 {
                    return Err(Error::configuration(format!(
                        "header_skip for {} must be 0 or 1, got {}",
                        format, skip
                    )));
                }
            }
        }

        Ok(())
    }

    /// Create the export directory if it does not exist
    pub fn ensure_output_directory(&self) -> Result<()> {
        let path = &self.processing.output_path;
        if !path.exists() {
            std::fs::create_dir_all(path).map_err(|e| {
                Error::io(
                    path.display().to_string(),
                    "Failed to create output directory",
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.processing.workers >= 1);
        assert_eq!(config.processing.export_format, ExportFormat::Csv);
        assert_eq!(config.formats, FormatOverrides::default());
    }

    #[test]
    fn test_from_toml_with_overrides() {
        let config = Config::from_toml(
            r#"
[processing]
workers = 2
export_format = "parquet"

[formats.ive]
termination = "non_numeric_first_token"

[formats.cure]
header_skip = 1
"#,
        )
        .unwrap();

        assert_eq!(config.processing.workers, 2);
        assert_eq!(config.processing.export_format, ExportFormat::Parquet);

        let ive = config.formats.apply(TestFormat::Ive.spec());
        assert_eq!(ive.termination, TerminationPolicy::NonNumericFirstToken);
        assert_eq!(ive.header_skip, 1);

        let cure = config.formats.apply(TestFormat::Cure.spec());
        assert_eq!(cure.header_skip, 1);
        assert_eq!(cure.termination, TerminationPolicy::BlankLine);

        let scorch = config.formats.apply(TestFormat::Scorch.spec());
        assert_eq!(scorch, TestFormat::Scorch.spec());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(Config::from_toml("[processing]\nworkers = \"many\"").is_err());
        assert!(Config::from_toml("[formats.cure]\ntermination = \"sometimes\"").is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.processing.workers = 0;
        assert!(config.validate().is_err());

        config.processing.workers = MAX_WORKERS + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.formats.dynamic = Some(FormatOverride {
            termination: None,
            header_skip: Some(2),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(|key| match key {
                ENV_WORKERS => Some("3".to_string()),
                ENV_OUTPUT => Some("/tmp/rpa".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.processing.workers, 3);
        assert_eq!(config.processing.output_path, PathBuf::from("/tmp/rpa"));

        let mut config = Config::default();
        assert!(
            config
                .apply_env(|key| (key == ENV_WORKERS).then(|| "lots".to_string()))
                .is_err()
        );
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(Config::from_file(&temp_dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_ensure_output_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.processing.output_path = temp_dir.path().join("nested").join("out");

        config.ensure_output_directory().unwrap();
        assert!(config.processing.output_path.is_dir());
    }
}
