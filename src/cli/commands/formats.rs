//! Formats command: list supported test formats and their layouts
//!
//! Layouts include the `[formats.*]` overrides of the loaded configuration,
//! so the listing matches what `process` parses with.

use super::shared::{ProcessingStats, resolve_config_file};
use crate::app::models::{FormatSpec, TerminationPolicy, TestFormat};
use crate::cli::args::{FormatsArgs, OutputFormat};
use crate::config::{Config, FormatOverrides};
use crate::{Error, Result};
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct FormatInfo {
    name: &'static str,
    label: &'static str,
    header_columns: usize,
    header_skip: usize,
    termination: TerminationPolicy,
    smoothing_window: usize,
    keep_first_two_raw: bool,
    temperature_anchor: &'static str,
    overridden: bool,
}

impl From<&FormatSpec> for FormatInfo {
    fn from(spec: &FormatSpec) -> Self {
        let anchor = if spec.temperature_anchor == spec.header_signature {
            "own header"
        } else {
            "cure header"
        };
        Self {
            name: spec.format.name(),
            label: spec.format.label(),
            header_columns: spec.column_names.len(),
            header_skip: spec.header_skip,
            termination: spec.termination,
            smoothing_window: spec.smoothing_window,
            keep_first_two_raw: spec.keep_first_two_raw,
            temperature_anchor: anchor,
            overridden: false,
        }
    }
}

fn format_infos(overrides: &FormatOverrides) -> Vec<FormatInfo> {
    TestFormat::ALL
        .iter()
        .map(|format| {
            let spec = overrides.apply(format.spec());
            FormatInfo {
                overridden: spec != format.spec(),
                ..FormatInfo::from(&spec)
            }
        })
        .collect()
}

pub async fn run_formats(args: &FormatsArgs) -> Result<ProcessingStats> {
    let config_file = resolve_config_file(args.config_file.as_deref());
    let config = Config::load_layered(config_file.as_deref())?;
    config.validate()?;

    let infos = format_infos(&config.formats);

    match args.output_format {
        OutputFormat::Human => {
            println!("\n{}", "Supported test formats".bright_green().bold());
            for info in &infos {
                let marker = if info.overridden { " [configured]" } else { "" };
                println!("  {} ({}){}", info.name.bold(), info.label, marker.yellow());
                println!(
                    "      {} columns, {} sub-header lines, ends at {}",
                    info.header_columns, info.header_skip, info.termination
                );
                println!(
                    "      smoothing window {}{}, temperature from {}",
                    info.smoothing_window,
                    if info.keep_first_two_raw {
                        " (first two rows raw)"
                    } else {
                        ""
                    },
                    info.temperature_anchor
                );
            }
            println!();
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&infos)
                .map_err(|e| Error::serialization("Failed to serialize format list", e))?;
            println!("{}", json);
        }
    }

    Ok(ProcessingStats::default())
}
