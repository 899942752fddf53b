//! Process command implementation for the RPA processor CLI
//!
//! Discovers inputs, parses them concurrently, optionally exports the derived
//! tables and prints a per-file report.

use super::shared::{
    ProcessingStats, create_progress_bar, discover_inputs, load_configuration, setup_logging,
};
use crate::app::models::{ParsedFile, TestFormat};
use crate::app::services::batch::{BatchProcessor, BatchResult};
use crate::app::services::export::TableExporter;
use crate::app::services::key_values::{
    CureLawPoint, KeyValues, PhaseSummary, ThresholdTime, cure_law, summarize,
};
use crate::app::services::rpa_parser::ParseStats;
use crate::cli::args::{OutputFormat, ProcessArgs};
use crate::{Error, Result};
use colored::Colorize;
use indicatif::HumanDuration;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Report line for one input
#[derive(Debug, Serialize)]
struct FileReport<'a> {
    name: &'a str,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<&'a ParseStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_values: Option<KeyValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cure_law: Option<CureLawPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Whole-run report for JSON output
#[derive(Debug, Serialize)]
struct RunReport<'r, 'a> {
    format: TestFormat,
    files: &'r [FileReport<'a>],
    summary: &'r ProcessingStats,
    processing_time_seconds: f64,
}

/// Process command runner
///
/// 1. Load configuration and set up logging
/// 2. Discover input files
/// 3. Parse them concurrently with progress reporting
/// 4. Export derived tables when an output directory or export format is given
/// 5. Print the report
pub async fn run_process(args: ProcessArgs) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    args.validate()?;
    let config = load_configuration(&args)?;
    setup_logging(&config.logging.level, args.quiet)?;

    info!("Starting RPA processor for {} tests", args.format.label());
    debug!("Command line arguments: {:?}", args);
    debug!("Loaded configuration: {:?}", config);

    let files = discover_inputs(&args.inputs)?;
    let mut stats = ProcessingStats {
        files_discovered: files.len(),
        ..Default::default()
    };

    if files.is_empty() {
        warn!("No input files found");
        stats.processing_time = start_time.elapsed();
        generate_final_report(&args, &[], &stats)?;
        return Ok(stats);
    }

    let progress = args
        .show_progress()
        .then(|| create_progress_bar(files.len() as u64, "Parsing"));

    let mut processor = BatchProcessor::from_config(&config);
    if let Some(pb) = &progress {
        processor = processor.with_progress(pb.clone());
    }

    let batch = processor.process_paths(files, args.format).await;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    stats.files_parsed = batch.success_count();
    stats.files_failed = batch.failure_count();

    if args.export_requested() {
        config.ensure_output_directory()?;
        let exporter = TableExporter::from_config(&config);
        info!("Exporting tables to {}", exporter.output_dir().display());

        for (name, exported) in exporter.export_batch(&batch) {
            match exported {
                Ok(path) => stats.exported.push(path),
                Err(e) => {
                    error!("Failed to export {}: {}", name, e);
                    stats.export_errors += 1;
                }
            }
        }
    }

    stats.processing_time = start_time.elapsed();

    let reports = build_reports(&args, &batch);
    generate_final_report(&args, &reports, &stats)?;

    Ok(stats)
}

fn build_reports<'a>(args: &ProcessArgs, batch: &'a BatchResult) -> Vec<FileReport<'a>> {
    batch
        .results
        .iter()
        .map(|(name, result)| match result {
            Ok(parsed) => success_report(args, name, parsed),
            Err(e) => FileReport {
                name,
                ok: false,
                rows: None,
                temperature: None,
                layout: None,
                key_values: None,
                cure_law: None,
                stage: Some(e.stage()),
                error: Some(e.to_string()),
            },
        })
        .collect()
}

fn success_report<'a>(args: &ProcessArgs, name: &'a str, parsed: &'a ParsedFile) -> FileReport<'a> {
    let key_values = if args.summary {
        summarize(parsed, args.phase)
    } else {
        None
    };

    FileReport {
        name,
        ok: true,
        rows: Some(parsed.table.row_count()),
        temperature: parsed.temperature.value(),
        layout: Some(&parsed.stats),
        key_values,
        cure_law: args.cure_law_at.map(|t| cure_law(&parsed.table, t)),
        stage: None,
        error: None,
    }
}

/// Generate final processing report
fn generate_final_report(
    args: &ProcessArgs,
    reports: &[FileReport<'_>],
    stats: &ProcessingStats,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if !args.quiet {
                generate_human_report(args.format, reports, stats);
            }
            Ok(())
        }
        OutputFormat::Json => generate_json_report(args.format, reports, stats),
    }
}

/// Generate human-readable report
fn generate_human_report(format: TestFormat, reports: &[FileReport<'_>], stats: &ProcessingStats) {
    println!("\n{}", format!("{} results", format.label()).bright_green().bold());

    for report in reports {
        if report.ok {
            let temperature = report
                .temperature
                .map(|t| format!("{:.0}°C", t))
                .unwrap_or_else(|| "n/a".to_string());
            println!(
                "  {} {}  {} rows  {}",
                "✓".green(),
                report.name.bold(),
                report.rows.unwrap_or(0),
                temperature.bright_cyan()
            );
            if let Some(key_values) = &report.key_values {
                print_key_values(key_values);
            }
            if let Some(point) = &report.cure_law {
                println!(
                    "      Sp at {} min: {} dNm ({:.1}%)",
                    point.time,
                    fmt_value(point.sp),
                    point.percent_of_max
                );
            }
        } else {
            println!(
                "  {} {}  [{}] {}",
                "✗".red(),
                report.name.bold(),
                report.stage.unwrap_or("unknown"),
                report.error.as_deref().unwrap_or("").red()
            );
        }
    }

    println!();
    println!(
        "  {} {} of {} files parsed in {}",
        "Summary:".bright_cyan(),
        stats.files_parsed,
        stats.files_discovered,
        HumanDuration(stats.processing_time)
    );
    if stats.files_failed > 0 {
        println!("  {} {}", "Failed:".yellow(), stats.files_failed);
    }
    if !stats.exported.is_empty() {
        println!("  {} {} tables", "Exported:".bright_cyan(), stats.exported.len());
        for path in &stats.exported {
            println!("    {}", path.display());
        }
    }
    if stats.export_errors > 0 {
        println!("  {} {}", "Export errors:".yellow(), stats.export_errors);
    }
    println!();
}

fn print_key_values(key_values: &KeyValues) {
    match key_values {
        KeyValues::Cure(cure) => {
            println!(
                "      Max Sp {}  Min Sp {}  Range {}  Total time {}",
                fmt_value(cure.max_sp),
                fmt_value(cure.min_sp),
                fmt_value(cure.sp_range),
                fmt_value(cure.total_time)
            );
            println!("      {}", fmt_thresholds(&cure.thresholds));
        }
        KeyValues::Scorch(scorch) => {
            println!(
                "      Min Sp {}  T0 {}",
                fmt_value(scorch.min_sp),
                fmt_value(scorch.t0)
            );
            println!("      {}", fmt_thresholds(&scorch.thresholds));
        }
        KeyValues::Dynamic(dynamic) => {
            if let Some(go) = &dynamic.go {
                println!("      Go      {}", fmt_phase(go));
            }
            if let Some(ret) = &dynamic.return_phase {
                println!("      Return  {}", fmt_phase(ret));
            }
        }
    }
}

fn fmt_value(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn fmt_thresholds(thresholds: &[ThresholdTime]) -> String {
    thresholds
        .iter()
        .map(|t| format!("{} {}", t.label, fmt_value(t.time)))
        .collect::<Vec<_>>()
        .join("  ")
}

fn fmt_phase(phase: &PhaseSummary) -> String {
    let mut parts = vec![format!("max tanδ {}", fmt_value(phase.max_tan_delta))];
    parts.extend(
        phase
            .tan_delta_at_strain
            .iter()
            .map(|p| format!("@{}% {}", p.strain, fmt_value(p.tan_delta))),
    );
    parts.join("  ")
}

/// Generate JSON report for machine consumption
fn generate_json_report(
    format: TestFormat,
    reports: &[FileReport<'_>],
    stats: &ProcessingStats,
) -> Result<()> {
    println!("{}", render_json(format, reports, stats)?);
    Ok(())
}

fn render_json(
    format: TestFormat,
    reports: &[FileReport<'_>],
    stats: &ProcessingStats,
) -> Result<String> {
    let report = RunReport {
        format,
        files: reports,
        summary: stats,
        processing_time_seconds: stats.processing_time.as_secs_f64(),
    };
    serde_json::to_string_pretty(&report)
        .map_err(|e| Error::serialization("Failed to serialize report", e))
}
