//! Export of derived tables to CSV or Parquet
//!
//! One output file per input, named `<stem>.<format>.<ext>`. Inputs of one
//! batch whose names would collide get `<stem> (2).<format>.<ext>` and so on.
//! Base columns are
//! written as text unless a numeric coercion of the same name exists; derived
//! columns follow as nullable `f64`.

use polars::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::app::models::{DerivedTable, ParsedFile, TestFormat};
use crate::app::services::batch::BatchResult;
use crate::config::{Config, ExportFormat};
use crate::{Error, Result};

/// Build a DataFrame from a derived table
pub fn to_dataframe(table: &DerivedTable) -> PolarsResult<DataFrame> {
    let record = table.record();
    let mut columns = Vec::with_capacity(record.column_names().len() + table.numeric_columns().len());

    for name in record.column_names() {
        let column = match table.numeric(name) {
            Some(values) => Column::new(name.as_str().into(), values),
            None => {
                let cells = record.column(name).unwrap_or_default();
                Column::new(name.as_str().into(), cells)
            }
        };
        columns.push(column);
    }

    for derived in table.numeric_columns() {
        if record.column_index(&derived.name).is_none() {
            columns.push(Column::new(derived.name.as_str().into(), &derived.values));
        }
    }

    DataFrame::new(columns)
}

/// Output file name for an input
pub fn output_file_name(input_name: &str, format: TestFormat, export: ExportFormat) -> String {
    format!("{}.{}.{}", file_stem(input_name), format, export.extension())
}

fn file_stem(input_name: &str) -> String {
    Path::new(input_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| input_name.to_string())
}

/// First output name for `parsed` not yet in `used`
fn unused_file_name(used: &mut HashSet<String>, parsed: &ParsedFile, export: ExportFormat) -> String {
    let name = output_file_name(&parsed.name, parsed.format, export);
    if used.insert(name.clone()) {
        return name;
    }

    let stem = file_stem(&parsed.name);
    (2..)
        .map(|n| format!("{} ({}).{}.{}", stem, n, parsed.format, export.extension()))
        .find(|candidate| used.insert(candidate.clone()))
        .unwrap_or(name)
}

/// Writes derived tables into an output directory
#[derive(Debug, Clone)]
pub struct TableExporter {
    output_dir: PathBuf,
    format: ExportFormat,
}

impl TableExporter {
    pub fn new(output_dir: impl Into<PathBuf>, format: ExportFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.processing.output_path.clone(),
            config.processing.export_format,
        )
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write one parsed file, returning the path written
    pub fn export(&self, parsed: &ParsedFile) -> Result<PathBuf> {
        self.write(parsed, output_file_name(&parsed.name, parsed.format, self.format))
    }

    /// Write every parsed file of a batch, keyed like the batch results
    pub fn export_batch(&self, batch: &BatchResult) -> Vec<(String, Result<PathBuf>)> {
        let mut used = HashSet::new();
        batch
            .results
            .iter()
            .filter_map(|(key, result)| result.as_ref().ok().map(|parsed| (key, parsed)))
            .map(|(key, parsed)| {
                let file_name = unused_file_name(&mut used, parsed, self.format);
                if file_name != output_file_name(&parsed.name, parsed.format, self.format) {
                    debug!("{} exported as {} to avoid overwriting", key, file_name);
                }
                (key.clone(), self.write(parsed, file_name))
            })
            .collect()
    }

    fn write(&self, parsed: &ParsedFile, file_name: String) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);

        let mut df = to_dataframe(&parsed.table).map_err(|e| {
            Error::export(&parsed.name, "Failed to build table", Some(e))
        })?;
        debug!("Exporting {} ({}x{})", parsed.name, df.height(), df.width());

        let mut file = File::create(&path).map_err(|e| {
            Error::io(
                parsed.name.clone(),
                format!("Failed to create {}", path.display()),
                e,
            )
        })?;

        let written = match self.format {
            ExportFormat::Csv => CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut df),
            ExportFormat::Parquet => ParquetWriter::new(&mut file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map(|_| ()),
        };
        written.map_err(|e| {
            Error::export(
                &parsed.name,
                format!("Failed to write {}", path.display()),
                Some(e),
            )
        })?;

        info!("Exported {} to {}", parsed.name, path.display());
        Ok(path)
    }
}
