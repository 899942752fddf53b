//! Concurrent batch parsing
//!
//! Files are parsed on blocking worker threads with a bounded number in
//! flight. Every file yields its own `Result`; one failure never stops the
//! rest of the batch.

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{debug, error, info, warn};

use crate::app::models::{ParsedFile, TestFormat};
use crate::app::services::rpa_parser::{InputFile, RpaParser, name_for_path};
use crate::config::Config;
use crate::{Error, Result};

/// Outcome of a batch, keyed by input name
#[derive(Debug)]
pub struct BatchResult {
    /// Per-file outcome in name order
    pub results: BTreeMap<String, Result<ParsedFile>>,
    /// Wall-clock time for the whole batch
    pub elapsed: Duration,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Successfully parsed files in name order
    pub fn succeeded(&self) -> impl Iterator<Item = &ParsedFile> {
        self.results.values().filter_map(|r| r.as_ref().ok())
    }

    /// Failed files with their errors in name order
    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.results
            .iter()
            .filter_map(|(name, r)| r.as_ref().err().map(|e| (name.as_str(), e)))
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }

    /// True when there was at least one input and none parsed
    pub fn all_failed(&self) -> bool {
        !self.is_empty() && self.success_count() == 0
    }
}

enum Job {
    Path(PathBuf),
    Memory(InputFile),
}

impl Job {
    fn name(&self) -> String {
        match self {
            Job::Path(path) => name_for_path(path),
            Job::Memory(input) => input.name.clone(),
        }
    }

    fn run(self, parser: &RpaParser, format: TestFormat) -> Result<ParsedFile> {
        match self {
            Job::Path(path) => parser.parse_path(&path, format),
            Job::Memory(input) => parser.parse(&input, format),
        }
    }
}

/// Parses many inputs of one format concurrently
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    parser: RpaParser,
    workers: usize,
    progress: Option<ProgressBar>,
}

impl BatchProcessor {
    pub fn new(parser: RpaParser, workers: usize) -> Self {
        Self {
            parser,
            workers: workers.max(1),
            progress: None,
        }
    }

    /// Processor using the configured worker count and format overrides
    pub fn from_config(config: &Config) -> Self {
        Self::new(RpaParser::from_config(config), config.processing.workers)
    }

    /// Advance `progress` once per finished file
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Parse files from disk
    pub async fn process_paths(&self, paths: Vec<PathBuf>, format: TestFormat) -> BatchResult {
        self.run(paths.into_iter().map(Job::Path).collect(), format)
            .await
    }

    /// Parse inputs already held in memory
    pub async fn process_inputs(&self, inputs: Vec<InputFile>, format: TestFormat) -> BatchResult {
        self.run(inputs.into_iter().map(Job::Memory).collect(), format)
            .await
    }

    async fn run(&self, jobs: Vec<Job>, format: TestFormat) -> BatchResult {
        let start = Instant::now();
        info!(
            "Parsing {} {} files with {} workers",
            jobs.len(),
            format,
            self.workers
        );

        let mut outcomes: Vec<(usize, String, Result<ParsedFile>)> =
            stream::iter(jobs.into_iter().enumerate())
                .map(|(index, job)| {
                    let parser = self.parser.clone();
                    let progress = self.progress.clone();
                    async move {
                        let name = job.name();
                        if let Some(pb) = &progress {
                            pb.set_message(format!("Parsing: {}", name));
                        }

                        let result = match task::spawn_blocking(move || job.run(&parser, format)).await
                        {
                            Ok(result) => result,
                            Err(e) => Err(Error::task(name.clone(), e.to_string())),
                        };

                        if let Some(pb) = &progress {
                            pb.inc(1);
                        }

                        match &result {
                            Ok(parsed) => debug!("Parsed {} ({} rows)", name, parsed.table.row_count()),
                            Err(e) => error!("Failed to parse {}: {}", name, e),
                        }
                        (index, name, result)
                    }
                })
                .buffer_unordered(self.workers)
                .collect()
                .await;

        // duplicate names are suffixed in input order
        outcomes.sort_by_key(|(index, _, _)| *index);

        let mut results = BTreeMap::new();
        for (_, name, result) in outcomes {
            let key = unique_key(&results, name);
            results.insert(key, result);
        }

        let batch = BatchResult {
            results,
            elapsed: start.elapsed(),
        };
        info!(
            "Batch finished: {} parsed, {} failed in {:.2?}",
            batch.success_count(),
            batch.failure_count(),
            batch.elapsed
        );
        batch
    }
}

/// Key for `name`, suffixed when an earlier input already used it
fn unique_key<V>(results: &BTreeMap<String, V>, name: String) -> String {
    if !results.contains_key(&name) {
        return name;
    }

    let key = (2..)
        .map(|n| format!("{} ({})", name, n))
        .find(|candidate| !results.contains_key(candidate))
        .unwrap_or_else(|| name.clone());
    warn!("Duplicate input name {}, keeping result as {}", name, key);
    key
}
