//! Command implementations for the RPA processor CLI
//!
//! Each command is implemented in its own module; shared setup lives in
//! [`shared`].

pub mod formats;
pub mod process;
pub mod shared;

pub use shared::ProcessingStats;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner
///
/// Dispatches to the subcommand handler:
/// - `process`: parse exports and report key values
/// - `formats`: list supported formats
///
/// Without a subcommand nothing runs and empty statistics are returned.
pub async fn run(args: Args) -> Result<ProcessingStats> {
    match args.command {
        Some(Commands::Process(process_args)) => process::run_process(process_args).await,
        Some(Commands::Formats(formats_args)) => formats::run_formats(&formats_args).await,
        None => Ok(ProcessingStats::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_without_command() {
        let stats = run(Args { command: None }).await.unwrap();
        assert!(!stats.all_failed());
        assert_eq!(stats.files_discovered, 0);
    }
}
