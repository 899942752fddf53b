use clap::Parser;
use rpa_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    eprintln!("Failed to listen for CTRL+C: {}", e);
                }
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(rpa_processor::Error::processing_interrupted(
                    "Processing interrupted by user",
                ))
            }
        }
    });

    match result {
        Ok(stats) if stats.all_failed() => {
            eprintln!("Error: all {} input files failed to parse", stats.files_failed);
            process::exit(1);
        }
        Ok(_) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("RPA Processor - rheometer export parser");
    println!("=======================================");
    println!();
    println!("Parse rubber process analyzer exports (cure, scorch, dynamic and IVE tests)");
    println!("into smoothed tables and key values.");
    println!();
    println!("USAGE:");
    println!("    rpa-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Parse exports of one test format (main command)");
    println!("    formats     List supported test formats and their layouts");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Cure times for every export in a directory:");
    println!("    rpa-processor process --format cure --summary ./exports");
    println!();
    println!("    # Export smoothed sweep tables as Parquet:");
    println!("    rpa-processor process -f dynamic -o ./tables --export-format parquet 'runs/*.erp'");
    println!();
    println!("For detailed help on any command, use:");
    println!("    rpa-processor <COMMAND> --help");
}
