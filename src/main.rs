use clap::Parser;
use geodata_importer::cli::{args::Args, commands};
use geodata_importer::error::ImporterError;
use std::process;

fn main() {
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

    let result: anyhow::Result<()> = runtime.block_on(async {
        let shutdown_signal = async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal handler: never resolve
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            result = commands::run(args) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(ImporterError::Interrupted {
                    reason: "import interrupted by user".to_string(),
                }
                .into())
            }
        }
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Geodata Importer - ONS and Space Syntax open data loader");
    println!("========================================================");
    println!();
    println!("USAGE:");
    println!("    geodata-importer <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    list        List importers and their datasources");
    println!("    describe    Show subject types and attributes of a datasource");
    println!("    import      Import datasources and optionally export Parquet");
    println!("    cache       List or clear cached downloads");
    println!();
    println!("EXAMPLES:");
    println!("    geodata-importer import ons-boundaries lsoa");
    println!("    geodata-importer import ons-employment claimantsCount --output ./parquet");
    println!("    geodata-importer describe ons-employment JSAclaimantsCount --format json");
    println!("    geodata-importer cache list space-syntax");
    println!();
    println!("For detailed help on any command, use:");
    println!("    geodata-importer <COMMAND> --help");
}
