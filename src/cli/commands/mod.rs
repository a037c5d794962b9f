//! Command implementations for the geodata importer CLI
//!
//! Each command is implemented in its own module:
//! - `list`: importer and datasource catalog
//! - `describe`: schema of one datasource
//! - `import`: fetch, map and optionally export datasources
//! - `cache`: inspect and purge the download cache

pub mod cache;
pub mod describe;
pub mod import;
pub mod list;
pub mod shared;

use crate::cli::args::{Args, Commands};
use anyhow::Result;

/// Dispatch to the subcommand handler; callers ensure a subcommand is present
pub async fn run(args: Args) -> Result<()> {
    shared::setup_logging(&args)?;

    let show_progress = args.show_progress();
    match args.command {
        Some(Commands::List) => list::run_list(),
        Some(Commands::Describe(describe_args)) => describe::run_describe(&describe_args),
        Some(Commands::Import(import_args)) => import::run_import(&import_args, show_progress).await,
        Some(Commands::Cache(cache_args)) => cache::run_cache(&cache_args),
        None => Ok(()),
    }
}
