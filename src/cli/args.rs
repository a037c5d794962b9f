//! Command-line argument definitions for the geodata importer
//!
//! This module defines the CLI interface using the clap derive API.

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the geodata importer
///
/// Loads ONS boundaries, Nomisweb employment statistics and Space Syntax
/// street segment measures into a common subject/attribute/value model.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "geodata-importer",
    version,
    about = "Import ONS and Space Syntax open datasets into a common subject/attribute/value model",
    long_about = "Downloads open geographic and statistical datasets (ONS geoportal boundaries, \
                  Nomisweb employment extracts, Space Syntax OpenMapping), caches them locally, \
                  maps them onto subjects, attributes and values, and optionally exports the \
                  result as Parquet."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase logging verbosity
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// List importers and their datasources
    List,
    /// Show the provider, subject types and attributes of a datasource
    Describe(DescribeArgs),
    /// Import one or more datasources
    Import(ImportArgs),
    /// Inspect or purge cached downloads
    Cache(CacheArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct DescribeArgs {
    /// Importer name (ons-boundaries, ons-employment, space-syntax)
    #[arg(value_name = "IMPORTER")]
    pub importer: String,

    /// Datasource identifier, e.g. lsoa or JSAclaimantsCount
    #[arg(value_name = "DATASOURCE")]
    pub datasource: String,

    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// Importer name (ons-boundaries, ons-employment, space-syntax)
    #[arg(value_name = "IMPORTER")]
    pub importer: String,

    /// Datasources to import, in order; all of the importer's datasources when omitted
    #[arg(value_name = "DATASOURCE")]
    pub datasources: Vec<String>,

    /// Export the imported subjects and values as Parquet into this directory
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub cache: CacheOptions,

    /// Do not import the boundary datasources employment data resolves against
    #[arg(long = "no-boundaries")]
    pub no_boundaries: bool,

    /// Timestamp for values whose source has no period (default: now)
    #[arg(long = "run-timestamp", value_name = "YYYY-MM-DDTHH:MM:SS")]
    pub run_timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Parser)]
pub struct CacheOptions {
    /// Download cache directory
    #[arg(long = "cache-dir", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Never download; fail when a source is not cached
    #[arg(long = "offline")]
    pub offline: bool,
}

#[derive(Debug, Clone, Parser)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CacheAction {
    /// List files cached for an importer's provider
    List {
        #[arg(value_name = "IMPORTER")]
        importer: String,

        #[command(flatten)]
        cache: CacheOptions,
    },
    /// Delete files cached for an importer's provider
    Clear {
        #[arg(value_name = "IMPORTER")]
        importer: String,

        #[command(flatten)]
        cache: CacheOptions,
    },
}

/// Output format for describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress spinners are hidden in quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_command() {
        let args = Args::parse_from([
            "geodata-importer",
            "import",
            "ons-employment",
            "claimantsCount",
            "ESAclaimants",
            "--offline",
            "--cache-dir",
            "/tmp/cache",
            "-vv",
        ]);

        assert_eq!(args.get_log_level(), "debug");
        match args.command {
            Some(Commands::Import(import)) => {
                assert_eq!(import.importer, "ons-employment");
                assert_eq!(import.datasources, vec!["claimantsCount", "ESAclaimants"]);
                assert!(import.cache.offline);
                assert_eq!(import.cache.cache_dir, Some(PathBuf::from("/tmp/cache")));
                assert!(import.output.is_none());
            }
            other => panic!("expected import command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_describe_json() {
        let args = Args::parse_from([
            "geodata-importer",
            "describe",
            "ons-employment",
            "JSAclaimantsCount",
            "--format",
            "json",
        ]);

        match args.command {
            Some(Commands::Describe(describe)) => {
                assert_eq!(describe.datasource, "JSAclaimantsCount");
                assert_eq!(describe.format, OutputFormat::Json);
            }
            other => panic!("expected describe command, got {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["geodata-importer", "list", "-q", "-v"]).is_err());

        let quiet = Args::parse_from(["geodata-importer", "list", "--quiet"]);
        assert_eq!(quiet.get_log_level(), "error");
        assert!(!quiet.show_progress());
    }

    #[test]
    fn test_parse_cache_clear() {
        let args = Args::parse_from(["geodata-importer", "cache", "clear", "space-syntax"]);
        match args.command {
            Some(Commands::Cache(CacheArgs {
                action: CacheAction::Clear { importer, cache },
            })) => {
                assert_eq!(importer, "space-syntax");
                assert!(!cache.offline);
            }
            other => panic!("expected cache clear, got {other:?}"),
        }
    }
}
