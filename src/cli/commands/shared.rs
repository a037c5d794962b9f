//! Shared components for CLI commands
//!
//! Logging setup, importer lookup, configuration from command-line
//! options and small formatting helpers.

use crate::app::services::importers::ImporterKind;
use crate::cli::args::{Args, CacheOptions};
use crate::config::ImporterConfig;
use crate::constants::IMPORTER_NAMES;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::debug;

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("geodata_importer={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Look up an importer by name, listing valid names on failure
pub fn resolve_importer(name: &str) -> Result<ImporterKind> {
    ImporterKind::from_name(name)
        .with_context(|| format!("Available importers: {}", IMPORTER_NAMES.join(", ")))
}

/// Importer configuration from the cache options
pub fn build_config(options: &CacheOptions) -> ImporterConfig {
    let config = ImporterConfig::default().with_offline(options.offline);
    match &options.cache_dir {
        Some(cache_dir) => config.with_cache_dir(cache_dir),
        None => config,
    }
}

/// Spinner for a long-running step; hidden when progress is off
pub fn spinner(message: impl Into<String>, show_progress: bool) -> ProgressBar {
    if !show_progress {
        return ProgressBar::hidden();
    }

    let progress_bar = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        progress_bar.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
    }
    progress_bar.set_message(message.into());
    progress_bar.enable_steady_tick(Duration::from_millis(120));
    progress_bar
}

/// Format a size in bytes in human-readable form
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}
