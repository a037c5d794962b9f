//! `cache` command: inspect and purge cached downloads
//!
//! Downloads are cached per provider, so importers sharing a provider
//! (the two ONS importers) share cache entries.

use super::shared::{build_config, format_size, resolve_importer};
use crate::app::services::download_cache::DownloadCache;
use crate::app::services::importers::Importer;
use crate::cli::args::{CacheAction, CacheArgs, CacheOptions};
use anyhow::{Context, Result};
use colored::*;

pub fn run_cache(args: &CacheArgs) -> Result<()> {
    match &args.action {
        CacheAction::List { importer, cache } => list_cached(importer, cache),
        CacheAction::Clear { importer, cache } => clear_cached(importer, cache),
    }
}

fn open_cache(options: &CacheOptions) -> Result<DownloadCache> {
    DownloadCache::new(&build_config(options)).context("Failed to open the download cache")
}

fn list_cached(importer_name: &str, options: &CacheOptions) -> Result<()> {
    let provider = resolve_importer(importer_name)?.provider();
    let cache = open_cache(options)?;

    let files = cache
        .cached_files(&provider.label)
        .with_context(|| format!("Failed to list {}", cache.client_dir(&provider.label).display()))?;

    if files.is_empty() {
        println!(
            "No cached files for {} in {}",
            provider.label,
            cache.cache_dir().display()
        );
        return Ok(());
    }

    let total: u64 = files.iter().map(|file| file.size_bytes).sum();
    for file in &files {
        println!("{:>12}  {}", format_size(file.size_bytes), file.path.display());
    }
    println!(
        "{} {} files, {}",
        provider.label.bold(),
        files.len(),
        format_size(total)
    );
    Ok(())
}

fn clear_cached(importer_name: &str, options: &CacheOptions) -> Result<()> {
    let provider = resolve_importer(importer_name)?.provider();
    let cache = open_cache(options)?;

    let removed = cache
        .clear(&provider.label)
        .with_context(|| format!("Failed to clear cache for {}", provider.label))?;

    println!("{} {} cached files for {}", "Removed".green(), removed, provider.label);
    Ok(())
}
