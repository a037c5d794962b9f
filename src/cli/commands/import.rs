//! `import` command: fetch, map and optionally export datasources
//!
//! All datasources of one invocation are loaded into a single in-memory
//! store, in order. Employment datasources resolve geography codes against
//! boundary subjects, so the boundary levels they need are imported first
//! unless `--no-boundaries` is given.

use super::shared::{build_config, resolve_importer, spinner};
use crate::app::services::importers::{
    ImportContext, ImportStats, Importer, ImporterKind, OnsBoundariesImporter,
};
use crate::app::services::parquet_export::ParquetExporter;
use crate::app::services::subject_store::MemoryStore;
use crate::cli::args::ImportArgs;
use anyhow::{Context, Result};
use colored::*;
use std::time::Instant;
use tracing::{debug, info};

pub async fn run_import(args: &ImportArgs, show_progress: bool) -> Result<()> {
    let start_time = Instant::now();
    let importer = resolve_importer(&args.importer)?;

    let datasource_ids: Vec<String> = if args.datasources.is_empty() {
        importer
            .datasource_ids()
            .into_iter()
            .map(String::from)
            .collect()
    } else {
        args.datasources.clone()
    };

    let mut config = build_config(&args.cache);
    if let Some(run_timestamp) = args.run_timestamp {
        config = config.with_run_timestamp(run_timestamp);
    }
    let context = ImportContext::new(config).context("Failed to set up the download cache")?;
    debug!("Import context: {:?}", context.config);

    let mut store = MemoryStore::new();
    let mut all_stats = Vec::new();

    if matches!(importer, ImporterKind::OnsEmployment(_)) && !args.no_boundaries {
        let boundaries = ImporterKind::OnsBoundaries(OnsBoundariesImporter::new());
        for level in required_boundaries(&importer, &datasource_ids)? {
            let stats =
                import_one(&boundaries, &level, &context, &mut store, show_progress).await?;
            all_stats.push((boundaries.name(), stats));
        }
    }

    for datasource_id in &datasource_ids {
        let stats =
            import_one(&importer, datasource_id, &context, &mut store, show_progress).await?;
        all_stats.push((importer.name(), stats));
    }

    print_summary(&all_stats, &store);

    if let Some(output_dir) = &args.output {
        let exporter = ParquetExporter::new(output_dir);
        let progress = spinner(
            format!("Exporting to {}", exporter.output_dir().display()),
            show_progress,
        );
        let summary = exporter.export(&store).with_context(|| {
            format!("Failed to export Parquet to {}", exporter.output_dir().display())
        })?;
        progress.finish_and_clear();

        for file in &summary.files {
            println!("{} {}", "Wrote".green(), file.display());
        }
    }

    info!("Import finished in {:?}", start_time.elapsed());
    Ok(())
}

/// Boundary datasource ids for the subject types the selected datasources resolve against
fn required_boundaries(importer: &ImporterKind, datasource_ids: &[String]) -> Result<Vec<String>> {
    let mut levels: Vec<String> = Vec::new();
    for datasource_id in datasource_ids {
        let datasource = importer.datasource(datasource_id)?;
        for subject_type in &datasource.subject_types {
            if !levels.contains(&subject_type.label) {
                levels.push(subject_type.label.clone());
            }
        }
    }
    Ok(levels)
}

async fn import_one(
    importer: &ImporterKind,
    datasource_id: &str,
    context: &ImportContext,
    store: &mut MemoryStore,
    show_progress: bool,
) -> Result<ImportStats> {
    let progress = spinner(
        format!("Importing {}/{}", importer.name(), datasource_id),
        show_progress,
    );

    let result = importer
        .import_datasource(datasource_id, context, store)
        .await
        .with_context(|| format!("Failed to import {}/{}", importer.name(), datasource_id));

    progress.finish_and_clear();
    result
}

fn print_summary(all_stats: &[(&str, ImportStats)], store: &MemoryStore) {
    for (importer_name, stats) in all_stats {
        println!(
            "{} {}/{}: {} subjects, {} timed values, {} fixed values in {:.1?}",
            "✓".green(),
            importer_name,
            stats.datasource_id.bold(),
            stats.subjects_saved,
            stats.timed_values_saved,
            stats.fixed_values_saved,
            stats.elapsed
        );
        if stats.records_skipped > 0 {
            println!(
                "  {} {} of {} records skipped ({:.1}% used)",
                "!".yellow(),
                stats.records_skipped,
                stats.records_read,
                stats.success_rate()
            );
        }
    }

    println!(
        "{} {} subjects, {} attributes, {} timed values, {} fixed values",
        "Store:".bold(),
        store.subject_count(),
        store.attribute_count(),
        store.timed_value_count(),
        store.fixed_value_count()
    );
}
