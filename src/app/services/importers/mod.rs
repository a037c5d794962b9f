//! Importers for ONS and Space Syntax open datasets
//!
//! Every importer follows the same four steps for one datasource:
//! declare the datasource's subject types and attributes, fetch the remote
//! file through the download cache, parse it with the matching format
//! library, and flush the mapped subjects and values to the store in one
//! batch at the end.
//!
//! ## Architecture
//!
//! - [`ons_boundaries`] - GeoJSON boundary features to LSOA/MSOA/LA subjects
//! - [`ons_employment`] - Nomisweb CSV extracts to timed values
//! - [`space_syntax`] - zipped street segment tables to subjects and values
//! - [`period`] - per-datasource period label to timestamp rules
//! - [`resolver`] - schema declaration and subject lookup
//! - [`column_mapping`] - declared column names resolved against CSV headers
//! - [`stats`] - per-run import statistics
//!
//! ## Usage
//!
//! ```rust,no_run
//! use geodata_importer::app::services::importers::{ImportContext, Importer, OnsEmploymentImporter};
//! use geodata_importer::app::services::subject_store::MemoryStore;
//! use geodata_importer::config::ImporterConfig;
//!
//! # async fn example() -> geodata_importer::error::Result<()> {
//! let context = ImportContext::new(ImporterConfig::default())?;
//! let mut store = MemoryStore::new();
//! let stats = OnsEmploymentImporter::new()
//!     .import_datasource("claimantsCount", &context, &mut store)
//!     .await?;
//! println!("{} values saved", stats.timed_values_saved);
//! # Ok(())
//! # }
//! ```

pub mod column_mapping;
pub mod ons_boundaries;
pub mod ons_employment;
pub mod period;
pub mod resolver;
pub mod space_syntax;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use ons_boundaries::{BoundaryLevel, OnsBoundariesImporter};
pub use ons_employment::OnsEmploymentImporter;
pub use period::PeriodRule;
pub use resolver::{MissingSubjectPolicy, SubjectResolver, declare_datasource};
pub use space_syntax::SpaceSyntaxImporter;
pub use stats::ImportStats;

use crate::app::models::{Datasource, Provider};
use crate::app::services::download_cache::DownloadCache;
use crate::app::services::subject_store::SubjectStore;
use crate::config::ImporterConfig;
use crate::constants::{ONS_BOUNDARIES_IMPORTER, ONS_EMPLOYMENT_IMPORTER, SPACE_SYNTAX_IMPORTER};
use crate::error::{ImporterError, Result};
use chrono::NaiveDateTime;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Where a datasource's file lives and what it should be cached as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSource {
    pub url: String,
    pub extension: &'static str,
}

/// Shared state for one import run
#[derive(Debug, Clone)]
pub struct ImportContext {
    pub config: ImporterConfig,
    pub cache: DownloadCache,
    pub run_timestamp: NaiveDateTime,
}

impl ImportContext {
    pub fn new(config: ImporterConfig) -> Result<Self> {
        let cache = DownloadCache::new(&config)?;
        let run_timestamp = config.effective_run_timestamp();
        Ok(Self {
            config,
            cache,
            run_timestamp,
        })
    }
}

/// Common interface of all importers
#[allow(async_fn_in_trait)]
pub trait Importer {
    /// Name used on the command line
    fn name(&self) -> &'static str;

    fn provider(&self) -> Provider;

    /// Fixed, ordered catalog of datasource identifiers
    fn datasource_ids(&self) -> Vec<&'static str>;

    /// Descriptor for one datasource; unknown ids are an invalid-argument error
    fn datasource(&self, datasource_id: &str) -> Result<Datasource>;

    /// Remote file backing a datasource
    fn remote_source(&self, datasource: &Datasource) -> Result<RemoteSource>;

    /// Map a fetched file onto the store
    fn load<S: SubjectStore>(
        &self,
        datasource: &Datasource,
        path: &Path,
        context: &ImportContext,
        store: &mut S,
    ) -> Result<ImportStats>;

    /// Declare, fetch and load one datasource
    async fn import_datasource<S: SubjectStore>(
        &self,
        datasource_id: &str,
        context: &ImportContext,
        store: &mut S,
    ) -> Result<ImportStats> {
        let start_time = Instant::now();

        let datasource = self.datasource(datasource_id)?;
        declare_datasource(&datasource, store)?;

        let source = self.remote_source(&datasource)?;
        let path = context
            .cache
            .fetch(&source.url, &datasource.provider.label, source.extension)
            .await?;

        let mut stats = self.load(&datasource, &path, context, store)?;
        stats.elapsed = start_time.elapsed();

        info!(
            "Imported {}/{}: {} subjects, {} timed values, {} fixed values ({} records, {} skipped) in {:?}",
            self.name(),
            datasource.id,
            stats.subjects_saved,
            stats.timed_values_saved,
            stats.fixed_values_saved,
            stats.records_read,
            stats.records_skipped,
            stats.elapsed
        );

        Ok(stats)
    }
}

/// Any of the bundled importers, selected by name
#[derive(Debug, Clone)]
pub enum ImporterKind {
    OnsBoundaries(OnsBoundariesImporter),
    OnsEmployment(OnsEmploymentImporter),
    SpaceSyntax(SpaceSyntaxImporter),
}

impl ImporterKind {
    /// Look up an importer by its command-line name
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            ONS_BOUNDARIES_IMPORTER => Ok(Self::OnsBoundaries(OnsBoundariesImporter::new())),
            ONS_EMPLOYMENT_IMPORTER => Ok(Self::OnsEmployment(OnsEmploymentImporter::new())),
            SPACE_SYNTAX_IMPORTER => Ok(Self::SpaceSyntax(SpaceSyntaxImporter::new())),
            other => Err(ImporterError::UnknownImporter {
                name: other.to_string(),
            }),
        }
    }

    /// Every bundled importer in run order
    pub fn all() -> Vec<Self> {
        vec![
            Self::OnsBoundaries(OnsBoundariesImporter::new()),
            Self::OnsEmployment(OnsEmploymentImporter::new()),
            Self::SpaceSyntax(SpaceSyntaxImporter::new()),
        ]
    }
}

impl Importer for ImporterKind {
    fn name(&self) -> &'static str {
        match self {
            Self::OnsBoundaries(importer) => importer.name(),
            Self::OnsEmployment(importer) => importer.name(),
            Self::SpaceSyntax(importer) => importer.name(),
        }
    }

    fn provider(&self) -> Provider {
        match self {
            Self::OnsBoundaries(importer) => importer.provider(),
            Self::OnsEmployment(importer) => importer.provider(),
            Self::SpaceSyntax(importer) => importer.provider(),
        }
    }

    fn datasource_ids(&self) -> Vec<&'static str> {
        match self {
            Self::OnsBoundaries(importer) => importer.datasource_ids(),
            Self::OnsEmployment(importer) => importer.datasource_ids(),
            Self::SpaceSyntax(importer) => importer.datasource_ids(),
        }
    }

    fn datasource(&self, datasource_id: &str) -> Result<Datasource> {
        match self {
            Self::OnsBoundaries(importer) => importer.datasource(datasource_id),
            Self::OnsEmployment(importer) => importer.datasource(datasource_id),
            Self::SpaceSyntax(importer) => importer.datasource(datasource_id),
        }
    }

    fn remote_source(&self, datasource: &Datasource) -> Result<RemoteSource> {
        match self {
            Self::OnsBoundaries(importer) => importer.remote_source(datasource),
            Self::OnsEmployment(importer) => importer.remote_source(datasource),
            Self::SpaceSyntax(importer) => importer.remote_source(datasource),
        }
    }

    fn load<S: SubjectStore>(
        &self,
        datasource: &Datasource,
        path: &Path,
        context: &ImportContext,
        store: &mut S,
    ) -> Result<ImportStats> {
        match self {
            Self::OnsBoundaries(importer) => importer.load(datasource, path, context, store),
            Self::OnsEmployment(importer) => importer.load(datasource, path, context, store),
            Self::SpaceSyntax(importer) => importer.load(datasource, path, context, store),
        }
    }
}
