//! Error handling for importer operations.
//!
//! Collaborator failures (network, CSV, GeoJSON, zip, Parquet) convert
//! straight into [`ImporterError`] without extra wrapping; the remaining
//! variants describe mapping failures that abort an import run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid label pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Datasource is not valid: {datasource_id} (importer {importer})")]
    InvalidDatasource {
        importer: String,
        datasource_id: String,
    },

    #[error("Unknown importer: {name}")]
    UnknownImporter { name: String },

    #[error("No property ending in '{suffix}' found on feature {feature_index}")]
    MissingProperty { suffix: String, feature_index: usize },

    #[error("Feature {feature_index} ({label}) has no geometry")]
    MissingGeometry { feature_index: usize, label: String },

    #[error("Required column '{column}' not found in {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("Cannot convert period '{value}' using rule {rule}")]
    InvalidPeriod { value: String, rule: String },

    #[error("Subject '{label}' of type '{subject_type}' does not exist")]
    UnresolvedSubject { subject_type: String, label: String },

    #[error("Reference to unknown {kind} '{key}'")]
    DanglingReference { kind: &'static str, key: String },

    #[error("Datasource {datasource_id} declares {count} subject types, expected exactly one")]
    AmbiguousSubjectType { datasource_id: String, count: usize },

    #[error("Download of {url} failed with HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("{url} is not cached at {path} and offline mode is enabled")]
    NotCached { url: String, path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Import interrupted: {reason}")]
    Interrupted { reason: String },
}

impl ImporterError {
    /// Create an invalid datasource error for the named importer
    pub fn invalid_datasource(importer: impl Into<String>, datasource_id: impl Into<String>) -> Self {
        Self::InvalidDatasource {
            importer: importer.into(),
            datasource_id: datasource_id.into(),
        }
    }

    /// Create a missing column error
    pub fn missing_column(column: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            source_name: source_name.into(),
        }
    }

    /// Create a period conversion error
    pub fn invalid_period(value: impl Into<String>, rule: impl std::fmt::Debug) -> Self {
        Self::InvalidPeriod {
            value: value.into(),
            rule: format!("{:?}", rule),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImporterError>;
