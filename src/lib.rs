//! Geodata Importer Library
//!
//! Importers that load open geographic and statistical datasets into a
//! common subject/attribute/value model.
//!
//! This library provides tools for:
//! - Fetching remote files through a local, URL-keyed download cache
//! - Mapping ONS boundary GeoJSON onto LSOA, MSOA and local authority subjects
//! - Mapping Nomisweb employment CSV extracts onto timed values
//! - Mapping the Space Syntax OpenMapping archive onto subjects, timed and fixed values
//! - Storing and querying the result in memory, and exporting it as Parquet

pub mod config;
pub mod constants;
pub mod error;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod download_cache;
        pub mod importers;
        pub mod parquet_export;
        pub mod subject_store;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Attribute, Datasource, Provider, Subject, SubjectType};
pub use app::services::importers::{ImportContext, Importer, ImporterKind};
pub use app::services::subject_store::{MemoryStore, SubjectStore};
pub use config::ImporterConfig;
pub use error::{ImporterError, Result};
