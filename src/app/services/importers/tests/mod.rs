//! Test utilities for importer testing
//!
//! Fixtures under `tests/fixtures/` are copied into a temporary download
//! cache at the path the importer will ask for, and the cache runs in
//! offline mode, so no test touches the network.

use crate::app::services::importers::ImportContext;
use crate::config::ImporterConfig;
use chrono::{NaiveDate, NaiveDateTime};
use std::io::{Cursor, Write};
use std::path::PathBuf;
use tempfile::TempDir;
use zip::CompressionMethod;
use zip::write::FileOptions;

mod employment_tests;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn run_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2018, 3, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
}

/// Offline import context backed by a fresh temporary cache
pub fn offline_context() -> (TempDir, ImportContext) {
    let temp_dir = TempDir::new().unwrap();
    let config = ImporterConfig::default()
        .with_cache_dir(temp_dir.path())
        .with_offline(true)
        .with_run_timestamp(run_timestamp());
    let context = ImportContext::new(config).unwrap();
    (temp_dir, context)
}

/// Place raw bytes in the cache where a fetch of `url` will find them
pub fn seed_cache(context: &ImportContext, url: &str, provider_label: &str, extension: &str, bytes: &[u8]) {
    let path = context.cache.cache_path(url, provider_label, extension);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

pub fn seed_fixture(context: &ImportContext, url: &str, provider_label: &str, extension: &str, name: &str) {
    let bytes = std::fs::read(fixture(name)).unwrap();
    seed_cache(context, url, provider_label, extension, &bytes);
}

/// Build a zip archive in memory from (entry name, content) pairs
pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        let options: FileOptions<'_, ()> =
            FileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
    buf
}
