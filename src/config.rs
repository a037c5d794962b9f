//! Configuration management and validation.
//!
//! Provides the runtime settings shared by every importer: where
//! downloads are cached, whether the network may be used, HTTP client
//! settings, and the timestamp used for facts that carry no period of
//! their own.

use crate::constants::{CACHE_DIR_ENV, CACHE_DIR_NAME, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::error::{ImporterError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Global configuration for an import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImporterConfig {
    /// Root directory of the download cache
    pub cache_dir: PathBuf,

    /// Never touch the network; fail when a source is not cached
    pub offline: bool,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,

    /// User-Agent sent with downloads
    pub user_agent: String,

    /// Timestamp for timed values whose source has no period column.
    /// `None` means the wall-clock time at the start of the import.
    pub run_timestamp: Option<NaiveDateTime>,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            offline: false,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: format!("geodata-importer/{}", env!("CARGO_PKG_VERSION")),
            run_timestamp: None,
        }
    }
}

/// Resolve the cache directory: env override, then platform cache dir, then ./cache
fn default_cache_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CACHE_DIR_ENV) {
        debug!("Using cache directory from {}", CACHE_DIR_ENV);
        return PathBuf::from(dir);
    }

    dirs::cache_dir()
        .map(|dir| dir.join(CACHE_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("cache"))
}

impl ImporterConfig {
    /// Use a specific cache directory
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    /// Enable offline mode
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Fix the timestamp used for period-less timed values
    pub fn with_run_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.run_timestamp = Some(timestamp);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Timestamp for this run, falling back to the current time
    pub fn effective_run_timestamp(&self) -> NaiveDateTime {
        self.run_timestamp
            .unwrap_or_else(|| chrono::Utc::now().naive_utc())
    }

    /// Check settings for values that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(ImporterError::configuration(
                "request timeout must be greater than zero",
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ImporterError::configuration("user agent must not be empty"));
        }

        if self.cache_dir.as_os_str().is_empty() {
            return Err(ImporterError::configuration("cache directory must not be empty"));
        }

        Ok(())
    }
}
