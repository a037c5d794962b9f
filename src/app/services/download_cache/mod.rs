//! Download cache for remote datasource files
//!
//! Every remote file is stored under `<cache_dir>/<client_label>/` with a
//! file name derived from the URL (UUID v3 in the URL namespace), so a
//! second fetch of the same URL is served from disk. Downloads are
//! streamed into a temporary file in the target directory and persisted
//! atomically; a partial download is never visible at the cache path.

use crate::config::ImporterConfig;
use crate::error::{ImporterError, Result};
use futures::StreamExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// A file present in the download cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFile {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Local cache in front of HTTP downloads
#[derive(Debug, Clone)]
pub struct DownloadCache {
    cache_dir: PathBuf,
    offline: bool,
    client: reqwest::Client,
}

impl DownloadCache {
    /// Create a cache from the importer configuration
    pub fn new(config: &ImporterConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            cache_dir: config.cache_dir.clone(),
            offline: config.offline,
            client,
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Directory holding all downloads made on behalf of `client_label`
    pub fn client_dir(&self, client_label: &str) -> PathBuf {
        self.cache_dir.join(client_label)
    }

    /// Location a URL is (or will be) cached at
    pub fn cache_path(&self, url: &str, client_label: &str, extension: &str) -> PathBuf {
        let file_stem = Uuid::new_v3(&Uuid::NAMESPACE_URL, url.as_bytes());
        let extension = extension.trim_start_matches('.');
        self.client_dir(client_label)
            .join(format!("{}.{}", file_stem, extension))
    }

    /// Return a local path holding the content of `url`, downloading it if needed
    pub async fn fetch(&self, url: &str, client_label: &str, extension: &str) -> Result<PathBuf> {
        let path = self.cache_path(url, client_label, extension);

        if path.is_file() {
            debug!("Cache hit for {} at {}", url, path.display());
            return Ok(path);
        }

        if self.offline {
            return Err(ImporterError::NotCached {
                url: url.to_string(),
                path,
            });
        }

        info!("Downloading {}", url);
        let bytes = self.download(url, &path).await?;
        info!("Cached {} bytes at {}", bytes, path.display());

        Ok(path)
    }

    /// Stream the response body of `url` into `target`
    async fn download(&self, url: &str, target: &Path) -> Result<u64> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImporterError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let parent = target.parent().unwrap_or(&self.cache_dir);
        std::fs::create_dir_all(parent)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        let mut body = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            temp_file.write_all(&chunk)?;
            written += chunk.len() as u64;
        }

        temp_file.flush()?;
        temp_file.persist(target).map_err(|e| e.error)?;

        Ok(written)
    }

    /// List cached files for a client label, sorted by path
    pub fn cached_files(&self, client_label: &str) -> Result<Vec<CachedFile>> {
        let dir = self.client_dir(client_label);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if metadata.is_file() {
                files.push(CachedFile {
                    path: entry.path(),
                    size_bytes: metadata.len(),
                });
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Remove every cached file for a client label, returning how many were removed
    pub fn clear(&self, client_label: &str) -> Result<usize> {
        let files = self.cached_files(client_label)?;
        for file in &files {
            std::fs::remove_file(&file.path)?;
        }

        info!(
            "Removed {} cached files for {}",
            files.len(),
            client_label
        );
        Ok(files.len())
    }
}
