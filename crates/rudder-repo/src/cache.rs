//! Content-addressed disk cache with time-based freshness
//!
//! Every remote read goes through [`CacheStore::fetch`]. A URL maps to
//! `<root>/<hex sha256(url)>`; the file's modification time is the only
//! freshness signal, there is no sidecar metadata.
//!
//! - Fresh file (`age < lifetime`): served from disk, no network access
//! - Missing or stale file: fetched, written atomically, then served
//! - Failed fetch: the error is returned, a stale file is never served
//!
//! Concurrent reads of the same URL are serialized per key, so a burst of
//! callers hitting a stale entry triggers a single fetch.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use crate::error::{RepoError, Result};
use crate::fetch::Fetcher;

const TEMP_PREFIX: &str = ".tmp-";

/// Read-through disk cache in front of a [`Fetcher`]
pub struct CacheStore {
    root: PathBuf,
    lifetime: Duration,
    fetcher: Arc<dyn Fetcher>,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl CacheStore {
    /// Open a cache rooted at `root`, creating the directory if needed
    pub fn new(
        root: impl Into<PathBuf>,
        lifetime: Duration,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| cache_error(&root, e))?;

        Ok(Self {
            root,
            lifetime,
            fetcher,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// How long an entry stays fresh
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Cache key of a URL: hex-encoded SHA-256 of the full URL string
    pub fn key_for(url: &str) -> String {
        hex::encode(Sha256::digest(url.as_bytes()))
    }

    /// Location of the cache file for a URL
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.root.join(Self::key_for(url))
    }

    /// Whether a fresh copy of `url` is on disk
    pub fn is_fresh(&self, url: &str) -> Result<bool> {
        self.is_fresh_at(&self.path_for(url))
    }

    fn is_fresh_at(&self, path: &Path) -> Result<bool> {
        match fs::metadata(path) {
            Ok(meta) => {
                let modified = meta.modified().map_err(|e| cache_error(path, e))?;
                Ok(age_of(modified) < self.lifetime)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(cache_error(path, e)),
        }
    }

    /// Return the bytes behind `url`, refreshing the cached copy when stale
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let key = Self::key_for(url);
        let lock = self.lock_for(&key);

        let result = {
            let _guard = lock.lock().await;
            self.read_through(url, &key).await
        };

        self.release_lock(&key, &lock);
        result
    }

    async fn read_through(&self, url: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.root.join(key);

        if self.is_fresh_at(&path)? {
            tracing::debug!("cache hit for {} ({})", url, key);
        } else {
            tracing::debug!("cache miss for {} ({}), fetching", url, key);
            let data = self.fetcher.fetch(url).await?;
            self.write_atomic(&path, &data)?;
        }

        fs::read(&path).map_err(|e| cache_error(&path, e))
    }

    fn lock_for(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(key.to_string()).or_default().clone()
    }

    /// Forget the lock of `key` once no other caller holds or awaits it
    ///
    /// Clones are only handed out under the table mutex, so a count of two
    /// (the table and `lock`) cannot grow while it is held. A caller
    /// cancelled mid-wait may leave an entry behind until the next fetch of
    /// the same key.
    fn release_lock(&self, key: &str, lock: &Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(lock) == 2 {
            locks.remove(key);
        }
    }

    /// Replace the file at `path` without exposing partial content
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| cache_error(&self.root, e))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(&self.root)
            .map_err(|e| cache_error(&self.root, e))?;
        tmp.write_all(data).map_err(|e| cache_error(tmp.path(), e))?;
        tmp.persist(path).map_err(|e| cache_error(path, e.error))?;

        Ok(())
    }

    /// Drop the cached copy of `url`, forcing the next read to fetch
    pub fn invalidate(&self, url: &str) -> Result<bool> {
        let path = self.path_for(url);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(cache_error(&path, e)),
        }
    }

    /// Summarize the entries currently on disk
    pub fn stats(&self) -> Result<CacheStats> {
        let mut stats = CacheStats::default();

        for path in self.entry_paths()? {
            let meta = fs::metadata(&path).map_err(|e| cache_error(&path, e))?;
            stats.entry_count += 1;
            stats.total_bytes += meta.len();

            let modified = meta.modified().map_err(|e| cache_error(&path, e))?;
            if age_of(modified) >= self.lifetime {
                stats.stale_count += 1;
            }
        }

        Ok(stats)
    }

    /// Remove every cache entry, returning how many were deleted
    pub fn clear(&self) -> Result<usize> {
        let paths = self.entry_paths()?;
        for path in &paths {
            fs::remove_file(path).map_err(|e| cache_error(path, e))?;
        }
        Ok(paths.len())
    }

    fn entry_paths(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(cache_error(&self.root, e)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| cache_error(&self.root, e))?;
            let is_temp = entry.file_name().to_string_lossy().starts_with(TEMP_PREFIX);
            let is_file = entry
                .file_type()
                .map_err(|e| cache_error(&entry.path(), e))?
                .is_file();
            if is_file && !is_temp {
                paths.push(entry.path());
            }
        }

        Ok(paths)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub entry_count: usize,
    pub total_bytes: u64,
    pub stale_count: usize,
}

/// Time since `modified`; timestamps in the future count as age zero
fn age_of(modified: SystemTime) -> Duration {
    SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO)
}

fn cache_error(path: &Path, e: std::io::Error) -> RepoError {
    RepoError::CacheError {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
