//! A content-addressed, TTL-bound disk cache of fetch results.
//!
//! [`Store`] keeps one JSON file per logical key (`scheme:identifier`). The file name is
//! the SHA-256 of the key, so arbitrary identifiers map to safe, collision-free names.
//! Every entry carries a schema version; entries written by an older layout are
//! ignored rather than misread.

use super::FetchResult;
use crate::Result;
use chrono::{DateTime, Utc};
use core::time::Duration;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const LOG_TARGET: &str = "     cache";

/// Layout version of the entries written by this build.
pub const CACHE_VERSION: u32 = 1;

/// On-disk representation of a cache entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CacheEntry<R> {
    version: u32,
    cached_at: DateTime<Utc>,
    result: R,
}

/// A TTL-aware, directory-backed store of [`FetchResult`] values.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
    ttl: Duration,
}

impl Store {
    /// Create a store rooted at `cache_dir`. The directory is created on first write.
    #[must_use]
    pub fn new(cache_dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self { dir: cache_dir.into(), ttl }
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file that holds the entry for `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(digest)))
    }

    /// Look up a fresh entry.
    ///
    /// Absent, unreadable, outdated, and expired entries are all reported as `None`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<FetchResult> {
        let path = self.path_for(key);

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Cache miss for '{key}': {e:#}");
                return None;
            }
        };

        let entry: CacheEntry<FetchResult> = match serde_json::from_reader(BufReader::new(file)) {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Cache miss for '{key}', unreadable entry: {e:#}");
                return None;
            }
        };

        if entry.version < CACHE_VERSION {
            log::debug!(target: LOG_TARGET, "Cache miss for '{key}', entry version {} is older than {CACHE_VERSION}", entry.version);
            return None;
        }

        // Entries from the future (clock skew) are treated as fresh
        let age = Utc::now().signed_duration_since(entry.cached_at);
        if age.num_milliseconds() < 0 {
            log::debug!(target: LOG_TARGET, "Cache timestamp is in the future for '{key}' (clock skew detected), treating as fresh");
        } else {
            let age = age.to_std().unwrap_or(Duration::MAX);
            if age > self.ttl {
                log::debug!(target: LOG_TARGET, "Cache expired for '{key}' (age: {age:?}, TTL: {:?})", self.ttl);
                return None;
            }

            log::debug!(target: LOG_TARGET, "Cache hit for '{key}' (age: {age:?})");
        }

        Some(entry.result)
    }

    /// Store `result` under `key`, replacing any existing entry.
    ///
    /// The entry is written to a temporary file in the cache directory and then renamed
    /// into place, so readers never observe a half-written file.
    pub fn set(&self, key: &str, result: &FetchResult) -> Result<()> {
        fs::create_dir_all(&self.dir).into_app_err_with(|| format!("creating directory '{}'", self.dir.display()))?;

        let entry = CacheEntry {
            version: CACHE_VERSION,
            cached_at: Utc::now(),
            result,
        };

        let temp = NamedTempFile::new_in(&self.dir)
            .into_app_err_with(|| format!("creating temporary cache file in '{}'", self.dir.display()))?;

        {
            let mut writer = BufWriter::new(temp.as_file());

            #[cfg(debug_assertions)]
            let written = serde_json::to_writer_pretty(&mut writer, &entry);
            #[cfg(not(debug_assertions))]
            let written = serde_json::to_writer(&mut writer, &entry);

            written.into_app_err_with(|| format!("writing cache entry for '{key}'"))?;
            writer.flush().into_app_err_with(|| format!("flushing cache entry for '{key}'"))?;
        }

        let path = self.path_for(key);
        let _ = temp
            .persist(&path)
            .into_app_err_with(|| format!("renaming cache file to '{}'", path.display()))?;

        log::debug!(target: LOG_TARGET, "Cached '{key}' in '{}'", path.display());
        Ok(())
    }
}
