//! Incremental scan cache.
//!
//! Persists per-file declarations alongside a (size, mtime) fingerprint in a
//! JSON document. A file whose fingerprint still matches is served from the
//! cache without re-parsing; everything else is delegated to the wrapped
//! scanner and the fresh result recorded. The cache is purely a performance
//! optimization: a missing or corrupt cache file starts a cold run, never a
//! failed one.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::error::{Error, Result};
use crate::extract::ParsedFile;
use crate::scanner::SourceScanner;

/// Fingerprint plus declarations for one scanned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file_size: u64,
    pub modified_ns: u64,
    pub classes: Vec<String>,
    pub functions: Vec<String>,
    pub constants: Vec<String>,
    #[serde(default)]
    pub dynamic_defines: bool,
}

impl CacheEntry {
    fn new(parsed: &ParsedFile, file_size: u64, modified_ns: u64) -> Self {
        Self {
            file_size,
            modified_ns,
            classes: parsed.classes.clone(),
            functions: parsed.functions.clone(),
            constants: parsed.constants.clone(),
            dynamic_defines: parsed.dynamic_defines,
        }
    }

    /// A stored entry is reusable iff the size is identical and the stored
    /// mtime is not older than the file's current one. The `>=` tolerates
    /// filesystem mtime-resolution skew; the size check catches most of the
    /// content changes a backward-moving timestamp could hide.
    fn is_valid(&self, file_size: u64, modified_ns: u64) -> bool {
        self.file_size == file_size && self.modified_ns >= modified_ns
    }

    fn to_parsed(&self) -> ParsedFile {
        ParsedFile {
            classes: self.classes.clone(),
            functions: self.functions.clone(),
            constants: self.constants.clone(),
            dynamic_defines: self.dynamic_defines,
        }
    }
}

/// Caching wrapper around a `SourceScanner`.
///
/// Only files presented during this run are written back by `persist`, so
/// entries for files deleted since the previous run are pruned rather than
/// accumulating forever.
pub struct ScanCache<S> {
    inner: S,
    cache_path: PathBuf,
    prior: HashMap<String, CacheEntry>,
    current: BTreeMap<String, CacheEntry>,
}

impl<S: SourceScanner> ScanCache<S> {
    /// Wraps `inner`, loading any prior cache file at `cache_path`.
    pub fn load(inner: S, cache_path: PathBuf) -> Self {
        let prior = std::fs::read_to_string(&cache_path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();

        Self {
            inner,
            cache_path,
            prior,
            current: BTreeMap::new(),
        }
    }

    /// Flushes the entries scanned this run to the cache file. Call once at
    /// end of run, after every input file has been processed.
    pub fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.current)?;
        if let Some(parent) = self.cache_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.cache_path, json).map_err(|source| Error::Io {
            path: self.cache_path.clone(),
            source,
        })
    }
}

impl<S: SourceScanner> SourceScanner for ScanCache<S> {
    fn scan(&mut self, path: &Path) -> Result<ParsedFile> {
        let metadata = std::fs::metadata(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_size = metadata.len();
        let modified_ns = metadata
            .modified()
            .ok()
            .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or(0);

        let key = path.to_string_lossy().to_string();

        if let Some(entry) = self.prior.get(&key)
            && entry.is_valid(file_size, modified_ns)
        {
            let parsed = entry.to_parsed();
            self.current.insert(key, entry.clone());
            return Ok(parsed);
        }

        let parsed = self.inner.scan(path)?;
        self.current
            .insert(key, CacheEntry::new(&parsed, file_size, modified_ns));
        Ok(parsed)
    }
}
