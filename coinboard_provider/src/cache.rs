//! Last-value quote cache.
//!
//! Keyed by item id; each `put` overwrites the previous quote for that id. There is no
//! TTL and no eviction. Two stores are provided:
//! - [`MemoryCache`] — plain `HashMap`, lost on restart.
//! - [`FileCache`] — same map persisted as one JSON object; loaded on open and rewritten
//!   on every `put` (temp file + rename).

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use coinboard_common::{Quote, Result};
use log::{debug, info};

/// Key-value store for the last fetched quote per id.
pub trait CacheStore: Send {
    /// Last stored quote for `id`.
    fn get(&self, id: &str) -> Option<Quote>;

    /// Store `quote` under `id`, replacing any previous value.
    fn put(&mut self, id: &str, quote: &Quote) -> Result<()>;
}

/// Volatile cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, Quote>,
}

impl MemoryCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, id: &str) -> Option<Quote> {
        self.entries.get(id).cloned()
    }

    fn put(&mut self, id: &str, quote: &Quote) -> Result<()> {
        self.entries.insert(id.to_string(), quote.clone());
        Ok(())
    }
}

/// Cache persisted to a JSON file.
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    entries: HashMap<String, Quote>,
}

impl FileCache {
    /// Open the cache at `path`, loading existing entries. A missing file is an empty cache.
    pub fn open(path: &Path) -> Result<Self> {
        let entries: HashMap<String, Quote> = match fs::read(path) {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        info!("Quote cache {} opened with {} entries", path.display(), entries.len());
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    fn persist(&self) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec(&self.entries)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Persisted {} cache entries", self.entries.len());
        Ok(())
    }
}

impl CacheStore for FileCache {
    fn get(&self, id: &str) -> Option<Quote> {
        self.entries.get(id).cloned()
    }

    fn put(&mut self, id: &str, quote: &Quote) -> Result<()> {
        self.entries.insert(id.to_string(), quote.clone());
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(id: &str, price: f64) -> Quote {
        Quote::new(id, id, price, 0.0).unwrap()
    }

    #[test]
    fn test_memory_cache_last_write_wins() {
        let mut cache = MemoryCache::new();
        assert!(cache.get("BTC").is_none());
        cache.put("BTC", &quote("BTC", 1.0)).unwrap();
        cache.put("BTC", &quote("BTC", 2.0)).unwrap();
        assert_eq!(cache.get("BTC").unwrap().price, 2.0);
    }

    #[test]
    fn test_file_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = FileCache::open(&path).unwrap();
        assert!(cache.get("ETH").is_none());
        cache.put("ETH", &quote("ETH", 3000.25)).unwrap();
        cache.put("BTC", &quote("BTC", 50000.5)).unwrap();
        drop(cache);

        let reopened = FileCache::open(&path).unwrap();
        assert_eq!(reopened.get("ETH").unwrap().price, 3000.25);
        assert_eq!(reopened.get("BTC").unwrap().price, 50000.5);
    }

    #[test]
    fn test_file_cache_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, b"not json").unwrap();
        assert!(FileCache::open(&path).is_err());
    }
}
