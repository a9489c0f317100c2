//! Cache-or-fetch resolution of a single item.
//!
//! With `prefer_cache` set, a cached quote is returned as-is and no network call is made.
//! Otherwise the fetcher is called exactly once; a successful quote overwrites the cache
//! entry, a failed fetch leaves the cache untouched.
//!
//! The cache lock is never held while fetching, so concurrent resolutions of different
//! items do not serialize on the network.

use std::sync::{Arc, Mutex};

use coinboard_common::{Quote, Result};
use log::{debug, error, warn};

use crate::cache::CacheStore;
use crate::fetcher::QuoteFetcher;

/// A resolved quote and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// The quote.
    pub quote: Quote,
    /// `true` if served from cache without a fetch.
    pub from_cache: bool,
}

/// Resolves item ids to quotes, cache-first on request.
pub struct Resolver {
    fetcher: Arc<dyn QuoteFetcher>,
    cache: Mutex<Box<dyn CacheStore>>,
}

impl Resolver {
    /// Create a resolver over `fetcher` and `cache`.
    pub fn new(fetcher: Arc<dyn QuoteFetcher>, cache: Box<dyn CacheStore>) -> Self {
        Self {
            fetcher,
            cache: Mutex::new(cache),
        }
    }

    /// Resolve `id`, answering from cache when `prefer_cache` is set and an entry exists.
    pub fn resolve(&self, id: &str, prefer_cache: bool) -> Result<Resolved> {
        debug!("resolve: id={}; prefer_cache={}", id, prefer_cache);
        if prefer_cache {
            if let Some(quote) = self.cache.lock()?.get(id) {
                debug!("Resolving {} from cache", id);
                return Ok(Resolved {
                    quote,
                    from_cache: true,
                });
            }
        }

        let quote = self.fetcher.fetch(id).inspect_err(|e| {
            error!("Fetch failed: id={}; {}", id, e);
        })?;
        debug!("Resolving {} from remote", id);
        if let Err(e) = self.cache.lock()?.put(id, &quote) {
            warn!("Failed to persist cache entry for {}: {}", id, e);
        }
        Ok(Resolved {
            quote,
            from_cache: false,
        })
    }

    /// Ids to track when nothing is configured.
    pub fn fallback_ids(&self, limit: usize) -> Result<Vec<String>> {
        self.fetcher.top_ids(limit)
    }
}
