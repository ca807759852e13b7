//! `QuickCache` - Fast In-Memory Cache Backend
//!
//! Bounded alternative L1 tier using `quick_cache`'s CLOCK-Pro eviction.

use anyhow::Result;
use quick_cache::sync::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::entry::{decode_entry, encode_entry, is_stale, Decoded};

/// `QuickCache` in-memory cache with per-key TTL support
///
/// **When to use `QuickCache` vs Moka**:
/// - Use `QuickCache` for the lowest read latency with a fixed entry budget
/// - Use Moka when you need a cache-wide TTL ceiling or idle eviction
pub struct QuickCacheBackend {
    cache: Cache<String, Arc<[u8]>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl QuickCacheBackend {
    /// Create a cache holding at most `max_capacity` entries
    ///
    /// # Errors
    ///
    /// Returns an error if `max_capacity` does not fit in `usize`.
    pub fn new(max_capacity: u64) -> Result<Self> {
        info!(capacity = max_capacity, "Initializing QuickCache");

        Ok(Self {
            cache: Cache::new(usize::try_from(max_capacity)?),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Number of stored records, including ones not yet purged
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop the record under `key` if it is still stale
    fn purge_stale(&self, key: &str) {
        self.cache.remove_if(key, |raw| is_stale(raw));
    }

    /// (hits, misses)
    #[must_use]
    pub fn counters(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}

// ===== Trait Implementations =====

use crate::traits::{probe, CacheBackend};
use async_trait::async_trait;

#[async_trait]
impl CacheBackend for QuickCacheBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let Some(raw) = self.cache.get(key) else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return Ok(None);
        };

        if let Decoded::Live(payload) = decode_entry(&raw) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Some(payload.to_vec()));
        }

        self.purge_stale(key);
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, "[QuickCache] Purged stale entry");
        Ok(None)
    }

    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        self.cache
            .insert(key.to_string(), encode_entry(value, ttl).into());
        debug!(key = %key, ttl_ms = %ttl.as_millis(), "[QuickCache] Cached key with TTL");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.cache.remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        probe(self, "health_check_quickcache").await
    }

    fn name(&self) -> &'static str {
        "QuickCache"
    }
}
