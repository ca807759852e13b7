//! `DashMap` Cache - Simple Concurrent `HashMap` Backend
//!
//! A lightweight in-process tier with no eviction policy. Handy for tests
//! and small, bounded key spaces.

use anyhow::Result;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::entry::{decode_entry, encode_entry, is_stale, Decoded};

/// Simple concurrent cache using `DashMap`
///
/// **Features**:
/// - Lock-free concurrent reads/writes
/// - Per-key expiry via the shared entry encoding
/// - Lazy purge on read, plus `cleanup_expired` for a manual sweep
///
/// **Limitations**:
/// - No size limits (unbounded growth)
///
/// **Example**:
/// ```rust
/// use tiered_cache::backends::DashMapCache;
/// use tiered_cache::traits::CacheBackend;
/// use std::time::Duration;
///
/// # async fn example() -> anyhow::Result<()> {
/// let cache = DashMapCache::new();
///
/// cache.set_with_ttl("user:1", b"alice", Duration::from_secs(60)).await?;
/// assert_eq!(cache.get("user:1").await?, Some(b"alice".to_vec()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DashMapCache {
    map: Arc<DashMap<String, Vec<u8>>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    sets: Arc<AtomicU64>,
}

impl DashMapCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            sets: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Remove every expired or malformed record. Returns how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let mut removed = 0;
        self.map.retain(|_, raw| {
            if is_stale(raw) {
                removed += 1;
                false
            } else {
                true
            }
        });
        if removed > 0 {
            debug!(count = removed, "[DashMap] Cleaned up expired entries");
        }
        removed
    }

    /// Drop the record under `key` if it is still stale. A write that landed
    /// after the stale read is kept.
    fn purge_stale(&self, key: &str) {
        self.map.remove_if(key, |_, raw| is_stale(raw));
    }

    /// Whether a raw record is stored for `key`, expired or not
    #[doc(hidden)]
    #[must_use]
    pub fn contains_raw(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// (hits, misses, sets)
    #[must_use]
    pub fn counters(&self) -> (u64, u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            self.sets.load(Ordering::Relaxed),
        )
    }
}

impl Default for DashMapCache {
    fn default() -> Self {
        Self::new()
    }
}

// ===== Trait Implementations =====

use crate::traits::{probe, CacheBackend};
use async_trait::async_trait;

#[async_trait]
impl CacheBackend for DashMapCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let live = match self.map.get(key) {
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return Ok(None);
            }
            Some(raw) => match decode_entry(&raw) {
                Decoded::Live(payload) => Some(payload.to_vec()),
                Decoded::Expired | Decoded::Malformed => None,
            },
        };

        if live.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            // read guard is released above; removing while holding it would deadlock
            self.purge_stale(key);
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        Ok(live)
    }

    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        self.map.insert(key.to_string(), encode_entry(value, ttl));
        self.sets.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, ttl_ms = %ttl.as_millis(), "[DashMap] Cached key with TTL");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.map.remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        probe(self, "health_check_dashmap").await
    }

    fn name(&self) -> &'static str {
        "DashMap"
    }
}
