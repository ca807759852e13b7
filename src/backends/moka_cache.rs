//! Moka Cache - In-Memory Cache Backend
//!
//! Default L1 tier. Moka's own TTL is cache-wide, so per-key deadlines are
//! carried in the stored bytes (see [`entry`](super::entry)).

use anyhow::Result;
use moka::future::Cache;
use moka::ops::compute::Op;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::entry::{decode_entry, encode_entry, is_stale, Decoded};

/// Configuration for `MokaCache`
#[derive(Debug, Clone, Copy)]
pub struct MokaCacheConfig {
    /// Max number of entries before Moka starts evicting
    pub max_capacity: u64,
    /// Cache-wide upper bound on entry lifetime. Per-key TTLs longer than
    /// this are cut short to it. The default (3 hours) covers every
    /// [`CacheStrategy`](crate::CacheStrategy) preset.
    pub time_to_live: Duration,
    /// Evict entries not read for this long
    pub time_to_idle: Option<Duration>,
}

impl Default for MokaCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            time_to_live: Duration::from_secs(3 * 3600),
            time_to_idle: None,
        }
    }
}

/// Moka in-memory cache with per-key TTL support
///
/// Expired entries are reported as misses and removed on the read that
/// notices them.
pub struct MokaCache {
    cache: Cache<String, Arc<[u8]>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    sets: Arc<AtomicU64>,
    expired: Arc<AtomicU64>,
}

impl MokaCache {
    /// Create new Moka cache
    #[must_use]
    pub fn new(config: MokaCacheConfig) -> Self {
        let mut builder = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.time_to_live);
        if let Some(tti) = config.time_to_idle {
            builder = builder.time_to_idle(tti);
        }
        let cache = builder.build();

        info!(
            capacity = config.max_capacity,
            ttl_ceiling_secs = config.time_to_live.as_secs(),
            "Moka Cache initialized with per-key TTL support"
        );

        Self {
            cache,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            sets: Arc::new(AtomicU64::new(0)),
            expired: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Whether a raw record is stored for `key`, expired or not
    #[doc(hidden)]
    pub async fn contains_raw(&self, key: &str) -> bool {
        self.cache.get(key).await.is_some()
    }

    /// Drop the record under `key` if it is still stale. Runs under Moka's
    /// per-key compute lock, so a write that landed after the stale read is kept.
    async fn purge_stale(&self, key: &str) {
        self.cache
            .entry_by_ref(key)
            .and_compute_with(|current| {
                let op = match current {
                    Some(entry) if is_stale(entry.value()) => Op::Remove,
                    _ => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;
    }

    /// Snapshot of this backend's counters
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            size: self.cache.entry_count(),
        }
    }
}

impl Default for MokaCache {
    fn default() -> Self {
        Self::new(MokaCacheConfig::default())
    }
}

// ===== Trait Implementations =====

use crate::traits::{probe, CacheBackend};
use async_trait::async_trait;

#[async_trait]
impl CacheBackend for MokaCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let Some(raw) = self.cache.get(key).await else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return Ok(None);
        };

        match decode_entry(&raw) {
            Decoded::Live(payload) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(payload.to_vec()))
            }
            Decoded::Expired | Decoded::Malformed => {
                self.purge_stale(key).await;
                self.misses.fetch_add(1, Ordering::Relaxed);
                self.expired.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "[Moka] Purged stale entry");
                Ok(None)
            }
        }
    }

    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let raw: Arc<[u8]> = encode_entry(value, ttl).into();
        self.cache.insert(key.to_string(), raw).await;
        self.sets.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, ttl_ms = %ttl.as_millis(), "[Moka] Cached key with TTL");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.cache.remove(key).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        probe(self, "health_check_moka").await
    }

    fn name(&self) -> &'static str {
        "Moka"
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    /// Reads that found an expired or malformed record and purged it
    pub expired: u64,
    /// Approximate entry count (Moka updates this lazily)
    pub size: u64,
}
