//! Memcached Cache - Distributed Cache Backend
//!
//! Alternative L2 tier. Memcached enforces expiry server-side with
//! one-second granularity.

use anyhow::{anyhow, Result};
use std::time::Duration;
use tracing::{debug, info};

/// Default connection string when `MEMCACHED_URL` is unset
pub const DEFAULT_MEMCACHED_URL: &str = "memcache://127.0.0.1:11211";

/// Memcached distributed cache
///
/// The `memcache` client is blocking; calls are short and run inline on the
/// current task.
pub struct MemcachedCache {
    client: memcache::Client,
}

impl MemcachedCache {
    /// Connect using `MEMCACHED_URL`, falling back to [`DEFAULT_MEMCACHED_URL`]
    ///
    /// # Errors
    ///
    /// Returns an error if the Memcached client cannot be created.
    pub fn new() -> Result<Self> {
        let memcached_url = std::env::var("MEMCACHED_URL")
            .unwrap_or_else(|_| DEFAULT_MEMCACHED_URL.to_string());
        Self::with_url(&memcached_url)
    }

    /// Connect to `memcached_url` and verify the server answers `version`
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or the version probe fails.
    pub fn with_url(memcached_url: &str) -> Result<Self> {
        info!(url = %memcached_url, "Initializing Memcached Cache");

        let client = memcache::connect(memcached_url)
            .map_err(|e| anyhow!("Failed to connect to Memcached: {e}"))?;

        let versions = client
            .version()
            .map_err(|e| anyhow!("Memcached connection test failed: {e}"))?;
        info!(
            url = %memcached_url,
            server_count = versions.len(),
            "Memcached Cache connected successfully"
        );

        Ok(Self { client })
    }
}

/// Whole seconds for Memcached expiry, rounded up so short TTLs do not turn
/// into 0 (which Memcached reads as "never expire")
fn expiry_secs(ttl: Duration) -> u32 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    u32::try_from(secs.max(1)).unwrap_or(u32::MAX)
}

// ===== Trait Implementations =====

use crate::traits::{probe, CacheBackend};
use async_trait::async_trait;

#[async_trait]
impl CacheBackend for MemcachedCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.client
            .get::<Vec<u8>>(key)
            .map_err(|e| anyhow!("Memcached GET failed: {e}"))
    }

    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        self.client
            .set(key, value, expiry_secs(ttl))
            .map_err(|e| anyhow!("Memcached SET failed: {e}"))?;
        debug!(key = %key, ttl_secs = expiry_secs(ttl), "[Memcached] Cached key with TTL");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.client
            .delete(key)
            .map_err(|e| anyhow!("Memcached DELETE failed: {e}"))?;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        probe(self, "health_check_memcached").await
    }

    fn name(&self) -> &'static str {
        "Memcached"
    }
}
