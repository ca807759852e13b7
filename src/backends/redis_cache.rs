//! Redis Cache - Distributed Cache Backend
//!
//! Default L2 tier. Expiry is enforced by Redis itself (`PSETEX`).

use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;
use tracing::{debug, info};

/// Default connection string when `REDIS_URL` is unset
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Redis distributed cache with `ConnectionManager` for automatic reconnection
///
/// Unlike the in-process tiers, connection and command failures are returned
/// as errors rather than folded into misses, so the cache manager can surface
/// them to the caller.
pub struct RedisCache {
    /// Redis connection manager - handles reconnection automatically
    conn_manager: ConnectionManager,
}

impl RedisCache {
    /// Connect using `REDIS_URL`, falling back to [`DEFAULT_REDIS_URL`]
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis client cannot be created or connection fails.
    pub async fn new() -> Result<Self> {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());
        Self::with_url(&redis_url).await
    }

    /// Create new Redis cache with custom URL
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis client cannot be created or connection fails.
    pub async fn with_url(redis_url: &str) -> Result<Self> {
        info!(redis_url = %redis_url, "Initializing Redis Cache with ConnectionManager");

        let client = Client::open(redis_url)
            .with_context(|| format!("Failed to create Redis client with URL: {redis_url}"))?;

        let conn_manager = ConnectionManager::new(client)
            .await
            .context("Failed to establish Redis connection manager")?;

        let mut conn = conn_manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("Redis PING health check failed")?;

        info!(redis_url = %redis_url, "Redis Cache connected successfully (ConnectionManager enabled)");

        Ok(Self { conn_manager })
    }
}

/// Millisecond expiry for `PSETEX`; Redis rejects zero
fn expiry_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

// ===== Trait Implementations =====

use crate::traits::{probe, CacheBackend};
use async_trait::async_trait;

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn_manager.clone();
        let value: Option<Vec<u8>> = conn
            .get(key)
            .await
            .with_context(|| format!("Redis GET failed for key '{key}'"))?;
        debug!(key = %key, hit = value.is_some(), "[Redis] GET");
        Ok(value)
    }

    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let _: () = conn
            .pset_ex(key, value, expiry_millis(ttl))
            .await
            .with_context(|| format!("Redis PSETEX failed for key '{key}'"))?;
        debug!(key = %key, ttl_ms = %ttl.as_millis(), "[Redis] Cached key with TTL");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let _: () = conn
            .del(key)
            .await
            .with_context(|| format!("Redis DEL failed for key '{key}'"))?;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        probe(self, "health_check_redis").await
    }

    fn name(&self) -> &'static str {
        "Redis"
    }
}
