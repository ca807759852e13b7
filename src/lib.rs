//! Tiered Cache
//!
//! A two-tier cache-aside coordinator for Rust:
//! - **L1**: in-process cache (Moka by default) with per-key expiry
//! - **L2**: shared cache (Redis by default) with server-side expiry
//! - **Modes**: use both tiers, L1 only or L2 only per instance
//! - **Per-call overrides**: force a tier in or out for one request
//! - **L2-to-L1 warmup**: L2 hits are copied into L1 (best-effort)
//! - **Partial-failure tolerant writes**: a Set fails only if every targeted tier fails
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tiered_cache::{CacheOptions, CacheStrategy, CacheSystem};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cache = CacheSystem::new().await?;
//!     let manager = cache.cache_manager();
//!
//!     let user = serde_json::json!({"user": "alice", "score": 100});
//!     manager
//!         .set("user:1", &user, &CacheOptions::from(CacheStrategy::ShortTerm))
//!         .await?;
//!
//!     // L1 first, then L2 (warming L1 on an L2 hit)
//!     let cached: Option<serde_json::Value> = manager.get("user:1", &CacheOptions::new()).await?;
//!     tracing::info!(?cached, "read back");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Request → L1 (in-process) → L2 (shared) → caller loads from origin
//!           ↓ hit             ↓ hit
//!           return            warm L1, return
//! ```

pub mod backends;
pub mod builder;
pub mod cache_manager;
pub mod codecs;
pub mod config;
pub mod error;
pub mod options;
pub mod policy;
pub mod traits;

pub use backends::DashMapCache;
#[cfg(feature = "moka")]
pub use backends::{L1Cache, MokaCache, MokaCacheConfig};
#[cfg(feature = "redis")]
pub use backends::{L2Cache, RedisCache};

#[cfg(feature = "backend-memcached")]
pub use backends::MemcachedCache;

#[cfg(feature = "backend-quickcache")]
pub use backends::QuickCacheBackend;

pub use builder::CacheManagerBuilder;
pub use cache_manager::{Backend, CacheManager};
pub use codecs::JsonCodec;
pub use config::CacheManagerConfig;
pub use error::{CacheError, ConfigError, Operation};
pub use options::{CacheMode, CacheOptions, CacheStrategy, DEFAULT_TTL};
pub use policy::{Tier, TierTargets};
pub use traits::{CacheBackend, CacheCodec};

// Re-export async_trait for user convenience
pub use async_trait::async_trait;

#[cfg(all(feature = "moka", feature = "redis"))]
pub use system::CacheSystem;

#[cfg(all(feature = "moka", feature = "redis"))]
mod system {
    use std::sync::Arc;

    use anyhow::Result;
    use tracing::{info, warn};

    use crate::{Backend, CacheManager, CacheManagerConfig, JsonCodec, MokaCache, MokaCacheConfig, RedisCache};

    /// Default wiring: Moka L1 + Redis L2 + JSON codec
    ///
    /// Mode and TTLs come from the environment (see
    /// [`CacheManagerConfig::from_env`]); Redis from `REDIS_URL`.
    #[derive(Clone)]
    pub struct CacheSystem {
        /// Unified cache manager (primary interface)
        pub cache_manager: Arc<CacheManager<JsonCodec>>,
        /// L1 tier, for direct inspection
        pub l1_cache: Arc<MokaCache>,
        /// L2 tier, for direct inspection
        pub l2_cache: Arc<RedisCache>,
    }

    impl CacheSystem {
        /// Create new cache system with default configuration
        ///
        /// # Errors
        ///
        /// Returns an error if the environment holds an invalid cache setting
        /// or Redis is unreachable.
        pub async fn new() -> Result<Self> {
            let l2_cache = Arc::new(RedisCache::new().await?);
            Self::assemble(l2_cache)
        }

        /// Create cache system with custom Redis URL
        ///
        /// # Errors
        ///
        /// Returns an error if the environment holds an invalid cache setting
        /// or Redis is unreachable.
        pub async fn with_redis_url(redis_url: &str) -> Result<Self> {
            let l2_cache = Arc::new(RedisCache::with_url(redis_url).await?);
            Self::assemble(l2_cache)
        }

        fn assemble(l2_cache: Arc<RedisCache>) -> Result<Self> {
            info!("Initializing Tiered Cache System");

            let config = CacheManagerConfig::from_env()?;
            let l1_cache = Arc::new(MokaCache::new(MokaCacheConfig::default()));

            let l1: Backend = l1_cache.clone();
            let l2: Backend = l2_cache.clone();
            let cache_manager = Arc::new(CacheManager::new(Some(l1), Some(l2), Some(JsonCodec), config)?);

            info!("Tiered Cache System initialized successfully");

            Ok(Self {
                cache_manager,
                l1_cache,
                l2_cache,
            })
        }

        /// Health check across both tiers
        pub async fn health_check(&self) -> bool {
            let healthy = self.cache_manager.health_check().await;
            if healthy {
                info!("Tiered Cache health check passed");
            } else {
                warn!("Tiered Cache health check - partial failure");
            }
            healthy
        }

        /// Get reference to cache manager (primary interface)
        #[must_use]
        pub fn cache_manager(&self) -> &Arc<CacheManager<JsonCodec>> {
            &self.cache_manager
        }
    }
}
