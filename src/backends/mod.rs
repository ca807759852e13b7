//! Cache Backend Implementations
//!
//! Tier stores the cache manager can plug into its L1 and L2 slots.
//!
//! # Available Backends
//!
//! ## In-Process (L1 Tier)
//! - **Moka** - Concurrent cache with capacity-based eviction (default L1, feature: `moka`)
//! - **`DashMap`** - Unbounded concurrent map, always available
//! - **`QuickCache`** - Bounded, lowest-latency reads (feature: `quick_cache`)
//!
//! All in-process backends store per-key deadlines with [`entry`] and purge
//! expired records on read.
//!
//! ## Networked (L2 Tier)
//! - **Redis** - Shared cache with server-side expiry (default L2, feature: `redis`)
//! - **Memcached** - Lightweight shared cache (feature: `memcached`)
//!
//! # Usage
//!
//! ```rust,no_run
//! use tiered_cache::backends::{MokaCache, MokaCacheConfig, RedisCache};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let moka = MokaCache::new(MokaCacheConfig::default());
//! let redis = RedisCache::with_url("redis://localhost:6379").await?;
//! # Ok(())
//! # }
//! ```

pub mod dashmap_cache;
pub mod entry;

#[cfg(feature = "moka")]
pub mod moka_cache;

#[cfg(feature = "redis")]
pub mod redis_cache;

#[cfg(feature = "backend-memcached")]
pub mod memcached_cache;

#[cfg(feature = "backend-quickcache")]
pub mod quickcache_cache;

pub use dashmap_cache::DashMapCache;

#[cfg(feature = "moka")]
pub use moka_cache::{MokaCache, MokaCacheConfig};

#[cfg(feature = "redis")]
pub use redis_cache::RedisCache;

#[cfg(feature = "backend-memcached")]
pub use memcached_cache::MemcachedCache;

#[cfg(feature = "backend-quickcache")]
pub use quickcache_cache::QuickCacheBackend;

/// Default L1 backend
#[cfg(feature = "moka")]
pub type L1Cache = MokaCache;

/// Default L2 backend
#[cfg(feature = "redis")]
pub type L2Cache = RedisCache;
