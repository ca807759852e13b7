//! Cache Manager Builder
//!
//! Assembles a [`CacheManager`] from any pair of tier stores, a codec and a
//! configuration. Validation happens once, in [`build`](CacheManagerBuilder::build).
//!
//! # Example: Both Tiers
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tiered_cache::CacheManagerBuilder;
//! use tiered_cache::backends::DashMapCache;
//!
//! let cache = CacheManagerBuilder::new()
//!     .with_l1(Arc::new(DashMapCache::new()))
//!     .with_l2(Arc::new(DashMapCache::new()))
//!     .with_warmup_ttl(Duration::from_secs(60))
//!     .build()
//!     .unwrap();
//! assert!(cache.overrides_allowed());
//! ```
//!
//! # Example: L1 Only
//!
//! ```rust
//! use std::sync::Arc;
//! use tiered_cache::{CacheManagerBuilder, CacheMode};
//! use tiered_cache::backends::DashMapCache;
//!
//! let cache = CacheManagerBuilder::new()
//!     .with_l1(Arc::new(DashMapCache::new()))
//!     .with_mode(CacheMode::L1Only)
//!     .build()
//!     .unwrap();
//! assert!(!cache.overrides_allowed());
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache_manager::{Backend, CacheManager};
use crate::codecs::JsonCodec;
use crate::config::CacheManagerConfig;
use crate::error::ConfigError;
use crate::options::CacheMode;
use crate::traits::{CacheBackend, CacheCodec};

/// Builder for [`CacheManager`]
///
/// Starts with no tiers, the JSON codec and [`CacheManagerConfig::default`]
/// (`BothLevels`, 5 minute TTLs).
pub struct CacheManagerBuilder<C = JsonCodec> {
    l1_backend: Option<Backend>,
    l2_backend: Option<Backend>,
    codec: Option<C>,
    config: CacheManagerConfig,
}

impl CacheManagerBuilder<JsonCodec> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            l1_backend: None,
            l2_backend: None,
            codec: Some(JsonCodec),
            config: CacheManagerConfig::default(),
        }
    }
}

impl Default for CacheManagerBuilder<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CacheCodec> CacheManagerBuilder<C> {
    /// Configure the L1 (in-process) tier
    #[must_use]
    pub fn with_l1(mut self, backend: Arc<dyn CacheBackend>) -> Self {
        self.l1_backend = Some(backend);
        self
    }

    /// Configure the L2 (networked) tier
    #[must_use]
    pub fn with_l2(mut self, backend: Arc<dyn CacheBackend>) -> Self {
        self.l2_backend = Some(backend);
        self
    }

    /// Swap the serializer
    #[must_use]
    pub fn with_codec<D: CacheCodec>(self, codec: D) -> CacheManagerBuilder<D> {
        CacheManagerBuilder {
            l1_backend: self.l1_backend,
            l2_backend: self.l2_backend,
            codec: Some(codec),
            config: self.config,
        }
    }

    /// Replace the whole configuration
    #[must_use]
    pub fn with_config(mut self, config: CacheManagerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: CacheMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// TTL for L1 copies made after an L2 hit
    #[must_use]
    pub fn with_warmup_ttl(mut self, ttl: Duration) -> Self {
        self.config.warmup_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_l1_default_ttl(mut self, ttl: Duration) -> Self {
        self.config.l1_default_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_l2_default_ttl(mut self, ttl: Duration) -> Self {
        self.config.l2_default_ttl = ttl;
        self
    }

    /// Validate and build
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from [`CacheManager::new`].
    pub fn build(self) -> Result<CacheManager<C>, ConfigError> {
        debug!(
            l1 = self.l1_backend.as_ref().map_or("none", |b| b.name()),
            l2 = self.l2_backend.as_ref().map_or("none", |b| b.name()),
            mode = %self.config.mode,
            "Building Cache Manager"
        );
        CacheManager::new(self.l1_backend, self.l2_backend, self.codec, self.config)
    }
}
