//! Cache Manager - Unified Cache Operations
//!
//! Coordinates an optional L1 and an optional L2 tier behind one
//! get/set/delete facade. Which tiers take part in a call is decided by the
//! instance [`CacheMode`] and the call's [`CacheOptions`]; see
//! [`policy`](crate::policy) for the decision table.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::codecs::JsonCodec;
use crate::config::CacheManagerConfig;
use crate::error::{CacheError, ConfigError, Operation};
use crate::options::{CacheMode, CacheOptions};
use crate::policy::{self, Tier, TierTargets};
use crate::traits::{CacheBackend, CacheCodec};

/// Shared handle to a tier store
pub type Backend = Arc<dyn CacheBackend>;

/// Cache Manager - cache-aside operations across L1 and L2
///
/// Immutable once built: every call only reads the configuration and forwards
/// to the tier stores, so a manager can be shared across tasks behind an `Arc`
/// without locking.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tiered_cache::{Backend, CacheManager, CacheManagerConfig, CacheOptions, JsonCodec};
/// use tiered_cache::backends::DashMapCache;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let l1: Backend = Arc::new(DashMapCache::new());
/// let l2: Backend = Arc::new(DashMapCache::new());
/// let cache = CacheManager::new(Some(l1), Some(l2), Some(JsonCodec), CacheManagerConfig::default())?;
///
/// cache.set("user:1", &"alice", &CacheOptions::new()).await?;
/// let name: Option<String> = cache.get("user:1", &CacheOptions::new()).await?;
/// assert_eq!(name.as_deref(), Some("alice"));
/// # Ok(())
/// # }
/// ```
pub struct CacheManager<C = JsonCodec> {
    l1: Option<Backend>,
    l2: Option<Backend>,
    codec: C,
    mode: CacheMode,
    /// Derived: true exactly when both tiers are present
    overrides_allowed: bool,
    warmup_ttl: Duration,
    l1_default_ttl: Duration,
    l2_default_ttl: Duration,
}

impl<C: CacheCodec> CacheManager<C> {
    /// Validate the tier/mode combination and build a manager.
    ///
    /// Zero TTLs in `config` are replaced with the 5 minute default.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingCodec`] if `codec` is `None`
    /// - [`ConfigError::ModeMismatch`] if exactly one tier is supplied and the
    ///   mode does not name it
    /// - [`ConfigError::MissingTier`] if the mode needs a tier that is absent
    pub fn new(
        l1: Option<Backend>,
        l2: Option<Backend>,
        codec: Option<C>,
        config: CacheManagerConfig,
    ) -> Result<Self, ConfigError> {
        let codec = codec.ok_or(ConfigError::MissingCodec)?;
        let config = config.normalized();
        validate_tiers(config.mode, l1.is_some(), l2.is_some())?;

        let overrides_allowed = l1.is_some() && l2.is_some();

        info!(
            mode = %config.mode,
            l1 = l1.as_ref().map_or("none", |b| b.name()),
            l2 = l2.as_ref().map_or("none", |b| b.name()),
            codec = codec.name(),
            overrides_allowed,
            "Cache Manager initialized"
        );

        Ok(Self {
            l1,
            l2,
            codec,
            mode: config.mode,
            overrides_allowed,
            warmup_ttl: config.warmup_ttl,
            l1_default_ttl: config.l1_default_ttl,
            l2_default_ttl: config.l2_default_ttl,
        })
    }

    /// Get value from cache (L1 first, then L2 with L1 warmup)
    ///
    /// A tier error aborts the call; it never falls through to the next tier.
    /// Copying an L2 hit into L1 is best-effort and never fails the read.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - Hit in a targeted tier
    /// * `Ok(None)` - Miss in every targeted tier
    ///
    /// # Errors
    ///
    /// Per-call misuse ([`CacheError::OverrideNotAllowed`], [`CacheError::NoTarget`],
    /// [`CacheError::TierNotConfigured`], [`CacheError::EmptyKey`]), a tier
    /// failure, or a payload that does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        key: &str,
        opts: &CacheOptions,
    ) -> Result<Option<T>, CacheError> {
        self.check_call(key, opts)?;
        let targets = self.resolve_targets(opts, Operation::Get)?;

        if targets.l1 {
            let l1 = self.backend(Tier::L1)?;
            let hit = l1
                .get(key)
                .await
                .map_err(|e| CacheError::tier(Tier::L1, Operation::Get, e))?;
            if let Some(bytes) = hit {
                debug!(key = %key, tier = %Tier::L1, "[GET] hit");
                return self.decode(&bytes).map(Some);
            }
            debug!(key = %key, tier = %Tier::L1, "[GET] miss");
        }

        if !targets.l2 {
            debug!(key = %key, "[GET] overall miss (L2 not checked)");
            return Ok(None);
        }

        let l2 = self.backend(Tier::L2)?;
        let Some(bytes) = l2
            .get(key)
            .await
            .map_err(|e| CacheError::tier(Tier::L2, Operation::Get, e))?
        else {
            debug!(key = %key, "[GET] overall miss");
            return Ok(None);
        };

        let value = self.decode(&bytes)?;
        debug!(key = %key, tier = %Tier::L2, "[GET] hit");

        if policy::should_warm(self.mode, targets, opts.target_l1) {
            if let Some(l1) = &self.l1 {
                self.warm_l1(l1, key, &bytes).await;
            }
        }

        Ok(Some(value))
    }

    /// Serialize `value` and write it to the targeted tiers
    ///
    /// Both targeted writes are always attempted. With two targets the call
    /// only fails when both writes fail; with one target that tier's error is
    /// returned as is.
    ///
    /// # Errors
    ///
    /// Per-call misuse, a serialization failure (no tier is written), the
    /// single targeted tier's failure, or [`CacheError::BothTiersFailed`].
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        opts: &CacheOptions,
    ) -> Result<(), CacheError> {
        self.check_call(key, opts)?;

        let data = self
            .codec
            .serialize(value)
            .map_err(|source| CacheError::Serialization {
                codec: self.codec.name(),
                source,
            })?;

        let (l1_ttl, l2_ttl) = opts.resolve_ttls(self.l1_default_ttl, self.l2_default_ttl);
        let targets = self.resolve_targets(opts, Operation::Set)?;

        let l1_write = async {
            if targets.l1 {
                Some(self.write(Tier::L1, key, &data, l1_ttl).await)
            } else {
                None
            }
        };
        let l2_write = async {
            if targets.l2 {
                Some(self.write(Tier::L2, key, &data, l2_ttl).await)
            } else {
                None
            }
        };
        let (l1_result, l2_result) = tokio::join!(l1_write, l2_write);

        aggregate_writes(key, l1_result, l2_result)
    }

    /// Remove `key` from every configured tier, whatever the mode
    ///
    /// Every tier is attempted; the first failure is returned afterwards.
    ///
    /// # Errors
    ///
    /// [`CacheError::EmptyKey`], or the first tier failure encountered.
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        let mut first_err = None;
        for (tier, backend) in self.configured() {
            match backend.remove(key).await {
                Ok(()) => debug!(key = %key, tier = %tier, "[DELETE] removed"),
                Err(e) => {
                    warn!(key = %key, tier = %tier, error = %e, "[DELETE] failed, continuing with remaining tiers");
                    first_err.get_or_insert(CacheError::tier(tier, Operation::Delete, e));
                }
            }
        }

        first_err.map_or(Ok(()), Err)
    }

    /// Cache-aside read-through: return the cached value or compute, store
    /// and return it.
    ///
    /// A failure to store the computed value is logged and ignored; the caller
    /// still gets the value. Concurrent misses on the same key each run
    /// `compute_fn`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let user: User = cache.get_or_compute(
    ///     "user:123",
    ///     &CacheOptions::from(CacheStrategy::MediumTerm),
    ///     || async { db.load_user(123).await },
    /// ).await?;
    /// ```
    ///
    /// # Errors
    ///
    /// Any error from the initial read, or [`CacheError::Compute`] if
    /// `compute_fn` fails.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        key: &str,
        opts: &CacheOptions,
        compute_fn: F,
    ) -> Result<T, CacheError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        if let Some(cached) = self.get(key, opts).await? {
            return Ok(cached);
        }

        debug!(key = %key, "Computing fresh value after cache miss");
        let value = compute_fn().await.map_err(CacheError::Compute)?;

        if let Err(e) = self.set(key, &value, opts).await {
            warn!(key = %key, error = %e, "Failed to cache computed value");
        }

        Ok(value)
    }

    /// True when every configured tier reports healthy
    pub async fn health_check(&self) -> bool {
        let mut healthy = true;
        for (tier, backend) in self.configured() {
            if !backend.health_check().await {
                warn!(tier = %tier, backend = backend.name(), "Cache tier health check failed");
                healthy = false;
            }
        }
        healthy
    }

    #[must_use]
    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    /// Whether per-call tier overrides are accepted (both tiers present)
    #[must_use]
    pub fn overrides_allowed(&self) -> bool {
        self.overrides_allowed
    }

    #[must_use]
    pub fn warmup_ttl(&self) -> Duration {
        self.warmup_ttl
    }

    /// (L1, L2) TTLs used when a call does not set its own
    #[must_use]
    pub fn default_ttls(&self) -> (Duration, Duration) {
        (self.l1_default_ttl, self.l2_default_ttl)
    }

    #[must_use]
    pub fn has_tier(&self, tier: Tier) -> bool {
        self.slot(tier).is_some()
    }

    #[must_use]
    pub fn codec(&self) -> &C {
        &self.codec
    }

    // ===== internals =====

    fn check_call(&self, key: &str, opts: &CacheOptions) -> Result<(), CacheError> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }
        if opts.has_tier_override() && !self.overrides_allowed {
            return Err(CacheError::OverrideNotAllowed);
        }
        Ok(())
    }

    fn resolve_targets(&self, opts: &CacheOptions, op: Operation) -> Result<TierTargets, CacheError> {
        let targets = policy::resolve_targets(self.mode, opts.target_l1, opts.target_l2);
        if targets.is_empty() {
            return Err(CacheError::NoTarget { op });
        }
        for tier in targets.iter() {
            self.backend(tier)?;
        }
        Ok(targets)
    }

    fn slot(&self, tier: Tier) -> Option<&Backend> {
        match tier {
            Tier::L1 => self.l1.as_ref(),
            Tier::L2 => self.l2.as_ref(),
        }
    }

    fn backend(&self, tier: Tier) -> Result<&Backend, CacheError> {
        self.slot(tier).ok_or(CacheError::TierNotConfigured { tier })
    }

    fn configured(&self) -> impl Iterator<Item = (Tier, &Backend)> {
        [Tier::L1, Tier::L2]
            .into_iter()
            .filter_map(|tier| self.slot(tier).map(|backend| (tier, backend)))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CacheError> {
        self.codec
            .deserialize(bytes)
            .map_err(|source| CacheError::Deserialization {
                codec: self.codec.name(),
                source,
            })
    }

    async fn write(&self, tier: Tier, key: &str, data: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let backend = self.backend(tier)?;
        backend
            .set_with_ttl(key, data, ttl)
            .await
            .map_err(|e| CacheError::tier(tier, Operation::Set, e))?;
        debug!(key = %key, tier = %tier, ttl_ms = %ttl.as_millis(), size = data.len(), "[SET] written");
        Ok(())
    }

    async fn warm_l1(&self, l1: &Backend, key: &str, bytes: &[u8]) {
        match l1.set_with_ttl(key, bytes, self.warmup_ttl).await {
            Ok(()) => debug!(key = %key, ttl_ms = %self.warmup_ttl.as_millis(), "Warmed L1 from L2 hit"),
            Err(e) => warn!(key = %key, error = %e, "L1 warmup failed (continuing)"),
        }
    }
}

impl<C: CacheCodec> fmt::Debug for CacheManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("l1", &self.l1.as_ref().map(|b| b.name()))
            .field("l2", &self.l2.as_ref().map(|b| b.name()))
            .field("codec", &self.codec)
            .field("mode", &self.mode)
            .field("overrides_allowed", &self.overrides_allowed)
            .field("warmup_ttl", &self.warmup_ttl)
            .field("l1_default_ttl", &self.l1_default_ttl)
            .field("l2_default_ttl", &self.l2_default_ttl)
            .finish()
    }
}

/// Reconcile tier presence with the requested mode.
///
/// A mode that names one tier while both are supplied is accepted; the other
/// tier stays reachable through overrides and `delete`.
fn validate_tiers(mode: CacheMode, has_l1: bool, has_l2: bool) -> Result<(), ConfigError> {
    match (has_l1, has_l2) {
        (true, false) if mode != CacheMode::L1Only => {
            return Err(ConfigError::ModeMismatch {
                configured: Tier::L1,
                mode,
                expected: CacheMode::L1Only,
            });
        }
        (false, true) if mode != CacheMode::L2Only => {
            return Err(ConfigError::ModeMismatch {
                configured: Tier::L2,
                mode,
                expected: CacheMode::L2Only,
            });
        }
        _ => {}
    }

    let (required, unused) = match mode {
        CacheMode::BothLevels => {
            if !has_l1 {
                return Err(ConfigError::MissingTier { mode, tier: Tier::L1 });
            }
            if !has_l2 {
                return Err(ConfigError::MissingTier { mode, tier: Tier::L2 });
            }
            return Ok(());
        }
        CacheMode::L1Only => ((Tier::L1, has_l1), (Tier::L2, has_l2)),
        CacheMode::L2Only => ((Tier::L2, has_l2), (Tier::L1, has_l1)),
    };

    if !required.1 {
        return Err(ConfigError::MissingTier { mode, tier: required.0 });
    }
    if unused.1 {
        warn!(
            mode = %mode,
            ignored = %unused.0,
            "Both tiers configured but mode uses one; the other is only reachable through overrides and delete"
        );
    }
    Ok(())
}

/// Combine per-tier write results of a `set`
fn aggregate_writes(
    key: &str,
    l1: Option<Result<(), CacheError>>,
    l2: Option<Result<(), CacheError>>,
) -> Result<(), CacheError> {
    match (l1, l2) {
        (Some(Err(l1)), Some(Err(l2))) => Err(CacheError::BothTiersFailed {
            l1: Box::new(l1),
            l2: Box::new(l2),
        }),
        (Some(Err(e)), Some(Ok(()))) | (Some(Ok(())), Some(Err(e))) => {
            warn!(key = %key, error = %e, "[SET] partial failure, value kept in the other tier");
            Ok(())
        }
        (Some(Ok(())), Some(Ok(()))) => Ok(()),
        (Some(result), None) | (None, Some(result)) => result,
        (None, None) => Err(CacheError::NoTarget { op: Operation::Set }),
    }
}
