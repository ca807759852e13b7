//! Cache modes, strategies and per-call options

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// TTL substituted for any unset or zero TTL setting (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default tier participation for a cache manager instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// Read and write both tiers; L2 hits warm L1
    #[default]
    BothLevels,
    /// Read and write L1 only
    L1Only,
    /// Read and write L2 only; no warmup
    L2Only,
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BothLevels => "BothLevels",
            Self::L1Only => "L1Only",
            Self::L2Only => "L2Only",
        })
    }
}

impl FromStr for CacheMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "both" | "both_levels" | "bothlevels" => Ok(Self::BothLevels),
            "l1" | "l1_only" | "l1only" => Ok(Self::L1Only),
            "l2" | "l2_only" | "l2only" => Ok(Self::L2Only),
            other => Err(format!("unknown cache mode '{other}'")),
        }
    }
}

/// Cache strategies for different data types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStrategy {
    /// Real-time data - 10 seconds TTL
    RealTime,
    /// Short-term data - 5 minutes TTL
    ShortTerm,
    /// Medium-term data - 1 hour TTL
    MediumTerm,
    /// Long-term data - 3 hours TTL
    LongTerm,
    /// Custom TTL
    Custom(Duration),
    /// Default strategy (5 minutes)
    Default,
}

impl CacheStrategy {
    /// Convert strategy to duration
    #[must_use]
    pub fn to_duration(&self) -> Duration {
        match self {
            Self::RealTime => Duration::from_secs(10),
            Self::ShortTerm | Self::Default => DEFAULT_TTL,
            Self::MediumTerm => Duration::from_secs(3600),
            Self::LongTerm => Duration::from_secs(10800),
            Self::Custom(duration) => *duration,
        }
    }
}

/// Per-call options shared by `get` and `set`.
///
/// Tier flags: `None` follows the instance mode, `Some(true)`/`Some(false)`
/// forces the tier in or out for this call. Overrides are rejected unless both
/// tiers are configured.
///
/// TTLs are only read by `set`; `None` or zero falls back to the instance
/// default for that tier.
///
/// ```rust
/// use std::time::Duration;
/// use tiered_cache::CacheOptions;
///
/// let opts = CacheOptions::new()
///     .target_l2(false)
///     .l1_ttl(Duration::from_secs(30));
/// assert_eq!(opts.target_l2, Some(false));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheOptions {
    pub target_l1: Option<bool>,
    pub target_l2: Option<bool>,
    pub l1_ttl: Option<Duration>,
    pub l2_ttl: Option<Duration>,
}

impl CacheOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn target_l1(mut self, enabled: bool) -> Self {
        self.target_l1 = Some(enabled);
        self
    }

    #[must_use]
    pub fn target_l2(mut self, enabled: bool) -> Self {
        self.target_l2 = Some(enabled);
        self
    }

    #[must_use]
    pub fn l1_ttl(mut self, ttl: Duration) -> Self {
        self.l1_ttl = Some(ttl);
        self
    }

    #[must_use]
    pub fn l2_ttl(mut self, ttl: Duration) -> Self {
        self.l2_ttl = Some(ttl);
        self
    }

    /// Use the strategy's TTL for both tiers
    #[must_use]
    pub fn with_strategy(self, strategy: CacheStrategy) -> Self {
        let ttl = strategy.to_duration();
        self.l1_ttl(ttl).l2_ttl(ttl)
    }

    /// Whether either tier flag is set
    #[must_use]
    pub fn has_tier_override(&self) -> bool {
        self.target_l1.is_some() || self.target_l2.is_some()
    }

    /// Resolve the (L1, L2) TTL pair against instance defaults
    #[must_use]
    pub fn resolve_ttls(&self, l1_default: Duration, l2_default: Duration) -> (Duration, Duration) {
        (
            positive_or(self.l1_ttl, l1_default),
            positive_or(self.l2_ttl, l2_default),
        )
    }
}

impl From<CacheStrategy> for CacheOptions {
    fn from(strategy: CacheStrategy) -> Self {
        Self::new().with_strategy(strategy)
    }
}

pub(crate) fn positive_or(ttl: Option<Duration>, fallback: Duration) -> Duration {
    match ttl {
        Some(ttl) if !ttl.is_zero() => ttl,
        _ => fallback,
    }
}
