//! Error types
//!
//! Backends speak `anyhow::Result`; the cache manager turns those into typed
//! errors so callers can tell configuration mistakes, per-call misuse and
//! transport failures apart.

use std::fmt;

use thiserror::Error;

use crate::options::CacheMode;
use crate::policy::Tier;

/// Construction-time errors. The configuration must be fixed and the manager
/// rebuilt; nothing is retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No serializer was supplied
    #[error("serializer is required")]
    MissingCodec,

    /// The requested mode needs a tier that was not supplied
    #[error("{mode} requires the {tier} cache to be configured")]
    MissingTier { mode: CacheMode, tier: Tier },

    /// Exactly one tier was supplied but the mode does not name it
    #[error("only {configured} configured but mode is {mode}; set mode to {expected} or configure both tiers")]
    ModeMismatch {
        configured: Tier,
        mode: CacheMode,
        expected: CacheMode,
    },

    /// An environment variable held a value that could not be parsed
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// The operation a tier was performing when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Set,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Delete => "delete",
        })
    }
}

/// Per-call errors returned by [`CacheManager`](crate::CacheManager)
#[derive(Debug, Error)]
pub enum CacheError {
    /// Keys must be non-empty
    #[error("cache key must not be empty")]
    EmptyKey,

    /// A tier override was passed to an instance with a single tier
    #[error("tier overrides not allowed: both L1 and L2 must be configured to use target_l1/target_l2 options")]
    OverrideNotAllowed,

    /// Mode and overrides combined leave no tier to operate on
    #[error("{op} requires at least one cache tier to be targeted")]
    NoTarget { op: Operation },

    /// A tier was targeted that this instance does not have
    #[error("{tier} target requested but {tier} cache not configured")]
    TierNotConfigured { tier: Tier },

    /// Backend transport failure, surfaced verbatim as the source
    #[error("{tier} {op} failed: {source}")]
    Tier {
        tier: Tier,
        op: Operation,
        #[source]
        source: anyhow::Error,
    },

    /// Both targeted writes of a Set failed
    #[error("both cache tiers failed: L1={l1}, L2={l2}")]
    BothTiersFailed {
        l1: Box<CacheError>,
        l2: Box<CacheError>,
    },

    #[error("failed to serialize value with {codec}: {source}")]
    Serialization {
        codec: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to deserialize cached value with {codec}: {source}")]
    Deserialization {
        codec: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// The loader passed to `get_or_compute` failed
    #[error("compute function failed: {0}")]
    Compute(#[source] anyhow::Error),
}

impl CacheError {
    pub(crate) fn tier(tier: Tier, op: Operation, source: anyhow::Error) -> Self {
        Self::Tier { tier, op, source }
    }

    /// Whether this error is a caller mistake rather than a backend failure
    #[must_use]
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            Self::EmptyKey
                | Self::OverrideNotAllowed
                | Self::NoTarget { .. }
                | Self::TierNotConfigured { .. }
        )
    }
}
