//! Cache manager configuration
//!
//! Programmatic, serde or environment driven. Zero TTLs are replaced with
//! [`DEFAULT_TTL`] when the manager is constructed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::options::{positive_or, CacheMode, DEFAULT_TTL};

pub const ENV_MODE: &str = "CACHE_MODE";
pub const ENV_WARMUP_TTL_SECS: &str = "CACHE_WARMUP_TTL_SECS";
pub const ENV_L1_TTL_SECS: &str = "CACHE_L1_TTL_SECS";
pub const ENV_L2_TTL_SECS: &str = "CACHE_L2_TTL_SECS";

/// Tuning knobs for a [`CacheManager`](crate::CacheManager)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheManagerConfig {
    /// Default tier participation
    pub mode: CacheMode,
    /// TTL applied when an L2 hit is copied into L1
    pub warmup_ttl: Duration,
    /// L1 TTL when a call does not set one
    pub l1_default_ttl: Duration,
    /// L2 TTL when a call does not set one
    pub l2_default_ttl: Duration,
}

impl Default for CacheManagerConfig {
    fn default() -> Self {
        Self {
            mode: CacheMode::default(),
            warmup_ttl: DEFAULT_TTL,
            l1_default_ttl: DEFAULT_TTL,
            l2_default_ttl: DEFAULT_TTL,
        }
    }
}

impl CacheManagerConfig {
    #[must_use]
    pub fn with_mode(mode: CacheMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Copy with every zero TTL replaced by [`DEFAULT_TTL`]
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            mode: self.mode,
            warmup_ttl: positive_or(Some(self.warmup_ttl), DEFAULT_TTL),
            l1_default_ttl: positive_or(Some(self.l1_default_ttl), DEFAULT_TTL),
            l2_default_ttl: positive_or(Some(self.l2_default_ttl), DEFAULT_TTL),
        }
    }

    /// Load from `CACHE_MODE`, `CACHE_WARMUP_TTL_SECS`, `CACHE_L1_TTL_SECS`
    /// and `CACHE_L2_TTL_SECS`. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if a variable is set but unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env) but reads variables through `lookup`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if a variable is set but unparsable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_MODE) {
            config.mode = value.parse().map_err(|reason| ConfigError::InvalidEnv {
                var: ENV_MODE,
                value: value.clone(),
                reason,
            })?;
        }
        if let Some(ttl) = parse_secs(&lookup, ENV_WARMUP_TTL_SECS)? {
            config.warmup_ttl = ttl;
        }
        if let Some(ttl) = parse_secs(&lookup, ENV_L1_TTL_SECS)? {
            config.l1_default_ttl = ttl;
        }
        if let Some(ttl) = parse_secs(&lookup, ENV_L2_TTL_SECS)? {
            config.l2_default_ttl = ttl;
        }

        Ok(config)
    }
}

fn parse_secs<F>(lookup: &F, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(|secs| Some(Duration::from_secs(secs)))
        .map_err(|e| ConfigError::InvalidEnv {
            var,
            value,
            reason: e.to_string(),
        })
}
