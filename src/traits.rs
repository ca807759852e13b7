//! Cache Backend Traits
//!
//! The two seams of the cache manager:
//!
//! - `CacheCodec`: turns values into the opaque bytes stored in a tier
//! - `CacheBackend`: a tier store (get/set/delete raw bytes with a TTL)
//!
//! Custom tiers implement [`CacheBackend`] with `#[async_trait]` and plug in
//! through [`CacheManagerBuilder::with_l1`](crate::CacheManagerBuilder::with_l1)
//! or `with_l2`. See `tests/common/mod.rs` for a complete in-memory one.

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::time::Duration;

/// Trait for cache value serialization/deserialization
///
/// Every tier stores the same bytes, so an L2 payload can be copied into L1
/// without re-encoding.
pub trait CacheCodec: Send + Sync + Debug {
    /// Serialize a value to bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented by this codec.
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    /// Deserialize bytes to a value
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not a valid encoding of `T`.
    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;

    /// Codec name used in logs and error messages
    fn name(&self) -> &'static str;
}

/// Tier store contract shared by L1 and L2
///
/// Implementations own their thread-safety and their expiry; the cache manager
/// only forwards calls.
///
/// A miss is `Ok(None)`. `Err` is reserved for transport or backend failures;
/// the manager propagates those to the caller.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Get value from cache by key
    ///
    /// # Returns
    ///
    /// * `Ok(Some(bytes))` - Value found
    /// * `Ok(None)` - Key not found or expired
    /// * `Err(e)` - Backend failure
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set value in cache with time-to-live
    ///
    /// `ttl` is always non-zero when called by the cache manager.
    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Remove value from cache. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Whether the store currently answers reads and writes
    async fn health_check(&self) -> bool;

    /// Short name for logs
    fn name(&self) -> &'static str {
        "unknown"
    }
}

/// Round-trip a marker value through a backend. Shared by the built-in
/// backends' `health_check` implementations.
pub(crate) async fn probe<B: CacheBackend + ?Sized>(backend: &B, test_key: &str) -> bool {
    let test_value = b"health_check_value";

    match backend
        .set_with_ttl(test_key, test_value, Duration::from_secs(10))
        .await
    {
        Ok(()) => match backend.get(test_key).await {
            Ok(Some(retrieved)) => {
                let _ = backend.remove(test_key).await;
                retrieved == test_value
            }
            Ok(None) | Err(_) => false,
        },
        Err(_) => false,
    }
}
