//! Basic integration tests for get/set/delete across both tiers
//!
//! Uses in-process tiers only; see `integration_redis.rs` for Redis.

mod common;

use common::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tiered_cache::backends::DashMapCache;
use tiered_cache::{CacheBackend, CacheError, CacheManagerBuilder, CacheOptions, CacheStrategy};

/// Test basic cache set and get operations
#[tokio::test]
async fn test_basic_set_and_get() {
    let (l1, l2, cache) = both_tiers();
    let key = test_key("basic");
    let value = test_data::json_user(1);

    cache.set(&key, &value, &CacheOptions::new()).await.unwrap();

    let cached: Option<serde_json::Value> = cache.get(&key, &CacheOptions::new()).await.unwrap();
    assert_eq!(cached, Some(value));
    assert!(l1.contains(&key));
    assert!(l2.contains(&key));
}

/// Typed values round-trip through the codec
#[tokio::test]
async fn test_typed_value() {
    let (_, _, cache) = both_tiers();
    let user = test_data::User::new(7);

    cache.set("user:7", &user, &CacheOptions::new()).await.unwrap();
    let cached: Option<test_data::User> = cache.get("user:7", &CacheOptions::new()).await.unwrap();
    assert_eq!(cached, Some(user));
}

/// L1 hit never touches L2
#[tokio::test]
async fn test_l1_cache_hit() {
    let (_, l2, cache) = both_tiers();
    let key = test_key("l1_hit");

    cache.set(&key, &42u32, &CacheOptions::new()).await.unwrap();
    let reads_before = l2.get_calls();

    let cached: Option<u32> = cache.get(&key, &CacheOptions::new()).await.unwrap();
    assert_eq!(cached, Some(42));
    assert_eq!(l2.get_calls(), reads_before);
}

/// Test cache miss behavior
#[tokio::test]
async fn test_cache_miss() {
    let (l1, l2, cache) = both_tiers();

    let cached: Option<String> = cache.get(&test_key("miss"), &CacheOptions::new()).await.unwrap();
    assert_eq!(cached, None);
    assert_eq!(l1.get_calls(), 1);
    assert_eq!(l2.get_calls(), 1);
}

/// Delete removes from both tiers, then reads miss
#[tokio::test]
async fn test_delete_removes_from_both_tiers() {
    let (l1, l2, cache) = both_tiers();
    let key = test_key("delete");

    cache.set(&key, "gone soon", &CacheOptions::new()).await.unwrap();
    cache.delete(&key).await.unwrap();

    assert!(!l1.contains(&key));
    assert!(!l2.contains(&key));
    let cached: Option<String> = cache.get(&key, &CacheOptions::new()).await.unwrap();
    assert_eq!(cached, None);
}

/// Deleting a key that was never stored is fine
#[tokio::test]
async fn test_delete_missing_key() {
    let (_, _, cache) = both_tiers();
    assert!(cache.delete(&test_key("never")).await.is_ok());
}

/// Default TTLs apply when the call sets none
#[tokio::test]
async fn test_default_ttls() {
    let (l1, l2, cache) = both_tiers();

    cache.set("ttl:default", &1, &CacheOptions::new()).await.unwrap();
    assert_eq!(l1.ttl_of("ttl:default"), Some(Duration::from_secs(60)));
    assert_eq!(l2.ttl_of("ttl:default"), Some(Duration::from_secs(600)));
}

/// An L1 TTL override leaves L2 on its default
#[tokio::test]
async fn test_l1_ttl_override_only() {
    let (l1, l2, cache) = both_tiers();
    let opts = CacheOptions::new().l1_ttl(Duration::from_secs(5));

    cache.set("ttl:l1", &1, &opts).await.unwrap();
    assert_eq!(l1.ttl_of("ttl:l1"), Some(Duration::from_secs(5)));
    assert_eq!(l2.ttl_of("ttl:l1"), Some(Duration::from_secs(600)));
}

/// Strategy presets set both tiers' TTL
#[tokio::test]
async fn test_strategy_ttl() {
    let (l1, l2, cache) = both_tiers();

    cache
        .set("ttl:strategy", &1, &CacheOptions::from(CacheStrategy::LongTerm))
        .await
        .unwrap();
    assert_eq!(l1.ttl_of("ttl:strategy"), Some(Duration::from_secs(10800)));
    assert_eq!(l2.ttl_of("ttl:strategy"), Some(Duration::from_secs(10800)));
}

/// Short-lived entries are served before expiry and miss afterwards, without error
#[tokio::test]
async fn test_expiry_reports_miss() {
    let l1 = Arc::new(DashMapCache::new());
    let l2 = Arc::new(DashMapCache::new());
    let cache = CacheManagerBuilder::new()
        .with_l1(l1.clone())
        .with_l2(l2.clone())
        .build()
        .unwrap();
    let opts = CacheOptions::new()
        .l1_ttl(Duration::from_millis(50))
        .l2_ttl(Duration::from_millis(50));

    cache.set("short", "lived", &opts).await.unwrap();
    let before: Option<String> = cache.get("short", &CacheOptions::new()).await.unwrap();
    assert_eq!(before.as_deref(), Some("lived"));

    tokio::time::sleep(Duration::from_millis(120)).await;

    let after: Option<String> = cache.get("short", &CacheOptions::new()).await.unwrap();
    assert_eq!(after, None);
    assert!(!l1.contains_raw("short"), "stale L1 record should be purged on read");
    assert!(!l2.contains_raw("short"), "stale L2 record should be purged on read");
}

/// Compute-on-miss stores the computed value; the next call is served from cache
#[tokio::test]
async fn test_get_or_compute() {
    let (l1, l2, cache) = both_tiers();
    let key = test_key("compute");
    let counter = AtomicUsize::new(0);
    let calls = &counter;

    for _ in 0..3 {
        let user: test_data::User = cache
            .get_or_compute(&key, &CacheOptions::new(), || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(test_data::User::new(4))
            })
            .await
            .unwrap();
        assert_eq!(user, test_data::User::new(4));
    }

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(l1.contains(&key) && l2.contains(&key));
}

/// Compute errors surface; failures to store the computed value do not
#[tokio::test]
async fn test_get_or_compute_errors() {
    let (l1, l2, cache) = both_tiers();

    let err = cache
        .get_or_compute::<u32, _, _>("compute:err", &CacheOptions::new(), || async {
            Err(anyhow::anyhow!("origin down"))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CacheError::Compute(_)));

    l1.fail_sets(true);
    l2.fail_sets(true);
    let value: u32 = cache
        .get_or_compute("compute:unstored", &CacheOptions::new(), || async { Ok(9) })
        .await
        .unwrap();
    assert_eq!(value, 9);
}

/// Empty keys are rejected before any tier is touched
#[tokio::test]
async fn test_empty_key() {
    let (l1, l2, cache) = both_tiers();

    assert!(matches!(
        cache.get::<u32>("", &CacheOptions::new()).await,
        Err(CacheError::EmptyKey)
    ));
    assert!(matches!(
        cache.set("", &1, &CacheOptions::new()).await,
        Err(CacheError::EmptyKey)
    ));
    assert!(matches!(cache.delete("").await, Err(CacheError::EmptyKey)));
    assert_eq!(l1.get_calls() + l1.set_calls() + l1.remove_calls(), 0);
    assert_eq!(l2.get_calls() + l2.set_calls() + l2.remove_calls(), 0);
}

/// Health check reflects every configured tier
#[tokio::test]
async fn test_health_check() {
    let (_, l2, cache) = both_tiers();
    assert!(cache.health_check().await);

    l2.fail_gets(true);
    assert!(!cache.health_check().await);
}

/// Built-in in-process backend passes its own probe
#[tokio::test]
async fn test_dashmap_backend_health() {
    assert!(DashMapCache::new().health_check().await);
}

/// A swapped-in binary codec drives set, get and the L2-to-L1 copy
#[cfg(feature = "bincode")]
#[tokio::test]
async fn test_bincode_codec() {
    use tiered_cache::codecs::BincodeCodec;
    use tiered_cache::CacheCodec;

    let l1 = MemoryBackend::new("L1");
    let l2 = MemoryBackend::new("L2");
    let cache = CacheManagerBuilder::new()
        .with_l1(l1.clone())
        .with_l2(l2.clone())
        .with_codec(BincodeCodec)
        .build()
        .unwrap();
    assert_eq!(cache.codec().name(), "bincode");

    let user = test_data::User::new(1);
    cache.set("user:1", &user, &CacheOptions::new()).await.unwrap();
    let cached: Option<test_data::User> = cache.get("user:1", &CacheOptions::new()).await.unwrap();
    assert_eq!(cached, Some(user.clone()));

    // L2-only write, then a read that warms L1 with the same bytes
    cache
        .set("user:2", &test_data::User::new(2), &CacheOptions::new().target_l1(false))
        .await
        .unwrap();
    let cached: Option<test_data::User> = cache.get("user:2", &CacheOptions::new()).await.unwrap();
    assert_eq!(cached, Some(test_data::User::new(2)));
    assert_eq!(l1.raw("user:2"), l2.raw("user:2"));
}

#[cfg(feature = "msgpack")]
#[tokio::test]
async fn test_msgpack_codec() {
    use tiered_cache::codecs::MsgPackCodec;

    let (l1, l2) = (MemoryBackend::new("L1"), MemoryBackend::new("L2"));
    let cache = CacheManagerBuilder::new()
        .with_l1(l1.clone())
        .with_l2(l2.clone())
        .with_codec(MsgPackCodec)
        .build()
        .unwrap();

    l2.insert_raw("user:3", &rmp_serde::to_vec_named(&test_data::User::new(3)).unwrap());
    let cached: Option<test_data::User> = cache.get("user:3", &CacheOptions::new()).await.unwrap();
    assert_eq!(cached, Some(test_data::User::new(3)));
    assert!(l1.contains("user:3"));
}
