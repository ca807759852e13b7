//! Common utilities for integration tests
//!
//! - `MemoryBackend`: in-memory tier that records TTLs and fails on demand
//! - Manager constructors for the usual tier layouts
//! - Test data generators

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tiered_cache::{async_trait, Backend, CacheBackend, CacheManager, CacheManagerBuilder, CacheMode};

/// In-memory tier with switchable failures.
///
/// Stores bytes as given (no expiry) and remembers the TTL of the last write
/// per key, so tests can assert TTL resolution.
pub struct MemoryBackend {
    name: &'static str,
    data: DashMap<String, (Vec<u8>, Duration)>,
    fail_get: AtomicBool,
    fail_set: AtomicBool,
    fail_remove: AtomicBool,
    gets: AtomicUsize,
    sets: AtomicUsize,
    removes: AtomicUsize,
}

impl MemoryBackend {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            data: DashMap::new(),
            fail_get: AtomicBool::new(false),
            fail_set: AtomicBool::new(false),
            fail_remove: AtomicBool::new(false),
            gets: AtomicUsize::new(0),
            sets: AtomicUsize::new(0),
            removes: AtomicUsize::new(0),
        })
    }

    pub fn insert_raw(&self, key: &str, bytes: &[u8]) {
        self.data
            .insert(key.to_string(), (bytes.to_vec(), Duration::from_secs(60)));
    }

    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.data.get(key).map(|entry| entry.0.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.data.get(key).map(|entry| entry.1)
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn fail_sets(&self, fail: bool) {
        self.fail_set.store(fail, Ordering::SeqCst);
    }

    pub fn fail_removes(&self, fail: bool) {
        self.fail_remove.store(fail, Ordering::SeqCst);
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn remove_calls(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(anyhow!("{} get unavailable", self.name));
        }
        Ok(self.raw(key))
    }

    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(anyhow!("{} set unavailable", self.name));
        }
        self.data.insert(key.to_string(), (value.to_vec(), ttl));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(anyhow!("{} remove unavailable", self.name));
        }
        self.data.remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        !self.fail_get.load(Ordering::SeqCst) && !self.fail_set.load(Ordering::SeqCst)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Both tiers, `BothLevels`, one-minute defaults
pub fn both_tiers() -> (Arc<MemoryBackend>, Arc<MemoryBackend>, CacheManager) {
    both_tiers_with_mode(CacheMode::BothLevels)
}

/// Both tiers supplied, custom mode
pub fn both_tiers_with_mode(
    mode: CacheMode,
) -> (Arc<MemoryBackend>, Arc<MemoryBackend>, CacheManager) {
    let l1 = MemoryBackend::new("L1");
    let l2 = MemoryBackend::new("L2");
    let manager = CacheManagerBuilder::new()
        .with_l1(l1.clone())
        .with_l2(l2.clone())
        .with_mode(mode)
        .with_warmup_ttl(Duration::from_secs(30))
        .with_l1_default_ttl(Duration::from_secs(60))
        .with_l2_default_ttl(Duration::from_secs(600))
        .build()
        .expect("valid two-tier configuration");
    (l1, l2, manager)
}

/// A single tier in the matching mode
pub fn single_tier(mode: CacheMode) -> (Arc<MemoryBackend>, CacheManager) {
    let tier = MemoryBackend::new(if mode == CacheMode::L1Only { "L1" } else { "L2" });
    let backend: Backend = tier.clone();
    let builder = CacheManagerBuilder::new().with_mode(mode);
    let builder = if mode == CacheMode::L1Only {
        builder.with_l1(backend)
    } else {
        builder.with_l2(backend)
    };
    (tier, builder.build().expect("valid single-tier configuration"))
}

/// Create a test key with unique suffix
pub fn test_key(name: &str) -> String {
    format!("test_{}_{}", name, rand::random::<u32>())
}

/// Generate test data of various types
pub mod test_data {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct User {
        pub id: u64,
        pub name: String,
        pub email: String,
    }

    impl User {
        pub fn new(id: u64) -> Self {
            Self {
                id,
                name: format!("User {}", id),
                email: format!("user{}@example.com", id),
            }
        }
    }

    /// Generate JSON test data
    pub fn json_user(id: u64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": format!("User {}", id),
            "email": format!("user{}@example.com", id),
            "created_at": "2025-01-01T00:00:00Z"
        })
    }
}
