//! Basic Usage Example
//!
//! Demonstrates get/set/delete, per-call overrides and compute-on-miss using
//! two in-process tiers (Moka as L1, `DashMap` standing in for the shared L2),
//! so no Redis is needed.
//!
//! Run with: `RUST_LOG=tiered_cache=debug cargo run --example basic_usage`

use std::sync::Arc;
use std::time::Duration;

use tiered_cache::{
    CacheManagerBuilder, CacheOptions, CacheStrategy, DashMapCache, MokaCache, MokaCacheConfig,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Tiered Cache: Basic Usage ===\n");

    // 1. Assemble the tiers
    let l1 = Arc::new(MokaCache::new(MokaCacheConfig::default()));
    let l2 = Arc::new(DashMapCache::new());
    let cache = CacheManagerBuilder::new()
        .with_l1(l1.clone())
        .with_l2(l2.clone())
        .with_warmup_ttl(Duration::from_secs(60))
        .build()?;

    if cache.health_check().await {
        println!("✅ Cache tiers are healthy\n");
    }

    // 2. Store data with a strategy preset
    let user_data = serde_json::json!({
        "id": 1,
        "name": "Alice",
        "email": "alice@example.com",
        "role": "admin"
    });

    println!("Storing user data with ShortTerm strategy (5 min TTL)...");
    cache
        .set("user:1", &user_data, &CacheOptions::from(CacheStrategy::ShortTerm))
        .await?;

    // 3. Retrieve data (L1 hit)
    if let Some(cached_user) = cache.get::<serde_json::Value>("user:1", &CacheOptions::new()).await? {
        println!("✅ Retrieved from cache: {cached_user}\n");
    }

    // 4. Write to L2 only, then read through both tiers to warm L1
    println!("Storing sensor reading in L2 only...");
    cache
        .set(
            "sensor:temp",
            &serde_json::json!({"temperature": 25.5, "humidity": 60}),
            &CacheOptions::new().target_l1(false).l2_ttl(Duration::from_secs(10)),
        )
        .await?;
    let reading: Option<serde_json::Value> = cache.get("sensor:temp", &CacheOptions::new()).await?;
    println!("✅ Read from L2 and warmed L1: {reading:?}\n");

    // 5. Compute on miss
    let report: String = cache
        .get_or_compute("report:daily", &CacheOptions::from(CacheStrategy::MediumTerm), || async {
            println!("Computing daily report (cache miss)...");
            Ok("42 orders".to_string())
        })
        .await?;
    println!("✅ Report: {report}\n");

    // 6. Delete everywhere
    cache.delete("user:1").await?;
    let gone: Option<serde_json::Value> = cache.get("user:1", &CacheOptions::new()).await?;
    println!("After delete: {gone:?}\n");

    let stats = l1.stats();
    println!("=== L1 Statistics ===");
    println!("Hits: {}", stats.hits);
    println!("Misses: {}", stats.misses);
    println!("Sets: {}", stats.sets);
    println!("L2 entries: {}", l2.len());

    Ok(())
}
