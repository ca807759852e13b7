//! Tracing Example
//!
//! Runs a few operations against the default Moka + Redis wiring with debug
//! logging enabled so every tier decision shows up in the output.
//!
//! Run with: `REDIS_URL=redis://127.0.0.1:6379 cargo run --example tracing_demo`

use tiered_cache::{CacheOptions, CacheStrategy, CacheSystem};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .init();

    tracing::info!("Starting tracing verification...");

    let cache = CacheSystem::new().await?;
    let manager = cache.cache_manager();

    manager
        .set("test_key", "value", &CacheOptions::from(CacheStrategy::ShortTerm))
        .await?;

    // L2-only write followed by a read shows the warmup path
    manager
        .set("warm_key", "warm", &CacheOptions::new().target_l1(false))
        .await?;
    let _: Option<String> = manager.get("warm_key", &CacheOptions::new()).await?;

    manager.delete("test_key").await?;
    manager.delete("warm_key").await?;

    tracing::info!(healthy = cache.health_check().await, "Operation complete");
    Ok(())
}
