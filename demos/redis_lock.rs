//! Example: Using Redis lease locks
//!
//! Run with: `cargo run --example redis_lock`
//!
//! Requires a Redis server. Set REDIS_URL (or REDIS_HOST / REDIS_PORT)
//! to point somewhere other than localhost.

use lease_lock::prelude::*;
use lease_lock::RedisLockProvider;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Connecting to Redis...");
    let provider = RedisLockProvider::from_env().await?;
    println!("Created Redis lock provider ({} strategy)", provider.strategy());

    // Create a lock by name
    let lock = provider.create_lock("example-resource")?;
    println!("Created lock: {} (key {})", lock.name(), lock.key());

    // Acquire with a 30 second lease, waiting up to 5 seconds
    println!("Acquiring lock...");
    if !lock
        .acquire(Duration::from_secs(30), Duration::from_secs(5))
        .await?
    {
        println!("Another process holds the lock, giving up");
        return Ok(());
    }
    println!("Lock acquired! It expires on its own after 30 seconds");

    // The lease is not extended: keep the work well inside it
    println!("Doing work...");
    tokio::time::sleep(Duration::from_secs(2)).await;
    println!("Work completed");

    if lock.release().await? {
        println!("Lock released");
    } else {
        println!("Lease ran out before release; the key belongs to someone else now");
    }

    Ok(())
}
