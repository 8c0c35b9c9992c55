//! Example: Running a job at most once per lease window
//!
//! Run with: `cargo run --example guarded_job`
//!
//! Start several copies at once against the same Redis server; only one of
//! them runs the job, the others report that it was skipped.

use lease_lock::prelude::*;
use lease_lock::RedisLockProvider;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

async fn rebuild_search_index() -> Result<usize, std::io::Error> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Ok(1_024)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let provider = RedisLockProvider::from_env().await?;

    let guard = provider
        .create_guard("rebuild-search-index")?
        .lease(Duration::from_secs(60))
        .wait(Duration::from_secs(1))
        .release_after(true);

    match guard.run(rebuild_search_index).await {
        Guarded::Completed(Ok(documents)) => println!("Indexed {} documents", documents),
        Guarded::Completed(Err(e)) => println!("Job failed: {}", e),
        Guarded::NotAcquired => println!("Another worker is rebuilding the index, skipped"),
    }

    Ok(())
}
