//! Lease-based distributed locks over a shared key-value store.
//!
//! A lock gives one process at a time exclusive use of a named resource. The
//! store's atomic set-if-absent with expiry decides the holder, a random
//! ownership token makes sure only the holder can release, and the lease
//! expiry frees locks whose holder crashed.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lease_lock::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connection parameters from REDIS_URL / REDIS_HOST / REDIS_PORT / ...
//!     let provider = RedisLockProvider::from_env().await?;
//!
//!     // Create a lock by name
//!     let lock = provider.create_lock("build-job-42")?;
//!
//!     // Lease of 59s, wait up to 5s
//!     if lock.acquire(Duration::from_secs(59), Duration::from_secs(5)).await? {
//!         println!("Doing critical work...");
//!         lock.release().await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Guarding an operation
//!
//! ```rust,no_run
//! use lease_lock::*;
//!
//! # async fn example(provider: RedisLockProvider) -> LockResult<()> {
//! let guard = provider.create_guard("nightly-report")?.release_after(true);
//!
//! match guard.run(|| async { "report sent" }).await {
//!     Guarded::Completed(outcome) => println!("{}", outcome),
//!     Guarded::NotAcquired => println!("another worker holds the lock"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Crate Organization
//!
//! This is a meta-crate that re-exports types from:
//! - `lease-lock-core`: store contract, token and legacy locks, guard
//! - `lease-lock-redis`: Redis store and provider
//!
//! For fine-grained control, you can depend on individual crates instead.

// Re-export core types and traits
pub use lease_lock_core::*;

// Re-export redis backend
#[allow(ambiguous_glob_reexports)]
pub use lease_lock_redis::*;
