//! Redis backend for lease locks.

pub mod config;
pub mod provider;
pub mod store;

pub use config::RedisStoreSettings;
pub use provider::{RedisLockProvider, RedisLockProviderBuilder};
pub use store::RedisStore;
