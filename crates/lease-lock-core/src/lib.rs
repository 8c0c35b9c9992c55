//! Core traits and types for lease locks.
//!
//! A lease lock gives one process at a time exclusive use of a named resource,
//! using a shared key-value store ([`LockStore`]) as the source of truth. The
//! store's atomic set-if-absent with expiry decides who holds the lock; the
//! expiry heals locks left behind by crashed holders.

pub mod error;
pub mod guard;
pub mod key;
pub mod legacy;
pub mod lock;
pub mod memory;
pub mod prelude;
pub mod provider;
pub mod store;
pub mod strategy;
pub mod timeout;
pub mod traits;

pub use error::{LockError, LockResult};
pub use guard::{Guarded, LockGuard};
pub use key::{LockKey, OwnershipToken};
pub use legacy::LegacyLock;
pub use lock::TokenLock;
pub use memory::MemoryStore;
pub use provider::StoreLockProvider;
pub use store::LockStore;
pub use strategy::{LockStrategy, StrategyLock};
pub use timeout::LockTimeouts;
pub use traits::{LeaseLock, LockProvider, LockProviderExt};
