//! The key-value store contract locks are built on.

use std::future::Future;
use std::time::Duration;

use crate::error::LockResult;

/// A shared key-value store holding lock state.
///
/// Every method is a network round trip in a real deployment. Connectivity
/// failures must come back as [`LockError::StoreUnavailable`] so callers can
/// tell a dead store from a busy lock.
///
/// [`LockError::StoreUnavailable`]: crate::error::LockError::StoreUnavailable
pub trait LockStore: Send + Sync {
    /// Creates `key` with `value` only if it does not exist yet.
    ///
    /// With `Some(ttl)` the key is created with that expiry in the same atomic
    /// step. Returns whether the key was created.
    fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> impl Future<Output = LockResult<bool>> + Send;

    /// Reads the value under `key`.
    fn get(&self, key: &str) -> impl Future<Output = LockResult<Option<String>>> + Send;

    /// Replaces the value under `key`, returning the previous one.
    fn get_set(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = LockResult<Option<String>>> + Send;

    /// Deletes `key` unconditionally. Returns whether a key was removed.
    fn delete(&self, key: &str) -> impl Future<Output = LockResult<bool>> + Send;

    /// Deletes `key` only while it holds `expected`.
    ///
    /// The provided implementation reads and then deletes in two round trips.
    /// Between them the key can expire and be taken by another owner, whose
    /// key is then deleted. Stores with a native compare-and-delete override
    /// this to close that window.
    fn delete_if_equals(
        &self,
        key: &str,
        expected: &str,
    ) -> impl Future<Output = LockResult<bool>> + Send {
        async move {
            match self.get(key).await? {
                Some(current) if current == expected => self.delete(key).await,
                _ => Ok(false),
            }
        }
    }
}
