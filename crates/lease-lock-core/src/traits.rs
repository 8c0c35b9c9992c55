//! Core traits for lease locks.

use std::future::Future;
use std::time::Duration;

use crate::error::LockResult;
use crate::guard::LockGuard;

// ============================================================================
// Lease Lock Trait
// ============================================================================

/// A lock on one named resource, held as a lease in a shared store.
///
/// A handle is reusable: after `release` (or lease expiry) the same handle can
/// `acquire` again with the same ownership token. Tasks sharing one handle
/// share its token, so they must serialize their use of it themselves.
///
/// # Example
///
/// ```rust,ignore
/// use lease_lock_core::LeaseLock;
///
/// async fn nightly(lock: &impl LeaseLock) -> LockResult<()> {
///     if !lock.acquire(Duration::from_secs(59), Duration::from_secs(5)).await? {
///         // Someone else is running it.
///         return Ok(());
///     }
///     run_nightly_job().await;
///     lock.release().await?;
///     Ok(())
/// }
/// ```
pub trait LeaseLock: Send + Sync {
    /// Returns the logical lock name.
    fn name(&self) -> &str;

    /// Returns the store key derived from the name.
    fn key(&self) -> &str;

    /// Polls the store until the lock is held or `wait` elapses.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Lock acquired; the lease lasts `lease` unless released
    /// * `Ok(false)` - `wait` elapsed while someone else held the lock
    /// * `Err(LockError::StoreUnavailable)` - The store could not be reached;
    ///   polling stops at the first failure
    fn acquire(
        &self,
        lease: Duration,
        wait: Duration,
    ) -> impl Future<Output = LockResult<bool>> + Send;

    /// Makes a single acquisition attempt without waiting.
    fn try_acquire(&self, lease: Duration) -> impl Future<Output = LockResult<bool>> + Send;

    /// Releases the lock if this handle still owns it.
    ///
    /// Returns `Ok(false)` when there was nothing of ours to release, for
    /// example because the lease expired and another process took the key.
    fn release(&self) -> impl Future<Output = LockResult<bool>> + Send;
}

// ============================================================================
// Provider Traits
// ============================================================================

/// Factory for creating lease locks by name.
///
/// Providers own the store connection and the strategy, so application code
/// only deals with names.
///
/// # Example
///
/// ```rust,ignore
/// // Configure once at startup
/// let provider = RedisLockProvider::from_env().await?;
///
/// // Create locks by name anywhere in the application
/// let lock = provider.create_lock("build-job-42")?;
/// ```
pub trait LockProvider: Send + Sync {
    /// The lock type created by this provider.
    type Lock: LeaseLock;

    /// Creates a lock with the given name.
    fn create_lock(&self, name: &str) -> LockResult<Self::Lock>;
}

// ============================================================================
// Convenience Extensions
// ============================================================================

/// Extension trait providing convenience methods for lock providers.
pub trait LockProviderExt: LockProvider {
    /// Creates a lock and tries to acquire it.
    ///
    /// The lock is returned either way so the caller can release it later or
    /// inspect its key.
    fn acquire_lock(
        &self,
        name: &str,
        lease: Duration,
        wait: Duration,
    ) -> impl Future<Output = LockResult<(Self::Lock, bool)>> + Send
    where
        Self: Sync,
    {
        async move {
            let lock = self.create_lock(name)?;
            let acquired = lock.acquire(lease, wait).await?;
            Ok((lock, acquired))
        }
    }

    /// Creates a guard around a new lock with default settings.
    fn create_guard(&self, name: &str) -> LockResult<LockGuard<Self::Lock>> {
        Ok(LockGuard::new(self.create_lock(name)?))
    }
}

// Blanket implementation for all LockProviders
impl<T: LockProvider> LockProviderExt for T {}
