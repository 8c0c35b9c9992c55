//! Running an operation only while a lock is held.

use std::any::type_name;
use std::future::Future;
use std::panic::{resume_unwind, AssertUnwindSafe};
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, error, warn};

use crate::timeout::LockTimeouts;
use crate::traits::LeaseLock;

/// Outcome of [`LockGuard::run`].
#[must_use = "the operation is skipped when the lock is not acquired"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    /// The lock was held and the operation ran to completion.
    Completed(T),
    /// The lock could not be acquired; the operation never ran.
    NotAcquired,
}

impl<T> Guarded<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Returns the operation's output, or `None` if it was skipped.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::NotAcquired => None,
        }
    }
}

/// Wraps operations so they only run while `lock` is held.
///
/// By default the lock is not released after the operation: the key stays
/// until its lease runs out, and other processes skip the same work until
/// then. Set
/// [`release_after`](Self::release_after) to free the key as soon as the
/// operation finishes.
///
/// # Example
///
/// ```rust,ignore
/// let guard = LockGuard::new(lock)
///     .release_after(true)
///     .lease(Duration::from_secs(30));
///
/// match guard.run(|| sync_inventory()).await {
///     Guarded::Completed(result) => result?,
///     Guarded::NotAcquired => tracing::info!("another worker is syncing"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LockGuard<L> {
    lock: L,
    release_after: bool,
    timeouts: LockTimeouts,
}

impl<L: LeaseLock> LockGuard<L> {
    pub fn new(lock: L) -> Self {
        Self {
            lock,
            release_after: false,
            timeouts: LockTimeouts::default(),
        }
    }

    /// Release the lock once the operation finishes, however it finishes.
    pub fn release_after(mut self, release: bool) -> Self {
        self.release_after = release;
        self
    }

    /// Lease granted on each acquisition.
    pub fn lease(mut self, lease: Duration) -> Self {
        self.timeouts.lease = lease;
        self
    }

    /// How long to wait for the lock before skipping the operation.
    pub fn wait(mut self, wait: Duration) -> Self {
        self.timeouts.wait = wait;
        self
    }

    pub fn timeouts(mut self, timeouts: LockTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn lock(&self) -> &L {
        &self.lock
    }

    pub fn into_inner(self) -> L {
        self.lock
    }

    /// Acquires the lock, runs `op`, and releases if configured.
    ///
    /// Store failures while acquiring are logged and reported as
    /// [`Guarded::NotAcquired`], the same as a timeout. A panic inside `op`
    /// is resumed after the release step has run. If the returned future is
    /// dropped mid-operation no release happens and the lease expires on its
    /// own.
    pub async fn run<F, Fut, T>(&self, op: F) -> Guarded<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let operation = type_name::<F>();

        match self.lock.acquire(self.timeouts.lease, self.timeouts.wait).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(function = operation, lock.key = self.lock.key(), "lock busy, skipping");
                return Guarded::NotAcquired;
            }
            Err(e) => {
                error!(function = operation, error = %e, "failed to acquire lock");
                return Guarded::NotAcquired;
            }
        }

        // Also catches panics raised while `op` builds its future.
        let outcome = AssertUnwindSafe(async move { op().await })
            .catch_unwind()
            .await;

        if self.release_after {
            if let Err(e) = self.lock.release().await {
                warn!(function = operation, error = %e, "failed to release lock, lease will expire");
            }
        }

        match outcome {
            Ok(value) => Guarded::Completed(value),
            Err(panic) => resume_unwind(panic),
        }
    }
}
