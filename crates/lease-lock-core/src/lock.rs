//! Token lock: the lease lock every new caller should use.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, field, instrument, Span};

use crate::error::LockResult;
use crate::key::{LockKey, OwnershipToken};
use crate::store::LockStore;
use crate::timeout::{validate_lease, DEFAULT_POLL_INTERVAL};
use crate::traits::LeaseLock;

/// A lease lock whose key holds the owner's random token.
///
/// Acquisition uses the store's atomic set-if-absent with expiry, so at most
/// one token can hold the key while its lease is valid. Release only deletes
/// the key while it still holds this handle's token.
#[derive(Debug, Clone)]
pub struct TokenLock<S> {
    name: String,
    key: LockKey,
    token: OwnershipToken,
    store: S,
    poll_interval: Duration,
}

impl<S: LockStore> TokenLock<S> {
    /// Creates a lock named `name` with a fresh ownership token.
    pub fn new(name: &str, store: S) -> LockResult<Self> {
        Ok(Self {
            name: name.to_string(),
            key: LockKey::token(name)?,
            token: OwnershipToken::generate(),
            store,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Sets the sleep between acquisition attempts.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// The token this handle writes when it acquires.
    pub fn token(&self) -> &OwnershipToken {
        &self.token
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// One set-then-read-back round.
    ///
    /// Both must agree: the set has to report creation and the key has to
    /// hold our token afterwards.
    async fn attempt(&self, lease: Duration) -> LockResult<bool> {
        let key = self.key.as_str();
        let token = self.token.as_str();

        let created = self.store.set_if_absent(key, token, Some(lease)).await?;
        let current = self.store.get(key).await?;

        Ok(created && current.as_deref() == Some(token))
    }
}

impl<S: LockStore> LeaseLock for TokenLock<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> &str {
        self.key.as_str()
    }

    #[instrument(skip(self), fields(lock.name = %self.name, lock.key = %self.key, strategy = "token", acquired = field::Empty, attempts = field::Empty))]
    async fn acquire(&self, lease: Duration, wait: Duration) -> LockResult<bool> {
        validate_lease(lease)?;

        let start = Instant::now();
        let mut attempts: u32 = 0;

        while start.elapsed() < wait {
            attempts += 1;
            if self.attempt(lease).await? {
                Span::current().record("acquired", true);
                Span::current().record("attempts", attempts);
                debug!(elapsed_ms = start.elapsed().as_millis() as u64, "lock acquired");
                return Ok(true);
            }
            sleep(self.poll_interval).await;
        }

        Span::current().record("acquired", false);
        Span::current().record("attempts", attempts);
        debug!("timed out waiting for lock");
        Ok(false)
    }

    #[instrument(skip(self), fields(lock.name = %self.name, lock.key = %self.key, strategy = "token", acquired = field::Empty))]
    async fn try_acquire(&self, lease: Duration) -> LockResult<bool> {
        validate_lease(lease)?;

        let acquired = self.attempt(lease).await?;
        Span::current().record("acquired", acquired);
        Ok(acquired)
    }

    #[instrument(skip(self), fields(lock.name = %self.name, lock.key = %self.key, strategy = "token", released = field::Empty))]
    async fn release(&self) -> LockResult<bool> {
        let released = self
            .store
            .delete_if_equals(self.key.as_str(), self.token.as_str())
            .await?;

        Span::current().record("released", released);
        if !released {
            debug!("lock not owned by this handle, nothing released");
        }
        Ok(released)
    }
}
