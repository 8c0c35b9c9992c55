//! Timestamp lock kept for callers that still share keys with the old
//! protocol.
//!
//! The stored value is the holder's expiry as Unix seconds, and the key itself
//! never expires in the store. Two known defects are kept on purpose so old
//! and new processes agree on the protocol:
//!
//! * Acquisition is check-then-set. A lapsed key is taken over with `GETSET`,
//!   which overwrites the expiry even for the loser of a concurrent takeover.
//! * Release deletes any key whose timestamp is still in the future, without
//!   knowing who wrote it. A holder whose window lapsed and was taken over will
//!   delete the new holder's key, and a third process can then acquire while
//!   the second still believes it holds the lock.
//!
//! Use [`TokenLock`](crate::lock::TokenLock) for anything new.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::{sleep, Instant};
use tracing::{debug, field, instrument, Span};

use crate::error::{LockError, LockResult};
use crate::key::LockKey;
use crate::store::LockStore;
use crate::timeout::{validate_lease, DEFAULT_POLL_INTERVAL};
use crate::traits::LeaseLock;

/// Slack added on top of the lease when computing the stored expiry.
pub const LEGACY_EXPIRY_PADDING: Duration = Duration::from_secs(1);

/// Compatibility lock comparing stored expiry timestamps instead of tokens.
#[derive(Debug, Clone)]
pub struct LegacyLock<S> {
    name: String,
    key: LockKey,
    store: S,
    poll_interval: Duration,
}

impl<S: LockStore> LegacyLock<S> {
    #[deprecated(note = "compatibility only: release can delete another holder's key; use TokenLock")]
    pub fn new(name: &str, store: S) -> LockResult<Self> {
        Ok(Self {
            name: name.to_string(),
            key: LockKey::legacy(name)?,
            store,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    async fn attempt(&self, lease: Duration) -> LockResult<bool> {
        let key = self.key.as_str();
        let expires_at = encode(unix_now() + lease.as_secs_f64() + LEGACY_EXPIRY_PADDING.as_secs_f64());

        if self.store.set_if_absent(key, &expires_at, None).await? {
            return Ok(true);
        }

        let Some(current) = self.store.get(key).await? else {
            // Deleted between the set and the read; retry on the next round.
            return Ok(false);
        };
        if unix_now() <= decode(key, &current)? {
            return Ok(false);
        }

        // The holder's window lapsed. Whoever swaps in first sees the stale
        // value; a concurrent loser sees the winner's fresh one.
        match self.store.get_set(key, &expires_at).await? {
            None => Ok(true),
            Some(previous) => Ok(unix_now() > decode(key, &previous)?),
        }
    }
}

impl<S: LockStore> LeaseLock for LegacyLock<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> &str {
        self.key.as_str()
    }

    #[instrument(skip(self), fields(lock.name = %self.name, lock.key = %self.key, strategy = "legacy", acquired = field::Empty))]
    async fn acquire(&self, lease: Duration, wait: Duration) -> LockResult<bool> {
        validate_lease(lease)?;

        let start = Instant::now();
        // The deadline is only checked after a failed attempt, so a key we
        // just wrote is never reported as a timeout. Zero wait still makes
        // one attempt.
        loop {
            if self.attempt(lease).await? {
                Span::current().record("acquired", true);
                return Ok(true);
            }
            if start.elapsed() > wait {
                Span::current().record("acquired", false);
                debug!("timed out waiting for lock");
                return Ok(false);
            }
            sleep(self.poll_interval).await;
        }
    }

    #[instrument(skip(self), fields(lock.name = %self.name, lock.key = %self.key, strategy = "legacy", acquired = field::Empty))]
    async fn try_acquire(&self, lease: Duration) -> LockResult<bool> {
        validate_lease(lease)?;

        let acquired = self.attempt(lease).await?;
        Span::current().record("acquired", acquired);
        Ok(acquired)
    }

    #[instrument(skip(self), fields(lock.name = %self.name, lock.key = %self.key, strategy = "legacy", released = field::Empty))]
    async fn release(&self) -> LockResult<bool> {
        let key = self.key.as_str();
        let released = match self.store.get(key).await? {
            Some(current) if unix_now() < decode(key, &current)? => self.store.delete(key).await?,
            _ => false,
        };
        Span::current().record("released", released);
        Ok(released)
    }
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

fn encode(timestamp: f64) -> String {
    format!("{:.6}", timestamp)
}

fn decode(key: &str, value: &str) -> LockResult<f64> {
    value.trim().parse::<f64>().map_err(|_| LockError::CorruptValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
