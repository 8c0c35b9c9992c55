//! Selecting a lock protocol by configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{LockError, LockResult};
use crate::legacy::LegacyLock;
use crate::lock::TokenLock;
use crate::store::LockStore;
use crate::traits::LeaseLock;

/// Which protocol a provider's locks speak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockStrategy {
    /// Atomic set-if-absent with an ownership token.
    #[default]
    Token,
    /// Timestamp protocol, for interoperating with old deployments only.
    Legacy,
}

impl FromStr for LockStrategy {
    type Err = LockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token" => Ok(Self::Token),
            "legacy" => Ok(Self::Legacy),
            other => Err(LockError::Config(format!("unknown lock strategy: {}", other))),
        }
    }
}

impl fmt::Display for LockStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => f.write_str("token"),
            Self::Legacy => f.write_str("legacy"),
        }
    }
}

/// A lock of either strategy behind one type.
#[derive(Debug, Clone)]
pub enum StrategyLock<S> {
    Token(TokenLock<S>),
    Legacy(LegacyLock<S>),
}

impl<S: LockStore> StrategyLock<S> {
    #[allow(deprecated)]
    pub fn new(
        strategy: LockStrategy,
        name: &str,
        store: S,
        poll_interval: Duration,
    ) -> LockResult<Self> {
        match strategy {
            LockStrategy::Token => Ok(Self::Token(
                TokenLock::new(name, store)?.with_poll_interval(poll_interval),
            )),
            LockStrategy::Legacy => Ok(Self::Legacy(
                LegacyLock::new(name, store)?.with_poll_interval(poll_interval),
            )),
        }
    }

    pub fn strategy(&self) -> LockStrategy {
        match self {
            Self::Token(_) => LockStrategy::Token,
            Self::Legacy(_) => LockStrategy::Legacy,
        }
    }
}

impl<S: LockStore> LeaseLock for StrategyLock<S> {
    fn name(&self) -> &str {
        match self {
            Self::Token(lock) => lock.name(),
            Self::Legacy(lock) => lock.name(),
        }
    }

    fn key(&self) -> &str {
        match self {
            Self::Token(lock) => lock.key(),
            Self::Legacy(lock) => lock.key(),
        }
    }

    async fn acquire(&self, lease: Duration, wait: Duration) -> LockResult<bool> {
        match self {
            Self::Token(lock) => lock.acquire(lease, wait).await,
            Self::Legacy(lock) => lock.acquire(lease, wait).await,
        }
    }

    async fn try_acquire(&self, lease: Duration) -> LockResult<bool> {
        match self {
            Self::Token(lock) => lock.try_acquire(lease).await,
            Self::Legacy(lock) => lock.try_acquire(lease).await,
        }
    }

    async fn release(&self) -> LockResult<bool> {
        match self {
            Self::Token(lock) => lock.release().await,
            Self::Legacy(lock) => lock.release().await,
        }
    }
}
