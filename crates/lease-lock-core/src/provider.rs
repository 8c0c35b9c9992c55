//! Provider over any store client.

use std::time::Duration;

use crate::error::LockResult;
use crate::store::LockStore;
use crate::strategy::{LockStrategy, StrategyLock};
use crate::timeout::DEFAULT_POLL_INTERVAL;
use crate::traits::LockProvider;

/// Creates locks that all share one store client.
///
/// Cloning the client must be cheap and must share the underlying
/// connection, so repeated acquire/release cycles reuse it.
#[derive(Debug, Clone)]
pub struct StoreLockProvider<S> {
    store: S,
    strategy: LockStrategy,
    poll_interval: Duration,
}

impl<S: LockStore + Clone> StoreLockProvider<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            strategy: LockStrategy::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_strategy(mut self, strategy: LockStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn strategy(&self) -> LockStrategy {
        self.strategy
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: LockStore + Clone> LockProvider for StoreLockProvider<S> {
    type Lock = StrategyLock<S>;

    fn create_lock(&self, name: &str) -> LockResult<Self::Lock> {
        StrategyLock::new(self.strategy, name, self.store.clone(), self.poll_interval)
    }
}
