//! Redis lock provider implementation.

use std::time::Duration;

use fred::prelude::*;
use lease_lock_core::error::{LockError, LockResult};
use lease_lock_core::provider::StoreLockProvider;
use lease_lock_core::strategy::{LockStrategy, StrategyLock};
use lease_lock_core::timeout::DEFAULT_POLL_INTERVAL;
use lease_lock_core::traits::LockProvider;
use tracing::{debug, instrument};

use crate::config::RedisStoreSettings;
use crate::store::RedisStore;

/// Builder for Redis lock provider configuration.
///
/// Connection parameters come from, in order: an existing client, explicit
/// settings, a URL, and finally the `REDIS_*` environment variables.
pub struct RedisLockProviderBuilder {
    client: Option<RedisClient>,
    settings: Option<RedisStoreSettings>,
    strategy: LockStrategy,
    poll_interval: Duration,
}

impl RedisLockProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            client: None,
            settings: None,
            strategy: LockStrategy::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Connects to the Redis server at `url`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.settings = Some(RedisStoreSettings::from_url(url));
        self
    }

    /// Connects using explicit settings.
    pub fn settings(mut self, settings: RedisStoreSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Uses an existing, already connected Redis client.
    pub fn client(mut self, client: RedisClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the protocol of created locks.
    pub fn strategy(mut self, strategy: LockStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the sleep between acquisition attempts.
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Builds the provider, connecting if no client was supplied.
    #[instrument(skip(self), fields(backend = "redis", strategy = %self.strategy))]
    pub async fn build(self) -> LockResult<RedisLockProvider> {
        let client = match self.client {
            Some(client) => client,
            None => {
                let settings = match self.settings {
                    Some(settings) => settings,
                    None => RedisStoreSettings::from_env()?,
                };
                connect(&settings).await?
            }
        };

        let inner = StoreLockProvider::new(RedisStore::new(client))
            .with_strategy(self.strategy)
            .with_poll_interval(self.poll_interval);

        Ok(RedisLockProvider { inner })
    }
}

impl Default for RedisLockProviderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn connect(settings: &RedisStoreSettings) -> LockResult<RedisClient> {
    let config = settings.to_redis_config()?;

    let client = RedisClient::new(
        config,
        Some(settings.performance_config()),
        Some(settings.connection_config()),
        None,
    );
    client.connect();
    client.wait_for_connect().await.map_err(|e| {
        LockError::unavailable(format!("failed to connect to Redis: {}", e))
    })?;

    debug!(host = %settings.host, port = settings.port, "connected to Redis");
    Ok(client)
}

/// Provider for Redis-based lease locks.
///
/// Every lock created by one provider shares its connection.
#[derive(Debug, Clone)]
pub struct RedisLockProvider {
    inner: StoreLockProvider<RedisStore>,
}

impl RedisLockProvider {
    /// Returns a new builder for configuring the provider.
    pub fn builder() -> RedisLockProviderBuilder {
        RedisLockProviderBuilder::new()
    }

    /// Creates a provider using the specified Redis URL.
    pub async fn new(url: impl Into<String>) -> LockResult<Self> {
        Self::builder().url(url).build().await
    }

    /// Creates a provider from the `REDIS_*` environment variables.
    pub async fn from_env() -> LockResult<Self> {
        Self::builder().build().await
    }

    pub fn store(&self) -> &RedisStore {
        self.inner.store()
    }

    pub fn strategy(&self) -> LockStrategy {
        self.inner.strategy()
    }
}

impl LockProvider for RedisLockProvider {
    type Lock = StrategyLock<RedisStore>;

    fn create_lock(&self, name: &str) -> LockResult<Self::Lock> {
        self.inner.create_lock(name)
    }
}
