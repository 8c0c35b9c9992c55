//! Redis connection settings.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use fred::prelude::*;
use fred::types::{ConnectionConfig, PerformanceConfig};
use lease_lock_core::error::{LockError, LockResult};
use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds};

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 6379;

/// Where and how to connect to the Redis instance holding lock keys.
///
/// Deserializable from the application's settings document; every field has
/// a default so an empty section yields `localhost:6379`, database 0.
/// When `url` is set it takes precedence over `host`/`port`, while explicit
/// `password` and `db` still override what the URL carries.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RedisStoreSettings {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub db: Option<u8>,
    pub password: Option<String>,
    /// Time allowed for establishing the connection.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub connect_timeout: Duration,
    /// Upper bound on one command round trip. Zero leaves it unbounded.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub command_timeout: Duration,
}

impl Default for RedisStoreSettings {
    fn default() -> Self {
        Self {
            url: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db: None,
            password: None,
            connect_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisStoreSettings {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_db(mut self, db: u8) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Reads `REDIS_URL`, `REDIS_HOST`, `REDIS_PORT`, `REDIS_DB` and
    /// `REDIS_PASSWORD`. Unset variables keep their defaults.
    pub fn from_env() -> LockResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LockResult<Self> {
        let mut settings = Self::default();
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup("REDIS_URL") {
            settings.url = Some(url);
        }
        if let Some(host) = lookup("REDIS_HOST") {
            settings.host = host;
        }
        if let Some(port) = lookup("REDIS_PORT") {
            settings.port = parse_var("REDIS_PORT", &port)?;
        }
        if let Some(db) = lookup("REDIS_DB") {
            settings.db = Some(parse_var("REDIS_DB", &db)?);
        }
        settings.password = lookup("REDIS_PASSWORD");

        Ok(settings)
    }

    /// Builds the `fred` client configuration.
    pub fn to_redis_config(&self) -> LockResult<RedisConfig> {
        let mut config = match &self.url {
            Some(url) => RedisConfig::from_url(url)
                .map_err(|e| LockError::Config(format!("invalid Redis URL: {}", e)))?,
            None => RedisConfig {
                server: ServerConfig::new_centralized(self.host.clone(), self.port),
                ..RedisConfig::default()
            },
        };

        if self.password.is_some() {
            config.password = self.password.clone();
        }
        if self.db.is_some() {
            config.database = self.db;
        }

        Ok(config)
    }

    pub(crate) fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            connection_timeout: self.connect_timeout,
            ..ConnectionConfig::default()
        }
    }

    pub(crate) fn performance_config(&self) -> PerformanceConfig {
        PerformanceConfig {
            default_command_timeout: self.command_timeout,
            ..PerformanceConfig::default()
        }
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> LockResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| LockError::Config(format!("{} has an invalid value: {:?}", name, value)))
}
