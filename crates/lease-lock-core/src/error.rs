//! Error types for lease lock operations.

use thiserror::Error;

/// Errors that can occur during lock operations.
///
/// Running out of wait time is not an error: `acquire` reports it as
/// `Ok(false)`. Releasing a lock owned by someone else is not an error either:
/// `release` reports it as `Ok(false)`.
#[derive(Error, Debug)]
pub enum LockError {
    /// The store could not be reached (connection refused, I/O failure,
    /// command timeout).
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The store answered with an error unrelated to connectivity.
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Invalid lock name.
    #[error("invalid lock name: {0}")]
    InvalidName(String),

    /// Invalid lease or wait settings.
    #[error("invalid lock options: {0}")]
    InvalidOptions(String),

    /// Store connection settings could not be resolved.
    #[error("configuration error: {0}")]
    Config(String),

    /// A legacy lock key held something other than an expiry timestamp.
    #[error("unexpected value {value:?} stored under lock key {key}")]
    CorruptValue { key: String, value: String },
}

impl LockError {
    /// Wraps a connectivity failure.
    pub fn unavailable(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::StoreUnavailable(error.into())
    }

    /// Wraps a store-side failure.
    pub fn backend(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(error.into())
    }

    /// Returns `true` if the store could not be reached.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

/// Result type for lock operations.
pub type LockResult<T> = Result<T, LockError>;
