//! Store wrappers for exercising failure paths.

use lease_lock::{LockError, LockResult, LockStore, MemoryStore};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Wraps a [`MemoryStore`] and can be switched into an outage.
///
/// While down, every call fails with `StoreUnavailable`.
#[derive(Clone)]
pub struct FaultyStore {
    inner: MemoryStore,
    down: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl FaultyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            down: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn go_down(&self) {
        self.down.store(true, Ordering::SeqCst);
    }

    pub fn come_back(&self) {
        self.down.store(false, Ordering::SeqCst);
    }

    /// Number of calls made, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> LockResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(LockError::unavailable("connection refused"));
        }
        Ok(())
    }
}

impl LockStore for FaultyStore {
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Option<Duration>) -> LockResult<bool> {
        self.check()?;
        self.inner.set_if_absent(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> LockResult<Option<String>> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn get_set(&self, key: &str, value: &str) -> LockResult<Option<String>> {
        self.check()?;
        self.inner.get_set(key, value).await
    }

    async fn delete(&self, key: &str) -> LockResult<bool> {
        self.check()?;
        self.inner.delete(key).await
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> LockResult<bool> {
        self.check()?;
        self.inner.delete_if_equals(key, expected).await
    }
}

/// A store without a native compare-and-delete.
///
/// Release falls back to the read-then-delete default. A takeover can be
/// armed to happen right after the next read, standing in for "the lease
/// expired and another process acquired" inside that window.
#[derive(Clone)]
pub struct NonAtomicStore {
    inner: MemoryStore,
    takeover: Arc<Mutex<Option<(String, String)>>>,
}

impl NonAtomicStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            takeover: Arc::new(Mutex::new(None)),
        }
    }

    /// After the next `get`, `key` will hold `value` instead.
    pub fn arm_takeover(&self, key: &str, value: &str) {
        *self.takeover.lock().unwrap() = Some((key.to_string(), value.to_string()));
    }
}

impl LockStore for NonAtomicStore {
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Option<Duration>) -> LockResult<bool> {
        self.inner.set_if_absent(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> LockResult<Option<String>> {
        let current = self.inner.get(key).await?;
        let armed = self.takeover.lock().unwrap().take();
        if let Some((key, value)) = armed {
            self.inner.get_set(&key, &value).await?;
        }
        Ok(current)
    }

    async fn get_set(&self, key: &str, value: &str) -> LockResult<Option<String>> {
        self.inner.get_set(key, value).await
    }

    async fn delete(&self, key: &str) -> LockResult<bool> {
        self.inner.delete(key).await
    }
}
