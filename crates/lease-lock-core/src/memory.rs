//! In-process store.
//!
//! Locks built on [`MemoryStore`] only exclude tasks that share the same store
//! instance (clones share state). Useful for tests and single-process
//! deployments. Expiry is measured with [`tokio::time::Instant`], so a paused
//! test clock drives lease expiry too.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use tokio::time::Instant;

use crate::error::LockResult;
use crate::store::LockStore;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// A [`LockStore`] backed by a shared hash map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remaining time to live of `key`, if it exists and has an expiry.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let entries = self.lock_entries();
        let expires_at = entries.get(key)?.expires_at?;
        Some(expires_at.saturating_duration_since(Instant::now()))
    }

    /// Locks the map with expired entries already purged.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        let mut entries = self.entries.lock();
        let now = Instant::now();
        entries.retain(|_, entry| entry.is_live(now));
        entries
    }
}

impl LockStore for MemoryStore {
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Option<Duration>) -> LockResult<bool> {
        let mut entries = self.lock_entries();
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
        Ok(true)
    }

    async fn get(&self, key: &str) -> LockResult<Option<String>> {
        let entries = self.lock_entries();
        Ok(entries.get(key).map(|e| e.value.clone()))
    }

    async fn get_set(&self, key: &str, value: &str) -> LockResult<Option<String>> {
        let mut entries = self.lock_entries();
        // GETSET semantics: the new value carries no expiry.
        let previous = entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: None,
            },
        );
        Ok(previous.map(|e| e.value))
    }

    async fn delete(&self, key: &str) -> LockResult<bool> {
        let mut entries = self.lock_entries();
        Ok(entries.remove(key).is_some())
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> LockResult<bool> {
        let mut entries = self.lock_entries();
        match entries.get(key) {
            Some(entry) if entry.value == expected => {
                entries.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_if_absent_only_once() {
        let store = MemoryStore::new();
        assert!(store.set_if_absent("k", "a", None).await.unwrap());
        assert!(!store.set_if_absent("k", "b", None).await.unwrap());
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expires_key() {
        let store = MemoryStore::new();
        store
            .set_if_absent("k", "a", Some(Duration::from_secs(2)))
            .await
            .unwrap();
        assert_eq!(store.ttl("k"), Some(Duration::from_secs(2)));

        tokio::time::advance(Duration::from_millis(1999)).await;
        assert!(store.get("k").await.unwrap().is_some());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(store.get("k").await.unwrap().is_none());
        assert!(store.set_if_absent("k", "b", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_if_equals_checks_value() {
        let store = MemoryStore::new();
        store.set_if_absent("k", "a", None).await.unwrap();

        assert!(!store.delete_if_equals("k", "b").await.unwrap());
        assert!(store.get("k").await.unwrap().is_some());

        assert!(store.delete_if_equals("k", "a").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_get_set_returns_previous() {
        let store = MemoryStore::new();
        assert_eq!(store.get_set("k", "a").await.unwrap(), None);
        assert_eq!(store.get_set("k", "b").await.unwrap().as_deref(), Some("a"));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_panic_while_locked_keeps_store_usable() {
        let store = MemoryStore::new();
        store.set_if_absent("k", "a", None).await.unwrap();

        let shared = store.clone();
        let crashed = std::thread::spawn(move || {
            let _entries = shared.entries.lock();
            panic!("writer crashed while holding the map");
        })
        .join();
        assert!(crashed.is_err());

        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert_eq!(store.ttl("k"), None);
        assert!(store.delete_if_equals("k", "a").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set_if_absent("k", "a", None).await.unwrap();
        assert_eq!(other.len(), 1);
    }
}
