//! Tests for provider abstraction.

use lease_lock::{
    Guarded, LeaseLock, LockProvider, LockProviderExt, LockStrategy, MemoryStore,
    StoreLockProvider,
};
use std::time::Duration;

mod common;
use common::faulty_store::FaultyStore;

const LEASE: Duration = Duration::from_secs(30);

/// Tests that any provider can be used with the same code.
async fn test_provider_abstraction<P: LockProvider>(provider: &P, name: &str) {
    // Create a lock using the provider
    let lock = provider.create_lock(name).unwrap();
    assert_eq!(lock.name(), name);

    // Try to acquire the lock
    assert!(lock.try_acquire(LEASE).await.unwrap());

    // A second lock with the same name is excluded
    let other = provider.create_lock(name).unwrap();
    assert!(!other.try_acquire(LEASE).await.unwrap());

    // Release the lock
    assert!(lock.release().await.unwrap());

    // Now the other lock can acquire it
    assert!(other.try_acquire(LEASE).await.unwrap());
    assert!(other.release().await.unwrap());
}

/// Tests provider extension methods work with any provider.
async fn test_provider_extensions<P: LockProvider + LockProviderExt>(provider: &P, name: &str) {
    let (lock, acquired) = provider
        .acquire_lock(name, LEASE, Duration::from_millis(100))
        .await
        .unwrap();
    assert!(acquired);

    // Guard over the same name is skipped while the lock is held
    let guard = provider
        .create_guard(name)
        .unwrap()
        .wait(Duration::from_millis(100));
    assert_eq!(guard.run(|| async {}).await, Guarded::NotAcquired);

    assert!(lock.release().await.unwrap());
    assert!(guard.run(|| async {}).await.is_completed());
}

#[tokio::test(start_paused = true)]
async fn test_token_provider_abstraction() {
    let provider = StoreLockProvider::new(MemoryStore::new());
    test_provider_abstraction(&provider, "test-resource-abstraction").await;
}

#[tokio::test]
async fn test_legacy_provider_abstraction() {
    let provider = StoreLockProvider::new(MemoryStore::new()).with_strategy(LockStrategy::Legacy);
    test_provider_abstraction(&provider, "test-resource-abstraction").await;
}

#[tokio::test(start_paused = true)]
async fn test_token_provider_extensions() {
    let provider = StoreLockProvider::new(MemoryStore::new());
    test_provider_extensions(&provider, "test-resource-extensions").await;
}

#[tokio::test]
async fn test_legacy_provider_extensions() {
    let provider = StoreLockProvider::new(MemoryStore::new())
        .with_strategy(LockStrategy::Legacy)
        .with_poll_interval(Duration::from_millis(20));
    test_provider_extensions(&provider, "test-resource-extensions").await;
}

#[tokio::test(start_paused = true)]
async fn test_provider_swappability() {
    // Code written against the trait works with any store
    async fn use_any_provider<P: LockProvider>(provider: &P) {
        let lock = provider.create_lock("shared-resource").unwrap();
        assert!(lock.try_acquire(LEASE).await.unwrap());
        assert!(lock.release().await.unwrap());
    }

    use_any_provider(&StoreLockProvider::new(MemoryStore::new())).await;
    use_any_provider(&StoreLockProvider::new(FaultyStore::new(MemoryStore::new()))).await;
}

#[tokio::test(start_paused = true)]
async fn test_strategies_do_not_share_keys() {
    let store = MemoryStore::new();
    let token = StoreLockProvider::new(store.clone());
    let legacy = StoreLockProvider::new(store.clone()).with_strategy(LockStrategy::Legacy);

    let a = token.create_lock("report").unwrap();
    let b = legacy.create_lock("report").unwrap();

    assert!(a.try_acquire(LEASE).await.unwrap());
    assert!(b.try_acquire(LEASE).await.unwrap());
    assert_eq!(store.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_provider_reuses_one_store_connection() {
    let faulty = FaultyStore::new(MemoryStore::new());
    let provider = StoreLockProvider::new(faulty.clone());

    for i in 0..3 {
        let lock = provider.create_lock(&format!("job-{}", i)).unwrap();
        assert!(lock.try_acquire(LEASE).await.unwrap());
        assert!(lock.release().await.unwrap());
    }

    // Every lock went through the one shared client: set + get + release each.
    assert_eq!(faulty.calls(), 9);
}
