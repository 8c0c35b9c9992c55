//! Redis implementation of the lock store.

use std::time::Duration;

use fred::prelude::*;
use fred::types::CustomCommand;
use lease_lock_core::error::{LockError, LockResult};
use lease_lock_core::store::LockStore;

/// Lua script deleting a key only while it holds the expected value.
const COMPARE_AND_DELETE_LUA: &str = r#"
    if redis.call('get', KEYS[1]) == ARGV[1] then
        return redis.call('del', KEYS[1])
    end
    return 0
"#;

/// A [`LockStore`] over a connected `fred` client.
///
/// Cloning shares the client, and with it the connection.
#[derive(Clone)]
pub struct RedisStore {
    client: RedisClient,
}

impl RedisStore {
    /// Wraps an already connected client.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

/// Splits fred errors into connectivity failures and store-side errors.
pub(crate) fn map_redis_error(command: &str, error: RedisError) -> LockError {
    let message = format!("Redis {} failed: {}", command, error);
    match error.kind() {
        RedisErrorKind::IO | RedisErrorKind::Timeout | RedisErrorKind::Canceled => {
            LockError::unavailable(message)
        }
        _ => LockError::backend(message),
    }
}

impl LockStore for RedisStore {
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Option<Duration>) -> LockResult<bool> {
        // PX rather than EX keeps sub-second leases intact.
        let expiration = ttl.map(|ttl| Expiration::PX(ttl.as_millis() as i64));

        // SET NX replies OK when the key was created and nil otherwise.
        let result: Option<String> = self
            .client
            .set(key, value, expiration, Some(SetOptions::NX), false)
            .await
            .map_err(|e| map_redis_error("SET NX", e))?;

        Ok(result.is_some())
    }

    async fn get(&self, key: &str) -> LockResult<Option<String>> {
        self.client
            .get(key)
            .await
            .map_err(|e| map_redis_error("GET", e))
    }

    async fn get_set(&self, key: &str, value: &str) -> LockResult<Option<String>> {
        self.client
            .getset(key, value)
            .await
            .map_err(|e| map_redis_error("GETSET", e))
    }

    async fn delete(&self, key: &str) -> LockResult<bool> {
        let removed: i64 = self
            .client
            .del(key)
            .await
            .map_err(|e| map_redis_error("DEL", e))?;
        Ok(removed > 0)
    }

    /// Compares and deletes in one server-side script, so no other client can
    /// take the key between the check and the delete.
    async fn delete_if_equals(&self, key: &str, expected: &str) -> LockResult<bool> {
        let args: Vec<RedisValue> = vec![
            COMPARE_AND_DELETE_LUA.into(),
            1_i64.into(), // numkeys
            key.into(),
            expected.into(),
        ];

        let cmd = CustomCommand::new_static("EVAL", None, false);

        let removed: i64 = self
            .client
            .custom(cmd, args)
            .await
            .map_err(|e| map_redis_error("EVAL (compare-and-delete)", e))?;

        Ok(removed == 1)
    }
}
