//! Lock key derivation and ownership tokens.

use std::fmt;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

use crate::error::{LockError, LockResult};

const TOKEN_KEY_SUFFIX: &str = "_dynamic";
const LEGACY_KEY_SUFFIX: &str = "_dynamic_test";

/// Store key identifying one exclusive resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockKey(String);

impl LockKey {
    /// Key used by the token strategy: `<name>_dynamic`.
    pub fn token(name: &str) -> LockResult<Self> {
        validate_name(name)?;
        Ok(Self(format!("{}{}", name, TOKEN_KEY_SUFFIX)))
    }

    /// Key used by the legacy strategy: `<name>_dynamic_test`.
    pub fn legacy(name: &str) -> LockResult<Self> {
        validate_name(name)?;
        Ok(Self(format!("{}{}", name, LEGACY_KEY_SUFFIX)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_name(name: &str) -> LockResult<()> {
    if name.trim().is_empty() {
        return Err(LockError::InvalidName("lock name cannot be empty".to_string()));
    }
    if name.chars().any(char::is_control) {
        return Err(LockError::InvalidName(format!(
            "lock name {:?} contains control characters",
            name
        )));
    }
    Ok(())
}

/// Random value proving which handle holds a lock.
///
/// Format: `{process_id}_{counter}_{random}`. The counter keeps tokens of
/// handles created in the same process distinct even if the random part
/// collides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnershipToken(String);

impl OwnershipToken {
    pub fn generate() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed);

        let random: u64 = rand::thread_rng().r#gen();

        Self(format!("{}_{}_{:016x}", process::id(), counter, random))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnershipToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
