//! Lease and wait timing.

use std::time::Duration;

use crate::error::{LockError, LockResult};

/// Default lease: just under a minute so a crashed holder's key clears quickly.
pub const DEFAULT_LEASE: Duration = Duration::from_secs(59);

/// Default time a caller polls before giving up.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(5);

/// Default sleep between acquisition attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Timing used by guards and providers.
///
/// Both lock strategies share these defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockTimeouts {
    /// How long a granted lease stays valid in the store.
    pub lease: Duration,
    /// How long `acquire` keeps polling.
    pub wait: Duration,
    /// Sleep between attempts.
    pub poll_interval: Duration,
}

impl LockTimeouts {
    pub fn new(lease: Duration, wait: Duration) -> Self {
        Self {
            lease,
            wait,
            ..Self::default()
        }
    }

    pub fn with_lease(mut self, lease: Duration) -> Self {
        self.lease = lease;
        self
    }

    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl Default for LockTimeouts {
    fn default() -> Self {
        Self {
            lease: DEFAULT_LEASE,
            wait: DEFAULT_WAIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Rejects leases the store cannot express.
///
/// Leases are sent with millisecond precision, so anything below one
/// millisecond would create a key that never expires or is rejected outright.
pub(crate) fn validate_lease(lease: Duration) -> LockResult<()> {
    if lease < Duration::from_millis(1) {
        return Err(LockError::InvalidOptions(format!(
            "lease must be at least 1ms, got {:?}",
            lease
        )));
    }
    Ok(())
}
