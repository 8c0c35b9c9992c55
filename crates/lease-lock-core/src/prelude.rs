//! Convenience prelude for lease lock types.

pub use crate::error::{LockError, LockResult};
pub use crate::guard::{Guarded, LockGuard};
pub use crate::strategy::LockStrategy;
pub use crate::timeout::LockTimeouts;
pub use crate::traits::{LeaseLock, LockProvider, LockProviderExt};
