//! Test utilities shared across crate-level unit tests.

pub mod backend;

use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

pub use backend::{RecordedCall, RecordingBackend};

/// Serializes tests that read or mutate process environment variables.
pub fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}
