//! Type aliases for commonly used shared-state types.
//!
//! The control loop publishes its state through a reader-writer cell and
//! listens for shutdown on an atomic flag; both are shared across threads
//! with `Arc`.

use parking_lot::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// A thread-safe reader-writer lock wrapper for read-heavy workloads.
///
/// Uses `parking_lot::RwLock`, which never poisons, so readers get a value
/// even if a writer panicked.
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// A boolean flag shared between threads (e.g. a terminate request).
pub type SharedFlag = Arc<AtomicBool>;

/// Create a new `ThreadSafeRw<T>` from a value.
#[inline]
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}

/// Create a new `SharedFlag` with the given initial value.
#[inline]
pub fn shared_flag(value: bool) -> SharedFlag {
    Arc::new(AtomicBool::new(value))
}
