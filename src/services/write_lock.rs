//! Exclusive scope for operations that mutate repository state

use std::sync::{Mutex, PoisonError};
use std::thread::{self, ThreadId};

/// Serializes every mutation of the index, refs and working tree of one
/// repository instance.
///
/// Waiters are admitted in FIFO order. Read-only operations never take the
/// lock. Re-entering the lock from the thread that already holds it is a
/// programming error and panics instead of deadlocking.
///
/// `perform_writing` blocks the calling thread; run it from a blocking
/// context such as `tokio::task::spawn_blocking`, never on an async worker.
pub struct WriteLock {
    gate: tokio::sync::Mutex<()>,
    owner: Mutex<Option<ThreadId>>,
}

impl WriteLock {
    pub fn new() -> Self {
        Self {
            gate: tokio::sync::Mutex::new(()),
            owner: Mutex::new(None),
        }
    }

    /// Run `operation` while holding the lock
    pub fn perform_writing<T>(&self, operation: impl FnOnce() -> T) -> T {
        let current = thread::current().id();
        if self.owner() == Some(current) {
            panic!("WriteLock re-entered by {:?} while already held", current);
        }

        let _gate = self.gate.blocking_lock();
        self.set_owner(Some(current));
        let _owner = OwnerReset(self);

        operation()
    }

    /// Whether some thread is currently inside `perform_writing`
    pub fn is_held(&self) -> bool {
        self.owner().is_some()
    }

    fn owner(&self) -> Option<ThreadId> {
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_owner(&self, owner: Option<ThreadId>) {
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner) = owner;
    }
}

impl Default for WriteLock {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the recorded owner before the gate guard is released, including on unwind
struct OwnerReset<'a>(&'a WriteLock);

impl Drop for OwnerReset<'_> {
    fn drop(&mut self) {
        self.0.set_owner(None);
    }
}
