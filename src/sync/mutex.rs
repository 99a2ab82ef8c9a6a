use crate::util::backoff::Backoff;
use parking_lot::lock_api::RawMutex as _;
use parking_lot::RawMutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Process-local mutual-exclusion object with two states, unlocked and locked.
///
/// Only a non-blocking acquire is exposed. The mutex is not owned by a thread:
/// whoever holds the unlock duty may release it from any thread.
pub struct Mutex {
    raw: RawMutex,
    held: AtomicBool,
}

impl Mutex {
    /// Create a new unlocked mutex.
    pub const fn new() -> Self {
        Self {
            raw: RawMutex::INIT,
            held: AtomicBool::new(false),
        }
    }

    /// Locks the mutex if it is unlocked. Returns immediately with `false` if
    /// it is already locked.
    pub fn try_lock(&self) -> bool {
        if self.raw.try_lock() {
            self.held.store(true, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// Unlocks the mutex.
    ///
    /// # Panics
    ///
    /// Panics if the mutex is not locked. Unlocking an unlocked mutex is a
    /// caller logic error, never a recoverable condition.
    pub fn unlock(&self) {
        if !self.try_unlock() {
            panic!("Mutex::unlock called on an unlocked mutex");
        }
    }

    /// Unlocks if locked and reports whether it did.
    ///
    /// `try_lock` locks `raw` before publishing `held`, so a locked `raw` with
    /// `held` still false means an acquisition is mid-flight. Wait for it to
    /// publish rather than reporting the mutex as unlocked.
    pub(crate) fn try_unlock(&self) -> bool {
        let mut backoff = Backoff::new();
        loop {
            if self.held.swap(false, Ordering::AcqRel) {
                // SAFETY: `held` was true, so `raw` is locked, and the swap
                // makes this the only call that observed it, so `raw` is
                // unlocked once. The `send_guard` feature of parking_lot makes
                // its raw mutex sound to unlock from a thread other than the
                // one that locked it.
                unsafe { self.raw.unlock() };
                return true;
            }
            if !self.raw.is_locked() {
                return false;
            }
            backoff.wait();
        }
    }

    /// True while the mutex is locked.
    pub fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }
}

impl Default for Mutex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Mutex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutex")
            .field("locked", &self.is_locked())
            .finish()
    }
}
