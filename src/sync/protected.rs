use super::lock::Lock;
use super::mutex::Mutex;
use crate::config::Config;
use std::cell::UnsafeCell;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// A value bound to its own [`Mutex`]. Access goes through a
/// [`ProtectedValue`] guard that holds a [`Lock`] for as long as it lives.
pub struct Protected<T> {
    mutex: Mutex,
    value: UnsafeCell<T>,
}

// SAFETY: the value is only reachable through `get_mut` (exclusive borrow) or
// a `ProtectedValue`, which exists only while `mutex` is locked by it.
unsafe impl<T: Send> Send for Protected<T> {}
unsafe impl<T: Send> Sync for Protected<T> {}

impl<T> Protected<T> {
    /// Create a new unlocked wrapper around `value`.
    pub fn new(value: T) -> Self {
        Self {
            mutex: Mutex::new(),
            value: UnsafeCell::new(value),
        }
    }

    /// Locks and returns a guard, or `None` if another guard is alive.
    pub fn try_get(&self) -> Option<ProtectedValue<'_, T>> {
        let lock = Lock::try_new(&self.mutex)?;
        Some(self.guard(lock))
    }

    /// Like [`Protected::try_get`] but polls with backoff up to `attempts`
    /// times.
    pub fn get_with_backoff(&self, attempts: u32) -> Option<ProtectedValue<'_, T>> {
        let lock = Lock::acquire_with_backoff(&self.mutex, attempts)?;
        Some(self.guard(lock))
    }

    /// [`Protected::get_with_backoff`] bounded by
    /// `config.lock_backoff_attempts`.
    pub fn get_with_config(&self, config: &Config) -> Option<ProtectedValue<'_, T>> {
        self.get_with_backoff(config.lock_backoff_attempts)
    }

    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }

    pub fn is_locked(&self) -> bool {
        self.mutex.is_locked()
    }

    fn guard<'a>(&'a self, lock: Lock<'a>) -> ProtectedValue<'a, T> {
        debug_assert!(lock.acquired());
        // SAFETY: `lock` holds `self.mutex`, so no other reference to the
        // value exists until the guard (and with it the lock) is dropped.
        let value = unsafe { &mut *self.value.get() };
        ProtectedValue { value, _lock: lock }
    }
}

impl<T: Default> Default for Protected<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for Protected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Protected")
            .field("locked", &self.is_locked())
            .finish_non_exhaustive()
    }
}

/// Guard handed out by [`Protected`]. Dropping it unlocks.
pub struct ProtectedValue<'a, T> {
    value: &'a mut T,
    _lock: Lock<'a>,
}

impl<T> Deref for ProtectedValue<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &*self.value
    }
}

impl<T> DerefMut for ProtectedValue<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut *self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for ProtectedValue<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}
