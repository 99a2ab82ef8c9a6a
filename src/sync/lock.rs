use super::mutex::Mutex;
use crate::util::Backoff;
use std::fmt;

/// Scoped guard over a [`Mutex`].
///
/// A `Lock` borrows the mutex for its lifetime and carries the duty to unlock
/// it. On drop it unlocks exactly once if it still owes the unlock. The duty
/// moves with the value and is never duplicated; [`Lock::take`] moves it out
/// of a place and leaves an empty lock behind.
///
/// [`Lock::new`] always takes on the duty, even when its try-lock fails. Such
/// a lock will release whoever holds the mutex when it drops. Check
/// [`Lock::acquired`], or use [`Lock::try_new`] which only owes an unlock for
/// a mutex it actually locked.
#[derive(Default)]
pub struct Lock<'a> {
    mutex: Option<&'a Mutex>,
    needs_unlocking: bool,
    acquired: bool,
}

impl<'a> Lock<'a> {
    /// Records `mutex`, tries to lock it, and owes an unlock regardless of
    /// the outcome.
    pub fn new(mutex: &'a Mutex) -> Self {
        let acquired = mutex.try_lock();
        if !acquired {
            tracing::debug!("lock constructed over a held mutex; unlock duty taken anyway");
        }
        Self {
            mutex: Some(mutex),
            needs_unlocking: true,
            acquired,
        }
    }

    /// Locks `mutex` if it is free. Returns `None` without owing anything if
    /// it is held.
    pub fn try_new(mutex: &'a Mutex) -> Option<Self> {
        mutex.try_lock().then(|| Self {
            mutex: Some(mutex),
            needs_unlocking: true,
            acquired: true,
        })
    }

    /// Takes over the unlock duty for a mutex the caller already locked.
    pub fn adopt(mutex: &'a Mutex) -> Self {
        debug_assert!(mutex.is_locked(), "adopting an unlocked mutex");
        Self {
            mutex: Some(mutex),
            needs_unlocking: true,
            acquired: true,
        }
    }

    /// Polls [`Lock::try_new`] with exponential backoff, up to `attempts`
    /// times.
    pub fn acquire_with_backoff(mutex: &'a Mutex, attempts: u32) -> Option<Self> {
        let mut backoff = Backoff::new();
        let lock = backoff.poll(attempts, || Self::try_new(mutex));
        if lock.is_none() {
            tracing::trace!(attempts, "gave up polling for mutex");
        }
        lock
    }

    /// Moves the unlock duty into a new lock. `self` is left empty and owes
    /// nothing.
    pub fn take(&mut self) -> Lock<'a> {
        std::mem::take(self)
    }

    /// Whether the try-lock made at construction succeeded.
    pub fn acquired(&self) -> bool {
        self.acquired
    }

    pub fn needs_unlocking(&self) -> bool {
        self.needs_unlocking
    }

    pub fn mutex(&self) -> Option<&'a Mutex> {
        self.mutex
    }

    /// Unlocks now instead of at the end of the scope.
    pub fn release(mut self) {
        self.release_duty();
    }

    fn release_duty(&mut self) {
        if !std::mem::replace(&mut self.needs_unlocking, false) {
            return;
        }
        let Some(mutex) = self.mutex else {
            return;
        };
        if !mutex.try_unlock() {
            tracing::error!("lock owed an unlock but its mutex was already unlocked");
            if !std::thread::panicking() {
                panic!("Lock released a mutex that was not locked");
            }
        }
    }
}

impl Drop for Lock<'_> {
    fn drop(&mut self) {
        self.release_duty();
    }
}

impl fmt::Debug for Lock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lock")
            .field("has_mutex", &self.mutex.is_some())
            .field("needs_unlocking", &self.needs_unlocking)
            .field("acquired", &self.acquired)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_owes_nothing() {
        let lock = Lock::default();
        assert!(!lock.needs_unlocking());
        assert!(lock.mutex().is_none());
        assert!(!lock.acquired());
    }

    #[test]
    fn test_scope_releases() {
        let mutex = Mutex::new();
        {
            let lock = Lock::new(&mutex);
            assert!(lock.acquired());
            assert!(lock.needs_unlocking());
            assert!(mutex.is_locked());
        }
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_early_return_releases() {
        fn guarded(mutex: &Mutex, bail: bool) -> u32 {
            let _lock = Lock::new(mutex);
            if bail {
                return 0;
            }
            1
        }

        let mutex = Mutex::new();
        assert_eq!(guarded(&mutex, true), 0);
        assert!(!mutex.is_locked());
        assert_eq!(guarded(&mutex, false), 1);
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_unwind_releases() {
        let mutex = Mutex::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _lock = Lock::new(&mutex);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_failed_try_lock_still_owes_unlock() {
        let mutex = Mutex::new();
        assert!(mutex.try_lock());

        let lock = Lock::new(&mutex);
        assert!(!lock.acquired());
        assert!(lock.needs_unlocking());

        drop(lock);
        // The pre-existing hold was released by the lock, exactly once.
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_take_transfers_duty() {
        let mutex = Mutex::new();
        let mut source = Lock::new(&mutex);
        let target = source.take();

        assert!(!source.needs_unlocking());
        assert!(source.mutex().is_none());
        assert!(target.needs_unlocking());

        drop(source);
        assert!(mutex.is_locked());

        drop(target);
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_move_keeps_single_duty() {
        let mutex = Mutex::new();
        let lock = Lock::new(&mutex);
        let moved = lock;
        assert!(mutex.is_locked());
        drop(moved);
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_try_new_on_held_mutex() {
        let mutex = Mutex::new();
        let held = Lock::try_new(&mutex).expect("free mutex");
        assert!(Lock::try_new(&mutex).is_none());
        drop(held);
        assert!(!mutex.is_locked());
        assert!(Lock::try_new(&mutex).is_some());
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_adopt_unlocks() {
        let mutex = Mutex::new();
        assert!(mutex.try_lock());
        let lock = Lock::adopt(&mutex);
        assert!(lock.needs_unlocking());
        drop(lock);
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_release_is_single() {
        let mutex = Mutex::new();
        let lock = Lock::new(&mutex);
        lock.release();
        assert!(!mutex.is_locked());
        assert!(mutex.try_lock());
        mutex.unlock();
    }

    #[test]
    fn test_acquire_with_backoff() {
        let mutex = Mutex::new();
        let lock = Lock::acquire_with_backoff(&mutex, 3).expect("free mutex");
        assert!(Lock::acquire_with_backoff(&mutex, 3).is_none());
        drop(lock);
        assert!(!mutex.is_locked());
    }
}
