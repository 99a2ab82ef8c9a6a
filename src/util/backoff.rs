//! Exponential backoff for polling non-blocking acquisitions.

use std::hint::spin_loop;
use std::thread;
use std::time::Duration;

/// Spin, then yield, then sleep between polls of a `try_lock`-style call.
#[derive(Debug, Default)]
pub struct Backoff {
    step: u32,
}

impl Backoff {
    const SPIN_LIMIT: u32 = 6;
    const YIELD_LIMIT: u32 = 10;
    const SLEEP: Duration = Duration::from_micros(10);

    pub fn new() -> Self {
        Self { step: 0 }
    }

    /// Number of waits performed since construction or the last reset.
    pub fn attempts(&self) -> u32 {
        self.step
    }

    pub fn reset(&mut self) {
        self.step = 0;
    }

    /// Wait once. Early steps spin `2^step` times, then the thread yields,
    /// and past the yield limit it sleeps briefly.
    pub fn wait(&mut self) {
        if self.step <= Self::SPIN_LIMIT {
            for _ in 0..(1u32 << self.step) {
                spin_loop();
            }
        } else if self.step <= Self::YIELD_LIMIT {
            thread::yield_now();
        } else {
            thread::sleep(Self::SLEEP);
        }
        self.step = self.step.saturating_add(1);
    }

    /// True once waits have escalated to sleeping.
    pub fn is_sleeping(&self) -> bool {
        self.step > Self::YIELD_LIMIT
    }

    /// Calls `poll` until it yields `Some`, waiting between calls, giving up
    /// after `max_attempts` polls.
    pub fn poll<T, F>(&mut self, max_attempts: u32, mut poll: F) -> Option<T>
    where
        F: FnMut() -> Option<T>,
    {
        for attempt in 0..max_attempts {
            if let Some(value) = poll() {
                return Some(value);
            }
            if attempt + 1 < max_attempts {
                self.wait();
            }
        }
        None
    }
}
