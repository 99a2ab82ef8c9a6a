//! Mutual exclusion with scope-bound acquisition and release.
//!
//! [`Mutex`] only offers a non-blocking `try_lock`; callers that need to wait
//! poll through [`Lock::acquire_with_backoff`]. [`Lock`] ties the unlock duty
//! to a value so every exit path releases exactly once.

pub mod lock;
pub mod mutex;
pub mod protected;

pub use lock::Lock;
pub use mutex::Mutex;
pub use protected::{Protected, ProtectedValue};
