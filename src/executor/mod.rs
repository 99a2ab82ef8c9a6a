//! Task and thread primitives.
//!
//! A [`Task`] is a unit of deferred work with an observable lifecycle; a
//! [`Thread`] is the handle to a native thread a higher-level owner joins or
//! detaches.

pub mod panic_handler;
pub mod task;
pub mod thread;

pub use panic_handler::{catch_panic, TaskFailure};
pub use task::{Runnable, StateCell, Task, TaskId, TaskState, TaskWatch};
pub use thread::{max_threads, Thread};
