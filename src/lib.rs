//! runq - task lifecycle, scoped locking, thread handles and a priority
//! ready-queue.
//!
//! The substrate a worker pool or cooperative scheduler is built on: tasks
//! are produced, ranked by priority, handed to threads for execution, and
//! their completion is observable and resettable.
//!
//! # Quick Start
//!
//! ```
//! use runq::prelude::*;
//!
//! let mut queue = ReadyQueue::new();
//! queue.push(Task::new(|| println!("background")), Priority::Background);
//! queue.push(Task::new(|| println!("urgent")), Priority::Realtime);
//!
//! // Runs "urgent" first and hands the finished task back.
//! let mut task = queue.run_next().unwrap();
//! assert!(task.is_done());
//! task.reset();
//! assert_eq!(task.state(), TaskState::NotStarted);
//! ```
//!
//! # Concurrency
//!
//! Nothing here is internally synchronized except [`sync::Mutex`] and the
//! atomic task state. A heap shared between threads goes behind its own
//! mutex, for example as a [`sync::Protected`] value. The only acquire is a
//! non-blocking `try_lock`; callers that wait poll with backoff.

#![warn(missing_debug_implementations)]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod executor;
pub mod order;
pub mod prelude;
pub mod scheduler;
pub mod sync;
pub mod util;

pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use executor::{Runnable, Task, TaskState, Thread};
pub use order::{hash_value, invert, CompareResult};
pub use scheduler::{BinaryHeap, HeapOrder, Priority, ReadyQueue};
pub use sync::{Lock, Mutex};
