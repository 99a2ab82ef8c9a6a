//! Deciding which task runs next.
//!
//! [`BinaryHeap`] is the general priority queue; [`ReadyQueue`] specializes it
//! to boxed runnables ranked by [`Priority`].

pub mod heap;
pub mod ready;

pub use heap::{BinaryHeap, EntryId, HeapOrder};
pub use ready::{Priority, ReadyQueue, SharedReadyQueue};
