//! Ready queue: runnable tasks ranked by [`Priority`].

use super::heap::{BinaryHeap, EntryId, HeapOrder};
use crate::config::Config;
use crate::error::Result;
use crate::executor::{Runnable, TaskState};
use crate::sync::Protected;

/// Priority level for task scheduling. `Realtime` is the most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Priority {
    Realtime = 0,
    High = 1,
    #[default]
    Normal = 2,
    Low = 3,
    Background = 4,
}

/// Boxed runnables in a min-ordered heap over [`Priority`], so the most
/// urgent level is dequeued first.
///
/// Not synchronized. Share one between threads as a [`SharedReadyQueue`].
#[derive(Debug)]
pub struct ReadyQueue {
    heap: BinaryHeap<Box<dyn Runnable>, Priority>,
}

/// A ready queue behind its own dedicated mutex.
pub type SharedReadyQueue = Protected<ReadyQueue>;

impl ReadyQueue {
    /// Create a new empty ready queue.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(HeapOrder::Min, capacity),
        }
    }

    /// Uses `initial_capacity` from `config`. The ordering is always
    /// most-urgent-first regardless of `heap_order`.
    pub fn from_config(config: &Config) -> Self {
        Self::with_capacity(config.initial_capacity)
    }

    pub fn shared(self) -> SharedReadyQueue {
        Protected::new(self)
    }

    pub fn push<R>(&mut self, task: R, priority: Priority) -> EntryId
    where
        R: Runnable + 'static,
    {
        self.push_boxed(Box::new(task), priority)
    }

    pub fn push_boxed(&mut self, task: Box<dyn Runnable>, priority: Priority) -> EntryId {
        tracing::trace!(task = %task.id(), ?priority, "task queued");
        self.heap.enqueue(task, priority)
    }

    /// Removes the most urgent task.
    pub fn pop(&mut self) -> Result<Box<dyn Runnable>> {
        self.heap.dequeue()
    }

    pub fn pop_with_priority(&mut self) -> Result<(Priority, Box<dyn Runnable>)> {
        self.heap.dequeue_with_priority()
    }

    pub fn peek_priority(&self) -> Option<Priority> {
        self.heap.peek_priority().copied()
    }

    pub fn remove(&mut self, entry: EntryId) -> Option<Box<dyn Runnable>> {
        self.heap.remove(entry)
    }

    pub fn reprioritize(&mut self, entry: EntryId, priority: Priority) -> Result<()> {
        self.heap.change_priority(entry, priority)
    }

    /// Pops the most urgent task, runs it on the calling thread, and hands
    /// it back `Done` so the caller can reset and requeue it.
    pub fn run_next(&mut self) -> Result<Box<dyn Runnable>> {
        let mut task = self.pop()?;
        let ran = task.execute();
        crate::soft_assert!(task.state() == TaskState::Done);
        tracing::debug!(task = %task.id(), ran, "ran next task");
        Ok(task)
    }

    /// Resets a finished task and queues it again.
    pub fn requeue(&mut self, mut task: Box<dyn Runnable>, priority: Priority) -> EntryId {
        task.reset();
        self.push_boxed(task, priority)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl Default for ReadyQueue {
    fn default() -> Self {
        Self::new()
    }
}
