//! Task lifecycle and the runnable capability.
//!
//! Every task moves `NotStarted -> Running -> Done` while it executes. The
//! only backward edge is [`Runnable::reset`], and only out of `Done`.

use super::panic_handler::{catch_panic, TaskFailure};
use crate::error::{Error, Result};
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

/// Global task ID counter
static TASK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub fn next() -> Self {
        TaskId(TASK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TaskState {
    NotStarted = 0,
    Running = 1,
    Done = 2,
}

impl TaskState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => TaskState::NotStarted,
            1 => TaskState::Running,
            _ => TaskState::Done,
        }
    }
}

/// Atomic holder for a [`TaskState`] that only permits the legal edges.
///
/// Reads are safe from any thread. Each transition is a single
/// compare-and-swap, so an observer sees either the old or the new state.
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    pub const fn new() -> Self {
        StateCell(AtomicU8::new(TaskState::NotStarted as u8))
    }

    pub fn get(&self) -> TaskState {
        TaskState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// `NotStarted -> Running`. False if the task was not `NotStarted`.
    pub fn begin(&self) -> bool {
        self.transition(TaskState::NotStarted, TaskState::Running)
    }

    /// `Running -> Done`. False if the task was not `Running`.
    pub fn finish(&self) -> bool {
        self.transition(TaskState::Running, TaskState::Done)
    }

    /// `Done -> NotStarted`. A no-op returning false from any other state.
    pub fn reset(&self) -> bool {
        self.transition(TaskState::Done, TaskState::NotStarted)
    }

    fn transition(&self, from: TaskState, to: TaskState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of a task's state, cloneable across threads.
#[derive(Debug, Clone)]
pub struct TaskWatch {
    id: TaskId,
    state: Arc<StateCell>,
}

impl TaskWatch {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn state(&self) -> TaskState {
        self.state.get()
    }

    pub fn is_done(&self) -> bool {
        self.state() == TaskState::Done
    }
}

/// The capability a scheduler needs from a unit of work: it has a state, can
/// be reset, and can be invoked.
pub trait Runnable: Send {
    fn id(&self) -> TaskId;

    fn state(&self) -> TaskState;

    /// Moves `Done` back to `NotStarted`. Does nothing in any other state.
    fn reset(&mut self);

    /// Runs the work if the task is `NotStarted`, leaving it `Done`. Returns
    /// whether the work actually ran.
    fn execute(&mut self) -> bool;

    fn is_done(&self) -> bool {
        self.state() == TaskState::Done
    }
}

impl fmt::Debug for dyn Runnable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runnable")
            .field("id", &self.id())
            .field("state", &self.state())
            .finish()
    }
}

/// A closure paired with its lifecycle state and its last outcome.
///
/// The closure is fixed at construction and survives resets, so the same
/// task can be run again after [`Runnable::reset`]. A panicking body is
/// recorded as a [`TaskFailure`] and the task still reaches `Done`.
pub struct Task<R> {
    id: TaskId,
    state: Arc<StateCell>,
    body: Box<dyn FnMut() -> R + Send>,
    outcome: Option<std::result::Result<R, TaskFailure>>,
}

impl<R> Task<R> {
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut() -> R + Send + 'static,
    {
        Task {
            id: TaskId::next(),
            state: Arc::new(StateCell::new()),
            body: Box::new(f),
            outcome: None,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn state(&self) -> TaskState {
        self.state.get()
    }

    pub fn watch(&self) -> TaskWatch {
        TaskWatch {
            id: self.id,
            state: Arc::clone(&self.state),
        }
    }

    /// Runs the body if the task is `NotStarted`.
    pub fn run(&mut self) -> bool {
        if !self.state.begin() {
            tracing::trace!(task = %self.id, state = ?self.state(), "execute skipped");
            return false;
        }
        tracing::trace!(task = %self.id, "running");

        let outcome = catch_panic(&mut self.body);
        if let Err(failure) = &outcome {
            tracing::warn!(task = %self.id, %failure, "task body panicked");
        }
        self.outcome = Some(outcome);

        let finished = self.state.finish();
        debug_assert!(finished, "task left Running while its body ran");
        tracing::trace!(task = %self.id, "done");
        true
    }

    /// Moves `Done` back to `NotStarted` and drops the previous outcome.
    pub fn reset(&mut self) {
        if self.state.reset() {
            self.outcome = None;
            tracing::trace!(task = %self.id, "reset");
        }
    }

    /// The value returned by the last run, if it ran and did not panic.
    pub fn result(&self) -> Option<&R> {
        self.outcome.as_ref()?.as_ref().ok()
    }

    pub fn result_mut(&mut self) -> Option<&mut R> {
        self.outcome.as_mut()?.as_mut().ok()
    }

    /// Moves the last result out, leaving nothing behind.
    pub fn take_result(&mut self) -> Option<R> {
        match self.outcome.take()? {
            Ok(value) => Some(value),
            Err(failure) => {
                self.outcome = Some(Err(failure));
                None
            }
        }
    }

    pub fn failure(&self) -> Option<&TaskFailure> {
        self.outcome.as_ref()?.as_ref().err()
    }

    pub fn into_result(self) -> Result<R> {
        match self.outcome {
            Some(Ok(value)) => Ok(value),
            Some(Err(failure)) => Err(Error::task_failed(failure.message)),
            None => Err(Error::task_failed(format!("{} has not run", self.id))),
        }
    }
}

impl<R: Send> Runnable for Task<R> {
    fn id(&self) -> TaskId {
        self.id
    }

    fn state(&self) -> TaskState {
        self.state.get()
    }

    fn reset(&mut self) {
        Task::reset(self)
    }

    fn execute(&mut self) -> bool {
        self.run()
    }
}

impl<R> fmt::Debug for Task<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("has_outcome", &self.outcome.is_some())
            .finish()
    }
}
