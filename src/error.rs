use crate::scheduler::heap::EntryId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("queue is empty")]
    EmptyQueue,

    #[error("no entry with id {0}")]
    UnknownEntry(EntryId),

    #[error("config error: {0}")]
    Config(String),

    #[error("thread spawn failed: {0}")]
    ThreadSpawn(String),

    #[error("thread panicked: {0}")]
    ThreadPanic(String),

    #[error("task failed: {0}")]
    TaskFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn thread_spawn<S: Into<String>>(msg: S) -> Self {
        Error::ThreadSpawn(msg.into())
    }

    pub fn thread_panic<S: Into<String>>(msg: S) -> Self {
        Error::ThreadPanic(msg.into())
    }

    pub fn task_failed<S: Into<String>>(msg: S) -> Self {
        Error::TaskFailed(msg.into())
    }

    /// True for the condition `dequeue` reports on an empty heap.
    pub fn is_empty_queue(&self) -> bool {
        matches!(self, Error::EmptyQueue)
    }
}
