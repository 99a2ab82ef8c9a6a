//! Native thread handle.

use super::panic_handler::TaskFailure;
use crate::config::Config;
use crate::error::{Error, Result};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle, ThreadId};

static THREAD_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Hardware concurrency, or 1 when it cannot be determined.
pub fn max_threads() -> usize {
    num_cpus::get().max(1)
}

/// Wraps exactly one native thread for its lifetime.
///
/// Joining or detaching is the holder's decision; the handle is reachable by
/// reference for as long as the `Thread` exists.
pub struct Thread<T> {
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> Thread<T> {
    /// Spawns `f` on a new thread named and sized from the default config.
    pub fn spawn<F>(f: F) -> Result<Self>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self::spawn_with(&Config::default(), f)
    }

    pub fn spawn_with<F>(config: &Config, f: F) -> Result<Self>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let n = THREAD_COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}-{}", config.thread_name_prefix, n);

        let mut builder = thread::Builder::new().name(name.clone());
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let handle = builder
            .spawn(f)
            .map_err(|e| Error::thread_spawn(format!("{}: {}", name, e)))?;

        tracing::debug!(thread = %name, "spawned");
        Ok(Self { handle })
    }
}

impl<T> Thread<T> {
    pub fn handle(&self) -> &JoinHandle<T> {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut JoinHandle<T> {
        &mut self.handle
    }

    pub fn into_handle(self) -> JoinHandle<T> {
        self.handle
    }

    pub fn id(&self) -> ThreadId {
        self.handle.thread().id()
    }

    pub fn name(&self) -> Option<&str> {
        self.handle.thread().name()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wakes the thread if it is parked.
    pub fn unpark(&self) {
        self.handle.thread().unpark();
    }

    /// Waits for the thread and returns what it produced. A panic on the
    /// thread surfaces as [`Error::ThreadPanic`].
    pub fn join(self) -> Result<T> {
        let name = self.name().unwrap_or("<unnamed>").to_string();
        self.handle.join().map_err(|payload| {
            let failure = TaskFailure::from_payload(payload);
            tracing::warn!(thread = %name, %failure, "thread panicked");
            Error::thread_panic(format!("{}: {}", name, failure))
        })
    }

    /// Lets the thread run on unobserved.
    pub fn detach(self) {
        drop(self.handle);
    }
}

impl<T> fmt::Debug for Thread<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thread")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("finished", &self.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_spawn_and_join() {
        let thread = Thread::spawn(|| 6 * 7).unwrap();
        assert_eq!(thread.join().unwrap(), 42);
    }

    #[test]
    fn test_thread_name_prefix() {
        let config = Config::builder()
            .thread_name_prefix("unit")
            .build()
            .unwrap();
        let thread = Thread::spawn_with(&config, || {
            thread::current().name().map(str::to_string)
        })
        .unwrap();

        assert!(thread.name().unwrap().starts_with("unit-"));
        let seen = thread.join().unwrap().unwrap();
        assert!(seen.starts_with("unit-"));
    }

    #[test]
    fn test_handle_accessors() {
        let mut thread = Thread::spawn(|| ()).unwrap();
        let id = thread.id();
        assert_eq!(thread.handle().thread().id(), id);
        assert_eq!(thread.handle_mut().thread().id(), id);
        thread.into_handle().join().unwrap();
    }

    #[test]
    fn test_join_reports_panic() {
        let thread: Thread<()> = Thread::spawn(|| panic!("worker died")).unwrap();
        match thread.join() {
            Err(Error::ThreadPanic(msg)) => assert!(msg.contains("worker died")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_detach_keeps_running() {
        let (tx, rx) = mpsc::channel();
        let thread = Thread::spawn(move || {
            tx.send(1u8).unwrap();
        })
        .unwrap();
        thread.detach();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 1);
    }

    #[test]
    fn test_max_threads_positive() {
        assert!(max_threads() >= 1);
    }
}
