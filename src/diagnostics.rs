//! Soft assertions: report a violated invariant without changing control
//! flow.
//!
//! Failures are logged through `tracing` at error level with the source
//! location and expression text, and counted process-wide.

use std::sync::atomic::{AtomicUsize, Ordering};

static FAILURES: AtomicUsize = AtomicUsize::new(0);

/// Reports `expr` at `file:line` if `condition` is false. Returns `condition`.
pub fn check(condition: bool, line: u32, file: &str, expr: &str) -> bool {
    if !condition {
        let total = FAILURES.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::error!(file, line, expr, total, "assertion failed");
    }
    condition
}

/// Number of failed checks reported so far in this process.
pub fn failure_count() -> usize {
    FAILURES.load(Ordering::Relaxed)
}

/// Evaluates a condition and reports it through [`check`] if it is false.
/// Evaluates to the condition's value.
#[macro_export]
macro_rules! soft_assert {
    ($cond:expr $(,)?) => {
        $crate::diagnostics::check($cond, line!(), file!(), stringify!($cond))
    };
}
