use std::cell::RefCell;
use std::error::Error;
use std::time::{Duration, Instant};

use tracing::{error, info};

/// Nesting-aware duration tracer.
///
/// Every open scope keeps one mark: the elapsed time of its latest
/// checkpoint. A checkpoint reports the time since that mark and moves it to
/// "now", so log lines show per-step durations rather than a running total.
/// Opening a [`Scope`] pushes a fresh mark, and dropping it pops the mark
/// again and hands the time back to the enclosing scope.
///
/// Owned by a single runner and never shared across threads.
#[derive(Debug)]
pub struct Stopwatch {
    started: Instant,
    marks: RefCell<Vec<Duration>>,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Stopwatch {
        Stopwatch {
            started: Instant::now(),
            marks: RefCell::new(vec![Duration::ZERO]),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Number of scopes currently open.
    pub fn depth(&self) -> usize {
        self.marks.borrow().len().saturating_sub(1)
    }

    pub fn checkpoint(&self, message: &str) -> Duration {
        let (lap, depth) = self.lap();
        let indent = indent(depth);
        let elapsed_ms = millis(lap);

        info!(elapsed_ms, "{indent}{message} (executed in {elapsed_ms} ms)");
        lap
    }

    pub fn fail(&self, message: &str, err: &dyn Error) -> Duration {
        let (lap, depth) = self.lap();
        let indent = indent(depth);
        let elapsed_ms = millis(lap);

        error!(
            elapsed_ms,
            error = ?err,
            "{indent}{message} (executed in {elapsed_ms} ms): {err}"
        );
        lap
    }

    /// Opens a nested timing scope that logs `label` when dropped.
    pub fn scope(&self, label: impl Into<String>) -> Scope<'_> {
        self.marks.borrow_mut().push(self.elapsed());

        Scope {
            stopwatch: self,
            label: label.into(),
            entered: Instant::now(),
        }
    }

    // time since the innermost mark, which is moved forward to now
    fn lap(&self) -> (Duration, usize) {
        let now = self.elapsed();
        let mut marks = self.marks.borrow_mut();
        let depth = marks.len().saturating_sub(1);

        let lap = match marks.last_mut() {
            Some(mark) => {
                let lap = now.saturating_sub(*mark);
                *mark = now;
                lap
            }
            None => {
                marks.push(now);
                now
            }
        };

        (lap, depth)
    }

    fn close_scope(&self, label: &str, total: Duration) {
        let now = self.elapsed();
        let (lap, depth) = {
            let mut marks = self.marks.borrow_mut();
            let depth = marks.len().saturating_sub(1);
            // the root mark is never popped
            let mark = if marks.len() > 1 { marks.pop() } else { None };
            if let Some(parent) = marks.last_mut() {
                *parent = now;
            }
            (now.saturating_sub(mark.unwrap_or(Duration::ZERO)), depth)
        };

        let indent = indent(depth);
        let elapsed_ms = millis(lap);
        let total_ms = millis(total);
        info!(total_ms, elapsed_ms, "{indent}{label} (executed in {elapsed_ms} ms)");
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn indent(depth: usize) -> String {
    "\t".repeat(depth)
}

/// Guard returned by [`Stopwatch::scope`].
#[must_use = "the scope closes as soon as the guard is dropped"]
pub struct Scope<'a> {
    stopwatch: &'a Stopwatch,
    label: String,
    entered: Instant,
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.stopwatch.close_scope(&self.label, self.entered.elapsed());
    }
}
