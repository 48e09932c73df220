//! Thread-affine incremental task queue
//!
//! Work units that must run on the scheduler thread (because they touch the
//! non-thread-safe rendering context) are enumerated up front, then drained a
//! bounded batch per tick. The queue owns the completion signal of its job and
//! raises it on the first drain that finds nothing left to do.
//!
//! Work units are boxed `FnOnce` closures without a `Send` bound, so a queue
//! holding them cannot be moved to another thread.

use super::handle::{CompletionHandle, CompletionSignal, JobReport};
use crate::domain::Result;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};

/// What a unit that ran without error did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    /// Output was written
    Written,

    /// Nothing to write, such as a subject without a texture
    Skipped,
}

/// One unit of scheduler-thread work
pub type WorkUnit = Box<dyn FnOnce() -> Result<UnitStatus>>;

/// Default number of completed units between progress log lines
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// Incremental queue of scheduler-thread work for one job
pub struct AffineTaskQueue {
    name: String,
    pending: VecDeque<WorkUnit>,
    total: usize,
    completed: usize,
    failed: usize,
    skipped: usize,
    batch_size: usize,
    progress_interval: usize,
    signal: Option<CompletionSignal>,
}

impl AffineTaskQueue {
    /// Create an empty queue for job `name` and the handle it will satisfy
    ///
    /// A `batch_size` of zero is raised to one so the queue always makes progress.
    pub fn new(name: impl Into<String>, batch_size: usize) -> (Self, CompletionHandle) {
        let name = name.into();
        let (signal, handle) = CompletionHandle::channel(name.clone());
        let queue = Self {
            name,
            pending: VecDeque::new(),
            total: 0,
            completed: 0,
            failed: 0,
            skipped: 0,
            batch_size: batch_size.max(1),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            signal: Some(signal),
        };
        (queue, handle)
    }

    /// Set how many completed units pass between progress log lines
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Append a unit during enumeration
    pub fn register(&mut self, unit: WorkUnit) {
        self.pending.push_back(unit);
        self.total += 1;
    }

    /// Execute up to `batch_size` pending units in registration order
    ///
    /// When the queue is found empty the completion signal is raised, once.
    /// Calls after that are no-ops.
    pub fn drain_batch(&mut self) {
        if self.pending.is_empty() {
            if let Some(signal) = self.signal.take() {
                tracing::info!(
                    job = %self.name,
                    total = self.total,
                    completed = self.completed,
                    failed = self.failed,
                    skipped = self.skipped,
                    "Affine job finished"
                );
                signal.satisfy_with(JobReport {
                    written: self.completed - self.failed - self.skipped,
                    failed: self.failed,
                    skipped: self.skipped,
                });
            }
            return;
        }

        for _ in 0..self.batch_size {
            let Some(unit) = self.pending.pop_front() else {
                break;
            };
            self.run_unit(unit);
        }
    }

    fn run_unit(&mut self, unit: WorkUnit) {
        match panic::catch_unwind(AssertUnwindSafe(unit)) {
            Ok(Ok(UnitStatus::Written)) => {}
            Ok(Ok(UnitStatus::Skipped)) => self.skipped += 1,
            Ok(Err(e)) => {
                self.failed += 1;
                tracing::error!(job = %self.name, error = %e, "Work unit failed");
            }
            Err(payload) => {
                self.failed += 1;
                tracing::error!(
                    job = %self.name,
                    panic = %panic_message(payload.as_ref()),
                    "Work unit panicked"
                );
            }
        }

        // Failed units still count as processed; nothing is retried
        self.completed += 1;

        if self.progress_interval > 0 && self.completed % self.progress_interval == 0 {
            crate::log_batch_progress!(self.name, self.completed, self.total);
        }
    }

    /// Whether every unit has run and the completion signal was raised
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty() && self.signal.is_none()
    }

    /// Job name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units registered during enumeration
    pub fn total(&self) -> usize {
        self.total
    }

    /// Units executed so far, including failed ones
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Units that returned an error or panicked
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Units that ran but had nothing to write
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Units not yet executed
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Maximum units executed per drain
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl std::fmt::Debug for AffineTaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AffineTaskQueue")
            .field("name", &self.name)
            .field("remaining", &self.pending.len())
            .field("total", &self.total)
            .field("completed", &self.completed)
            .field("failed", &self.failed)
            .field("skipped", &self.skipped)
            .field("batch_size", &self.batch_size)
            .field("signalled", &self.signal.is_none())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
