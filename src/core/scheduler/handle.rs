//! Write-once job completion signals
//!
//! A [`CompletionSignal`] is held by whoever performs a job's work and a
//! [`CompletionHandle`] by the scheduler. The signal is consumed when it is
//! raised, so a job can satisfy its handle at most once. The handle is polled,
//! never awaited, which keeps it usable from the non-blocking tick loop.

use thiserror::Error;
use tokio::sync::oneshot::{self, error::TryRecvError};

/// Failure reported by a job through its completion signal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Job '{job}' failed: {message}")]
pub struct JobFailure {
    /// Name of the failed job
    pub job: String,

    /// Failure description
    pub message: String,
}

/// What a successfully finished job reports back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobReport {
    /// Records or units written
    pub written: usize,

    /// Records or units that failed and were skipped
    pub failed: usize,

    /// Units that ran cleanly but had nothing to write
    pub skipped: usize,
}

/// Settled outcome of a job
pub type JobOutcome = std::result::Result<JobReport, JobFailure>;

/// Sending half of a completion handle
#[derive(Debug)]
pub struct CompletionSignal {
    job: String,
    tx: oneshot::Sender<JobOutcome>,
}

impl CompletionSignal {
    /// Name of the job this signal belongs to
    pub fn job(&self) -> &str {
        &self.job
    }

    /// Mark the job as finished successfully without a record count
    pub fn satisfy(self) {
        self.satisfy_with(JobReport::default());
    }

    /// Mark the job as finished successfully
    pub fn satisfy_with(self, report: JobReport) {
        // The receiver may already be gone when the run was torn down early
        let _ = self.tx.send(Ok(report));
    }

    /// Mark the job as finished with a failure
    pub fn fail(self, message: impl Into<String>) {
        let failure = JobFailure {
            job: self.job,
            message: message.into(),
        };
        let _ = self.tx.send(Err(failure));
    }
}

#[derive(Debug)]
enum HandleState {
    Pending(oneshot::Receiver<JobOutcome>),
    Settled(JobOutcome),
}

/// Pollable, write-once "this job is finished" token
#[derive(Debug)]
pub struct CompletionHandle {
    job: String,
    state: HandleState,
}

impl CompletionHandle {
    /// Create a connected signal/handle pair for `job`
    pub fn channel(job: impl Into<String>) -> (CompletionSignal, CompletionHandle) {
        let job = job.into();
        let (tx, rx) = oneshot::channel();
        let signal = CompletionSignal {
            job: job.clone(),
            tx,
        };
        let handle = CompletionHandle {
            job,
            state: HandleState::Pending(rx),
        };
        (signal, handle)
    }

    /// A handle for `job` that is already settled with `outcome`
    pub fn ready(job: impl Into<String>, outcome: JobOutcome) -> Self {
        Self {
            job: job.into(),
            state: HandleState::Settled(outcome),
        }
    }

    /// Name of the job this handle tracks
    pub fn job(&self) -> &str {
        &self.job
    }

    /// Check for completion without blocking
    ///
    /// Returns the outcome once the job has settled; repeated polls after that
    /// keep returning the same outcome. A signal dropped without being raised
    /// (for example because the task running the job panicked) settles the
    /// handle as failed.
    pub fn poll(&mut self) -> Option<&JobOutcome> {
        if let HandleState::Pending(rx) = &mut self.state {
            let outcome = match rx.try_recv() {
                Ok(outcome) => outcome,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Closed) => Err(JobFailure {
                    job: self.job.clone(),
                    message: "completion signal dropped before the job finished".to_string(),
                }),
            };
            self.state = HandleState::Settled(outcome);
        }

        match &self.state {
            HandleState::Settled(outcome) => Some(outcome),
            HandleState::Pending(_) => None,
        }
    }

    /// Whether the job has settled, successfully or not
    pub fn is_satisfied(&mut self) -> bool {
        self.poll().is_some()
    }
}
