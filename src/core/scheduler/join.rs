//! Fan-in of completion handles

use super::handle::{CompletionHandle, JobFailure, JobOutcome};

/// Aggregate handle over every started job
///
/// The join is re-evaluated on each poll: it is satisfied once every inner
/// handle has settled. A failed job counts as settled, and the first failure
/// in registration order is reported alongside completion so a crashed job can
/// never leave the run pending forever.
#[derive(Debug, Default)]
pub struct JoinedHandle {
    handles: Vec<CompletionHandle>,
}

impl JoinedHandle {
    /// Join `handles`; an empty join is satisfied immediately
    pub fn new(handles: Vec<CompletionHandle>) -> Self {
        Self { handles }
    }

    /// Number of joined handles
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no handles were joined
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Number of handles that have not settled yet
    pub fn pending_count(&mut self) -> usize {
        self.handles
            .iter_mut()
            .map(|handle| handle.is_satisfied())
            .filter(|satisfied| !satisfied)
            .count()
    }

    /// Whether every joined handle has settled
    pub fn is_satisfied(&mut self) -> bool {
        // Poll every handle rather than short-circuiting so each one caches its outcome
        self.pending_count() == 0
    }

    /// Every failure reported so far, in registration order
    pub fn failures(&mut self) -> Vec<JobFailure> {
        self.handles
            .iter_mut()
            .filter_map(|handle| match handle.poll() {
                Some(Err(failure)) => Some(failure.clone()),
                _ => None,
            })
            .collect()
    }

    /// Current outcome of every joined job, in registration order
    pub fn outcomes(&mut self) -> Vec<(String, Option<JobOutcome>)> {
        self.handles
            .iter_mut()
            .map(|handle| (handle.job().to_string(), handle.poll().cloned()))
            .collect()
    }

    /// The first failure in registration order, if any job failed
    pub fn first_failure(&mut self) -> Option<JobFailure> {
        self.failures().into_iter().next()
    }
}
