//! Run summary and reporting
//!
//! This module defines the structure that tracks and reports the outcome of
//! one export run.

use super::job::JobKind;
use crate::adapters::output::DocumentWriter;
use crate::domain::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Outcome of one started job
#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    /// Job name
    pub job: String,

    /// Immediate or affine
    pub kind: JobKind,

    /// Records or units written
    pub written: usize,

    /// Records or units that failed and were skipped
    pub failed: usize,

    /// Units that ran cleanly but had nothing to write
    pub skipped: usize,

    /// Failure message if the job as a whole failed
    pub error: Option<String>,
}

impl JobResult {
    /// Whether the job finished without any failure
    pub fn is_clean(&self) -> bool {
        self.error.is_none() && self.failed == 0
    }
}

/// Summary of an export run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// When the first tick started the jobs
    pub started_at: DateTime<Utc>,

    /// Wall time from start to shutdown
    pub duration: Duration,

    /// Orchestrator ticks until shutdown
    pub ticks: u64,

    /// Number of jobs started
    pub active_jobs: usize,

    /// Number of registered jobs that were skipped
    pub inactive_jobs: usize,

    /// Per-job outcomes, in registration order
    pub jobs: Vec<JobResult>,

    /// Affine work units enumerated
    pub units_total: usize,

    /// Affine work units executed, including failed ones
    pub units_completed: usize,

    /// Affine work units that failed
    pub units_failed: usize,

    /// Affine work units that produced no output
    pub units_skipped: usize,
}

impl RunSummary {
    /// Create an empty summary starting now
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            duration: Duration::from_secs(0),
            ticks: 0,
            active_jobs: 0,
            inactive_jobs: 0,
            jobs: Vec::new(),
            units_total: 0,
            units_completed: 0,
            units_failed: 0,
            units_skipped: 0,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add a job outcome
    pub fn add_job(&mut self, result: JobResult) {
        self.jobs.push(result);
    }

    /// Jobs that failed as a whole
    pub fn failed_jobs(&self) -> impl Iterator<Item = &JobResult> {
        self.jobs.iter().filter(|job| job.error.is_some())
    }

    /// Check if the run was successful (no job or record failures)
    pub fn is_successful(&self) -> bool {
        self.jobs.iter().all(JobResult::is_clean)
    }

    /// Total records and units written across all jobs
    pub fn total_written(&self) -> usize {
        self.jobs.iter().map(|job| job.written).sum()
    }

    /// Get the unit success rate as a percentage
    pub fn unit_success_rate(&self) -> f64 {
        if self.units_completed == 0 {
            return 100.0;
        }
        ((self.units_completed - self.units_failed) as f64 / self.units_completed as f64) * 100.0
    }

    /// Write the summary as JSON to `path`
    pub fn write_json(&self, writer: &DocumentWriter, path: &Path) -> Result<()> {
        writer.save_json_blocking(path, self)
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            started_at = %self.started_at.to_rfc3339(),
            active_jobs = self.active_jobs,
            inactive_jobs = self.inactive_jobs,
            ticks = self.ticks,
            written = self.total_written(),
            units_total = self.units_total,
            units_completed = self.units_completed,
            units_failed = self.units_failed,
            units_skipped = self.units_skipped,
            duration_secs = self.duration.as_secs(),
            unit_success_rate = format!("{:.2}%", self.unit_success_rate()),
            "Export run completed"
        );

        for job in &self.jobs {
            match &job.error {
                Some(error) => tracing::warn!(
                    job = %job.job,
                    kind = %job.kind,
                    error = %error,
                    "Job failed"
                ),
                None if job.failed > 0 => tracing::warn!(
                    job = %job.job,
                    kind = %job.kind,
                    written = job.written,
                    failed = job.failed,
                    skipped = job.skipped,
                    "Job finished with skipped records"
                ),
                None => tracing::debug!(
                    job = %job.job,
                    kind = %job.kind,
                    written = job.written,
                    skipped = job.skipped,
                    "Job finished"
                ),
            }
        }
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}
