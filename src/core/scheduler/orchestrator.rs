//! Tick-driven orchestrator
//!
//! The orchestrator is advanced by its host once per frame. The first tick
//! starts every active job; each tick after that drains at most one affine
//! queue by one batch; once every job has settled the shutdown hook runs,
//! exactly once. `tick` never blocks: immediate jobs are only ever observed
//! through their completion handles.

use super::affine::AffineTaskQueue;
use super::handle::JobReport;
use super::job::{JobKind, JobOptions, JobRegistry, StartedJob};
use super::join::JoinedHandle;
use super::summary::{JobResult, RunSummary};
use crate::adapters::output::DocumentWriter;
use crate::domain::{Result, WikigenError};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Callback invoked once all jobs are done
pub type ShutdownHook = Box<dyn FnOnce()>;

/// Lifecycle of an orchestrator; transitions only move forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    NotStarted,
    Running,
    ShuttingDown,
    Done,
}

/// Settings shared by every job of a run
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Root of the output tree
    pub output_root: PathBuf,

    /// Writer handed to every job
    pub writer: DocumentWriter,

    /// Completed units between affine progress log lines
    pub progress_interval: usize,
}

/// Top-level coordinator of an export run
pub struct Orchestrator<C> {
    registry: JobRegistry<C>,
    context: Arc<C>,
    options: OrchestratorOptions,
    runtime: tokio::runtime::Handle,
    state: OrchestratorState,
    queues: VecDeque<AffineTaskQueue>,
    joined: JoinedHandle,
    started: Vec<JobKind>,
    shutdown_hook: Option<ShutdownHook>,
    ticks: u64,
    units_total: usize,
    started_at: Option<(DateTime<Utc>, Instant)>,
    summary: Option<RunSummary>,
}

impl<C: Send + Sync + 'static> Orchestrator<C> {
    /// Create an orchestrator over `registry`
    ///
    /// Immediate jobs are spawned onto `runtime`; affine work runs on the
    /// thread that calls [`Orchestrator::tick`].
    pub fn new(
        registry: JobRegistry<C>,
        context: Arc<C>,
        options: OrchestratorOptions,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        Self {
            registry,
            context,
            options,
            runtime,
            state: OrchestratorState::NotStarted,
            queues: VecDeque::new(),
            joined: JoinedHandle::default(),
            started: Vec::new(),
            shutdown_hook: None,
            ticks: 0,
            units_total: 0,
            started_at: None,
            summary: None,
        }
    }

    /// Set the callback that runs once every job has finished
    pub fn with_shutdown_hook(mut self, hook: impl FnOnce() + 'static) -> Self {
        self.shutdown_hook = Some(Box::new(hook));
        self
    }

    /// Advance one scheduling step
    ///
    /// # Errors
    ///
    /// Returns an error if a job's output directory cannot be cleaned or a job
    /// fails to start. Both abort the run; the orchestrator is then `Done`
    /// without running the shutdown hook.
    pub fn tick(&mut self) -> Result<OrchestratorState> {
        if self.state == OrchestratorState::Done {
            return Ok(self.state);
        }
        self.ticks += 1;

        if self.state == OrchestratorState::NotStarted {
            if let Err(e) = self.start() {
                self.state = OrchestratorState::Done;
                return Err(e);
            }
        }

        if let Some(front) = self.queues.front_mut() {
            if front.is_complete() {
                // Advance only; the next queue is drained on a later tick
                if let Some(finished) = self.queues.pop_front() {
                    tracing::debug!(job = %finished.name(), "Affine queue retired");
                }
            } else {
                front.drain_batch();
            }
        }

        if self.state == OrchestratorState::Running && self.joined.is_satisfied() {
            self.shutdown();
        }

        Ok(self.state)
    }

    fn start(&mut self) -> Result<()> {
        self.started_at = Some((Utc::now(), Instant::now()));

        tracing::info!(
            active = self.registry.active_count(),
            inactive = self.registry.inactive_count(),
            output = %self.options.output_root.display(),
            "Starting export run"
        );
        for job in self.registry.inactive() {
            tracing::info!(job = %job.name(), "Job inactive, skipping");
        }

        let mut handles = Vec::with_capacity(self.registry.active_count());
        for job in self.registry.active() {
            let output_path = job.output_subpath(&self.options.output_root);
            clean_output(&output_path)?;

            tracing::info!(
                job = %job.name(),
                kind = %job.kind(),
                output = %output_path.display(),
                "Starting job"
            );

            let options = JobOptions {
                output_path,
                writer: self.options.writer,
                context: Arc::clone(&self.context),
            };
            let started = job
                .start(options, &self.runtime, self.options.progress_interval)
                .map_err(|e| WikigenError::JobStart {
                    job: job.name().to_string(),
                    message: e.to_string(),
                })?;

            match started {
                StartedJob::Immediate(handle) => handles.push(handle),
                StartedJob::Affine(queue, handle) => {
                    self.units_total += queue.total();
                    self.queues.push_back(queue);
                    handles.push(handle);
                }
            }
            self.started.push(job.kind());
        }

        self.joined = JoinedHandle::new(handles);
        self.state = OrchestratorState::Running;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.state = OrchestratorState::ShuttingDown;

        let summary = self.build_summary();
        if let Some(failure) = self.joined.first_failure() {
            tracing::warn!(
                job = %failure.job,
                error = %failure.message,
                failed_jobs = summary.failed_jobs().count(),
                "Run finished with failed jobs"
            );
        }
        tracing::info!(ticks = self.ticks, "All jobs finished, requesting shutdown");
        self.summary = Some(summary);

        if let Some(hook) = self.shutdown_hook.take() {
            hook();
        }
        self.state = OrchestratorState::Done;
    }

    fn build_summary(&mut self) -> RunSummary {
        let mut summary = RunSummary::new();
        if let Some((wall, instant)) = self.started_at {
            summary.started_at = wall;
            summary.duration = instant.elapsed();
        }
        summary.ticks = self.ticks;
        summary.active_jobs = self.registry.active_count();
        summary.inactive_jobs = self.registry.inactive_count();
        summary.units_total = self.units_total;

        for ((job, outcome), kind) in self.joined.outcomes().into_iter().zip(&self.started) {
            let (report, error) = match outcome {
                Some(Ok(report)) => (report, None),
                Some(Err(failure)) => (JobReport::default(), Some(failure.message)),
                None => (JobReport::default(), Some("job did not finish".to_string())),
            };
            if *kind == JobKind::Affine {
                summary.units_completed += report.written + report.failed + report.skipped;
                summary.units_failed += report.failed;
                summary.units_skipped += report.skipped;
            }
            summary.add_job(JobResult {
                job,
                kind: *kind,
                written: report.written,
                failed: report.failed,
                skipped: report.skipped,
                error,
            });
        }
        summary
    }

    /// Current lifecycle state
    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    /// Ticks processed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Started jobs that have not settled yet
    pub fn pending_jobs(&mut self) -> usize {
        self.joined.pending_count()
    }

    /// Name of the affine job currently being drained
    pub fn current_affine_job(&self) -> Option<&str> {
        self.queues.front().map(AffineTaskQueue::name)
    }

    /// Affine queues not yet retired
    pub fn affine_queues(&self) -> usize {
        self.queues.len()
    }

    /// The job registry
    pub fn registry(&self) -> &JobRegistry<C> {
        &self.registry
    }

    /// Summary of the run, available once shutdown has been requested
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }
}

fn clean_output(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    tracing::debug!(path = %path.display(), "Removing previous output");
    std::fs::remove_dir_all(path).map_err(|e| WikigenError::OutputCleanup {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheduler::affine::UnitStatus;
    use crate::core::scheduler::job::AffineBatchJob;
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    struct Units {
        name: &'static str,
        count: usize,
        fail_enumeration: bool,
    }

    impl AffineBatchJob<()> for Units {
        fn name(&self) -> &str {
            self.name
        }

        fn output_subpath(&self, root: &Path) -> PathBuf {
            root.join(self.name)
        }

        fn batch_size(&self) -> usize {
            10
        }

        fn enumerate(&self, _options: &JobOptions<()>, queue: &mut AffineTaskQueue) -> Result<()> {
            if self.fail_enumeration {
                return Err(WikigenError::Catalog("registry unavailable".to_string()));
            }
            for _ in 0..self.count {
                queue.register(Box::new(|| Ok(UnitStatus::Written)));
            }
            Ok(())
        }
    }

    fn orchestrator(
        registry: JobRegistry<()>,
        root: &Path,
        runtime: &tokio::runtime::Runtime,
    ) -> Orchestrator<()> {
        Orchestrator::new(
            registry,
            Arc::new(()),
            OrchestratorOptions {
                output_root: root.to_path_buf(),
                writer: DocumentWriter::default(),
                progress_interval: 100,
            },
            runtime.handle().clone(),
        )
    }

    #[test]
    fn test_zero_jobs_shut_down_on_first_tick() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);

        let mut orchestrator = orchestrator(JobRegistry::new(), dir.path(), &runtime)
            .with_shutdown_hook(move || counter.set(counter.get() + 1));

        assert_eq!(orchestrator.tick().unwrap(), OrchestratorState::Done);
        assert_eq!(fired.get(), 1);

        // Further ticks are no-ops and never re-fire the hook
        assert_eq!(orchestrator.tick().unwrap(), OrchestratorState::Done);
        assert_eq!(fired.get(), 1);
        assert_eq!(orchestrator.ticks(), 1);
    }

    #[test]
    fn test_existing_output_is_removed_before_start() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        let stale = dir.path().join("images/minecraft/old.png");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, b"stale").unwrap();

        let mut registry = JobRegistry::new();
        registry.affine(
            Units {
                name: "images",
                count: 0,
                fail_enumeration: false,
            },
            true,
        );
        let mut orchestrator = orchestrator(registry, dir.path(), &runtime);
        orchestrator.tick().unwrap();

        assert!(!stale.exists());
    }

    #[test]
    fn test_start_failure_is_fatal() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);

        let mut registry = JobRegistry::new();
        registry.affine(
            Units {
                name: "broken",
                count: 3,
                fail_enumeration: true,
            },
            true,
        );
        let mut orchestrator =
            orchestrator(registry, dir.path(), &runtime).with_shutdown_hook(move || flag.set(true));

        let err = orchestrator.tick().unwrap_err();
        assert!(matches!(err, WikigenError::JobStart { .. }));
        assert!(err.is_fatal());
        assert_eq!(orchestrator.state(), OrchestratorState::Done);
        assert!(!fired.get());
    }

    #[test]
    fn test_affine_summary_counts_units() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();

        let mut registry = JobRegistry::new();
        registry.affine(
            Units {
                name: "images",
                count: 15,
                fail_enumeration: false,
            },
            true,
        );
        let mut orchestrator = orchestrator(registry, dir.path(), &runtime);

        // start+10, 5, signal
        assert_eq!(orchestrator.tick().unwrap(), OrchestratorState::Running);
        assert_eq!(orchestrator.tick().unwrap(), OrchestratorState::Running);
        assert_eq!(orchestrator.tick().unwrap(), OrchestratorState::Done);

        let summary = orchestrator.summary().unwrap();
        assert_eq!(summary.units_total, 15);
        assert_eq!(summary.units_completed, 15);
        assert_eq!(summary.units_failed, 0);
        assert_eq!(summary.ticks, 3);
        assert!(summary.is_successful());
    }
}
