//! Job descriptors and the job registry
//!
//! A job is either *immediate* (its whole export runs as one task on the async
//! runtime) or *affine* (it enumerates work units that must run on the
//! scheduler thread, which an [`AffineTaskQueue`] drains a batch per tick).
//! Both variants expose a name and an output subpath and produce a
//! [`CompletionHandle`] when started, so the orchestrator treats them alike.

use super::affine::AffineTaskQueue;
use super::handle::{CompletionHandle, JobReport};
use crate::adapters::output::DocumentWriter;
use crate::domain::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

/// Everything a job receives when it is started
pub struct JobOptions<C> {
    /// Resolved output directory of the job
    pub output_path: PathBuf,

    /// Document serialization capability
    pub writer: DocumentWriter,

    /// Opaque execution context
    pub context: Arc<C>,
}

impl<C> Clone for JobOptions<C> {
    fn clone(&self) -> Self {
        Self {
            output_path: self.output_path.clone(),
            writer: self.writer,
            context: Arc::clone(&self.context),
        }
    }
}

impl<C> fmt::Debug for JobOptions<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobOptions")
            .field("output_path", &self.output_path)
            .field("writer", &self.writer)
            .finish_non_exhaustive()
    }
}

/// Job whose export runs entirely on the async runtime
#[async_trait]
pub trait ImmediateJob<C>: Send + Sync {
    /// Human-readable job name
    fn name(&self) -> &str;

    /// Output directory of this job below `root`
    fn output_subpath(&self, root: &Path) -> PathBuf;

    /// Export every record, returning the report of what was written
    ///
    /// # Errors
    ///
    /// Returns an error only when the job as a whole cannot proceed;
    /// per-record failures are logged and counted in the report.
    async fn export(&self, options: &JobOptions<C>) -> Result<JobReport>;
}

/// Job whose work units must run on the scheduler thread
pub trait AffineBatchJob<C> {
    /// Human-readable job name
    fn name(&self) -> &str;

    /// Output directory of this job below `root`
    fn output_subpath(&self, root: &Path) -> PathBuf;

    /// Maximum units drained per tick
    fn batch_size(&self) -> usize;

    /// Register every work unit on `queue`
    ///
    /// Called once, synchronously, when the job starts.
    fn enumerate(&self, options: &JobOptions<C>, queue: &mut AffineTaskQueue) -> Result<()>;
}

/// Kind of a job, as reported in summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Immediate,
    Affine,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Immediate => f.write_str("immediate"),
            JobKind::Affine => f.write_str("affine"),
        }
    }
}

/// A registered job of either kind
pub enum Job<C> {
    Immediate(Arc<dyn ImmediateJob<C>>),
    Affine(Rc<dyn AffineBatchJob<C>>),
}

impl<C> Clone for Job<C> {
    fn clone(&self) -> Self {
        match self {
            Job::Immediate(job) => Job::Immediate(Arc::clone(job)),
            Job::Affine(job) => Job::Affine(Rc::clone(job)),
        }
    }
}

impl<C> fmt::Debug for Job<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}

/// Result of starting a job
pub enum StartedJob {
    /// Running on the async runtime
    Immediate(CompletionHandle),
    /// Enumerated and waiting to be drained on the scheduler thread
    Affine(AffineTaskQueue, CompletionHandle),
}

impl<C> Job<C> {
    /// Job name
    pub fn name(&self) -> &str {
        match self {
            Job::Immediate(job) => job.name(),
            Job::Affine(job) => job.name(),
        }
    }

    /// Job kind
    pub fn kind(&self) -> JobKind {
        match self {
            Job::Immediate(_) => JobKind::Immediate,
            Job::Affine(_) => JobKind::Affine,
        }
    }

    /// Output directory of this job below `root`
    pub fn output_subpath(&self, root: &Path) -> PathBuf {
        match self {
            Job::Immediate(job) => job.output_subpath(root),
            Job::Affine(job) => job.output_subpath(root),
        }
    }
}

impl<C: Send + Sync + 'static> Job<C> {
    /// Start the job
    ///
    /// Immediate jobs are spawned onto `runtime` and return at once. Affine jobs
    /// enumerate their units into a fresh queue before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if an affine job fails to enumerate its units.
    pub fn start(
        &self,
        options: JobOptions<C>,
        runtime: &tokio::runtime::Handle,
        progress_interval: usize,
    ) -> Result<StartedJob> {
        match self {
            Job::Immediate(job) => {
                let (signal, handle) = CompletionHandle::channel(job.name());
                let job = Arc::clone(job);
                runtime.spawn(async move {
                    let started = Instant::now();
                    match job.export(&options).await {
                        Ok(report) => {
                            tracing::info!(
                                job = %job.name(),
                                written = report.written,
                                failed = report.failed,
                                duration_ms = started.elapsed().as_millis() as u64,
                                "Job finished"
                            );
                            signal.satisfy_with(report);
                        }
                        Err(e) => {
                            tracing::error!(job = %job.name(), error = %e, "Job failed");
                            signal.fail(e.to_string());
                        }
                    }
                });
                Ok(StartedJob::Immediate(handle))
            }
            Job::Affine(job) => {
                let (queue, handle) = AffineTaskQueue::new(job.name(), job.batch_size());
                let mut queue = queue.with_progress_interval(progress_interval);
                job.enumerate(&options, &mut queue)?;
                tracing::info!(
                    job = %job.name(),
                    units = queue.total(),
                    batch_size = queue.batch_size(),
                    "Affine job enumerated"
                );
                Ok(StartedJob::Affine(queue, handle))
            }
        }
    }
}

/// Static list of jobs partitioned into active and inactive
pub struct JobRegistry<C> {
    active: Vec<Job<C>>,
    inactive: Vec<Job<C>>,
}

impl<C> Default for JobRegistry<C> {
    fn default() -> Self {
        Self {
            active: Vec::new(),
            inactive: Vec::new(),
        }
    }
}

impl<C: Send + Sync + 'static> JobRegistry<C> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job; inactive jobs are recorded but never started
    pub fn register(&mut self, job: Job<C>, active: bool) -> &mut Self {
        if active {
            self.active.push(job);
        } else {
            self.inactive.push(job);
        }
        self
    }

    /// Register an immediate job
    pub fn immediate(&mut self, job: impl ImmediateJob<C> + 'static, active: bool) -> &mut Self {
        self.register(Job::Immediate(Arc::new(job)), active)
    }

    /// Register an affine job
    pub fn affine(&mut self, job: impl AffineBatchJob<C> + 'static, active: bool) -> &mut Self {
        self.register(Job::Affine(Rc::new(job)), active)
    }

    /// Active jobs in registration order
    pub fn active(&self) -> &[Job<C>] {
        &self.active
    }

    /// Inactive jobs in registration order
    pub fn inactive(&self) -> &[Job<C>] {
        &self.inactive
    }

    /// Number of active jobs
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of inactive jobs
    pub fn inactive_count(&self) -> usize {
        self.inactive.len()
    }
}

impl<C> fmt::Debug for JobRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobRegistry")
            .field("active", &self.active.len())
            .field("inactive", &self.inactive.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheduler::affine::UnitStatus;

    struct Noop(&'static str);

    #[async_trait]
    impl ImmediateJob<()> for Noop {
        fn name(&self) -> &str {
            self.0
        }

        fn output_subpath(&self, root: &Path) -> PathBuf {
            root.join(self.0)
        }

        async fn export(&self, _options: &JobOptions<()>) -> Result<JobReport> {
            Ok(JobReport::default())
        }
    }

    struct Units(usize);

    impl AffineBatchJob<()> for Units {
        fn name(&self) -> &str {
            "units"
        }

        fn output_subpath(&self, root: &Path) -> PathBuf {
            root.join("units")
        }

        fn batch_size(&self) -> usize {
            4
        }

        fn enumerate(&self, _options: &JobOptions<()>, queue: &mut AffineTaskQueue) -> Result<()> {
            for _ in 0..self.0 {
                queue.register(Box::new(|| Ok(UnitStatus::Written)));
            }
            Ok(())
        }
    }

    fn options() -> JobOptions<()> {
        JobOptions {
            output_path: PathBuf::from("/tmp/out"),
            writer: DocumentWriter::default(),
            context: Arc::new(()),
        }
    }

    #[test]
    fn test_registry_partitions_jobs() {
        let mut registry: JobRegistry<()> = JobRegistry::new();
        registry
            .immediate(Noop("a"), true)
            .immediate(Noop("b"), false)
            .affine(Units(3), true);

        assert_eq!(registry.active_count(), 2);
        assert_eq!(registry.inactive_count(), 1);
        assert_eq!(registry.inactive()[0].name(), "b");
        assert_eq!(registry.active()[1].kind(), JobKind::Affine);
        assert_eq!(
            registry.active()[0].output_subpath(Path::new("/out")),
            PathBuf::from("/out/a")
        );
    }

    #[test]
    fn test_affine_start_enumerates_eagerly() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let job: Job<()> = Job::Affine(Rc::new(Units(9)));

        let started = job.start(options(), runtime.handle(), 100).unwrap();
        match started {
            StartedJob::Affine(queue, _) => {
                assert_eq!(queue.total(), 9);
                assert_eq!(queue.batch_size(), 4);
            }
            StartedJob::Immediate(_) => panic!("expected an affine job"),
        }
    }

    #[test]
    fn test_immediate_start_settles_handle() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let job: Job<()> = Job::Immediate(Arc::new(Noop("a")));

        let StartedJob::Immediate(mut handle) = job.start(options(), runtime.handle(), 100).unwrap()
        else {
            panic!("expected an immediate job");
        };

        let deadline = Instant::now() + std::time::Duration::from_secs(5);
        while !handle.is_satisfied() && Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(handle.poll(), Some(&Ok(JobReport::default())));
    }
}
