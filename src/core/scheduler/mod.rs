//! Job scheduling
//!
//! - [`handle`] - Write-once, pollable completion handles
//! - [`join`] - Fan-in of handles into one aggregate handle
//! - [`affine`] - Scheduler-thread work queues drained a batch per tick
//! - [`job`] - Immediate and affine job traits and the job registry
//! - [`orchestrator`] - The tick-driven state machine tying them together
//! - [`summary`] - Run summary and reporting

pub mod affine;
pub mod handle;
pub mod job;
pub mod join;
pub mod orchestrator;
pub mod summary;

pub use affine::{AffineTaskQueue, UnitStatus, WorkUnit, DEFAULT_PROGRESS_INTERVAL};
pub use handle::{CompletionHandle, CompletionSignal, JobFailure, JobOutcome, JobReport};
pub use job::{AffineBatchJob, ImmediateJob, Job, JobKind, JobOptions, JobRegistry, StartedJob};
pub use join::JoinedHandle;
pub use orchestrator::{Orchestrator, OrchestratorOptions, OrchestratorState, ShutdownHook};
pub use summary::{JobResult, RunSummary};
