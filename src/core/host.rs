//! Frame loop hosting the orchestrator
//!
//! The host owns the scheduler thread: it ticks the orchestrator at a fixed
//! frame interval after a warm-up period and stops once the orchestrator's
//! shutdown hook has fired. Affine work therefore always runs on the thread
//! that calls [`ExportHost::run`].

use crate::adapters::output::DocumentWriter;
use crate::adapters::render::Renderer;
use crate::config::WikigenConfig;
use crate::core::scheduler::{Orchestrator, OrchestratorOptions, OrchestratorState, RunSummary};
use crate::domain::{Catalog, Result, WikigenError};
use crate::exporters::build_registry;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// File name of the run summary in the output root
pub const SUMMARY_FILE: &str = "summary.json";

/// Export host driving one run to completion
pub struct ExportHost {
    orchestrator: Orchestrator<Catalog>,
    warmup_ticks: u64,
    frame_interval: Duration,
    frames: u64,
    shutdown: watch::Receiver<bool>,
    interrupt: Option<watch::Receiver<bool>>,
    summary_path: Option<PathBuf>,
    writer: DocumentWriter,
}

impl ExportHost {
    /// Build the job registry and orchestrator for `catalog`
    ///
    /// Immediate jobs will be spawned onto `runtime`.
    ///
    /// # Errors
    ///
    /// Returns an error if the job registry cannot be built
    pub fn initialize(
        config: &WikigenConfig,
        catalog: Catalog,
        renderer: Rc<dyn Renderer>,
        runtime: tokio::runtime::Handle,
    ) -> Result<Self> {
        let registry = build_registry(config, renderer)?;
        let writer = DocumentWriter::new(config.export.pretty);
        let output_root = PathBuf::from(&config.export.output_dir);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let orchestrator = Orchestrator::new(
            registry,
            Arc::new(catalog),
            OrchestratorOptions {
                output_root: output_root.clone(),
                writer,
                progress_interval: config.images.progress_log_interval,
            },
            runtime,
        )
        .with_shutdown_hook(move || {
            let _ = shutdown_tx.send(true);
        });

        tracing::info!(
            output = %output_root.display(),
            warmup_ticks = config.host.warmup_ticks,
            frame_interval_ms = config.host.frame_interval_ms,
            "Export host initialized"
        );

        Ok(Self {
            orchestrator,
            warmup_ticks: config.host.warmup_ticks,
            frame_interval: Duration::from_millis(config.host.frame_interval_ms),
            frames: 0,
            shutdown: shutdown_rx,
            interrupt: None,
            summary_path: config
                .export
                .write_summary
                .then(|| output_root.join(SUMMARY_FILE)),
            writer,
        })
    }

    /// Stop the run early once `interrupt` carries `true`
    pub fn with_interrupt(mut self, interrupt: watch::Receiver<bool>) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// Advance one frame
    ///
    /// Frames inside the warm-up period do not reach the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns the orchestrator's fatal setup error
    pub fn tick(&mut self) -> Result<OrchestratorState> {
        self.frames += 1;
        if self.frames <= self.warmup_ticks {
            return Ok(self.orchestrator.state());
        }
        self.orchestrator.tick()
    }

    /// Whether the shutdown hook has fired
    pub fn is_shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Frames advanced so far, including warm-up
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The hosted orchestrator
    pub fn orchestrator(&mut self) -> &mut Orchestrator<Catalog> {
        &mut self.orchestrator
    }

    /// Tick until shutdown and return the run summary
    ///
    /// # Errors
    ///
    /// Returns an error if a job fails to start, the output tree cannot be
    /// prepared, or the run is interrupted
    pub fn run(mut self) -> Result<RunSummary> {
        loop {
            if self.interrupt.as_ref().is_some_and(|rx| *rx.borrow()) {
                tracing::warn!(
                    ticks = self.orchestrator.ticks(),
                    pending_jobs = self.orchestrator.pending_jobs(),
                    "Interrupt received, stopping before all jobs finished"
                );
                return Err(WikigenError::Interrupted {
                    ticks: self.orchestrator.ticks(),
                });
            }

            self.tick()?;
            if self.is_shutdown_requested() {
                break;
            }
            if !self.frame_interval.is_zero() {
                std::thread::sleep(self.frame_interval);
            }
        }

        let summary = self
            .orchestrator
            .summary()
            .cloned()
            .ok_or_else(|| WikigenError::Other("Run finished without a summary".to_string()))?;
        summary.log_summary();

        if let Some(path) = &self.summary_path {
            match summary.write_json(&self.writer, path) {
                Ok(()) => tracing::info!(path = %path.display(), "Run summary written"),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to write run summary"),
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::render::RenderSubject;
    use crate::core::imaging::RenderBuffer;
    use tempfile::TempDir;

    struct Blank;

    impl Renderer for Blank {
        fn render(&self, _subject: &RenderSubject<'_>, _size: u32) -> Result<Option<RenderBuffer>> {
            Ok(None)
        }
    }

    fn config(output: &TempDir, warmup_ticks: u64) -> WikigenConfig {
        let mut config = WikigenConfig::default();
        config.export.output_dir = output.path().join("out").to_string_lossy().to_string();
        config.host.warmup_ticks = warmup_ticks;
        config.host.frame_interval_ms = 0;
        config
    }

    #[test]
    fn test_warmup_defers_start() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let output = TempDir::new().unwrap();
        let mut host = ExportHost::initialize(
            &config(&output, 3),
            Catalog::default(),
            Rc::new(Blank),
            runtime.handle().clone(),
        )
        .unwrap();

        for _ in 0..3 {
            assert_eq!(host.tick().unwrap(), OrchestratorState::NotStarted);
        }
        assert_eq!(host.orchestrator().ticks(), 0);
        assert_ne!(host.tick().unwrap(), OrchestratorState::NotStarted);
        assert_eq!(host.frames(), 4);
    }

    #[test]
    fn test_run_empty_catalog_writes_summary() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let output = TempDir::new().unwrap();
        let config = config(&output, 2);
        let host = ExportHost::initialize(
            &config,
            Catalog::default(),
            Rc::new(Blank),
            runtime.handle().clone(),
        )
        .unwrap();

        let summary = host.run().unwrap();
        assert!(summary.is_successful());
        assert_eq!(summary.active_jobs, 12);
        assert!(output.path().join("out").join(SUMMARY_FILE).exists());
    }

    #[test]
    fn test_interrupt_stops_run() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let output = TempDir::new().unwrap();
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let host = ExportHost::initialize(
            &config(&output, 0),
            Catalog::default(),
            Rc::new(Blank),
            runtime.handle().clone(),
        )
        .unwrap()
        .with_interrupt(rx);

        assert!(matches!(
            host.run(),
            Err(WikigenError::Interrupted { ticks: 0 })
        ));
    }
}
