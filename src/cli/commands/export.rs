//! Export command implementation
//!
//! This module implements the `export` command, which runs every enabled job
//! against the catalog and writes the wiki output tree.

use crate::adapters::render::SpriteRenderer;
use crate::config::{load_config, WikigenConfig};
use crate::core::host::ExportHost;
use crate::core::scheduler::RunSummary;
use crate::domain::{Catalog, WikigenError};
use crate::exporters::build_registry;
use clap::Args;
use std::path::Path;
use std::rc::Rc;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Override the output directory
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the catalog file
    #[arg(long)]
    pub catalog: Option<String>,

    /// Run only these jobs (comma-separated, e.g. items,block_images)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// List the jobs that would run without starting them
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    /// Apply CLI overrides to a loaded configuration
    ///
    /// # Errors
    ///
    /// Returns a message if `--only` names an unknown job or the result is invalid
    pub fn apply_overrides(&self, config: &mut WikigenConfig) -> Result<(), String> {
        if let Some(output) = &self.output {
            tracing::info!(output = %output, "Overriding output directory from CLI");
            config.export.output_dir = output.clone();
        }
        if let Some(catalog) = &self.catalog {
            tracing::info!(catalog = %catalog, "Overriding catalog from CLI");
            config.export.catalog = catalog.clone();
        }
        if !self.only.is_empty() {
            let keys: Vec<String> = self.only.iter().map(|s| s.trim().to_string()).collect();
            tracing::info!(jobs = ?keys, "Restricting jobs from CLI");
            config.jobs.restrict_to(&keys)?;
        }
        config.validate()
    }

    /// Execute the export command
    ///
    /// Runs on the calling thread, which becomes the scheduler thread; immediate
    /// jobs are spawned onto `runtime`.
    pub fn execute(
        &self,
        config_path: &str,
        runtime: &tokio::runtime::Handle,
        interrupt: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if let Err(e) = self.apply_overrides(&mut config) {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let renderer = Rc::new(SpriteRenderer::new(&config.export.assets_dir));

        if self.dry_run {
            let registry = build_registry(&config, renderer)?;
            println!("🔍 DRY RUN MODE - No jobs will be started");
            println!();
            println!("Active jobs ({}):", registry.active_count());
            for job in registry.active() {
                println!(
                    "  - {} [{}] -> {}",
                    job.name(),
                    job.kind(),
                    job.output_subpath(Path::new(&config.export.output_dir))
                        .display()
                );
            }
            println!("Inactive jobs ({}):", registry.inactive_count());
            for job in registry.inactive() {
                println!("  - {}", job.name());
            }
            return Ok(0);
        }

        let catalog = match Catalog::load(&config.export.catalog) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!(error = %e, catalog = %config.export.catalog, "Failed to load catalog");
                eprintln!("Failed to load catalog: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        let host = ExportHost::initialize(&config, catalog, renderer, runtime.clone())?
            .with_interrupt(interrupt);

        println!("🚀 Starting export...");
        println!();

        match host.run() {
            Ok(summary) => {
                print_summary(&summary);
                Ok(0)
            }
            Err(WikigenError::Interrupted { ticks }) => {
                println!();
                println!("⚠️  Export interrupted after {ticks} ticks; output is incomplete.");
                tracing::info!("Export interrupted by user signal");
                Ok(130) // SIGINT exit code (standard Unix convention)
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                Ok(5)
            }
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Export Summary:");
    println!(
        "  Jobs: {} active, {} inactive",
        summary.active_jobs, summary.inactive_jobs
    );
    println!("  Written: {}", summary.total_written());
    println!(
        "  Image Units: {}/{} ({} failed, {} skipped)",
        summary.units_completed, summary.units_total, summary.units_failed, summary.units_skipped
    );
    println!("  Ticks: {}", summary.ticks);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    let failed: Vec<_> = summary.failed_jobs().collect();
    if !failed.is_empty() {
        println!("⚠️  Failed jobs:");
        for job in failed {
            println!("  - {}: {}", job.job, job.error.as_deref().unwrap_or("unknown"));
        }
        println!();
    }

    if summary.is_successful() {
        println!("✅ Export completed successfully!");
    } else {
        println!("⚠️  Export completed with skipped records or failed jobs");
    }
}
