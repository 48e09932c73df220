// Wikigen - Registry export for wiki generation
// Copyright (c) 2025 Wikigen Contributors
// Licensed under the MIT License

//! # Wikigen - registry export for wiki generation
//!
//! Wikigen walks a catalog of game registries (items, blocks, tags,
//! translations, mod configuration, research, citizen names) and writes one
//! wiki-ready document per entry, plus rendered item icons and block state
//! images.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Scheduler, image post-processing and the host loop
//! - [`exporters`] - One job per registry
//! - [`adapters`] - Document output and rendering
//! - [`domain`] - Catalog model, identifiers and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Scheduling
//!
//! A run is driven by ticks. The first tick starts every active job: document
//! jobs are spawned onto the tokio runtime, image jobs enumerate their work
//! units into a thread-affine queue. Each later tick drains one batch from
//! the front queue on the ticking thread. Once every job has reported
//! completion the orchestrator fires its shutdown hook.
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use wikigen::adapters::render::SpriteRenderer;
//! use wikigen::config::WikigenConfig;
//! use wikigen::core::host::ExportHost;
//! use wikigen::domain::Catalog;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WikigenConfig::default();
//! let runtime = tokio::runtime::Runtime::new()?;
//! let host = ExportHost::initialize(
//!     &config,
//!     Catalog::load("catalog.json")?,
//!     Rc::new(SpriteRenderer::new("assets")),
//!     runtime.handle().clone(),
//! )?;
//!
//! let summary = host.run()?;
//! println!("Wrote {} documents and images", summary.total_written());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! [`domain::WikigenError`] carries setup failures, which abort the run.
//! Failures of a single record or work unit are logged and counted instead.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod exporters;
pub mod logging;
