//! Core export machinery for Wikigen.
//!
//! # Modules
//!
//! - [`scheduler`] - Jobs, the affine task queue, completion handles and the orchestrator
//! - [`imaging`] - Render buffers and image post-processing
//! - [`host`] - Frame loop that drives the orchestrator to completion
//!
//! # Example
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use wikigen::adapters::render::SpriteRenderer;
//! use wikigen::config::load_config;
//! use wikigen::core::host::ExportHost;
//! use wikigen::domain::Catalog;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("wikigen.toml")?;
//! let catalog = Catalog::load(&config.export.catalog)?;
//! let runtime = tokio::runtime::Runtime::new()?;
//!
//! let host = ExportHost::initialize(
//!     &config,
//!     catalog,
//!     Rc::new(SpriteRenderer::new(&config.export.assets_dir)),
//!     runtime.handle().clone(),
//! )?;
//! let summary = host.run()?;
//! println!("Written: {}", summary.total_written());
//! # Ok(())
//! # }
//! ```

pub mod host;
pub mod imaging;
pub mod scheduler;
