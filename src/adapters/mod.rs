//! External collaborators of the export pipeline.
//!
//! - [`output`] - Document and artifact writer for the output tree
//! - [`render`] - Rendering boundary and the software sprite renderer
//!
//! # Design Pattern
//!
//! Adapters isolate side effects behind small types so jobs can be tested
//! against temporary directories and stub renderers:
//!
//! ```rust,no_run
//! use wikigen::adapters::output::DocumentWriter;
//! use wikigen::adapters::render::{RenderSubject, Renderer, SpriteRenderer};
//! use wikigen::domain::Catalog;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::load("catalog.json")?;
//! let renderer = SpriteRenderer::new("assets");
//! if let Some(buffer) = renderer.render(&RenderSubject::Item(&catalog.items[0]), 1200)? {
//!     DocumentWriter::default()
//!         .save_bytes_blocking(std::path::Path::new("stick.png"), &buffer.encode_png()?)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod output;
pub mod render;

pub use output::DocumentWriter;
pub use render::{RenderSubject, Renderer, SpriteRenderer};
