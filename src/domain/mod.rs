//! Domain models and types for Wikigen.
//!
//! This module contains the core domain types shared by every layer.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Namespaced identifiers** ([`ResourceId`])
//! - **The registry catalog** ([`Catalog`]) that jobs read from
//! - **Error types** ([`WikigenError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, WikigenError>`]:
//!
//! ```rust,no_run
//! use wikigen::domain::{Catalog, Result};
//!
//! fn example() -> Result<()> {
//!     let catalog = Catalog::load("catalog.json")?;
//!     println!("{} items", catalog.items.len());
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use catalog::{
    BlockEntry, BlockProperty, BlockState, Catalog, ConfigEntry, ConfigSpec, ConfigType,
    ConfigValue, ItemEntry,
};
pub use errors::WikigenError;
pub use ids::ResourceId;
pub use result::Result;
