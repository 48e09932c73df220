//! Image post-processing for rendered artifacts
//!
//! - [`buffer`] - Square RGBA render buffers and PNG encoding
//! - [`postprocess`] - Content crop and bilinear/nearest resampling

pub mod buffer;
pub mod postprocess;

pub use buffer::RenderBuffer;
pub use postprocess::{
    content_bounds, postprocess, ContentBounds, CropWindow, EmptyImagePolicy, ResampleFilter,
};
