//! Content-bounding-box crop and resample
//!
//! Renderers draw into an oversized square buffer. Post-processing finds the
//! bounding box of every pixel with non-zero alpha, takes a square crop sized
//! to the larger side of that box and centred on it, and resamples the crop to
//! the target size. Output is bit-reproducible: all sampling arithmetic is
//! done in `f32` in a fixed order and rounded half-up.

use super::buffer::RenderBuffer;
use serde::{Deserialize, Serialize};

/// Sampling filter used when resampling the crop window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    /// Blend the four neighbouring source pixels
    Bilinear,
    /// Take the source pixel the destination maps into
    Nearest,
}

/// What to return for a buffer without any visible pixel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyImagePolicy {
    /// Return the unmodified render buffer at its full size
    #[default]
    Passthrough,
    /// Return a fully transparent buffer of the target size
    Transparent,
}

/// Inclusive bounding box of the visible pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl ContentBounds {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Square crop window centred on the content
    ///
    /// The origin is clamped to the top-left corner only, so the window may
    /// run past the right or bottom edge of the buffer.
    pub fn crop_window(&self) -> CropWindow {
        let size = self.width().max(self.height());
        let center_x = (self.min_x + self.max_x) / 2;
        let center_y = (self.min_y + self.max_y) / 2;
        CropWindow {
            min_x: center_x.saturating_sub(size / 2),
            min_y: center_y.saturating_sub(size / 2),
            size,
        }
    }
}

/// Square source region that is resampled to the output size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub min_x: u32,
    pub min_y: u32,
    pub size: u32,
}

/// Bounding box of pixels with alpha > 0, or `None` for an empty buffer
pub fn content_bounds(buffer: &RenderBuffer) -> Option<ContentBounds> {
    let mut bounds: Option<ContentBounds> = None;
    for (x, y, pixel) in buffer.as_image().enumerate_pixels() {
        if pixel.0[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => ContentBounds {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            },
            Some(b) => ContentBounds {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        });
    }
    bounds
}

/// Crop `buffer` to its content and resample it to `target_size`
pub fn postprocess(
    buffer: &RenderBuffer,
    target_size: u32,
    filter: ResampleFilter,
    empty_policy: EmptyImagePolicy,
) -> RenderBuffer {
    let Some(bounds) = content_bounds(buffer) else {
        tracing::debug!(size = buffer.size(), "Render buffer has no visible pixels");
        return match empty_policy {
            EmptyImagePolicy::Passthrough => buffer.clone(),
            EmptyImagePolicy::Transparent => RenderBuffer::new(target_size),
        };
    };

    let window = bounds.crop_window();
    let scale = target_size as f32 / window.size as f32;

    let mut output = RenderBuffer::new(target_size);
    for y in 0..target_size {
        for x in 0..target_size {
            let rgba = match filter {
                ResampleFilter::Bilinear => {
                    let src_x = window.min_x as f32 + x as f32 / scale;
                    let src_y = window.min_y as f32 + y as f32 / scale;
                    sample_bilinear(buffer, src_x, src_y)
                }
                ResampleFilter::Nearest => {
                    let src_x = i64::from(window.min_x) + (x as f32 / scale) as i64;
                    let src_y = i64::from(window.min_y) + (y as f32 / scale) as i64;
                    buffer.pixel_or_transparent(src_x, src_y)
                }
            };
            output.set_pixel(x, y, rgba);
        }
    }
    output
}

fn sample_bilinear(buffer: &RenderBuffer, x: f32, y: f32) -> [u8; 4] {
    let x0 = x.floor();
    let y0 = y.floor();
    let x_frac = x - x0;
    let y_frac = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = buffer.pixel_or_transparent(x0, y0);
    let p10 = buffer.pixel_or_transparent(x0 + 1, y0);
    let p01 = buffer.pixel_or_transparent(x0, y0 + 1);
    let p11 = buffer.pixel_or_transparent(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for (channel, value) in out.iter_mut().enumerate() {
        let c00 = f32::from(p00[channel]);
        let c10 = f32::from(p10[channel]);
        let c01 = f32::from(p01[channel]);
        let c11 = f32::from(p11[channel]);

        let top = c00 + x_frac * (c10 - c00);
        let bottom = c01 + x_frac * (c11 - c01);
        let blended = top + y_frac * (bottom - top);

        *value = (blended + 0.5).floor().clamp(0.0, 255.0) as u8;
    }
    out
}
