//! Square RGBA render buffers

use crate::domain::{Result, WikigenError};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Square grid of RGBA pixels produced by a renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderBuffer {
    image: RgbaImage,
}

impl RenderBuffer {
    /// A fully transparent buffer of side `size`
    pub fn new(size: u32) -> Self {
        Self {
            image: RgbaImage::new(size, size),
        }
    }

    /// Wrap an existing image, which must be square
    pub fn from_image(image: RgbaImage) -> Result<Self> {
        if image.width() != image.height() {
            return Err(WikigenError::Image(format!(
                "Render buffer must be square, got {}x{}",
                image.width(),
                image.height()
            )));
        }
        Ok(Self { image })
    }

    /// Decode a square PNG
    pub fn from_png(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8();
        Self::from_image(image)
    }

    /// Side length in pixels
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    /// Pixel at `(x, y)` as `[r, g, b, a]`
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Pixel at signed `(x, y)`, or transparent black outside the buffer
    pub fn pixel_or_transparent(&self, x: i64, y: i64) -> [u8; 4] {
        let size = i64::from(self.size());
        if x < 0 || y < 0 || x >= size || y >= size {
            return [0, 0, 0, 0];
        }
        self.pixel(x as u32, y as u32)
    }

    /// Set the pixel at `(x, y)`
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        self.image.put_pixel(x, y, Rgba(rgba));
    }

    /// Borrow the underlying image
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Unwrap into the underlying image
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encode as PNG bytes
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        self.image.write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_transparent() {
        let buffer = RenderBuffer::new(4);
        assert_eq!(buffer.size(), 4);
        assert_eq!(buffer.pixel(3, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn test_rejects_non_square() {
        let err = RenderBuffer::from_image(RgbaImage::new(4, 2)).unwrap_err();
        assert!(err.to_string().contains("square"));
    }

    #[test]
    fn test_out_of_range_reads_transparent() {
        let mut buffer = RenderBuffer::new(2);
        buffer.set_pixel(1, 1, [9, 8, 7, 255]);
        assert_eq!(buffer.pixel_or_transparent(1, 1), [9, 8, 7, 255]);
        assert_eq!(buffer.pixel_or_transparent(-1, 0), [0, 0, 0, 0]);
        assert_eq!(buffer.pixel_or_transparent(2, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_png_encoding_preserves_pixels() {
        let mut buffer = RenderBuffer::new(3);
        buffer.set_pixel(0, 2, [10, 20, 30, 40]);

        let bytes = buffer.encode_png().unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        let decoded = RenderBuffer::from_png(&bytes).unwrap();
        assert_eq!(decoded, buffer);
    }
}
