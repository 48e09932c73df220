//! Rendering boundary
//!
//! A [`Renderer`] turns one registry subject into a square RGBA buffer. It is
//! used only from the scheduler thread and may keep non-thread-safe state.
//! [`SpriteRenderer`] is a software implementation that draws item textures
//! flat and block textures as a shaded isometric cube.

use crate::core::imaging::RenderBuffer;
use crate::domain::{BlockEntry, BlockState, ItemEntry, ResourceId, Result, WikigenError};
use image::RgbaImage;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Brightness of the top, left and right cube faces
const FACE_SHADE: [f32; 3] = [1.0, 0.8, 0.6];

/// Something to render
#[derive(Debug, Clone, Copy)]
pub enum RenderSubject<'a> {
    Item(&'a ItemEntry),
    BlockState {
        block: &'a BlockEntry,
        state: &'a BlockState,
    },
}

impl RenderSubject<'_> {
    /// Registry id of the subject
    pub fn id(&self) -> &ResourceId {
        match self {
            RenderSubject::Item(item) => &item.id,
            RenderSubject::BlockState { block, .. } => &block.id,
        }
    }
}

/// Produces pixels for one subject
pub trait Renderer {
    /// Render `subject` into a buffer of side `size`
    ///
    /// Returns `Ok(None)` when the subject has nothing to draw, such as a
    /// missing texture.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering resources exist but cannot be used.
    fn render(&self, subject: &RenderSubject<'_>, size: u32) -> Result<Option<RenderBuffer>>;
}

/// Software renderer backed by PNG textures from an assets directory
///
/// Textures are resolved as `<assets>/<namespace>/textures/<path>.png` and
/// cached for the lifetime of the renderer.
pub struct SpriteRenderer {
    assets_dir: PathBuf,
    textures: RefCell<HashMap<PathBuf, Option<Rc<RgbaImage>>>>,
}

impl SpriteRenderer {
    /// Create a renderer reading textures below `assets_dir`
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            textures: RefCell::new(HashMap::new()),
        }
    }

    /// Path of the texture file for `texture`
    pub fn texture_path(&self, texture: &ResourceId) -> PathBuf {
        self.assets_dir
            .join(texture.namespace())
            .join("textures")
            .join(format!("{}.png", texture.path()))
    }

    /// Number of cached texture lookups
    pub fn cached_textures(&self) -> usize {
        self.textures.borrow().len()
    }

    fn texture(&self, texture: &ResourceId) -> Result<Option<Rc<RgbaImage>>> {
        let path = self.texture_path(texture);
        if let Some(cached) = self.textures.borrow().get(&path) {
            return Ok(cached.clone());
        }

        let loaded = load_texture(&path)?;
        self.textures.borrow_mut().insert(path, loaded.clone());
        Ok(loaded)
    }
}

impl Renderer for SpriteRenderer {
    fn render(&self, subject: &RenderSubject<'_>, size: u32) -> Result<Option<RenderBuffer>> {
        let texture_id = match subject {
            RenderSubject::Item(item) => item
                .texture
                .clone()
                .map_or_else(|| default_texture(&item.id, "item"), Ok)?,
            RenderSubject::BlockState { block, .. } => block
                .texture
                .clone()
                .map_or_else(|| default_texture(&block.id, "block"), Ok)?,
        };

        let Some(texture) = self.texture(&texture_id)? else {
            return Ok(None);
        };

        let buffer = match subject {
            RenderSubject::Item(_) => draw_flat(&texture, size),
            RenderSubject::BlockState { .. } => draw_cube(&texture, size),
        };
        Ok(Some(buffer))
    }
}

fn default_texture(id: &ResourceId, folder: &str) -> Result<ResourceId> {
    ResourceId::new(id.namespace(), format!("{}/{}", folder, id.path()))
        .map_err(WikigenError::Render)
}

fn load_texture(path: &Path) -> Result<Option<Rc<RgbaImage>>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Texture not found");
        return Ok(None);
    }
    let image = image::open(path)
        .map_err(|e| WikigenError::Render(format!("Failed to load {}: {}", path.display(), e)))?
        .to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Ok(None);
    }
    Ok(Some(Rc::new(image)))
}

fn sample(texture: &RgbaImage, u: f32, v: f32) -> [u8; 4] {
    let x = ((u * texture.width() as f32) as u32).min(texture.width() - 1);
    let y = ((v * texture.height() as f32) as u32).min(texture.height() - 1);
    texture.get_pixel(x, y).0
}

fn draw_flat(texture: &RgbaImage, size: u32) -> RenderBuffer {
    let mut buffer = RenderBuffer::new(size);
    let side = size as f32;
    for y in 0..size {
        for x in 0..size {
            let rgba = sample(texture, x as f32 / side, y as f32 / side);
            buffer.set_pixel(x, y, rgba);
        }
    }
    buffer
}

fn shade(rgba: [u8; 4], factor: f32) -> [u8; 4] {
    let scale = |c: u8| (f32::from(c) * factor + 0.5).floor().clamp(0.0, 255.0) as u8;
    [scale(rgba[0]), scale(rgba[1]), scale(rgba[2]), rgba[3]]
}

// Each face is the unit square mapped by an affine transform; invert it per pixel.
fn cube_face(x: f32, y: f32) -> Option<(usize, f32, f32)> {
    let in_unit = |a: f32, b: f32| (0.0..1.0).contains(&a) && (0.0..1.0).contains(&b);

    let a = 2.0 * y + (x - 0.5);
    let b = 2.0 * y - (x - 0.5);
    if in_unit(a, b) {
        return Some((0, a, b));
    }

    let s = 2.0 * x;
    let t = 2.0 * y - 0.5 - x;
    if in_unit(s, t) {
        return Some((1, s, t));
    }

    let s = 2.0 * (x - 0.5);
    let t = 2.0 * y - 1.0 + 0.5 * s;
    if in_unit(s, t) {
        return Some((2, s, t));
    }

    None
}

fn draw_cube(texture: &RgbaImage, size: u32) -> RenderBuffer {
    let mut buffer = RenderBuffer::new(size);
    let side = size as f32;
    for py in 0..size {
        for px in 0..size {
            let x = (px as f32 + 0.5) / side;
            let y = (py as f32 + 0.5) / side;
            if let Some((face, u, v)) = cube_face(x, y) {
                buffer.set_pixel(px, py, shade(sample(texture, u, v), FACE_SHADE[face]));
            }
        }
    }
    buffer
}
