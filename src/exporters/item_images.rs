//! Item icon rendering
//!
//! Every non-block item is rendered on the scheduler thread at a supersampled
//! size, cropped to its content and resampled down to the icon size.

use super::ImageSettings;
use crate::adapters::render::{RenderSubject, Renderer};
use crate::adapters::DocumentWriter;
use crate::core::imaging::postprocess;
use crate::core::scheduler::{AffineBatchJob, AffineTaskQueue, JobOptions, UnitStatus};
use crate::domain::{Catalog, Result};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

/// Renders one PNG per non-block item
pub struct ItemImagesExporter {
    renderer: Rc<dyn Renderer>,
    settings: ImageSettings,
}

impl ItemImagesExporter {
    pub fn new(renderer: Rc<dyn Renderer>, settings: ImageSettings) -> Self {
        Self { renderer, settings }
    }
}

impl AffineBatchJob<Catalog> for ItemImagesExporter {
    fn name(&self) -> &str {
        "Item Images"
    }

    fn output_subpath(&self, root: &Path) -> PathBuf {
        root.join("item_images")
    }

    fn batch_size(&self) -> usize {
        self.settings.batch_size
    }

    fn enumerate(&self, options: &JobOptions<Catalog>, queue: &mut AffineTaskQueue) -> Result<()> {
        for (index, item) in options.context.items.iter().enumerate() {
            if item.is_block_item() {
                continue;
            }

            let catalog = Arc::clone(&options.context);
            let renderer = Rc::clone(&self.renderer);
            let settings = self.settings;
            let writer = options.writer;
            let path = DocumentWriter::resource_path(&options.output_path, &item.id, "png");

            queue.register(Box::new(move || {
                let item = &catalog.items[index];
                let subject = RenderSubject::Item(item);
                let Some(buffer) = renderer.render(&subject, settings.render_size())? else {
                    tracing::warn!(item = %item.id, "Nothing rendered for item");
                    return Ok(UnitStatus::Skipped);
                };
                let icon = postprocess(&buffer, settings.size, settings.filter, settings.empty_image);
                writer.save_bytes_blocking(&path, &icon.encode_png()?)?;
                Ok(UnitStatus::Written)
            }));
        }
        Ok(())
    }
}
