//! Block state rendering
//!
//! Each possible state of each block gets its own image, written next to its
//! siblings as `<namespace>/<block>/<state>.png`.

use super::ImageSettings;
use crate::adapters::render::{RenderSubject, Renderer};
use crate::adapters::DocumentWriter;
use crate::core::imaging::postprocess;
use crate::core::scheduler::{AffineBatchJob, AffineTaskQueue, JobOptions, UnitStatus};
use crate::domain::{Catalog, Result, WikigenError};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

/// Renders one PNG per block state
pub struct BlockImagesExporter {
    renderer: Rc<dyn Renderer>,
    settings: ImageSettings,
}

impl BlockImagesExporter {
    pub fn new(renderer: Rc<dyn Renderer>, settings: ImageSettings) -> Self {
        Self { renderer, settings }
    }
}

impl AffineBatchJob<Catalog> for BlockImagesExporter {
    fn name(&self) -> &str {
        "Block Images"
    }

    fn output_subpath(&self, root: &Path) -> PathBuf {
        root.join("block_images")
    }

    fn batch_size(&self) -> usize {
        self.settings.batch_size
    }

    fn enumerate(&self, options: &JobOptions<Catalog>, queue: &mut AffineTaskQueue) -> Result<()> {
        for (index, block) in options.context.blocks.iter().enumerate() {
            for state in block.possible_states() {
                let id = block
                    .id
                    .with_suffix(&format!("/{}", state.identifier()))
                    .map_err(WikigenError::Render)?;

                let catalog = Arc::clone(&options.context);
                let renderer = Rc::clone(&self.renderer);
                let settings = self.settings;
                let writer = options.writer;
                let path = DocumentWriter::resource_path(&options.output_path, &id, "png");

                queue.register(Box::new(move || {
                    let block = &catalog.blocks[index];
                    let subject = RenderSubject::BlockState {
                        block,
                        state: &state,
                    };
                    let Some(buffer) = renderer.render(&subject, settings.render_size())? else {
                        tracing::warn!(block_state = %id, "Nothing rendered for block state");
                        return Ok(UnitStatus::Skipped);
                    };
                    let image =
                        postprocess(&buffer, settings.size, settings.filter, settings.empty_image);
                    writer.save_bytes_blocking(&path, &image.encode_png()?)?;
                    Ok(UnitStatus::Written)
                }));
            }
        }
        Ok(())
    }
}
