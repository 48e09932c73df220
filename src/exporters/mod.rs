//! Export jobs
//!
//! Every registry in the [`Catalog`] has an exporter. JSON documents are
//! written by immediate jobs on the async runtime; images are rendered by
//! affine jobs on the scheduler thread.
//!
//! - [`items`], [`blocks`], [`block_states`], [`item_tags`] - Registry documents
//! - [`language`] - Merged translations
//! - [`configuration`] - Mod configuration trees
//! - [`research`] - Research, research trees and research effects
//! - [`citizen_names`] - Citizen name pools
//! - [`recipes`] - Recipe definitions
//! - [`item_images`], [`block_images`] - Rendered icons

pub mod block_images;
pub mod block_states;
pub mod blocks;
pub mod citizen_names;
pub mod configuration;
pub mod item_images;
pub mod item_tags;
pub mod items;
pub mod language;
pub mod recipes;
pub mod research;

pub use block_images::BlockImagesExporter;
pub use block_states::BlockStatesExporter;
pub use blocks::BlocksExporter;
pub use citizen_names::CitizenNamesExporter;
pub use configuration::ConfigurationExporter;
pub use item_images::ItemImagesExporter;
pub use item_tags::ItemTagsExporter;
pub use items::ItemsExporter;
pub use language::LanguageExporter;
pub use recipes::RecipesExporter;
pub use research::{ResearchExporter, ResearchKind};

use crate::adapters::render::Renderer;
use crate::config::{ImagesConfig, WikigenConfig};
use crate::core::imaging::{EmptyImagePolicy, ResampleFilter};
use crate::core::scheduler::{JobRegistry, JobReport};
use crate::domain::{Catalog, Result};
use std::fmt::Display;
use std::rc::Rc;

/// Rendering parameters of one image job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSettings {
    /// Side of the final image
    pub size: u32,

    /// Render size as a multiple of `size`
    pub supersample: u32,

    /// Resampling filter used after cropping
    pub filter: ResampleFilter,

    /// Output for renders without visible pixels
    pub empty_image: EmptyImagePolicy,

    /// Units drained per tick
    pub batch_size: usize,
}

impl ImageSettings {
    /// Item icons: bilinear downsampling of a supersampled render
    pub fn items(config: &ImagesConfig) -> Self {
        Self {
            size: config.item_size,
            supersample: config.item_supersample,
            filter: ResampleFilter::Bilinear,
            empty_image: config.empty_image,
            batch_size: config.batch_size,
        }
    }

    /// Block state images: nearest sampling keeps texel edges sharp
    pub fn blocks(config: &ImagesConfig) -> Self {
        Self {
            size: config.block_size,
            supersample: config.block_supersample,
            filter: ResampleFilter::Nearest,
            empty_image: config.empty_image,
            batch_size: config.batch_size,
        }
    }

    /// Side of the buffer handed to the renderer
    pub fn render_size(&self) -> u32 {
        self.size.saturating_mul(self.supersample.max(1))
    }
}

/// Count one record outcome, logging failures
pub(crate) fn tally(report: &mut JobReport, job: &str, record: &dyn Display, result: Result<()>) {
    match result {
        Ok(()) => report.written += 1,
        Err(e) => {
            report.failed += 1;
            crate::log_record_failure!(job, record, e);
        }
    }
}

/// Build the registry of every export job
///
/// Jobs disabled in `[jobs]` are registered as inactive.
///
/// # Errors
///
/// Returns an error if a job cannot be constructed
pub fn build_registry(
    config: &WikigenConfig,
    renderer: Rc<dyn Renderer>,
) -> Result<JobRegistry<Catalog>> {
    let jobs = &config.jobs;
    let mut registry = JobRegistry::new();

    registry
        .immediate(ItemsExporter, jobs.items)
        .immediate(BlocksExporter, jobs.blocks)
        .immediate(BlockStatesExporter, jobs.block_states)
        .immediate(ItemTagsExporter, jobs.item_tags)
        .immediate(LanguageExporter, jobs.language)
        .immediate(
            ConfigurationExporter::new(jobs.configuration_excluded_mods.iter().cloned())?,
            jobs.configuration,
        )
        .immediate(ResearchExporter::new(ResearchKind::Research), jobs.research)
        .immediate(ResearchExporter::new(ResearchKind::Tree), jobs.research_trees)
        .immediate(ResearchExporter::new(ResearchKind::Effect), jobs.research_effects)
        .immediate(CitizenNamesExporter, jobs.citizen_names)
        .immediate(RecipesExporter, jobs.recipes)
        .affine(
            ItemImagesExporter::new(Rc::clone(&renderer), ImageSettings::items(&config.images)),
            jobs.item_images,
        )
        .affine(
            BlockImagesExporter::new(renderer, ImageSettings::blocks(&config.images)),
            jobs.block_images,
        );

    tracing::debug!(
        active = registry.active_count(),
        inactive = registry.inactive_count(),
        "Job registry built"
    );
    Ok(registry)
}
