//! Block registry export

use crate::adapters::DocumentWriter;
use crate::core::scheduler::{ImmediateJob, JobOptions, JobReport};
use crate::domain::{Catalog, Result};
use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Writes one `{name, defaultstate}` document per block
#[derive(Debug, Default)]
pub struct BlocksExporter;

#[async_trait]
impl ImmediateJob<Catalog> for BlocksExporter {
    fn name(&self) -> &str {
        "Blocks Data"
    }

    fn output_subpath(&self, root: &Path) -> PathBuf {
        root.join("blocks")
    }

    async fn export(&self, options: &JobOptions<Catalog>) -> Result<JobReport> {
        let mut report = JobReport::default();
        for block in &options.context.blocks {
            let document = json!({
                "name": block.name,
                "defaultstate": block.default_state_index(),
            });
            let path = DocumentWriter::resource_path(&options.output_path, &block.id, "json");
            let result = options.writer.save_json(&path, &document).await;
            super::tally(&mut report, self.name(), &block.id, result);
        }
        Ok(report)
    }
}
