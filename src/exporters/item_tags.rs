//! Item tag export

use crate::adapters::DocumentWriter;
use crate::core::scheduler::{ImmediateJob, JobOptions, JobReport};
use crate::domain::{Catalog, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Writes each tag as an array of member item ids
#[derive(Debug, Default)]
pub struct ItemTagsExporter;

#[async_trait]
impl ImmediateJob<Catalog> for ItemTagsExporter {
    fn name(&self) -> &str {
        "Item Tags Data"
    }

    fn output_subpath(&self, root: &Path) -> PathBuf {
        root.join("item_tags")
    }

    async fn export(&self, options: &JobOptions<Catalog>) -> Result<JobReport> {
        let mut report = JobReport::default();
        for (tag, members) in &options.context.item_tags {
            let path = DocumentWriter::resource_path(&options.output_path, tag, "json");
            let result = options.writer.save_json(&path, members).await;
            super::tally(&mut report, self.name(), tag, result);
        }
        Ok(report)
    }
}
