//! Item registry export

use crate::adapters::DocumentWriter;
use crate::core::scheduler::{ImmediateJob, JobOptions, JobReport};
use crate::domain::{Catalog, ItemEntry, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Writes one `{name, block-id}` document per item
#[derive(Debug, Default)]
pub struct ItemsExporter;

#[derive(Debug, Serialize)]
struct ItemDocument<'a> {
    name: &'a str,
    #[serde(rename = "block-id", skip_serializing_if = "Option::is_none")]
    block_id: Option<String>,
}

impl<'a> From<&'a ItemEntry> for ItemDocument<'a> {
    fn from(item: &'a ItemEntry) -> Self {
        Self {
            name: &item.name,
            block_id: item.block.as_ref().map(ToString::to_string),
        }
    }
}

#[async_trait]
impl ImmediateJob<Catalog> for ItemsExporter {
    fn name(&self) -> &str {
        "Items Data"
    }

    fn output_subpath(&self, root: &Path) -> PathBuf {
        root.join("items")
    }

    async fn export(&self, options: &JobOptions<Catalog>) -> Result<JobReport> {
        let mut report = JobReport::default();
        for item in &options.context.items {
            let path = DocumentWriter::resource_path(&options.output_path, &item.id, "json");
            let result = options
                .writer
                .save_json(&path, &ItemDocument::from(item))
                .await;
            super::tally(&mut report, self.name(), &item.id, result);
        }
        Ok(report)
    }
}
