//! Recipe export

use crate::core::scheduler::{ImmediateJob, JobOptions, JobReport};
use crate::domain::{Catalog, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Copies every recipe definition verbatim
///
/// Recipe ids nest by category folder; only the last path segment names the
/// file, so `minecraft:crafting/stick` lands at `minecraft/stick.json`.
#[derive(Debug, Default)]
pub struct RecipesExporter;

#[async_trait]
impl ImmediateJob<Catalog> for RecipesExporter {
    fn name(&self) -> &str {
        "Recipes Data"
    }

    fn output_subpath(&self, root: &Path) -> PathBuf {
        root.join("recipes")
    }

    async fn export(&self, options: &JobOptions<Catalog>) -> Result<JobReport> {
        let mut report = JobReport::default();
        for (id, recipe) in &options.context.recipes {
            let path = options
                .output_path
                .join(id.namespace())
                .join(format!("{}.json", id.file_name()));
            let result = options.writer.save_json(&path, recipe).await;
            super::tally(&mut report, self.name(), id, result);
        }
        tracing::debug!(written = report.written, "Recipes exported");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::DocumentWriter;
    use crate::domain::ResourceId;
    use serde_json::json;
    use std::str::FromStr;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn options(output: &Path, catalog: Catalog) -> JobOptions<Catalog> {
        JobOptions {
            output_path: output.to_path_buf(),
            writer: DocumentWriter::new(true),
            context: Arc::new(catalog),
        }
    }

    #[tokio::test]
    async fn test_recipes_written_by_last_segment() {
        let out = TempDir::new().unwrap();
        let mut catalog = Catalog::default();
        let stick = json!({"type": "minecraft:crafting_shaped", "result": {"item": "minecraft:stick"}});
        catalog.recipes.insert(
            ResourceId::from_str("minecraft:crafting/stick").unwrap(),
            stick.clone(),
        );
        catalog.recipes.insert(
            ResourceId::from_str("minecolonies:sawmill/plank").unwrap(),
            json!({"type": "minecolonies:crafter"}),
        );

        let report = RecipesExporter
            .export(&options(out.path(), catalog))
            .await
            .unwrap();

        assert_eq!(report.written, 2);
        assert_eq!(report.failed, 0);
        let written: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(out.path().join("minecraft/stick.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(written, stick);
        assert!(out.path().join("minecolonies/plank.json").exists());
    }
}
