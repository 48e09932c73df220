//! Translation export

use crate::core::scheduler::{ImmediateJob, JobOptions, JobReport};
use crate::domain::{Catalog, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File every translation is merged into
const MERGED_FILE: &str = "en_us.json";

/// Merges all languages into a single `en_us.json`
///
/// Languages are applied in code order, so a key present in several
/// languages takes the value of the last one.
#[derive(Debug, Default)]
pub struct LanguageExporter;

/// Merge every language table into one
pub fn merge_translations(catalog: &Catalog) -> BTreeMap<&str, &str> {
    let mut merged = BTreeMap::new();
    for translations in catalog.languages.values() {
        for (key, text) in translations {
            merged.insert(key.as_str(), text.as_str());
        }
    }
    merged
}

#[async_trait]
impl ImmediateJob<Catalog> for LanguageExporter {
    fn name(&self) -> &str {
        "Language Data"
    }

    fn output_subpath(&self, root: &Path) -> PathBuf {
        root.join("lang")
    }

    async fn export(&self, options: &JobOptions<Catalog>) -> Result<JobReport> {
        let merged = merge_translations(&options.context);
        tracing::debug!(
            languages = options.context.languages.len(),
            keys = merged.len(),
            "Merged translations"
        );

        // A failed write of the single merged file fails the job
        options
            .writer
            .save_json(&options.output_path.join(MERGED_FILE), &merged)
            .await?;
        Ok(JobReport {
            written: 1,
            ..JobReport::default()
        })
    }
}
