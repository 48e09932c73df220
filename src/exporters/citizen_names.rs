//! Citizen name pool export

use crate::adapters::DocumentWriter;
use crate::core::scheduler::{ImmediateJob, JobOptions, JobReport};
use crate::domain::{Catalog, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Writes every citizen name pool verbatim
#[derive(Debug, Default)]
pub struct CitizenNamesExporter;

#[async_trait]
impl ImmediateJob<Catalog> for CitizenNamesExporter {
    fn name(&self) -> &str {
        "Citizen Names Data"
    }

    fn output_subpath(&self, root: &Path) -> PathBuf {
        root.join("citizen_names")
    }

    async fn export(&self, options: &JobOptions<Catalog>) -> Result<JobReport> {
        let mut report = JobReport::default();
        for (id, names) in &options.context.citizen_names {
            let path = DocumentWriter::resource_path(&options.output_path, id, "json");
            let result = options.writer.save_json(&path, names).await;
            super::tally(&mut report, self.name(), id, result);
        }
        Ok(report)
    }
}
