//! Block state export
//!
//! Every block gets its property definitions and the full list of possible
//! states. The `imageid` of a state names the file the block image job writes
//! for it.

use crate::adapters::DocumentWriter;
use crate::core::scheduler::{ImmediateJob, JobOptions, JobReport};
use crate::domain::{BlockEntry, Catalog, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct BlockStatesExporter;

#[derive(Debug, Serialize)]
struct PropertyDocument<'a> {
    property: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    values: &'a [String],
}

#[derive(Debug, Serialize)]
struct StateValue {
    property: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct StateDocument {
    values: Vec<StateValue>,
    imageid: String,
}

#[derive(Debug, Serialize)]
struct BlockStatesDocument<'a> {
    properties: Vec<PropertyDocument<'a>>,
    blockstates: Vec<StateDocument>,
}

fn document(block: &BlockEntry) -> BlockStatesDocument<'_> {
    let properties = block
        .properties
        .iter()
        .map(|property| PropertyDocument {
            property: &property.name,
            kind: &property.kind,
            values: &property.values,
        })
        .collect();

    let blockstates = block
        .possible_states()
        .into_iter()
        .map(|state| StateDocument {
            imageid: state.identifier(),
            values: state
                .values
                .into_iter()
                .map(|(property, value)| StateValue { property, value })
                .collect(),
        })
        .collect();

    BlockStatesDocument {
        properties,
        blockstates,
    }
}

#[async_trait]
impl ImmediateJob<Catalog> for BlockStatesExporter {
    fn name(&self) -> &str {
        "Block States Data"
    }

    fn output_subpath(&self, root: &Path) -> PathBuf {
        root.join("block_states")
    }

    async fn export(&self, options: &JobOptions<Catalog>) -> Result<JobReport> {
        let mut report = JobReport::default();
        for block in &options.context.blocks {
            let path = DocumentWriter::resource_path(&options.output_path, &block.id, "json");
            let result = options.writer.save_json(&path, &document(block)).await;
            super::tally(&mut report, self.name(), &block.id, result);
        }
        Ok(report)
    }
}
