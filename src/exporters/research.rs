//! Colony research export
//!
//! Research definitions arrive as one JSON object per id. They are split three
//! ways: effects carry an `effect` key, trees carry branch metadata, and
//! everything else is a research node.

use crate::core::scheduler::{ImmediateJob, JobOptions, JobReport};
use crate::domain::{Catalog, Result, WikigenError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

const TREE_KEYS: [&str; 3] = ["branch-name", "base-time", "branch-type"];

/// Category of a research definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResearchKind {
    Research,
    Tree,
    Effect,
}

impl ResearchKind {
    /// Classify one research definition
    pub fn classify(definition: &Map<String, Value>) -> Self {
        if definition.contains_key("effect") {
            ResearchKind::Effect
        } else if TREE_KEYS.iter().any(|key| definition.contains_key(*key)) {
            ResearchKind::Tree
        } else {
            ResearchKind::Research
        }
    }

    fn folder(self) -> &'static str {
        match self {
            ResearchKind::Research => "research",
            ResearchKind::Tree => "research_trees",
            ResearchKind::Effect => "research_effects",
        }
    }
}

impl fmt::Display for ResearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResearchKind::Research => f.write_str("Research"),
            ResearchKind::Tree => f.write_str("Research Trees"),
            ResearchKind::Effect => f.write_str("Research Effects"),
        }
    }
}

/// Writes every research definition of one [`ResearchKind`]
#[derive(Debug)]
pub struct ResearchExporter {
    kind: ResearchKind,
    name: String,
}

impl ResearchExporter {
    pub fn new(kind: ResearchKind) -> Self {
        Self {
            kind,
            name: format!("Research Data - {kind}"),
        }
    }

    pub fn kind(&self) -> ResearchKind {
        self.kind
    }
}

#[async_trait]
impl ImmediateJob<Catalog> for ResearchExporter {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_subpath(&self, root: &Path) -> PathBuf {
        root.join(self.kind.folder())
    }

    async fn export(&self, options: &JobOptions<Catalog>) -> Result<JobReport> {
        let mut report = JobReport::default();
        for (id, definition) in &options.context.research {
            let result = match definition.as_object() {
                Some(object) if ResearchKind::classify(object) != self.kind => continue,
                Some(_) => {
                    // Research ids nest by tree; files are keyed by the last segment only
                    let path = options
                        .output_path
                        .join(id.namespace())
                        .join(format!("{}.json", id.file_name()));
                    options.writer.save_json(&path, definition).await
                }
                None if self.kind == ResearchKind::Research => Err(WikigenError::Validation(
                    "Research definition is not a JSON object".to_string(),
                )),
                None => continue,
            };
            super::tally(&mut report, self.name(), id, result);
        }
        Ok(report)
    }
}
