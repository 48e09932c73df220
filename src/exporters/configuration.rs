//! Mod configuration export
//!
//! Each mod gets `<mod>/configuration.json` describing every config type and
//! its values as a tree of `category` and `config` nodes. The second line of a
//! value's comment carries either a numeric range or the allowed enum values;
//! a second line in any other format fails that mod's document.

use crate::core::scheduler::{ImmediateJob, JobOptions, JobReport};
use crate::domain::{Catalog, ConfigEntry, ConfigSpec, ConfigType, ConfigValue, Result, WikigenError};
use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

const RANGE_PATTERN: &str = r"(?s)^.*Range: ([\d\-,.]+) ~ ([\d\-,.]+).*$";
const BOUND_PATTERN: &str = r"(?s)^.*Range: ([<>]) ([\d\-,.]+).*$";
const ENUM_PATTERN: &str = r"^.*Allowed Values: (.*)$";
const DEFAULT_MARKER_PATTERN: &str = r"\[Default: .+?\]";

/// Writes the configuration tree of every mod not excluded
pub struct ConfigurationExporter {
    excluded_mods: HashSet<String>,
    range: Regex,
    bound: Regex,
    allowed: Regex,
    default_marker: Regex,
}

#[derive(Debug, Serialize)]
struct ConfigurationDocument {
    name: String,
    types: Vec<TypeDocument>,
}

#[derive(Debug, Serialize)]
struct TypeDocument {
    #[serde(rename = "type")]
    config_type: String,
    values: Vec<ConfigNode>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ConfigNode {
    Category(Category),
    Config(ConfigLeaf),
}

#[derive(Debug, Serialize)]
struct Category {
    name: String,
    children: Vec<ConfigNode>,
}

#[derive(Debug, Serialize)]
struct ConfigLeaf {
    name: String,
    #[serde(rename = "value-type")]
    value_type: &'static str,
    #[serde(rename = "defaultValue")]
    default_value: Value,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    enum_values: Option<Vec<String>>,
    #[serde(rename = "needsRestart")]
    needs_restart: bool,
}

impl ConfigurationExporter {
    /// Create an exporter that skips the mods in `excluded_mods`
    pub fn new(excluded_mods: impl IntoIterator<Item = String>) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                WikigenError::Configuration(format!("Invalid comment pattern '{pattern}': {e}"))
            })
        };
        Ok(Self {
            excluded_mods: excluded_mods.into_iter().collect(),
            range: compile(RANGE_PATTERN)?,
            bound: compile(BOUND_PATTERN)?,
            allowed: compile(ENUM_PATTERN)?,
            default_marker: compile(DEFAULT_MARKER_PATTERN)?,
        })
    }

    /// Build the document of one mod from all of its specs
    fn document(&self, mod_id: &str, specs: &[&ConfigSpec]) -> Result<ConfigurationDocument> {
        let name = specs
            .iter()
            .find_map(|spec| spec.display_name.clone())
            .unwrap_or_else(|| mod_id.to_string());

        let mut by_type: BTreeMap<ConfigType, Vec<ConfigNode>> = BTreeMap::new();
        for spec in specs {
            let values = by_type.entry(spec.config_type).or_default();
            for entry in &spec.entries {
                self.insert_entry(values, entry)?;
            }
        }

        let types = by_type
            .into_iter()
            .map(|(config_type, values)| TypeDocument {
                config_type: config_type.to_string(),
                values,
            })
            .collect();
        Ok(ConfigurationDocument { name, types })
    }

    fn insert_entry(&self, root: &mut Vec<ConfigNode>, entry: &ConfigEntry) -> Result<()> {
        let Some((name, sections)) = entry.path.split_last() else {
            return Err(WikigenError::Validation(
                "Configuration entry has an empty path".to_string(),
            ));
        };

        let mut children = root;
        for section in sections {
            children = child_category(children, section);
        }

        let (value_type, default_value) = match &entry.default {
            ConfigValue::Boolean(value) => ("boolean", Value::Bool(*value)),
            ConfigValue::Number(value) => ("number", Value::Number(value.clone())),
            ConfigValue::Text(value) if entry.is_enum => ("enum", Value::String(value.clone())),
            ConfigValue::Text(value) => ("string", Value::String(value.clone())),
        };

        let mut leaf = ConfigLeaf {
            name: name.clone(),
            value_type,
            default_value,
            description: entry.translation_key.clone(),
            comment: None,
            min: None,
            max: None,
            enum_values: None,
            needs_restart: entry.needs_restart,
        };

        if let Some(comment) = &entry.comment {
            let cleaned = self.default_marker.replace_all(comment, "");
            let mut lines = cleaned.trim().splitn(2, '\n');
            leaf.comment = lines.next().map(str::to_string);
            if let Some(conditions) = lines.next() {
                self.apply_conditions(&mut leaf, conditions)?;
            }
        }

        children.push(ConfigNode::Config(leaf));
        Ok(())
    }

    fn apply_conditions(&self, leaf: &mut ConfigLeaf, line: &str) -> Result<()> {
        if let Some(captures) = self.range.captures(line) {
            leaf.min = Some(parse_bound(&captures[1])?);
            leaf.max = Some(parse_bound(&captures[2])?);
            return Ok(());
        }

        if let Some(captures) = self.bound.captures(line) {
            let value = parse_bound(&captures[2])?;
            match &captures[1] {
                ">" => leaf.min = Some(value),
                _ => leaf.max = Some(value),
            }
            return Ok(());
        }

        if let Some(captures) = self.allowed.captures(line) {
            leaf.enum_values = Some(
                captures[1]
                    .split(',')
                    .map(|value| value.trim().to_string())
                    .collect(),
            );
            return Ok(());
        }

        Err(WikigenError::Validation(format!(
            "Comment line '{line}' is not any valid format"
        )))
    }
}

fn parse_bound(raw: &str) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|e| WikigenError::Validation(format!("Invalid range bound '{raw}': {e}")))
}

fn child_category<'a>(nodes: &'a mut Vec<ConfigNode>, name: &str) -> &'a mut Vec<ConfigNode> {
    let existing = nodes
        .iter()
        .position(|node| matches!(node, ConfigNode::Category(category) if category.name == name));
    let index = match existing {
        Some(index) => index,
        None => {
            nodes.push(ConfigNode::Category(Category {
                name: name.to_string(),
                children: Vec::new(),
            }));
            nodes.len() - 1
        }
    };

    match &mut nodes[index] {
        ConfigNode::Category(category) => &mut category.children,
        ConfigNode::Config(_) => unreachable!("index always points at a category"),
    }
}

#[async_trait]
impl ImmediateJob<Catalog> for ConfigurationExporter {
    fn name(&self) -> &str {
        "Configuration Data"
    }

    fn output_subpath(&self, root: &Path) -> PathBuf {
        root.join("config")
    }

    async fn export(&self, options: &JobOptions<Catalog>) -> Result<JobReport> {
        let mut mods: BTreeMap<&str, Vec<&ConfigSpec>> = BTreeMap::new();
        for spec in &options.context.configurations {
            if self.excluded_mods.contains(&spec.mod_id) {
                continue;
            }
            mods.entry(spec.mod_id.as_str()).or_default().push(spec);
        }

        let mut report = JobReport::default();
        for (mod_id, specs) in mods {
            let result = match self.document(mod_id, &specs) {
                Ok(document) => {
                    let path = options.output_path.join(mod_id).join("configuration.json");
                    options.writer.save_json(&path, &document).await
                }
                Err(e) => Err(e),
            };
            super::tally(&mut report, self.name(), &mod_id, result);
        }
        Ok(report)
    }
}
