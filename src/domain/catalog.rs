//! Registry catalog
//!
//! The catalog is the in-memory set of registries an export run walks. It is
//! loaded once from a JSON dataset and shared read-only with every job as the
//! opaque execution context.

use super::errors::WikigenError;
use super::ids::ResourceId;
use super::result::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

/// Registry dataset shared by all exporters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Item registry
    #[serde(default)]
    pub items: Vec<ItemEntry>,

    /// Block registry
    #[serde(default)]
    pub blocks: Vec<BlockEntry>,

    /// Item tags, tag id -> member item ids
    #[serde(default)]
    pub item_tags: BTreeMap<ResourceId, Vec<ResourceId>>,

    /// Translations, language code -> key -> text
    #[serde(default)]
    pub languages: BTreeMap<String, BTreeMap<String, String>>,

    /// Mod configuration specs
    #[serde(default)]
    pub configurations: Vec<ConfigSpec>,

    /// Research definitions keyed by their data path
    #[serde(default)]
    pub research: BTreeMap<ResourceId, Value>,

    /// Citizen name lists keyed by their data path
    #[serde(default)]
    pub citizen_names: BTreeMap<ResourceId, Value>,

    /// Recipe definitions keyed by their data path
    #[serde(default)]
    pub recipes: BTreeMap<ResourceId, Value>,
}

impl Catalog {
    /// Load and validate a catalog from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            WikigenError::Catalog(format!(
                "Failed to read catalog file {}: {}",
                path.display(),
                e
            ))
        })?;

        let catalog = Self::from_json_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            items = catalog.items.len(),
            blocks = catalog.blocks.len(),
            item_tags = catalog.item_tags.len(),
            languages = catalog.languages.len(),
            configurations = catalog.configurations.len(),
            research = catalog.research.len(),
            citizen_names = catalog.citizen_names.len(),
            recipes = catalog.recipes.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse and validate a catalog from JSON text
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(contents)
            .map_err(|e| WikigenError::Catalog(format!("Failed to parse catalog: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Validates registry consistency
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate ids or on block defaults that name
    /// unknown properties or values.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(&item.id) {
                return Err(WikigenError::Catalog(format!("Duplicate item id: {}", item.id)));
            }
        }

        let mut seen = HashSet::new();
        for block in &self.blocks {
            if !seen.insert(&block.id) {
                return Err(WikigenError::Catalog(format!(
                    "Duplicate block id: {}",
                    block.id
                )));
            }
            block.validate()?;
        }

        Ok(())
    }

    /// Look up a block by id
    pub fn block(&self, id: &ResourceId) -> Option<&BlockEntry> {
        self.blocks.iter().find(|block| &block.id == id)
    }
}

/// Item registry entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEntry {
    /// Item id
    pub id: ResourceId,

    /// Display name
    pub name: String,

    /// Block placed by this item, if it is a block item
    #[serde(default)]
    pub block: Option<ResourceId>,

    /// Texture used by the software renderer
    #[serde(default)]
    pub texture: Option<ResourceId>,
}

impl ItemEntry {
    /// Whether this item places a block
    pub fn is_block_item(&self) -> bool {
        self.block.is_some()
    }
}

/// Block registry entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockEntry {
    /// Block id
    pub id: ResourceId,

    /// Display name
    pub name: String,

    /// State properties in declaration order
    #[serde(default)]
    pub properties: Vec<BlockProperty>,

    /// Overrides for the default state; unspecified properties use their first value
    #[serde(default)]
    pub default_state: BTreeMap<String, String>,

    /// Texture used by the software renderer
    #[serde(default)]
    pub texture: Option<ResourceId>,
}

impl BlockEntry {
    fn validate(&self) -> Result<()> {
        for property in &self.properties {
            if property.values.is_empty() {
                return Err(WikigenError::Catalog(format!(
                    "Block {} property '{}' has no values",
                    self.id, property.name
                )));
            }
        }

        for (name, value) in &self.default_state {
            let property = self
                .properties
                .iter()
                .find(|p| &p.name == name)
                .ok_or_else(|| {
                    WikigenError::Catalog(format!(
                        "Block {} default state names unknown property '{}'",
                        self.id, name
                    ))
                })?;
            if !property.values.contains(value) {
                return Err(WikigenError::Catalog(format!(
                    "Block {} default state value '{}' is not allowed for '{}'",
                    self.id, value, name
                )));
            }
        }

        Ok(())
    }

    /// Every combination of property values, first property varying slowest
    pub fn possible_states(&self) -> Vec<BlockState> {
        let mut states = vec![BlockState::default()];
        for property in &self.properties {
            let mut next = Vec::with_capacity(states.len() * property.values.len());
            for state in &states {
                for value in &property.values {
                    let mut values = state.values.clone();
                    values.push((property.name.clone(), value.clone()));
                    next.push(BlockState { values });
                }
            }
            states = next;
        }
        states
    }

    /// The default state
    pub fn default_block_state(&self) -> BlockState {
        let values = self
            .properties
            .iter()
            .map(|property| {
                let value = self
                    .default_state
                    .get(&property.name)
                    .cloned()
                    .unwrap_or_else(|| property.values[0].clone());
                (property.name.clone(), value)
            })
            .collect();
        BlockState { values }
    }

    /// Index of the default state within [`BlockEntry::possible_states`]
    pub fn default_state_index(&self) -> usize {
        let default = self.default_block_state();
        self.possible_states()
            .iter()
            .position(|state| *state == default)
            .unwrap_or(0)
    }
}

/// A block state property definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockProperty {
    /// Property name
    pub name: String,

    /// Property type (integer, boolean, enum, or a custom type name)
    #[serde(default = "default_property_kind")]
    pub kind: String,

    /// Allowed values, in order
    pub values: Vec<String>,
}

fn default_property_kind() -> String {
    "enum".to_string()
}

/// One concrete block state: property values in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockState {
    /// (property, value) pairs
    pub values: Vec<(String, String)>,
}

impl BlockState {
    /// Stable identifier for this state, used for image file names
    ///
    /// Properties are sorted by name so the identifier does not depend on
    /// declaration order; a state without properties is `default`.
    pub fn identifier(&self) -> String {
        if self.values.is_empty() {
            return "default".to_string();
        }
        let mut pairs: Vec<_> = self.values.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Configuration file type, mirroring the mod loader's config kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigType {
    Client,
    Common,
    Server,
    Startup,
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigType::Client => "CLIENT",
            ConfigType::Common => "COMMON",
            ConfigType::Server => "SERVER",
            ConfigType::Startup => "STARTUP",
        };
        f.write_str(name)
    }
}

/// One mod configuration file spec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSpec {
    /// Owning mod id
    pub mod_id: String,

    /// Mod display name
    #[serde(default)]
    pub display_name: Option<String>,

    /// Config type
    pub config_type: ConfigType,

    /// Value specs
    #[serde(default)]
    pub entries: Vec<ConfigEntry>,
}

/// One configuration value spec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Category path followed by the value name
    pub path: Vec<String>,

    /// Default value
    pub default: ConfigValue,

    /// Whether a text default is an enum constant
    #[serde(default)]
    pub is_enum: bool,

    /// Translation key of the description
    #[serde(default)]
    pub translation_key: String,

    /// Raw comment; the first line is the summary, the second holds range or enum hints
    #[serde(default)]
    pub comment: Option<String>,

    /// Whether changing the value needs a restart
    #[serde(default)]
    pub needs_restart: bool,
}

/// Default value of a configuration entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Boolean(bool),
    Number(serde_json::Number),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn furnace() -> BlockEntry {
        BlockEntry {
            id: ResourceId::from_str("minecraft:furnace").unwrap(),
            name: "Furnace".to_string(),
            properties: vec![
                BlockProperty {
                    name: "facing".to_string(),
                    kind: "enum".to_string(),
                    values: vec!["north".to_string(), "south".to_string()],
                },
                BlockProperty {
                    name: "lit".to_string(),
                    kind: "boolean".to_string(),
                    values: vec!["true".to_string(), "false".to_string()],
                },
            ],
            default_state: BTreeMap::from([("lit".to_string(), "false".to_string())]),
            texture: None,
        }
    }

    #[test]
    fn test_possible_states_cartesian_product() {
        let states = furnace().possible_states();
        assert_eq!(states.len(), 4);
        assert_eq!(states[0].identifier(), "facing=north,lit=true");
        assert_eq!(states[1].identifier(), "facing=north,lit=false");
        assert_eq!(states[3].identifier(), "facing=south,lit=false");
    }

    #[test]
    fn test_default_state_index() {
        assert_eq!(furnace().default_state_index(), 1);
    }

    #[test]
    fn test_block_without_properties_has_single_default_state() {
        let block = BlockEntry {
            id: ResourceId::from_str("minecraft:stone").unwrap(),
            name: "Stone".to_string(),
            properties: vec![],
            default_state: BTreeMap::new(),
            texture: None,
        };
        let states = block.possible_states();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].identifier(), "default");
        assert_eq!(block.default_state_index(), 0);
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "items": [
                {"id": "minecraft:stick", "name": "Stick", "texture": "minecraft:item/stick"},
                {"id": "minecraft:stone", "name": "Stone", "block": "minecraft:stone"}
            ],
            "blocks": [{"id": "minecraft:stone", "name": "Stone"}],
            "item_tags": {"minecraft:planks": ["minecraft:oak_planks"]},
            "configurations": [{
                "mod_id": "minecolonies",
                "config_type": "server",
                "entries": [{"path": ["gameplay", "maxCitizens"], "default": 25}]
            }]
        }"#;

        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.items.len(), 2);
        assert!(catalog.items[1].is_block_item());
        assert!(catalog
            .block(&ResourceId::from_str("stone").unwrap())
            .is_some());
        assert!(matches!(
            catalog.configurations[0].entries[0].default,
            ConfigValue::Number(_)
        ));
    }

    #[test]
    fn test_catalog_rejects_duplicate_items() {
        let json = r#"{"items": [
            {"id": "minecraft:stick", "name": "Stick"},
            {"id": "minecraft:stick", "name": "Stick again"}
        ]}"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate item id"));
    }

    #[test]
    fn test_catalog_rejects_unknown_default_value() {
        let json = r#"{"blocks": [{
            "id": "minecraft:lamp",
            "name": "Lamp",
            "properties": [{"name": "lit", "kind": "boolean", "values": ["true", "false"]}],
            "default_state": {"lit": "maybe"}
        }]}"#;
        assert!(Catalog::from_json_str(json).is_err());
    }

    #[test]
    fn test_config_type_display() {
        assert_eq!(ConfigType::Server.to_string(), "SERVER");
        assert_eq!(ConfigType::Client.to_string(), "CLIENT");
    }
}
