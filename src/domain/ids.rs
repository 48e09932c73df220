//! Domain identifier types with validation
//!
//! Registry entries are addressed by a namespaced resource identifier of the
//! form `namespace:path`. Exporters use the namespace as the first output
//! directory and the path as the file stem.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Namespace used when an identifier is written without one
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Namespaced registry identifier newtype
///
/// # Examples
///
/// ```
/// use wikigen::domain::ids::ResourceId;
/// use std::str::FromStr;
///
/// let id = ResourceId::from_str("minecolonies:blockhutbuilder").unwrap();
/// assert_eq!(id.namespace(), "minecolonies");
/// assert_eq!(id.path(), "blockhutbuilder");
///
/// let vanilla = ResourceId::from_str("stone").unwrap();
/// assert_eq!(vanilla.to_string(), "minecraft:stone");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
    namespace: String,
    path: String,
}

impl ResourceId {
    /// Creates a new ResourceId from its parts
    ///
    /// # Returns
    ///
    /// Returns `Err` if either part is empty or contains characters that are
    /// not allowed in an output path
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Result<Self, String> {
        let namespace = namespace.into();
        let path = path.into();

        if namespace.trim().is_empty() {
            return Err("Resource namespace cannot be empty".to_string());
        }
        if path.trim().is_empty() {
            return Err("Resource path cannot be empty".to_string());
        }
        if !namespace
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "_-.".contains(c))
        {
            return Err(format!("Invalid resource namespace: {namespace}"));
        }
        if path.split('/').any(|segment| segment.is_empty() || segment == "..") {
            return Err(format!("Invalid resource path: {path}"));
        }

        Ok(Self { namespace, path })
    }

    /// Returns the namespace part
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the path part
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the last `/`-separated segment of the path
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Returns a new identifier in the same namespace with `suffix` appended to the path
    pub fn with_suffix(&self, suffix: &str) -> Result<Self, String> {
        Self::new(self.namespace.clone(), format!("{}{}", self.path, suffix))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ResourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, s),
        }
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ResourceId::from_str(&raw).map_err(serde::de::Error::custom)
    }
}
