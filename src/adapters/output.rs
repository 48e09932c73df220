//! Document and artifact output
//!
//! Exporters write one file per registry entry under
//! `<root>/<namespace>/<path>.<ext>`. The [`DocumentWriter`] owns the
//! serialization settings and creates parent directories as needed. Immediate
//! jobs use the async methods; scheduler-thread work units use the blocking
//! ones so they never have to enter the runtime.

use crate::domain::{ResourceId, Result, WikigenError};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// JSON/bytes writer shared by all jobs
#[derive(Debug, Clone, Copy)]
pub struct DocumentWriter {
    pretty: bool,
}

impl Default for DocumentWriter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl DocumentWriter {
    /// Create a writer; `pretty` selects indented JSON
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Whether JSON output is indented
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Resolve the output file for `id` below `root`
    pub fn resource_path(root: &Path, id: &ResourceId, extension: &str) -> PathBuf {
        root.join(id.namespace())
            .join(format!("{}.{}", id.path(), extension))
    }

    /// Serialize `value` to JSON bytes
    pub fn to_json_bytes<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let mut bytes = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Write `value` as JSON to `path`
    pub async fn save_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let bytes = self.to_json_bytes(value)?;
        self.save_bytes(path, &bytes).await
    }

    /// Write raw bytes to `path`
    pub async fn save_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_error(parent, e))?;
        }
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| write_error(path, e))?;

        tracing::trace!(path = %path.display(), bytes = bytes.len(), "Wrote file");
        Ok(())
    }

    /// Blocking variant of [`DocumentWriter::save_json`]
    pub fn save_json_blocking<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let bytes = self.to_json_bytes(value)?;
        self.save_bytes_blocking(path, &bytes)
    }

    /// Blocking variant of [`DocumentWriter::save_bytes`]
    pub fn save_bytes_blocking(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;
        }
        std::fs::write(path, bytes).map_err(|e| write_error(path, e))?;

        tracing::trace!(path = %path.display(), bytes = bytes.len(), "Wrote file");
        Ok(())
    }
}

fn write_error(path: &Path, err: std::io::Error) -> WikigenError {
    WikigenError::Export(format!("Failed to write {}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;
    use tempfile::TempDir;

    #[test]
    fn test_resource_path() {
        let id = ResourceId::from_str("minecolonies:research/combat/accuracy").unwrap();
        let path = DocumentWriter::resource_path(Path::new("/out/research"), &id, "json");
        assert_eq!(
            path,
            PathBuf::from("/out/research/minecolonies/research/combat/accuracy.json")
        );
    }

    #[test]
    fn test_compact_and_pretty_output() {
        let value = json!({"name": "Stick"});
        let compact = DocumentWriter::new(false).to_json_bytes(&value).unwrap();
        assert_eq!(compact, b"{\"name\":\"Stick\"}\n");

        let pretty = DocumentWriter::new(true).to_json_bytes(&value).unwrap();
        assert!(String::from_utf8(pretty).unwrap().contains("\n  \"name\""));
    }

    #[test]
    fn test_blocking_save_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c.json");

        DocumentWriter::default()
            .save_json_blocking(&path, &json!([1, 2, 3]))
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!([1, 2, 3]));
    }

    #[tokio::test]
    async fn test_async_save_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("minecraft/stone.json");

        DocumentWriter::default()
            .save_json(&path, &json!({"name": "Stone"}))
            .await
            .unwrap();

        assert!(path.exists());
    }
}
