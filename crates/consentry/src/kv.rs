// kv.rs — KvStore trait and reference backends.
//
// The consent record lives in an external key-value collaborator (on a web
// page this would be the cookie jar). The trait keeps the engine testable
// and lets hosts plug in whatever storage they have; two reference
// implementations ship with the crate: an in-memory map and a JSON file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConsentError;

/// Cookie-style scoping for a stored entry. Backends that have no notion
/// of path or domain ignore it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scope {
    pub path: String,
    pub domain: Option<String>,
}

impl Default for Scope {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: None,
        }
    }
}

/// Trait for the external key-value collaborator.
///
/// Values are JSON; the engine stores the consent record under a single
/// configuration-level name and never touches other entries, except when
/// integrator hooks reach through [`EngineCtx::kv`](crate::EngineCtx::kv)
/// to clean up their own third-party entries.
pub trait KvStore {
    /// Read an entry. `Ok(None)` when absent.
    fn get(&self, name: &str) -> Result<Option<Value>, ConsentError>;

    /// Write an entry, creating or replacing it.
    fn set(&mut self, name: &str, value: Value, scope: &Scope) -> Result<(), ConsentError>;

    /// Delete an entry. A no-op if already absent.
    fn remove(&mut self, name: &str, scope: &Scope) -> Result<(), ConsentError>;
}

/// HashMap-backed store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: HashMap<String, Value>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, name: &str) -> Result<Option<Value>, ConsentError> {
        Ok(self.entries.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: Value, _scope: &Scope) -> Result<(), ConsentError> {
        self.entries.insert(name.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, name: &str, _scope: &Scope) -> Result<(), ConsentError> {
        self.entries.remove(name);
        Ok(())
    }
}

/// File-backed store: one JSON object per file, entry names as keys.
///
/// The whole map is rewritten on every set/remove. Fine for a handful of
/// entries; this is the demo binary's backend, not a database.
pub struct JsonFileKv {
    path: PathBuf,
}

impl JsonFileKv {
    /// Create a store backed by the given file. The file (and its parent
    /// directory) is created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_map(&self) -> Result<serde_json::Map<String, Value>, ConsentError> {
        if !self.path.exists() {
            return Ok(serde_json::Map::new());
        }
        let text = fs::read_to_string(&self.path).map_err(|source| ConsentError::IoError {
            path: self.path.display().to_string(),
            source,
        })?;
        let map = serde_json::from_str(&text)?;
        Ok(map)
    }

    fn write_map(&self, map: serde_json::Map<String, Value>) -> Result<(), ConsentError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConsentError::IoError {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(&self.path, json).map_err(|source| ConsentError::IoError {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(())
    }
}

impl KvStore for JsonFileKv {
    fn get(&self, name: &str) -> Result<Option<Value>, ConsentError> {
        Ok(self.read_map()?.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: Value, _scope: &Scope) -> Result<(), ConsentError> {
        let mut map = self.read_map()?;
        map.insert(name.to_string(), value);
        self.write_map(map)
    }

    fn remove(&mut self, name: &str, _scope: &Scope) -> Result<(), ConsentError> {
        let mut map = self.read_map()?;
        if map.remove(name).is_some() {
            self.write_map(map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn memory_kv_set_get_remove() {
        let mut kv = MemoryKv::new();
        let scope = Scope::default();

        assert_eq!(kv.get("consent").unwrap(), None);
        kv.set("consent", json!({"consented": true}), &scope).unwrap();
        assert_eq!(kv.get("consent").unwrap(), Some(json!({"consented": true})));

        kv.remove("consent", &scope).unwrap();
        assert_eq!(kv.get("consent").unwrap(), None);
        // Removing again is a no-op.
        kv.remove("consent", &scope).unwrap();
    }

    #[test]
    fn json_file_kv_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let scope = Scope::default();

        let mut kv = JsonFileKv::new(&path);
        kv.set("consent", json!({"consented": true}), &scope).unwrap();
        kv.set("_visits", json!(3), &scope).unwrap();

        let kv2 = JsonFileKv::new(&path);
        assert_eq!(kv2.get("consent").unwrap(), Some(json!({"consented": true})));
        assert_eq!(kv2.get("_visits").unwrap(), Some(json!(3)));
    }

    #[test]
    fn json_file_kv_remove_keeps_other_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let scope = Scope::default();

        let mut kv = JsonFileKv::new(&path);
        kv.set("a", json!(1), &scope).unwrap();
        kv.set("b", json!(2), &scope).unwrap();
        kv.remove("a", &scope).unwrap();

        assert_eq!(kv.get("a").unwrap(), None);
        assert_eq!(kv.get("b").unwrap(), Some(json!(2)));
    }

    #[test]
    fn json_file_kv_malformed_file_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();

        let kv = JsonFileKv::new(&path);
        assert!(kv.get("consent").is_err());
    }
}
