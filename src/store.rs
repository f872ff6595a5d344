//! Group/key string storage behind the persisted sidebar state.

use log::warn;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    fn get(&self, group: &str, key: &str) -> Option<String>;
    fn set(&mut self, group: &str, key: &str, value: &str) -> Result<(), StoreError>;
    fn unset(&mut self, group: &str, key: &str) -> Result<(), StoreError>;
}

type Groups = BTreeMap<String, BTreeMap<String, String>>;

fn insert_value(groups: &mut Groups, group: &str, key: &str, value: &str) {
    groups
        .entry(group.to_string())
        .or_default()
        .insert(key.to_string(), value.to_string());
}

fn remove_value(groups: &mut Groups, group: &str, key: &str) -> bool {
    let Some(values) = groups.get_mut(group) else {
        return false;
    };
    let removed = values.remove(key).is_some();
    if values.is_empty() {
        groups.remove(group);
    }
    removed
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    groups: Groups,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, group: &str, key: &str) -> Option<String> {
        self.groups.get(group)?.get(key).cloned()
    }

    fn set(&mut self, group: &str, key: &str, value: &str) -> Result<(), StoreError> {
        insert_value(&mut self.groups, group, key, value);
        Ok(())
    }

    fn unset(&mut self, group: &str, key: &str) -> Result<(), StoreError> {
        remove_value(&mut self.groups, group, key);
        Ok(())
    }
}

/// JSON document of `{group: {key: value}}`, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    groups: Groups,
}

impl JsonFileStore {
    pub const FILE_NAME: &'static str = "settings.json";

    /// Store in the platform config directory, or in-memory only when no
    /// home directory can be resolved.
    pub fn open_default() -> Self {
        match crate::config::SidebarConfig::config_dir() {
            Some(dir) => Self::open(dir.join(Self::FILE_NAME)),
            None => {
                warn!("No config directory available; sidebar state will not persist");
                Self {
                    path: PathBuf::new(),
                    groups: Groups::new(),
                }
            }
        }
    }

    /// Opens `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let groups = match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|err| {
                warn!("Failed to parse {}: {err}; starting empty", path.display());
                Groups::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Groups::new(),
            Err(err) => {
                warn!("Failed to read {}: {err}; starting empty", path.display());
                Groups::new()
            }
        };
        Self { path, groups }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.groups)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, group: &str, key: &str) -> Option<String> {
        self.groups.get(group)?.get(key).cloned()
    }

    fn set(&mut self, group: &str, key: &str, value: &str) -> Result<(), StoreError> {
        insert_value(&mut self.groups, group, key, value);
        self.flush()
    }

    fn unset(&mut self, group: &str, key: &str) -> Result<(), StoreError> {
        if remove_value(&mut self.groups, group, key) {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_drops_empty_groups() {
        let mut store = MemoryStore::new();
        store.set("sidebar", "pinnedOrder", "QQ").unwrap();
        assert_eq!(store.get("sidebar", "pinnedOrder").as_deref(), Some("QQ"));
        store.unset("sidebar", "pinnedOrder").unwrap();
        assert_eq!(store.get("sidebar", "pinnedOrder"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join(JsonFileStore::FILE_NAME);

        let mut store = JsonFileStore::open(&path);
        store.set("sidebar", "hiddenButtons", "Yg").unwrap();
        store.set("sidebar", "pinnedOrder", "QQ,Qg").unwrap();
        store.unset("sidebar", "hiddenButtons").unwrap();

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("sidebar", "pinnedOrder").as_deref(), Some("QQ,Qg"));
        assert_eq!(reopened.get("sidebar", "hiddenButtons"), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(JsonFileStore::FILE_NAME);
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("sidebar", "pinnedOrder"), None);
    }
}
