//! Named model comparisons remembered between sessions.
//!
//! Storage is a plain key-value port so the comparison logic can run
//! against memory in tests and a JSON file on disk in the CLI. Writes are
//! last-writer-wins; there is no locking or versioning.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Key under which the comparison list is stored.
pub const SAVED_COMPARISONS_KEY: &str = "savedComparisons";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// All keys in one JSON object on disk, rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    /// `<data dir>/aicompare/saved_comparisons.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("aicompare").join("saved_comparisons.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedComparison {
    pub name: String,
    pub models: Vec<String>,
    pub date: DateTime<Utc>,
}

/// Saved comparisons stored as one JSON array under
/// [`SAVED_COMPARISONS_KEY`].
pub struct SavedComparisons<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SavedComparisons<S> {
    pub fn new(store: S) -> Self {
        SavedComparisons { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Unreadable stored data is treated as empty rather than an error.
    pub fn list(&self) -> Result<Vec<SavedComparison>> {
        let Some(raw) = self.store.get(SAVED_COMPARISONS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(list) => Ok(list),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable saved comparisons");
                Ok(Vec::new())
            }
        }
    }

    /// Save under `name`, replacing any comparison with the same name.
    pub fn save(&mut self, name: &str, models: Vec<String>) -> Result<SavedComparison> {
        self.save_at(name, models, Utc::now())
    }

    pub fn save_at(
        &mut self,
        name: &str,
        models: Vec<String>,
        date: DateTime<Utc>,
    ) -> Result<SavedComparison> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Store("comparison name must not be empty".to_string()));
        }

        let entry = SavedComparison {
            name: name.to_string(),
            models,
            date,
        };
        let mut list = self.list()?;
        list.retain(|c| c.name != entry.name);
        list.push(entry.clone());
        self.write(&list)?;
        Ok(entry)
    }

    pub fn get(&self, name: &str) -> Result<Option<SavedComparison>> {
        Ok(self.list()?.into_iter().find(|c| c.name == name))
    }

    /// Returns whether anything was removed.
    pub fn delete(&mut self, name: &str) -> Result<bool> {
        let mut list = self.list()?;
        let before = list.len();
        list.retain(|c| c.name != name);
        if list.len() == before {
            return Ok(false);
        }
        if list.is_empty() {
            self.store.delete(SAVED_COMPARISONS_KEY)?;
        } else {
            self.write(&list)?;
        }
        Ok(true)
    }

    fn write(&mut self, list: &[SavedComparison]) -> Result<()> {
        let raw = serde_json::to_string(list)?;
        self.store.set(SAVED_COMPARISONS_KEY, &raw)
    }
}
