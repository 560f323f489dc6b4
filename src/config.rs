use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::saved::FileStore;

/// Settings read from `config.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Currency code used when `--currency` is not given.
    pub currency: String,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,
    pub store_path: Option<PathBuf>,
    pub datasets: DatasetPaths,
}

/// Replacement dataset files; unset entries use the built-in data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetPaths {
    pub models: Option<PathBuf>,
    pub local_models: Option<PathBuf>,
    pub cost_data: Option<PathBuf>,
    pub hardware: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            currency: "USD".to_string(),
            log_level: "warn".to_string(),
            store_path: None,
            datasets: DatasetPaths::default(),
        }
    }
}

impl Config {
    /// `<config dir>/aicompare/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("aicompare").join("config.toml"))
    }

    /// Load `explicit` if given (it must exist), otherwise the default path
    /// if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn resolved_store_path(&self) -> Result<PathBuf> {
        self.store_path
            .clone()
            .or_else(FileStore::default_path)
            .ok_or_else(|| Error::Config("no data directory; set store_path".to_string()))
    }
}
