//! User configuration (`~/.config/recall/config.toml`)
//!
//! ```toml
//! data_dir = "/home/me/notes/recall"
//! default_arousal = "M"
//! color = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flashcards::{Arousal, JsonFileStore, StorageError};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    /// Directory holding state.json
    pub data_dir: Option<PathBuf>,
    /// Arousal recorded when the reviewer does not give one
    pub default_arousal: Arousal,
    /// Use ANSI colors in terminal output
    pub color: bool,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_arousal: Arousal::Low,
            color: true,
        }
    }
}

impl RecallConfig {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join("recall").join("config.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Load from `path`; a missing file gives the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&Self::default_path()?)
    }

    pub fn data_dir(&self) -> Result<PathBuf, StorageError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => JsonFileStore::default_data_dir(),
        }
    }
}
