//! Persistence for the recall state
//!
//! Everything lives in a single document:
//! ```text
//! {data_dir}/
//! └── state.json   # cards, reviews and settings
//! ```
//!
//! A `state.json` that cannot be read is renamed to
//! `state.json.corrupt-<timestamp>` before starting from the default state.
//!
//! Export writes the same document, pretty-printed. Import accepts any JSON
//! object carrying both a `cards` and a `reviews` field.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

use super::models::RecallState;

const STATE_FILE: &str = "state.json";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import rejected: {0}")]
    ImportInvalid(String),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Card not found: {0}")]
    CardNotFound(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Where the engine loads its state from and saves it to
pub trait StateStore {
    /// Load the persisted state, falling back to the default state when
    /// nothing was saved yet or the stored document is unreadable
    fn load(&self) -> RecallState;

    fn save(&self, state: &RecallState) -> Result<()>;
}

/// Stores the state as one JSON file
pub struct JsonFileStore {
    state_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            state_path: data_dir.join(STATE_FILE),
        })
    }

    /// Default data directory (e.g., ~/.local/share/recall)
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("recall"))
            .ok_or(StorageError::DataDirNotFound)
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    fn read_state(&self) -> Result<Option<RecallState>> {
        if !self.state_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.state_path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Move an unreadable state file aside so the next save cannot overwrite it
    fn back_up_unreadable(&self) -> Result<PathBuf> {
        let mut name = self.state_path.as_os_str().to_os_string();
        name.push(format!(".corrupt-{}", Utc::now().format("%Y%m%d%H%M%S%3f")));
        let backup = PathBuf::from(name);
        fs::rename(&self.state_path, &backup)?;
        Ok(backup)
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> RecallState {
        match self.read_state() {
            Ok(Some(state)) => state,
            Ok(None) => RecallState::default(),
            Err(e) => {
                match self.back_up_unreadable() {
                    Ok(backup) => log::warn!(
                        "Stored state at {:?} is unreadable, moved to {:?}, starting empty: {}",
                        self.state_path,
                        backup,
                        e
                    ),
                    Err(backup_err) => log::warn!(
                        "Stored state at {:?} is unreadable and could not be backed up ({}), starting empty: {}",
                        self.state_path,
                        backup_err,
                        e
                    ),
                }
                RecallState::default()
            }
        }
    }

    fn save(&self, state: &RecallState) -> Result<()> {
        fs::write(&self.state_path, serde_json::to_string(state)?)?;
        Ok(())
    }
}

/// Serialize the whole state as a pretty-printed JSON document
pub fn export_state(state: &RecallState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Validate and parse an imported document
pub fn parse_import(json: &str) -> Result<RecallState> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| StorageError::ImportInvalid(format!("not valid JSON: {}", e)))?;

    let present = |field: &str| value.get(field).map_or(false, |v| !v.is_null());
    if !present("cards") || !present("reviews") {
        return Err(StorageError::ImportInvalid(
            "document must contain both cards and reviews".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| StorageError::ImportInvalid(format!("unexpected structure: {}", e)))
}

/// Replace `state` with an imported document. On error `state` is untouched.
pub fn import_state(state: &mut RecallState, json: &str) -> Result<()> {
    let imported = parse_import(json)?;
    log::info!(
        "Imported {} cards and {} reviews",
        imported.cards.len(),
        imported.reviews.len()
    );
    *state = imported;
    Ok(())
}
