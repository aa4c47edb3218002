//! Save/Load for the game session
//!
//! A save is one JSON document:
//!
//! ```json
//! { "version": "1.0.0", "timestamp": 1700000000000,
//!   "data": { "player": { "x": 300, "y": 250, "appearance": { ... } },
//!             "currentLocationId": "park",
//!             "needs": { "hunger": 65, "energy": 45 },
//!             "time": { "day": 2, "hour": 9, "minute": 30 } } }
//! ```
//!
//! Storage is behind [`SaveStorage`]. Errors stay at this boundary: the
//! engine only ever sees `bool` from a save and `Option` from a load.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::Appearance;
use crate::systems::{ClockSnapshot, NeedsSnapshot};

/// Written into every save. A mismatch on load is logged, not migrated.
pub const SAVE_VERSION: &str = "1.0.0";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("save data is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Top-level save document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePayload {
    pub version: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub data: SaveData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    pub player: PlayerSave,
    pub current_location_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs: Option<NeedsSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ClockSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSave {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub appearance: Appearance,
}

/// Wrap `data` with the current version and timestamp and encode it
pub fn encode_save(data: &SaveData) -> Result<String, SaveError> {
    let payload = SavePayload {
        version: SAVE_VERSION.to_string(),
        timestamp: chrono::Utc::now().timestamp_millis(),
        data: data.clone(),
    };
    Ok(serde_json::to_string(&payload)?)
}

/// Parse a save document. Version mismatches are only logged.
pub fn decode_save(json: &str) -> Result<SavePayload, SaveError> {
    let payload: SavePayload = serde_json::from_str(json)?;
    if payload.version != SAVE_VERSION {
        warn!(
            "Save version mismatch: expected {}, found {}; loading as-is",
            SAVE_VERSION, payload.version
        );
    }
    Ok(payload)
}

/// Where the encoded save lives. One slot.
pub trait SaveStorage {
    fn write(&mut self, contents: &str) -> Result<(), SaveError>;
    /// `Ok(None)` when nothing has been saved yet
    fn read(&self) -> Result<Option<String>, SaveError>;
}

/// In-memory slot. Clones share the same slot, so a test can keep one
/// handle and give the other to the engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Rc<RefCell<Option<String>>>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose writes always fail, like a full quota
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    /// Overwrite the slot directly (corrupt or hand-edited saves)
    pub fn put(&self, contents: impl Into<String>) {
        *self.slot.borrow_mut() = Some(contents.into());
    }
}

impl SaveStorage for MemoryStorage {
    fn write(&mut self, contents: &str) -> Result<(), SaveError> {
        if self.fail_writes {
            return Err(SaveError::Unavailable("storage quota exceeded".into()));
        }
        *self.slot.borrow_mut() = Some(contents.to_string());
        Ok(())
    }

    fn read(&self) -> Result<Option<String>, SaveError> {
        Ok(self.slot.borrow().clone())
    }
}

/// JSON file on disk. Writes go to a sibling temp file that is renamed over
/// the target, so a failed write never leaves half a save.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SaveStorage for FileStorage {
    fn write(&mut self, contents: &str) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp = self.temp_path();
        fs::write(&temp, contents)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn read(&self) -> Result<Option<String>, SaveError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Save slot front end used by the engine
pub struct SaveManager {
    storage: Box<dyn SaveStorage>,
}

impl SaveManager {
    pub fn new(storage: Box<dyn SaveStorage>) -> Self {
        Self { storage }
    }

    /// Encode and write. Any failure is logged and reported as `false`.
    pub fn save(&mut self, data: &SaveData) -> bool {
        let result = encode_save(data).and_then(|json| self.storage.write(&json));
        match result {
            Ok(()) => {
                info!("Game saved at '{}'", data.current_location_id);
                true
            }
            Err(e) => {
                warn!("Save failed: {}", e);
                false
            }
        }
    }

    /// Read and decode. Missing, unreadable and corrupt saves are all `None`.
    pub fn load(&self) -> Option<SaveData> {
        let json = match self.storage.read() {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read save: {}", e);
                return None;
            }
        };
        match decode_save(&json) {
            Ok(payload) => Some(payload.data),
            Err(e) => {
                warn!("Discarding unreadable save: {}", e);
                None
            }
        }
    }

    pub fn has_save(&self) -> bool {
        matches!(self.storage.read(), Ok(Some(_)))
    }
}
