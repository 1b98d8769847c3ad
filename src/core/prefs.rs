//! # Local Preference Store
//!
//! Key-value persistence for UI preferences (panel visibility, desktop
//! width, bookmarks toggle). Everything here is best-effort: a read fault
//! yields the caller's default, a write fault is logged and dropped.
//!
//! ```text
//! Preferences (typed get/set, absorbs faults)
//!   └── Box<dyn PreferenceStore>
//!         ├── FileStore    (~/.sidenav/preferences.json)
//!         └── MemoryStore  (tests, --ephemeral)
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub const KEY_NAV_VISIBLE: &str = "navVisible";
pub const KEY_NAV_WIDTH: &str = "navWidth";
pub const KEY_SHOW_BOOKMARKS: &str = "showBookmarks";

#[derive(Debug)]
pub enum PreferenceError {
    Io(io::Error),
    /// Stored file is not a JSON object, or a value has the wrong shape.
    Decode(String),
    Encode(String),
}

impl fmt::Display for PreferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceError::Io(e) => write!(f, "preference I/O error: {e}"),
            PreferenceError::Decode(msg) => write!(f, "preference decode error: {msg}"),
            PreferenceError::Encode(msg) => write!(f, "preference encode error: {msg}"),
        }
    }
}

impl std::error::Error for PreferenceError {}

/// Raw storage backend. Implementations report faults; `Preferences` decides
/// what to do with them.
pub trait PreferenceStore: Send {
    fn read(&self, key: &str) -> Result<Option<Value>, PreferenceError>;
    fn write(&mut self, key: &str, value: Value) -> Result<(), PreferenceError>;
}

/// Best-effort typed facade over a `PreferenceStore`.
pub struct Preferences {
    store: Box<dyn PreferenceStore>,
}

impl Preferences {
    pub fn new(store: Box<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// Returns the stored value for `key`, or `default` if it is missing,
    /// unreadable, or of the wrong type.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.store.read(key) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(v) => v,
                Err(e) => {
                    warn!("Preference '{}' has unexpected shape, using default: {}", key, e);
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                warn!("Failed to read preference '{}': {}", key, e);
                default
            }
        }
    }

    /// Stores `value` under `key`. Faults are logged and swallowed.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to encode preference '{}': {}", key, e);
                return;
            }
        };
        match self.store.write(key, value) {
            Ok(()) => debug!("Preference '{}' saved", key),
            Err(e) => warn!("Failed to write preference '{}': {}", key, e),
        }
    }
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Default)]
struct MemoryInner {
    values: HashMap<String, Value>,
    writes: Vec<String>,
}

/// In-memory store. Clones share the same map, so a test can keep one handle
/// and hand another to the controller.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(self, key: &str, value: Value) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.values.insert(key.to_string(), value);
        }
        self
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.inner.lock().ok()?.values.get(key).cloned()
    }

    /// Keys written so far, in order.
    pub fn writes(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.writes.clone())
            .unwrap_or_default()
    }
}

impl PreferenceStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Value>, PreferenceError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| PreferenceError::Decode("store lock poisoned".to_string()))?;
        Ok(inner.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: Value) -> Result<(), PreferenceError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| PreferenceError::Encode("store lock poisoned".to_string()))?;
        inner.values.insert(key.to_string(), value);
        inner.writes.push(key.to_string());
        Ok(())
    }
}

// ============================================================================
// File store
// ============================================================================

/// Preferences kept as one JSON object on disk.
///
/// Every write re-reads the file so concurrent instances don't clobber each
/// other's unrelated keys, then replaces it atomically.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<Map<String, Value>, PreferenceError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let json = fs::read_to_string(&self.path).map_err(PreferenceError::Io)?;
        match serde_json::from_str(&json) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(PreferenceError::Decode(format!(
                "{} is not a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(PreferenceError::Decode(e.to_string())),
        }
    }
}

impl PreferenceStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Value>, PreferenceError> {
        Ok(self.load()?.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: Value) -> Result<(), PreferenceError> {
        // A corrupt file is replaced rather than blocking every future write.
        let mut map = self.load().unwrap_or_else(|e| {
            warn!("Discarding unreadable preferences file: {}", e);
            Map::new()
        });
        map.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(PreferenceError::Io)?;
        }
        atomic_write_json(&self.path, &Value::Object(map))
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json(path: &Path, data: &Value) -> Result<(), PreferenceError> {
    let tmp_path = path.with_extension("tmp");
    let json =
        serde_json::to_string_pretty(data).map_err(|e| PreferenceError::Encode(e.to_string()))?;
    fs::write(&tmp_path, json).map_err(PreferenceError::Io)?;
    fs::rename(&tmp_path, path).map_err(PreferenceError::Io)?;
    Ok(())
}
