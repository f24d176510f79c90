//! Pluggable theme persistence.
//!
//! The theme engine never talks to a concrete storage API. It goes through
//! [`ThemeStorage`], so the same provider code runs against browser storage,
//! a file on disk, memory in tests, or nothing at all.
//!
//! # Adapters
//!
//! | Adapter | Lifetime of stored data |
//! |---------|-------------------------|
//! | [`FileStorage`] | Persistent: survives restarts |
//! | [`SessionStorage`] | Process-wide, until the process exits |
//! | [`MemoryStorage`] | The adapter instance |
//! | [`NoopStorage`] | Nothing is ever stored |
//!
//! The browser equivalents (`LocalStorage`, `BrowserSessionStorage`) live in
//! the `web` module behind the `web` feature.
//!
//! # Contract
//!
//! - Missing or corrupt data is `Ok(None)`, never an error. Corruption is
//!   logged so it can be noticed.
//! - `Err` is reserved for backend failures (I/O, denied access). Callers log
//!   and carry on with defaults; a storage failure never stops a theme from
//!   being applied.
//! - What was last set under a key is what is later read under that key.
//!
//! All adapters store the same JSON text, produced by [`encode_theme`] and
//! read back by [`decode_theme`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::config::{ThemeConfig, ThemeUpdate};

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing a storage file failed.
    #[error("Storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The theme could not be serialized.
    #[error("Failed to encode theme: {0}")]
    Encode(String),

    /// The backend exists but refused access (quota, privacy mode, ...).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A place themes are persisted to and read from.
pub trait ThemeStorage {
    /// Reads the theme stored under `key`.
    fn get_theme(&self, key: &str) -> Result<Option<ThemeUpdate>, StorageError>;

    /// Stores `config` under `key`, replacing any previous value.
    fn set_theme(&self, key: &str, config: &ThemeConfig) -> Result<(), StorageError>;
}

impl fmt::Debug for dyn ThemeStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ThemeStorage")
    }
}

/// Serializes a theme to the persisted JSON layout.
pub fn encode_theme(config: &ThemeConfig) -> Result<String, StorageError> {
    serde_json::to_string(config).map_err(|e| StorageError::Encode(e.to_string()))
}

/// Parses persisted JSON, returning `None` (and logging) for corrupt data.
pub fn decode_theme(key: &str, raw: &str) -> Option<ThemeUpdate> {
    match serde_json::from_str::<ThemeUpdate>(raw) {
        Ok(update) => Some(update),
        Err(err) => {
            tracing::warn!(key, error = %err, "ignoring corrupt stored theme");
            None
        }
    }
}

// === Memory ===

/// Stores themes in the adapter instance.
///
/// Share one instance (behind an `Rc`) between providers to simulate a
/// persistent store across remounts.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a key with a theme.
    pub fn with_theme(self, key: impl Into<String>, config: &ThemeConfig) -> Self {
        let raw = serde_json::to_string(config).unwrap_or_default();
        self.with_raw(key, raw)
    }

    /// Pre-populates a key with raw text, which need not be valid JSON.
    pub fn with_raw(self, key: impl Into<String>, raw: impl Into<String>) -> Self {
        self.entries.borrow_mut().insert(key.into(), raw.into());
        self
    }

    /// The raw text stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Number of successful `set_theme` calls.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl ThemeStorage for MemoryStorage {
    fn get_theme(&self, key: &str) -> Result<Option<ThemeUpdate>, StorageError> {
        Ok(self
            .entries
            .borrow()
            .get(key)
            .and_then(|raw| decode_theme(key, raw)))
    }

    fn set_theme(&self, key: &str, config: &ThemeConfig) -> Result<(), StorageError> {
        let raw = encode_theme(config)?;
        self.entries.borrow_mut().insert(key.to_string(), raw);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

// === Session ===

static SESSION_STORE: Lazy<Mutex<HashMap<String, String>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Stores themes for the lifetime of the process.
///
/// Every `SessionStorage` value shares the same backing map, so two
/// providers using the same key see each other's writes on their next read.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionStorage;

impl SessionStorage {
    pub fn new() -> Self {
        SessionStorage
    }

    /// Empties the process-wide session store.
    pub fn clear() {
        if let Ok(mut store) = SESSION_STORE.lock() {
            store.clear();
        }
    }

    fn store() -> Result<std::sync::MutexGuard<'static, HashMap<String, String>>, StorageError> {
        SESSION_STORE
            .lock()
            .map_err(|_| StorageError::Unavailable("session store poisoned".to_string()))
    }
}

impl ThemeStorage for SessionStorage {
    fn get_theme(&self, key: &str) -> Result<Option<ThemeUpdate>, StorageError> {
        let store = Self::store()?;
        Ok(store.get(key).and_then(|raw| decode_theme(key, raw)))
    }

    fn set_theme(&self, key: &str, config: &ThemeConfig) -> Result<(), StorageError> {
        let raw = encode_theme(config)?;
        Self::store()?.insert(key.to_string(), raw);
        Ok(())
    }
}

// === File ===

/// Persists each key as a JSON file inside a directory.
///
/// The directory is created on first write. Key bytes that are unsafe in
/// file names are hex-escaped.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file a key is stored in.
    ///
    /// ASCII letters, digits, `-` and `.` are kept; every other byte becomes
    /// `_XX` (uppercase hex), so distinct keys never share a file.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'.' {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("_{:02X}", byte));
            }
        }
        self.dir.join(format!("{}.json", name))
    }
}

impl ThemeStorage for FileStorage {
    fn get_theme(&self, key: &str) -> Result<Option<ThemeUpdate>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(decode_theme(key, &raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set_theme(&self, key: &str, config: &ThemeConfig) -> Result<(), StorageError> {
        let raw = encode_theme(config)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        std::fs::write(&path, raw).map_err(|source| StorageError::Io { path, source })
    }
}

// === No-op ===

/// Disables persistence: reads find nothing, writes are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStorage;

impl ThemeStorage for NoopStorage {
    fn get_theme(&self, _key: &str) -> Result<Option<ThemeUpdate>, StorageError> {
        Ok(None)
    }

    fn set_theme(&self, _key: &str, _config: &ThemeConfig) -> Result<(), StorageError> {
        Ok(())
    }
}
