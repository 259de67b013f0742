//! Durable key-value preferences.
//!
//! Stores persist small scalar choices (the chosen locale, the theme mode)
//! through a [`PreferenceStorage`]. Two backends ship here:
//!
//! - [`MemoryStorage`]: process-local, shared by cloning the `Rc` handle.
//!   Used by tests and by sessions that must not touch disk.
//! - [`FileStorage`]: a flat JSON object on disk.
//!
//! # File Format
//!
//! ```json
//! {
//!   "locale": "es",
//!   "theme": "dark"
//! }
//! ```
//!
//! Values are plain text; there is no versioning or migration.
//!
//! # Atomic Writes
//!
//! Writes use a temp-file-then-rename pattern to prevent corruption on crash.
//!
//! # Failure Modes
//!
//! - **Missing file** reads as empty.
//! - **Corrupted file** (not a JSON object of strings) reads as empty, logged
//!   at debug level; the next successful write replaces it.
//! - **Unreadable file** (permissions, invalid UTF-8) reads as empty, and
//!   writes fail with [`StorageError::Io`] so its contents are left alone.
//! - **Write failure** is returned to the caller as [`StorageError`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Storage key holding the chosen locale tag.
pub const LOCALE_KEY: &str = "locale";

/// Storage key holding the chosen theme mode.
pub const THEME_KEY: &str = "theme";

/// Errors from writing preferences.
#[derive(Debug)]
pub enum StorageError {
    /// Filesystem failure.
    Io(io::Error),
    /// Preferences could not be encoded.
    Encode(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "preference storage I/O error: {err}"),
            Self::Encode(msg) => write!(f, "failed to encode preferences: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Encode(_) => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Durable scalar preferences keyed by name.
pub trait PreferenceStorage {
    /// Read a value. Absent and unreadable entries are both `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory preferences.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-populated with entries.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let storage = Self::new();
        storage.entries.borrow_mut().extend(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        storage
    }
}

impl PreferenceStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept in a JSON file.
///
/// Every read goes to disk, so two handles on the same path (or a handle
/// created after a restart) observe each other's writes.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Use `path` as the preferences file. The file need not exist yet;
    /// its parent directory is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the preferences file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current entries. A missing file or one that is not a JSON object of
    /// strings reads as empty; any other read failure is returned.
    fn load(&self) -> io::Result<BTreeMap<String, String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err),
        };
        Ok(serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::debug!(path = %self.path.display(), error = %err, "preferences corrupted");
            BTreeMap::new()
        }))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Encode(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        // Atomic write: temp file then rename
        let temp = self.path.with_extension("json.tmp");
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl PreferenceStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut entries) => entries.remove(key),
            Err(err) => {
                tracing::debug!(path = %self.path.display(), error = %err, "preferences unreadable");
                None
            }
        }
    }

    /// Fails without touching the file when its current contents cannot be
    /// read, so other preferences are never dropped.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }
}

// =============================================================================
// Tests
// =============================================================================
