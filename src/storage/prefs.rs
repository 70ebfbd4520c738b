//! Console preference persistence.
//!
//! T070: Implement Preferences TOML load/save

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

/// Persisted console preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Active-locale tag
    pub locale: Option<String>,
}

/// Persistence seam for console preferences.
pub trait PreferenceStore: Send + Sync {
    /// Load the persisted preferences.
    fn load(&self) -> Result<Preferences, PrefsError>;

    /// Persist the active-locale choice.
    fn store_locale(&self, tag: &str) -> Result<(), PrefsError>;
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("io", "opsdeck", "OpsDeck")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the preference file path.
pub fn get_prefs_path() -> PathBuf {
    get_data_dir().join("preferences.toml")
}

/// Preference store backed by a TOML file.
pub struct FilePreferenceStore {
    /// Preference file location
    path: PathBuf,
}

impl FilePreferenceStore {
    /// Create a store at the platform preference path.
    pub fn new() -> Self {
        Self::with_path(get_prefs_path())
    }

    /// Create a store at an explicit path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write the full preference document.
    fn save(&self, prefs: &Preferences) -> Result<(), PrefsError> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PrefsError::IoError(e.to_string()))?;
        }

        let content =
            toml::to_string_pretty(prefs).map_err(|e| PrefsError::SerializeError(e.to_string()))?;

        std::fs::write(&self.path, content).map_err(|e| PrefsError::IoError(e.to_string()))?;

        Ok(())
    }
}

impl Default for FilePreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Result<Preferences, PrefsError> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| PrefsError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| PrefsError::ParseError(e.to_string()))
    }

    fn store_locale(&self, tag: &str) -> Result<(), PrefsError> {
        let mut prefs = self.load().unwrap_or_default();
        prefs.locale = Some(tag.to_string());
        self.save(&prefs)
    }
}

/// In-memory preference store for embedding and tests.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    /// Current preferences
    prefs: Mutex<Preferences>,
}

impl MemoryPreferenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given preferences.
    pub fn with_prefs(prefs: Preferences) -> Self {
        Self {
            prefs: Mutex::new(prefs),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Preferences, PrefsError> {
        Ok(self.prefs.lock().unwrap().clone())
    }

    fn store_locale(&self, tag: &str) -> Result<(), PrefsError> {
        self.prefs.lock().unwrap().locale = Some(tag.to_string());
        Ok(())
    }
}

/// Preference errors.
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
