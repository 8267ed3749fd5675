//! Settings persistence.
//!
//! [`SettingsStore`] is the narrow contract the integrating layer uses to
//! hydrate and persist [`Settings`]. Two backends are provided: a TOML file
//! under the data directory and an in-memory store for tests and embedding.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::data_dir;
use super::settings::Settings;
use crate::error::ConfigError;

const SETTINGS_FILE: &str = "settings.toml";

pub trait SettingsStore {
    /// The stored record, or [`SettingsStore::defaults`] if nothing is stored.
    fn load(&self) -> Result<Settings, ConfigError>;

    fn save(&mut self, settings: &Settings) -> Result<(), ConfigError>;

    /// Forget the stored record. Clearing an empty store is not an error.
    fn clear(&mut self) -> Result<(), ConfigError>;

    fn defaults(&self) -> Settings {
        Settings::default()
    }
}

/// Restore defaults: clear the store, then load what it now reports.
pub fn load_defaults<S: SettingsStore + ?Sized>(store: &mut S) -> Result<Settings, ConfigError> {
    store.clear()?;
    store.load()
}

/// TOML file backend, `<data dir>/settings.toml` by default.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location.
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined.
    pub fn open_default() -> Result<Self, ConfigError> {
        Ok(Self::new(data_dir()?.join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Settings, ConfigError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored settings, using defaults");
                return Ok(self.defaults());
            }
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
        };
        let settings: Settings =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        debug!(path = %self.path.display(), "settings loaded");
        Ok(settings)
    }

    fn save(&mut self, settings: &Settings) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: self.path.clone(),
            message,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        let content = toml::to_string_pretty(settings).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| save_failed(e.to_string()))?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ConfigError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConfigError::SaveFailed {
                path: self.path.clone(),
                message: e.to_string(),
            }),
        }
    }
}

/// In-memory backend.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    stored: Option<Settings>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            stored: Some(settings),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stored.is_none()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings, ConfigError> {
        Ok(self.stored.clone().unwrap_or_else(|| self.defaults()))
    }

    fn save(&mut self, settings: &Settings) -> Result<(), ConfigError> {
        self.stored = Some(settings.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ConfigError> {
        self.stored = None;
        Ok(())
    }
}
