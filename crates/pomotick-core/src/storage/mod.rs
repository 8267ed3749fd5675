mod settings;
mod store;

pub use settings::Settings;
pub use store::{load_defaults, FileSettingsStore, MemorySettingsStore, SettingsStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory.
///
/// `$POMOTICK_HOME` if set, otherwise `~/.config/pomotick[-dev]/` based on
/// `POMOTICK_ENV`. Set `POMOTICK_ENV=dev` to use the development directory.
/// The directory is created on first save, not here.
///
/// # Errors
/// Returns an error if no override is set and the home directory cannot be
/// determined.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    if let Some(home) = std::env::var_os("POMOTICK_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }

    let base_dir = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?.join(".config");

    let env = std::env::var("POMOTICK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomotick-dev")
    } else {
        base_dir.join("pomotick")
    };
    Ok(dir)
}
