//! Core error types for pomotick-core.
//!
//! Errors are split by concern: validation of timer configuration, the
//! settings store, and failures surfaced from the mode-change handler.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::Mode;

/// Error type returned by a mode-change handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Core error type for pomotick-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The registered mode-change handler failed. The transition that
    /// triggered it has already been applied.
    #[error("Mode change handler failed: {0}")]
    Notification(#[source] HandlerError),
}

/// Settings store errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the settings file
    #[error("Failed to load settings from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to write the settings file
    #[error("Failed to save settings to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Stored settings are not valid TOML for the settings record
    #[error("Failed to parse settings: {0}")]
    ParseFailed(String),

    /// Unknown settings key
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),

    /// Value does not fit the key's type
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// No home directory to place the data directory under
    #[error("Could not determine home directory")]
    NoHomeDir,
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Interval durations must be at least one minute.
    #[error("Invalid duration for {mode}: {minutes} minutes (must be a positive integer)")]
    InvalidDuration { mode: Mode, minutes: u32 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
