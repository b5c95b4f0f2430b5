//! Core error types for tomato-core.
//!
//! Notification failures are deliberately non-fatal: the countdown on
//! screen stays authoritative whether or not the host ever fires an alarm.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tomato-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Notification scheduling errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Notification-scheduling errors. Best effort by contract: a failed
/// request is surfaced to the presentation layer and then ignored.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The host refused or failed to schedule the alert
    #[error("Failed to schedule notification: {0}")]
    Schedule(String),

    /// No notification host is available
    #[error("Notification host unavailable")]
    Unavailable,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
