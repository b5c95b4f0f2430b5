//! TOML-based application configuration.
//!
//! Presentation preferences only -- phase durations are fixed constants
//! in the engine and deliberately not configurable.
//!
//! Configuration is stored at `~/.config/tomato/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Arm a host notification for each countdown's finish time.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Ring the terminal bell / play a sound when a phase completes.
    #[serde(default = "default_true")]
    pub sound: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tomato/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
        }
    }
}

impl Config {
    fn path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("tomato")
            .join("config.toml")
    }

    /// Load from disk, falling back to defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path();
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path();
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: Self::path(),
            message,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut value = serde_json::to_value(self).ok()?;
        for part in key.split('.') {
            value = value.get(part)?.clone();
        }
        match value {
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be
    /// parsed, or the config cannot be saved.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        self.apply(key, raw)?;
        self.save()
    }

    /// Set a value without touching the disk.
    fn apply(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        let mut slot = &mut json;
        for part in key.split('.') {
            slot = slot
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        // Every leaf in this config is a boolean; anything else is an
        // intermediate table, not a settable key.
        let new_value = match &*slot {
            serde_json::Value::Bool(_) => {
                let parsed: bool = raw.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("expected true or false, got '{raw}'"),
                })?;
                serde_json::Value::Bool(parsed)
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        *slot = new_value;

        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrips_through_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert!(parsed.notifications.enabled);
        assert!(parsed.notifications.sound);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let config = Config::default();
        assert_eq!(config.get("notifications.enabled").as_deref(), Some("true"));
        assert_eq!(config.get("notifications.missing"), None);
    }

    #[test]
    fn apply_updates_nested_bool() {
        let mut config = Config::default();
        config.apply("notifications.sound", "false").unwrap();
        assert!(!config.notifications.sound);
        assert!(config.notifications.enabled);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut config = Config::default();
        let err = config.apply("notifications.volume", "50").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn apply_rejects_non_leaf_key() {
        let mut config = Config::default();
        let err = config.apply("notifications", "true").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn apply_rejects_invalid_bool() {
        let mut config = Config::default();
        let err = config.apply("notifications.enabled", "maybe").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
