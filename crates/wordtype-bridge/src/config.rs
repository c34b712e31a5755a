use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Storage key used by the local key-value store when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "state";

/// Configuration for the local key-value store that keeps the persisted
/// application state when no native bridge is injected by the host.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key the state payload is stored under.
    pub key: String,
    /// Directory holding the store. Falls back to the user's data directory
    /// when not set.
    pub directory: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            directory: None,
        }
    }
}

/// Configuration for appearance-related defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Whether the system prefers a dark color scheme. Used as the dark mode
    /// value of the default state.
    pub prefers_dark_mode: bool,
}

/// Global application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Configuration for the local state store.
    pub storage: StorageConfig,
    /// Configuration for appearance defaults.
    pub appearance: AppearanceConfig,
}
