//! Game settings and preferences
//!
//! Read from JSON: LocalStorage on the web, a file on native. Settings are
//! edited by hand; the game never writes them back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DEFAULT_LEVEL_DURATION_SECS;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Settings IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings: {message}")]
    Invalid { message: String },
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Countdown length for every level (seconds)
    pub level_duration_secs: f64,
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level_duration_secs: DEFAULT_LEVEL_DURATION_SECS,
            seed: None,
        }
    }
}

impl Settings {
    /// Native settings file, looked up in the working directory
    pub const FILE_NAME: &'static str = "star_sums_settings.json";
    /// Environment variable overriding the settings file path
    pub const PATH_ENV: &'static str = "STAR_SUMS_SETTINGS";
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "star_sums_settings";

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.level_duration_secs.is_finite() || self.level_duration_secs <= 0.0 {
            return Err(SettingsError::Invalid {
                message: format!(
                    "level_duration_secs must be a positive number, got {}",
                    self.level_duration_secs
                ),
            });
        }
        Ok(())
    }

    /// Configured seed, or `fallback` (usually the clock) when unset
    pub fn resolve_seed(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from `$STAR_SUMS_SETTINGS` or the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let (path, explicit) = match std::env::var_os(Self::PATH_ENV) {
            Some(p) => (std::path::PathBuf::from(p), true),
            None => (std::path::PathBuf::from(Self::FILE_NAME), false),
        };

        if !explicit && !path.exists() {
            log::info!("Using default settings");
            return Self::default();
        }

        match Self::load_from_path(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }
}
