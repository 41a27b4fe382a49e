//! Session settings
//!
//! Timing and control tunables. Physics and grid geometry are fixed in
//! `consts`. Loaded from LocalStorage on web and from a JSON file on native.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notify::{DEFAULT_GAME_OVER_MS, DEFAULT_TOAST_MS};

/// Environment variable naming the native settings file
pub const SETTINGS_ENV: &str = "CANCEL_MEETINGS_SETTINGS";

/// Settings loading error
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file couldn't be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings JSON is malformed
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Session settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Serve ===
    /// Ball freeze after "start" (ms)
    pub serve_delay_ms: f64,
    /// Ball freeze after "new day" (ms)
    pub new_day_serve_delay_ms: f64,

    // === Notifications ===
    /// "Meeting canceled" toast lifetime (ms)
    pub toast_ms: f64,
    /// Game-over notice lifetime before returning to idle (ms)
    pub game_over_notice_ms: f64,

    // === Controls ===
    /// Paddle movement per key press
    pub paddle_step: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            serve_delay_ms: 3000.0,
            new_day_serve_delay_ms: 2000.0,

            toast_ms: DEFAULT_TOAST_MS,
            game_over_notice_ms: DEFAULT_GAME_OVER_MS,

            paddle_step: 24.0,
        }
    }
}

impl Settings {
    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "cancel_meetings_settings";

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

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from the file named by `CANCEL_MEETINGS_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(SETTINGS_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Failed to load settings from {}: {}", path, e);
                Self::default()
            }
        }
    }
}
