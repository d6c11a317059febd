//! User settings persistence and telemetry configuration.
//!
//! This module handles loading and saving user preferences across sessions,
//! and holds the numeric configuration (travel range, sag window, bin count)
//! that is passed into the transformation pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable selecting the backend run API
pub const BACKEND_URL_ENV: &str = "TRAVELOG_BACKEND_URL";

/// Environment variable selecting a local run directory
pub const RUN_DIR_ENV: &str = "TRAVELOG_RUN_DIR";

/// Default backend location used by the web stack's dev server
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";

/// Errors that can occur while persisting settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write settings file: {0}")]
    Write(std::io::Error),
}

/// Numeric configuration for the telemetry pipeline.
///
/// Passed into the normalizer, the sag filter and the histogram binner so
/// alternate travel ranges and windows can be used without global state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Raw displacement reading corresponding to full suspension stroke
    pub max_travel: f64,
    /// Dynamic sag averaging window in milliseconds
    pub window_ms: f64,
    /// Number of equal-width bins over the 0-100% travel range
    pub bin_count: usize,
    /// Sample frequency (Hz) used when a run does not record one
    pub default_frequency: f64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            max_travel: 1024.0,
            window_ms: 500.0,
            bin_count: 20,
            default_frequency: 100.0,
        }
    }
}

impl TelemetryConfig {
    /// Sag window length in seconds
    #[inline]
    pub fn window_secs(&self) -> f64 {
        self.window_ms / 1000.0
    }
}

/// Where run documents come from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum SourceConfig {
    /// A local directory tree of `*.json` run documents
    Directory(PathBuf),
    /// The backend run API (`/api/runs/`, `/api/s3/file`)
    Backend(String),
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Backend(DEFAULT_BACKEND_URL.to_string())
    }
}

impl SourceConfig {
    /// Apply environment overrides, preferring an explicit run directory
    pub fn from_env_or(fallback: SourceConfig) -> Self {
        if let Ok(dir) = std::env::var(RUN_DIR_ENV) {
            if !dir.trim().is_empty() {
                return SourceConfig::Directory(PathBuf::from(dir));
            }
        }
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                return SourceConfig::Backend(url);
            }
        }
        fallback
    }
}

/// User settings that persist across sessions
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserSettings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// Pipeline configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Run source
    #[serde(default)]
    pub source: SourceConfig,
    /// Use the colorblind-friendly palette
    #[serde(default)]
    pub color_blind_mode: bool,
}

fn default_version() -> u32 {
    1
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            version: 1,
            telemetry: TelemetryConfig::default(),
            source: SourceConfig::default(),
            color_blind_mode: false,
        }
    }
}

impl UserSettings {
    /// Get the config directory path for Travelog
    pub fn get_config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir().map(|p| p.join("Travelog"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|p| p.join("Travelog"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            dirs::config_dir().map(|p| p.join("travelog"))
        }
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::get_settings_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_json(&content),
            Err(e) => {
                tracing::warn!("Failed to read settings file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON; corrupt content yields defaults
    pub fn from_json(content: &str) -> Self {
        match serde_json::from_str(content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring corrupt settings file: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::get_settings_path().ok_or(SettingsError::NoConfigDir)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SettingsError::CreateDir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).map_err(SettingsError::Write)?;

        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }
}
