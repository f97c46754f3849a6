//! Configuration file support
//!
//! Loads player configuration from TOML files where every section and most
//! fields are optional; missing values fall back to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{ControlsConfig, KeyboardConfig, LoggingConfig, PlayerConfig, SubtitleConfig};
use crate::error::Result;

/// Configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Control bar settings
    pub controls: Option<ControlsSettings>,
    /// Keyboard settings
    pub keyboard: Option<KeyboardSettings>,
    /// Subtitle settings
    pub subtitles: Option<SubtitleSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    /// Hide delay in milliseconds
    pub hide_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardSettings {
    /// Arrow key seek step in seconds
    pub seek_step_secs: Option<f64>,
    /// Arrow key volume step
    pub volume_step: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleSettings {
    /// Fetch timeout in seconds
    pub fetch_timeout_secs: Option<u64>,
    /// User agent for subtitle fetches
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let defaults = PlayerConfig::default();
        Self {
            controls: Some(ControlsSettings {
                hide_delay_ms: Some(defaults.controls.hide_delay_ms),
            }),
            keyboard: Some(KeyboardSettings {
                seek_step_secs: Some(defaults.keyboard.seek_step_secs),
                volume_step: Some(defaults.keyboard.volume_step),
            }),
            subtitles: Some(SubtitleSettings {
                fetch_timeout_secs: Some(defaults.subtitles.fetch_timeout_secs),
                user_agent: None,
            }),
            logging: Some(LoggingSettings {
                level: defaults.logging.level,
                format: Some("pretty".to_string()),
            }),
        }
    }

    /// Convert to PlayerConfig
    pub fn into_player_config(self) -> PlayerConfig {
        let controls_default = ControlsConfig::default();
        let keyboard_default = KeyboardConfig::default();
        let subtitles_default = SubtitleConfig::default();

        PlayerConfig {
            controls: ControlsConfig {
                hide_delay_ms: self
                    .controls
                    .and_then(|c| c.hide_delay_ms)
                    .unwrap_or(controls_default.hide_delay_ms),
            },
            keyboard: KeyboardConfig {
                seek_step_secs: self
                    .keyboard
                    .as_ref()
                    .and_then(|k| k.seek_step_secs)
                    .unwrap_or(keyboard_default.seek_step_secs),
                volume_step: self
                    .keyboard
                    .as_ref()
                    .and_then(|k| k.volume_step)
                    .unwrap_or(keyboard_default.volume_step),
            },
            subtitles: SubtitleConfig {
                fetch_timeout_secs: self
                    .subtitles
                    .as_ref()
                    .and_then(|s| s.fetch_timeout_secs)
                    .unwrap_or(subtitles_default.fetch_timeout_secs),
                user_agent: self
                    .subtitles
                    .and_then(|s| s.user_agent)
                    .unwrap_or(subtitles_default.user_agent),
            },
            logging: self
                .logging
                .map(|l| LoggingConfig {
                    level: l.level,
                    json: l.format.as_deref() == Some("json"),
                })
                .unwrap_or_default(),
        }
    }
}

/// Load a player configuration, falling back to defaults when the file is
/// missing or unreadable.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> PlayerConfig {
    let path = path.as_ref();
    if !path.exists() {
        return PlayerConfig::default();
    }
    match ConfigFile::from_file(path) {
        Ok(cf) => cf.into_player_config(),
        Err(e) => {
            tracing::warn!(
                "Failed to load config file {}: {}. Using defaults.",
                path.display(),
                e
            );
            PlayerConfig::default()
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}
