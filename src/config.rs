//! Player configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Control bar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsConfig {
    /// Inactivity before the control bar hides (fullscreen + playing only), in milliseconds
    pub hide_delay_ms: u64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self { hide_delay_ms: 3000 }
    }
}

impl ControlsConfig {
    /// Get the hide delay as a Duration
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }
}

/// Keyboard shortcut configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// Seconds moved by the left/right arrow keys
    pub seek_step_secs: f64,

    /// Volume change for the up/down arrow keys
    pub volume_step: f64,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            seek_step_secs: 5.0,
            volume_step: 0.1,
        }
    }
}

/// Subtitle loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleConfig {
    /// Timeout for fetching a subtitle file by URL, in seconds
    pub fetch_timeout_secs: u64,

    /// User agent sent with subtitle fetches
    pub user_agent: String,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 15,
            user_agent: concat!("lumen-player/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SubtitleConfig {
    /// Get the fetch timeout as a Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Player configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Control bar configuration
    pub controls: ControlsConfig,

    /// Keyboard configuration
    pub keyboard: KeyboardConfig,

    /// Subtitle configuration
    pub subtitles: SubtitleConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl PlayerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: PlayerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}
