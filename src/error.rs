use thiserror::Error;
use uuid::Uuid;

/// Main error type for the player core
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("Playlist entry not found: {0}")]
    EntryNotFound(Uuid),

    #[error("Selection out of range: index={index}, len={len}")]
    SelectionOutOfRange { index: usize, len: usize },

    #[error("No media selected")]
    NoSelection,

    #[error("Unsupported subtitle file: {0}")]
    UnsupportedSubtitle(String),

    #[error("Media element error: {0}")]
    MediaAction(String),

    #[error("Fullscreen error: {0}")]
    Fullscreen(String),

    #[error("Picture-in-picture error: {0}")]
    PictureInPicture(String),

    #[error("Remote call failed: {0}")]
    Remote(String),

    #[error("Subtitle fetch failed: url={url}, reason={reason}")]
    SubtitleFetch { url: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl PlayerError {
    /// Build a subtitle fetch error
    pub fn fetch(url: &str, reason: impl std::fmt::Display) -> Self {
        PlayerError::SubtitleFetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PlayerError>;
