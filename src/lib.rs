//! Lumen Player
//!
//! Playback core for a local media player: a playlist of user-supplied files
//! with owned resource handles, a controls state machine driving a host media
//! element, SubRip to WebVTT subtitle conversion, and panels for remote
//! scene description and subtitle search.

mod busy;
pub mod config;
pub mod config_file;
pub mod error;
pub mod insights;
pub mod logging;
pub mod player;
pub mod playlist;
pub mod registry;
pub mod session;
pub mod subtitle;


pub use config::PlayerConfig;
pub use error::{PlayerError, Result};
pub use insights::{SceneDescriber, SceneInsights};
pub use player::{PlaybackState, PlayerController};
pub use playlist::PlaylistStore;
pub use registry::{FileDescriptor, MediaResourceRegistry};
pub use session::{MediaBackend, PlayerSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const APP_NAME: &str = "lumen-player";
