//! Media element and presentation environment seams
//!
//! The host supplies both. The controller only issues requests through these
//! traits and learns outcomes through the event streams they hand out.
//! Implementations must not call back into the controller from inside a
//! trait method; report changes through the event channel instead.

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::playlist::SubtitleTrack;

/// Native events of a media element
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    Play,
    Pause,
    TimeUpdate(f64),
    DurationChange(f64),
}

/// Event stream of one media element
pub type MediaEventStream = mpsc::UnboundedReceiver<MediaEvent>;

/// A playable media element bound to one playlist entry.
#[async_trait]
pub trait MediaElement: Send + Sync {
    /// Start playback. May be rejected (autoplay policy, decode failure).
    async fn play(&self) -> Result<()>;

    fn pause(&self);

    /// Move the playback position; the element clamps out-of-range values.
    fn set_current_time(&self, secs: f64);

    fn set_volume(&self, volume: f64);

    fn set_muted(&self, muted: bool);

    fn set_playback_rate(&self, rate: f64);

    /// Replace the displayed subtitle track.
    fn set_subtitle_track(&self, _track: Option<&SubtitleTrack>) {}

    /// JPEG still of the current frame. None for audio or when unavailable.
    fn capture_frame(&self) -> Option<Bytes> {
        None
    }

    /// Open the element's event stream. Called once per binding.
    fn subscribe(&self) -> MediaEventStream;
}

/// Events of the presentation environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationEvent {
    FullscreenChanged(bool),
}

/// Event stream of the presentation environment
pub type PresentationEventStream = mpsc::UnboundedReceiver<PresentationEvent>;

/// Display surface capabilities: fullscreen on the player container and
/// picture-in-picture for the video.
#[async_trait]
pub trait PresentationEnvironment: Send + Sync {
    async fn request_fullscreen(&self) -> Result<()>;

    async fn exit_fullscreen(&self) -> Result<()>;

    /// True while the player container is the fullscreen target
    fn fullscreen_active(&self) -> bool;

    async fn request_picture_in_picture(&self) -> Result<()>;

    async fn exit_picture_in_picture(&self) -> Result<()>;

    fn picture_in_picture_active(&self) -> bool;

    /// Open the environment's event stream. Called once per controller.
    fn subscribe(&self) -> PresentationEventStream;
}
