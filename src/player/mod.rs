//! Player module
//!
//! This module drives one media element at a time:
//! - Playback state snapshot and value types
//! - Media element and presentation environment traits
//! - The controller with its auto-hide timer and keyboard shortcuts

pub mod controller;
pub mod element;
pub mod keyboard;
pub mod state;

pub use controller::{MediaBinding, PlayerController};
pub use element::{
    MediaElement, MediaEvent, MediaEventStream, PresentationEnvironment, PresentationEvent,
    PresentationEventStream,
};
pub use keyboard::{Focus, Key, KeyOutcome, Shortcut};
pub use state::{format_time, PlaybackRate, PlaybackState, Volume};
