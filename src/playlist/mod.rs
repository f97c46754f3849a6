//! Playlist module
//!
//! This module handles the ordered list of loaded media:
//! - Media entries with their exclusively owned resource handles
//! - Selection cursor maintenance on add/remove
//! - Subtitle attachment per entry

pub mod entry;
pub mod store;

pub use entry::{EntryId, MediaEntry, MediaEntryInfo, SubtitleTrack};
pub use store::PlaylistStore;
