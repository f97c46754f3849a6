//! Subtitle handling
//!
//! This module covers everything between a subtitle file and a playable
//! WebVTT track:
//! - SubRip to WebVTT timestamp conversion
//! - Accepted subtitle file kinds and direct-link detection
//! - Fetching subtitle text by URL
//! - Online subtitle search through a remote collaborator

pub mod convert;
pub mod fetch;
pub mod format;
pub mod search;

pub use convert::{needs_conversion, srt_to_vtt, to_vtt};
pub use fetch::{HttpSubtitleFetcher, SubtitleFetcher};
pub use format::SubtitleFormat;
pub use search::{SubtitleFinder, SubtitleSearch, SubtitleSearchResult, SubtitleSource};
