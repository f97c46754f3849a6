//! Playlist entries

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::registry::{FileDescriptor, ResourceHandle};

/// Playlist entry identifier
pub type EntryId = Uuid;

/// Subtitle track attached to an entry
#[derive(Debug)]
pub struct SubtitleAttachment {
    pub handle: ResourceHandle,
    pub label: String,
}

/// One playlist item. Owns its resource handles.
#[derive(Debug)]
pub struct MediaEntry {
    pub id: EntryId,
    pub name: String,
    pub source: ResourceHandle,
    pub size_bytes: u64,
    pub mime_type: String,
    pub last_modified: DateTime<Utc>,
    pub is_audio: bool,
    pub subtitle: Option<SubtitleAttachment>,
}

impl MediaEntry {
    /// Create an entry for a file whose handle was just acquired
    pub fn new(file: &FileDescriptor, source: ResourceHandle) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: file.name.clone(),
            source,
            size_bytes: file.byte_size,
            mime_type: file.mime_type.clone(),
            last_modified: file.last_modified,
            is_audio: file.is_audio(),
            subtitle: None,
        }
    }

    /// Take a plain-data view of the entry
    pub fn info(&self) -> MediaEntryInfo {
        MediaEntryInfo {
            id: self.id,
            name: self.name.clone(),
            url: self.source.url().to_string(),
            size_bytes: self.size_bytes,
            mime_type: self.mime_type.clone(),
            last_modified: self.last_modified,
            is_audio: self.is_audio,
            subtitle: self.subtitle.as_ref().map(|s| SubtitleTrack {
                url: s.handle.url().to_string(),
                label: s.label.clone(),
            }),
        }
    }
}

/// Subtitle track as seen by a media element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleTrack {
    pub url: String,
    pub label: String,
}

/// Snapshot of a playlist entry for rendering and binding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaEntryInfo {
    pub id: EntryId,
    pub name: String,
    pub url: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub last_modified: DateTime<Utc>,
    pub is_audio: bool,
    pub subtitle: Option<SubtitleTrack>,
}
