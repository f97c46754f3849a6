//! Playlist store
//!
//! Ordered media entries plus a selection cursor. Every mutation runs under
//! one lock, so removal and teardown release handles and update the list as
//! a single step: no caller can observe (or re-enter) a half-removed entry.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::{PlayerError, Result};
use crate::playlist::entry::{EntryId, MediaEntry, MediaEntryInfo, SubtitleAttachment};
use crate::registry::{FileDescriptor, MediaResourceRegistry, ResourceHandle};

#[derive(Debug, Default)]
struct PlaylistInner {
    entries: Vec<MediaEntry>,
    /// None iff entries is empty
    current: Option<usize>,
}

impl PlaylistInner {
    fn release_entry(registry: &MediaResourceRegistry, entry: MediaEntry) {
        registry.release(&entry.source);
        if let Some(subtitle) = entry.subtitle {
            registry.release(&subtitle.handle);
        }
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }
}

/// Playlist store
#[derive(Debug)]
pub struct PlaylistStore {
    registry: Arc<MediaResourceRegistry>,
    inner: Mutex<PlaylistInner>,
}

impl PlaylistStore {
    /// Create an empty playlist backed by `registry`
    pub fn new(registry: Arc<MediaResourceRegistry>) -> Self {
        Self {
            registry,
            inner: Mutex::new(PlaylistInner::default()),
        }
    }

    pub fn registry(&self) -> &Arc<MediaResourceRegistry> {
        &self.registry
    }

    /// Append one entry per file, in order.
    ///
    /// Files that cannot be read are skipped. When the playlist goes from
    /// empty to non-empty the first entry becomes selected.
    pub fn add_files(&self, files: Vec<FileDescriptor>) -> Vec<EntryId> {
        let mut added = Vec::with_capacity(files.len());
        let mut new_entries = Vec::with_capacity(files.len());

        for file in &files {
            match self.registry.acquire(file) {
                Ok(handle) => {
                    let entry = MediaEntry::new(file, handle);
                    added.push(entry.id);
                    new_entries.push(entry);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", file.name, e);
                }
            }
        }

        let mut inner = self.inner.lock();
        let was_empty = inner.entries.is_empty();
        inner.entries.extend(new_entries);
        if was_empty && !inner.entries.is_empty() {
            inner.current = Some(0);
        }
        tracing::info!(
            "Added {} of {} files, playlist length {}",
            added.len(),
            files.len(),
            inner.entries.len()
        );
        added
    }

    /// Remove an entry and release its handles.
    ///
    /// Returns false when no entry has that id.
    pub fn remove_entry(&self, id: EntryId) -> bool {
        let mut inner = self.inner.lock();
        let Some(removed) = inner.position(id) else {
            return false;
        };

        let entry = inner.entries.remove(removed);
        PlaylistInner::release_entry(&self.registry, entry);

        let len = inner.entries.len();
        inner.current = match inner.current {
            _ if len == 0 => None,
            Some(current) if current == removed => Some(removed.min(len - 1)),
            Some(current) if current > removed => Some(current - 1),
            other => other,
        };
        tracing::info!("Removed entry {}, playlist length {}", id, len);
        true
    }

    /// Release every handle and empty the playlist.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.lock();
        let entries = std::mem::take(&mut inner.entries);
        inner.current = None;
        let count = entries.len();
        for entry in entries {
            PlaylistInner::release_entry(&self.registry, entry);
        }
        if count > 0 {
            tracing::info!("Cleared playlist ({} entries)", count);
        }
        count
    }

    /// Replace an entry's subtitle track.
    ///
    /// The previous subtitle handle, if any, is released first. If the entry
    /// does not exist the new handle is released and an error returned.
    pub fn attach_subtitle(&self, id: EntryId, handle: ResourceHandle, label: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        let Some(index) = inner.position(id) else {
            self.registry.release(&handle);
            return Err(PlayerError::EntryNotFound(id));
        };

        let entry = &mut inner.entries[index];
        if let Some(previous) = entry.subtitle.take() {
            self.registry.release(&previous.handle);
        }
        tracing::debug!("Attached subtitle {:?} to {}", label, entry.name);
        entry.subtitle = Some(SubtitleAttachment {
            handle,
            label: label.to_string(),
        });
        Ok(())
    }

    /// Select the entry at `index`
    pub fn select(&self, index: usize) -> Result<()> {
        let mut inner = self.inner.lock();
        let len = inner.entries.len();
        if index >= len {
            return Err(PlayerError::SelectionOutOfRange { index, len });
        }
        inner.current = Some(index);
        Ok(())
    }

    /// Move the selection forward. Returns false at the end of the list.
    pub fn select_next(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.current {
            Some(current) if current + 1 < inner.entries.len() => {
                inner.current = Some(current + 1);
                true
            }
            _ => false,
        }
    }

    /// Move the selection back. Returns false at the start of the list.
    pub fn select_previous(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.current {
            Some(current) if current > 0 => {
                inner.current = Some(current - 1);
                true
            }
            _ => false,
        }
    }

    pub fn has_next(&self) -> bool {
        let inner = self.inner.lock();
        inner
            .current
            .is_some_and(|current| current + 1 < inner.entries.len())
    }

    pub fn has_previous(&self) -> bool {
        self.inner.lock().current.is_some_and(|current| current > 0)
    }

    /// Index of the selected entry
    pub fn current_index(&self) -> Option<usize> {
        self.inner.lock().current
    }

    /// The selected entry
    pub fn current(&self) -> Option<MediaEntryInfo> {
        let inner = self.inner.lock();
        inner.current.map(|i| inner.entries[i].info())
    }

    /// Get an entry by id
    pub fn get(&self, id: EntryId) -> Option<MediaEntryInfo> {
        let inner = self.inner.lock();
        inner.position(id).map(|i| inner.entries[i].info())
    }

    /// All entries, in order
    pub fn entries(&self) -> Vec<MediaEntryInfo> {
        self.inner.lock().entries.iter().map(MediaEntry::info).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }
}

impl Drop for PlaylistStore {
    fn drop(&mut self) {
        self.clear();
    }
}
