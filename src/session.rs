//! Player session
//!
//! Ties the playlist to the controller: after every playlist change the
//! selected entry is bound to a media element created by the host backend,
//! or the controller is unbound when nothing is selected.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::config::PlayerConfig;
use crate::error::{PlayerError, Result};
use crate::player::{MediaBinding, MediaElement, PlayerController, PresentationEnvironment};
use crate::playlist::{EntryId, MediaEntryInfo, PlaylistStore};
use crate::registry::{FileDescriptor, MediaResourceRegistry};
use crate::subtitle::{to_vtt, SubtitleFetcher, SubtitleFormat};

/// Creates media elements for playlist entries
pub trait MediaBackend: Send + Sync {
    /// Create an element playing `entry.url`
    fn create_element(&self, entry: &MediaEntryInfo) -> Arc<dyn MediaElement>;
}

/// A playlist, a controller and the collaborators they need
pub struct PlayerSession {
    playlist: PlaylistStore,
    controller: PlayerController,
    backend: Arc<dyn MediaBackend>,
    fetcher: Arc<dyn SubtitleFetcher>,
    sync: Mutex<()>,
}

impl PlayerSession {
    /// Create a session. Must be called inside a tokio runtime.
    pub fn new(
        environment: Arc<dyn PresentationEnvironment>,
        backend: Arc<dyn MediaBackend>,
        fetcher: Arc<dyn SubtitleFetcher>,
        config: &PlayerConfig,
    ) -> Self {
        Self {
            playlist: PlaylistStore::new(Arc::new(MediaResourceRegistry::new())),
            controller: PlayerController::new(environment, config),
            backend,
            fetcher,
            sync: Mutex::new(()),
        }
    }

    pub fn playlist(&self) -> &PlaylistStore {
        &self.playlist
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub fn registry(&self) -> &Arc<MediaResourceRegistry> {
        self.playlist.registry()
    }

    pub fn add_files(&self, files: Vec<FileDescriptor>) -> Vec<EntryId> {
        let added = self.playlist.add_files(files);
        self.sync_binding();
        added
    }

    pub fn remove_entry(&self, id: EntryId) -> bool {
        let removed = self.playlist.remove_entry(id);
        self.sync_binding();
        removed
    }

    pub fn clear(&self) -> usize {
        let count = self.playlist.clear();
        self.sync_binding();
        count
    }

    pub fn select(&self, index: usize) -> Result<()> {
        self.playlist.select(index)?;
        self.sync_binding();
        Ok(())
    }

    pub fn next(&self) -> bool {
        let moved = self.playlist.select_next();
        self.sync_binding();
        moved
    }

    pub fn previous(&self) -> bool {
        let moved = self.playlist.select_previous();
        self.sync_binding();
        moved
    }

    /// Attach a local subtitle file to the selected entry.
    ///
    /// SubRip files are converted to WebVTT; WebVTT files are used as is.
    pub fn add_subtitle_file(&self, file: &FileDescriptor) -> Result<()> {
        let entry = self.playlist.current().ok_or(PlayerError::NoSelection)?;
        let format = SubtitleFormat::from_name(&file.name)
            .ok_or_else(|| PlayerError::UnsupportedSubtitle(file.name.clone()))?;

        let text = file.read_text()?;
        let vtt = match format {
            SubtitleFormat::SubRip => to_vtt(&file.name, text),
            SubtitleFormat::WebVtt => text,
        };
        tracing::info!("Loading {} subtitle {}", format.name(), file.name);
        self.attach_vtt(entry.id, vtt, &file.name)
    }

    /// Fetch a subtitle by URL and attach it to the selected entry.
    ///
    /// Returns false on any failure; the cause is logged.
    pub async fn load_subtitle_url(&self, url: &str, name: &str) -> bool {
        let Some(entry) = self.playlist.current() else {
            tracing::warn!("No entry selected for subtitle {}", url);
            return false;
        };

        let text = match self.fetcher.fetch_subtitle(url).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to load subtitle: {}", e);
                return false;
            }
        };

        let vtt = to_vtt(url, text);
        match self.attach_vtt(entry.id, vtt, name) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to attach subtitle from {}: {}", url, e);
                false
            }
        }
    }

    /// Unbind the controller and stop its background tasks.
    pub fn dispose(&self) {
        self.controller.dispose();
    }

    fn attach_vtt(&self, id: EntryId, vtt: String, label: &str) -> Result<()> {
        let handle = self.registry().acquire_text(vtt, label);
        self.playlist.attach_subtitle(id, handle, label)?;

        if self.controller.bound_entry() == Some(id) {
            let track = self.playlist.get(id).and_then(|e| e.subtitle);
            self.controller.set_subtitle_track(track.as_ref());
        }
        Ok(())
    }

    fn sync_binding(&self) {
        let _sync = self.sync.lock();
        let bound = self.controller.bound_entry();

        match self.playlist.current() {
            Some(entry) if bound == Some(entry.id) => {}
            Some(entry) => {
                tracing::debug!("Binding {} ({})", entry.name, entry.id);
                let element = self.backend.create_element(&entry);
                self.controller.bind(MediaBinding {
                    entry_id: entry.id,
                    is_audio: entry.is_audio,
                    element,
                });
                self.controller.set_subtitle_track(entry.subtitle.as_ref());
            }
            None if bound.is_some() => self.controller.unbind(),
            None => {}
        }
    }
}

impl Drop for PlayerSession {
    fn drop(&mut self) {
        self.controller.dispose();
    }
}
