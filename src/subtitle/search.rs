//! Online subtitle search
//!
//! The search itself is done by an opaque remote collaborator, typically a
//! model with web search. This module defines that contract, the fallback
//! applied when it fails, and the busy-guarded panel state that drives it.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::busy::BusyGuard;
use crate::error::{PlayerError, Result};
use crate::session::PlayerSession;
use crate::subtitle::format::is_direct_subtitle_link;

/// Summary used when the finder returns an empty text
pub const DEFAULT_SEARCH_SUMMARY: &str = "I found some potential subtitle sources for you.";

/// Summary used when the search fails
pub const SEARCH_FAILED_SUMMARY: &str = "Failed to search for subtitles online.";

/// Title used for a source without one
pub const DEFAULT_SOURCE_TITLE: &str = "Subtitle Source";

/// Shown when a direct link cannot be loaded. A missing file and a blocked
/// cross-origin request look the same from here, so both get this message.
pub const DIRECT_LOAD_FAILED: &str =
    "Could not load directly (CORS). Please download and drag the file into the player.";

/// A place where subtitles for a title might be found
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleSource {
    pub title: String,
    pub url: String,
    /// Host name of the URL without a leading `www.`
    pub source_label: String,
    /// URL ends in `.srt` or `.vtt` and can be loaded without a download step
    pub is_direct_link: bool,
}

impl SubtitleSource {
    /// Build a source from a search hit.
    pub fn from_url(title: Option<&str>, url: &str) -> Result<Self> {
        let parsed =
            url::Url::parse(url).map_err(|e| PlayerError::Remote(format!("invalid url {}: {}", url, e)))?;
        let host = parsed.host_str().unwrap_or_default();
        let source_label = host.strip_prefix("www.").unwrap_or(host).to_string();

        Ok(Self {
            title: title
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_SOURCE_TITLE)
                .to_string(),
            url: url.to_string(),
            source_label,
            is_direct_link: is_direct_subtitle_link(url),
        })
    }
}

/// Result of a subtitle search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtitleSearchResult {
    pub summary: String,
    pub sources: Vec<SubtitleSource>,
}

/// Remote subtitle search
#[async_trait]
pub trait SubtitleFinder: Send + Sync {
    async fn find_subtitles(&self, title: &str) -> Result<SubtitleSearchResult>;
}

/// Run a search; failures become an empty result with a fixed summary.
pub async fn find_subtitles_or_fallback(
    finder: &dyn SubtitleFinder,
    title: &str,
) -> SubtitleSearchResult {
    match finder.find_subtitles(title).await {
        Ok(mut result) => {
            if result.summary.trim().is_empty() {
                result.summary = DEFAULT_SEARCH_SUMMARY.to_string();
            }
            result
        }
        Err(e) => {
            tracing::warn!("Failed to find subtitles for {:?}: {}", title, e);
            SubtitleSearchResult {
                summary: SEARCH_FAILED_SUMMARY.to_string(),
                sources: Vec::new(),
            }
        }
    }
}

/// The direct load in progress; clears the slot when dropped.
struct DirectLoad<'a> {
    slot: &'a Mutex<Option<String>>,
}

impl<'a> DirectLoad<'a> {
    fn start(slot: &'a Mutex<Option<String>>, url: &str) -> Option<Self> {
        let mut loading = slot.lock();
        if loading.is_some() {
            return None;
        }
        *loading = Some(url.to_string());
        Some(Self { slot })
    }
}

impl Drop for DirectLoad<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = None;
    }
}

/// Subtitle search panel state
pub struct SubtitleSearch {
    finder: Arc<dyn SubtitleFinder>,
    searching: AtomicBool,
    /// URL currently being loaded directly, if any
    loading_direct: Mutex<Option<String>>,
    results: Mutex<Option<SubtitleSearchResult>>,
    error: Mutex<Option<String>>,
}

impl SubtitleSearch {
    pub fn new(finder: Arc<dyn SubtitleFinder>) -> Self {
        Self {
            finder,
            searching: AtomicBool::new(false),
            loading_direct: Mutex::new(None),
            results: Mutex::new(None),
            error: Mutex::new(None),
        }
    }

    /// Search for `title`. Returns `None` without doing anything when a
    /// search is already running.
    pub async fn search(&self, title: &str) -> Option<SubtitleSearchResult> {
        let Some(_busy) = BusyGuard::try_acquire(&self.searching) else {
            tracing::debug!("Subtitle search already running, ignoring request");
            return None;
        };
        *self.error.lock() = None;

        let result = find_subtitles_or_fallback(self.finder.as_ref(), title).await;
        *self.results.lock() = Some(result.clone());
        Some(result)
    }

    /// Load a direct link into the session's current entry.
    ///
    /// Returns true on success. On failure the panel error is set to
    /// [`DIRECT_LOAD_FAILED`]. Only one direct load runs at a time; a second
    /// request while one is pending returns false and changes nothing.
    pub async fn load_direct(&self, session: &PlayerSession, source: &SubtitleSource) -> bool {
        let Some(_loading) = DirectLoad::start(&self.loading_direct, &source.url) else {
            return false;
        };
        *self.error.lock() = None;

        let loaded = session.load_subtitle_url(&source.url, &source.title).await;
        if !loaded {
            *self.error.lock() = Some(DIRECT_LOAD_FAILED.to_string());
        }
        loaded
    }

    /// Whether a search is running (busy indicator)
    pub fn is_searching(&self) -> bool {
        self.searching.load(Ordering::SeqCst)
    }

    /// URL of the direct load in progress
    pub fn loading_direct(&self) -> Option<String> {
        self.loading_direct.lock().clone()
    }

    /// Last search result
    pub fn results(&self) -> Option<SubtitleSearchResult> {
        self.results.lock().clone()
    }

    /// Error message to show, if any
    pub fn error(&self) -> Option<String> {
        self.error.lock().clone()
    }
}
