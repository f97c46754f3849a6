//! Scene insights
//!
//! Captures the current video frame and asks a remote describer what is on
//! screen. Like subtitle search, the describer is an opaque collaborator;
//! its failures never reach the player.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::busy::BusyGuard;
use crate::error::{PlayerError, Result};
use crate::player::PlayerController;

/// Description used when the describer fails
pub const ANALYSIS_FAILED: &str =
    "Failed to analyze the scene. Please check your connection or API key.";

/// Description used when the describer returns no text
pub const NO_DESCRIPTION: &str = "No description available.";

/// Remote scene description
#[async_trait]
pub trait SceneDescriber: Send + Sync {
    /// Describe a base64-encoded JPEG frame.
    async fn describe_scene(&self, base64_jpeg: &str) -> Result<String>;
}

/// Describe a frame; failures and empty answers become fixed texts.
pub async fn describe_scene_or_fallback(describer: &dyn SceneDescriber, jpeg: &[u8]) -> String {
    let encoded = STANDARD.encode(jpeg);
    match describer.describe_scene(&encoded).await {
        Ok(text) if text.trim().is_empty() => NO_DESCRIPTION.to_string(),
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Scene analysis failed: {}", e);
            ANALYSIS_FAILED.to_string()
        }
    }
}

/// One analysed frame
#[derive(Debug, Clone, PartialEq)]
pub struct SceneAnalysis {
    /// Playback position the frame was captured at
    pub timestamp_secs: f64,
    pub description: String,
}

/// Scene insights panel state
pub struct SceneInsights {
    describer: Arc<dyn SceneDescriber>,
    analyzing: AtomicBool,
    last: Mutex<Option<SceneAnalysis>>,
}

impl SceneInsights {
    pub fn new(describer: Arc<dyn SceneDescriber>) -> Self {
        Self {
            describer,
            analyzing: AtomicBool::new(false),
            last: Mutex::new(None),
        }
    }

    /// Analyse the frame currently shown by the player.
    ///
    /// Returns `None` while another analysis is pending, when nothing is
    /// bound, or when the element cannot provide a frame.
    pub async fn analyze(&self, player: &PlayerController) -> Option<SceneAnalysis> {
        let Some(_busy) = BusyGuard::try_acquire(&self.analyzing) else {
            tracing::debug!("Scene analysis already running, ignoring request");
            return None;
        };

        let analysis = self.capture_and_describe(player).await;
        match &analysis {
            Ok(analysis) => *self.last.lock() = Some(analysis.clone()),
            Err(e) => tracing::debug!("No scene analysis: {}", e),
        }
        analysis.ok()
    }

    async fn capture_and_describe(&self, player: &PlayerController) -> Result<SceneAnalysis> {
        let element = player.element().ok_or(PlayerError::NoSelection)?;
        let timestamp_secs = player.state().current_time_secs;
        let frame = element
            .capture_frame()
            .ok_or_else(|| PlayerError::MediaAction("no frame available".to_string()))?;

        let description = describe_scene_or_fallback(self.describer.as_ref(), &frame).await;
        Ok(SceneAnalysis {
            timestamp_secs,
            description,
        })
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing.load(Ordering::SeqCst)
    }

    /// Most recent analysis
    pub fn last(&self) -> Option<SceneAnalysis> {
        self.last.lock().clone()
    }
}
