//! Subtitle file kinds accepted by the player

use std::path::Path;

/// Subtitle format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    SubRip, // SRT
    WebVtt, // WebVTT
}

impl SubtitleFormat {
    /// Detect the format from a file name's extension.
    ///
    /// Only `.srt` and `.vtt` are accepted; anything else is `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())?;
        match ext.as_str() {
            "srt" => Some(SubtitleFormat::SubRip),
            "vtt" => Some(SubtitleFormat::WebVtt),
            _ => None,
        }
    }

    /// Human readable name
    pub fn name(&self) -> &'static str {
        match self {
            SubtitleFormat::SubRip => "SubRip (SRT)",
            SubtitleFormat::WebVtt => "WebVTT",
        }
    }
}

/// Check whether a URL points straight at a subtitle file.
pub fn is_direct_subtitle_link(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.ends_with(".srt") || lower.ends_with(".vtt")
}
