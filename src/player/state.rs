//! Playback state snapshot and its value types.

use serde::Serialize;

use crate::error::PlayerError;

/// Volume level, always within 0.0–1.0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Volume(f64);

impl Volume {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 1.0;

    /// Creates a volume level, clamping to the valid range. NaN is silence.
    #[must_use]
    pub fn new(volume: f64) -> Self {
        if volume.is_nan() {
            return Self(Self::MIN);
        }
        Self(volume.clamp(Self::MIN, Self::MAX))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// True for exactly zero, the level that forces mute.
    #[must_use]
    pub fn is_silent(self) -> bool {
        self.0 == Self::MIN
    }

    /// Moves by `delta`, snapping to hundredths so repeated steps land on 0.0 and 1.0 exactly.
    #[must_use]
    pub fn step(self, delta: f64) -> Self {
        Self::new(((self.0 + delta) * 100.0).round() / 100.0)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

/// Playback rates offered by the rate menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "f64")]
pub enum PlaybackRate {
    Half,
    ThreeQuarters,
    #[default]
    Normal,
    OneAndQuarter,
    OneAndHalf,
    Double,
}

impl PlaybackRate {
    /// Menu order
    pub const ALL: [PlaybackRate; 6] = [
        PlaybackRate::Half,
        PlaybackRate::ThreeQuarters,
        PlaybackRate::Normal,
        PlaybackRate::OneAndQuarter,
        PlaybackRate::OneAndHalf,
        PlaybackRate::Double,
    ];

    pub fn value(self) -> f64 {
        match self {
            PlaybackRate::Half => 0.5,
            PlaybackRate::ThreeQuarters => 0.75,
            PlaybackRate::Normal => 1.0,
            PlaybackRate::OneAndQuarter => 1.25,
            PlaybackRate::OneAndHalf => 1.5,
            PlaybackRate::Double => 2.0,
        }
    }

    /// Menu label, e.g. `1.25x` or `1x (Normal)`
    pub fn label(self) -> String {
        match self {
            PlaybackRate::Normal => "1x (Normal)".to_string(),
            other => format!("{}x", other.value()),
        }
    }
}

impl From<PlaybackRate> for f64 {
    fn from(rate: PlaybackRate) -> Self {
        rate.value()
    }
}

impl TryFrom<f64> for PlaybackRate {
    type Error = PlayerError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        PlaybackRate::ALL
            .into_iter()
            .find(|r| r.value() == value)
            .ok_or_else(|| PlayerError::MediaAction(format!("unsupported playback rate {}", value)))
    }
}

/// Transient state of the bound media and the control bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time_secs: f64,
    /// 0 until the media reports a finite duration
    pub duration_secs: f64,
    pub volume: Volume,
    pub is_muted: bool,
    pub playback_rate: PlaybackRate,
    pub is_fullscreen: bool,
    pub is_picture_in_picture: bool,
    pub controls_visible: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time_secs: 0.0,
            duration_secs: 0.0,
            volume: Volume::default(),
            is_muted: false,
            playback_rate: PlaybackRate::Normal,
            is_fullscreen: false,
            is_picture_in_picture: false,
            controls_visible: true,
        }
    }
}

impl PlaybackState {
    pub fn duration_known(&self) -> bool {
        self.duration_secs > 0.0
    }

    /// Played fraction in 0.0–1.0 for the progress bar
    pub fn progress(&self) -> f64 {
        if self.duration_known() {
            (self.current_time_secs / self.duration_secs).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// The pointer is hidden together with the controls, in fullscreen only.
    pub fn cursor_hidden(&self) -> bool {
        self.is_fullscreen && !self.controls_visible
    }
}

/// Format seconds as `MM:SS`, or `HH:MM:SS` from one hour on.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }
    let total = seconds.floor() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{:02}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}
