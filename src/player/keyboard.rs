//! Keyboard shortcuts

/// Keys the player reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    KeyF,
    KeyM,
    Other(String),
}

impl Key {
    /// Map a physical key code (`"Space"`, `"ArrowLeft"`, `"KeyF"`, ...).
    pub fn from_code(code: &str) -> Self {
        match code {
            "Space" => Key::Space,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "KeyF" => Key::KeyF,
            "KeyM" => Key::KeyM,
            other => Key::Other(other.to_string()),
        }
    }
}

/// What currently holds keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Player,
    /// A text input or text area; player shortcuts are off.
    TextInput,
}

/// Player action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    TogglePlay,
    SeekBackward,
    SeekForward,
    VolumeUp,
    VolumeDown,
    ToggleFullscreen,
    ToggleMute,
}

impl Shortcut {
    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Space => Some(Shortcut::TogglePlay),
            Key::ArrowLeft => Some(Shortcut::SeekBackward),
            Key::ArrowRight => Some(Shortcut::SeekForward),
            Key::ArrowUp => Some(Shortcut::VolumeUp),
            Key::ArrowDown => Some(Shortcut::VolumeDown),
            Key::KeyF => Some(Shortcut::ToggleFullscreen),
            Key::KeyM => Some(Shortcut::ToggleMute),
            Key::Other(_) => None,
        }
    }

    /// Keys whose default action (page scroll) must be suppressed
    pub fn prevents_default(self) -> bool {
        matches!(
            self,
            Shortcut::TogglePlay | Shortcut::VolumeUp | Shortcut::VolumeDown
        )
    }
}

/// Result of a key press, for the host's event handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    /// A shortcut ran
    pub handled: bool,
    /// The host should suppress the key's default action
    pub prevent_default: bool,
}

impl KeyOutcome {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled(shortcut: Shortcut) -> Self {
        Self {
            handled: true,
            prevent_default: shortcut.prevents_default(),
        }
    }
}
