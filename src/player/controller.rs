//! Player controller
//!
//! Owns the playback state of the bound media element and the control bar.
//! The element and the presentation environment are driven through their
//! traits; their event streams are pumped into the controller by background
//! tasks and are the only source of truth for play/pause, position, duration
//! and fullscreen.
//!
//! Auto-hide: `show_controls` reveals the bar, cancels the pending hide timer
//! and, when fullscreen and playing, arms a new one. A fired timer re-checks
//! fullscreen and playback against the latest state before hiding.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::PlayerConfig;
use crate::player::element::{
    MediaElement, MediaEvent, MediaEventStream, PresentationEnvironment, PresentationEvent,
    PresentationEventStream,
};
use crate::player::keyboard::{Focus, Key, KeyOutcome, Shortcut};
use crate::player::state::{PlaybackRate, PlaybackState, Volume};
use crate::playlist::{EntryId, SubtitleTrack};

/// A media element to attach to the controller
#[derive(Clone)]
pub struct MediaBinding {
    pub entry_id: EntryId,
    pub is_audio: bool,
    pub element: Arc<dyn MediaElement>,
}

impl std::fmt::Debug for MediaBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaBinding")
            .field("entry_id", &self.entry_id)
            .field("is_audio", &self.is_audio)
            .finish_non_exhaustive()
    }
}

struct Binding {
    media: MediaBinding,
    pump: JoinHandle<()>,
}

#[derive(Default)]
struct Inner {
    state: PlaybackState,
    binding: Option<Binding>,
    /// Bumped on every bind/unbind; events tagged with an older value are dropped
    binding_generation: u64,
    hide_timer: Option<JoinHandle<()>>,
    /// Bumped whenever the hide timer is cancelled or re-armed
    timer_generation: u64,
    presentation_pump: Option<JoinHandle<()>>,
    disposed: bool,
}

impl Inner {
    fn cancel_hide_timer(&mut self) {
        self.timer_generation += 1;
        if let Some(timer) = self.hide_timer.take() {
            timer.abort();
        }
    }

    fn detach(&mut self) {
        self.binding_generation += 1;
        if let Some(binding) = self.binding.take() {
            binding.pump.abort();
        }
    }

    fn element(&self) -> Option<Arc<dyn MediaElement>> {
        self.binding.as_ref().map(|b| b.media.element.clone())
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.cancel_hide_timer();
        self.detach();
        if let Some(pump) = self.presentation_pump.take() {
            pump.abort();
        }
    }
}

struct Shared {
    environment: Arc<dyn PresentationEnvironment>,
    hide_delay: Duration,
    seek_step_secs: f64,
    volume_step: f64,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<PlaybackState>,
}

impl Shared {
    fn publish(&self, inner: &Inner) {
        self.state_tx.send_if_modified(|current| {
            if *current == inner.state {
                false
            } else {
                *current = inner.state.clone();
                true
            }
        });
    }

    /// Reveal the controls and re-arm the hide timer if it applies.
    fn reveal_controls(self: &Arc<Self>, inner: &mut Inner) {
        inner.state.controls_visible = true;
        inner.cancel_hide_timer();

        if inner.state.is_fullscreen && inner.state.is_playing {
            let generation = inner.timer_generation;
            // countdown starts at the trigger, not when the task first runs
            let deadline = tokio::time::Instant::now() + self.hide_delay;
            let weak = Arc::downgrade(self);
            inner.hide_timer = Some(tokio::spawn(async move {
                tokio::time::sleep_until(deadline).await;
                if let Some(shared) = weak.upgrade() {
                    shared.on_hide_timer(generation);
                }
            }));
        }
    }

    fn on_hide_timer(&self, generation: u64) {
        let mut inner = self.inner.lock();
        if inner.timer_generation != generation {
            return;
        }
        inner.hide_timer = None;
        if self.environment.fullscreen_active() && inner.state.is_playing {
            tracing::debug!("Hiding controls");
            inner.state.controls_visible = false;
            self.publish(&inner);
        }
    }

    fn on_media_event(self: &Arc<Self>, generation: u64, event: MediaEvent) {
        let mut inner = self.inner.lock();
        if inner.binding_generation != generation || inner.binding.is_none() {
            tracing::debug!("Dropping stale media event {:?}", event);
            return;
        }

        match event {
            MediaEvent::Play => {
                inner.state.is_playing = true;
                self.reveal_controls(&mut inner);
            }
            MediaEvent::Pause => {
                inner.state.is_playing = false;
                inner.state.controls_visible = true;
                inner.cancel_hide_timer();
            }
            MediaEvent::TimeUpdate(secs) => {
                inner.state.current_time_secs = clamp_time(secs, inner.state.duration_secs);
            }
            MediaEvent::DurationChange(secs) => {
                inner.state.duration_secs = if secs.is_finite() && secs > 0.0 {
                    secs
                } else {
                    0.0
                };
            }
        }
        self.publish(&inner);
    }

    fn on_presentation_event(self: &Arc<Self>, event: PresentationEvent) {
        let mut inner = self.inner.lock();
        match event {
            PresentationEvent::FullscreenChanged(active) => {
                tracing::debug!("Fullscreen changed: {}", active);
                inner.state.is_fullscreen = active;
                if active {
                    self.reveal_controls(&mut inner);
                } else {
                    inner.state.controls_visible = true;
                    inner.cancel_hide_timer();
                }
            }
        }
        self.publish(&inner);
    }

    /// State for a fresh binding; fullscreen and PiP belong to the environment.
    fn reset_state(&self, inner: &mut Inner) {
        inner.state = PlaybackState {
            is_fullscreen: self.environment.fullscreen_active(),
            is_picture_in_picture: self.environment.picture_in_picture_active(),
            ..Default::default()
        };
    }
}

/// Clamp a position into `[0, duration]`, or `[0, inf)` while duration is unknown.
fn clamp_time(secs: f64, duration: f64) -> f64 {
    if !secs.is_finite() {
        return 0.0;
    }
    let secs = secs.max(0.0);
    if duration > 0.0 {
        secs.min(duration)
    } else {
        secs
    }
}

/// Keyboard seek target, clamped into `[0, duration]` even while the
/// duration is still unknown (0).
fn step_target(state: &PlaybackState, delta: f64) -> f64 {
    (state.current_time_secs + delta)
        .min(state.duration_secs)
        .max(0.0)
}

fn spawn_media_pump(weak: Weak<Shared>, generation: u64, mut events: MediaEventStream) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let Some(shared) = weak.upgrade() else {
                break;
            };
            shared.on_media_event(generation, event);
        }
    })
}

fn spawn_presentation_pump(weak: Weak<Shared>, mut events: PresentationEventStream) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let Some(shared) = weak.upgrade() else {
                break;
            };
            shared.on_presentation_event(event);
        }
    })
}

/// Player controller. Cheap to clone; all clones drive the same player.
///
/// Must be created inside a tokio runtime.
#[derive(Clone)]
pub struct PlayerController {
    shared: Arc<Shared>,
}

impl PlayerController {
    pub fn new(environment: Arc<dyn PresentationEnvironment>, config: &PlayerConfig) -> Self {
        let events = environment.subscribe();
        let mut state = PlaybackState::default();
        state.is_fullscreen = environment.fullscreen_active();
        state.is_picture_in_picture = environment.picture_in_picture_active();
        let (state_tx, _) = watch::channel(state.clone());
        let mut inner = Inner::default();
        inner.state = state;

        let shared = Arc::new(Shared {
            environment,
            hide_delay: config.controls.hide_delay(),
            seek_step_secs: config.keyboard.seek_step_secs,
            volume_step: config.keyboard.volume_step,
            inner: Mutex::new(inner),
            state_tx,
        });

        let pump = spawn_presentation_pump(Arc::downgrade(&shared), events);
        shared.inner.lock().presentation_pump = Some(pump);

        Self { shared }
    }

    /// Attach a media element, replacing the previous one.
    ///
    /// State is reset and events still queued from the previous element
    /// are discarded.
    pub fn bind(&self, media: MediaBinding) {
        let events = media.element.subscribe();
        let shared = &self.shared;
        let mut inner = shared.inner.lock();
        if inner.disposed {
            tracing::warn!("Ignoring bind of {} on a disposed controller", media.entry_id);
            return;
        }

        inner.cancel_hide_timer();
        inner.detach();
        shared.reset_state(&mut inner);

        let generation = inner.binding_generation;
        let pump = spawn_media_pump(Arc::downgrade(shared), generation, events);
        tracing::debug!("Bound entry {} (generation {})", media.entry_id, generation);
        inner.binding = Some(Binding { media, pump });
        shared.publish(&inner);
    }

    /// Detach the current media element, if any.
    pub fn unbind(&self) {
        let shared = &self.shared;
        let mut inner = shared.inner.lock();
        inner.cancel_hide_timer();
        if inner.binding.is_some() {
            tracing::debug!("Unbound media element");
        }
        inner.detach();
        shared.reset_state(&mut inner);
        shared.publish(&inner);
    }

    /// Tear down every subscription and the hide timer. Further binds are ignored.
    pub fn dispose(&self) {
        self.unbind();
        let mut inner = self.shared.inner.lock();
        inner.disposed = true;
        if let Some(pump) = inner.presentation_pump.take() {
            pump.abort();
        }
    }

    pub fn bound_entry(&self) -> Option<EntryId> {
        self.shared
            .inner
            .lock()
            .binding
            .as_ref()
            .map(|b| b.media.entry_id)
    }

    pub fn element(&self) -> Option<Arc<dyn MediaElement>> {
        self.shared.inner.lock().element()
    }

    pub fn is_audio(&self) -> bool {
        self.shared
            .inner
            .lock()
            .binding
            .as_ref()
            .is_some_and(|b| b.media.is_audio)
    }

    pub fn state(&self) -> PlaybackState {
        self.shared.inner.lock().state.clone()
    }

    /// Watch every published state snapshot
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.shared.state_tx.subscribe()
    }

    /// Reveal the controls and restart the auto-hide countdown.
    pub fn show_controls(&self) {
        let mut inner = self.shared.inner.lock();
        self.shared.reveal_controls(&mut inner);
        self.shared.publish(&inner);
    }

    /// Request play or pause. `is_playing` follows the element's events.
    pub fn toggle_play(&self) {
        self.show_controls();
        let (element, playing) = {
            let inner = self.shared.inner.lock();
            let Some(element) = inner.element() else {
                return;
            };
            (element, inner.state.is_playing)
        };

        if playing {
            element.pause();
        } else {
            tokio::spawn(async move {
                if let Err(e) = element.play().await {
                    tracing::warn!("Play request rejected: {}", e);
                }
            });
        }
    }

    /// Move the playback position. `current_time_secs` follows the next time update.
    pub fn seek(&self, secs: f64) {
        self.show_controls();
        let (element, target) = {
            let inner = self.shared.inner.lock();
            let Some(element) = inner.element() else {
                return;
            };
            (element, clamp_time(secs, inner.state.duration_secs))
        };
        element.set_current_time(target);
    }

    /// Set the volume; zero mutes, anything else unmutes.
    pub fn set_volume(&self, volume: f64) {
        self.show_controls();
        let shared = &self.shared;
        let mut inner = shared.inner.lock();
        let Some(element) = inner.element() else {
            return;
        };
        let volume = Volume::new(volume);
        let muted = volume.is_silent();
        element.set_volume(volume.value());
        element.set_muted(muted);
        inner.state.volume = volume;
        inner.state.is_muted = muted;
        shared.publish(&inner);
    }

    pub fn toggle_mute(&self) {
        self.show_controls();
        let shared = &self.shared;
        let mut inner = shared.inner.lock();
        let Some(element) = inner.element() else {
            return;
        };
        let muted = !inner.state.is_muted;
        element.set_muted(muted);
        inner.state.is_muted = muted;
        shared.publish(&inner);
    }

    pub fn set_rate(&self, rate: PlaybackRate) {
        self.show_controls();
        let shared = &self.shared;
        let mut inner = shared.inner.lock();
        let Some(element) = inner.element() else {
            return;
        };
        element.set_playback_rate(rate.value());
        inner.state.playback_rate = rate;
        shared.publish(&inner);
    }

    /// Enter or leave fullscreen. `is_fullscreen` follows the environment's events.
    pub fn toggle_fullscreen(&self) {
        if self.shared.inner.lock().binding.is_none() {
            return;
        }
        let environment = self.shared.environment.clone();
        tokio::spawn(async move {
            let result = if environment.fullscreen_active() {
                environment.exit_fullscreen().await
            } else {
                environment.request_fullscreen().await
            };
            if let Err(e) = result {
                tracing::warn!("Fullscreen request failed: {}", e);
            }
        });
    }

    /// Enter or leave picture-in-picture for the bound video.
    ///
    /// Returns true when the request succeeded and the state changed.
    pub async fn toggle_picture_in_picture(&self) -> bool {
        let generation = {
            let inner = self.shared.inner.lock();
            match &inner.binding {
                Some(binding) if !binding.media.is_audio => inner.binding_generation,
                _ => return false,
            }
        };

        let environment = &self.shared.environment;
        let entering = !environment.picture_in_picture_active();
        let result = if entering {
            environment.request_picture_in_picture().await
        } else {
            environment.exit_picture_in_picture().await
        };
        if let Err(e) = result {
            tracing::warn!("Picture-in-picture request failed: {}", e);
            return false;
        }

        let mut inner = self.shared.inner.lock();
        if inner.binding_generation != generation {
            // rebound while the request was pending; the reset already re-read the environment
            return true;
        }
        inner.state.is_picture_in_picture = entering;
        self.shared.publish(&inner);
        true
    }

    /// Replace the subtitle track on the bound element.
    pub fn set_subtitle_track(&self, track: Option<&SubtitleTrack>) {
        if let Some(element) = self.element() {
            element.set_subtitle_track(track);
        }
    }

    pub fn pointer_moved(&self) {
        self.show_controls();
    }

    pub fn clicked(&self) {
        self.show_controls();
    }

    /// Click on the video surface
    pub fn video_clicked(&self) {
        self.toggle_play();
    }

    pub fn video_double_clicked(&self) {
        self.show_controls();
        self.toggle_fullscreen();
    }

    /// Handle a key press.
    ///
    /// Every key press reveals the controls. Shortcuts are skipped while a
    /// text input holds focus or nothing is bound.
    pub fn handle_key(&self, key: &Key, focus: Focus) -> KeyOutcome {
        self.show_controls();
        if focus == Focus::TextInput {
            return KeyOutcome::ignored();
        }
        let Some(shortcut) = Shortcut::from_key(key) else {
            return KeyOutcome::ignored();
        };

        let (is_audio, state) = {
            let inner = self.shared.inner.lock();
            let Some(binding) = &inner.binding else {
                return KeyOutcome::ignored();
            };
            (binding.media.is_audio, inner.state.clone())
        };

        let seek_step = self.shared.seek_step_secs;
        let volume_step = self.shared.volume_step;
        match shortcut {
            Shortcut::TogglePlay => self.toggle_play(),
            Shortcut::SeekBackward => self.seek(step_target(&state, -seek_step)),
            Shortcut::SeekForward => self.seek(step_target(&state, seek_step)),
            Shortcut::VolumeUp => self.set_volume(state.volume.step(volume_step).value()),
            Shortcut::VolumeDown => self.set_volume(state.volume.step(-volume_step).value()),
            Shortcut::ToggleFullscreen if is_audio => return KeyOutcome::ignored(),
            Shortcut::ToggleFullscreen => self.toggle_fullscreen(),
            Shortcut::ToggleMute => self.toggle_mute(),
        }
        KeyOutcome::handled(shortcut)
    }
}

impl std::fmt::Debug for PlayerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerController")
            .field("state", &self.state())
            .field("bound_entry", &self.bound_entry())
            .finish()
    }
}
