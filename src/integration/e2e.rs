//! End-to-end session tests
//!
//! Each test builds a session over the fakes in `fixtures` and drives it the
//! way a host UI would: file intake, selection, controls, keyboard and the
//! subtitle and insight panels.

use std::sync::Arc;
use std::time::Duration;

use crate::config::PlayerConfig;
use crate::integration::fixtures::*;
use crate::player::MediaEvent;
use crate::session::PlayerSession;

/// A session together with handles to its fakes
pub struct Harness {
    pub session: PlayerSession,
    pub backend: Arc<FakeBackend>,
    pub environment: Arc<FakeEnvironment>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_fetcher(StaticFetcher::new())
    }

    pub fn with_fetcher(fetcher: StaticFetcher) -> Self {
        let backend = Arc::new(FakeBackend::new());
        let environment = Arc::new(FakeEnvironment::new());
        let session = PlayerSession::new(
            environment.clone(),
            backend.clone(),
            Arc::new(fetcher),
            &PlayerConfig::default(),
        );
        Self {
            session,
            backend,
            environment,
        }
    }

    /// Element bound to the selected entry
    pub fn element(&self) -> Arc<FakeElement> {
        self.backend.last().expect("no element created")
    }

    /// Start playback of the bound element and enter fullscreen
    pub async fn play_fullscreen(&self) {
        let controller = self.session.controller();
        controller.toggle_play();
        settle().await;
        controller.toggle_fullscreen();
        settle().await;
        let state = controller.state();
        assert!(state.is_playing && state.is_fullscreen && state.controls_visible);
    }
}

const HIDE_DELAY: Duration = Duration::from_millis(3000);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlayerError;
    use crate::insights::{SceneInsights, ANALYSIS_FAILED};
    use crate::player::{Focus, Key};
    use crate::subtitle::search::{SubtitleSearch, SubtitleSearchResult, SubtitleSource, DIRECT_LOAD_FAILED};

    #[tokio::test(start_paused = true)]
    async fn test_first_file_is_bound() {
        let h = Harness::new();
        let ids = h.session.add_files(vec![video("a.mp4"), audio("b.mp3")]);

        assert_eq!(h.session.controller().bound_entry(), Some(ids[0]));
        assert_eq!(h.backend.created_for(), vec![ids[0]]);
        assert!(!h.session.controller().is_audio());

        assert!(h.session.next());
        assert_eq!(h.session.controller().bound_entry(), Some(ids[1]));
        assert!(h.session.controller().is_audio());
        assert!(!h.session.next());
    }

    #[tokio::test(start_paused = true)]
    async fn test_removing_selected_rebinds_successor() {
        let h = Harness::new();
        let ids = h
            .session
            .add_files(vec![video("A"), video("B"), video("C"), video("D")]);
        h.session.select(1).unwrap();

        assert!(h.session.remove_entry(ids[0]));
        assert_eq!(h.session.playlist().current_index(), Some(0));
        assert_eq!(h.session.controller().bound_entry(), Some(ids[1]));

        assert!(h.session.remove_entry(ids[2]));
        assert_eq!(h.session.controller().bound_entry(), Some(ids[1]));

        assert!(h.session.remove_entry(ids[1]));
        assert_eq!(h.session.playlist().current().unwrap().name, "D");
        assert_eq!(h.session.controller().bound_entry(), Some(ids[3]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_unbinds_and_releases() {
        let h = Harness::new();
        h.session.add_files(vec![video("a"), video("b")]);
        h.session
            .add_subtitle_file(&text_file("a.srt", SAMPLE_SRT))
            .unwrap();
        assert_eq!(h.session.registry().live_count(), 3);

        assert_eq!(h.session.clear(), 2);
        assert!(h.session.controller().bound_entry().is_none());
        let stats = h.session.registry().stats();
        assert_eq!(stats.live, 0);
        assert_eq!(stats.acquired, stats.released);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_releases_everything() {
        let h = Harness::new();
        h.session.add_files(vec![video("a"), audio("b")]);
        let registry = h.session.registry().clone();
        drop(h);
        assert_eq!(registry.live_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_out_of_range() {
        let h = Harness::new();
        h.session.add_files(vec![video("a")]);
        assert!(matches!(
            h.session.select(3),
            Err(PlayerError::SelectionOutOfRange { index: 3, len: 1 })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_controls_hide_after_delay() {
        let h = Harness::new();
        h.session.add_files(vec![video("a")]);
        h.play_fullscreen().await;

        tokio::time::advance(HIDE_DELAY - Duration::from_millis(1)).await;
        settle().await;
        assert!(h.session.controller().state().controls_visible);

        tokio::time::advance(Duration::from_millis(2)).await;
        settle().await;
        let state = h.session.controller().state();
        assert!(!state.controls_visible);
        assert!(state.cursor_hidden());

        h.session.controller().pointer_moved();
        assert!(h.session.controller().state().controls_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_restarts_countdown() {
        let h = Harness::new();
        h.session.add_files(vec![video("a")]);
        h.play_fullscreen().await;

        tokio::time::advance(Duration::from_millis(2000)).await;
        settle().await;
        h.session.controller().pointer_moved();

        tokio::time::advance(Duration::from_millis(2000)).await;
        settle().await;
        assert!(h.session.controller().state().controls_visible);

        tokio::time::advance(Duration::from_millis(1001)).await;
        settle().await;
        assert!(!h.session.controller().state().controls_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_pins_controls() {
        let h = Harness::new();
        h.session.add_files(vec![video("a")]);
        h.play_fullscreen().await;

        tokio::time::advance(Duration::from_millis(1000)).await;
        settle().await;
        h.session.controller().toggle_play();
        settle().await;
        assert!(!h.session.controller().state().is_playing);

        tokio::time::advance(HIDE_DELAY * 3).await;
        settle().await;
        assert!(h.session.controller().state().controls_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_controls_stay_outside_fullscreen() {
        let h = Harness::new();
        h.session.add_files(vec![video("a")]);
        h.session.controller().toggle_play();
        settle().await;

        tokio::time::advance(HIDE_DELAY * 2).await;
        settle().await;
        assert!(h.session.controller().state().controls_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_fullscreen_reveals_controls() {
        let h = Harness::new();
        h.session.add_files(vec![video("a")]);
        h.play_fullscreen().await;

        tokio::time::advance(HIDE_DELAY + Duration::from_millis(1)).await;
        settle().await;
        assert!(!h.session.controller().state().controls_visible);

        h.environment.leave_fullscreen_externally();
        settle().await;
        let state = h.session.controller().state();
        assert!(!state.is_fullscreen);
        assert!(state.controls_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_events_ignored_after_rebind() {
        let h = Harness::new();
        h.session.add_files(vec![video("a"), video("b")]);
        let first = h.element();

        first.emit(MediaEvent::DurationChange(60.0));
        first.emit(MediaEvent::Play);
        h.session.next();
        settle().await;

        let state = h.session.controller().state();
        assert!(!state.is_playing);
        assert_eq!(state.duration_secs, 0.0);

        let second = h.element();
        second.emit(MediaEvent::TimeUpdate(12.0));
        settle().await;
        assert_eq!(h.session.controller().state().current_time_secs, 12.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rebind_resets_state() {
        let h = Harness::new();
        h.session.add_files(vec![video("a"), video("b")]);
        h.session.controller().set_volume(0.0);
        assert!(h.session.controller().state().is_muted);

        h.session.next();
        let state = h.session.controller().state();
        assert!(!state.is_muted);
        assert_eq!(state.volume.value(), 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_picture_in_picture() {
        let h = Harness::new();
        h.session.add_files(vec![video("a"), audio("b")]);
        let controller = h.session.controller();

        h.environment.reject_picture_in_picture(true);
        assert!(!controller.toggle_picture_in_picture().await);
        assert!(!controller.state().is_picture_in_picture);

        h.environment.reject_picture_in_picture(false);
        assert!(controller.toggle_picture_in_picture().await);
        assert!(controller.state().is_picture_in_picture);
        assert!(controller.toggle_picture_in_picture().await);
        assert!(!controller.state().is_picture_in_picture);

        h.session.next();
        assert!(!controller.toggle_picture_in_picture().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keyboard_ignored_in_text_input() {
        let h = Harness::new();
        h.session.add_files(vec![video("a")]);
        let controller = h.session.controller();
        let before = controller.state();

        for code in ["Space", "ArrowLeft", "ArrowRight", "ArrowUp", "ArrowDown", "KeyM", "KeyF"] {
            let outcome = controller.handle_key(&Key::from_code(code), Focus::TextInput);
            assert!(!outcome.handled);
            assert!(!outcome.prevent_default);
        }
        settle().await;

        assert!(h.element().calls().is_empty());
        assert_eq!(controller.state(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keyboard_shortcuts() {
        let h = Harness::new();
        h.session.add_files(vec![video("a")]);
        let controller = h.session.controller();
        let element = h.element();

        let outcome = controller.handle_key(&Key::Space, Focus::Player);
        assert!(outcome.handled && outcome.prevent_default);
        settle().await;
        assert!(controller.state().is_playing);

        element.emit(MediaEvent::DurationChange(100.0));
        element.emit(MediaEvent::TimeUpdate(98.0));
        settle().await;
        let outcome = controller.handle_key(&Key::ArrowRight, Focus::Player);
        assert!(outcome.handled && !outcome.prevent_default);
        assert_eq!(element.calls().last().map(String::as_str), Some("set_current_time 100"));

        element.emit(MediaEvent::TimeUpdate(2.0));
        settle().await;
        controller.handle_key(&Key::ArrowLeft, Focus::Player);
        assert_eq!(element.calls().last().map(String::as_str), Some("set_current_time 0"));

        for _ in 0..10 {
            controller.handle_key(&Key::ArrowDown, Focus::Player);
        }
        assert!(controller.state().volume.is_silent());
        assert!(controller.state().is_muted);

        controller.handle_key(&Key::ArrowUp, Focus::Player);
        let state = controller.state();
        assert_eq!(state.volume.value(), 0.1);
        assert!(!state.is_muted);

        controller.handle_key(&Key::KeyM, Focus::Player);
        assert!(controller.state().is_muted);

        controller.handle_key(&Key::KeyF, Focus::Player);
        settle().await;
        assert!(controller.state().is_fullscreen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fullscreen_key_ignored_for_audio() {
        let h = Harness::new();
        h.session.add_files(vec![audio("a.mp3")]);
        let outcome = h.session.controller().handle_key(&Key::KeyF, Focus::Player);
        settle().await;
        assert!(!outcome.handled);
        assert!(!h.session.controller().state().is_fullscreen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_key_reveals_controls_even_in_text_input() {
        let h = Harness::new();
        h.session.add_files(vec![video("a")]);
        h.play_fullscreen().await;
        tokio::time::advance(HIDE_DELAY + Duration::from_millis(1)).await;
        settle().await;
        assert!(!h.session.controller().state().controls_visible);

        h.session
            .controller()
            .handle_key(&Key::from_code("KeyA"), Focus::TextInput);
        assert!(h.session.controller().state().controls_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_srt_file_attached_as_vtt() {
        let h = Harness::new();
        let ids = h.session.add_files(vec![video("movie.mp4")]);
        h.session
            .add_subtitle_file(&text_file("movie.srt", SAMPLE_SRT))
            .unwrap();

        let track = h.element().subtitle().expect("track pushed to element");
        assert_eq!(track.label, "movie.srt");
        assert_eq!(h.session.playlist().get(ids[0]).unwrap().subtitle, Some(track.clone()));

        let vtt = h.session.registry().resolve(&track.url).unwrap();
        let vtt = String::from_utf8(vtt.to_vec()).unwrap();
        assert!(vtt.starts_with("WEBVTT\n\n1\n00:00:01.000 --> 00:00:04.000\nHello"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacing_subtitle_releases_previous() {
        let h = Harness::new();
        h.session.add_files(vec![video("movie.mp4")]);
        h.session
            .add_subtitle_file(&text_file("one.srt", SAMPLE_SRT))
            .unwrap();
        let first = h.element().subtitle().unwrap();

        h.session
            .add_subtitle_file(&text_file("two.vtt", SAMPLE_VTT))
            .unwrap();
        let second = h.element().subtitle().unwrap();

        assert_ne!(first.url, second.url);
        assert!(h.session.registry().resolve(&first.url).is_none());
        assert_eq!(h.session.registry().live_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subtitle_file_errors() {
        let h = Harness::new();
        assert!(matches!(
            h.session.add_subtitle_file(&text_file("a.srt", SAMPLE_SRT)),
            Err(PlayerError::NoSelection)
        ));

        h.session.add_files(vec![video("a")]);
        assert!(matches!(
            h.session.add_subtitle_file(&text_file("a.txt", SAMPLE_SRT)),
            Err(PlayerError::UnsupportedSubtitle(_))
        ));
        assert_eq!(h.session.registry().live_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subtitle_kept_across_rebind() {
        let h = Harness::new();
        h.session.add_files(vec![video("a"), video("b")]);
        h.session
            .add_subtitle_file(&text_file("a.srt", SAMPLE_SRT))
            .unwrap();

        h.session.next();
        assert!(h.element().subtitle().is_none());

        h.session.previous();
        assert_eq!(h.element().subtitle().unwrap().label, "a.srt");
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_subtitle_url() {
        let url = "https://subs.example.org/movie.srt";
        let h = Harness::with_fetcher(StaticFetcher::new().with(url, SAMPLE_SRT));
        h.session.add_files(vec![video("movie.mp4")]);

        assert!(h.session.load_subtitle_url(url, "English").await);
        let track = h.element().subtitle().unwrap();
        assert_eq!(track.label, "English");
        let vtt = h.session.registry().resolve(&track.url).unwrap();
        assert!(vtt.starts_with(b"WEBVTT\n\n"));

        assert!(!h.session.load_subtitle_url("https://subs.example.org/missing.srt", "x").await);
        assert_eq!(h.element().subtitle(), Some(track));
    }

    #[tokio::test(start_paused = true)]
    async fn test_direct_load_failure_message() {
        let url = "https://subs.example.org/movie.vtt";
        let h = Harness::with_fetcher(StaticFetcher::new().with(url, SAMPLE_VTT));
        h.session.add_files(vec![video("movie.mp4")]);

        let result = SubtitleSearchResult {
            summary: "Found one".to_string(),
            sources: vec![
                SubtitleSource::from_url(Some("Movie"), url).unwrap(),
                SubtitleSource::from_url(None, "https://cdn.example.org/gone.srt").unwrap(),
            ],
        };
        let panel = SubtitleSearch::new(Arc::new(StaticFinder::new(result)));
        let found = panel.search("Movie").await.unwrap();
        assert_eq!(found.summary, "Found one");

        assert!(panel.load_direct(&h.session, &found.sources[0]).await);
        assert!(panel.error().is_none());

        assert!(!panel.load_direct(&h.session, &found.sources[1]).await);
        assert_eq!(panel.error().as_deref(), Some(DIRECT_LOAD_FAILED));
        assert!(panel.loading_direct().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_search_can_be_retried() {
        let (finder, gate) = StaticFinder::gated(SubtitleSearchResult {
            summary: "Found".to_string(),
            sources: Vec::new(),
        });
        let panel = SubtitleSearch::new(Arc::new(finder));

        let cancelled = tokio::time::timeout(Duration::from_millis(10), panel.search("Movie")).await;
        assert!(cancelled.is_err());
        assert!(!panel.is_searching());

        gate.notify_one();
        let retried = panel.search("Movie").await.unwrap();
        assert_eq!(retried.summary, "Found");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_direct_load_can_be_retried() {
        let url = "https://subs.example.org/movie.vtt";
        let (fetcher, gate) = StaticFetcher::new().with(url, SAMPLE_VTT).gated();
        let h = Harness::with_fetcher(fetcher);
        h.session.add_files(vec![video("movie.mp4")]);

        let source = SubtitleSource::from_url(Some("Movie"), url).unwrap();
        let panel = SubtitleSearch::new(Arc::new(StaticFinder::new(SubtitleSearchResult::default())));

        let cancelled =
            tokio::time::timeout(Duration::from_millis(10), panel.load_direct(&h.session, &source)).await;
        assert!(cancelled.is_err());
        assert!(panel.loading_direct().is_none());

        gate.notify_one();
        assert!(panel.load_direct(&h.session, &source).await);
        assert!(h.element().subtitle().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_busy_guarded() {
        let (finder, gate) = StaticFinder::gated(SubtitleSearchResult::default());
        let panel = SubtitleSearch::new(Arc::new(finder));

        let (first, second) = tokio::join!(panel.search("Movie"), async {
            settle().await;
            assert!(panel.is_searching());
            let second = panel.search("Movie").await;
            gate.notify_one();
            second
        });
        assert!(first.is_some());
        assert!(second.is_none());
        assert!(!panel.is_searching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scene_analysis() {
        let h = Harness::new();
        h.session.add_files(vec![video("a")]);
        let element = h.element();
        element.set_frame(&[0xff, 0xd8, 0xff]);
        element.emit(MediaEvent::TimeUpdate(42.0));
        settle().await;

        let describer = Arc::new(StaticDescriber::answering("Two people talking"));
        let insights = SceneInsights::new(describer.clone());
        let analysis = insights.analyze(h.session.controller()).await.unwrap();

        assert_eq!(analysis.timestamp_secs, 42.0);
        assert_eq!(analysis.description, "Two people talking");
        assert_eq!(describer.received(), vec!["/9j/".to_string()]);
        assert_eq!(insights.last(), Some(analysis));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scene_analysis_fallback_and_guard() {
        let h = Harness::new();
        h.session.add_files(vec![video("a")]);
        h.element().set_frame(b"jpeg");

        let failing = SceneInsights::new(Arc::new(StaticDescriber::failing()));
        let analysis = failing.analyze(h.session.controller()).await.unwrap();
        assert_eq!(analysis.description, ANALYSIS_FAILED);

        let (describer, gate) = StaticDescriber::gated("A beach");
        let insights = SceneInsights::new(Arc::new(describer));
        let controller = h.session.controller();
        let (first, second) = tokio::join!(insights.analyze(controller), async {
            settle().await;
            assert!(insights.is_analyzing());
            let second = insights.analyze(controller).await;
            gate.notify_one();
            second
        });
        assert_eq!(first.unwrap().description, "A beach");
        assert!(second.is_none());
        assert!(!insights.is_analyzing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_analysis_can_be_retried() {
        let h = Harness::new();
        h.session.add_files(vec![video("a")]);
        h.element().set_frame(b"jpeg");

        let (describer, gate) = StaticDescriber::gated("A forest");
        let insights = SceneInsights::new(Arc::new(describer));
        let controller = h.session.controller();

        let cancelled =
            tokio::time::timeout(Duration::from_millis(10), insights.analyze(controller)).await;
        assert!(cancelled.is_err());
        assert!(!insights.is_analyzing());

        gate.notify_one();
        let retried = insights.analyze(controller).await.unwrap();
        assert_eq!(retried.description, "A forest");
    }

    #[tokio::test(start_paused = true)]
    async fn test_scene_analysis_without_frame() {
        let h = Harness::new();
        h.session.add_files(vec![audio("a.mp3")]);
        let insights = SceneInsights::new(Arc::new(StaticDescriber::answering("x")));
        assert!(insights.analyze(h.session.controller()).await.is_none());
        assert!(!insights.is_analyzing());
    }
}
