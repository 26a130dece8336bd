//! Integration tests for `PlaybackScheduler`.
//!
//! Sessions run against a recording engine and in-memory store / word
//! source, so every test can assert the exact stream of speech requests.

mod common;

use std::time::Duration;

use wordloop_core::{PlaybackConfiguration, PlaybackMode, Word};
use wordloop_speech::SpeechError;

use common::{Call, Harness, LIBRARY, RecordingEngine, selected, words};

fn word_only() -> PlaybackConfiguration {
    selected(PlaybackConfiguration {
        mode: PlaybackMode::WordOnly,
        ..PlaybackConfiguration::default()
    })
}

// ── Step composition ───────────────────────────────────────────────

#[tokio::test]
async fn repeats_word_then_speaks_meaning_faster() {
    let config = selected(PlaybackConfiguration {
        word_repeat_count: 2,
        interval_secs: 0.5,
        ..PlaybackConfiguration::default()
    });
    let h = Harness::new(
        RecordingEngine::auto(),
        config,
        vec![Word::new(1, LIBRARY, 1, "test", "测试", "en")],
    );

    h.scheduler.start().await.unwrap();
    h.wait_idle().await;

    assert_eq!(
        h.engine.attempts(),
        vec![
            Call::speak("test", "en-US", 1.0),
            Call::Silence(500),
            Call::speak("test", "en-US", 1.0),
            Call::Silence(500),
            Call::speak("测试", "zh-CN", 1.5),
        ]
    );
    assert_eq!(h.listens.ids(), vec![1]);
}

#[tokio::test]
async fn meaning_only_skips_the_word() {
    let config = selected(PlaybackConfiguration {
        mode: PlaybackMode::MeaningOnly,
        word_repeat_count: 3,
        ..PlaybackConfiguration::default()
    });
    let h = Harness::new(RecordingEngine::auto(), config, words(&["a"]));

    h.scheduler.start().await.unwrap();
    h.wait_idle().await;

    assert_eq!(h.engine.attempts(), vec![Call::speak("a-m", "zh-CN", 1.5)]);
}

#[tokio::test]
async fn hide_all_keeps_cadence_with_silence() {
    let config = selected(PlaybackConfiguration {
        mode: PlaybackMode::HideAll,
        interval_secs: 0.5,
        ..PlaybackConfiguration::default()
    });
    let h = Harness::new(RecordingEngine::auto(), config, words(&["a", "b"]));

    h.scheduler.start().await.unwrap();
    h.wait_idle().await;

    assert_eq!(
        h.engine.attempts(),
        vec![Call::Silence(500), Call::Silence(500)]
    );
    assert!(h.engine.spoken().is_empty());
    assert_eq!(h.listens.ids(), vec![1, 2]);
}

#[tokio::test]
async fn engine_errors_do_not_stop_the_session() {
    let engine = RecordingEngine::auto();
    engine.fail_on("b");
    let h = Harness::new(engine, word_only(), words(&["a", "b", "c"]));

    h.scheduler.start().await.unwrap();
    h.wait_idle().await;

    assert_eq!(h.engine.spoken(), vec!["a", "b", "c"]);
    assert_eq!(h.store.snapshot().current_index, 2);
}

// ── Navigation ─────────────────────────────────────────────────────

#[tokio::test]
async fn halts_at_end_without_loop() {
    let h = Harness::new(RecordingEngine::auto(), word_only(), words(&["a", "b", "c"]));

    h.scheduler.start().await.unwrap();
    h.wait_idle().await;

    assert_eq!(h.engine.spoken(), vec!["a", "b", "c"]);
    let stored = h.store.snapshot();
    assert_eq!(stored.current_index, 2);
    assert!(stored.last_played_at.is_some());
    assert!(!h.scheduler.is_playing().await);
    assert!(!h.scheduler.state().is_playing);
}

#[tokio::test]
async fn loop_wraps_to_first_word() {
    let config = PlaybackConfiguration {
        is_loop: true,
        current_index: 2,
        ..word_only()
    };
    let h = Harness::new(RecordingEngine::manual(), config, words(&["a", "b", "c"]));

    h.scheduler.start().await.unwrap();
    h.engine.wait_outstanding().await;
    h.engine.complete();
    h.engine.wait_outstanding().await;

    assert_eq!(h.engine.spoken(), vec!["c", "a"]);
    assert_eq!(h.store.snapshot().current_index, 0);
    assert_eq!(h.scheduler.state().current_word.unwrap().text, "a");

    h.scheduler.stop().await;
}

#[tokio::test]
async fn random_never_repeats_current_word() {
    let config = PlaybackConfiguration {
        is_random: true,
        ..word_only()
    };
    let h = Harness::new(RecordingEngine::auto(), config, words(&["a", "b", "c", "d"]));

    let mut previous = h.store.snapshot().current_index;
    for _ in 0..50 {
        h.scheduler.next().await.unwrap();
        let current = h.store.snapshot().current_index;
        assert_ne!(current, previous);
        assert!(current < 4);
        previous = current;
    }
}

#[tokio::test]
async fn next_at_end_without_loop_stays_put_and_stopped() {
    let config = PlaybackConfiguration {
        current_index: 2,
        ..word_only()
    };
    let h = Harness::new(RecordingEngine::manual(), config, words(&["a", "b", "c"]));

    h.scheduler.start().await.unwrap();
    h.engine.wait_outstanding().await;
    h.scheduler.next().await.unwrap();

    assert_eq!(h.store.snapshot().current_index, 2);
    assert!(h.store.snapshot().last_played_at.is_none());
    assert!(!h.scheduler.is_playing().await);
}

#[tokio::test]
async fn navigation_records_last_played_time() {
    let h = Harness::new(RecordingEngine::auto(), word_only(), words(&["a", "b", "c"]));
    assert!(h.store.snapshot().last_played_at.is_none());

    h.scheduler.next().await.unwrap();
    let after_next = h.store.snapshot().last_played_at.unwrap();
    assert_eq!(h.store.snapshot().current_index, 1);
    assert_eq!(h.scheduler.state().current_word.unwrap().text, "b");

    h.scheduler.previous().await.unwrap();
    let after_previous = h.store.snapshot().last_played_at.unwrap();
    assert!(after_previous >= after_next);
    assert_eq!(h.store.snapshot().current_index, 0);
}

#[tokio::test]
async fn previous_wraps_only_with_loop() {
    let h = Harness::new(RecordingEngine::auto(), word_only(), words(&["a", "b", "c"]));

    h.scheduler.previous().await.unwrap();
    assert_eq!(h.store.snapshot().current_index, 0);

    h.scheduler.set_loop(true).await.unwrap();
    h.scheduler.previous().await.unwrap();
    assert_eq!(h.store.snapshot().current_index, 2);
    assert_eq!(h.scheduler.state().current_word.unwrap().text, "c");
}

#[tokio::test]
async fn next_resumes_playback_when_playing() {
    let h = Harness::new(RecordingEngine::manual(), word_only(), words(&["a", "b", "c"]));

    h.scheduler.start().await.unwrap();
    h.engine.wait_outstanding().await;
    h.scheduler.next().await.unwrap();

    assert!(h.scheduler.is_playing().await);
    h.engine.wait_outstanding().await;
    assert_eq!(h.engine.spoken(), vec!["a", "b"]);
    assert_eq!(h.store.snapshot().current_index, 1);

    h.scheduler.stop().await;
}

// ── Lifecycle ──────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stop_racing_start_leaves_player_consistent() {
    let h = Harness::new(RecordingEngine::manual(), word_only(), words(&["a", "b", "c"]));

    for round in 0..100 {
        let (started, ()) = tokio::join!(h.scheduler.start(), h.scheduler.stop());
        started.unwrap();

        let playing = h.scheduler.is_playing().await;
        assert_eq!(h.scheduler.state().is_playing, playing, "round {round}");
        if playing {
            h.scheduler.stop().await;
        }

        assert!(!h.scheduler.is_playing().await, "round {round}");
        assert!(!h.scheduler.state().is_playing, "round {round}");
        assert!(h.engine.outstanding().is_none(), "round {round}");
        assert!(!h.queue.has_in_flight(), "round {round}");
        assert_eq!(h.queue.pending_len(), 0, "round {round}");
    }
    assert_eq!(h.engine.overlaps(), 0);
}

#[tokio::test]
async fn stop_is_idempotent() {
    let h = Harness::new(RecordingEngine::manual(), word_only(), words(&["a", "b"]));

    h.scheduler.stop().await;
    h.scheduler.start().await.unwrap();
    h.engine.wait_outstanding().await;
    h.scheduler.stop().await;
    h.scheduler.stop().await;

    assert!(!h.scheduler.is_playing().await);
    assert!(!h.scheduler.state().is_playing);
    assert!(h.engine.outstanding().is_none());
    assert_eq!(h.store.snapshot().current_index, 0);
    assert!(h.listens.ids().is_empty());
}

#[tokio::test]
async fn toggle_starts_and_stops() {
    let h = Harness::new(RecordingEngine::manual(), word_only(), words(&["a"]));

    h.scheduler.toggle().await.unwrap();
    assert!(h.scheduler.is_playing().await);
    h.engine.wait_outstanding().await;

    h.scheduler.toggle().await.unwrap();
    assert!(!h.scheduler.is_playing().await);
}

#[tokio::test]
async fn empty_selection_does_not_start() {
    let h = Harness::new(
        RecordingEngine::auto(),
        PlaybackConfiguration::default(),
        words(&["a"]),
    );

    h.scheduler.start().await.unwrap();

    assert!(!h.scheduler.is_playing().await);
    assert_eq!(h.scheduler.state().word_count, 0);
    assert!(h.engine.attempts().is_empty());
}

#[tokio::test]
async fn out_of_range_index_starts_from_first_word() {
    let config = PlaybackConfiguration {
        current_index: 9,
        ..word_only()
    };
    let h = Harness::new(RecordingEngine::manual(), config, words(&["a", "b"]));

    h.scheduler.start().await.unwrap();
    h.engine.wait_outstanding().await;

    assert_eq!(h.engine.spoken(), vec!["a"]);
    assert_eq!(h.store.snapshot().current_index, 0);
    h.scheduler.stop().await;
}

#[tokio::test]
async fn progress_write_failure_ends_session() {
    let h = Harness::new(RecordingEngine::auto(), word_only(), words(&["a", "b"]));
    h.store.fail_writes(true);

    h.scheduler.start().await.unwrap();
    h.wait_idle().await;

    assert_eq!(h.engine.spoken(), vec!["a"]);
    assert!(!h.scheduler.is_playing().await);
}

// ── Settings ───────────────────────────────────────────────────────

#[tokio::test]
async fn repeat_count_change_restarts_current_word() {
    let config = PlaybackConfiguration {
        word_repeat_count: 3,
        ..word_only()
    };
    let h = Harness::new(RecordingEngine::manual(), config, words(&["a", "b"]));

    h.scheduler.start().await.unwrap();
    h.engine.wait_outstanding().await;
    h.scheduler.set_repeat_count(1).await.unwrap();

    h.engine.wait_outstanding().await;
    h.engine.complete();
    h.engine.wait_outstanding().await;

    assert_eq!(
        h.engine.attempts(),
        vec![
            Call::speak("a", "en-US", 1.0),
            Call::speak("a", "en-US", 1.0),
            Call::speak("b", "en-US", 1.0),
        ]
    );
    assert_eq!(h.store.snapshot().word_repeat_count, 1);
    h.scheduler.stop().await;
}

#[tokio::test]
async fn speed_change_applies_on_next_word() {
    let h = Harness::new(RecordingEngine::manual(), word_only(), words(&["a", "b"]));

    h.scheduler.start().await.unwrap();
    h.engine.wait_outstanding().await;
    h.scheduler.set_speed(2.0).await.unwrap();
    h.engine.complete();
    h.engine.wait_outstanding().await;

    assert_eq!(
        h.engine.attempts(),
        vec![Call::speak("a", "en-US", 1.0), Call::speak("b", "en-US", 2.0)]
    );
    assert!((h.scheduler.state().speed - 2.0).abs() < f32::EPSILON);
    h.scheduler.stop().await;
}

#[tokio::test]
async fn out_of_range_settings_are_rejected() {
    let h = Harness::new(RecordingEngine::auto(), word_only(), words(&["a"]));

    assert!(matches!(
        h.scheduler.set_speed(5.0).await,
        Err(SpeechError::Settings(_))
    ));
    assert!(matches!(
        h.scheduler.set_interval(0.0).await,
        Err(SpeechError::Settings(_))
    ));
    assert!(matches!(
        h.scheduler.set_repeat_count(0).await,
        Err(SpeechError::Settings(_))
    ));
    assert_eq!(h.store.snapshot(), word_only());
}

#[tokio::test]
async fn toggles_flip_stored_flags() {
    let h = Harness::new(RecordingEngine::auto(), word_only(), words(&["a"]));

    h.scheduler.toggle_random().await.unwrap();
    h.scheduler.toggle_loop().await.unwrap();
    let stored = h.store.snapshot();
    assert!(stored.is_random && stored.is_loop);

    h.scheduler.toggle_loop().await.unwrap();
    assert!(!h.store.snapshot().is_loop);
    assert!(h.scheduler.state().is_random);
}

#[tokio::test]
async fn select_groups_restarts_from_first_word() {
    let mut list = words(&["a", "b"]);
    list.push(Word::new(10, LIBRARY, 2, "x", "x-m", "en"));
    list.push(Word::new(11, LIBRARY, 2, "y", "y-m", "en"));
    let config = PlaybackConfiguration {
        current_index: 1,
        ..word_only()
    };
    let h = Harness::new(RecordingEngine::manual(), config, list);

    h.scheduler.start().await.unwrap();
    h.engine.wait_outstanding().await;
    h.scheduler.select_groups(LIBRARY, &[2]).await.unwrap();
    h.engine.wait_outstanding().await;

    assert_eq!(h.engine.spoken(), vec!["b", "x"]);
    let stored = h.store.snapshot();
    assert_eq!(stored.selected_group_ids, vec![2]);
    assert_eq!(stored.current_index, 0);
    assert_eq!(h.scheduler.state().word_count, 2);
    h.scheduler.stop().await;
}

#[tokio::test]
async fn toggle_meaning_is_display_only() {
    let h = Harness::new(RecordingEngine::auto(), word_only(), words(&["a"]));
    h.scheduler.refresh().await.unwrap();
    assert!(!h.scheduler.state().show_meaning);

    h.scheduler.toggle_meaning();

    assert!(h.scheduler.state().show_meaning);
    assert!(h.engine.attempts().is_empty());
}

#[tokio::test]
async fn external_store_writes_reach_player_state() {
    let h = Harness::new(RecordingEngine::auto(), word_only(), words(&["a"]));
    let mut state = h.scheduler.subscribe();

    wordloop_core::ProgressStore::set_mode(&*h.store, PlaybackMode::MeaningOnly)
        .await
        .unwrap();

    let mirrored = tokio::time::timeout(
        Duration::from_secs(5),
        state.wait_for(|s| s.mode == PlaybackMode::MeaningOnly),
    )
    .await
    .unwrap()
    .unwrap();
    assert!(mirrored.show_meaning);
}
