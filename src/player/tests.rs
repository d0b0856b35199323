use super::*;
use crate::audio::MediaHandle;
use crate::audio::fake::FakeHandle;
use crate::config::{AudioSettings, VisualizerSettings};
use crate::library::Track;
use std::time::Duration;

fn track(id: &str, secs: u64) -> Track {
    Track {
        id: id.to_string(),
        title: id.to_uppercase(),
        artist: None,
        source: format!("/music/{id}.mp3"),
        duration: Duration::from_secs(secs),
        bpm: None,
    }
}

fn three() -> Vec<Track> {
    vec![track("t1", 240), track("t2", 200), track("t3", 220)]
}

fn store_with(tracks: Vec<Track>) -> PlaybackStore {
    let mut store = PlaybackStore::new();
    store.set_queue(tracks);
    store
}

fn engine_with(tracks: Vec<Track>) -> PlaybackEngine<FakeHandle> {
    let mut engine = PlaybackEngine::new(
        FakeHandle::new(),
        &AudioSettings::default(),
        &VisualizerSettings::default(),
    );
    engine.set_queue(tracks);
    engine
}

/// Complete the newest load and let the engine observe it.
fn finish_latest(engine: &mut PlaybackEngine<FakeHandle>, duration: Option<Duration>) {
    let load = engine.handle().last_load().expect("a load was issued");
    engine.handle_mut().finish_load(load, duration);
    engine.tick();
}

fn current(engine: &PlaybackEngine<FakeHandle>) -> Option<&str> {
    engine.state().current_track_id.as_deref()
}

// Queue selection

#[test]
fn adjacent_wraps_both_ways() {
    let q = three();
    assert_eq!(adjacent(&q, Some("t3"), Direction::Forward).unwrap().id, "t1");
    assert_eq!(adjacent(&q, Some("t1"), Direction::Backward).unwrap().id, "t3");
    assert_eq!(adjacent(&q, Some("t1"), Direction::Forward).unwrap().id, "t2");
    assert_eq!(adjacent(&q, Some("t2"), Direction::Backward).unwrap().id, "t1");
}

#[test]
fn adjacent_wraps_for_every_queue_length() {
    for len in 2..8 {
        let q: Vec<Track> = (0..len).map(|i| track(&format!("t{i}"), 60)).collect();
        let first = &q[0].id;
        let last = &q[len - 1].id;
        assert_eq!(&adjacent(&q, Some(last), Direction::Forward).unwrap().id, first);
        assert_eq!(&adjacent(&q, Some(first), Direction::Backward).unwrap().id, last);
    }
}

#[test]
fn adjacent_without_a_known_id_picks_an_end() {
    let q = three();
    assert_eq!(adjacent(&q, None, Direction::Forward).unwrap().id, "t1");
    assert_eq!(adjacent(&q, None, Direction::Backward).unwrap().id, "t3");
    assert_eq!(adjacent(&q, Some("zz"), Direction::Forward).unwrap().id, "t1");
    assert!(adjacent(&[], None, Direction::Forward).is_none());
    assert_eq!(index_of(&q, "t2"), Some(1));
    assert_eq!(index_of(&q, "zz"), None);
}

// Store

#[test]
fn set_queue_does_not_select() {
    let store = store_with(three());
    assert_eq!(store.state().current_track_id, None);
    assert!(!store.state().is_playing);
}

#[test]
fn play_track_unknown_id_is_a_no_op() {
    let mut store = store_with(three());
    assert!(!store.play_track("nope"));
    assert_eq!(store.state().current_track_id, None);

    assert!(store.play_track("t2"));
    assert!(!store.play_track("nope"));
    assert_eq!(store.state().current_track_id.as_deref(), Some("t2"));
}

#[test]
fn play_track_resets_position_and_plays() {
    let mut store = store_with(three());
    store.play_track("t1");
    store.seek(30.0);
    store.pause();

    store.play_track("t2");
    let s = store.state();
    assert_eq!(s.current_track_id.as_deref(), Some("t2"));
    assert_eq!(s.position, Duration::ZERO);
    assert!(s.is_playing);
}

#[test]
fn pause_and_resume_need_a_current_track() {
    let mut store = store_with(three());
    store.resume();
    assert!(!store.state().is_playing);

    store.play_track("t1");
    store.pause();
    assert!(!store.state().is_playing);
    store.resume();
    assert!(store.state().is_playing);
}

#[test]
fn next_from_last_selects_first() {
    let mut store = store_with(three());
    store.play_track("t3");
    store.next();
    assert_eq!(store.state().current_track_id.as_deref(), Some("t1"));
}

#[test]
fn prev_from_first_selects_last() {
    let mut store = store_with(three());
    store.play_track("t1");
    store.prev();
    assert_eq!(store.state().current_track_id.as_deref(), Some("t3"));
}

#[test]
fn single_track_queue_restarts_on_next_and_prev() {
    let mut store = store_with(vec![track("t1", 240)]);
    store.play_track("t1");
    for _ in 0..3 {
        store.seek(42.0);
        store.next();
        assert_eq!(store.state().current_track_id.as_deref(), Some("t1"));
        assert_eq!(store.state().position, Duration::ZERO);
    }
    store.seek(10.0);
    store.prev();
    assert_eq!(store.state().current_track_id.as_deref(), Some("t1"));
    assert_eq!(store.state().position, Duration::ZERO);
}

#[test]
fn next_and_prev_on_empty_queue_do_nothing() {
    let mut store = PlaybackStore::new();
    store.next();
    store.prev();
    assert_eq!(store.state(), &PlaybackState::default());
}

#[test]
fn seek_clamps_to_track_bounds() {
    let mut store = store_with(three());
    store.play_track("t1");

    store.seek(-5.0);
    assert_eq!(store.state().position_seconds(), 0.0);

    store.seek(500.0);
    assert_eq!(store.state().position_seconds(), 240.0);

    store.seek(f64::NAN);
    assert_eq!(store.state().position, Duration::ZERO);

    store.seek(f64::INFINITY);
    assert_eq!(store.state().position, Duration::from_secs(240));

    store.seek(12.5);
    assert_eq!(store.state().position, Duration::from_secs_f64(12.5));
}

#[test]
fn seek_without_selection_is_ignored() {
    let mut store = store_with(three());
    store.seek(10.0);
    assert_eq!(store.state().position, Duration::ZERO);
}

#[test]
fn decoded_duration_overrides_nominal() {
    let mut store = store_with(three());
    store.play_track("t1");
    store.resolve_duration(Some(Duration::from_secs(180)));
    assert_eq!(store.duration(), Duration::from_secs(180));
    store.seek(500.0);
    assert_eq!(store.state().position, Duration::from_secs(180));

    // Unknown or zero decoded lengths fall back to the catalog.
    store.resolve_duration(Some(Duration::ZERO));
    assert_eq!(store.duration(), Duration::from_secs(240));
}

#[test]
fn position_stays_in_bounds_across_mixed_operations() {
    let mut store = store_with(three());
    let ops: [(u8, f64); 14] = [
        (0, 0.0),
        (1, -3.0),
        (1, 1e9),
        (2, 0.0),
        (3, 250.0),
        (1, 199.0),
        (4, 0.0),
        (1, 230.0),
        (5, 0.0),
        (3, 9999.0),
        (6, 0.0),
        (1, -0.1),
        (3, 10.0),
        (7, 0.0),
    ];

    for (op, arg) in ops {
        match op {
            0 => {
                store.play_track("t1");
            }
            1 => store.seek(arg),
            2 => store.pause(),
            3 => store.report_position(Duration::from_secs_f64(arg)),
            4 => store.next(),
            5 => store.resume(),
            6 => store.prev(),
            _ => {
                store.play_track("t3");
            }
        }
        let s = store.state();
        assert!(s.position <= store.duration(), "{:?} > {:?}", s.position, store.duration());
    }
}

#[test]
fn replacing_queue_without_current_track_clears_selection() {
    let mut store = store_with(three());
    store.play_track("t2");
    store.set_queue(vec![track("t1", 240), track("t3", 220)]);
    assert_eq!(store.state().current_track_id, None);
    assert!(!store.state().is_playing);

    store.play_track("t1");
    store.set_queue(three());
    assert_eq!(store.state().current_track_id.as_deref(), Some("t1"));
}

// Engine scenarios (queue = T1 240s, T2 200s, T3 220s)

#[test]
fn scenario_next_from_t3_selects_t1() {
    let mut engine = engine_with(three());
    engine.play_track("t3");
    finish_latest(&mut engine, None);
    engine.next();
    assert_eq!(current(&engine), Some("t1"));
}

#[test]
fn scenario_single_track_next_restarts_each_time() {
    let mut engine = engine_with(vec![track("t1", 240)]);
    engine.play_track("t1");
    finish_latest(&mut engine, None);

    for _ in 0..3 {
        engine.handle_mut().advance(Duration::from_secs(30));
        engine.tick();
        assert!(engine.state().position > Duration::ZERO);

        engine.next();
        assert_eq!(current(&engine), Some("t1"));
        assert_eq!(engine.state().position, Duration::ZERO);
        assert_eq!(engine.handle().position(), Duration::ZERO);
    }
    // Restarting the same source never reloads it.
    assert_eq!(engine.handle().loads.len(), 1);
}

#[test]
fn scenario_seek_negative_and_past_end() {
    let mut engine = engine_with(three());
    engine.play_track("t1");
    engine.seek(-5.0);
    assert_eq!(engine.state().position_seconds(), 0.0);

    engine.seek(500.0);
    assert_eq!(engine.state().position_seconds(), 240.0);
}

#[test]
fn scenario_rapid_play_track_keeps_the_last_request() {
    let mut engine = engine_with(three());
    engine.play_track("t2");
    engine.play_track("t3");

    let t2 = engine.handle().load_for("/music/t2.mp3").unwrap();
    let t3 = engine.handle().load_for("/music/t3.mp3").unwrap();

    // T3 finishes first, then the stale T2 completion shows up.
    engine.handle_mut().finish_load(t3, Some(Duration::from_secs(220)));
    engine.tick();
    engine.handle_mut().finish_load(t2, Some(Duration::from_secs(200)));
    engine.tick();

    assert_eq!(current(&engine), Some("t3"));
    assert!(engine.state().is_playing);
    assert_eq!(engine.handle().started, vec!["/music/t3.mp3".to_string()]);
}

#[test]
fn stale_ready_arriving_first_never_starts_playback() {
    let mut engine = engine_with(three());
    engine.play_track("t2");
    engine.play_track("t3");
    let t2 = engine.handle().load_for("/music/t2.mp3").unwrap();

    engine.handle_mut().finish_load(t2, None);
    engine.tick();
    assert_eq!(engine.handle().play_calls, 0);
    assert!(engine.is_loading());

    finish_latest(&mut engine, None);
    assert_eq!(engine.handle().started, vec!["/music/t3.mp3".to_string()]);
}

#[test]
fn ended_on_last_track_advances_to_first() {
    let mut engine = engine_with(three());
    engine.play_track("t3");
    finish_latest(&mut engine, None);

    engine.handle_mut().finish_playback();
    engine.tick();
    assert_eq!(current(&engine), Some("t1"));
    assert!(engine.state().is_playing);
    assert_eq!(engine.handle().last_load(), engine.handle().load_for("/music/t1.mp3"));

    finish_latest(&mut engine, None);
    assert_eq!(engine.handle().started.last().map(String::as_str), Some("/music/t1.mp3"));
}

#[test]
fn ended_single_track_reloads_instead_of_seeking_a_drained_source() {
    let mut engine = engine_with(vec![track("t1", 240)]);
    engine.play_track("t1");
    finish_latest(&mut engine, None);

    engine.handle_mut().finish_playback();
    engine.tick();
    assert_eq!(current(&engine), Some("t1"));
    assert_eq!(engine.handle().loads.len(), 2);
}

#[test]
fn pause_before_ready_keeps_output_silent() {
    let mut engine = engine_with(three());
    engine.play_track("t1");
    engine.pause();
    finish_latest(&mut engine, None);

    assert!(engine.handle().started.is_empty());
    assert!(!engine.state().is_playing);

    engine.resume();
    assert_eq!(engine.handle().started, vec!["/music/t1.mp3".to_string()]);
}

#[test]
fn position_loop_follows_play_state() {
    let mut engine = engine_with(three());
    engine.play_track("t1");
    assert!(!engine.position_loop_running());

    finish_latest(&mut engine, None);
    assert!(engine.position_loop_running());

    engine.handle_mut().advance(Duration::from_secs(12));
    engine.tick();
    assert_eq!(engine.state().position, Duration::from_secs(12));

    engine.pause();
    assert!(!engine.position_loop_running());
    engine.handle_mut().advance(Duration::from_secs(5));
    engine.tick();
    assert_eq!(engine.state().position, Duration::from_secs(12));

    engine.resume();
    assert!(engine.position_loop_running());
}

#[test]
fn reported_position_is_clamped_to_duration() {
    let mut engine = engine_with(three());
    engine.play_track("t2");
    finish_latest(&mut engine, Some(Duration::from_secs(200)));

    engine.handle_mut().advance(Duration::from_secs(260));
    engine.tick();
    assert_eq!(engine.state().position, Duration::from_secs(200));
}

#[test]
fn seek_reaches_the_handle_once_ready() {
    let mut engine = engine_with(three());
    engine.play_track("t1");
    finish_latest(&mut engine, None);

    engine.seek(90.0);
    assert_eq!(engine.handle().position(), Duration::from_secs(90));

    engine.seek_by(-100.0);
    assert_eq!(engine.state().position, Duration::ZERO);
    assert_eq!(engine.handle().position(), Duration::ZERO);
}

#[test]
fn shutdown_cancels_loops_but_keeps_the_graph() {
    let mut engine = engine_with(three());
    let surface = engine.mount_visualizer(40, 8);
    engine.play_track("t1");
    finish_latest(&mut engine, None);
    assert_eq!(engine.scheduler().len(), 2);

    engine.shutdown();
    assert!(engine.scheduler().is_empty());
    assert!(engine.surface(surface).is_none());
    assert!(engine.handle().is_paused());
    assert_eq!(engine.graphs().created(), 1);
    assert!(engine.handle().tap().is_some());
}
