mod common;

use common::*;
use glam::Vec2;
use stage_core::tween::Channel;
use stage_core::*;
use std::time::Duration;

fn hover_events(events: &[StageEvent]) -> Vec<StageEvent> {
    events
        .iter()
        .copied()
        .filter(|e| matches!(e, StageEvent::HoverOn(_) | StageEvent::HoverOff(_)))
        .collect()
}

fn settle_selection(stage: &mut TestStage) -> Vec<TickOutcome> {
    run_until(stage, Duration::from_secs(10), |s| {
        matches!(s.phase(), Phase::Selected(_))
    })
}

fn settle_close(stage: &mut TestStage) -> Vec<TickOutcome> {
    run_until(stage, Duration::from_secs(10), |s| s.phase() == Phase::Idle)
}

#[test]
fn hover_turns_marker_on_and_shows_its_info() {
    let (mut stage, journal) = stage();
    let m3 = index(&stage, "m3");

    let events = hover(&mut stage, "m3");

    assert_eq!(events.as_slice(), &[StageEvent::HoverOn(m3)]);
    assert_eq!(stage.phase(), Phase::Hovering(m3));
    assert_eq!(stage.state().hovered, Some(m3));
    let calls = journal.calls();
    assert!(calls.contains(&Call::ShowInfo("Track 3".into(), 3, "Jazz/Blues".into())));
    assert!(calls.contains(&Call::Cursor(true)));
    assert!(!calls.contains(&Call::ClearInfo));
}

#[test]
fn hover_cue_tilts_marker_over_time() {
    let (mut stage, _) = stage();
    let m3 = index(&stage, "m3");
    hover(&mut stage, "m3");

    run_until(&mut stage, Duration::from_secs(2), |s| {
        !s.sequencer().animator().is_animating(Channel::MarkerTilt(m3))
    });

    let rot = stage.registry().get(m3).unwrap().transform.rotation;
    assert!((rot.x - HOVER_TILT).abs() < 1e-4);
}

#[test]
fn leaving_a_marker_turns_it_off_exactly_once() {
    let (mut stage, journal) = stage();
    let m3 = index(&stage, "m3");
    hover(&mut stage, "m3");

    let first = stage.pointer_move(EMPTY_SPOT.0, EMPTY_SPOT.1);
    let second = stage.pointer_move(EMPTY_SPOT.0, EMPTY_SPOT.1);

    assert_eq!(first.as_slice(), &[StageEvent::HoverOff(m3)]);
    assert!(second.is_empty());
    assert_eq!(stage.phase(), Phase::Idle);
    assert_eq!(journal.count(&Call::ClearInfo), 1);
    assert_eq!(journal.calls().last(), Some(&Call::Cursor(false)));
}

#[test]
fn repeated_moves_over_same_marker_do_not_restart_the_cue() {
    let (mut stage, journal) = stage();
    hover(&mut stage, "m2");
    let before = journal.calls().len();

    let events = hover(&mut stage, "m2");

    assert_eq!(
        events.as_slice(),
        &[StageEvent::Ignored(IgnoreReason::Unchanged)]
    );
    assert_eq!(journal.calls().len(), before);
}

#[test]
fn moving_between_markers_turns_the_previous_one_off_first() {
    let (mut stage, _) = stage();
    let m1 = index(&stage, "m1");
    let m2 = index(&stage, "m2");
    hover(&mut stage, "m1");

    let events = hover(&mut stage, "m2");

    assert_eq!(
        events.as_slice(),
        &[StageEvent::HoverOff(m1), StageEvent::HoverOn(m2)]
    );
    assert_eq!(stage.phase(), Phase::Hovering(m2));
}

#[test]
fn hover_cues_alternate_per_marker() {
    let (mut stage, _) = stage();
    let mut all = Vec::new();
    for target in ["m1", "m1", "m2", "", "m2", "m1", "m4", "", "", "m4"] {
        let events = if target.is_empty() {
            stage.pointer_move(EMPTY_SPOT.0, EMPTY_SPOT.1)
        } else {
            hover(&mut stage, target)
        };
        all.extend(hover_events(&events));
        stage.tick(FRAME);
    }

    for id in ["m1", "m2", "m4"] {
        let obj = index(&stage, id);
        let seq: Vec<bool> = all
            .iter()
            .filter_map(|e| match e {
                StageEvent::HoverOn(o) if *o == obj => Some(true),
                StageEvent::HoverOff(o) if *o == obj => Some(false),
                _ => None,
            })
            .collect();
        assert!(!seq.is_empty(), "{id} never hovered");
        assert!(seq[0], "{id} must start with HoverOn");
        assert!(seq.windows(2).all(|w| w[0] != w[1]), "{id}: {seq:?}");
    }
}

#[test]
fn forward_sequence_issues_steps_in_time_order() {
    let (mut stage, journal) = stage();
    let m3 = index(&stage, "m3");
    let position = stage.registry().get(m3).unwrap().transform.position;
    let cfg = stage.config().choreography.clone();
    let t0 = stage.sequencer().now();

    let events = click(&mut stage, "m3");
    assert!(events.contains(&StageEvent::SelectionStarted(m3)));
    assert_eq!(stage.phase(), Phase::Selecting(m3));
    let handle = stage.state().sequence_in_flight.expect("in flight");

    let outcomes = settle_selection(&mut stage);
    let issued: Vec<IssuedStep> = outcomes
        .iter()
        .flat_map(|o| o.issued.iter().copied())
        .filter(|s| s.handle == handle)
        .collect();
    let at = |kind: StepKind| {
        issued
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.at - t0)
            .unwrap_or_else(|| panic!("{kind:?} not issued"))
    };

    let t1 = cfg.raise();
    let t2 = t1 + cfg.travel();
    assert_eq!(at(StepKind::RotateMarker), Duration::ZERO);
    assert_eq!(at(StepKind::ShowInfo), Duration::ZERO);
    assert_eq!(at(StepKind::MoveCamera), t1);
    assert_eq!(at(StepKind::MoveTarget), t1);
    assert_eq!(at(StepKind::MoveLight), t1);
    assert_eq!(at(StepKind::SnapMarker), t2);
    assert_eq!(at(StepKind::OpenPanel), t2);
    assert_eq!(at(StepKind::StartMedia), t2);
    assert!(issued.windows(2).all(|w| w[0].at <= w[1].at));

    assert_eq!(stage.phase(), Phase::Selected(m3));
    let rig = stage.rig();
    assert!(approx_vec(rig.camera.eye, position + cfg.framing_offset));
    assert!(approx_vec(rig.camera.target, position));
    assert!(approx_vec(
        rig.light.position,
        AccentLight::mirrored(ACCENT_LIGHT_HOME)
    ));
    let rot = stage.registry().get(m3).unwrap().transform.rotation;
    assert!((rot.y - REST_SPIN).abs() < 1e-5);

    let open = journal.position(&Call::OpenDetail).expect("opened");
    let play = journal
        .position(&Call::Play("/data/track3.mp3".into()))
        .expect("played");
    assert!(open < play);
    assert!(stage.media().is_playing());
}

#[test]
fn camera_holds_still_until_the_raise_finishes() {
    let (mut stage, _) = stage();
    click(&mut stage, "m3");
    let eye = stage.rig().camera.eye;
    let raise = stage.config().choreography.raise();

    run_until(&mut stage, raise - FRAME * 2, |_| false);

    assert_eq!(stage.rig().camera.eye, eye);
    assert!(matches!(stage.phase(), Phase::Selecting(_)));
}

#[test]
fn clicks_and_hover_are_ignored_while_a_selection_is_active() {
    let (mut stage, journal) = stage();
    let m3 = index(&stage, "m3");
    click(&mut stage, "m3");
    stage.tick(FRAME);
    let running = stage.sequencer().running_count();

    let again = click(&mut stage, "m1");
    let moved = hover(&mut stage, "m1");

    let busy = StageEvent::Ignored(IgnoreReason::Busy(Phase::Selecting(m3)));
    assert_eq!(again.as_slice(), &[busy]);
    assert_eq!(moved.as_slice(), &[busy]);
    assert_eq!(stage.sequencer().running_count(), running);
    assert_eq!(stage.phase(), Phase::Selecting(m3));
    assert!(!journal
        .calls()
        .contains(&Call::ShowInfo("Track 1".into(), 1, "Jazz/Blues".into())));

    settle_selection(&mut stage);
    let open = click(&mut stage, "m1");
    assert_eq!(
        open.as_slice(),
        &[StageEvent::Ignored(IgnoreReason::Busy(Phase::Selected(m3)))]
    );
    assert_eq!(journal.count(&Call::OpenDetail), 1);
}

#[test]
fn drag_release_never_selects() {
    let (mut stage, journal) = stage();
    let (x, y) = screen_of(&stage, "m3");

    let events = stage.click(x, y, true);

    assert_eq!(events.as_slice(), &[StageEvent::Ignored(IgnoreReason::Drag)]);
    assert_eq!(stage.phase(), Phase::Idle);
    assert_eq!(stage.sequencer().running_count(), 0);
    assert!(journal.calls().is_empty());
}

#[test]
fn click_on_empty_space_changes_nothing() {
    let (mut stage, journal) = stage();
    hover(&mut stage, "m4");
    let before = journal.calls().len();
    let m4 = index(&stage, "m4");

    let events = stage.click(EMPTY_SPOT.0, EMPTY_SPOT.1, false);

    assert_eq!(events.as_slice(), &[StageEvent::Ignored(IgnoreReason::Miss)]);
    assert_eq!(stage.phase(), Phase::Hovering(m4));
    assert_eq!(journal.calls().len(), before);
}

#[test]
fn selecting_a_hovered_marker_turns_its_hover_off() {
    let (mut stage, journal) = stage();
    let m2 = index(&stage, "m2");
    hover(&mut stage, "m2");

    let events = click(&mut stage, "m2");

    assert_eq!(
        events.as_slice(),
        &[StageEvent::HoverOff(m2), StageEvent::SelectionStarted(m2)]
    );
    assert_eq!(stage.state().hovered, None);
    assert_eq!(
        journal.calls().last(),
        Some(&Call::ShowInfo("Track 2".into(), 2, "Jazz/Blues".into()))
    );
}

#[test]
fn close_stops_media_before_hiding_the_panel_and_returns_home() {
    let (mut stage, journal) = stage();
    let m3 = index(&stage, "m3");
    click(&mut stage, "m3");
    settle_selection(&mut stage);
    journal.clear();

    let events = stage.close();
    assert_eq!(events.as_slice(), &[StageEvent::CloseStarted(m3)]);
    assert_eq!(stage.phase(), Phase::Closing(m3));

    let stop = journal.position(&Call::Stop).expect("stopped");
    let hide = journal.position(&Call::CloseDetail).expect("closed");
    assert!(stop < hide);
    assert!(!stage.media().is_playing());
    assert!(!journal.calls().contains(&Call::ClearInfo));

    let outcomes = settle_close(&mut stage);
    let closed: Vec<_> = outcomes.iter().flat_map(|o| o.events.iter().copied()).collect();
    assert!(closed.contains(&StageEvent::Closed(m3)));
    assert_eq!(stage.state().selected, None);
    assert_eq!(stage.state().sequence_in_flight, None);
    assert!(journal.position(&Call::ClearInfo).expect("cleared") > hide);

    let rig = stage.rig();
    assert!(approx_vec(rig.camera.eye, DEFAULT_CAMERA_EYE));
    assert!(approx_vec(rig.camera.target, DEFAULT_CAMERA_TARGET));
    assert!(approx_vec(rig.light.position, ACCENT_LIGHT_HOME));
}

#[test]
fn pointer_input_is_ignored_while_closing() {
    let (mut stage, journal) = stage();
    let m3 = index(&stage, "m3");
    click(&mut stage, "m3");
    settle_selection(&mut stage);
    stage.close();
    stage.tick(FRAME);
    journal.clear();
    let running = stage.sequencer().running_count();

    let moved = hover(&mut stage, "m1");
    let clicked = click(&mut stage, "m1");

    let busy = StageEvent::Ignored(IgnoreReason::Busy(Phase::Closing(m3)));
    assert_eq!(moved.as_slice(), &[busy]);
    assert_eq!(clicked.as_slice(), &[busy]);
    assert_eq!(stage.phase(), Phase::Closing(m3));
    assert_eq!(stage.state().hovered, None);
    assert_eq!(stage.sequencer().running_count(), running);
    let calls = journal.calls();
    assert!(!calls.iter().any(|c| matches!(c, Call::ShowInfo(..))));
    assert!(!calls.contains(&Call::Cursor(true)));
}

#[test]
fn close_is_ignored_unless_a_selection_is_open() {
    let (mut stage, journal) = stage();
    let m1 = index(&stage, "m1");

    let idle = stage.close();
    click(&mut stage, "m1");
    let selecting = stage.close();

    assert_eq!(
        idle.as_slice(),
        &[StageEvent::Ignored(IgnoreReason::NotSelected(Phase::Idle))]
    );
    assert_eq!(
        selecting.as_slice(),
        &[StageEvent::Ignored(IgnoreReason::NotSelected(
            Phase::Selecting(m1)
        ))]
    );
    assert_eq!(journal.count(&Call::CloseDetail), 0);
}

#[test]
fn hover_resumes_after_close_completes() {
    let (mut stage, _) = stage();
    click(&mut stage, "m1");
    settle_selection(&mut stage);
    stage.close();
    settle_close(&mut stage);
    let m2 = index(&stage, "m2");

    let events = hover(&mut stage, "m2");

    assert_eq!(events.as_slice(), &[StageEvent::HoverOn(m2)]);
}

#[test]
fn failed_media_load_still_opens_the_panel() {
    let (mut stage, journal) = stage_with(StageConfig::default(), true);
    let m5 = index(&stage, "m5");

    click(&mut stage, "m5");
    settle_selection(&mut stage);

    assert_eq!(stage.phase(), Phase::Selected(m5));
    assert!(journal.calls().contains(&Call::OpenDetail));
    assert!(journal.calls().contains(&Call::Play("/data/track5.mp3".into())));
    assert!(!stage.media().is_playing());

    stage.close();
    settle_close(&mut stage);
    assert_eq!(stage.phase(), Phase::Idle);
}

#[test]
fn start_is_skipped_while_something_already_plays() {
    let (mut stage, journal) = stage();
    stage.media_mut().playing = Some("/data/other.mp3".into());

    click(&mut stage, "m1");
    settle_selection(&mut stage);

    assert!(journal.calls().contains(&Call::OpenDetail));
    assert!(!journal
        .calls()
        .iter()
        .any(|c| matches!(c, Call::Play(_))));
}

#[test]
fn light_returns_home_after_any_number_of_round_trips() {
    let (mut stage, _) = stage();
    for id in ["m1", "m4", "m5"] {
        click(&mut stage, id);
        settle_selection(&mut stage);
        assert!(approx_vec(
            stage.rig().light.position,
            AccentLight::mirrored(ACCENT_LIGHT_HOME)
        ));
        stage.close();
        settle_close(&mut stage);
        assert!(approx_vec(stage.rig().light.position, ACCENT_LIGHT_HOME));
    }
}

#[test]
fn zero_durations_settle_on_the_next_tick() {
    let mut config = StageConfig::default();
    let c = &mut config.choreography;
    c.hover_cue_sec = 0.0;
    c.raise_sec = 0.0;
    c.travel_sec = 0.0;
    c.return_sec = 0.0;
    let (mut stage, journal) = stage_with(config, false);
    let m3 = index(&stage, "m3");

    click(&mut stage, "m3");
    let settled = stage.tick(Duration::ZERO);
    assert!(settled.events.contains(&StageEvent::SelectionSettled(m3)));
    assert!(journal.calls().contains(&Call::OpenDetail));

    stage.close();
    let closed = stage.tick(Duration::ZERO);
    assert!(closed.events.contains(&StageEvent::Closed(m3)));
    assert_eq!(stage.phase(), Phase::Idle);
}

#[test]
fn one_long_frame_runs_the_whole_sequence_in_order() {
    let (mut stage, journal) = stage();
    let m3 = index(&stage, "m3");
    click(&mut stage, "m3");

    let outcome = stage.tick(Duration::from_secs(5));

    let kinds: Vec<StepKind> = outcome.issued.iter().map(|s| s.kind).collect();
    let pos = |k: StepKind| kinds.iter().position(|x| *x == k).unwrap();
    assert!(pos(StepKind::RotateMarker) < pos(StepKind::MoveCamera));
    assert!(pos(StepKind::MoveLight) < pos(StepKind::OpenPanel));
    assert!(outcome.events.contains(&StageEvent::SelectionSettled(m3)));
    assert!(journal.calls().contains(&Call::OpenDetail));
}

#[test]
fn orbit_only_moves_the_camera_at_rest() {
    let (mut stage, _) = stage();
    let eye = stage.rig().camera.eye;
    assert!(stage.orbit(Vec2::new(40.0, 0.0)));
    assert_ne!(stage.rig().camera.eye, eye);

    click(&mut stage, "m5");
    assert!(matches!(stage.phase(), Phase::Selecting(_)));
    let during = stage.rig().camera.eye;
    assert!(!stage.orbit(Vec2::new(40.0, 0.0)));
    assert_eq!(stage.rig().camera.eye, during);
}

#[test]
fn hover_follows_the_scene_after_an_orbit() {
    let (mut stage, _) = stage();
    let m3 = index(&stage, "m3");
    let (x, y) = screen_of(&stage, "m3");
    stage.pointer_move(x, y);
    assert_eq!(stage.phase(), Phase::Hovering(m3));

    assert!(stage.orbit(Vec2::new(300.0, 0.0)));
    let events = stage.pointer_move(x, y);

    assert_eq!(events.first(), Some(&StageEvent::HoverOff(m3)));
    assert_ne!(stage.phase(), Phase::Hovering(m3));
}

#[test]
fn stages_do_not_share_state() {
    let (mut a, _) = stage();
    let (b, journal_b) = stage();

    click(&mut a, "m1");
    a.tick(Duration::from_secs(5));

    assert_eq!(b.phase(), Phase::Idle);
    assert!(journal_b.calls().is_empty());
    assert_eq!(b.rig().camera.eye, DEFAULT_CAMERA_EYE);
}

#[test]
fn resize_updates_aspect_and_ignores_zero_sizes() {
    let (mut stage, _) = stage();
    stage.resize(Viewport::new(1200.0, 600.0));
    assert!((stage.rig().camera.aspect - 2.0).abs() < 1e-6);

    stage.resize(Viewport::new(0.0, 600.0));
    assert!((stage.rig().camera.aspect - 2.0).abs() < 1e-6);
    assert_eq!(stage.viewport(), Viewport::new(1200.0, 600.0));
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = StageConfig::default();
    config.choreography.travel_sec = -1.0;
    let journal = Journal::default();

    let result = Stage::new(
        registry(),
        config,
        RecordingPresentation {
            journal: journal.clone(),
        },
        RecordingPlayer {
            journal,
            playing: None,
            fail_loads: false,
        },
    );

    assert!(matches!(
        result.err(),
        Some(ConfigError::BadDuration { name: "travel_sec", .. })
    ));
}

#[test]
fn picking_ignores_the_floor() {
    let (stage, _) = stage();
    assert!(stage.pick(EMPTY_SPOT.0, EMPTY_SPOT.1).is_none());
    let (x, y) = screen_of(&stage, "m5");
    let hit = stage.pick(x, y).expect("hit");
    assert_eq!(hit.object, index(&stage, "m5"));
    assert!(hit.point.y <= 1.5 + 1e-4);
}
