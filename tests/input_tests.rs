// Host-side tests for pointer gesture handling.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn still_press_and_release_is_a_click() {
    let mut d = DragDetector::new(5.0);
    d.press(Vec2::new(100.0, 100.0));
    assert!(d.is_pressed());
    assert!(!d.release(Vec2::new(100.0, 100.0)));
    assert!(!d.is_pressed());
}

#[test]
fn small_jitter_stays_a_click() {
    let mut d = DragDetector::new(5.0);
    d.press(Vec2::new(10.0, 10.0));
    d.track(Vec2::new(12.0, 13.0));
    assert!(!d.release(Vec2::new(13.0, 14.0)));
}

#[test]
fn release_beyond_threshold_is_a_drag() {
    let mut d = DragDetector::new(5.0);
    d.press(Vec2::new(10.0, 10.0));
    assert!(d.release(Vec2::new(20.0, 10.0)));
}

#[test]
fn wandering_away_and_back_is_still_a_drag() {
    let mut d = DragDetector::new(5.0);
    d.press(Vec2::new(10.0, 10.0));
    d.track(Vec2::new(60.0, 10.0));
    d.track(Vec2::new(11.0, 10.0));
    assert!(d.release(Vec2::new(10.0, 10.0)));
}

#[test]
fn track_reports_incremental_deltas_only_while_pressed() {
    let mut d = DragDetector::new(5.0);
    assert_eq!(d.track(Vec2::new(50.0, 50.0)), Vec2::ZERO);
    d.press(Vec2::new(0.0, 0.0));
    assert_eq!(d.track(Vec2::new(3.0, 4.0)), Vec2::new(3.0, 4.0));
    assert_eq!(d.track(Vec2::new(5.0, 4.0)), Vec2::new(2.0, 0.0));
}

#[test]
fn release_without_press_never_clicks() {
    let mut d = DragDetector::new(5.0);
    assert!(d.release(Vec2::new(1.0, 1.0)));
}

#[test]
fn new_press_resets_previous_drag() {
    let mut d = DragDetector::new(5.0);
    d.press(Vec2::ZERO);
    d.track(Vec2::new(40.0, 0.0));
    d.press(Vec2::new(40.0, 0.0));
    assert!(!d.release(Vec2::new(41.0, 0.0)));
}
