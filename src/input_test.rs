#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn tool_is_drawing() {
    assert!(!Tool::Select.is_drawing());
    assert!(Tool::Player.is_drawing());
    assert!(Tool::Arrow.is_drawing());
    assert!(Tool::Text.is_drawing());
}

// =============================================================
// Modifiers / Key
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift && !m.ctrl && !m.alt && !m.meta);
    assert!(!m.command());
}

#[test]
fn modifiers_command_accepts_ctrl_or_meta() {
    assert!(Modifiers { ctrl: true, ..Default::default() }.command());
    assert!(Modifiers { meta: true, ..Default::default() }.command());
}

#[test]
fn key_is_ignores_case() {
    assert!(Key("Z".into()).is("z"));
    assert!(Key("Escape".into()).is("escape"));
    assert!(!Key("Enter".into()).is("Escape"));
}

// =============================================================
// ArrowDraft
// =============================================================

#[test]
fn draft_default_is_idle() {
    let d = ArrowDraft::default();
    assert_eq!(d.state(), ArrowDrawState::Idle);
    assert!(d.temp_arrow(1.0 / 6.0).is_none());
    assert!(d.start_point().is_none());
}

#[test]
fn draft_start_collapses_all_points() {
    let mut d = ArrowDraft::default();
    d.start(pt(10.0, 20.0));
    assert_eq!(d.state(), ArrowDrawState::Started);
    let t = d.temp_arrow(1.0 / 6.0).unwrap();
    assert_eq!(t.start, pt(10.0, 20.0));
    assert_eq!(t.end, pt(10.0, 20.0));
    assert_eq!(t.control, pt(10.0, 20.0));
}

#[test]
fn draft_track_moves_end_and_derives_control() {
    let mut d = ArrowDraft::default();
    d.start(pt(0.0, 0.0));
    assert!(d.track(pt(60.0, 0.0)));
    let t = d.temp_arrow(1.0 / 6.0).unwrap();
    assert_eq!(t.end, pt(60.0, 0.0));
    assert!((t.control.x - 30.0).abs() < 1e-9);
    assert!((t.control.y - 10.0).abs() < 1e-9);
}

#[test]
fn draft_track_ignored_when_not_started() {
    let mut d = ArrowDraft::default();
    assert!(!d.track(pt(1.0, 1.0)));
    d.start(pt(0.0, 0.0));
    d.end(pt(50.0, 0.0), pt(25.0, 5.0));
    assert!(!d.track(pt(99.0, 99.0)));
    assert_eq!(d.temp_arrow(0.0).unwrap().end, pt(50.0, 0.0));
}

#[test]
fn draft_end_only_from_started() {
    let mut d = ArrowDraft::default();
    assert!(!d.end(pt(1.0, 1.0), pt(0.0, 0.0)));
    assert!(d.is_idle());
    d.start(pt(0.0, 0.0));
    assert!(d.end(pt(50.0, 0.0), pt(25.0, 5.0)));
    assert_eq!(d.state(), ArrowDrawState::Ended);
    assert!(!d.end(pt(70.0, 0.0), pt(0.0, 0.0)));
}

#[test]
fn draft_adjust_control_only_from_ended() {
    let mut d = ArrowDraft::default();
    d.start(pt(0.0, 0.0));
    assert!(!d.adjust_control(pt(5.0, 5.0)));
    d.end(pt(50.0, 0.0), pt(25.0, 5.0));
    assert!(d.adjust_control(pt(25.0, -40.0)));
    assert_eq!(d.temp_arrow(0.0).unwrap().control, pt(25.0, -40.0));
}

#[test]
fn draft_finish_returns_arrow_and_resets() {
    let mut d = ArrowDraft::default();
    d.start(pt(0.0, 0.0));
    assert!(d.finish().is_none());
    d.end(pt(50.0, 0.0), pt(25.0, 5.0));
    let t = d.finish().unwrap();
    assert_eq!(t.length(), 50.0);
    assert!(d.is_idle());
}

#[test]
fn draft_cancel_from_any_non_idle_state() {
    let mut d = ArrowDraft::default();
    assert!(!d.cancel());
    d.start(pt(0.0, 0.0));
    assert!(d.cancel());
    assert!(d.is_idle());
    d.start(pt(0.0, 0.0));
    d.end(pt(50.0, 0.0), pt(25.0, 5.0));
    assert!(d.cancel());
    assert!(d.is_idle());
}

#[test]
fn draft_start_while_drawing_resets() {
    let mut d = ArrowDraft::default();
    d.start(pt(0.0, 0.0));
    d.end(pt(50.0, 0.0), pt(25.0, 5.0));
    d.start(pt(100.0, 100.0));
    assert_eq!(d.state(), ArrowDrawState::Started);
    assert_eq!(d.start_point(), Some(pt(100.0, 100.0)));
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert_eq!(InputState::default(), InputState::Idle);
}
