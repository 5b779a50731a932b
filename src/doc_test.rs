#![allow(clippy::float_cmp)]

use serde_json::json;
use uuid::Uuid;

use super::*;

fn make_player(team: Option<Team>) -> Player {
    Player::new(100.0, 200.0, "7", "#E53935", team)
}

fn make_arrow() -> Arrow {
    Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(50.0, 20.0), "#FFFFFF", 3.0, ArrowStyle::Dashed)
}

fn make_text() -> TextAnnotation {
    TextAnnotation::new(10.0, 20.0, "Press high", "#FFFFFF", 16.0)
}

// =============================================================
// Enum serde
// =============================================================

#[test]
fn team_serde_lowercase() {
    assert_eq!(serde_json::to_string(&Team::Home).unwrap(), "\"home\"");
    assert_eq!(serde_json::from_str::<Team>("\"away\"").unwrap(), Team::Away);
}

#[test]
fn team_opponent_flips() {
    assert_eq!(Team::Home.opponent(), Team::Away);
    assert_eq!(Team::Away.opponent(), Team::Home);
}

#[test]
fn arrow_style_serde_all_variants() {
    let cases = [
        (ArrowStyle::Solid, "\"solid\""),
        (ArrowStyle::Dashed, "\"dashed\""),
        (ArrowStyle::Dotted, "\"dotted\""),
    ];
    for (style, expected) in cases {
        assert_eq!(serde_json::to_string(&style).unwrap(), expected);
    }
}

#[test]
fn arrow_style_deserialize_invalid_rejects() {
    assert!(serde_json::from_str::<ArrowStyle>("\"wavy\"").is_err());
}

// =============================================================
// Player
// =============================================================

#[test]
fn player_new_assigns_fresh_ids() {
    let a = make_player(None);
    let b = make_player(None);
    assert_ne!(a.id, b.id);
    assert_eq!(a.size, crate::consts::DEFAULT_PLAYER_SIZE);
}

#[test]
fn player_jersey_number_parses_numeric_labels() {
    let mut p = make_player(Some(Team::Home));
    assert_eq!(p.jersey_number(), Some(7));
    p.number = "GK".into();
    assert_eq!(p.jersey_number(), None);
}

#[test]
fn player_apply_patch_only_present_fields() {
    let mut p = make_player(Some(Team::Home));
    p.apply(&PlayerPatch { x: Some(5.0), label: Some(Some("captain".into())), ..Default::default() });
    assert_eq!(p.x, 5.0);
    assert_eq!(p.y, 200.0);
    assert_eq!(p.label.as_deref(), Some("captain"));
    assert_eq!(p.team, Some(Team::Home));
}

#[test]
fn player_apply_patch_can_clear_team_and_label() {
    let mut p = make_player(Some(Team::Away));
    p.label = Some("9".into());
    p.apply(&PlayerPatch { team: Some(None), label: Some(None), ..Default::default() });
    assert_eq!(p.team, None);
    assert_eq!(p.label, None);
}

#[test]
fn player_serializes_camel_case_without_empty_label() {
    let mut p = make_player(None);
    p.id = Uuid::nil();
    let v = serde_json::to_value(&p).unwrap();
    assert_eq!(v["number"], "7");
    assert!(v["team"].is_null());
    assert!(v.get("label").is_none());
}

#[test]
fn player_deserialize_defaults_size() {
    let p: Player = serde_json::from_value(json!({
        "id": Uuid::nil(),
        "x": 1.0, "y": 2.0,
        "number": "10", "color": "#fff", "team": "home"
    }))
    .unwrap();
    assert_eq!(p.size, crate::consts::DEFAULT_PLAYER_SIZE);
    assert_eq!(p.team, Some(Team::Home));
}

#[test]
fn player_apply_rejects_non_positive_size() {
    let mut p = make_player(Some(Team::Home));
    p.apply(&PlayerPatch { size: Some(32.0), ..Default::default() });
    assert_eq!(p.size, 32.0);
    for bad in [0.0, -5.0, f64::NAN] {
        p.apply(&PlayerPatch { size: Some(bad), ..Default::default() });
        assert_eq!(p.size, crate::consts::DEFAULT_PLAYER_SIZE, "{bad}");
    }
}

// =============================================================
// Arrow
// =============================================================

#[test]
fn arrow_new_clamps_width() {
    let a = Arrow::new(Point::default(), Point::new(50.0, 0.0), Point::default(), "#000", 40.0, ArrowStyle::Solid);
    assert_eq!(a.width, 10.0);
    let b = Arrow::new(Point::default(), Point::new(50.0, 0.0), Point::default(), "#000", 0.0, ArrowStyle::Solid);
    assert_eq!(b.width, 1.0);
}

#[test]
fn clamp_width_nan_is_minimum() {
    assert_eq!(clamp_width(f64::NAN), 1.0);
}

#[test]
fn arrow_point_accessors() {
    let a = make_arrow();
    assert_eq!(a.start(), Point::new(0.0, 0.0));
    assert_eq!(a.end(), Point::new(100.0, 0.0));
    assert_eq!(a.control(), Point::new(50.0, 20.0));
    assert_eq!(a.length(), 100.0);
}

#[test]
fn arrow_translate_moves_all_points() {
    let mut a = make_arrow();
    a.translate(10.0, -5.0);
    assert_eq!(a.start(), Point::new(10.0, -5.0));
    assert_eq!(a.end(), Point::new(110.0, -5.0));
    assert_eq!(a.control(), Point::new(60.0, 15.0));
}

#[test]
fn arrow_apply_patch_clamps_width() {
    let mut a = make_arrow();
    a.apply(&ArrowPatch { width: Some(12.0), color: Some("#000".into()), ..Default::default() });
    assert_eq!(a.width, 10.0);
    assert_eq!(a.color, "#000");
    assert_eq!(a.style, ArrowStyle::Dashed);
}

#[test]
fn arrow_patch_translated_matches_translate() {
    let mut a = make_arrow();
    let mut b = a.clone();
    a.apply(&ArrowPatch::translated(&b, 3.0, 4.0));
    b.translate(3.0, 4.0);
    assert_eq!(a, b);
}

#[test]
fn arrow_serializes_type_field_name() {
    let mut a = make_arrow();
    a.arrow_type = Some(ArrowType::Bidirectional);
    let v = serde_json::to_value(&a).unwrap();
    assert_eq!(v["type"], "bidirectional");
    assert_eq!(v["startX"], 0.0);
    assert_eq!(v["controlY"], 20.0);
    assert!(v.get("sequenceNumber").is_none());
}

#[test]
fn arrow_head_angle_points_along_tangent() {
    let a = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, -50.0), "#000", 2.0, ArrowStyle::Solid);
    assert!((a.head_angle() - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
}

#[test]
fn point_at_hits_endpoints_and_bends_toward_control() {
    let a = make_arrow();
    assert_eq!(a.point_at(0.0), Point::new(0.0, 0.0));
    assert_eq!(a.point_at(1.0), Point::new(100.0, 0.0));
    // Quadratic midpoint is halfway between the chord midpoint and the control point.
    assert_eq!(a.point_at(0.5), Point::new(50.0, 10.0));
}

// =============================================================
// ArrowTemplate
// =============================================================

fn template(arrow_type: ArrowType, control_points: Vec<(f64, f64)>) -> ArrowTemplate {
    ArrowTemplate {
        arrow_type,
        head_style: HeadStyle::Open,
        style: ArrowStyle::Dotted,
        color: "#00FF00".into(),
        width: 4.0,
        control_points,
    }
}

#[test]
fn template_collapses_control_points_to_centroid() {
    let t = template(ArrowType::Curved, vec![(10.0, 10.0), (30.0, 50.0)]);
    let a = t.instantiate(Point::new(0.0, 0.0), Point::new(100.0, 0.0), None);
    assert_eq!(a.control(), Point::new(20.0, 30.0));
    assert_eq!(a.head_style, Some(HeadStyle::Open));
    assert_eq!(a.style, ArrowStyle::Dotted);
}

#[test]
fn template_standard_without_bends_is_straight() {
    let t = template(ArrowType::Standard, vec![]);
    let a = t.instantiate(Point::new(0.0, 0.0), Point::new(100.0, 0.0), Some(3));
    assert_eq!(a.control(), Point::new(50.0, 0.0));
    assert_eq!(a.sequence_number, None);
}

#[test]
fn template_sequence_keeps_number() {
    let t = template(ArrowType::Sequence, vec![]);
    let a = t.instantiate(Point::new(0.0, 0.0), Point::new(100.0, 0.0), Some(3));
    assert_eq!(a.sequence_number, Some(3));
    assert_eq!(a.arrow_type, Some(ArrowType::Sequence));
}

// =============================================================
// TextAnnotation
// =============================================================

#[test]
fn text_apply_patch_rejects_non_positive_font_size() {
    let mut t = make_text();
    t.apply(&TextPatch { font_size: Some(-3.0), is_bold: Some(true), ..Default::default() });
    assert_eq!(t.font_size, crate::consts::DEFAULT_FONT_SIZE);
    assert!(t.is_bold);
}

#[test]
fn text_deserialize_defaults_style_flags() {
    let t: TextAnnotation = serde_json::from_value(json!({
        "id": Uuid::nil(), "x": 0.0, "y": 0.0,
        "text": "hi", "color": "#fff", "fontSize": 12.0
    }))
    .unwrap();
    assert!(!t.is_bold);
    assert!(!t.is_italic);
    assert_eq!(t.alignment, TextAlign::Left);
}

// =============================================================
// Document
// =============================================================

#[test]
fn document_locate_finds_each_kind() {
    let mut doc = Document::new();
    let p = make_player(None);
    let a = make_arrow();
    let t = make_text();
    let (pid, aid, tid) = (p.id, a.id, t.id);
    doc.players.push(p);
    doc.arrows.push(a);
    doc.text_annotations.push(t);

    assert_eq!(doc.locate(&pid), Some(ElementRef::player(pid)));
    assert_eq!(doc.locate(&aid), Some(ElementRef::arrow(aid)));
    assert_eq!(doc.locate(&tid), Some(ElementRef::text(tid)));
    assert_eq!(doc.locate(&Uuid::new_v4()), None);
}

#[test]
fn document_contains_checks_tagged_collection() {
    let mut doc = Document::new();
    let p = make_player(None);
    let id = p.id;
    doc.players.push(p);
    assert!(doc.contains(ElementRef::player(id)));
    assert!(!doc.contains(ElementRef::arrow(id)));
}

#[test]
fn document_remove_returns_presence() {
    let mut doc = Document::new();
    let t = make_text();
    let id = t.id;
    doc.text_annotations.push(t);
    assert!(doc.remove(ElementRef::text(id)));
    assert!(!doc.remove(ElementRef::text(id)));
    assert!(doc.is_empty());
}

#[test]
fn document_remove_team_leaves_others() {
    let mut doc = Document::new();
    doc.players.push(make_player(Some(Team::Home)));
    doc.players.push(make_player(Some(Team::Away)));
    doc.players.push(make_player(None));
    doc.players.push(make_player(Some(Team::Away)));
    assert_eq!(doc.remove_team(Team::Away), 2);
    assert_eq!(doc.players.len(), 2);
    assert_eq!(doc.team_players(Team::Home).count(), 1);
}

#[test]
fn document_ids_unique_detects_collision() {
    let mut doc = Document::new();
    let p = make_player(None);
    let mut a = make_arrow();
    doc.players.push(p.clone());
    doc.arrows.push(a.clone());
    assert!(doc.ids_unique());

    a.id = p.id;
    doc.arrows.push(a);
    assert!(!doc.ids_unique());
}

#[test]
fn document_max_sequence_number() {
    let mut doc = Document::new();
    assert_eq!(doc.max_sequence_number(), None);
    let mut a = make_arrow();
    a.sequence_number = Some(4);
    doc.arrows.push(a);
    doc.arrows.push(make_arrow());
    assert_eq!(doc.max_sequence_number(), Some(4));
}

// =============================================================
// Tactic
// =============================================================

#[test]
fn tactic_serializes_flat_collections() {
    let mut tactic = Tactic { title: "High press".into(), ..Default::default() };
    tactic.document.players.push(make_player(Some(Team::Home)));
    let v = serde_json::to_value(&tactic).unwrap();
    assert!(v["id"].is_null());
    assert_eq!(v["title"], "High press");
    assert_eq!(v["isPublic"], false);
    assert_eq!(v["players"].as_array().unwrap().len(), 1);
    assert_eq!(v["arrows"], json!([]));
    assert_eq!(v["textAnnotations"], json!([]));
}

#[test]
fn tactic_serde_roundtrip_is_deep_equal() {
    let mut tactic = Tactic {
        id: Some(Uuid::new_v4()),
        title: "t".into(),
        description: "d".into(),
        is_public: true,
        document: Document::new(),
    };
    tactic.document.players.push(make_player(Some(Team::Away)));
    tactic.document.arrows.push(make_arrow());
    tactic.document.text_annotations.push(make_text());
    let back: Tactic = serde_json::from_str(&serde_json::to_string(&tactic).unwrap()).unwrap();
    assert_eq!(back, tactic);
}

// =============================================================
// CanvasSize
// =============================================================

#[test]
fn canvas_size_unmeasured_uses_fallback() {
    let size = CanvasSize::default().or_fallback();
    assert_eq!(size.width, crate::consts::FALLBACK_CANVAS_WIDTH);
    assert_eq!(size.height, crate::consts::FALLBACK_CANVAS_HEIGHT);
    assert!(!CanvasSize::new(f64::NAN, 100.0).is_measured());
    assert!(CanvasSize::new(800.0, 500.0).is_measured());
}
