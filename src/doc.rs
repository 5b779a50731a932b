//! Document model: players, arrows, text annotations, and the tactic aggregate.
//!
//! This module defines what is drawn on the pitch (`Player`, `Arrow`,
//! `TextAnnotation`), sparse-update types for property edits (`PlayerPatch`,
//! `ArrowPatch`, `TextPatch`), a tagged reference used for selection
//! (`ElementRef`), and the two containers: `Document`, the three collections
//! the undo history snapshots, and `Tactic`, the saved aggregate that adds
//! title, description and visibility.
//!
//! Field names serialize in camelCase because that is the shape the tactic
//! store persists verbatim.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{
    CONTROL_OFFSET_RATIO, DEFAULT_FONT_SIZE, DEFAULT_PLAYER_SIZE, FALLBACK_CANVAS_HEIGHT, FALLBACK_CANVAS_WIDTH,
    MAX_ARROW_WIDTH, MIN_ARROW_WIDTH,
};
use crate::geom::{self, Point};

/// Unique identifier for any element on the board.
///
/// A single v4 generator serves all three collections, so ids never collide
/// across kinds.
pub type ElementId = Uuid;

/// Which side a player belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Home,
    Away,
}

impl Team {
    /// The other side.
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }
}

/// The kind of a board element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Player,
    Arrow,
    Text,
}

/// Tagged pointer to one element of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef {
    pub kind: ElementKind,
    pub id: ElementId,
}

impl ElementRef {
    #[must_use]
    pub fn player(id: ElementId) -> Self {
        Self { kind: ElementKind::Player, id }
    }

    #[must_use]
    pub fn arrow(id: ElementId) -> Self {
        Self { kind: ElementKind::Arrow, id }
    }

    #[must_use]
    pub fn text(id: ElementId) -> Self {
        Self { kind: ElementKind::Text, id }
    }
}

impl std::fmt::Display for ElementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {}", self.kind, self.id)
    }
}

// =============================================================
// Player
// =============================================================

/// A player token on the pitch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: ElementId,
    /// Centre x in canvas coordinates.
    pub x: f64,
    /// Centre y in canvas coordinates.
    pub y: f64,
    /// Shirt label. Usually a number, but free-form labels like `"GK"` are allowed.
    pub number: String,
    /// CSS colour string.
    pub color: String,
    /// `None` for teamless quick-add tokens.
    pub team: Option<Team>,
    /// Secondary caption drawn under the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Token radius.
    #[serde(default = "default_player_size")]
    pub size: f64,
}

fn default_player_size() -> f64 {
    DEFAULT_PLAYER_SIZE
}

impl Player {
    /// Create a player with a fresh id.
    #[must_use]
    pub fn new(x: f64, y: f64, number: impl Into<String>, color: impl Into<String>, team: Option<Team>) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            number: number.into(),
            color: color.into(),
            team,
            label: None,
            size: DEFAULT_PLAYER_SIZE,
        }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The shirt label as a jersey number, when it is numeric.
    #[must_use]
    pub fn jersey_number(&self) -> Option<u32> {
        match self.number.trim().parse::<u32>() {
            Ok(n) => Some(n),
            Err(_) => None,
        }
    }

    /// Apply the present fields of `patch`.
    pub fn apply(&mut self, patch: &PlayerPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(ref number) = patch.number {
            self.number.clone_from(number);
        }
        if let Some(ref color) = patch.color {
            self.color.clone_from(color);
        }
        if let Some(team) = patch.team {
            self.team = team;
        }
        if let Some(ref label) = patch.label {
            self.label.clone_from(label);
        }
        if let Some(size) = patch.size {
            self.size = if size.is_finite() && size > 0.0 { size } else { DEFAULT_PLAYER_SIZE };
        }
    }
}

/// Sparse update for a player. Only present fields are applied.
///
/// Nullable fields use a nested option: `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub number: Option<String>,
    pub color: Option<String>,
    pub team: Option<Option<Team>>,
    pub label: Option<Option<String>>,
    pub size: Option<f64>,
}

impl PlayerPatch {
    /// Patch that moves a player to `p`.
    #[must_use]
    pub fn position(p: Point) -> Self {
        Self { x: Some(p.x), y: Some(p.y), ..Default::default() }
    }
}

// =============================================================
// Arrow
// =============================================================

/// Stroke pattern of an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Semantic arrow type from the template system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowType {
    /// Single head at the end point.
    #[default]
    Standard,
    /// Heads at both ends.
    Bidirectional,
    /// Deliberately bent run or pass.
    Curved,
    /// Numbered step of an ordered movement diagram.
    Sequence,
}

/// Arrowhead rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadStyle {
    #[default]
    Filled,
    Open,
    None,
}

/// A curved arrow: one quadratic Bézier from start to end bent by a control point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    pub id: ElementId,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub control_x: f64,
    pub control_y: f64,
    pub color: String,
    /// Stroke thickness, kept within 1–10.
    pub width: f64,
    pub style: ArrowStyle,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub arrow_type: Option<ArrowType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_style: Option<HeadStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<u32>,
}

impl Arrow {
    /// Create an arrow with a fresh id. `width` is clamped to the supported range.
    #[must_use]
    pub fn new(start: Point, end: Point, control: Point, color: impl Into<String>, width: f64, style: ArrowStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_x: start.x,
            start_y: start.y,
            end_x: end.x,
            end_y: end.y,
            control_x: control.x,
            control_y: control.y,
            color: color.into(),
            width: clamp_width(width),
            style,
            arrow_type: None,
            head_style: None,
            sequence_number: None,
        }
    }

    #[must_use]
    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    #[must_use]
    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }

    #[must_use]
    pub fn control(&self) -> Point {
        Point::new(self.control_x, self.control_y)
    }

    /// Chord length between start and end.
    #[must_use]
    pub fn length(&self) -> f64 {
        geom::distance(self.start(), self.end())
    }

    /// Point on the curve at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point {
        geom::quad_point(self.start(), self.control(), self.end(), t)
    }

    /// Direction the arrowhead points, in radians.
    #[must_use]
    pub fn head_angle(&self) -> f64 {
        geom::end_tangent_angle(self.start(), self.control(), self.end())
    }

    /// Shortest distance from `p` to the rendered curve.
    #[must_use]
    pub fn distance_to(&self, p: Point) -> f64 {
        geom::distance_to_quad(p, self.start(), self.control(), self.end())
    }

    /// Move all three defining points by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.start_x += dx;
        self.start_y += dy;
        self.end_x += dx;
        self.end_y += dy;
        self.control_x += dx;
        self.control_y += dy;
    }

    /// Apply the present fields of `patch`.
    pub fn apply(&mut self, patch: &ArrowPatch) {
        if let Some(v) = patch.start_x {
            self.start_x = v;
        }
        if let Some(v) = patch.start_y {
            self.start_y = v;
        }
        if let Some(v) = patch.end_x {
            self.end_x = v;
        }
        if let Some(v) = patch.end_y {
            self.end_y = v;
        }
        if let Some(v) = patch.control_x {
            self.control_x = v;
        }
        if let Some(v) = patch.control_y {
            self.control_y = v;
        }
        if let Some(ref color) = patch.color {
            self.color.clone_from(color);
        }
        if let Some(width) = patch.width {
            self.width = clamp_width(width);
        }
        if let Some(style) = patch.style {
            self.style = style;
        }
        if let Some(arrow_type) = patch.arrow_type {
            self.arrow_type = arrow_type;
        }
        if let Some(head_style) = patch.head_style {
            self.head_style = head_style;
        }
        if let Some(sequence_number) = patch.sequence_number {
            self.sequence_number = sequence_number;
        }
    }
}

/// Clamp a stroke width into the supported 1–10 range. NaN becomes the minimum.
#[must_use]
pub fn clamp_width(width: f64) -> f64 {
    if width.is_nan() {
        return MIN_ARROW_WIDTH;
    }
    width.clamp(MIN_ARROW_WIDTH, MAX_ARROW_WIDTH)
}

/// Sparse update for an arrow. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrowPatch {
    pub start_x: Option<f64>,
    pub start_y: Option<f64>,
    pub end_x: Option<f64>,
    pub end_y: Option<f64>,
    pub control_x: Option<f64>,
    pub control_y: Option<f64>,
    pub color: Option<String>,
    pub width: Option<f64>,
    pub style: Option<ArrowStyle>,
    pub arrow_type: Option<Option<ArrowType>>,
    pub head_style: Option<Option<HeadStyle>>,
    pub sequence_number: Option<Option<u32>>,
}

impl ArrowPatch {
    #[must_use]
    pub fn start(p: Point) -> Self {
        Self { start_x: Some(p.x), start_y: Some(p.y), ..Default::default() }
    }

    #[must_use]
    pub fn end(p: Point) -> Self {
        Self { end_x: Some(p.x), end_y: Some(p.y), ..Default::default() }
    }

    #[must_use]
    pub fn control(p: Point) -> Self {
        Self { control_x: Some(p.x), control_y: Some(p.y), ..Default::default() }
    }

    /// Patch placing all three defining points of `arrow` translated by `(dx, dy)`.
    #[must_use]
    pub fn translated(arrow: &Arrow, dx: f64, dy: f64) -> Self {
        Self {
            start_x: Some(arrow.start_x + dx),
            start_y: Some(arrow.start_y + dy),
            end_x: Some(arrow.end_x + dx),
            end_y: Some(arrow.end_y + dy),
            control_x: Some(arrow.control_x + dx),
            control_y: Some(arrow.control_y + dy),
            ..Default::default()
        }
    }
}

/// A reusable arrow preset, instantiated directly into an [`Arrow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowTemplate {
    #[serde(rename = "type")]
    pub arrow_type: ArrowType,
    pub head_style: HeadStyle,
    pub style: ArrowStyle,
    pub color: String,
    pub width: f64,
    /// Bend points in canvas coordinates. Collapsed to their centroid because
    /// an arrow carries a single control point.
    #[serde(default)]
    pub control_points: Vec<(f64, f64)>,
}

impl ArrowTemplate {
    /// Build an arrow from this template between `start` and `end`.
    ///
    /// Without explicit bend points, curved arrows get the default
    /// proportional bend and every other type is drawn straight.
    #[must_use]
    pub fn instantiate(&self, start: Point, end: Point, sequence_number: Option<u32>) -> Arrow {
        let bends: Vec<Point> = self.control_points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        let control = geom::centroid(&bends).unwrap_or_else(|| match self.arrow_type {
            ArrowType::Curved => geom::proportional_control(start, end, CONTROL_OFFSET_RATIO),
            _ => geom::midpoint(start, end),
        });
        let mut arrow = Arrow::new(start, end, control, self.color.clone(), self.width, self.style);
        arrow.arrow_type = Some(self.arrow_type);
        arrow.head_style = Some(self.head_style);
        if self.arrow_type == ArrowType::Sequence {
            arrow.sequence_number = sequence_number;
        }
        arrow
    }
}

// =============================================================
// Text annotation
// =============================================================

/// Horizontal alignment of a text annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A free text label anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnnotation {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: String,
    /// Font size in pixels.
    pub font_size: f64,
    #[serde(default)]
    pub is_bold: bool,
    #[serde(default)]
    pub is_italic: bool,
    #[serde(default)]
    pub alignment: TextAlign,
}

impl TextAnnotation {
    /// Create a text annotation with a fresh id.
    #[must_use]
    pub fn new(x: f64, y: f64, text: impl Into<String>, color: impl Into<String>, font_size: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            text: text.into(),
            color: color.into(),
            font_size,
            is_bold: false,
            is_italic: false,
            alignment: TextAlign::Left,
        }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Apply the present fields of `patch`.
    pub fn apply(&mut self, patch: &TextPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(ref text) = patch.text {
            self.text.clone_from(text);
        }
        if let Some(ref color) = patch.color {
            self.color.clone_from(color);
        }
        if let Some(font_size) = patch.font_size {
            self.font_size = if font_size.is_finite() && font_size > 0.0 { font_size } else { DEFAULT_FONT_SIZE };
        }
        if let Some(b) = patch.is_bold {
            self.is_bold = b;
        }
        if let Some(i) = patch.is_italic {
            self.is_italic = i;
        }
        if let Some(a) = patch.alignment {
            self.alignment = a;
        }
    }
}

/// Sparse update for a text annotation. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub text: Option<String>,
    pub color: Option<String>,
    pub font_size: Option<f64>,
    pub is_bold: Option<bool>,
    pub is_italic: Option<bool>,
    pub alignment: Option<TextAlign>,
}

impl TextPatch {
    /// Patch that moves a text annotation to `p`.
    #[must_use]
    pub fn position(p: Point) -> Self {
        Self { x: Some(p.x), y: Some(p.y), ..Default::default() }
    }
}

// =============================================================
// Element patch
// =============================================================

/// A sparse update addressed to one element kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementPatch {
    Player(PlayerPatch),
    Arrow(ArrowPatch),
    Text(TextPatch),
}

impl ElementPatch {
    /// The element kind this patch applies to.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Player(_) => ElementKind::Player,
            Self::Arrow(_) => ElementKind::Arrow,
            Self::Text(_) => ElementKind::Text,
        }
    }

    /// Whether every coordinate the patch sets is finite.
    #[must_use]
    pub fn coordinates_finite(&self) -> bool {
        let coords: Vec<Option<f64>> = match self {
            Self::Player(p) => vec![p.x, p.y, p.size],
            Self::Arrow(a) => vec![a.start_x, a.start_y, a.end_x, a.end_y, a.control_x, a.control_y],
            Self::Text(t) => vec![t.x, t.y],
        };
        coords.into_iter().flatten().all(f64::is_finite)
    }
}

// =============================================================
// Document
// =============================================================

/// The three element collections. This is exactly what history snapshots.
///
/// Order within each collection is insertion order and only affects paint order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub arrows: Vec<Arrow>,
    #[serde(default)]
    pub text_annotations: Vec<TextAnnotation>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn player(&self, id: &ElementId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == *id)
    }

    pub fn player_mut(&mut self, id: &ElementId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == *id)
    }

    #[must_use]
    pub fn arrow(&self, id: &ElementId) -> Option<&Arrow> {
        self.arrows.iter().find(|a| a.id == *id)
    }

    pub fn arrow_mut(&mut self, id: &ElementId) -> Option<&mut Arrow> {
        self.arrows.iter_mut().find(|a| a.id == *id)
    }

    #[must_use]
    pub fn text(&self, id: &ElementId) -> Option<&TextAnnotation> {
        self.text_annotations.iter().find(|t| t.id == *id)
    }

    pub fn text_mut(&mut self, id: &ElementId) -> Option<&mut TextAnnotation> {
        self.text_annotations.iter_mut().find(|t| t.id == *id)
    }

    /// Find which collection holds `id`.
    #[must_use]
    pub fn locate(&self, id: &ElementId) -> Option<ElementRef> {
        if self.player(id).is_some() {
            Some(ElementRef::player(*id))
        } else if self.arrow(id).is_some() {
            Some(ElementRef::arrow(*id))
        } else if self.text(id).is_some() {
            Some(ElementRef::text(*id))
        } else {
            None
        }
    }

    /// Whether the referenced element exists in the collection its tag names.
    #[must_use]
    pub fn contains(&self, element: ElementRef) -> bool {
        match element.kind {
            ElementKind::Player => self.player(&element.id).is_some(),
            ElementKind::Arrow => self.arrow(&element.id).is_some(),
            ElementKind::Text => self.text(&element.id).is_some(),
        }
    }

    /// Apply `patch` to element `id`. Returns false if no element of the
    /// patch's kind has that id.
    pub fn apply_patch(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        match patch {
            ElementPatch::Player(p) => {
                let Some(el) = self.player_mut(id) else {
                    return false;
                };
                el.apply(p);
            }
            ElementPatch::Arrow(a) => {
                let Some(el) = self.arrow_mut(id) else {
                    return false;
                };
                el.apply(a);
            }
            ElementPatch::Text(t) => {
                let Some(el) = self.text_mut(id) else {
                    return false;
                };
                el.apply(t);
            }
        }
        true
    }

    /// Remove an element. Returns false if it was not present.
    pub fn remove(&mut self, element: ElementRef) -> bool {
        let id = element.id;
        match element.kind {
            ElementKind::Player => remove_by(&mut self.players, |p| p.id == id),
            ElementKind::Arrow => remove_by(&mut self.arrows, |a| a.id == id),
            ElementKind::Text => remove_by(&mut self.text_annotations, |t| t.id == id),
        }
    }

    /// Remove every player on `team`, returning how many were removed.
    pub fn remove_team(&mut self, team: Team) -> usize {
        let before = self.players.len();
        self.players.retain(|p| p.team != Some(team));
        before - self.players.len()
    }

    /// Players on `team`, in insertion order.
    pub fn team_players(&self, team: Team) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |p| p.team == Some(team))
    }

    /// Highest sequence number used by any arrow.
    #[must_use]
    pub fn max_sequence_number(&self) -> Option<u32> {
        self.arrows.iter().filter_map(|a| a.sequence_number).max()
    }

    /// Total number of elements across all collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len() + self.arrows.len() + self.text_annotations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.players.clear();
        self.arrows.clear();
        self.text_annotations.clear();
    }

    /// Whether every id is unique across all three collections.
    #[must_use]
    pub fn ids_unique(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.len());
        self.players
            .iter()
            .map(|p| p.id)
            .chain(self.arrows.iter().map(|a| a.id))
            .chain(self.text_annotations.iter().map(|t| t.id))
            .all(|id| seen.insert(id))
    }
}

fn remove_by<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> bool {
    let Some(idx) = items.iter().position(pred) else {
        return false;
    };
    items.remove(idx);
    true
}

// =============================================================
// Tactic aggregate
// =============================================================

/// The saved document: metadata plus the three element collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tactic {
    /// `None` until the store assigns one on first save.
    pub id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(flatten)]
    pub document: Document,
}

/// Viewport-derived canvas dimensions, populated by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether the host has supplied a usable, positive, finite size.
    #[must_use]
    pub fn is_measured(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// This size if measured, otherwise the fallback pitch size.
    #[must_use]
    pub fn or_fallback(self) -> Self {
        if self.is_measured() {
            self
        } else {
            Self { width: FALLBACK_CANVAS_WIDTH, height: FALLBACK_CANVAS_HEIGHT }
        }
    }
}
