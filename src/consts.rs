//! Shared numeric constants for the tactic board.

// ── History ─────────────────────────────────────────────────────

/// Maximum number of snapshots retained by the undo history.
pub const MAX_HISTORY_LENGTH: usize = 50;

// ── Arrows ──────────────────────────────────────────────────────

/// Start/end distance at or below which an arrow is degenerate and discarded.
pub const MIN_ARROW_LENGTH: f64 = 10.0;

/// Perpendicular control-point offset as a fraction of the chord length.
pub const CONTROL_OFFSET_RATIO: f64 = 1.0 / 6.0;

/// Fixed perpendicular control-point offset used by the two-click variant.
pub const TWO_CLICK_CURVE_OFFSET: f64 = 30.0;

/// Stroke width bounds for arrows.
pub const MIN_ARROW_WIDTH: f64 = 1.0;
pub const MAX_ARROW_WIDTH: f64 = 10.0;

/// Number of segments used when sampling a quadratic curve for hit-testing.
pub const CURVE_SAMPLES: usize = 32;

// ── Elements ────────────────────────────────────────────────────

/// Default player token radius.
pub const DEFAULT_PLAYER_SIZE: f64 = 20.0;

/// Default text annotation font size in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Content given to a freshly placed text annotation.
pub const DEFAULT_TEXT: &str = "Text";

/// Offset applied to a duplicated element.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Highest jersey number handed out before wrapping back to 1.
pub const MAX_JERSEY_NUMBER: u32 = 99;

// ── Colours ─────────────────────────────────────────────────────

pub const HOME_COLOR: &str = "#E53935";
pub const AWAY_COLOR: &str = "#1E88E5";
pub const NEUTRAL_COLOR: &str = "#FDD835";
pub const ARROW_COLOR: &str = "#FFFFFF";
pub const TEXT_COLOR: &str = "#FFFFFF";

// ── Hit-testing ─────────────────────────────────────────────────

/// Hit slop in pixels for arrow bodies and arrow handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Approximate glyph width as a fraction of font size, for text bounds.
pub const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Line height as a multiple of font size, for text bounds.
pub const LINE_HEIGHT_RATIO: f64 = 1.2;

// ── Canvas ──────────────────────────────────────────────────────

/// Canvas size assumed when the host has not measured the viewport yet.
pub const FALLBACK_CANVAS_WIDTH: f64 = 1050.0;
pub const FALLBACK_CANVAS_HEIGHT: f64 = 680.0;
