//! Formation templates and the formation applier.
//!
//! A template is a team-agnostic list of slots in normalized space:
//!
//! - `x`: 0 = the team's left touchline, 1 = its right touchline
//! - `y`: 0 = its own goal line, 1 = the halfway line
//!
//! Applying a template scales those slots into the team's own half of the
//! pitch. With a horizontal pitch home defends the left goal and away the
//! right; with a vertical pitch home defends the bottom goal and away the top.
//! Away slots are mirrored so a left-back stays on the team's own left.

#[cfg(test)]
#[path = "formation_test.rs"]
mod formation_test;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::doc::{CanvasSize, Player, Team};

/// Which way the pitch is drawn on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Goals on the left and right edges.
    #[default]
    Horizontal,
    /// Goals on the top and bottom edges.
    Vertical,
}

/// One position in a formation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormationSlot {
    pub x: f64,
    pub y: f64,
    pub number: u32,
}

/// A named, normalized formation layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationTemplate {
    pub name: String,
    pub slots: Vec<FormationSlot>,
}

impl FormationTemplate {
    fn from_table(name: &str, table: &[(f64, f64, u32)]) -> Self {
        Self {
            name: name.to_string(),
            slots: table.iter().map(|&(x, y, number)| FormationSlot { x, y, number }).collect(),
        }
    }
}

// ── Seed catalog ────────────────────────────────────────────────

const F_4_4_2: &[(f64, f64, u32)] = &[
    (0.50, 0.05, 1),
    (0.15, 0.30, 3),
    (0.38, 0.25, 4),
    (0.62, 0.25, 5),
    (0.85, 0.30, 2),
    (0.15, 0.60, 11),
    (0.38, 0.55, 8),
    (0.62, 0.55, 6),
    (0.85, 0.60, 7),
    (0.38, 0.88, 10),
    (0.62, 0.88, 9),
];

const F_4_3_3: &[(f64, f64, u32)] = &[
    (0.50, 0.05, 1),
    (0.15, 0.30, 3),
    (0.38, 0.25, 4),
    (0.62, 0.25, 5),
    (0.85, 0.30, 2),
    (0.30, 0.55, 8),
    (0.50, 0.48, 6),
    (0.70, 0.55, 10),
    (0.15, 0.85, 11),
    (0.50, 0.90, 9),
    (0.85, 0.85, 7),
];

const F_4_2_3_1: &[(f64, f64, u32)] = &[
    (0.50, 0.05, 1),
    (0.15, 0.30, 3),
    (0.38, 0.25, 4),
    (0.62, 0.25, 5),
    (0.85, 0.30, 2),
    (0.38, 0.48, 6),
    (0.62, 0.48, 8),
    (0.15, 0.72, 11),
    (0.50, 0.70, 10),
    (0.85, 0.72, 7),
    (0.50, 0.90, 9),
];

const F_3_5_2: &[(f64, f64, u32)] = &[
    (0.50, 0.05, 1),
    (0.25, 0.25, 4),
    (0.50, 0.22, 5),
    (0.75, 0.25, 6),
    (0.10, 0.58, 3),
    (0.33, 0.52, 8),
    (0.50, 0.62, 10),
    (0.67, 0.52, 7),
    (0.90, 0.58, 2),
    (0.38, 0.88, 9),
    (0.62, 0.88, 11),
];

const F_5_3_2: &[(f64, f64, u32)] = &[
    (0.50, 0.05, 1),
    (0.10, 0.35, 3),
    (0.30, 0.25, 4),
    (0.50, 0.22, 5),
    (0.70, 0.25, 6),
    (0.90, 0.35, 2),
    (0.30, 0.55, 8),
    (0.50, 0.52, 10),
    (0.70, 0.55, 7),
    (0.38, 0.88, 9),
    (0.62, 0.88, 11),
];

const F_3_4_3: &[(f64, f64, u32)] = &[
    (0.50, 0.05, 1),
    (0.25, 0.25, 4),
    (0.50, 0.22, 5),
    (0.75, 0.25, 6),
    (0.12, 0.55, 3),
    (0.38, 0.52, 8),
    (0.62, 0.52, 10),
    (0.88, 0.55, 2),
    (0.15, 0.85, 11),
    (0.50, 0.90, 9),
    (0.85, 0.85, 7),
];

/// The built-in formations, in display order.
#[must_use]
pub fn catalog() -> Vec<FormationTemplate> {
    [
        ("4-4-2", F_4_4_2),
        ("4-3-3", F_4_3_3),
        ("4-2-3-1", F_4_2_3_1),
        ("3-5-2", F_3_5_2),
        ("5-3-2", F_5_3_2),
        ("3-4-3", F_3_4_3),
    ]
    .into_iter()
    .map(|(name, table)| FormationTemplate::from_table(name, table))
    .collect()
}

/// Look up a built-in formation by name. Dashes are optional (`"442"` works).
#[must_use]
pub fn find(name: &str) -> Option<FormationTemplate> {
    let wanted: String = name.chars().filter(|c| *c != '-').collect();
    catalog()
        .into_iter()
        .find(|t| t.name.chars().filter(|c| *c != '-').collect::<String>() == wanted)
}

// ── Applier ─────────────────────────────────────────────────────

/// Position `template` for `team` on a canvas of `canvas` size.
///
/// Returns fresh players with new ids and `color`. An unmeasured canvas falls
/// back to the default pitch size, and out-of-range or non-finite slots are
/// clamped, so every coordinate produced is finite.
#[must_use]
pub fn place(
    template: &FormationTemplate,
    team: Team,
    canvas: CanvasSize,
    orientation: Orientation,
    color: &str,
) -> Vec<Player> {
    if !canvas.is_measured() {
        warn!(
            width = canvas.width,
            height = canvas.height,
            formation = %template.name,
            "canvas not measured; placing formation on fallback pitch size"
        );
    }
    let size = canvas.or_fallback();
    template
        .slots
        .iter()
        .map(|slot| {
            let (x, y) = project(*slot, team, size, orientation);
            Player::new(x, y, slot.number.to_string(), color, Some(team))
        })
        .collect()
}

fn project(slot: FormationSlot, team: Team, size: CanvasSize, orientation: Orientation) -> (f64, f64) {
    let lateral = unit(slot.x);
    let depth = unit(slot.y);
    let (w, h) = (size.width, size.height);
    match (orientation, team) {
        (Orientation::Horizontal, Team::Home) => (depth * w / 2.0, lateral * h),
        (Orientation::Horizontal, Team::Away) => (w - depth * w / 2.0, (1.0 - lateral) * h),
        (Orientation::Vertical, Team::Home) => (lateral * w, h - depth * h / 2.0),
        (Orientation::Vertical, Team::Away) => ((1.0 - lateral) * w, depth * h / 2.0),
    }
}

fn unit(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.5 }
}
