//! Hit-testing pointer positions against document elements.
//!
//! Handles of the selected arrow win over everything else. After that,
//! elements are tested top-most first in paint order: text above players,
//! players above arrows, and later elements above earlier ones.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{GLYPH_WIDTH_RATIO, HANDLE_RADIUS_PX, LINE_HEIGHT_RATIO};
use crate::doc::{Arrow, Document, ElementKind, ElementRef, Player, TextAnnotation};
use crate::geom::{self, Point};

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ArrowStart,
    ArrowEnd,
    ArrowControl,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub element: ElementRef,
    pub part: HitPart,
}

/// Find the element (and part) under `p`, checking the selected arrow's handles first.
#[must_use]
pub fn hit_test(p: Point, doc: &Document, selected: Option<ElementRef>) -> Option<Hit> {
    if let Some(hit) = selected.and_then(|sel| hit_selected_handles(p, doc, sel)) {
        return Some(hit);
    }
    if let Some(t) = doc.text_annotations.iter().rev().find(|t| hit_text(p, t)) {
        return Some(Hit { element: ElementRef::text(t.id), part: HitPart::Body });
    }
    if let Some(pl) = doc.players.iter().rev().find(|pl| hit_player(p, pl)) {
        return Some(Hit { element: ElementRef::player(pl.id), part: HitPart::Body });
    }
    doc.arrows
        .iter()
        .rev()
        .find(|a| hit_arrow_body(p, a))
        .map(|a| Hit { element: ElementRef::arrow(a.id), part: HitPart::Body })
}

fn hit_selected_handles(p: Point, doc: &Document, selected: ElementRef) -> Option<Hit> {
    if selected.kind != ElementKind::Arrow {
        return None;
    }
    let arrow = doc.arrow(&selected.id)?;
    let part = arrow_handle_at(p, arrow)?;
    Some(Hit { element: selected, part })
}

/// Which handle of `arrow` lies under `p`, if any. The control handle wins ties.
#[must_use]
pub fn arrow_handle_at(p: Point, arrow: &Arrow) -> Option<HitPart> {
    [
        (arrow.control(), HitPart::ArrowControl),
        (arrow.end(), HitPart::ArrowEnd),
        (arrow.start(), HitPart::ArrowStart),
    ]
    .into_iter()
    .find(|(handle, _)| geom::distance(p, *handle) <= HANDLE_RADIUS_PX)
    .map(|(_, part)| part)
}

/// Whether `p` falls inside a player's token.
#[must_use]
pub fn hit_player(p: Point, player: &Player) -> bool {
    geom::distance(p, player.position()) <= player.size
}

/// Whether `p` lies within hit slop of an arrow's curve, widened by its stroke.
#[must_use]
pub fn hit_arrow_body(p: Point, arrow: &Arrow) -> bool {
    arrow.distance_to(p) <= HANDLE_RADIUS_PX + arrow.width / 2.0
}

/// Whether `p` falls inside the estimated bounds of a text annotation.
#[must_use]
pub fn hit_text(p: Point, text: &TextAnnotation) -> bool {
    let (w, h) = text_bounds(text);
    p.x >= text.x && p.x <= text.x + w && p.y >= text.y && p.y <= text.y + h
}

/// Approximate `(width, height)` of a text annotation from its font size.
///
/// The host measures real glyphs when painting; this estimate only needs to be
/// good enough to grab the label.
#[must_use]
pub fn text_bounds(text: &TextAnnotation) -> (f64, f64) {
    let longest = text.text.lines().map(|l| l.chars().count()).max().unwrap_or(0).max(1);
    let lines = text.text.lines().count().max(1);
    #[allow(clippy::cast_precision_loss)]
    let (longest, lines) = (longest as f64, lines as f64);
    (longest * text.font_size * GLYPH_WIDTH_RATIO, lines * text.font_size * LINE_HEIGHT_RATIO)
}
