//! Pure geometry helpers: points, quadratic Bézier curves, and distances.
//!
//! Every arrow on the board is a single quadratic Bézier defined by a start,
//! an end, and one control point. The helpers here evaluate that curve,
//! measure how far a pointer is from it, and derive the default control
//! points the drawing state machine uses.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use crate::consts::CURVE_SAMPLES;

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite (not NaN or infinite).
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Return this point translated by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// Midpoint of the segment `a`–`b`.
#[must_use]
pub fn midpoint(a: Point, b: Point) -> Point {
    Point { x: (a.x + b.x) / 2.0, y: (a.y + b.y) / 2.0 }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Shortest distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    distance(p, Point { x: a.x + t * dx, y: a.y + t * dy })
}

/// Evaluate the quadratic Bézier `start`/`control`/`end` at parameter `t` in `[0, 1]`.
#[must_use]
pub fn quad_point(start: Point, control: Point, end: Point, t: f64) -> Point {
    let u = 1.0 - t;
    Point {
        x: u * u * start.x + 2.0 * u * t * control.x + t * t * end.x,
        y: u * u * start.y + 2.0 * u * t * control.y + t * t * end.y,
    }
}

/// Approximate shortest distance from `p` to a quadratic Bézier curve.
///
/// The curve is flattened into [`CURVE_SAMPLES`] segments, which is well within
/// hit-slop accuracy for arrows of on-screen size.
#[must_use]
pub fn distance_to_quad(p: Point, start: Point, control: Point, end: Point) -> f64 {
    let mut best = f64::INFINITY;
    let mut prev = start;
    for i in 1..=CURVE_SAMPLES {
        #[allow(clippy::cast_precision_loss)]
        let t = i as f64 / CURVE_SAMPLES as f64;
        let next = quad_point(start, control, end, t);
        best = best.min(distance_to_segment(p, prev, next));
        prev = next;
    }
    best
}

/// Control point offset perpendicular to the chord at `ratio` of its length.
///
/// Produces a gentle curve that bows to the left of the direction of travel.
/// Coincident endpoints yield the shared point itself.
#[must_use]
pub fn proportional_control(start: Point, end: Point, ratio: f64) -> Point {
    let len = distance(start, end);
    perpendicular_from_midpoint(start, end, len * ratio)
}

/// Control point offset perpendicular to the chord by a fixed `offset`.
#[must_use]
pub fn fixed_control(start: Point, end: Point, offset: f64) -> Point {
    perpendicular_from_midpoint(start, end, offset)
}

fn perpendicular_from_midpoint(start: Point, end: Point, offset: f64) -> Point {
    let mid = midpoint(start, end);
    let len = distance(start, end);
    if len == 0.0 {
        return mid;
    }
    let nx = -(end.y - start.y) / len;
    let ny = (end.x - start.x) / len;
    mid.offset(nx * offset, ny * offset)
}

/// Direction of travel at the end of the curve, in radians.
///
/// The tangent at `t = 1` runs from the control point to the end point. When
/// those coincide the chord direction is used instead.
#[must_use]
pub fn end_tangent_angle(start: Point, control: Point, end: Point) -> f64 {
    if distance(control, end) > f64::EPSILON {
        (end.y - control.y).atan2(end.x - control.x)
    } else {
        (end.y - start.y).atan2(end.x - start.x)
    }
}

/// Centroid of a non-empty list of points.
#[must_use]
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point { x: sx / n, y: sy / n })
}
