//! Shared 2D geometry primitives and math helpers.
//!
//! Everything here operates in world units. Angles are radians,
//! measured from +x toward +y. These helpers are the fine-grained math
//! the picking, snapping, and transform layers lean on; they carry the
//! epsilon guards so callers never see NaN or infinite results from
//! degenerate input.

use serde::{Deserialize, Serialize};

use crate::constants::GEOMETRY_EPSILON;

/// A point (or vector) in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between this point and `other`.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// True when both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Rotates `p` about `center` by `angle` radians (+x toward +y).
pub fn rotate_point(p: Point, center: Point, angle: f64) -> Point {
    let s = angle.sin();
    let c = angle.cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point {
        x: center.x + dx * c - dy * s,
        y: center.y + dx * s + dy * c,
    }
}

/// Distance from `p` to the segment `a`–`b`.
///
/// Degenerate segments (length below epsilon) fall back to the distance
/// to `a`.
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    project_on_segment(p, a, b).distance_to(&p)
}

/// Nearest point to `p` on the segment `a`–`b`, clamped to the segment.
pub fn project_on_segment(p: Point, a: Point, b: Point) -> Point {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < GEOMETRY_EPSILON * GEOMETRY_EPSILON {
        return a;
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    Point::new(a.x + t * dx, a.y + t * dy)
}

/// Normalizes an angle into the `[0, 2π)` range.
pub fn normalize_angle(angle: f64) -> f64 {
    let two_pi = std::f64::consts::TAU;
    let mut a = angle % two_pi;
    if a < 0.0 {
        a += two_pi;
    }
    a
}

/// Snaps the direction of the vector `origin → p` to the nearest multiple
/// of `increment` radians, preserving the vector's length.
///
/// Used for shift-constrained vertex drags (45° increments). Zero-length
/// vectors are returned unchanged.
pub fn snap_direction(origin: Point, p: Point, increment: f64) -> Point {
    let dx = p.x - origin.x;
    let dy = p.y - origin.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < GEOMETRY_EPSILON || increment < GEOMETRY_EPSILON {
        return p;
    }
    let angle = dy.atan2(dx);
    let snapped = (angle / increment).round() * increment;
    Point::new(
        origin.x + len * snapped.cos(),
        origin.y + len * snapped.sin(),
    )
}

/// Snaps an angle to the nearest multiple of `increment` radians.
pub fn snap_angle(angle: f64, increment: f64) -> f64 {
    if increment < GEOMETRY_EPSILON {
        return angle;
    }
    (angle / increment).round() * increment
}

/// Even-odd (ray casting) point-in-polygon test.
///
/// Points exactly on an edge may land on either side; callers that care
/// test edges first with a tolerance, which is what the picking engine
/// does.
pub fn point_in_polygon(p: Point, vertices: &[Point]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = vertices[i];
        let vj = vertices[j];
        if ((vi.y > p.y) != (vj.y > p.y))
            && (p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
