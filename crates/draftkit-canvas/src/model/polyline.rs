//! Open polyline through an ordered sequence of world points.

use serde::{Deserialize, Serialize};

use draftkit_core::geometry::Point;

use super::line::remap;
use super::{CanvasShape, PointBuf, SegmentBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Total length along the segments.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }
}

impl CanvasShape for Polyline {
    fn local_box(&self) -> (f64, f64, f64, f64) {
        bounds_of(&self.points)
    }

    fn control_points(&self) -> PointBuf {
        self.points.iter().copied().collect()
    }

    fn segments(&self) -> SegmentBuf {
        self.points.windows(2).map(|w| (w[0], w[1])).collect()
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
    }

    fn set_local_box(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (old_x, old_y, old_w, old_h) = self.local_box();
        for p in &mut self.points {
            *p = remap(*p, old_x, old_y, old_w, old_h, x, y, width, height);
        }
    }

    fn set_control_point(&mut self, index: usize, p: Point) -> bool {
        if let Some(slot) = self.points.get_mut(index) {
            *slot = p;
            true
        } else {
            false
        }
    }

    fn control_point_count(&self) -> usize {
        self.points.len()
    }

    fn kind_name(&self) -> &'static str {
        "Polyline"
    }
}

/// Axis-aligned bounds of a point list as (x, y, width, height).
/// Empty lists produce a zero box at the origin.
pub(super) fn bounds_of(points: &[Point]) -> (f64, f64, f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0, 0.0, 0.0);
    }
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    (min_x, min_y, max_x - min_x, max_y - min_y)
}
