//! Straight line segment between two world points.

use serde::{Deserialize, Serialize};
use smallvec::smallvec;

use draftkit_core::constants::GEOMETRY_EPSILON;
use draftkit_core::geometry::Point;

use super::{CanvasShape, PointBuf, SegmentBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Angle of the segment in radians.
    pub fn angle(&self) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }
}

impl CanvasShape for Line {
    fn local_box(&self) -> (f64, f64, f64, f64) {
        let min_x = self.start.x.min(self.end.x);
        let min_y = self.start.y.min(self.end.y);
        (
            min_x,
            min_y,
            self.start.x.max(self.end.x) - min_x,
            self.start.y.max(self.end.y) - min_y,
        )
    }

    fn control_points(&self) -> PointBuf {
        smallvec![self.start, self.end]
    }

    fn segments(&self) -> SegmentBuf {
        smallvec![(self.start, self.end)]
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.start.x += dx;
        self.start.y += dy;
        self.end.x += dx;
        self.end.y += dy;
    }

    fn set_local_box(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (old_x, old_y, old_w, old_h) = self.local_box();
        self.start = remap(self.start, old_x, old_y, old_w, old_h, x, y, width, height);
        self.end = remap(self.end, old_x, old_y, old_w, old_h, x, y, width, height);
    }

    fn set_control_point(&mut self, index: usize, p: Point) -> bool {
        match index {
            0 => {
                self.start = p;
                true
            }
            1 => {
                self.end = p;
                true
            }
            _ => false,
        }
    }

    fn control_point_count(&self) -> usize {
        2
    }

    fn kind_name(&self) -> &'static str {
        "Line"
    }
}

/// Maps a point proportionally from one box into another. Degenerate
/// source axes (zero extent) place the point at the target axis center.
pub(super) fn remap(
    p: Point,
    old_x: f64,
    old_y: f64,
    old_w: f64,
    old_h: f64,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Point {
    let tx = if old_w.abs() > GEOMETRY_EPSILON {
        (p.x - old_x) / old_w
    } else {
        0.5
    };
    let ty = if old_h.abs() > GEOMETRY_EPSILON {
        (p.y - old_y) / old_h
    } else {
        0.5
    };
    Point::new(x + tx * width, y + ty * height)
}
