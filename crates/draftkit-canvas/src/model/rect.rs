//! Axis-aligned rectangle; rotation is applied at the entity level.

use serde::{Deserialize, Serialize};
use smallvec::smallvec;

use draftkit_core::geometry::Point;

use super::{CanvasShape, PointBuf, SegmentBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle, normalizing negative extents so width and
    /// height are always non-negative.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 {
            (y + height, -height)
        } else {
            (y, height)
        };
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Corners in TL, TR, BR, BL order (unrotated).
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

impl CanvasShape for Rect {
    fn local_box(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.width, self.height)
    }

    fn control_points(&self) -> PointBuf {
        // Corners are resize targets, not draggable control points.
        PointBuf::new()
    }

    fn segments(&self) -> SegmentBuf {
        let c = self.corners();
        smallvec![(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    fn set_local_box(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
    }

    fn set_control_point(&mut self, _index: usize, _p: Point) -> bool {
        false
    }

    fn control_point_count(&self) -> usize {
        0
    }

    fn kind_name(&self) -> &'static str {
        "Rect"
    }
}
