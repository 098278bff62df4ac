//! Text label occupying an axis-aligned box.
//!
//! The engine treats text as an opaque box: shaping, wrapping, and
//! measurement all happen outside. The box participates in picking
//! (body only), snapping (corners and edge midpoints), and transforms
//! like any other box kind.

use serde::{Deserialize, Serialize};
use smallvec::smallvec;

use draftkit_core::geometry::Point;

use super::{CanvasShape, PointBuf, SegmentBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub content: String,
    pub font_size: f64,
}

impl Text {
    pub fn new(x: f64, y: f64, width: f64, height: f64, content: impl Into<String>) -> Self {
        Self {
            x,
            y,
            width: width.abs(),
            height: height.abs(),
            content: content.into(),
            font_size: 12.0,
        }
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }
}

impl CanvasShape for Text {
    fn local_box(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.width, self.height)
    }

    fn control_points(&self) -> PointBuf {
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
        // Font size tracks the box height, floored at 1pt.
        if self.height > f64::EPSILON {
            self.font_size = (self.font_size * height / self.height).max(1.0);
        }
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
        "Text"
    }
}
