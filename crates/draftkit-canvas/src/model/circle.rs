//! Circle (or axis-aligned ellipse when the radii differ).
//!
//! Stored as a center plus two radii so resizing along one axis turns a
//! circle into an ellipse without losing the kind. Rotation is applied
//! at the entity level about the center.

use serde::{Deserialize, Serialize};

use draftkit_core::geometry::Point;

use super::{CanvasShape, PointBuf, SegmentBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        let radius = radius.abs();
        Self {
            center,
            radius_x: radius,
            radius_y: radius,
        }
    }

    pub fn with_radii(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x: radius_x.abs(),
            radius_y: radius_y.abs(),
        }
    }

    /// True when both radii match (a true circle rather than an ellipse).
    pub fn is_circular(&self) -> bool {
        (self.radius_x - self.radius_y).abs() < f64::EPSILON
    }
}

impl CanvasShape for Circle {
    fn local_box(&self) -> (f64, f64, f64, f64) {
        (
            self.center.x - self.radius_x,
            self.center.y - self.radius_y,
            self.radius_x * 2.0,
            self.radius_y * 2.0,
        )
    }

    fn control_points(&self) -> PointBuf {
        PointBuf::new()
    }

    fn segments(&self) -> SegmentBuf {
        // The outline is analytic; picking and snapping use the ellipse
        // equation instead of segments.
        SegmentBuf::new()
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.center.x += dx;
        self.center.y += dy;
    }

    fn set_local_box(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.center = Point::new(x + width / 2.0, y + height / 2.0);
        self.radius_x = width / 2.0;
        self.radius_y = height / 2.0;
    }

    fn set_control_point(&mut self, _index: usize, _p: Point) -> bool {
        false
    }

    fn control_point_count(&self) -> usize {
        0
    }

    fn kind_name(&self) -> &'static str {
        "Circle"
    }
}
