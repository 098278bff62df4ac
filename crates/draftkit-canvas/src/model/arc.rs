//! Circular arc: a center, a radius, and a sweep from `start_angle` to
//! `end_angle` in the direction of increasing angle (radians, +x toward
//! +y).
//!
//! Dragging an endpoint re-aims that endpoint's angle and adjusts the
//! radius to pass through the dragged point, keeping the center fixed.

use serde::{Deserialize, Serialize};
use smallvec::smallvec;

use draftkit_core::constants::GEOMETRY_EPSILON;
use draftkit_core::geometry::{normalize_angle, Point};

use super::line::remap;
use super::{CanvasShape, PointBuf, SegmentBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc {
    pub fn new(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius: radius.abs(),
            start_angle,
            end_angle,
        }
    }

    /// Swept angle in `[0, 2π)`, measured in the direction of
    /// increasing angle.
    pub fn sweep(&self) -> f64 {
        normalize_angle(self.end_angle - self.start_angle)
    }

    /// Point on the arc's circle at `angle`.
    pub fn point_at(&self, angle: f64) -> Point {
        Point::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    pub fn start_point(&self) -> Point {
        self.point_at(self.start_angle)
    }

    pub fn end_point(&self) -> Point {
        self.point_at(self.end_angle)
    }

    /// Point at the middle of the sweep.
    pub fn mid_point(&self) -> Point {
        self.point_at(self.start_angle + self.sweep() / 2.0)
    }

    /// Whether `angle` falls inside the swept range.
    pub fn contains_angle(&self, angle: f64) -> bool {
        normalize_angle(angle - self.start_angle) <= self.sweep() + GEOMETRY_EPSILON
    }
}

impl CanvasShape for Arc {
    fn local_box(&self) -> (f64, f64, f64, f64) {
        let mut min_x = self.start_point().x.min(self.end_point().x);
        let mut max_x = self.start_point().x.max(self.end_point().x);
        let mut min_y = self.start_point().y.min(self.end_point().y);
        let mut max_y = self.start_point().y.max(self.end_point().y);

        // Axis extremes reached inside the sweep widen the box.
        for quarter in 0..4 {
            let angle = (quarter as f64) * std::f64::consts::FRAC_PI_2;
            if self.contains_angle(angle) {
                let p = self.point_at(angle);
                min_x = min_x.min(p.x);
                max_x = max_x.max(p.x);
                min_y = min_y.min(p.y);
                max_y = max_y.max(p.y);
            }
        }
        (min_x, min_y, max_x - min_x, max_y - min_y)
    }

    fn control_points(&self) -> PointBuf {
        smallvec![self.start_point(), self.end_point()]
    }

    fn segments(&self) -> SegmentBuf {
        // The outline is analytic; picking and snapping treat arcs as a
        // radial band within the sweep.
        SegmentBuf::new()
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.center.x += dx;
        self.center.y += dy;
    }

    fn set_local_box(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (old_x, old_y, old_w, old_h) = self.local_box();
        let sx = if old_w.abs() > GEOMETRY_EPSILON {
            width / old_w
        } else {
            1.0
        };
        let sy = if old_h.abs() > GEOMETRY_EPSILON {
            height / old_h
        } else {
            1.0
        };
        self.center = remap(self.center, old_x, old_y, old_w, old_h, x, y, width, height);
        // Arcs stay circular; the radius follows the mean axis factor.
        self.radius = (self.radius * (sx + sy) / 2.0).max(GEOMETRY_EPSILON);
    }

    fn set_control_point(&mut self, index: usize, p: Point) -> bool {
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < GEOMETRY_EPSILON {
            return false;
        }
        match index {
            0 => {
                self.start_angle = dy.atan2(dx);
                self.radius = dist;
                true
            }
            1 => {
                self.end_angle = dy.atan2(dx);
                self.radius = dist;
                true
            }
            _ => false,
        }
    }

    fn control_point_count(&self) -> usize {
        2
    }

    fn kind_name(&self) -> &'static str {
        "Arc"
    }
}
