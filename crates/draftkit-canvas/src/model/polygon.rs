//! Closed polygon over an ordered sequence of world points.

use serde::{Deserialize, Serialize};

use draftkit_core::geometry::Point;

use super::line::remap;
use super::polyline::bounds_of;
use super::{CanvasShape, PointBuf, SegmentBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Regular n-gon inscribed in a circle, first vertex straight up.
    pub fn regular(center: Point, radius: f64, sides: usize) -> Self {
        let sides = sides.max(3);
        let mut points = Vec::with_capacity(sides);
        for i in 0..sides {
            let angle =
                -std::f64::consts::FRAC_PI_2 + (i as f64) * std::f64::consts::TAU / (sides as f64);
            points.push(Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ));
        }
        Self { points }
    }
}

impl CanvasShape for Polygon {
    fn local_box(&self) -> (f64, f64, f64, f64) {
        bounds_of(&self.points)
    }

    fn control_points(&self) -> PointBuf {
        self.points.iter().copied().collect()
    }

    fn segments(&self) -> SegmentBuf {
        let n = self.points.len();
        if n < 2 {
            return SegmentBuf::new();
        }
        let mut out: SegmentBuf = self.points.windows(2).map(|w| (w[0], w[1])).collect();
        out.push((self.points[n - 1], self.points[0]));
        out
    }

    fn is_closed(&self) -> bool {
        true
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
        "Polygon"
    }
}
