//! Entity model for the canvas interaction engine.
//!
//! Every drawable thing on the canvas is an [`Entity`]: a [`Shape`]
//! variant plus the fields all kinds share (owning layer, rotation,
//! and the pair of scale factors that carry flip state). `Shape` is a
//! closed enum; adding a kind forces every geometry consumer to handle
//! it at compile time.
//!
//! Two geometric conventions, matching how entities are edited:
//!
//! - **Point-based kinds** (line, polyline, polygon, arrow, arc) store
//!   their control points in world space. Rotation and flips are baked
//!   into the points as gestures commit; the `rotation` field tracks the
//!   accumulated orientation for inspection.
//! - **Box kinds** (rect, circle, text) store an unrotated position and
//!   size; `rotation` is applied about the box center when deriving
//!   world geometry.
//!
//! Width/height (and radii) are always non-negative. A flip never
//! negates a stored size; it flips the sign of `scale_x`/`scale_y`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use draftkit_core::geometry::{rotate_point, Point};

pub mod arc;
pub mod arrow;
pub mod circle;
pub mod line;
pub mod polygon;
pub mod polyline;
pub mod rect;
pub mod text;

pub use arc::Arc;
pub use arrow::Arrow;
pub use circle::Circle;
pub use line::Line;
pub use polygon::Polygon;
pub use polyline::Polyline;
pub use rect::Rect;
pub use text::Text;

/// Scratch buffer for control points; inline up to 8 before spilling.
pub type PointBuf = SmallVec<[Point; 8]>;

/// Scratch buffer for outline segments.
pub type SegmentBuf = SmallVec<[(Point, Point); 8]>;

/// Geometry operations every shape kind implements.
///
/// All coordinates are world units. For point-based kinds the stored
/// points are world points; for box kinds these methods work on the
/// unrotated box and [`Entity`] layers the rotation on top.
pub trait CanvasShape {
    /// Unrotated bounding box as (x, y, width, height).
    fn local_box(&self) -> (f64, f64, f64, f64);

    /// Draggable control points, in order. Empty for box kinds.
    fn control_points(&self) -> PointBuf;

    /// Outline segments between consecutive control points (plus the
    /// closing segment for closed kinds). Empty for circles.
    fn segments(&self) -> SegmentBuf;

    /// Whether the outline closes back on itself.
    fn is_closed(&self) -> bool;

    /// Moves the whole shape by (dx, dy).
    fn translate(&mut self, dx: f64, dy: f64);

    /// Rescales the shape's geometry into a new box.
    ///
    /// `width`/`height` must already be non-negative; flips are the
    /// caller's business (they live in the entity scale signs).
    fn set_local_box(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Replaces one control point. Returns false when the kind has no
    /// draggable point at `index`.
    fn set_control_point(&mut self, index: usize, p: Point) -> bool;

    /// Number of draggable control points.
    fn control_point_count(&self) -> usize;

    /// Kind name for history descriptions and diagnostics.
    fn kind_name(&self) -> &'static str;
}

/// The closed set of shape kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Shape {
    Line(Line),
    Polyline(Polyline),
    Rect(Rect),
    Circle(Circle),
    Polygon(Polygon),
    Arc(Arc),
    Arrow(Arrow),
    Text(Text),
}

impl CanvasShape for Shape {
    fn local_box(&self) -> (f64, f64, f64, f64) {
        match self {
            Shape::Line(s) => s.local_box(),
            Shape::Polyline(s) => s.local_box(),
            Shape::Rect(s) => s.local_box(),
            Shape::Circle(s) => s.local_box(),
            Shape::Polygon(s) => s.local_box(),
            Shape::Arc(s) => s.local_box(),
            Shape::Arrow(s) => s.local_box(),
            Shape::Text(s) => s.local_box(),
        }
    }

    fn control_points(&self) -> PointBuf {
        match self {
            Shape::Line(s) => s.control_points(),
            Shape::Polyline(s) => s.control_points(),
            Shape::Rect(s) => s.control_points(),
            Shape::Circle(s) => s.control_points(),
            Shape::Polygon(s) => s.control_points(),
            Shape::Arc(s) => s.control_points(),
            Shape::Arrow(s) => s.control_points(),
            Shape::Text(s) => s.control_points(),
        }
    }

    fn segments(&self) -> SegmentBuf {
        match self {
            Shape::Line(s) => s.segments(),
            Shape::Polyline(s) => s.segments(),
            Shape::Rect(s) => s.segments(),
            Shape::Circle(s) => s.segments(),
            Shape::Polygon(s) => s.segments(),
            Shape::Arc(s) => s.segments(),
            Shape::Arrow(s) => s.segments(),
            Shape::Text(s) => s.segments(),
        }
    }

    fn is_closed(&self) -> bool {
        match self {
            Shape::Line(s) => s.is_closed(),
            Shape::Polyline(s) => s.is_closed(),
            Shape::Rect(s) => s.is_closed(),
            Shape::Circle(s) => s.is_closed(),
            Shape::Polygon(s) => s.is_closed(),
            Shape::Arc(s) => s.is_closed(),
            Shape::Arrow(s) => s.is_closed(),
            Shape::Text(s) => s.is_closed(),
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Shape::Line(s) => s.translate(dx, dy),
            Shape::Polyline(s) => s.translate(dx, dy),
            Shape::Rect(s) => s.translate(dx, dy),
            Shape::Circle(s) => s.translate(dx, dy),
            Shape::Polygon(s) => s.translate(dx, dy),
            Shape::Arc(s) => s.translate(dx, dy),
            Shape::Arrow(s) => s.translate(dx, dy),
            Shape::Text(s) => s.translate(dx, dy),
        }
    }

    fn set_local_box(&mut self, x: f64, y: f64, width: f64, height: f64) {
        match self {
            Shape::Line(s) => s.set_local_box(x, y, width, height),
            Shape::Polyline(s) => s.set_local_box(x, y, width, height),
            Shape::Rect(s) => s.set_local_box(x, y, width, height),
            Shape::Circle(s) => s.set_local_box(x, y, width, height),
            Shape::Polygon(s) => s.set_local_box(x, y, width, height),
            Shape::Arc(s) => s.set_local_box(x, y, width, height),
            Shape::Arrow(s) => s.set_local_box(x, y, width, height),
            Shape::Text(s) => s.set_local_box(x, y, width, height),
        }
    }

    fn set_control_point(&mut self, index: usize, p: Point) -> bool {
        match self {
            Shape::Line(s) => s.set_control_point(index, p),
            Shape::Polyline(s) => s.set_control_point(index, p),
            Shape::Rect(s) => s.set_control_point(index, p),
            Shape::Circle(s) => s.set_control_point(index, p),
            Shape::Polygon(s) => s.set_control_point(index, p),
            Shape::Arc(s) => s.set_control_point(index, p),
            Shape::Arrow(s) => s.set_control_point(index, p),
            Shape::Text(s) => s.set_control_point(index, p),
        }
    }

    fn control_point_count(&self) -> usize {
        match self {
            Shape::Line(s) => s.control_point_count(),
            Shape::Polyline(s) => s.control_point_count(),
            Shape::Rect(s) => s.control_point_count(),
            Shape::Circle(s) => s.control_point_count(),
            Shape::Polygon(s) => s.control_point_count(),
            Shape::Arc(s) => s.control_point_count(),
            Shape::Arrow(s) => s.control_point_count(),
            Shape::Text(s) => s.control_point_count(),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Shape::Line(s) => s.kind_name(),
            Shape::Polyline(s) => s.kind_name(),
            Shape::Rect(s) => s.kind_name(),
            Shape::Circle(s) => s.kind_name(),
            Shape::Polygon(s) => s.kind_name(),
            Shape::Arc(s) => s.kind_name(),
            Shape::Arrow(s) => s.kind_name(),
            Shape::Text(s) => s.kind_name(),
        }
    }
}

/// A drawable entity: a shape plus the fields every kind shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u64,
    pub layer: u64,
    pub shape: Shape,
    /// Accumulated rotation in radians (+x toward +y).
    pub rotation: f64,
    /// Horizontal scale sign carrier; negative means flipped.
    pub scale_x: f64,
    /// Vertical scale sign carrier; negative means flipped.
    pub scale_y: f64,
}

impl Entity {
    pub fn new(id: u64, layer: u64, shape: Shape) -> Self {
        Self {
            id,
            layer,
            shape,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// World-space center (box center; invariant under rotation).
    pub fn center(&self) -> Point {
        let (x, y, w, h) = self.shape.local_box();
        Point::new(x + w / 2.0, y + h / 2.0)
    }

    /// True when rotation applies to the stored geometry when deriving
    /// world coordinates (box kinds); point-based kinds bake it in.
    pub fn rotates_geometry(&self) -> bool {
        matches!(
            self.shape,
            Shape::Rect(_) | Shape::Circle(_) | Shape::Text(_)
        )
    }

    /// Maps a stored-geometry point into world space.
    pub fn to_world(&self, p: Point) -> Point {
        if self.rotates_geometry() && self.rotation != 0.0 {
            rotate_point(p, self.center(), self.rotation)
        } else {
            p
        }
    }

    /// Maps a world point into stored-geometry space.
    pub fn to_local(&self, p: Point) -> Point {
        if self.rotates_geometry() && self.rotation != 0.0 {
            rotate_point(p, self.center(), -self.rotation)
        } else {
            p
        }
    }

    /// The four corners of the unrotated box, mapped to world space.
    /// Order: top-left, top-right, bottom-right, bottom-left (in a
    /// y-down sense: TL = (x, y)).
    pub fn world_corners(&self) -> [Point; 4] {
        let (x, y, w, h) = self.shape.local_box();
        [
            self.to_world(Point::new(x, y)),
            self.to_world(Point::new(x + w, y)),
            self.to_world(Point::new(x + w, y + h)),
            self.to_world(Point::new(x, y + h)),
        ]
    }

    /// Axis-aligned world bounding box (min_x, min_y, max_x, max_y).
    ///
    /// Rotation-aware: encloses the rotated corners. Used only for
    /// broad-phase queries; never as a fine hit test.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let corners = self.world_corners();
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for c in corners {
            min_x = min_x.min(c.x);
            min_y = min_y.min(c.y);
            max_x = max_x.max(c.x);
            max_y = max_y.max(c.y);
        }
        (min_x, min_y, max_x, max_y)
    }

    /// Outline segments in world space.
    pub fn world_segments(&self) -> SegmentBuf {
        if self.rotates_geometry() && self.rotation != 0.0 {
            let center = self.center();
            self.shape
                .segments()
                .into_iter()
                .map(|(a, b)| {
                    (
                        rotate_point(a, center, self.rotation),
                        rotate_point(b, center, self.rotation),
                    )
                })
                .collect()
        } else {
            self.shape.segments()
        }
    }

    /// Control points in world space (identical to stored points for
    /// point-based kinds).
    pub fn world_control_points(&self) -> PointBuf {
        // Box kinds expose no control points, so no mapping needed.
        self.shape.control_points()
    }

    /// Moves the entity by (dx, dy).
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.shape.translate(dx, dy);
    }

    /// Kind name for descriptions ("Rect", "Polyline", ...).
    pub fn kind_name(&self) -> &'static str {
        self.shape.kind_name()
    }
}
