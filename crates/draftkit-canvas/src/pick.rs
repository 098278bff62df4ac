//! Priority-based hit testing ("picking").
//!
//! Resolves the single best interaction target under a world point:
//! broad-phase through the spatial index, then per-kind fine tests in
//! strict sub-target priority order. Handles beat vertices, vertices
//! beat edges, edges beat bodies; within a priority level the smallest
//! distance wins, and among equal distances (area bodies report zero)
//! the topmost entity in draw order wins.
//!
//! Picking is a pure query: all state comes in through [`PickContext`]
//! and nothing is mutated.

use std::f64::consts::FRAC_1_SQRT_2;

use smallvec::SmallVec;

use draftkit_core::constants::{
    GEOMETRY_EPSILON, HANDLE_SIZE_PX, ROTATE_HANDLE_OFFSET_PX, ROTATE_HANDLE_RADIUS_PX,
};
use draftkit_core::geometry::{point_in_polygon, point_segment_distance, Point};

use crate::layers::LayerManager;
use crate::model::{CanvasShape, Entity, Shape};
use crate::spatial_index::{Bounds, SpatialIndex};
use crate::store::EntityStore;

/// Which part of an entity a pick landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickSubTarget {
    Body,
    Edge,
    Vertex,
    ResizeHandle,
    RotateHandle,
}

impl PickSubTarget {
    /// Disambiguation rank; higher wins.
    fn priority(self) -> u8 {
        match self {
            PickSubTarget::ResizeHandle => 10,
            PickSubTarget::RotateHandle => 9,
            PickSubTarget::Vertex => 8,
            PickSubTarget::Edge => 5,
            PickSubTarget::Body => 1,
        }
    }
}

/// Bit-mask of acceptable sub-targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickMask(pub u8);

impl PickMask {
    pub const BODY: PickMask = PickMask(1 << 0);
    pub const EDGE: PickMask = PickMask(1 << 1);
    pub const VERTEX: PickMask = PickMask(1 << 2);
    pub const HANDLES: PickMask = PickMask(1 << 3);
    pub const ALL: PickMask = PickMask(0b1111);

    pub fn contains(self, other: PickMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for PickMask {
    type Output = PickMask;

    fn bitor(self, rhs: PickMask) -> PickMask {
        PickMask(self.0 | rhs.0)
    }
}

/// A resolved pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    pub entity_id: u64,
    pub sub_target: PickSubTarget,
    /// Vertex/edge/corner index; `None` for Body.
    pub sub_index: Option<usize>,
    /// World distance from the query point to the target; area bodies
    /// report zero.
    pub distance: f64,
}

/// Everything picking reads, passed explicitly per call.
///
/// Handle geometry is in world units; callers derive it from pixel
/// sizes divided by the current zoom.
pub struct PickContext<'a> {
    pub store: &'a EntityStore,
    pub layers: &'a LayerManager,
    pub index: &'a SpatialIndex,
    /// Selected entity ids; only these can yield handle hits.
    pub selected: &'a [u64],
    pub handle_radius: f64,
    pub rotate_handle_offset: f64,
    pub rotate_handle_radius: f64,
}

impl<'a> PickContext<'a> {
    /// Context with pixel-default handle sizes at zoom 1 and nothing
    /// selected.
    pub fn new(store: &'a EntityStore, layers: &'a LayerManager, index: &'a SpatialIndex) -> Self {
        Self {
            store,
            layers,
            index,
            selected: &[],
            handle_radius: HANDLE_SIZE_PX / 2.0,
            rotate_handle_offset: ROTATE_HANDLE_OFFSET_PX,
            rotate_handle_radius: ROTATE_HANDLE_RADIUS_PX,
        }
    }

    pub fn with_selected(mut self, selected: &'a [u64]) -> Self {
        self.selected = selected;
        self
    }

    /// Overrides the handle hit geometry, all in world units.
    pub fn with_handle_geometry(
        mut self,
        handle_radius: f64,
        rotate_handle_offset: f64,
        rotate_handle_radius: f64,
    ) -> Self {
        self.handle_radius = handle_radius;
        self.rotate_handle_offset = rotate_handle_offset;
        self.rotate_handle_radius = rotate_handle_radius;
        self
    }

    fn is_selected(&self, id: u64) -> bool {
        self.selected.contains(&id)
    }
}

/// Resolves the best target under `(x, y)` within `tolerance` world
/// units, or `None` when nothing matches.
pub fn pick(ctx: &PickContext, x: f64, y: f64, tolerance: f64, mask: PickMask) -> Option<PickResult> {
    let tol = tolerance.max(0.0);
    let p = Point::new(x, y);

    // Broad phase. Selected entities join unconditionally: their rotate
    // handles sit outside the indexed bounds.
    let mut candidates: SmallVec<[u64; 16]> = ctx
        .index
        .query(&Bounds::new(x - tol, y - tol, x + tol, y + tol))
        .into();
    if mask.contains(PickMask::HANDLES) {
        candidates.extend_from_slice(ctx.selected);
    }
    candidates.sort_unstable();
    candidates.dedup();

    let mut best: Option<(PickResult, usize)> = None;
    for id in candidates {
        let Some(entity) = ctx.store.get(id) else {
            continue;
        };
        if !ctx.layers.is_pickable(entity.layer) {
            continue;
        }
        let Some(hit) = check_entity(ctx, entity, p, tol, mask) else {
            continue;
        };
        let z = ctx.store.z_index(id).unwrap_or(0);
        best = match best {
            None => Some((hit, z)),
            Some((cur, cur_z)) => {
                if beats(&hit, z, &cur, cur_z) {
                    Some((hit, z))
                } else {
                    Some((cur, cur_z))
                }
            }
        };
    }
    best.map(|(hit, _)| hit)
}

/// Strict ordering: priority, then distance, then z.
fn beats(a: &PickResult, a_z: usize, b: &PickResult, b_z: usize) -> bool {
    let (pa, pb) = (a.sub_target.priority(), b.sub_target.priority());
    if pa != pb {
        return pa > pb;
    }
    if (a.distance - b.distance).abs() > GEOMETRY_EPSILON {
        return a.distance < b.distance;
    }
    a_z > b_z
}

/// Best sub-target hit for one entity, honoring the priority order by
/// testing handles, vertices, edges, and body in sequence.
fn check_entity(
    ctx: &PickContext,
    entity: &Entity,
    p: Point,
    tol: f64,
    mask: PickMask,
) -> Option<PickResult> {
    if mask.contains(PickMask::HANDLES) && ctx.is_selected(entity.id) {
        if let Some(hit) = check_handles(ctx, entity, p, tol) {
            return Some(hit);
        }
    }
    if mask.contains(PickMask::VERTEX) {
        if let Some(hit) = check_vertices(entity, p, tol) {
            return Some(hit);
        }
    }
    if mask.contains(PickMask::EDGE) {
        if let Some(hit) = check_edges(entity, p, tol) {
            return Some(hit);
        }
    }
    if mask.contains(PickMask::BODY) {
        if let Some(hit) = check_body(entity, p, tol) {
            return Some(hit);
        }
    }
    None
}

fn check_handles(ctx: &PickContext, entity: &Entity, p: Point, tol: f64) -> Option<PickResult> {
    let corners = entity.world_corners();

    let mut best: Option<(usize, f64)> = None;
    for (i, corner) in corners.iter().enumerate() {
        let d = corner.distance_to(&p);
        if d <= ctx.handle_radius + tol && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    if let Some((i, d)) = best {
        return Some(PickResult {
            entity_id: entity.id,
            sub_target: PickSubTarget::ResizeHandle,
            sub_index: Some(i),
            distance: d,
        });
    }

    // Rotate handles sit diagonally outside each corner, following the
    // box rotation, and hit within their own radius.
    let dirs = [
        (-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
        (FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
        (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        (-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    ];
    let (sin, cos) = if entity.rotates_geometry() {
        entity.rotation.sin_cos()
    } else {
        (0.0, 1.0)
    };
    let mut best: Option<(usize, f64)> = None;
    for (i, (corner, (dx, dy))) in corners.iter().zip(dirs).enumerate() {
        let handle = Point::new(
            corner.x + (dx * cos - dy * sin) * ctx.rotate_handle_offset,
            corner.y + (dx * sin + dy * cos) * ctx.rotate_handle_offset,
        );
        let d = handle.distance_to(&p);
        if d <= ctx.rotate_handle_radius && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, d)| PickResult {
        entity_id: entity.id,
        sub_target: PickSubTarget::RotateHandle,
        sub_index: Some(i),
        distance: d,
    })
}

fn check_vertices(entity: &Entity, p: Point, tol: f64) -> Option<PickResult> {
    let points: SmallVec<[Point; 8]> = match &entity.shape {
        // Rect corners act as vertices; the drag they start is a resize.
        Shape::Rect(_) => entity.world_corners().into_iter().collect(),
        // Circles have no vertices; text is picked whole or by handle.
        Shape::Circle(_) | Shape::Text(_) => return None,
        _ => entity.world_control_points().into_iter().collect(),
    };

    let mut best: Option<(usize, f64)> = None;
    for (i, v) in points.iter().enumerate() {
        let d = v.distance_to(&p);
        if d <= tol && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, d)| PickResult {
        entity_id: entity.id,
        sub_target: PickSubTarget::Vertex,
        sub_index: Some(i),
        distance: d,
    })
}

fn check_edges(entity: &Entity, p: Point, tol: f64) -> Option<PickResult> {
    match &entity.shape {
        // Text has no edge targets, only its body and handles.
        Shape::Text(_) => None,
        Shape::Circle(c) => {
            let d = ellipse_edge_distance(entity, c, p)?;
            (d <= tol).then_some(PickResult {
                entity_id: entity.id,
                sub_target: PickSubTarget::Edge,
                sub_index: None,
                distance: d,
            })
        }
        Shape::Arc(a) => {
            let d = arc_edge_distance(a, p)?;
            (d <= tol).then_some(PickResult {
                entity_id: entity.id,
                sub_target: PickSubTarget::Edge,
                sub_index: None,
                distance: d,
            })
        }
        _ => {
            let segments = entity.world_segments();
            let mut best: Option<(usize, f64)> = None;
            for (i, (a, b)) in segments.iter().enumerate() {
                let d = point_segment_distance(p, *a, *b);
                if d <= tol && best.map_or(true, |(_, bd)| d < bd) {
                    best = Some((i, d));
                }
            }
            best.map(|(i, d)| PickResult {
                entity_id: entity.id,
                sub_target: PickSubTarget::Edge,
                sub_index: Some(i),
                distance: d,
            })
        }
    }
}

fn check_body(entity: &Entity, p: Point, tol: f64) -> Option<PickResult> {
    let hit = |distance: f64| PickResult {
        entity_id: entity.id,
        sub_target: PickSubTarget::Body,
        sub_index: None,
        distance,
    };

    match &entity.shape {
        Shape::Rect(_) | Shape::Text(_) => {
            let local = entity.to_local(p);
            let (x, y, w, h) = entity.shape.local_box();
            (local.x >= x - tol
                && local.x <= x + w + tol
                && local.y >= y - tol
                && local.y <= y + h + tol)
                .then_some(hit(0.0))
        }
        Shape::Circle(c) => {
            let local = entity.to_local(p);
            let dx = local.x - c.center.x;
            let dy = local.y - c.center.y;
            if c.radius_x < GEOMETRY_EPSILON || c.radius_y < GEOMETRY_EPSILON {
                let d = (dx * dx + dy * dy).sqrt();
                return (d <= tol).then_some(hit(d));
            }
            let norm = ((dx / c.radius_x).powi(2) + (dy / c.radius_y).powi(2)).sqrt();
            (norm <= 1.0).then_some(hit(0.0))
        }
        Shape::Polygon(poly) => point_in_polygon(p, &poly.points).then_some(hit(0.0)),
        // Open strokes have no interior; their body is the stroke
        // itself, reported with a real distance.
        Shape::Line(_) | Shape::Polyline(_) | Shape::Arrow(_) => {
            let segments = entity.world_segments();
            let mut best: Option<f64> = None;
            for (a, b) in segments.iter() {
                let d = point_segment_distance(p, *a, *b);
                if d <= tol && best.map_or(true, |bd| d < bd) {
                    best = Some(d);
                }
            }
            best.map(hit)
        }
        Shape::Arc(a) => arc_edge_distance(a, p)
            .filter(|d| *d <= tol)
            .map(hit),
    }
}

/// Distance from a point to an ellipse outline, in the entity's local
/// frame. `None` for degenerate radii (handled by the body test).
fn ellipse_edge_distance(entity: &Entity, c: &crate::model::Circle, p: Point) -> Option<f64> {
    let local = entity.to_local(p);
    if c.radius_x < GEOMETRY_EPSILON || c.radius_y < GEOMETRY_EPSILON {
        return None;
    }
    let dx = local.x - c.center.x;
    let dy = local.y - c.center.y;
    let norm = ((dx / c.radius_x).powi(2) + (dy / c.radius_y).powi(2)).sqrt();
    let avg_radius = (c.radius_x + c.radius_y) / 2.0;
    Some((norm - 1.0).abs() * avg_radius)
}

/// Distance from a point to an arc's stroke: radial distance inside the
/// sweep, otherwise `None` (the endpoints are vertex targets).
fn arc_edge_distance(a: &crate::model::Arc, p: Point) -> Option<f64> {
    let dx = p.x - a.center.x;
    let dy = p.y - a.center.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < GEOMETRY_EPSILON {
        return Some(a.radius);
    }
    let angle = dy.atan2(dx);
    a.contains_angle(angle).then(|| (dist - a.radius).abs())
}
