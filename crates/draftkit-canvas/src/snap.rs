//! Geometric snapping.
//!
//! Given a free cursor position, proposes the best nearby "meaningful"
//! point: an entity endpoint, a segment midpoint, a shape center, the
//! nearest point on an outline, or a grid intersection. Kinds compete
//! by priority (Endpoint > Midpoint > Center > NearestOnEdge > Grid);
//! within a kind the geometrically nearest candidate wins, and exact
//! ties fall to the lower source entity id so identical queries always
//! return identical results.
//!
//! Snapping is a pure query over the state handed in; the entity being
//! transformed is passed in the exclude set to avoid self-snap jitter.

use smallvec::SmallVec;

use draftkit_core::constants::{GEOMETRY_EPSILON, GRID_SPACING};
use draftkit_core::geometry::{project_on_segment, Point};

use crate::layers::LayerManager;
use crate::model::{CanvasShape, Entity, Shape};
use crate::spatial_index::{Bounds, SpatialIndex};
use crate::store::EntityStore;

/// Kinds of snap candidates, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SnapKind {
    Endpoint,
    Midpoint,
    Center,
    NearestOnEdge,
    Grid,
}

impl SnapKind {
    fn priority(self) -> u8 {
        match self {
            SnapKind::Endpoint => 5,
            SnapKind::Midpoint => 4,
            SnapKind::Center => 3,
            SnapKind::NearestOnEdge => 2,
            SnapKind::Grid => 1,
        }
    }
}

/// Bit-set of enabled snap kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SnapKindSet(pub u8);

impl SnapKindSet {
    pub const ENDPOINT: SnapKindSet = SnapKindSet(1 << 0);
    pub const MIDPOINT: SnapKindSet = SnapKindSet(1 << 1);
    pub const CENTER: SnapKindSet = SnapKindSet(1 << 2);
    pub const NEAREST_ON_EDGE: SnapKindSet = SnapKindSet(1 << 3);
    pub const GRID: SnapKindSet = SnapKindSet(1 << 4);
    pub const ALL: SnapKindSet = SnapKindSet(0b11111);
    pub const NONE: SnapKindSet = SnapKindSet(0);

    pub fn contains(self, kind: SnapKind) -> bool {
        let bit = match kind {
            SnapKind::Endpoint => Self::ENDPOINT.0,
            SnapKind::Midpoint => Self::MIDPOINT.0,
            SnapKind::Center => Self::CENTER.0,
            SnapKind::NearestOnEdge => Self::NEAREST_ON_EDGE.0,
            SnapKind::Grid => Self::GRID.0,
        };
        self.0 & bit != 0
    }
}

impl std::ops::BitOr for SnapKindSet {
    type Output = SnapKindSet;

    fn bitor(self, rhs: SnapKindSet) -> SnapKindSet {
        SnapKindSet(self.0 | rhs.0)
    }
}

/// Per-query snap settings.
#[derive(Debug, Clone)]
pub struct SnapOptions {
    pub kinds: SnapKindSet,
    pub grid_spacing: f64,
    /// Entities excluded from candidate generation (typically the ones
    /// being transformed).
    pub exclude: SmallVec<[u64; 4]>,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            kinds: SnapKindSet::ALL,
            grid_spacing: GRID_SPACING,
            exclude: SmallVec::new(),
        }
    }
}

impl SnapOptions {
    pub fn excluding(ids: &[u64]) -> Self {
        Self {
            exclude: ids.iter().copied().collect(),
            ..Self::default()
        }
    }
}

/// The winning snap candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    pub point: Point,
    pub kind: SnapKind,
    /// Entity the candidate came from; `None` for grid points.
    pub source_id: Option<u64>,
}

/// Everything snapping reads, passed explicitly per call.
pub struct SnapContext<'a> {
    pub store: &'a EntityStore,
    pub layers: &'a LayerManager,
    pub index: &'a SpatialIndex,
}

impl<'a> SnapContext<'a> {
    pub fn new(store: &'a EntityStore, layers: &'a LayerManager, index: &'a SpatialIndex) -> Self {
        Self {
            store,
            layers,
            index,
        }
    }
}

struct BestSnap {
    result: Option<SnapResult>,
    distance: f64,
}

impl BestSnap {
    fn new() -> Self {
        Self {
            result: None,
            distance: f64::INFINITY,
        }
    }

    /// Priority, then distance, then source id. Strict improvement
    /// required so iteration order cannot leak into the outcome.
    fn consider(&mut self, candidate: SnapResult, distance: f64, tol: f64) {
        if distance > tol {
            return;
        }
        let better = match &self.result {
            None => true,
            Some(current) => {
                let (pc, pn) = (current.kind.priority(), candidate.kind.priority());
                if pn != pc {
                    pn > pc
                } else if (distance - self.distance).abs() > GEOMETRY_EPSILON {
                    distance < self.distance
                } else {
                    candidate.source_id < current.source_id
                        && candidate.source_id.is_some()
                        && current.source_id.is_some()
                }
            }
        };
        if better {
            self.result = Some(candidate);
            self.distance = distance;
        }
    }
}

/// Proposes the best snap substitute for `(x, y)` within `tolerance`
/// world units, or `None` when nothing qualifies.
pub fn snap(
    ctx: &SnapContext,
    x: f64,
    y: f64,
    tolerance: f64,
    options: SnapOptions,
) -> Option<SnapResult> {
    let tol = tolerance.max(0.0);
    let p = Point::new(x, y);
    let mut best = BestSnap::new();

    let mut candidates: SmallVec<[u64; 16]> = ctx
        .index
        .query(&Bounds::new(x - tol, y - tol, x + tol, y + tol))
        .into();
    candidates.sort_unstable();
    candidates.dedup();

    for id in candidates {
        if options.exclude.contains(&id) {
            continue;
        }
        let Some(entity) = ctx.store.get(id) else {
            continue;
        };
        if !ctx.layers.is_pickable(entity.layer) {
            continue;
        }
        collect_entity_candidates(entity, p, tol, &options, &mut best);
    }

    if options.kinds.contains(SnapKind::Grid) && options.grid_spacing > GEOMETRY_EPSILON {
        let s = options.grid_spacing;
        let g = Point::new((x / s).round() * s, (y / s).round() * s);
        best.consider(
            SnapResult {
                point: g,
                kind: SnapKind::Grid,
                source_id: None,
            },
            g.distance_to(&p),
            tol,
        );
    }

    best.result
}

fn collect_entity_candidates(
    entity: &Entity,
    p: Point,
    tol: f64,
    options: &SnapOptions,
    best: &mut BestSnap,
) {
    let id = Some(entity.id);

    if options.kinds.contains(SnapKind::Endpoint) {
        for point in endpoint_candidates(entity) {
            best.consider(
                SnapResult {
                    point,
                    kind: SnapKind::Endpoint,
                    source_id: id,
                },
                point.distance_to(&p),
                tol,
            );
        }
    }

    if options.kinds.contains(SnapKind::Midpoint) {
        for point in midpoint_candidates(entity) {
            best.consider(
                SnapResult {
                    point,
                    kind: SnapKind::Midpoint,
                    source_id: id,
                },
                point.distance_to(&p),
                tol,
            );
        }
    }

    if options.kinds.contains(SnapKind::Center) {
        if let Some(point) = center_candidate(entity) {
            best.consider(
                SnapResult {
                    point,
                    kind: SnapKind::Center,
                    source_id: id,
                },
                point.distance_to(&p),
                tol,
            );
        }
    }

    if options.kinds.contains(SnapKind::NearestOnEdge) {
        if let Some(point) = nearest_on_outline(entity, p) {
            best.consider(
                SnapResult {
                    point,
                    kind: SnapKind::NearestOnEdge,
                    source_id: id,
                },
                point.distance_to(&p),
                tol,
            );
        }
    }
}

fn endpoint_candidates(entity: &Entity) -> SmallVec<[Point; 8]> {
    match &entity.shape {
        Shape::Rect(_) | Shape::Text(_) => entity.world_corners().into_iter().collect(),
        Shape::Circle(_) => SmallVec::new(),
        _ => entity.world_control_points().into_iter().collect(),
    }
}

fn midpoint_candidates(entity: &Entity) -> SmallVec<[Point; 8]> {
    match &entity.shape {
        Shape::Circle(_) => SmallVec::new(),
        Shape::Arc(a) => {
            let mut out = SmallVec::new();
            out.push(a.mid_point());
            out
        }
        _ => entity
            .world_segments()
            .iter()
            .map(|(a, b)| a.midpoint(b))
            .collect(),
    }
}

/// Circle, polygon, and arc kinds offer their center; box kinds offer
/// corners through the endpoint kind instead.
fn center_candidate(entity: &Entity) -> Option<Point> {
    match &entity.shape {
        Shape::Circle(c) => Some(c.center),
        Shape::Polygon(_) => Some(entity.center()),
        Shape::Arc(a) => Some(a.center),
        _ => None,
    }
}

fn nearest_on_outline(entity: &Entity, p: Point) -> Option<Point> {
    match &entity.shape {
        Shape::Circle(c) => {
            if c.radius_x < GEOMETRY_EPSILON || c.radius_y < GEOMETRY_EPSILON {
                return None;
            }
            let local = entity.to_local(p);
            let dx = local.x - c.center.x;
            let dy = local.y - c.center.y;
            if dx.abs() < GEOMETRY_EPSILON && dy.abs() < GEOMETRY_EPSILON {
                return None;
            }
            // First-order closest-point approximation on the ellipse;
            // exact for true circles.
            let theta = (dy * c.radius_x).atan2(dx * c.radius_y);
            let local_hit = Point::new(
                c.center.x + c.radius_x * theta.cos(),
                c.center.y + c.radius_y * theta.sin(),
            );
            Some(entity.to_world(local_hit))
        }
        Shape::Arc(a) => {
            let dx = p.x - a.center.x;
            let dy = p.y - a.center.y;
            if dx.abs() < GEOMETRY_EPSILON && dy.abs() < GEOMETRY_EPSILON {
                return None;
            }
            let angle = dy.atan2(dx);
            if a.contains_angle(angle) {
                Some(a.point_at(angle))
            } else {
                // Outside the sweep the nearest stroke point is an
                // endpoint, which the Endpoint kind already offers.
                None
            }
        }
        _ => {
            let mut nearest: Option<(Point, f64)> = None;
            for (a, b) in entity.world_segments() {
                if a.distance_to(&b) < GEOMETRY_EPSILON {
                    continue;
                }
                let candidate = project_on_segment(p, a, b);
                let d = candidate.distance_to(&p);
                if nearest.map_or(true, |(_, nd)| d < nd) {
                    nearest = Some((candidate, d));
                }
            }
            nearest.map(|(point, _)| point)
        }
    }
}
