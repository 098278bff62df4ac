//! Transform session controller.
//!
//! A session is the bounded lifetime of one user gesture: begin on
//! pointer-down, update per pointer-move, then commit or cancel. The
//! controller is a four-state machine (Idle → Active → Committing or
//! Cancelling → Idle) with at most one instance active.
//!
//! Updates never touch the entity store. Every update rebuilds the
//! proposal from the begin-time snapshots plus the current pointer, so
//! the store stays authoritative until commit writes one atomic diff
//! set, and cancel is nothing more than dropping session state.
//! Renderers draw the live proposal on top of the (unchanged) store.

use smallvec::SmallVec;
use tracing::{debug, warn};

use draftkit_core::constants::{
    ANGLE_SNAP_ROTATE, ANGLE_SNAP_VERTEX, AXIS_LOCK_ENTER_RATIO, AXIS_LOCK_MIN_PX,
    AXIS_LOCK_SWITCH_RATIO, DRAG_THRESHOLD_PX, GEOMETRY_EPSILON, MIN_ENTITY_SIZE,
};
use draftkit_core::error::SessionError;
use draftkit_core::geometry::{rotate_point, snap_angle, snap_direction, Point};

use crate::history::{ActionType, EntityChange, HistoryEntry, UndoRedoManager};
use crate::model::{CanvasShape, Entity, Shape};
use crate::spatial_index::{Bounds, SpatialIndex};
use crate::store::{EntityState, EntityStore};

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    Committing,
    Cancelling,
}

/// What the gesture does to its participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformMode {
    Move,
    VertexDrag,
    /// Dragging an edge translates the whole entity; there is no
    /// edge-only deformation in this model.
    EdgeDrag,
    Resize,
    Rotate,
}

/// Modifier keys sampled per update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Proportional resize / axis-constrained move / angle snapping.
    pub shift: bool,
    /// Resize anchored at the center instead of the opposite corner.
    pub alt: bool,
}

/// External events that force-cancel an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptKind {
    Escape,
    CaptureLoss,
    WindowBlur,
    VisibilityHidden,
}

/// World-unit tuning derived from pixel configuration and zoom.
#[derive(Debug, Clone, Copy)]
pub struct SessionTuning {
    pub drag_threshold: f64,
    pub axis_lock_min: f64,
    pub min_size: f64,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            drag_threshold: DRAG_THRESHOLD_PX,
            axis_lock_min: AXIS_LOCK_MIN_PX,
            min_size: MIN_ENTITY_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisLock {
    Free,
    X,
    Y,
}

/// The one stateful object the engine owns.
#[derive(Debug)]
pub struct TransformSession {
    state: SessionState,
    mode: TransformMode,
    participants: SmallVec<[u64; 4]>,
    snapshots: Vec<EntityState>,
    proposal: Vec<Entity>,
    primary_idx: usize,
    sub_index: Option<usize>,
    base_bounds: Bounds,
    corner_anchor: Point,
    handle_corner: Point,
    rotate_anchor: Point,
    start_angle: f64,
    start: Point,
    dragging: bool,
    axis_lock: AxisLock,
    tuning: SessionTuning,
}

impl Default for TransformSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            mode: TransformMode::Move,
            participants: SmallVec::new(),
            snapshots: Vec::new(),
            proposal: Vec::new(),
            primary_idx: 0,
            sub_index: None,
            base_bounds: Bounds::new(0.0, 0.0, 0.0, 0.0),
            corner_anchor: Point::default(),
            handle_corner: Point::default(),
            rotate_anchor: Point::default(),
            start_angle: 0.0,
            start: Point::default(),
            dragging: false,
            axis_lock: AxisLock::Free,
            tuning: SessionTuning::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    /// Participant ids in begin order.
    pub fn participants(&self) -> &[u64] {
        &self.participants
    }

    /// The live proposed geometry, for preview rendering. Matches the
    /// snapshots until the pointer passes the drag threshold.
    pub fn proposal(&self) -> &[Entity] {
        &self.proposal
    }

    /// Whether the pointer has travelled far enough for the gesture to
    /// count as a drag.
    pub fn has_dragged(&self) -> bool {
        self.dragging
    }

    /// Starts a gesture over `participants`.
    ///
    /// Captures an immutable snapshot of every participant, plus resize
    /// and rotate metadata. Participant ids missing from the store are
    /// dropped; if none remain the begin is rejected.
    ///
    /// # Errors
    /// - [`SessionError::AlreadyActive`] when a session is in progress
    ///   (the caller's bug: commit or cancel first).
    /// - [`SessionError::NoParticipants`] when nothing usable was given.
    /// - [`SessionError::SubIndexOutOfRange`] for a vertex drag whose
    ///   index does not exist on the primary entity.
    /// - [`SessionError::InvalidHandle`] for a resize handle outside 0..4.
    #[allow(clippy::too_many_arguments)]
    pub fn begin(
        &mut self,
        store: &EntityStore,
        participants: &[u64],
        mode: TransformMode,
        primary: u64,
        sub_index: Option<usize>,
        start_x: f64,
        start_y: f64,
        tuning: SessionTuning,
    ) -> Result<(), SessionError> {
        if self.state == SessionState::Active {
            return Err(SessionError::AlreadyActive);
        }
        if participants.is_empty() {
            return Err(SessionError::NoParticipants);
        }

        let mut ids: SmallVec<[u64; 4]> = SmallVec::new();
        let mut snapshots = Vec::new();
        for &id in participants {
            if ids.contains(&id) {
                continue;
            }
            match store.state_of(id) {
                Some(state) => {
                    ids.push(id);
                    snapshots.push(state);
                }
                None => warn!(id, "begin skipped unknown participant"),
            }
        }
        if ids.is_empty() {
            return Err(SessionError::NoParticipants);
        }

        let primary_idx = ids.iter().position(|&id| id == primary).unwrap_or(0);

        // Union of participant bounds drives resize/rotate anchoring.
        let mut base = entity_bounds(ids[0], &snapshots[0]);
        for (id, state) in ids.iter().zip(snapshots.iter()).skip(1) {
            base = base.union(&entity_bounds(*id, state));
        }

        let mut corner_anchor = Point::default();
        let mut handle_corner = Point::default();
        match mode {
            TransformMode::VertexDrag => {
                let index = sub_index.unwrap_or(0);
                let count = snapshots[primary_idx].shape.control_point_count();
                if index >= count {
                    return Err(SessionError::SubIndexOutOfRange {
                        entity_id: ids[primary_idx],
                        index,
                    });
                }
            }
            TransformMode::Resize => {
                let handle = sub_index.unwrap_or(0);
                if handle >= 4 {
                    return Err(SessionError::InvalidHandle { handle });
                }
                let corners = box_corners(&base);
                handle_corner = corners[handle];
                corner_anchor = corners[(handle + 2) % 4];
            }
            _ => {}
        }

        let rotate_anchor = {
            let (cx, cy) = base.center();
            Point::new(cx, cy)
        };
        let start = Point::new(start_x, start_y);
        let proposal: Vec<Entity> = ids
            .iter()
            .zip(snapshots.iter())
            .map(|(&id, state)| state.clone().into_entity(id))
            .collect();

        self.mode = mode;
        self.participants = ids;
        self.proposal = proposal;
        self.snapshots = snapshots;
        self.primary_idx = primary_idx;
        self.sub_index = sub_index;
        self.base_bounds = base;
        self.corner_anchor = corner_anchor;
        self.handle_corner = handle_corner;
        self.rotate_anchor = rotate_anchor;
        self.start_angle = (start.y - rotate_anchor.y).atan2(start.x - rotate_anchor.x);
        self.start = start;
        self.dragging = false;
        self.axis_lock = AxisLock::Free;
        self.tuning = tuning;
        self.state = SessionState::Active;

        debug!(
            mode = ?self.mode,
            participants = self.participants.len(),
            "session begin"
        );
        Ok(())
    }

    /// Recomputes the proposal for the current pointer position.
    ///
    /// A no-op unless Active. Never writes to the store; callers render
    /// straight from [`proposal`](Self::proposal). Safe to call at
    /// pointer-move frequency: the proposal buffer is overwritten in
    /// place each call.
    pub fn update(&mut self, x: f64, y: f64, modifiers: Modifiers) {
        if self.state != SessionState::Active {
            return;
        }
        let p = Point::new(x, y);

        if !self.dragging && p.distance_to(&self.start) >= self.tuning.drag_threshold {
            self.dragging = true;
        }

        // Reset the proposal to the snapshots, then layer the delta on.
        for (i, state) in self.snapshots.iter().enumerate() {
            let id = self.participants[i];
            self.proposal[i] = state.clone().into_entity(id);
        }
        if !self.dragging {
            return;
        }

        match self.mode {
            TransformMode::Move | TransformMode::EdgeDrag => self.apply_move(p, modifiers),
            TransformMode::VertexDrag => self.apply_vertex_drag(p, modifiers),
            TransformMode::Resize => self.apply_resize(p, modifiers),
            TransformMode::Rotate => self.apply_rotate(p, modifiers),
        }
    }

    fn apply_move(&mut self, p: Point, modifiers: Modifiers) {
        let mut dx = p.x - self.start.x;
        let mut dy = p.y - self.start.y;

        self.axis_lock = next_axis_lock(
            self.axis_lock,
            dx,
            dy,
            modifiers.shift,
            self.tuning.axis_lock_min,
        );
        match self.axis_lock {
            AxisLock::X => dy = 0.0,
            AxisLock::Y => dx = 0.0,
            AxisLock::Free => {}
        }

        for entity in &mut self.proposal {
            entity.translate(dx, dy);
        }
    }

    fn apply_vertex_drag(&mut self, p: Point, modifiers: Modifiers) {
        let Some(index) = self.sub_index else {
            return;
        };
        let entity = &mut self.proposal[self.primary_idx];
        let original = entity
            .world_control_points()
            .get(index)
            .copied()
            .unwrap_or(self.start);
        let target = if modifiers.shift {
            snap_direction(original, p, ANGLE_SNAP_VERTEX)
        } else {
            p
        };
        entity.shape.set_control_point(index, target);
    }

    fn apply_resize(&mut self, p: Point, modifiers: Modifiers) {
        let anchor = if modifiers.alt {
            self.rotate_anchor
        } else {
            self.corner_anchor
        };

        let orig_dx = self.handle_corner.x - anchor.x;
        let orig_dy = self.handle_corner.y - anchor.y;
        let mut scale_x = if orig_dx.abs() > GEOMETRY_EPSILON {
            (p.x - anchor.x) / orig_dx
        } else {
            1.0
        };
        let mut scale_y = if orig_dy.abs() > GEOMETRY_EPSILON {
            (p.y - anchor.y) / orig_dy
        } else {
            1.0
        };

        if modifiers.shift {
            let magnitude = scale_x.abs().max(scale_y.abs());
            scale_x = magnitude * sign_of(scale_x);
            scale_y = magnitude * sign_of(scale_y);
        }

        let min_size = self.tuning.min_size;
        for entity in &mut self.proposal {
            resize_entity(entity, anchor, scale_x, scale_y, min_size);
        }
    }

    fn apply_rotate(&mut self, p: Point, modifiers: Modifiers) {
        let anchor = self.rotate_anchor;
        let current = (p.y - anchor.y).atan2(p.x - anchor.x);
        let mut delta = current - self.start_angle;
        if modifiers.shift {
            delta = snap_angle(delta, ANGLE_SNAP_ROTATE);
        }

        for entity in &mut self.proposal {
            rotate_entity(entity, anchor, delta);
        }
    }

    /// Commits the proposal as one atomic diff set.
    ///
    /// Diffs are computed against the store's current state, not the
    /// snapshots; participants deleted mid-session are skipped. One
    /// history entry is recorded when anything actually changed, and
    /// the spatial index is resynchronized for every changed entity.
    /// Returns the applied diffs (empty when Idle, below the drag
    /// threshold, or nothing changed).
    pub fn commit(
        &mut self,
        store: &mut EntityStore,
        index: &mut SpatialIndex,
        history: &mut UndoRedoManager,
    ) -> Vec<EntityChange> {
        if self.state != SessionState::Active {
            return Vec::new();
        }
        self.state = SessionState::Committing;

        if !self.dragging {
            debug!("session commit below drag threshold, discarding");
            self.reset();
            return Vec::new();
        }

        let mut changes = Vec::new();
        for (i, &id) in self.participants.iter().enumerate() {
            let Some(current) = store.state_of(id) else {
                warn!(id, "participant deleted mid-session, skipping");
                continue;
            };
            let proposed = EntityState::from(&self.proposal[i]);
            if proposed == current {
                continue;
            }
            changes.push(EntityChange {
                id,
                before: Some(current),
                after: Some(proposed),
            });
        }

        if changes.is_empty() {
            self.reset();
            return Vec::new();
        }
        changes.sort_by_key(|c| c.id);

        for change in &changes {
            if let Some(after) = &change.after {
                store.apply_state(change.id, after);
                if let Some(entity) = store.get(change.id) {
                    index.update(change.id, &Bounds::from_tuple(entity.bounds()));
                }
            }
        }

        let entry = HistoryEntry::with_changes(
            self.action_type(),
            self.describe(),
            changes.clone(),
        );
        history.record(entry);

        debug!(changed = changes.len(), "session commit");
        self.reset();
        changes
    }

    /// Discards all session state. Callable from any state, idempotent,
    /// and never touches the store or index.
    pub fn cancel(&mut self) {
        if self.state == SessionState::Active {
            debug!("session cancelled");
        }
        self.state = SessionState::Cancelling;
        self.reset();
    }

    /// Routes an external interruption into a cancel.
    pub fn interrupt(&mut self, kind: InterruptKind) {
        if self.state == SessionState::Active {
            debug!(?kind, "session interrupted");
        }
        self.cancel();
    }

    fn reset(&mut self) {
        self.participants.clear();
        self.snapshots.clear();
        self.proposal.clear();
        self.sub_index = None;
        self.dragging = false;
        self.axis_lock = AxisLock::Free;
        self.state = SessionState::Idle;
    }

    fn action_type(&self) -> ActionType {
        match self.mode {
            TransformMode::Move | TransformMode::EdgeDrag => ActionType::EntityMoved,
            TransformMode::VertexDrag => ActionType::VertexEdited,
            TransformMode::Resize => ActionType::EntityResized,
            TransformMode::Rotate => ActionType::EntityRotated,
        }
    }

    fn describe(&self) -> String {
        let verb = match self.mode {
            TransformMode::Move | TransformMode::EdgeDrag => "Move",
            TransformMode::VertexDrag => "Edit vertex of",
            TransformMode::Resize => "Resize",
            TransformMode::Rotate => "Rotate",
        };
        if self.participants.len() == 1 {
            format!("{} {}", verb, self.proposal[0].kind_name())
        } else {
            format!("{} {} entities", verb, self.participants.len())
        }
    }
}

/// Axis lock transition: locks once one axis dominates, switches only
/// on stronger dominance, and shift forces the dominant axis outright.
fn next_axis_lock(current: AxisLock, dx: f64, dy: f64, shift: bool, min_travel: f64) -> AxisLock {
    let ax = dx.abs();
    let ay = dy.abs();
    if shift {
        return if ax >= ay { AxisLock::X } else { AxisLock::Y };
    }
    match current {
        AxisLock::Free => {
            if ax.max(ay) < min_travel {
                AxisLock::Free
            } else if ax >= ay * AXIS_LOCK_ENTER_RATIO {
                AxisLock::X
            } else if ay >= ax * AXIS_LOCK_ENTER_RATIO {
                AxisLock::Y
            } else {
                AxisLock::Free
            }
        }
        AxisLock::X => {
            if ay >= ax * AXIS_LOCK_SWITCH_RATIO {
                AxisLock::Y
            } else {
                AxisLock::X
            }
        }
        AxisLock::Y => {
            if ax >= ay * AXIS_LOCK_SWITCH_RATIO {
                AxisLock::X
            } else {
                AxisLock::Y
            }
        }
    }
}

fn sign_of(v: f64) -> f64 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Corners of a bounds box in TL, TR, BR, BL order (y-down sense).
fn box_corners(b: &Bounds) -> [Point; 4] {
    [
        Point::new(b.min_x, b.min_y),
        Point::new(b.max_x, b.min_y),
        Point::new(b.max_x, b.max_y),
        Point::new(b.min_x, b.max_y),
    ]
}

fn entity_bounds(id: u64, state: &EntityState) -> Bounds {
    Bounds::from_tuple(state.clone().into_entity(id).bounds())
}

/// Scales one axis span about the anchor, then clamps the result to the
/// minimum size by growing away from the anchor (or symmetrically when
/// the anchor is the span's center).
fn scale_span(min: f64, max: f64, anchor: f64, scale: f64, min_size: f64) -> (f64, f64) {
    let a = anchor + (min - anchor) * scale;
    let b = anchor + (max - anchor) * scale;
    let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };
    if hi - lo < min_size {
        let to_lo = (anchor - lo).abs();
        let to_hi = (hi - anchor).abs();
        if (to_lo - to_hi).abs() < GEOMETRY_EPSILON {
            let mid = (lo + hi) / 2.0;
            lo = mid - min_size / 2.0;
            hi = mid + min_size / 2.0;
        } else if to_lo < to_hi {
            hi = lo + min_size;
        } else {
            lo = hi - min_size;
        }
    }
    (lo, hi)
}

/// Applies anchored scaling to a proposal entity.
///
/// Point-based kinds map every stored point through the signed scale,
/// so flips mirror the geometry. Box kinds map their corners, write the
/// normalized, minimum-clamped box back, and carry the flip in the
/// entity scale signs; stored width/height never go negative.
fn resize_entity(entity: &mut Entity, anchor: Point, scale_x: f64, scale_y: f64, min_size: f64) {
    let flip_x = sign_of(scale_x);
    let flip_y = sign_of(scale_y);

    match &mut entity.shape {
        Shape::Line(_) | Shape::Polyline(_) | Shape::Polygon(_) | Shape::Arrow(_) => {
            let points = entity.shape.control_points();
            for (i, p) in points.iter().enumerate() {
                let mapped = Point::new(
                    anchor.x + (p.x - anchor.x) * scale_x,
                    anchor.y + (p.y - anchor.y) * scale_y,
                );
                entity.shape.set_control_point(i, mapped);
            }
        }
        Shape::Arc(arc) => {
            // Arcs stay circular: the center maps through the scale and
            // the radius follows the mean magnitude.
            arc.center = Point::new(
                anchor.x + (arc.center.x - anchor.x) * scale_x,
                anchor.y + (arc.center.y - anchor.y) * scale_y,
            );
            arc.radius =
                (arc.radius * (scale_x.abs() + scale_y.abs()) / 2.0).max(GEOMETRY_EPSILON);
        }
        Shape::Rect(_) | Shape::Circle(_) | Shape::Text(_) => {
            let (x, y, w, h) = entity.shape.local_box();
            let (lo_x, hi_x) = scale_span(x, x + w, anchor.x, scale_x, min_size);
            let (lo_y, hi_y) = scale_span(y, y + h, anchor.y, scale_y, min_size);
            entity
                .shape
                .set_local_box(lo_x, lo_y, hi_x - lo_x, hi_y - lo_y);
        }
    }

    entity.scale_x *= flip_x;
    entity.scale_y *= flip_y;
}

/// Applies a rotation delta about the anchor to a proposal entity.
fn rotate_entity(entity: &mut Entity, anchor: Point, delta: f64) {
    match &mut entity.shape {
        Shape::Line(_) | Shape::Polyline(_) | Shape::Polygon(_) | Shape::Arrow(_) => {
            let points = entity.shape.control_points();
            for (i, p) in points.iter().enumerate() {
                entity.shape.set_control_point(i, rotate_point(*p, anchor, delta));
            }
        }
        Shape::Arc(arc) => {
            arc.center = rotate_point(arc.center, anchor, delta);
            arc.start_angle += delta;
            arc.end_angle += delta;
        }
        Shape::Rect(_) | Shape::Circle(_) | Shape::Text(_) => {
            let center = entity.center();
            let moved = rotate_point(center, anchor, delta);
            entity.shape.translate(moved.x - center.x, moved.y - center.y);
        }
    }
    entity.rotation += delta;
}
