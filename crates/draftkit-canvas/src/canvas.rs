//! Canvas facade tying the interaction engine together.
//!
//! [`Canvas`] owns the document state (store, layers, draw order), the
//! derived spatial index, the selection, the undo history, and the one
//! transform session. Front ends talk to this type: entity creation,
//! hit testing, snapping, gesture lifecycle, and undo/redo all route
//! through here so the index and history stay consistent with every
//! mutation.
//!
//! Coordinates passed in are world units; the viewport converts the
//! configured pixel tolerances at call time so hit targets track zoom.

use tracing::{debug, warn};
use uuid::Uuid;

use draftkit_core::constants::AXIS_LOCK_MIN_PX;
use draftkit_core::error::Result;
use draftkit_core::geometry::Point;

use crate::config::CanvasConfig;
use crate::history::{ActionType, EntityChange, HistoryEntry, UndoRedoManager};
use crate::layers::LayerManager;
use crate::model::{Arc, Arrow, Circle, Entity, Line, Polygon, Polyline, Rect, Shape, Text};
use crate::pick::{pick, PickContext, PickMask, PickResult};
use crate::selection::SelectionManager;
use crate::session::{
    InterruptKind, Modifiers, SessionTuning, TransformMode, TransformSession,
};
use crate::snap::{snap, SnapContext, SnapOptions, SnapResult};
use crate::spatial_index::{Bounds, SpatialIndex};
use crate::store::{EntityState, EntityStore};
use crate::viewport::Viewport;

/// One open drawing plus all interaction state.
#[derive(Debug)]
pub struct Canvas {
    document_id: Uuid,
    store: EntityStore,
    layers: LayerManager,
    selection: SelectionManager,
    index: SpatialIndex,
    history: UndoRedoManager,
    session: TransformSession,
    config: CanvasConfig,
    viewport: Viewport,
    active_layer: u64,
    last_snap: Option<SnapResult>,
}

impl Canvas {
    pub fn new() -> Self {
        let config = CanvasConfig::default();
        let history = UndoRedoManager::new(config.interaction.history_depth);
        Self {
            document_id: Uuid::new_v4(),
            store: EntityStore::new(),
            layers: LayerManager::new(),
            selection: SelectionManager::new(),
            index: SpatialIndex::default(),
            history,
            session: TransformSession::new(),
            config,
            viewport: Viewport::default(),
            active_layer: 0,
            last_snap: None,
        }
    }

    pub fn with_size(width: f64, height: f64) -> Self {
        let mut canvas = Self::new();
        canvas.viewport.set_canvas_size(width, height);
        canvas
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn layers(&self) -> &LayerManager {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerManager {
        &mut self.layers
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn history(&self) -> &UndoRedoManager {
        &self.history
    }

    pub fn session(&self) -> &TransformSession {
        &self.session
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut CanvasConfig {
        &mut self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// The snap applied by the most recent transform update, for
    /// indicator rendering. Cleared when the session ends.
    pub fn last_snap(&self) -> Option<&SnapResult> {
        self.last_snap.as_ref()
    }

    /// Layer that newly created entities land on.
    pub fn active_layer(&self) -> u64 {
        self.active_layer
    }

    /// Switches the active layer. Unknown ids are rejected.
    pub fn set_active_layer(&mut self, layer: u64) -> bool {
        if self.layers.get(layer).is_some() {
            self.active_layer = layer;
            true
        } else {
            false
        }
    }

    pub fn entity_count(&self) -> usize {
        self.store.len()
    }

    // ---- entity creation ------------------------------------------------

    fn add_entity(&mut self, shape: Shape) -> u64 {
        let id = self.store.generate_id();
        let entity = Entity::new(id, self.active_layer, shape);
        let bounds = Bounds::from_tuple(entity.bounds());
        let state = EntityState::from(&entity);
        let kind = entity.kind_name();
        match self.store.insert(entity) {
            Ok(()) => {
                self.index.insert(id, &bounds);
                self.history.record(HistoryEntry::with_changes(
                    ActionType::EntityAdded,
                    format!("Add {kind}"),
                    vec![EntityChange {
                        id,
                        before: None,
                        after: Some(state),
                    }],
                ));
            }
            Err(e) => warn!(id, error = %e, "entity insert rejected"),
        }
        id
    }

    pub fn add_line(&mut self, start: Point, end: Point) -> u64 {
        self.add_entity(Shape::Line(Line::new(start, end)))
    }

    pub fn add_arrow(&mut self, start: Point, end: Point) -> u64 {
        self.add_entity(Shape::Arrow(Arrow::new(start, end)))
    }

    pub fn add_polyline(&mut self, points: Vec<Point>) -> u64 {
        self.add_entity(Shape::Polyline(Polyline::new(points)))
    }

    pub fn add_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> u64 {
        self.add_entity(Shape::Rect(Rect::new(x, y, width, height)))
    }

    pub fn add_circle(&mut self, center: Point, radius: f64) -> u64 {
        self.add_entity(Shape::Circle(Circle::new(center, radius)))
    }

    pub fn add_ellipse(&mut self, center: Point, radius_x: f64, radius_y: f64) -> u64 {
        self.add_entity(Shape::Circle(Circle::with_radii(center, radius_x, radius_y)))
    }

    pub fn add_polygon(&mut self, center: Point, radius: f64, sides: usize) -> u64 {
        self.add_entity(Shape::Polygon(Polygon::regular(center, radius, sides)))
    }

    pub fn add_arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64) -> u64 {
        self.add_entity(Shape::Arc(Arc::new(center, radius, start_angle, end_angle)))
    }

    pub fn add_text(&mut self, x: f64, y: f64, width: f64, height: f64, content: &str) -> u64 {
        self.add_entity(Shape::Text(Text::new(x, y, width, height, content)))
    }

    // ---- deletion -------------------------------------------------------

    /// Removes one entity, recording a history entry. Returns the
    /// removed entity, or None for unknown ids.
    pub fn delete(&mut self, id: u64) -> Option<Entity> {
        let removed = self.store.remove(id)?;
        self.index.remove(id);
        self.selection.deselect(id);
        self.history.record(HistoryEntry::with_changes(
            ActionType::EntityDeleted,
            format!("Delete {}", removed.kind_name()),
            vec![EntityChange {
                id,
                before: Some(EntityState::from(&removed)),
                after: None,
            }],
        ));
        Some(removed)
    }

    /// Deletes every selected entity as one undoable batch. Returns the
    /// number removed.
    pub fn delete_selected(&mut self) -> usize {
        let ids: Vec<u64> = self.selection.ids().to_vec();
        let mut changes = Vec::new();
        for id in ids {
            if let Some(removed) = self.store.remove(id) {
                self.index.remove(id);
                changes.push(EntityChange {
                    id,
                    before: Some(EntityState::from(&removed)),
                    after: None,
                });
            }
        }
        self.selection.clear();
        let count = changes.len();
        if count > 0 {
            let (action, description) = if count == 1 {
                (ActionType::EntityDeleted, "Delete entity".to_string())
            } else {
                (ActionType::BatchOperation, format!("Delete {count} entities"))
            };
            self.history
                .record(HistoryEntry::with_changes(action, description, changes));
        }
        count
    }

    // ---- picking, snapping, selection -----------------------------------

    fn pick_tolerance(&self) -> f64 {
        self.viewport.world_tolerance(self.config.pick.tolerance_px)
    }

    fn snap_tolerance(&self) -> f64 {
        self.viewport.world_tolerance(self.config.snap.tolerance_px)
    }

    /// Hit test at a world position using the configured tolerances.
    pub fn pick_at(&self, x: f64, y: f64) -> Option<PickResult> {
        let ctx = PickContext::new(&self.store, &self.layers, &self.index)
            .with_selected(self.selection.ids())
            .with_handle_geometry(
                self.viewport.world_tolerance(self.config.pick.handle_size_px) / 2.0,
                self.viewport
                    .world_tolerance(self.config.pick.rotate_handle_offset_px),
                self.viewport
                    .world_tolerance(self.config.pick.rotate_handle_radius_px),
            );
        pick(&ctx, x, y, self.pick_tolerance(), PickMask::ALL)
    }

    /// Finds the best snap near a world position, excluding `exclude`
    /// entities as sources.
    pub fn snap_at(&self, x: f64, y: f64, exclude: &[u64]) -> Option<SnapResult> {
        if !self.config.snap.enabled {
            return None;
        }
        let ctx = SnapContext::new(&self.store, &self.layers, &self.index);
        let mut options = SnapOptions::excluding(exclude);
        options.kinds = self.config.snap.kinds;
        options.grid_spacing = self.config.snap.grid_spacing;
        snap(&ctx, x, y, self.snap_tolerance(), options)
    }

    /// Click selection. Additive toggles membership instead of
    /// replacing the selection.
    pub fn select_at(&mut self, x: f64, y: f64, additive: bool) -> Option<u64> {
        let tolerance = self.pick_tolerance();
        self.selection.select_at(
            &self.store,
            &self.layers,
            &self.index,
            x,
            y,
            tolerance,
            additive,
        )
    }

    /// Marquee selection over a world-space rectangle.
    pub fn select_in_rect(
        &mut self,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        additive: bool,
    ) -> usize {
        self.selection.select_in_rect(
            &self.store,
            &self.layers,
            &self.index,
            min_x,
            min_y,
            max_x,
            max_y,
            additive,
        )
    }

    // ---- z-order --------------------------------------------------------

    pub fn bring_to_front(&mut self, id: u64) -> bool {
        self.store.bring_to_front(id)
    }

    pub fn send_to_back(&mut self, id: u64) -> bool {
        self.store.send_to_back(id)
    }

    // ---- transform session ----------------------------------------------

    fn session_tuning(&self) -> SessionTuning {
        SessionTuning {
            drag_threshold: self
                .viewport
                .world_tolerance(self.config.interaction.drag_threshold_px),
            axis_lock_min: self.viewport.world_tolerance(AXIS_LOCK_MIN_PX),
            min_size: self.config.interaction.min_entity_size,
        }
    }

    /// Starts a gesture over the current selection.
    ///
    /// If `primary` is not selected it becomes the sole participant,
    /// matching the click-then-drag flow where pointer-down replaced
    /// the selection already.
    pub fn begin_transform(
        &mut self,
        mode: TransformMode,
        primary: u64,
        sub_index: Option<usize>,
        x: f64,
        y: f64,
    ) -> Result<()> {
        let tuning = self.session_tuning();
        let participants: Vec<u64> = if self.selection.is_selected(primary) {
            self.selection.ids().to_vec()
        } else {
            vec![primary]
        };
        self.session.begin(
            &self.store,
            &participants,
            mode,
            primary,
            sub_index,
            x,
            y,
            tuning,
        )?;
        Ok(())
    }

    /// Feeds a pointer move into the active session, snapping the
    /// pointer first when the mode calls for it.
    pub fn update_transform(&mut self, x: f64, y: f64, modifiers: Modifiers) {
        if !self.session.is_active() {
            return;
        }
        let snappable = matches!(
            self.session.mode(),
            TransformMode::Move | TransformMode::EdgeDrag | TransformMode::VertexDrag
        );
        let (sx, sy) = if snappable && self.config.snap.enabled {
            let participants: Vec<u64> = self.session.participants().to_vec();
            match self.snap_at(x, y, &participants) {
                Some(result) => {
                    let p = result.point;
                    self.last_snap = Some(result);
                    (p.x, p.y)
                }
                None => {
                    self.last_snap = None;
                    (x, y)
                }
            }
        } else {
            self.last_snap = None;
            (x, y)
        };
        self.session.update(sx, sy, modifiers);
    }

    /// Commits the active session; returns the applied diffs.
    pub fn commit_transform(&mut self) -> Vec<EntityChange> {
        self.last_snap = None;
        let changes = self
            .session
            .commit(&mut self.store, &mut self.index, &mut self.history);
        self.selection.prune(&self.store);
        changes
    }

    /// Cancels the active session, discarding the preview.
    pub fn cancel_transform(&mut self) {
        self.last_snap = None;
        self.session.cancel();
    }

    /// Force-cancels on external interruption (Escape, focus loss,
    /// pointer-capture loss, tab hidden).
    pub fn interrupt(&mut self, kind: InterruptKind) {
        self.last_snap = None;
        self.session.interrupt(kind);
    }

    // ---- undo / redo ----------------------------------------------------

    fn apply_change_state(&mut self, id: u64, state: Option<&EntityState>) {
        match state {
            Some(state) => {
                if self.store.contains(id) {
                    self.store.apply_state(id, state);
                } else if let Err(e) = self.store.insert(state.clone().into_entity(id)) {
                    warn!(id, error = %e, "history restore failed");
                    return;
                }
                if let Some(entity) = self.store.get(id) {
                    self.index.update(id, &Bounds::from_tuple(entity.bounds()));
                }
            }
            None => {
                self.store.remove(id);
                self.index.remove(id);
            }
        }
    }

    /// Reverts the most recent history entry. Returns false when the
    /// undo stack is empty.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.undo() else {
            return false;
        };
        debug!(description = %entry.description, "undo");
        for change in &entry.changes {
            self.apply_change_state(change.id, change.before.as_ref());
        }
        self.selection.prune(&self.store);
        true
    }

    /// Re-applies the most recently undone entry. Returns false when
    /// the redo stack is empty.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo() else {
            return false;
        };
        debug!(description = %entry.description, "redo");
        for change in &entry.changes {
            self.apply_change_state(change.id, change.after.as_ref());
        }
        self.selection.prune(&self.store);
        true
    }

    // ---- maintenance ----------------------------------------------------

    /// Rebuilds the spatial index from the store. The index is a
    /// derived cache; this is always safe to call.
    pub fn resync_index(&mut self) {
        self.index.clear();
        for entity in self.store.iter() {
            self.index
                .insert(entity.id, &Bounds::from_tuple(entity.bounds()));
        }
        debug!(entities = self.store.len(), "spatial index rebuilt");
    }

    /// Union of every entity's bounds, or None for an empty document.
    pub fn content_bounds(&self) -> Option<Bounds> {
        let mut iter = self.store.iter();
        let first = iter.next()?;
        let mut bounds = Bounds::from_tuple(first.bounds());
        for entity in iter {
            bounds = bounds.union(&Bounds::from_tuple(entity.bounds()));
        }
        Some(bounds)
    }

    /// Fits the viewport to the document content.
    pub fn fit_to_content(&mut self) {
        if let Some(b) = self.content_bounds() {
            self.viewport.fit_to_view(b.min_x, b.min_y, b.max_x, b.max_y);
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}
