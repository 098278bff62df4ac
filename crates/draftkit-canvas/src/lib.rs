//! # DraftKit Canvas
//!
//! Interaction engine for a 2D drafting canvas: hit testing, snapping,
//! selection, and transform gestures over a store of drawing entities.
//! The crate is renderer-agnostic; front ends feed pointer events in
//! and draw from the store plus the live gesture preview.
//!
//! ## Core Components
//!
//! - **Model**: Lines, polylines, rectangles, circles, polygons, arcs,
//!   arrows, and text, each an [`Entity`] with layer, rotation, and
//!   scale-sign (flip) state
//! - **Entity Store**: Authoritative entity map plus draw order
//! - **Spatial Index**: Quadtree over entity bounds for broad-phase
//!   queries
//! - **Picking**: Priority hit testing (handles, vertices, edges,
//!   bodies)
//! - **Snapping**: Endpoint, midpoint, center, nearest-on-edge, and
//!   grid candidates with deterministic tie-breaking
//! - **Transform Session**: Begin/update/commit gesture lifecycle with
//!   preview-only updates and atomic commits
//! - **History**: Bounded undo/redo over entity state diffs
//!
//! ## Architecture
//!
//! ```text
//! Canvas (facade)
//!   ├── EntityStore (authoritative state + draw order)
//!   │     └── SpatialIndex (derived quadtree cache)
//!   ├── SelectionManager (click + marquee selection)
//!   ├── TransformSession (gesture preview, atomic commit)
//!   │     ├── pick (priority hit testing)
//!   │     └── snap (candidate generation + tie-break)
//!   ├── UndoRedoManager (entity state diffs)
//!   └── Viewport (pixel <-> world, tolerance scaling)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use draftkit_canvas::{Canvas, Modifiers, TransformMode};
//!
//! let mut canvas = Canvas::new();
//! let id = canvas.add_rect(0.0, 0.0, 100.0, 100.0);
//!
//! canvas.select_at(50.0, 50.0, false);
//! canvas.begin_transform(TransformMode::Move, id, None, 50.0, 50.0)?;
//! canvas.update_transform(80.0, 50.0, Modifiers::default());
//! let changes = canvas.commit_transform();
//! ```

pub mod canvas;
pub mod config;
pub mod history;
pub mod layers;
pub mod model;
pub mod pick;
pub mod selection;
pub mod session;
pub mod snap;
pub mod spatial_index;
pub mod store;
pub mod viewport;

pub use canvas::Canvas;
pub use config::{CanvasConfig, InteractionSettings, PickSettings, SnapSettings};
pub use history::{ActionType, EntityChange, HistoryEntry, UndoRedoManager};
pub use layers::{Layer, LayerManager};
pub use model::{
    Arc, Arrow, CanvasShape, Circle, Entity, Line, Polygon, Polyline, Rect, Shape, Text,
};
pub use pick::{pick, PickContext, PickMask, PickResult, PickSubTarget};
pub use selection::SelectionManager;
pub use session::{
    InterruptKind, Modifiers, SessionState, SessionTuning, TransformMode, TransformSession,
};
pub use snap::{snap, SnapContext, SnapKind, SnapKindSet, SnapOptions, SnapResult};
pub use spatial_index::{Bounds, SpatialIndex, SpatialIndexStats};
pub use store::{EntityState, EntityStore};
pub use viewport::Viewport;

pub use draftkit_core::error::{Error, Result};
pub use draftkit_core::geometry::Point;
