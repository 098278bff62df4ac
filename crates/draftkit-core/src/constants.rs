//! Engine-wide constants.
//!
//! Pixel-space values are converted to world units at the call site by
//! dividing by the current zoom scale. Everything else is in world units.

/// Default hit-test tolerance for picking, in pixels.
pub const PICK_TOLERANCE_PX: f64 = 10.0;

/// Default snap search tolerance, in pixels.
pub const SNAP_TOLERANCE_PX: f64 = 10.0;

/// Side length of a square resize handle, in pixels.
pub const HANDLE_SIZE_PX: f64 = 8.0;

/// Diagonal offset from a box corner to its rotate handle, in pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 15.0;

/// Hit radius of a rotate handle, in pixels.
pub const ROTATE_HANDLE_RADIUS_PX: f64 = 10.0;

/// Pointer travel before a transform session starts proposing, in pixels.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Dominance ratio required to enter an axis lock during a move.
pub const AXIS_LOCK_ENTER_RATIO: f64 = 1.1;

/// Dominance ratio required to switch an established axis lock.
pub const AXIS_LOCK_SWITCH_RATIO: f64 = 1.2;

/// Minimum pointer travel before axis locking engages, in pixels.
pub const AXIS_LOCK_MIN_PX: f64 = 4.0;

/// Smallest width/height a resize may produce, in world units.
pub const MIN_ENTITY_SIZE: f64 = 5.0;

/// Default grid spacing for grid snapping, in world units.
pub const GRID_SPACING: f64 = 20.0;

/// Angle increment for shift-constrained vertex drags, in radians (45°).
pub const ANGLE_SNAP_VERTEX: f64 = std::f64::consts::FRAC_PI_4;

/// Angle increment for shift-constrained rotation, in radians (15°).
pub const ANGLE_SNAP_ROTATE: f64 = std::f64::consts::PI / 12.0;

/// Minimum zoom factor for viewports.
pub const MIN_ZOOM: f64 = 0.1;

/// Maximum zoom factor for viewports.
pub const MAX_ZOOM: f64 = 50.0;

/// Fraction of the viewport reserved as padding by fit-to-view.
pub const VIEW_PADDING: f64 = 0.05;

/// Default undo history depth.
pub const HISTORY_DEPTH: usize = 100;

/// Half-extent of the default spatial index root, in world units.
pub const INDEX_WORLD_EXTENT: f64 = 1_000_000.0;

/// Epsilon below which lengths and scales are treated as degenerate.
pub const GEOMETRY_EPSILON: f64 = 1e-6;
