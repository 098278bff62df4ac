//! Canvas interaction configuration.
//!
//! Groups the tunable interaction parameters into logical sections:
//! picking tolerances, snapping behavior, and gesture thresholds.
//! Everything here is expressed in pixels where the on-screen feel
//! matters (tolerances, thresholds) and in world units where geometry
//! does (grid spacing, minimum entity size); pixel values cross into
//! world space through the viewport at call time.

use serde::{Deserialize, Serialize};

use draftkit_core::constants::{
    DRAG_THRESHOLD_PX, GRID_SPACING, HANDLE_SIZE_PX, HISTORY_DEPTH, MIN_ENTITY_SIZE,
    PICK_TOLERANCE_PX, ROTATE_HANDLE_OFFSET_PX, ROTATE_HANDLE_RADIUS_PX, SNAP_TOLERANCE_PX,
};

use crate::snap::SnapKindSet;

/// Hit-testing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickSettings {
    /// Base pick tolerance in pixels.
    pub tolerance_px: f64,
    /// Square selection handle edge length in pixels.
    pub handle_size_px: f64,
    /// Diagonal offset from a box corner to its rotate handle, in pixels.
    pub rotate_handle_offset_px: f64,
    /// Hit radius of a rotate handle in pixels.
    pub rotate_handle_radius_px: f64,
}

impl Default for PickSettings {
    fn default() -> Self {
        Self {
            tolerance_px: PICK_TOLERANCE_PX,
            handle_size_px: HANDLE_SIZE_PX,
            rotate_handle_offset_px: ROTATE_HANDLE_OFFSET_PX,
            rotate_handle_radius_px: ROTATE_HANDLE_RADIUS_PX,
        }
    }
}

/// Snapping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapSettings {
    /// Whether snapping is applied during transforms.
    pub enabled: bool,
    /// Snap capture radius in pixels.
    pub tolerance_px: f64,
    /// Which snap kinds are considered.
    pub kinds: SnapKindSet,
    /// Grid pitch in world units.
    pub grid_spacing: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            tolerance_px: SNAP_TOLERANCE_PX,
            kinds: SnapKindSet::ALL,
            grid_spacing: GRID_SPACING,
        }
    }
}

/// Gesture thresholds and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionSettings {
    /// Pointer travel in pixels before a press counts as a drag.
    pub drag_threshold_px: f64,
    /// Smallest width/height a resize may leave behind, in world units.
    pub min_entity_size: f64,
    /// Maximum retained undo entries.
    pub history_depth: usize,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            drag_threshold_px: DRAG_THRESHOLD_PX,
            min_entity_size: MIN_ENTITY_SIZE,
            history_depth: HISTORY_DEPTH,
        }
    }
}

/// Top-level canvas configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default)]
    pub pick: PickSettings,
    #[serde(default)]
    pub snap: SnapSettings,
    #[serde(default)]
    pub interaction: InteractionSettings,
}
