//! Selection management for canvas entities.
//!
//! Holds the ordered, duplicate-free set of selected entity ids and the
//! two ways users build it: clicking (via the picking engine) and
//! marquee rectangles (via the spatial index plus a fine bounds test).
//! Selection order matters: it becomes the participant order of
//! transform sessions, and the first id is the primary entity whose
//! handles are shown.

use crate::layers::LayerManager;
use crate::pick::{pick, PickContext, PickMask};
use crate::spatial_index::{Bounds, SpatialIndex};
use crate::store::EntityStore;

/// Manages the set of currently selected entities.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: Vec<u64>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection with a single entity.
    pub fn select(&mut self, id: u64) {
        self.selected.clear();
        self.selected.push(id);
    }

    /// Adds an entity to the selection if not already present.
    pub fn add(&mut self, id: u64) {
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
    }

    /// Adds the entity if absent, removes it if present.
    pub fn toggle(&mut self, id: u64) {
        if let Some(pos) = self.selected.iter().position(|&e| e == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
    }

    /// Removes an entity from the selection.
    pub fn deselect(&mut self, id: u64) {
        self.selected.retain(|&e| e != id);
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: u64) -> bool {
        self.selected.contains(&id)
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> &[u64] {
        &self.selected
    }

    /// The first selected entity, the one whose handles are live.
    pub fn primary(&self) -> Option<u64> {
        self.selected.first().copied()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Drops ids whose entities no longer exist in the store.
    pub fn prune(&mut self, store: &EntityStore) {
        self.selected.retain(|&id| store.contains(id));
    }

    /// Click selection through the picking engine.
    ///
    /// # Arguments
    /// * `x`, `y` - World coordinates of the click
    /// * `tolerance` - Hit tolerance in world units
    /// * `additive` - Shift-click behavior: toggle instead of replace
    ///
    /// # Returns
    /// The picked entity id, or `None` if the click hit nothing (which
    /// clears the selection unless `additive`).
    #[allow(clippy::too_many_arguments)]
    pub fn select_at(
        &mut self,
        store: &EntityStore,
        layers: &LayerManager,
        index: &SpatialIndex,
        x: f64,
        y: f64,
        tolerance: f64,
        additive: bool,
    ) -> Option<u64> {
        let ctx = PickContext::new(store, layers, index);
        let mask = PickMask::BODY | PickMask::EDGE | PickMask::VERTEX;
        match pick(&ctx, x, y, tolerance, mask) {
            Some(hit) => {
                if additive {
                    self.toggle(hit.entity_id);
                } else {
                    self.select(hit.entity_id);
                }
                Some(hit.entity_id)
            }
            None => {
                if !additive {
                    self.clear();
                }
                None
            }
        }
    }

    /// Marquee selection: every pickable entity whose bounds intersect
    /// the rectangle, in draw order.
    ///
    /// The rectangle may be dragged in any direction; extents are
    /// normalized before testing.
    pub fn select_in_rect(
        &mut self,
        store: &EntityStore,
        layers: &LayerManager,
        index: &SpatialIndex,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        additive: bool,
    ) -> usize {
        let rect = Bounds::new(
            min_x.min(max_x),
            min_y.min(max_y),
            min_x.max(max_x),
            min_y.max(max_y),
        );
        if !additive {
            self.clear();
        }
        let mut candidates = index.query(&rect);
        candidates.sort_unstable_by_key(|&id| store.z_index(id).unwrap_or(usize::MAX));
        let mut added = 0;
        for id in candidates {
            let Some(entity) = store.get(id) else {
                continue;
            };
            if !layers.is_pickable(entity.layer) {
                continue;
            }
            if Bounds::from_tuple(entity.bounds()).intersects(&rect) && !self.is_selected(id) {
                self.add(id);
                added += 1;
            }
        }
        added
    }
}
