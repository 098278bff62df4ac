//! Layer table: visibility, locking, and style defaults.
//!
//! Every entity belongs to exactly one layer. A layer that is hidden or
//! locked excludes its entities from picking, snapping, and transform
//! targeting, even entities that were selected before the flag changed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A drawing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: u64,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    /// Default stroke color inherited by entities in layer-color mode.
    pub stroke: String,
    /// Default fill color inherited by entities in layer-color mode.
    pub fill: String,
}

impl Layer {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            locked: false,
            stroke: "#000000".to_string(),
            fill: "#ffffff".to_string(),
        }
    }
}

/// Manages the set of layers in a document.
///
/// A default layer with id 0 always exists; entities created without an
/// explicit layer land there. Unknown layer ids behave as visible and
/// unlocked so a dangling reference degrades to "interactable" rather
/// than making an entity untouchable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerManager {
    layers: HashMap<u64, Layer>,
    next_id: u64,
}

impl LayerManager {
    /// Creates a manager holding only the default layer (id 0).
    pub fn new() -> Self {
        let mut layers = HashMap::new();
        layers.insert(0, Layer::new(0, "Default"));
        Self { layers, next_id: 1 }
    }

    /// Adds a new layer and returns its id.
    pub fn add_layer(&mut self, name: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.layers.insert(id, Layer::new(id, name));
        id
    }

    /// Removes a layer. The default layer (id 0) cannot be removed.
    ///
    /// # Returns
    /// The removed layer, or `None` if the id was 0 or unknown.
    pub fn remove_layer(&mut self, id: u64) -> Option<Layer> {
        if id == 0 {
            return None;
        }
        self.layers.remove(&id)
    }

    /// Gets a layer by id.
    pub fn get(&self, id: u64) -> Option<&Layer> {
        self.layers.get(&id)
    }

    /// Gets a mutable layer by id.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Layer> {
        self.layers.get_mut(&id)
    }

    /// Number of layers, including the default layer.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Whether the layer is visible. Unknown layers count as visible.
    pub fn is_visible(&self, id: u64) -> bool {
        self.layers.get(&id).map_or(true, |l| l.visible)
    }

    /// Whether the layer is locked. Unknown layers count as unlocked.
    pub fn is_locked(&self, id: u64) -> bool {
        self.layers.get(&id).is_some_and(|l| l.locked)
    }

    /// Whether entities on the layer participate in picking, snapping,
    /// and transforms: visible and not locked.
    pub fn is_pickable(&self, id: u64) -> bool {
        self.is_visible(id) && !self.is_locked(id)
    }

    /// Sets a layer's visibility flag.
    pub fn set_visible(&mut self, id: u64, visible: bool) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.visible = visible;
        }
    }

    /// Sets a layer's locked flag.
    pub fn set_locked(&mut self, id: u64, locked: bool) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.locked = locked;
        }
    }

    /// Iterates layers in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        let mut ids: Vec<u64> = self.layers.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter().filter_map(move |id| self.layers.get(&id))
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}
