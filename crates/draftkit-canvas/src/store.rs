//! Authoritative entity storage with explicit draw order.
//!
//! The store owns every entity record. Draw order doubles as z-order:
//! later entries render on top and win body-pick ties. All other
//! structures (spatial index, selection, session snapshots) are derived
//! caches that are rebuilt from or reconciled against this store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use draftkit_core::error::StoreError;

use crate::model::{Entity, Shape};

/// Snapshot of everything about an entity except its id.
///
/// Used for transform session snapshots and history diffs; applying a
/// state back to the store restores the entity exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub layer: u64,
    pub shape: Shape,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl From<&Entity> for EntityState {
    fn from(e: &Entity) -> Self {
        Self {
            layer: e.layer,
            shape: e.shape.clone(),
            rotation: e.rotation,
            scale_x: e.scale_x,
            scale_y: e.scale_y,
        }
    }
}

impl EntityState {
    /// Reconstitutes an entity with the given id.
    pub fn into_entity(self, id: u64) -> Entity {
        Entity {
            id,
            layer: self.layer,
            shape: self.shape,
            rotation: self.rotation,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
        }
    }
}

/// Canonical mutable map of entity id → entity, plus draw order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStore {
    entities: HashMap<u64, Entity>,
    draw_order: Vec<u64>,
    next_id: u64,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh unique entity id.
    pub fn generate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Inserts an entity at the top of the draw order.
    ///
    /// # Errors
    /// [`StoreError::DuplicateEntity`] if the id is already present.
    pub fn insert(&mut self, entity: Entity) -> Result<(), StoreError> {
        let id = entity.id;
        if self.entities.contains_key(&id) {
            return Err(StoreError::DuplicateEntity { id });
        }
        // Ids handed out externally must not collide with generate_id.
        if id >= self.next_id {
            self.next_id = id + 1;
        }
        debug!(id, kind = entity.kind_name(), "store insert");
        self.entities.insert(id, entity);
        self.draw_order.push(id);
        Ok(())
    }

    /// Removes an entity, returning it if present.
    pub fn remove(&mut self, id: u64) -> Option<Entity> {
        let removed = self.entities.remove(&id);
        if removed.is_some() {
            self.draw_order.retain(|&e| e != id);
            debug!(id, "store remove");
        }
        removed
    }

    pub fn get(&self, id: u64) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity ids bottom-most first.
    pub fn draw_order(&self) -> &[u64] {
        &self.draw_order
    }

    /// Position of an entity in the draw order; higher is on top.
    pub fn z_index(&self, id: u64) -> Option<usize> {
        self.draw_order.iter().position(|&e| e == id)
    }

    /// Iterates entities bottom-most first.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.draw_order
            .iter()
            .filter_map(move |id| self.entities.get(id))
    }

    /// Moves an entity to the top of the draw order. Returns false for
    /// unknown ids.
    pub fn bring_to_front(&mut self, id: u64) -> bool {
        if self.entities.contains_key(&id) {
            self.draw_order.retain(|&e| e != id);
            self.draw_order.push(id);
            true
        } else {
            false
        }
    }

    /// Moves an entity to the bottom of the draw order. Returns false
    /// for unknown ids.
    pub fn send_to_back(&mut self, id: u64) -> bool {
        if self.entities.contains_key(&id) {
            self.draw_order.retain(|&e| e != id);
            self.draw_order.insert(0, id);
            true
        } else {
            false
        }
    }

    /// Captures an entity's state for snapshots and diffs.
    pub fn state_of(&self, id: u64) -> Option<EntityState> {
        self.entities.get(&id).map(EntityState::from)
    }

    /// Overwrites an entity's state, keeping its id and draw position.
    ///
    /// Returns false if the entity no longer exists.
    pub fn apply_state(&mut self, id: u64, state: &EntityState) -> bool {
        match self.entities.get_mut(&id) {
            Some(e) => {
                e.layer = state.layer;
                e.shape = state.shape.clone();
                e.rotation = state.rotation;
                e.scale_x = state.scale_x;
                e.scale_y = state.scale_y;
                true
            }
            None => false,
        }
    }

    /// Removes every entity.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.draw_order.clear();
    }
}
