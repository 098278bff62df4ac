//! Undo/redo history.
//!
//! One [`HistoryEntry`] per logical user gesture, no matter how many
//! pointer samples the gesture consumed. An entry is an ordered list of
//! per-entity before/after diffs applied or reverted as a single atomic
//! unit. The manager is a dumb container: applying an entry's states to
//! the store (and resyncing the spatial index) is the canvas's job.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::EntityState;

/// What kind of gesture an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    EntityAdded,
    EntityDeleted,
    EntityMoved,
    EntityResized,
    EntityRotated,
    VertexEdited,
    BatchOperation,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionType::EntityAdded => "Add Entity",
            ActionType::EntityDeleted => "Delete Entity",
            ActionType::EntityMoved => "Move Entity",
            ActionType::EntityResized => "Resize Entity",
            ActionType::EntityRotated => "Rotate Entity",
            ActionType::VertexEdited => "Edit Vertex",
            ActionType::BatchOperation => "Batch Operation",
        };
        write!(f, "{}", name)
    }
}

/// Per-entity diff. `before: None` means the entity was created by the
/// gesture; `after: None` means it was deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityChange {
    pub id: u64,
    pub before: Option<EntityState>,
    pub after: Option<EntityState>,
}

/// One atomic history unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action_type: ActionType,
    pub description: String,
    /// Diffs sorted by entity id.
    pub changes: Vec<EntityChange>,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Entry with no diffs, useful where only the label matters.
    pub fn simple(action_type: ActionType, description: String) -> Self {
        Self::with_changes(action_type, description, Vec::new())
    }

    pub fn with_changes(
        action_type: ActionType,
        description: String,
        mut changes: Vec<EntityChange>,
    ) -> Self {
        changes.sort_by_key(|c| c.id);
        Self {
            action_type,
            description,
            changes,
            timestamp: Utc::now(),
        }
    }

    /// Whether the entry carries any actual state change.
    pub fn is_effective(&self) -> bool {
        self.changes.iter().any(|c| c.before != c.after)
    }
}

/// Bounded undo/redo stack pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoRedoManager {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_depth: usize,
    enabled: bool,
}

impl UndoRedoManager {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            enabled: true,
        }
    }

    /// Records an entry, clearing the redo stack. Oldest entries fall
    /// off once the depth limit is reached. A no-op while disabled.
    pub fn record(&mut self, entry: HistoryEntry) {
        if !self.enabled {
            return;
        }
        self.redo_stack.clear();
        self.undo_stack.push(entry);
        if self.undo_stack.len() > self.max_depth {
            let excess = self.undo_stack.len() - self.max_depth;
            self.undo_stack.drain(0..excess);
        }
    }

    /// Pops the most recent entry onto the redo stack and returns it.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(entry.clone());
        Some(entry)
    }

    /// Pops the most recently undone entry back onto the undo stack and
    /// returns it.
    pub fn redo(&mut self) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry.clone());
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Description of the entry `undo` would return next.
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|e| e.description.clone())
    }

    /// Description of the entry `redo` would return next.
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|e| e.description.clone())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Drops the oldest undo entries until at most `depth` remain.
    pub fn trim_to_depth(&mut self, depth: usize) {
        if self.undo_stack.len() > depth {
            let excess = self.undo_stack.len() - depth;
            self.undo_stack.drain(0..excess);
        }
    }

    /// All retained entries, oldest first (undone entries included).
    pub fn full_history(&self) -> Vec<&HistoryEntry> {
        self.undo_stack
            .iter()
            .chain(self.redo_stack.iter().rev())
            .collect()
    }
}

impl Default for UndoRedoManager {
    fn default() -> Self {
        Self::new(draftkit_core::constants::HISTORY_DEPTH)
    }
}
