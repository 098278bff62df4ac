use draftkit_canvas::history::{ActionType, EntityChange, HistoryEntry, UndoRedoManager};
use draftkit_canvas::model::{Entity, Rect, Shape};
use draftkit_canvas::store::EntityState;

fn state(x: f64) -> EntityState {
    EntityState::from(&Entity::new(0, 0, Shape::Rect(Rect::new(x, 0.0, 10.0, 10.0))))
}

fn move_entry(id: u64, from: f64, to: f64) -> HistoryEntry {
    HistoryEntry::with_changes(
        ActionType::EntityMoved,
        "Move Rect".to_string(),
        vec![EntityChange {
            id,
            before: Some(state(from)),
            after: Some(state(to)),
        }],
    )
}

#[test]
fn test_create_history_entry() {
    let entry = HistoryEntry::simple(ActionType::EntityAdded, "Add Rect".to_string());
    assert_eq!(entry.action_type, ActionType::EntityAdded);
    assert_eq!(entry.description, "Add Rect");
    assert!(entry.changes.is_empty());
}

#[test]
fn test_manager_starts_empty() {
    let manager = UndoRedoManager::new(50);
    assert!(!manager.can_undo());
    assert!(!manager.can_redo());
    assert_eq!(manager.undo_depth(), 0);
    assert_eq!(manager.redo_depth(), 0);
}

#[test]
fn test_record_and_undo() {
    let mut manager = UndoRedoManager::new(50);
    manager.record(move_entry(1, 0.0, 20.0));
    assert!(manager.can_undo());
    assert!(!manager.can_redo());

    let undone = manager.undo().unwrap();
    assert_eq!(undone.changes[0].id, 1);
    assert!(!manager.can_undo());
    assert!(manager.can_redo());
}

#[test]
fn test_redo_after_undo() {
    let mut manager = UndoRedoManager::new(50);
    manager.record(move_entry(1, 0.0, 20.0));
    manager.undo();

    let redone = manager.redo();
    assert!(redone.is_some());
    assert!(manager.can_undo());
    assert!(!manager.can_redo());
}

#[test]
fn test_new_record_clears_redo() {
    let mut manager = UndoRedoManager::new(50);
    manager.record(move_entry(1, 0.0, 20.0));
    manager.record(move_entry(1, 20.0, 40.0));
    manager.undo();
    assert_eq!(manager.redo_depth(), 1);

    manager.record(move_entry(1, 20.0, 5.0));
    assert_eq!(manager.redo_depth(), 0);
    assert_eq!(manager.undo_depth(), 2);
}

#[test]
fn test_depth_limit_drops_oldest() {
    let mut manager = UndoRedoManager::new(2);
    manager.record(move_entry(1, 0.0, 1.0));
    manager.record(move_entry(1, 1.0, 2.0));
    manager.record(move_entry(1, 2.0, 3.0));
    assert_eq!(manager.undo_depth(), 2);

    // The oldest entry was trimmed; the remaining ones are the latest.
    let top = manager.undo().unwrap();
    assert_eq!(top.changes[0].after.as_ref().unwrap(), &state(3.0));
    let next = manager.undo().unwrap();
    assert_eq!(next.changes[0].after.as_ref().unwrap(), &state(2.0));
    assert!(!manager.can_undo());
}

#[test]
fn test_disabled_manager_records_nothing() {
    let mut manager = UndoRedoManager::new(50);
    manager.disable();
    manager.record(move_entry(1, 0.0, 20.0));
    assert!(!manager.can_undo());

    manager.enable();
    manager.record(move_entry(1, 0.0, 20.0));
    assert!(manager.can_undo());
}

#[test]
fn test_descriptions_expose_stack_tops() {
    let mut manager = UndoRedoManager::new(50);
    assert!(manager.undo_description().is_none());

    manager.record(move_entry(1, 0.0, 20.0));
    assert_eq!(manager.undo_description().as_deref(), Some("Move Rect"));

    manager.undo();
    assert_eq!(manager.redo_description().as_deref(), Some("Move Rect"));
}

#[test]
fn test_is_effective_detects_no_ops() {
    let noop = HistoryEntry::with_changes(
        ActionType::EntityMoved,
        "Move Rect".to_string(),
        vec![EntityChange {
            id: 1,
            before: Some(state(5.0)),
            after: Some(state(5.0)),
        }],
    );
    assert!(!noop.is_effective());
    assert!(move_entry(1, 0.0, 5.0).is_effective());
}

#[test]
fn test_changes_sorted_by_id() {
    let entry = HistoryEntry::with_changes(
        ActionType::BatchOperation,
        "Delete 2 entities".to_string(),
        vec![
            EntityChange {
                id: 9,
                before: Some(state(1.0)),
                after: None,
            },
            EntityChange {
                id: 3,
                before: Some(state(2.0)),
                after: None,
            },
        ],
    );
    let ids: Vec<u64> = entry.changes.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![3, 9]);
}

#[test]
fn test_clear_empties_both_stacks() {
    let mut manager = UndoRedoManager::new(50);
    manager.record(move_entry(1, 0.0, 20.0));
    manager.record(move_entry(1, 20.0, 40.0));
    manager.undo();
    manager.clear();
    assert!(!manager.can_undo());
    assert!(!manager.can_redo());
}

#[test]
fn test_action_type_display() {
    assert_eq!(ActionType::EntityAdded.to_string(), "Add Entity");
    assert_eq!(ActionType::EntityMoved.to_string(), "Move Entity");
    assert_eq!(ActionType::VertexEdited.to_string(), "Edit Vertex");
}
