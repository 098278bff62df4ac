use draftkit_canvas::pick::PickSubTarget;
use draftkit_canvas::session::{InterruptKind, Modifiers, TransformMode};
use draftkit_canvas::snap::SnapKind;
use draftkit_canvas::spatial_index::Bounds;
use draftkit_canvas::{Canvas, Point};

#[test]
fn test_add_entities_updates_index_and_history() {
    let mut canvas = Canvas::new();
    let id = canvas.add_rect(0.0, 0.0, 100.0, 100.0);
    assert_eq!(canvas.entity_count(), 1);
    assert_eq!(canvas.index().len(), 1);
    assert!(canvas.history().can_undo());
    assert!(canvas.store().contains(id));
}

#[test]
fn test_undo_of_creation_removes_entity() {
    let mut canvas = Canvas::new();
    let id = canvas.add_circle(Point::new(50.0, 50.0), 20.0);
    assert!(canvas.undo());
    assert!(!canvas.store().contains(id));
    assert_eq!(canvas.index().len(), 0);

    assert!(canvas.redo());
    assert!(canvas.store().contains(id));
    assert_eq!(canvas.index().len(), 1);
}

#[test]
fn test_move_commit_then_undo_round_trip() {
    let mut canvas = Canvas::new();
    let id = canvas.add_rect(0.0, 0.0, 100.0, 100.0);
    canvas.select_at(50.0, 50.0, false);

    canvas
        .begin_transform(TransformMode::Move, id, None, 10.0, 10.0)
        .unwrap();
    canvas.update_transform(30.0, 10.0, Modifiers::default());
    let changes = canvas.commit_transform();
    assert_eq!(changes.len(), 1);

    let (x, _, _, _) = canvas.store().get(id).unwrap().bounds();
    assert_eq!(x, 20.0);

    assert!(canvas.undo());
    let (x, _, _, _) = canvas.store().get(id).unwrap().bounds();
    assert_eq!(x, 0.0);
    // Index follows the undo.
    assert!(canvas
        .index()
        .query(&Bounds::new(-5.0, -5.0, 5.0, 5.0))
        .contains(&id));

    assert!(canvas.redo());
    let (x, _, _, _) = canvas.store().get(id).unwrap().bounds();
    assert_eq!(x, 20.0);
}

#[test]
fn test_snap_disabled_in_config() {
    let mut canvas = Canvas::new();
    canvas.add_line(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
    assert!(canvas.snap_at(98.0, 2.0, &[]).is_some());

    canvas.config_mut().snap.enabled = false;
    assert!(canvas.snap_at(98.0, 2.0, &[]).is_none());
}

#[test]
fn test_pointer_snaps_to_other_entity_during_move() {
    let mut canvas = Canvas::new();
    // Snap target: a line ending at (200, 0).
    canvas.add_line(Point::new(100.0, 0.0), Point::new(200.0, 0.0));
    let id = canvas.add_rect(0.0, 0.0, 50.0, 50.0);

    canvas.select_at(25.0, 25.0, false);
    canvas
        .begin_transform(TransformMode::Move, id, None, 25.0, 25.0)
        .unwrap();
    // Pointer lands near the line endpoint; the move delta is computed
    // from the snapped pointer.
    canvas.update_transform(198.0, 3.0, Modifiers::default());
    let snap = canvas.last_snap().unwrap();
    assert_eq!(snap.kind, SnapKind::Endpoint);
    assert_eq!(snap.point, Point::new(200.0, 0.0));

    let (x, y, _, _) = canvas.session().proposal()[0].bounds();
    // Delta (175, -25) from start (25, 25), axis-locked to X.
    assert_eq!((x, y), (175.0, 0.0));
}

#[test]
fn test_moving_entity_excluded_from_snap_sources() {
    let mut canvas = Canvas::new();
    let id = canvas.add_rect(0.0, 0.0, 50.0, 50.0);
    canvas.select_at(25.0, 25.0, false);
    canvas
        .begin_transform(TransformMode::Move, id, None, 25.0, 25.0)
        .unwrap();
    // Pointer near the participant's own corner (50, 0). The entity is
    // excluded as a source, so the only snap in reach is the grid.
    canvas.update_transform(48.0, 3.0, Modifiers::default());
    if let Some(snap) = canvas.last_snap() {
        assert_ne!(snap.source_id, Some(id));
    }
}

#[test]
fn test_pick_finds_handles_on_selection() {
    let mut canvas = Canvas::new();
    let id = canvas.add_rect(0.0, 0.0, 100.0, 100.0);
    canvas.select_at(50.0, 50.0, false);
    assert!(canvas.selection().is_selected(id));

    let hit = canvas.pick_at(0.0, 0.0).unwrap();
    assert_eq!(hit.sub_target, PickSubTarget::ResizeHandle);
    assert_eq!(hit.sub_index, Some(0));
}

#[test]
fn test_marquee_selection() {
    let mut canvas = Canvas::new();
    let a = canvas.add_rect(0.0, 0.0, 10.0, 10.0);
    let b = canvas.add_rect(50.0, 0.0, 10.0, 10.0);
    let c = canvas.add_rect(200.0, 200.0, 10.0, 10.0);

    let count = canvas.select_in_rect(-5.0, -5.0, 70.0, 20.0, false);
    assert_eq!(count, 2);
    assert!(canvas.selection().is_selected(a));
    assert!(canvas.selection().is_selected(b));
    assert!(!canvas.selection().is_selected(c));
}

#[test]
fn test_marquee_skips_locked_and_hidden_layers() {
    let mut canvas = Canvas::new();
    let locked = canvas.layers_mut().add_layer("Locked");
    let hidden = canvas.layers_mut().add_layer("Hidden");

    let visible_id = canvas.add_rect(0.0, 0.0, 10.0, 10.0);
    canvas.set_active_layer(locked);
    let locked_id = canvas.add_rect(20.0, 0.0, 10.0, 10.0);
    canvas.set_active_layer(hidden);
    let hidden_id = canvas.add_rect(40.0, 0.0, 10.0, 10.0);

    canvas.layers_mut().set_locked(locked, true);
    canvas.layers_mut().set_visible(hidden, false);

    let count = canvas.select_in_rect(-5.0, -5.0, 60.0, 20.0, false);
    assert_eq!(count, 1);
    assert!(canvas.selection().is_selected(visible_id));
    assert!(!canvas.selection().is_selected(locked_id));
    assert!(!canvas.selection().is_selected(hidden_id));
}

#[test]
fn test_delete_selected_is_one_undo_step() {
    let mut canvas = Canvas::new();
    let a = canvas.add_rect(0.0, 0.0, 10.0, 10.0);
    let b = canvas.add_rect(50.0, 0.0, 10.0, 10.0);
    canvas.select_in_rect(-5.0, -5.0, 70.0, 20.0, false);

    assert_eq!(canvas.delete_selected(), 2);
    assert_eq!(canvas.entity_count(), 0);
    assert!(canvas.selection().is_empty());

    assert!(canvas.undo());
    assert_eq!(canvas.entity_count(), 2);
    assert!(canvas.store().contains(a));
    assert!(canvas.store().contains(b));
    assert_eq!(canvas.index().len(), 2);
}

#[test]
fn test_interrupt_discards_preview() {
    let mut canvas = Canvas::new();
    let id = canvas.add_rect(0.0, 0.0, 100.0, 100.0);
    canvas.select_at(50.0, 50.0, false);
    canvas
        .begin_transform(TransformMode::Move, id, None, 10.0, 10.0)
        .unwrap();
    canvas.update_transform(60.0, 10.0, Modifiers::default());
    canvas.interrupt(InterruptKind::WindowBlur);

    assert!(!canvas.session().is_active());
    let (x, _, _, _) = canvas.store().get(id).unwrap().bounds();
    assert_eq!(x, 0.0);
    assert!(canvas.last_snap().is_none());
}

#[test]
fn test_unselected_primary_becomes_sole_participant() {
    let mut canvas = Canvas::new();
    let a = canvas.add_rect(0.0, 0.0, 10.0, 10.0);
    let b = canvas.add_rect(50.0, 0.0, 10.0, 10.0);
    canvas.select_at(5.0, 5.0, false); // selects a

    canvas
        .begin_transform(TransformMode::Move, b, None, 55.0, 5.0)
        .unwrap();
    assert_eq!(canvas.session().participants(), &[b]);
    assert_ne!(canvas.session().participants(), &[a]);
    canvas.cancel_transform();
}

#[test]
fn test_active_layer_assignment() {
    let mut canvas = Canvas::new();
    let walls = canvas.layers_mut().add_layer("Walls");
    assert!(canvas.set_active_layer(walls));
    let id = canvas.add_rect(0.0, 0.0, 10.0, 10.0);
    assert_eq!(canvas.store().get(id).unwrap().layer, walls);

    assert!(!canvas.set_active_layer(999));
    assert_eq!(canvas.active_layer(), walls);
}

#[test]
fn test_z_order_round_trip() {
    let mut canvas = Canvas::new();
    let a = canvas.add_rect(0.0, 0.0, 10.0, 10.0);
    let b = canvas.add_rect(0.0, 0.0, 10.0, 10.0);
    assert!(canvas.store().z_index(a) < canvas.store().z_index(b));

    assert!(canvas.bring_to_front(a));
    assert!(canvas.store().z_index(a) > canvas.store().z_index(b));

    assert!(canvas.send_to_back(a));
    assert!(canvas.store().z_index(a) < canvas.store().z_index(b));
}

#[test]
fn test_pixel_tolerance_scales_with_zoom() {
    let mut canvas = Canvas::new();
    canvas.add_line(Point::new(0.0, 0.0), Point::new(100.0, 0.0));

    // At zoom 1 the 10 px tolerance reaches a point 5 units off the line.
    assert!(canvas.pick_at(50.0, 5.0).is_some());

    // Zoomed in 4x the same pixel tolerance covers only 2.5 world units.
    canvas.viewport_mut().set_zoom(4.0);
    assert!(canvas.pick_at(50.0, 5.0).is_none());
    assert!(canvas.pick_at(50.0, 1.0).is_some());
}

#[test]
fn test_fit_to_content_centers_document() {
    let mut canvas = Canvas::with_size(800.0, 600.0);
    canvas.add_rect(1000.0, 1000.0, 100.0, 100.0);
    canvas.fit_to_content();

    let (px, py) = canvas.viewport().world_to_pixel(1050.0, 1050.0);
    assert!((px - 400.0).abs() < 1e-6);
    assert!((py - 300.0).abs() < 1e-6);
}

#[test]
fn test_resync_index_recovers_from_scratch() {
    let mut canvas = Canvas::new();
    let a = canvas.add_rect(0.0, 0.0, 10.0, 10.0);
    let b = canvas.add_circle(Point::new(100.0, 100.0), 5.0);
    canvas.resync_index();
    assert_eq!(canvas.index().len(), 2);
    assert!(canvas
        .index()
        .query(&Bounds::new(-1.0, -1.0, 11.0, 11.0))
        .contains(&a));
    assert!(canvas
        .index()
        .query(&Bounds::new(94.0, 94.0, 106.0, 106.0))
        .contains(&b));
}

#[test]
fn test_document_ids_are_unique() {
    let a = Canvas::new();
    let b = Canvas::new();
    assert_ne!(a.document_id(), b.document_id());
}
