use draftkit_canvas::spatial_index::{Bounds, SpatialIndex};

#[test]
fn test_bounds_creation() {
    let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(bounds.min_x, 0.0);
    assert_eq!(bounds.max_x, 10.0);
    assert_eq!(bounds.width(), 10.0);
    assert_eq!(bounds.height(), 10.0);
}

#[test]
fn test_bounds_contains_point_is_inclusive() {
    let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(bounds.contains_point(5.0, 5.0));
    assert!(bounds.contains_point(0.0, 0.0));
    assert!(bounds.contains_point(10.0, 10.0));
    assert!(!bounds.contains_point(11.0, 5.0));
    assert!(!bounds.contains_point(5.0, -1.0));
}

#[test]
fn test_bounds_intersection() {
    let b1 = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let b2 = Bounds::new(5.0, 5.0, 15.0, 15.0);
    let b3 = Bounds::new(20.0, 20.0, 30.0, 30.0);

    assert!(b1.intersects(&b2));
    assert!(b2.intersects(&b1));
    assert!(!b1.intersects(&b3));
    // Touching edges count as intersecting.
    let b4 = Bounds::new(10.0, 0.0, 20.0, 10.0);
    assert!(b1.intersects(&b4));
}

#[test]
fn test_bounds_union() {
    let b1 = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let b2 = Bounds::new(5.0, -5.0, 20.0, 8.0);
    let u = b1.union(&b2);
    assert_eq!(u.min_x, 0.0);
    assert_eq!(u.min_y, -5.0);
    assert_eq!(u.max_x, 20.0);
    assert_eq!(u.max_y, 10.0);
}

#[test]
fn test_insert_and_query() {
    let mut index = SpatialIndex::new(Bounds::new(-100.0, -100.0, 100.0, 100.0), 8, 16);
    index.insert(1, &Bounds::new(0.0, 0.0, 10.0, 10.0));
    index.insert(2, &Bounds::new(50.0, 50.0, 60.0, 60.0));

    let hits = index.query(&Bounds::new(-5.0, -5.0, 5.0, 5.0));
    assert!(hits.contains(&1));
    assert!(!hits.contains(&2));
    assert_eq!(index.len(), 2);
}

#[test]
fn test_no_false_negatives_after_subdivision() {
    let mut index = SpatialIndex::new(Bounds::new(0.0, 0.0, 1000.0, 1000.0), 8, 4);
    // Enough items to force several levels of subdivision.
    for i in 0..200u64 {
        let x = (i % 20) as f64 * 50.0;
        let y = (i / 20) as f64 * 100.0;
        index.insert(i, &Bounds::new(x, y, x + 10.0, y + 10.0));
    }
    for i in 0..200u64 {
        let b = index.bounds_of(i).copied().unwrap();
        let hits = index.query(&b);
        assert!(hits.contains(&i), "item {i} missing from its own region");
    }
}

#[test]
fn test_straddling_item_found_from_both_sides() {
    let mut index = SpatialIndex::new(Bounds::new(0.0, 0.0, 100.0, 100.0), 8, 1);
    // Sits on the vertical midline, so it can never descend past root.
    index.insert(1, &Bounds::new(45.0, 10.0, 55.0, 20.0));
    for i in 2..10u64 {
        index.insert(i, &Bounds::new(1.0 + i as f64, 1.0, 2.0 + i as f64, 2.0));
    }
    assert!(index.query(&Bounds::new(40.0, 10.0, 48.0, 20.0)).contains(&1));
    assert!(index.query(&Bounds::new(52.0, 10.0, 60.0, 20.0)).contains(&1));
}

#[test]
fn test_item_outside_root_bounds_still_found() {
    let mut index = SpatialIndex::new(Bounds::new(0.0, 0.0, 100.0, 100.0), 8, 16);
    index.insert(7, &Bounds::new(500.0, 500.0, 510.0, 510.0));
    let hits = index.query(&Bounds::new(490.0, 490.0, 520.0, 520.0));
    assert!(hits.contains(&7));
}

#[test]
fn test_update_moves_item() {
    let mut index = SpatialIndex::default();
    index.insert(1, &Bounds::new(0.0, 0.0, 10.0, 10.0));
    index.update(1, &Bounds::new(200.0, 200.0, 210.0, 210.0));

    assert!(!index.query(&Bounds::new(-5.0, -5.0, 15.0, 15.0)).contains(&1));
    assert!(index
        .query(&Bounds::new(195.0, 195.0, 215.0, 215.0))
        .contains(&1));
    assert_eq!(index.len(), 1);
}

#[test]
fn test_remove() {
    let mut index = SpatialIndex::default();
    index.insert(1, &Bounds::new(0.0, 0.0, 10.0, 10.0));
    index.remove(1);
    assert!(index.is_empty());
    assert!(index.query(&Bounds::new(-5.0, -5.0, 15.0, 15.0)).is_empty());
    // Removing again is a no-op.
    index.remove(1);
}

#[test]
fn test_query_point_filters_to_exact_containment() {
    let mut index = SpatialIndex::default();
    index.insert(1, &Bounds::new(0.0, 0.0, 10.0, 10.0));
    index.insert(2, &Bounds::new(20.0, 20.0, 30.0, 30.0));
    let hits = index.query_point(5.0, 5.0);
    assert_eq!(hits, vec![1]);
    assert!(index.query_point(15.0, 15.0).is_empty());
}

#[test]
fn test_stats_track_growth() {
    let mut index = SpatialIndex::new(Bounds::new(0.0, 0.0, 100.0, 100.0), 8, 2);
    for i in 0..20u64 {
        let x = (i % 10) as f64 * 9.0;
        let y = (i / 10) as f64 * 40.0;
        index.insert(i, &Bounds::new(x, y, x + 4.0, y + 4.0));
    }
    let stats = index.stats();
    assert_eq!(stats.total_items, 20);
    assert!(stats.total_nodes > 1, "expected subdivision to occur");
    assert!(stats.max_depth_reached > 0);
}

#[test]
fn test_clear() {
    let mut index = SpatialIndex::default();
    for i in 0..10u64 {
        index.insert(i, &Bounds::new(i as f64, 0.0, i as f64 + 1.0, 1.0));
    }
    index.clear();
    assert!(index.is_empty());
    assert_eq!(index.stats().total_items, 0);
}
