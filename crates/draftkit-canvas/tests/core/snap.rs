use draftkit_canvas::layers::LayerManager;
use draftkit_canvas::model::{Circle, Entity, Line, Rect, Shape};
use draftkit_canvas::snap::{snap, SnapContext, SnapKind, SnapKindSet, SnapOptions};
use draftkit_canvas::spatial_index::{Bounds, SpatialIndex};
use draftkit_canvas::store::EntityStore;
use draftkit_canvas::Point;

fn fixture(entities: Vec<Shape>) -> (EntityStore, LayerManager, SpatialIndex, Vec<u64>) {
    let mut store = EntityStore::new();
    let mut index = SpatialIndex::default();
    let mut ids = Vec::new();
    for shape in entities {
        let id = store.generate_id();
        let entity = Entity::new(id, 0, shape);
        let bounds = Bounds::from_tuple(entity.bounds());
        store.insert(entity).unwrap();
        index.insert(id, &bounds);
        ids.push(id);
    }
    (store, LayerManager::new(), index, ids)
}

fn no_grid() -> SnapOptions {
    SnapOptions {
        kinds: SnapKindSet::ENDPOINT
            | SnapKindSet::MIDPOINT
            | SnapKindSet::CENTER
            | SnapKindSet::NEAREST_ON_EDGE,
        ..SnapOptions::default()
    }
}

#[test]
fn test_endpoint_snap() {
    let (store, layers, index, ids) = fixture(vec![Shape::Line(Line::new(
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
    ))]);
    let ctx = SnapContext::new(&store, &layers, &index);
    let result = snap(&ctx, 98.0, 2.0, 10.0, no_grid()).unwrap();
    assert_eq!(result.kind, SnapKind::Endpoint);
    assert_eq!(result.point, Point::new(100.0, 0.0));
    assert_eq!(result.source_id, Some(ids[0]));
}

#[test]
fn test_midpoint_snap() {
    let (store, layers, index, _) = fixture(vec![Shape::Line(Line::new(
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
    ))]);
    let ctx = SnapContext::new(&store, &layers, &index);
    let result = snap(&ctx, 52.0, 3.0, 10.0, no_grid()).unwrap();
    assert_eq!(result.kind, SnapKind::Midpoint);
    assert_eq!(result.point, Point::new(50.0, 0.0));
}

#[test]
fn test_center_snap_on_circle() {
    let (store, layers, index, ids) = fixture(vec![Shape::Circle(Circle::new(
        Point::new(40.0, 40.0),
        30.0,
    ))]);
    let ctx = SnapContext::new(&store, &layers, &index);
    let result = snap(&ctx, 42.0, 38.0, 10.0, no_grid()).unwrap();
    assert_eq!(result.kind, SnapKind::Center);
    assert_eq!(result.point, Point::new(40.0, 40.0));
    assert_eq!(result.source_id, Some(ids[0]));
}

#[test]
fn test_nearest_on_edge_projection() {
    let (store, layers, index, _) = fixture(vec![Shape::Line(Line::new(
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
    ))]);
    let ctx = SnapContext::new(&store, &layers, &index);
    // Far from endpoints and midpoint; projects straight down onto the
    // line.
    let result = snap(&ctx, 30.0, 4.0, 10.0, no_grid()).unwrap();
    assert_eq!(result.kind, SnapKind::NearestOnEdge);
    assert!((result.point.x - 30.0).abs() < 1e-9);
    assert!(result.point.y.abs() < 1e-9);
}

#[test]
fn test_endpoint_beats_closer_edge_point() {
    let (store, layers, index, _) = fixture(vec![Shape::Line(Line::new(
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
    ))]);
    let ctx = SnapContext::new(&store, &layers, &index);
    // 3 units from the endpoint, 1 unit from the stroke: endpoint kind
    // outranks nearest-on-edge regardless of distance.
    let result = snap(&ctx, 97.0, 1.0, 10.0, no_grid()).unwrap();
    assert_eq!(result.kind, SnapKind::Endpoint);
    assert_eq!(result.point, Point::new(100.0, 0.0));
}

#[test]
fn test_endpoint_beats_nearer_grid_point() {
    let (store, layers, index, ids) = fixture(vec![Shape::Line(Line::new(
        Point::new(103.0, 3.0),
        Point::new(200.0, 3.0),
    ))]);
    let ctx = SnapContext::new(&store, &layers, &index);
    // Grid point (100, 0) is closer to the cursor than the endpoint at
    // (103, 3), but endpoints outrank grid regardless of distance.
    let result = snap(&ctx, 100.5, 0.5, 10.0, SnapOptions::default()).unwrap();
    assert_eq!(result.kind, SnapKind::Endpoint);
    assert_eq!(result.point, Point::new(103.0, 3.0));
    assert_eq!(result.source_id, Some(ids[0]));
}

#[test]
fn test_grid_snap_when_nothing_near() {
    let (store, layers, index, _) = fixture(vec![]);
    let ctx = SnapContext::new(&store, &layers, &index);
    let options = SnapOptions {
        grid_spacing: 20.0,
        ..SnapOptions::default()
    };
    let result = snap(&ctx, 47.0, 15.0, 10.0, options).unwrap();
    assert_eq!(result.kind, SnapKind::Grid);
    assert_eq!(result.point, Point::new(40.0, 20.0));
    assert_eq!(result.source_id, None);
}

#[test]
fn test_grid_snap_outside_tolerance_returns_none() {
    let (store, layers, index, _) = fixture(vec![]);
    let ctx = SnapContext::new(&store, &layers, &index);
    let options = SnapOptions {
        grid_spacing: 100.0,
        ..SnapOptions::default()
    };
    // Nearest grid point (0, 0) is ~32 units away.
    assert!(snap(&ctx, 30.0, 10.0, 10.0, options).is_none());
}

#[test]
fn test_disabled_kinds_produce_nothing() {
    let (store, layers, index, _) = fixture(vec![Shape::Line(Line::new(
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
    ))]);
    let ctx = SnapContext::new(&store, &layers, &index);
    let options = SnapOptions {
        kinds: SnapKindSet::NONE,
        ..SnapOptions::default()
    };
    assert!(snap(&ctx, 98.0, 2.0, 10.0, options).is_none());
}

#[test]
fn test_excluded_entity_ignored() {
    let (store, layers, index, ids) = fixture(vec![Shape::Line(Line::new(
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
    ))]);
    let ctx = SnapContext::new(&store, &layers, &index);
    let mut options = SnapOptions::excluding(&ids);
    options.kinds = no_grid().kinds;
    assert!(snap(&ctx, 98.0, 2.0, 10.0, options).is_none());
}

#[test]
fn test_hidden_layer_not_a_snap_source() {
    let (store, mut layers, index, _) = fixture(vec![Shape::Line(Line::new(
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
    ))]);
    layers.set_visible(0, false);
    let ctx = SnapContext::new(&store, &layers, &index);
    assert!(snap(&ctx, 98.0, 2.0, 10.0, no_grid()).is_none());
}

#[test]
fn test_equidistant_endpoints_resolve_to_lower_id() {
    // Two lines ending symmetrically around the query point.
    let (store, layers, index, ids) = fixture(vec![
        Shape::Line(Line::new(Point::new(-100.0, 4.0), Point::new(0.0, 4.0))),
        Shape::Line(Line::new(Point::new(-100.0, -4.0), Point::new(0.0, -4.0))),
    ]);
    let ctx = SnapContext::new(&store, &layers, &index);
    let result = snap(&ctx, 0.0, 0.0, 10.0, no_grid()).unwrap();
    assert_eq!(result.source_id, Some(ids[0].min(ids[1])));
}

#[test]
fn test_snap_is_deterministic() {
    let (store, layers, index, _) = fixture(vec![
        Shape::Rect(Rect::new(0.0, 0.0, 50.0, 50.0)),
        Shape::Line(Line::new(Point::new(50.0, 0.0), Point::new(120.0, 60.0))),
        Shape::Circle(Circle::new(Point::new(60.0, 10.0), 15.0)),
    ]);
    let ctx = SnapContext::new(&store, &layers, &index);
    let first = snap(&ctx, 52.0, 3.0, 10.0, SnapOptions::default());
    for _ in 0..10 {
        assert_eq!(snap(&ctx, 52.0, 3.0, 10.0, SnapOptions::default()), first);
    }
}

#[test]
fn test_rect_corner_is_an_endpoint_source() {
    let (store, layers, index, _) = fixture(vec![Shape::Rect(Rect::new(0.0, 0.0, 50.0, 50.0))]);
    let ctx = SnapContext::new(&store, &layers, &index);
    let result = snap(&ctx, 49.0, 48.0, 10.0, no_grid()).unwrap();
    assert_eq!(result.kind, SnapKind::Endpoint);
    assert_eq!(result.point, Point::new(50.0, 50.0));
}

#[test]
fn test_circle_edge_snap_is_exact_for_circles() {
    let (store, layers, index, _) = fixture(vec![Shape::Circle(Circle::new(
        Point::new(0.0, 0.0),
        10.0,
    ))]);
    let ctx = SnapContext::new(&store, &layers, &index);
    let options = SnapOptions {
        kinds: SnapKindSet::NEAREST_ON_EDGE,
        ..SnapOptions::default()
    };
    let result = snap(&ctx, 13.0, 0.0, 10.0, options).unwrap();
    assert_eq!(result.kind, SnapKind::NearestOnEdge);
    assert!((result.point.x - 10.0).abs() < 1e-9);
    assert!(result.point.y.abs() < 1e-9);
}
