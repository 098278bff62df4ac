use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use draftkit_canvas::model::{
    Arc, CanvasShape, Circle, Entity, Line, Polygon, Polyline, Rect, Shape, Text,
};
use draftkit_canvas::Point;

#[test]
fn test_line_length_and_angle() {
    let line = Line::new(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
    assert!((line.length() - 5.0).abs() < 1e-9);

    let flat = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    assert!((flat.angle() - 0.0).abs() < 1e-9);
}

#[test]
fn test_line_control_points_and_box() {
    let line = Line::new(Point::new(2.0, 8.0), Point::new(10.0, 3.0));
    let points = line.control_points();
    assert_eq!(points.len(), 2);
    let (x, y, w, h) = line.local_box();
    assert_eq!((x, y), (2.0, 3.0));
    assert_eq!((w, h), (8.0, 5.0));
}

#[test]
fn test_rect_normalizes_negative_size() {
    let rect = Rect::new(10.0, 10.0, -4.0, -6.0);
    let (x, y, w, h) = rect.local_box();
    assert_eq!((x, y), (6.0, 4.0));
    assert_eq!((w, h), (4.0, 6.0));
}

#[test]
fn test_rect_has_no_control_points() {
    // Corners are resize targets, not draggable vertices.
    let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(rect.control_point_count(), 0);
    assert_eq!(rect.segments().len(), 4);
    assert!(rect.is_closed());
}

#[test]
fn test_circle_local_box_and_set() {
    let mut circle = Circle::new(Point::new(5.0, 5.0), 3.0);
    let (x, y, w, h) = circle.local_box();
    assert_eq!((x, y, w, h), (2.0, 2.0, 6.0, 6.0));

    circle.set_local_box(0.0, 0.0, 10.0, 4.0);
    assert_eq!(circle.center, Point::new(5.0, 2.0));
    assert_eq!(circle.radius_x, 5.0);
    assert_eq!(circle.radius_y, 2.0);
    assert!(!circle.is_circular());
}

#[test]
fn test_polygon_regular() {
    let poly = Polygon::regular(Point::new(0.0, 0.0), 10.0, 6);
    assert_eq!(poly.control_point_count(), 6);
    // Closing segment included.
    assert_eq!(poly.segments().len(), 6);
    assert!(poly.is_closed());
    for p in poly.control_points() {
        let r = (p.x * p.x + p.y * p.y).sqrt();
        assert!((r - 10.0).abs() < 1e-9);
    }
}

#[test]
fn test_polygon_degenerate_sides_clamped() {
    let poly = Polygon::regular(Point::new(0.0, 0.0), 5.0, 1);
    assert_eq!(poly.control_point_count(), 3);
}

#[test]
fn test_polyline_segments() {
    let poly = Polyline::new(vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
    ]);
    assert_eq!(poly.segments().len(), 2);
    assert!(!poly.is_closed());
    assert!((poly.length() - 20.0).abs() < 1e-9);
}

#[test]
fn test_arc_endpoints_and_midpoint() {
    let arc = Arc::new(Point::new(0.0, 0.0), 10.0, 0.0, FRAC_PI_2);
    let start = arc.start_point();
    let end = arc.end_point();
    let mid = arc.mid_point();
    assert!((start.x - 10.0).abs() < 1e-9 && start.y.abs() < 1e-9);
    assert!(end.x.abs() < 1e-9 && (end.y - 10.0).abs() < 1e-9);
    assert!((mid.x - 10.0 * FRAC_PI_4.cos()).abs() < 1e-9);
}

#[test]
fn test_arc_local_box_includes_quadrant_extreme() {
    // Quarter arc from 0 to 90 degrees passes through (r, 0) and (0, r)
    // with the +x/+y extremes on the sweep.
    let arc = Arc::new(Point::new(0.0, 0.0), 10.0, 0.0, FRAC_PI_2);
    let (x, y, w, h) = arc.local_box();
    assert!((x - 0.0).abs() < 1e-9);
    assert!((y - 0.0).abs() < 1e-9);
    assert!((w - 10.0).abs() < 1e-9);
    assert!((h - 10.0).abs() < 1e-9);
}

#[test]
fn test_arc_vertex_reaims_angle() {
    let mut arc = Arc::new(Point::new(0.0, 0.0), 10.0, 0.0, PI);
    // Dragging the start control point rescales the radius and re-aims
    // the start angle.
    assert!(arc.set_control_point(0, Point::new(0.0, 20.0)));
    assert!((arc.radius - 20.0).abs() < 1e-9);
    assert!((arc.start_angle - FRAC_PI_2).abs() < 1e-9);
}

#[test]
fn test_text_font_scales_with_height() {
    let mut text = Text::new(0.0, 0.0, 100.0, 20.0, "label");
    let before = text.font_size;
    text.set_local_box(0.0, 0.0, 100.0, 40.0);
    assert!((text.font_size - before * 2.0).abs() < 1e-9);
}

#[test]
fn test_entity_rotated_bounds_enclose_shape() {
    let mut e = Entity::new(1, 0, Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)));
    e.rotation = FRAC_PI_4;
    let (min_x, min_y, max_x, max_y) = e.bounds();
    let half_diag = (200.0f64).sqrt() / 2.0;
    assert!((min_x - (5.0 - half_diag)).abs() < 1e-9);
    assert!((max_x - (5.0 + half_diag)).abs() < 1e-9);
    assert!((min_y - (5.0 - half_diag)).abs() < 1e-9);
    assert!((max_y - (5.0 + half_diag)).abs() < 1e-9);
}

#[test]
fn test_point_kinds_ignore_rotation_field_for_bounds() {
    // Point-based kinds bake orientation into their points; the stored
    // rotation must not re-rotate them.
    let mut e = Entity::new(
        1,
        0,
        Shape::Line(Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0))),
    );
    e.rotation = FRAC_PI_2;
    let (min_x, min_y, max_x, max_y) = e.bounds();
    assert_eq!((min_x, min_y, max_x, max_y), (0.0, 0.0, 10.0, 0.0));
}

#[test]
fn test_set_local_box_remaps_polyline_proportionally() {
    let mut poly = Polyline::new(vec![
        Point::new(0.0, 0.0),
        Point::new(5.0, 0.0),
        Point::new(10.0, 10.0),
    ]);
    poly.set_local_box(0.0, 0.0, 20.0, 20.0);
    let points = poly.control_points();
    assert_eq!(points[0], Point::new(0.0, 0.0));
    assert_eq!(points[1], Point::new(10.0, 0.0));
    assert_eq!(points[2], Point::new(20.0, 20.0));
}

#[test]
fn test_world_corners_follow_rotation() {
    let mut e = Entity::new(1, 0, Shape::Rect(Rect::new(-5.0, -5.0, 10.0, 10.0)));
    e.rotation = FRAC_PI_2;
    let corners = e.world_corners();
    // TL (-5,-5) maps to (5,-5) under a quarter turn about the origin.
    assert!((corners[0].x - 5.0).abs() < 1e-9);
    assert!((corners[0].y + 5.0).abs() < 1e-9);
}

#[test]
fn test_shape_serde_round_trip() {
    let shape = Shape::Polyline(Polyline::new(vec![
        Point::new(0.0, 0.0),
        Point::new(4.0, 2.0),
    ]));
    let json = serde_json::to_string(&shape).unwrap();
    assert!(json.contains("\"kind\""));
    let back: Shape = serde_json::from_str(&json).unwrap();
    assert_eq!(back.control_point_count(), 2);
}
