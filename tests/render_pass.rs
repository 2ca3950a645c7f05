//! Whole render passes through the public API, recorded into a display list.

use std::cell::Cell;
use std::rc::Rc;

use graph_draw::core::config;
use graph_draw::core::types::{angle_between_points, Point, Rect};
use graph_draw::graph::edge_drawer::arrow_geometry;
use graph_draw::graph::history::EdgeGeometry;
use graph_draw::graph::model::{EdgeCurveStyle, Visibility};
use graph_draw::platform::display_list::DrawCommand;
use graph_draw::{DisplayList, DrawError, DrawSettings, Edge, Graph, GraphDrawer, Vertex};

fn viewport() -> Rect {
    Rect::new(0.0, 0.0, 200.0, 100.0)
}

fn drawer() -> GraphDrawer {
    let mut drawer = GraphDrawer::default();
    drawer.margin = 5;
    drawer
}

fn pair(directed: bool) -> Graph {
    Graph {
        vertices: vec![Vertex::new(1, 20.0, 50.0), Vertex::new(2, 120.0, 50.0)],
        edges: vec![Edge::new(1, 1, 2, directed)],
    }
}

#[test]
fn test_vertex_outside_viewport_is_pulled_in() {
    let mut drawer = drawer();
    let mut graph = Graph {
        vertices: vec![Vertex::new(1, 1000.0, 1000.0)],
        edges: Vec::new(),
    };
    let mut surface = DisplayList::new();
    drawer.draw(&mut graph, Rect::new(0.0, 0.0, 100.0, 100.0), &mut surface);

    assert_eq!(graph.vertices[0].position, Point::new(92.0, 92.0));
    let history = drawer.vertex_history(1).unwrap();
    assert!(Rect::new(5.0, 5.0, 90.0, 90.0).contains_rect(&history.bounds()));
}

#[test]
fn test_arrow_shortens_line() {
    let arrow = arrow_geometry(
        Point::new(100.0, 0.0),
        angle_between_points(Point::new(0.0, 0.0), Point::new(100.0, 0.0)),
        2.0,
        3.0,
    );
    assert_eq!(arrow.points[0], Point::new(100.0, 0.0));
    assert!((arrow.base_center.x - 91.2).abs() < 1e-9);
    assert!(arrow.base_center.y.abs() < 1e-9);
}

#[test]
fn test_directed_edge_in_pass() {
    let mut drawer = drawer();
    let mut graph = pair(true);
    let mut surface = DisplayList::new();
    let report = drawer.draw(&mut graph, viewport(), &mut surface);
    assert!(report.is_clean());

    let history = drawer.edge_history(1).unwrap();
    let arrow = history.arrow.as_ref().unwrap();
    // Default radius 3, width 1, relative arrow size 3.
    assert_eq!(arrow[0], Point::new(117.0, 50.0));
    match history.geometry {
        EdgeGeometry::Straight { start, end } => {
            assert_eq!(start, Point::new(23.0, 50.0));
            assert!((end.x - 112.7).abs() < 1e-9);
        }
        ref other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_endpoints_lie_on_disk_boundaries() {
    let mut drawer = drawer();
    let mut graph = Graph {
        vertices: vec![Vertex::new(1, 30.0, 20.0), Vertex::new(2, 150.0, 80.0)],
        edges: vec![Edge::new(1, 1, 2, false)],
    };
    graph.vertices[1].attributes.radius = Some(9.0);
    let mut surface = DisplayList::new();
    drawer.draw(&mut graph, viewport(), &mut surface);

    let EdgeGeometry::Straight { start, end } = drawer.edge_history(1).unwrap().geometry else {
        panic!("expected a straight edge");
    };
    assert!((start.distance_to(Point::new(30.0, 20.0)) - 3.0).abs() < 1e-9);
    assert!((end.distance_to(Point::new(150.0, 80.0)) - 9.0).abs() < 1e-9);
}

#[test]
fn test_filtered_vertex_uses_filtered_alpha() {
    let mut drawer = drawer();
    let mut graph = pair(false);
    graph.vertices[0].attributes.visibility = Some(Visibility::Filtered);
    graph.vertices[0].attributes.alpha = Some(200.0);
    let mut surface = DisplayList::new();
    drawer.draw(&mut graph, viewport(), &mut surface);

    let history = drawer.vertex_history(1).unwrap();
    assert_eq!(history.color.a, config::FILTERED_ALPHA);
    assert_eq!(drawer.vertex_history(2).unwrap().color.a, 255);
}

#[test]
fn test_hidden_vertex_drops_its_edges() {
    let mut drawer = drawer();
    let mut graph = pair(true);
    graph.vertices[1].attributes.visibility = Some(Visibility::Hidden);
    let mut surface = DisplayList::new();
    let report = drawer.draw(&mut graph, viewport(), &mut surface);

    assert_eq!(report.vertices_drawn, 1);
    assert_eq!(report.edges_drawn, 0);
    assert!(report.is_clean());
    assert!(!surface
        .commands()
        .iter()
        .any(|c| matches!(c, DrawCommand::Line { .. })));
}

#[test]
fn test_self_loop_near_top_stays_inside() {
    let mut drawer = drawer();
    let mut graph = Graph {
        vertices: vec![Vertex::new(1, 50.0, 8.0)],
        edges: vec![Edge::new(1, 1, 1, true)],
    };
    let mut surface = DisplayList::new();
    drawer.draw(&mut graph, Rect::new(0.0, 0.0, 100.0, 200.0), &mut surface);

    let history = drawer.edge_history(1).unwrap();
    let EdgeGeometry::SelfLoop { center, radius } = history.geometry else {
        panic!("expected a self-loop");
    };
    assert!(center.y > graph.vertices[0].position.y);
    assert!(center.y - radius >= 5.0);
    assert!(history.bounds().is_none());
}

#[test]
fn test_bezier_pass_after_style_change() {
    let mut drawer = drawer();
    let changes = Rc::new(Cell::new(0));
    let counter = Rc::clone(&changes);
    drawer.on_curve_style_changed(move |_| counter.set(counter.get() + 1));
    drawer.set_curve_style(EdgeCurveStyle::Bezier);

    let mut graph = pair(true);
    let mut surface = DisplayList::new();
    drawer.draw(&mut graph, viewport(), &mut surface);

    assert_eq!(changes.get(), 1);
    let history = drawer.edge_history(1).unwrap();
    let EdgeGeometry::Bezier(curve) = history.geometry else {
        panic!("expected a curve");
    };
    // Tip stays on the target disk; the curve stops at the arrow base.
    let tip = history.arrow.as_ref().unwrap()[0];
    assert!((tip.distance_to(Point::new(120.0, 50.0)) - 3.0).abs() < 1e-9);
    assert!(curve.end.distance_to(tip) > 0.0);
    assert!(surface
        .commands()
        .iter()
        .any(|c| matches!(c, DrawCommand::Path { .. })));
}

#[test]
fn test_settings_drive_a_pass() {
    let settings = DrawSettings::from_json(
        r##"{
            "margin": 5,
            "graph_scale": 2.0,
            "vertex": { "shape": "Square", "radius": 4.0 },
            "edge": { "color": "#FF0000" }
        }"##,
    )
    .unwrap();
    let mut drawer =
        GraphDrawer::from_settings(&settings, Rc::new(graph_draw::MonospaceTextMeasurer::new()))
            .unwrap();
    let mut graph = pair(false);
    let mut surface = DisplayList::new();
    drawer.draw(&mut graph, viewport(), &mut surface);

    let vertex = drawer.vertex_history(1).unwrap();
    assert_eq!(vertex.bounds(), Rect::new(12.0, 42.0, 16.0, 16.0));
    let edge = drawer.edge_history(1).unwrap();
    assert_eq!(edge.color, graph_draw::Color::rgb(255, 0, 0));
    assert_eq!(edge.width, 2.0);
}

#[test]
fn test_bad_element_is_reported_not_fatal() {
    let mut drawer = drawer();
    let mut graph = pair(false);
    graph.edges[0].attributes.width = Some(50.0);
    let mut surface = DisplayList::new();
    let report = drawer.draw(&mut graph, viewport(), &mut surface);

    assert_eq!(report.vertices_drawn, 2);
    assert_eq!(report.edges_drawn, 0);
    assert!(matches!(
        report.errors.as_slice(),
        [DrawError::OutOfRange { key: "width", .. }]
    ));
}
