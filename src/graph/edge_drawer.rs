//! Builds the drawn form of an edge between two already drawn vertices.

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, PI};
use std::rc::Rc;

use log::{debug, trace};

use crate::core::config;
use crate::core::error::DrawResult;
use crate::core::types::{angle_between_points, Color, Point, Rect, RectEdge};
use crate::graph::context::GraphDrawingContext;
use crate::graph::edge_label::EdgeLabelDrawer;
use crate::graph::geometry::{self, QuadraticBezier};
use crate::graph::history::{EdgeDrawingHistory, EdgeGeometry, VertexDrawingHistory};
use crate::graph::model::{ColorKey, Edge, EdgeCurveStyle, EdgeStyle, SizeKey, VertexId, Visibility};
use crate::graph::style::StyleResolver;
use crate::platform::display_list::DisplayList;
use crate::platform::surface::{Brush, DrawingSurface, Pen};
use crate::platform::text::{truncate_graphemes, MonospaceTextMeasurer, TextMeasurer};

/// Arrowhead triangle plus the point the edge line should stop at.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub points: [Point; 3],
    pub base_center: Point,
}

/// Arrowhead with its tip at `tip`, pointing along `angle` (radians,
/// counter-clockwise from the x axis as seen on screen).
pub fn arrow_geometry(tip: Point, angle: f64, edge_width: f64, relative_arrow_size: f64) -> Arrow {
    let arrow_width = config::ARROW_WIDTH_FACTOR * edge_width * relative_arrow_size;
    let half_height = arrow_width / 2.0;
    let points = [
        tip,
        Point::new(tip.x - arrow_width, tip.y - half_height),
        Point::new(tip.x - arrow_width, tip.y + half_height),
    ]
    .map(|p| p.rotated_around(tip, -angle));
    let base_center = Point::new(tip.x - arrow_width + config::ARROW_BASE_OVERLAP, tip.y)
        .rotated_around(tip, -angle);
    Arrow {
        points,
        base_center,
    }
}

pub struct EdgeDrawer {
    pub style: StyleResolver,
    /// Unscaled default width.
    pub width: f64,
    pub curve_style: EdgeCurveStyle,
    pub bezier_displacement_factor: f64,
    pub draw_arrow_on_directed_edge: bool,
    pub relative_arrow_size: f64,
    pub label_text_color: Color,
    pub font_size: f64,
    pub max_label_length: Option<usize>,
    pub curve_tolerance: f64,
    pub label_drawer: EdgeLabelDrawer,
    measurer: Rc<dyn TextMeasurer>,
}

/// Resolved appearance of one edge.
struct EdgeStyleState {
    visibility: Visibility,
    selected: bool,
    color: Color,
    width: f64,
    pen: Pen,
    draw_arrow: bool,
}

impl EdgeDrawer {
    pub fn new(measurer: Rc<dyn TextMeasurer>) -> Self {
        Self {
            style: StyleResolver::new(config::EDGE_COLOR, config::SELECTED_COLOR),
            width: config::EDGE_WIDTH,
            curve_style: EdgeCurveStyle::Straight,
            bezier_displacement_factor: config::BEZIER_DISPLACEMENT_FACTOR,
            draw_arrow_on_directed_edge: true,
            relative_arrow_size: config::RELATIVE_ARROW_SIZE,
            label_text_color: config::LABEL_TEXT_COLOR,
            font_size: config::FONT_SIZE,
            max_label_length: None,
            curve_tolerance: config::CURVE_THROUGH_POINTS_TOLERANCE,
            label_drawer: EdgeLabelDrawer::new(),
            measurer,
        }
    }

    fn should_draw_bezier(&self) -> bool {
        self.curve_style == EdgeCurveStyle::Bezier && self.bezier_displacement_factor > 0.0
    }

    /// Draw `edge` using the records of its already drawn vertices.
    /// `Ok(None)` means it was not drawn.
    pub fn try_draw_edge(
        &self,
        edge: &Edge,
        vertices: &HashMap<VertexId, VertexDrawingHistory>,
        ctx: &GraphDrawingContext,
    ) -> DrawResult<Option<EdgeDrawingHistory>> {
        let Some(usable) = ctx.usable_rect() else {
            return Ok(None);
        };
        let visibility = self.style.visibility(edge);
        if visibility == Visibility::Hidden {
            return Ok(None);
        }
        let (Some(vertex1), Some(vertex2)) =
            (vertices.get(&edge.vertex1), vertices.get(&edge.vertex2))
        else {
            debug!("edge {} skipped: an endpoint vertex was not drawn", edge.id);
            return Ok(None);
        };

        let selected = self.style.draw_as_selected(edge);
        let color = self.style.color(edge, visibility, selected)?;
        let width = self.style.scaled_size(
            edge,
            SizeKey::Width,
            self.width,
            config::EDGE_WIDTH_MIN,
            config::EDGE_WIDTH_MAX,
        )?;
        let dashes = if selected {
            EdgeStyle::Solid.dashes()
        } else {
            edge.attributes.style.unwrap_or_default().dashes()
        };
        let state = EdgeStyleState {
            visibility,
            selected,
            color,
            width,
            pen: Pen::dashed(color, width, dashes),
            draw_arrow: edge.directed && self.draw_arrow_on_directed_edge,
        };

        let mut visual = DisplayList::new();
        let drawn = if edge.is_self_loop() {
            Some(self.draw_self_loop(&mut visual, vertex1, &usable, &state))
        } else {
            self.draw_between(&mut visual, edge, vertex1, vertex2, ctx, &usable, &state)?
        };
        let Some((geometry, arrow)) = drawn else {
            return Ok(None);
        };
        trace!("edge {} drawn as {:?}", edge.id, geometry);

        Ok(Some(EdgeDrawingHistory {
            edge_id: edge.id,
            vertex1_location: vertex1.location,
            vertex2_location: vertex2.location,
            geometry,
            arrow,
            color,
            width,
            selected,
            visual,
        }))
    }

    fn draw_self_loop(
        &self,
        surface: &mut dyn DrawingSurface,
        vertex: &VertexDrawingHistory,
        usable: &Rect,
        state: &EdgeStyleState,
    ) -> (EdgeGeometry, Option<Vec<Point>>) {
        let side = usable.farthest_edge(vertex.location);
        let endpoint = vertex.self_loop_endpoint(side);
        let radius = config::SELF_LOOP_CIRCLE_RADIUS;
        let (direction, arrow_angle) = match side {
            RectEdge::Top => (Point::new(0.0, -1.0), 0.0),
            RectEdge::Left => (Point::new(-1.0, 0.0), FRAC_PI_2),
            RectEdge::Right => (Point::new(1.0, 0.0), -FRAC_PI_2),
            RectEdge::Bottom => (Point::new(0.0, 1.0), PI),
        };
        let center = endpoint + direction * radius;
        surface.draw_ellipse(center, radius, radius, None, Some(&state.pen));

        let arrow = state.draw_arrow.then(|| {
            let tip = endpoint + direction * (2.0 * radius);
            let arrow = arrow_geometry(
                tip,
                arrow_angle + config::SELF_LOOP_ARROW_CORRECTION,
                state.width,
                self.relative_arrow_size,
            );
            surface.draw_polygon(&arrow.points, Some(&Brush::Solid(state.color)), None);
            arrow.points.to_vec()
        });
        (EdgeGeometry::SelfLoop { center, radius }, arrow)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_between(
        &self,
        surface: &mut dyn DrawingSurface,
        edge: &Edge,
        vertex1: &VertexDrawingHistory,
        vertex2: &VertexDrawingHistory,
        ctx: &GraphDrawingContext,
        usable: &Rect,
        state: &EdgeStyleState,
    ) -> DrawResult<Option<(EdgeGeometry, Option<Vec<Point>>)>> {
        let endpoint1 = vertex1.edge_endpoint(vertex2.location);
        let endpoint2 = vertex2.edge_endpoint(vertex1.location);
        if endpoint1.distance_to(endpoint2) < 1e-9 {
            debug!("edge {} skipped: zero length", edge.id);
            return Ok(None);
        }

        if self.curve_style == EdgeCurveStyle::CurveThroughIntermediatePoints {
            let points = edge.attributes.intermediate_points.as_deref().unwrap_or_default();
            let geometry =
                self.draw_curve_through_points(surface, vertex1, vertex2, points, endpoint1, endpoint2, state);
            return Ok(Some((geometry, None)));
        }

        let mut end = endpoint2;
        let mut arrow = None;
        let control = self.should_draw_bezier().then(|| {
            geometry::bezier_control_point(
                endpoint1,
                endpoint2,
                self.bezier_displacement_factor,
                &ctx.viewport(),
                usable,
            )
        });

        if state.draw_arrow {
            let from = control.unwrap_or(endpoint1);
            let head = arrow_geometry(
                endpoint2,
                angle_between_points(from, endpoint2),
                state.width,
                self.relative_arrow_size,
            );
            surface.draw_polygon(&head.points, Some(&Brush::Solid(state.color)), None);
            end = head.base_center;
            arrow = Some(head.points.to_vec());
        }

        let geometry = match control {
            Some(control) => {
                let curve = QuadraticBezier::new(endpoint1, control, end);
                surface.draw_path(&curve.to_path(), None, Some(&state.pen));
                EdgeGeometry::Bezier(curve)
            }
            None => {
                surface.draw_line(endpoint1, end, &state.pen);
                EdgeGeometry::Straight {
                    start: endpoint1,
                    end,
                }
            }
        };

        if let Some(text) = self.label_text(edge) {
            let label_color = self.label_color(edge, state)?;
            let font_size = self.style.scaled_size(
                edge,
                SizeKey::LabelFontSize,
                self.font_size,
                config::LABEL_FONT_SIZE_MIN,
                config::LABEL_FONT_SIZE_MAX,
            )?;
            let measurer = self.measurer.as_ref();
            match &geometry {
                EdgeGeometry::Bezier(curve) => {
                    self.label_drawer.draw_bezier_label(
                        surface, measurer, ctx, curve, &text, font_size, label_color, state.color,
                    );
                }
                _ => {
                    self.label_drawer.draw_straight_label(
                        surface, measurer, ctx, endpoint1, end, &text, font_size, label_color,
                        state.color,
                    );
                }
            }
        }
        Ok(Some((geometry, arrow)))
    }

    /// Smooth curve through the intermediate points that are not covered by
    /// either vertex. No arrow or label is drawn in this mode.
    #[allow(clippy::too_many_arguments)]
    fn draw_curve_through_points(
        &self,
        surface: &mut dyn DrawingSurface,
        vertex1: &VertexDrawingHistory,
        vertex2: &VertexDrawingHistory,
        points: &[Point],
        endpoint1: Point,
        endpoint2: Point,
        state: &EdgeStyleState,
    ) -> EdgeGeometry {
        let outside: Vec<Point> = points
            .iter()
            .copied()
            .filter(|p| !vertex1.contains_point(*p) && !vertex2.contains_point(*p))
            .collect();
        let (Some(first), Some(last)) = (outside.first(), outside.last()) else {
            surface.draw_line(endpoint1, endpoint2, &state.pen);
            return EdgeGeometry::Straight {
                start: endpoint1,
                end: endpoint2,
            };
        };

        let mut through = Vec::with_capacity(outside.len() + 2);
        through.push(vertex1.edge_endpoint(*first));
        through.extend_from_slice(&outside);
        through.push(vertex2.edge_endpoint(*last));
        let path = geometry::curve_through_points(
            &through,
            config::CURVE_THROUGH_POINTS_TENSION,
            self.curve_tolerance,
        );
        surface.draw_path(&path, None, Some(&state.pen));
        EdgeGeometry::Curve(path)
    }

    fn label_text(&self, edge: &Edge) -> Option<String> {
        let text = edge.attributes.label.as_deref()?;
        let text = match self.max_label_length {
            Some(max) => truncate_graphemes(text, max),
            None => text.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }

    /// Selected edges label in the edge color. Otherwise the label color
    /// override (or default) takes the edge color's alpha.
    fn label_color(&self, edge: &Edge, state: &EdgeStyleState) -> DrawResult<Color> {
        if state.selected {
            return Ok(state.color);
        }
        let color = self.style.color_for_key(
            edge,
            ColorKey::LabelTextColor,
            self.label_text_color,
            state.visibility,
            false,
        )?;
        Ok(color.with_alpha(state.color.a))
    }
}

impl Default for EdgeDrawer {
    fn default() -> Self {
        Self::new(Rc::new(MonospaceTextMeasurer::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::history::ShapeGeometry;
    use crate::graph::model::VertexShape;
    use crate::platform::display_list::DrawCommand;

    fn ctx() -> GraphDrawingContext {
        GraphDrawingContext::new(Rect::new(0.0, 0.0, 200.0, 200.0), 5, Color::WHITE)
    }

    fn disk(id: VertexId, x: f64, y: f64, radius: f64) -> VertexDrawingHistory {
        VertexDrawingHistory {
            vertex_id: id,
            location: Point::new(x, y),
            shape: VertexShape::Disk,
            geometry: ShapeGeometry::Circle { radius },
            color: Color::BLACK,
            selected: false,
            visual: DisplayList::new(),
        }
    }

    fn vertices(list: Vec<VertexDrawingHistory>) -> HashMap<VertexId, VertexDrawingHistory> {
        list.into_iter().map(|h| (h.vertex_id, h)).collect()
    }

    #[test]
    fn test_arrow_base_is_behind_tip() {
        let arrow = arrow_geometry(Point::new(100.0, 0.0), 0.0, 2.0, 3.0);
        assert_eq!(arrow.points[0], Point::new(100.0, 0.0));
        assert!((arrow.base_center.x - 91.2).abs() < 1e-9);
        assert!(arrow.base_center.y.abs() < 1e-9);
        assert!((arrow.points[1].y + 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_arrow_points_down_screen() {
        // Edge heading straight down: base sits above the tip.
        let angle = angle_between_points(Point::new(0.0, 0.0), Point::new(0.0, 100.0));
        let arrow = arrow_geometry(Point::new(0.0, 100.0), angle, 1.0, 2.0);
        assert!(arrow.base_center.x.abs() < 1e-9);
        assert!(arrow.base_center.y < 100.0);
    }

    #[test]
    fn test_straight_edge_ends_on_disk_boundaries() {
        let drawer = EdgeDrawer::default();
        let map = vertices(vec![disk(1, 20.0, 50.0, 4.0), disk(2, 120.0, 50.0, 6.0)]);
        let edge = Edge::new(1, 1, 2, false);
        let history = drawer.try_draw_edge(&edge, &map, &ctx()).unwrap().unwrap();
        match history.geometry {
            EdgeGeometry::Straight { start, end } => {
                assert_eq!(start, Point::new(24.0, 50.0));
                assert_eq!(end, Point::new(114.0, 50.0));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(history.arrow.is_none());
    }

    #[test]
    fn test_directed_edge_line_stops_at_arrow_base() {
        let mut drawer = EdgeDrawer::default();
        drawer.width = 2.0;
        let map = vertices(vec![disk(1, 20.0, 50.0, 4.0), disk(2, 120.0, 50.0, 4.0)]);
        let edge = Edge::new(1, 1, 2, true);
        let history = drawer.try_draw_edge(&edge, &map, &ctx()).unwrap().unwrap();
        let arrow = history.arrow.clone().unwrap();
        assert_eq!(arrow[0], Point::new(116.0, 50.0));
        let line_end = history
            .visual
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Line { p2, .. } => Some(*p2),
                _ => None,
            })
            .unwrap();
        assert!(line_end.x < 116.0);
        assert!((line_end.x - 107.2).abs() < 1e-9);
    }

    #[test]
    fn test_missing_vertex_is_not_drawn() {
        let drawer = EdgeDrawer::default();
        let map = vertices(vec![disk(1, 20.0, 50.0, 4.0)]);
        let edge = Edge::new(1, 1, 2, false);
        assert!(drawer.try_draw_edge(&edge, &map, &ctx()).unwrap().is_none());
    }

    #[test]
    fn test_coincident_endpoints_are_not_drawn() {
        let drawer = EdgeDrawer::default();
        let map = vertices(vec![disk(1, 50.0, 50.0, 4.0), disk(2, 50.0, 50.0, 4.0)]);
        let edge = Edge::new(1, 1, 2, false);
        assert!(drawer.try_draw_edge(&edge, &map, &ctx()).unwrap().is_none());
    }

    #[test]
    fn test_selected_edge_is_solid() {
        let drawer = EdgeDrawer::default();
        let map = vertices(vec![disk(1, 20.0, 50.0, 4.0), disk(2, 120.0, 50.0, 4.0)]);
        let mut edge = Edge::new(1, 1, 2, false);
        edge.attributes.style = Some(EdgeStyle::Dash);
        let history = drawer.try_draw_edge(&edge, &map, &ctx()).unwrap().unwrap();
        let dashed = |h: &EdgeDrawingHistory| {
            h.visual.commands().iter().find_map(|c| match c {
                DrawCommand::Line { pen, .. } => Some(pen.dashes.clone()),
                _ => None,
            })
        };
        assert_eq!(dashed(&history), Some(vec![4.0, 2.0]));

        edge.attributes.selected = true;
        let history = drawer.try_draw_edge(&edge, &map, &ctx()).unwrap().unwrap();
        assert_eq!(dashed(&history), Some(vec![]));
        assert_eq!(history.color, config::SELECTED_COLOR);
    }

    #[test]
    fn test_self_loop_sits_on_far_side() {
        let drawer = EdgeDrawer::default();
        let map = vertices(vec![disk(1, 100.0, 10.0, 3.0)]);
        let edge = Edge::new(1, 1, 1, true);
        let history = drawer.try_draw_edge(&edge, &map, &ctx()).unwrap().unwrap();
        match history.geometry {
            EdgeGeometry::SelfLoop { center, radius } => {
                assert_eq!(radius, config::SELF_LOOP_CIRCLE_RADIUS);
                assert_eq!(center, Point::new(100.0, 23.0));
                assert!(center.y - radius >= 5.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(history.arrow.is_some());
        assert!(history.bounds().is_none());
    }

    #[test]
    fn test_bezier_edge_bows_and_keeps_endpoints() {
        let mut drawer = EdgeDrawer::default();
        drawer.curve_style = EdgeCurveStyle::Bezier;
        let map = vertices(vec![disk(1, 40.0, 50.0, 4.0), disk(2, 160.0, 50.0, 4.0)]);
        let edge = Edge::new(1, 1, 2, false);
        let history = drawer.try_draw_edge(&edge, &map, &ctx()).unwrap().unwrap();
        let EdgeGeometry::Bezier(curve) = history.geometry else {
            panic!("expected a curve");
        };
        assert_eq!(curve.start, Point::new(44.0, 50.0));
        assert_eq!(curve.end, Point::new(156.0, 50.0));
        assert!((curve.control.y - 50.0).abs() > 1.0);
    }

    #[test]
    fn test_curve_through_points_filters_covered_points() {
        let mut drawer = EdgeDrawer::default();
        drawer.curve_style = EdgeCurveStyle::CurveThroughIntermediatePoints;
        let map = vertices(vec![disk(1, 20.0, 100.0, 6.0), disk(2, 180.0, 100.0, 6.0)]);
        let mut edge = Edge::new(1, 1, 2, true);
        edge.attributes.intermediate_points = Some(vec![
            Point::new(21.0, 101.0),
            Point::new(100.0, 40.0),
        ]);
        edge.attributes.label = Some("ignored".to_string());
        let history = drawer.try_draw_edge(&edge, &map, &ctx()).unwrap().unwrap();
        let EdgeGeometry::Curve(path) = &history.geometry else {
            panic!("expected a curve");
        };
        let flat = path.flatten();
        assert!(geometry::polyline_distance(&flat, Point::new(100.0, 40.0)) < 1e-6);
        assert!(history.arrow.is_none());
        assert_eq!(history.visual.texts().count(), 0);
    }

    #[test]
    fn test_curve_mode_without_points_draws_plain_line() {
        let mut drawer = EdgeDrawer::default();
        drawer.curve_style = EdgeCurveStyle::CurveThroughIntermediatePoints;
        let map = vertices(vec![disk(1, 20.0, 100.0, 6.0), disk(2, 180.0, 100.0, 6.0)]);
        let mut edge = Edge::new(1, 1, 2, true);
        edge.attributes.label = Some("ignored".to_string());
        let history = drawer.try_draw_edge(&edge, &map, &ctx()).unwrap().unwrap();
        assert_eq!(
            history.geometry,
            EdgeGeometry::Straight {
                start: Point::new(26.0, 100.0),
                end: Point::new(174.0, 100.0),
            }
        );
        assert!(history.arrow.is_none());
        assert_eq!(history.visual.len(), 1);
    }

    #[test]
    fn test_label_color_takes_edge_alpha() {
        let drawer = EdgeDrawer::default();
        let map = vertices(vec![disk(1, 20.0, 50.0, 4.0), disk(2, 180.0, 50.0, 4.0)]);
        let mut edge = Edge::new(1, 1, 2, false);
        edge.attributes.label = Some("w".to_string());
        edge.attributes.label_color = Some(Color::rgb(200, 0, 0).into());
        edge.attributes.alpha = Some(80.0);
        let history = drawer.try_draw_edge(&edge, &map, &ctx()).unwrap().unwrap();
        let run = history.visual.texts().next().unwrap();
        assert_eq!(run.color, Color::rgba(200, 0, 0, 80));
    }
}
