//! Render pass: every vertex, then every edge, into one surface.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};

use crate::core::config;
use crate::core::error::{DrawError, DrawResult};
use crate::core::settings::DrawSettings;
use crate::core::types::{Color, Rect};
use crate::graph::context::GraphDrawingContext;
use crate::graph::edge_drawer::EdgeDrawer;
use crate::graph::history::{EdgeDrawingHistory, VertexDrawingHistory};
use crate::graph::model::{EdgeCurveStyle, EdgeId, Graph, VertexId};
use crate::graph::vertex_drawer::VertexDrawer;
use crate::platform::surface::{Brush, DrawingSurface};
use crate::platform::text::{MonospaceTextMeasurer, TextMeasurer};

pub type CurveStyleListener = Box<dyn FnMut(EdgeCurveStyle)>;

/// Outcome of one render pass.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub vertices_drawn: usize,
    pub edges_drawn: usize,
    /// Elements that failed to draw. The rest of the pass still ran.
    pub errors: Vec<DrawError>,
}

impl RenderReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct GraphDrawer {
    pub vertex_drawer: VertexDrawer,
    pub edge_drawer: EdgeDrawer,
    pub background_color: Color,
    pub margin: u32,
    vertex_histories: HashMap<VertexId, VertexDrawingHistory>,
    edge_histories: HashMap<EdgeId, EdgeDrawingHistory>,
    curve_style_listeners: Vec<CurveStyleListener>,
}

impl GraphDrawer {
    pub fn new(measurer: Rc<dyn TextMeasurer>) -> Self {
        Self {
            vertex_drawer: VertexDrawer::new(Rc::clone(&measurer)),
            edge_drawer: EdgeDrawer::new(measurer),
            background_color: config::BG_COLOR,
            margin: config::MARGIN,
            vertex_histories: HashMap::new(),
            edge_histories: HashMap::new(),
            curve_style_listeners: Vec::new(),
        }
    }

    pub fn from_settings(settings: &DrawSettings, measurer: Rc<dyn TextMeasurer>) -> DrawResult<Self> {
        settings.validate()?;
        let mut drawer = Self::new(measurer);
        drawer.background_color = settings.background_color;
        drawer.margin = settings.margin;
        drawer.set_graph_scale(settings.graph_scale)?;

        let v = &settings.vertex;
        let vertices = &mut drawer.vertex_drawer;
        vertices.style.use_selection = settings.use_selection;
        vertices.style.filtered_alpha = settings.filtered_alpha;
        vertices.style.color = v.color;
        vertices.style.selected_color = v.selected_color;
        vertices.shape = v.shape;
        vertices.radius = v.radius;
        vertices.effect = v.effect;
        vertices.relative_outer_glow_size = v.relative_outer_glow_size;
        vertices.label_position = v.label_position;
        vertices.label_fill_color = v.label_fill_color;
        vertices.label_wrap_text = v.label_wrap_text;
        vertices.label_wrap_max_text_width = v.label_wrap_max_text_width;
        vertices.label_drawer.background_alpha = v.label_background_alpha;
        vertices.limit_vertices_to_bounds = v.limit_vertices_to_bounds;
        vertices.font_size = v.font_size;
        vertices.max_label_length = v.max_label_length;

        let e = &settings.edge;
        let edges = &mut drawer.edge_drawer;
        edges.style.use_selection = settings.use_selection;
        edges.style.filtered_alpha = settings.filtered_alpha;
        edges.style.color = e.color;
        edges.style.selected_color = e.selected_color;
        edges.width = e.width;
        edges.curve_style = e.curve_style;
        edges.bezier_displacement_factor = e.bezier_displacement_factor;
        edges.draw_arrow_on_directed_edge = e.draw_arrow_on_directed_edge;
        edges.relative_arrow_size = e.relative_arrow_size;
        edges.label_text_color = e.label_text_color;
        edges.label_drawer.background_alpha = e.label_background_alpha;
        edges.label_drawer.ellipsis_buffer_multiple = e.ellipsis_buffer_multiple;
        edges.font_size = e.font_size;
        edges.max_label_length = e.max_label_length;
        edges.curve_tolerance = e.curve_tolerance;
        Ok(drawer)
    }

    pub fn graph_scale(&self) -> f64 {
        self.vertex_drawer.style.graph_scale()
    }

    pub fn set_graph_scale(&mut self, scale: f64) -> DrawResult<()> {
        self.vertex_drawer.style.set_graph_scale(scale)?;
        self.edge_drawer.style.set_graph_scale(scale)
    }

    pub fn curve_style(&self) -> EdgeCurveStyle {
        self.edge_drawer.curve_style
    }

    /// Switch the edge curve style. Edge histories from earlier passes are
    /// dropped and every listener is told about the new style.
    pub fn set_curve_style(&mut self, style: EdgeCurveStyle) {
        if self.edge_drawer.curve_style == style {
            return;
        }
        self.edge_drawer.curve_style = style;
        self.edge_histories.clear();
        debug!("curve style changed to {:?}", style);
        for listener in &mut self.curve_style_listeners {
            listener(style);
        }
    }

    pub fn on_curve_style_changed<F>(&mut self, listener: F)
    where
        F: FnMut(EdgeCurveStyle) + 'static,
    {
        self.curve_style_listeners.push(Box::new(listener));
    }

    /// Draw `graph` into `surface` within `viewport`. Vertices may be moved
    /// into the usable area. Edges end up underneath vertices.
    pub fn draw(
        &mut self,
        graph: &mut Graph,
        viewport: Rect,
        surface: &mut dyn DrawingSurface,
    ) -> RenderReport {
        let ctx = GraphDrawingContext::new(viewport, self.margin, self.background_color);
        let mut report = RenderReport::default();
        self.vertex_histories.clear();
        self.edge_histories.clear();

        surface.draw_rectangle(viewport, 0.0, Some(&Brush::Solid(self.background_color)), None);

        for vertex in &mut graph.vertices {
            match self.vertex_drawer.try_draw_vertex(vertex, &ctx) {
                Ok(Some(history)) => {
                    self.vertex_histories.insert(vertex.id, history);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("vertex {} not drawn: {}", vertex.id, e);
                    report.errors.push(e);
                }
            }
        }

        for edge in &graph.edges {
            match self.edge_drawer.try_draw_edge(edge, &self.vertex_histories, &ctx) {
                Ok(Some(history)) => {
                    self.edge_histories.insert(edge.id, history);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("edge {} not drawn: {}", edge.id, e);
                    report.errors.push(e);
                }
            }
        }

        for edge in &graph.edges {
            if let Some(history) = self.edge_histories.get(&edge.id) {
                history.visual.replay(surface);
            }
        }
        for vertex in &graph.vertices {
            if let Some(history) = self.vertex_histories.get(&vertex.id) {
                history.visual.replay(surface);
            }
        }

        report.vertices_drawn = self.vertex_histories.len();
        report.edges_drawn = self.edge_histories.len();
        debug!(
            "render pass: {} vertices, {} edges, {} errors",
            report.vertices_drawn,
            report.edges_drawn,
            report.errors.len()
        );
        report
    }

    pub fn vertex_history(&self, id: VertexId) -> Option<&VertexDrawingHistory> {
        self.vertex_histories.get(&id)
    }

    pub fn edge_history(&self, id: EdgeId) -> Option<&EdgeDrawingHistory> {
        self.edge_histories.get(&id)
    }

    pub fn vertex_histories(&self) -> &HashMap<VertexId, VertexDrawingHistory> {
        &self.vertex_histories
    }

    pub fn edge_histories(&self) -> &HashMap<EdgeId, EdgeDrawingHistory> {
        &self.edge_histories
    }
}

impl Default for GraphDrawer {
    fn default() -> Self {
        Self::new(Rc::new(MonospaceTextMeasurer::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::graph::model::{Edge, Vertex};
    use crate::platform::display_list::{DisplayList, DrawCommand};

    fn two_vertex_graph() -> Graph {
        Graph {
            vertices: vec![Vertex::new(1, 20.0, 50.0), Vertex::new(2, 120.0, 50.0)],
            edges: vec![Edge::new(10, 1, 2, true)],
        }
    }

    #[test]
    fn test_edges_replay_under_vertices() {
        let mut drawer = GraphDrawer::default();
        let mut graph = two_vertex_graph();
        let mut surface = DisplayList::new();
        let report = drawer.draw(&mut graph, Rect::new(0.0, 0.0, 200.0, 100.0), &mut surface);
        assert!(report.is_clean());
        assert_eq!(report.vertices_drawn, 2);
        assert_eq!(report.edges_drawn, 1);

        let commands = surface.commands();
        assert!(matches!(commands[0], DrawCommand::Rectangle { .. }));
        let line = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Line { .. }))
            .unwrap();
        let first_vertex = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Ellipse { .. }))
            .unwrap();
        assert!(line < first_vertex);
    }

    #[test]
    fn test_element_error_does_not_abort_pass() {
        let mut drawer = GraphDrawer::default();
        let mut graph = two_vertex_graph();
        graph.vertices.push(Vertex::new(3, 80.0, 80.0));
        graph.vertices[2].attributes.radius = Some(10_000.0);
        let mut surface = DisplayList::new();
        let report = drawer.draw(&mut graph, Rect::new(0.0, 0.0, 200.0, 100.0), &mut surface);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(report.errors[0], DrawError::OutOfRange { id: 3, .. }));
        assert_eq!(report.vertices_drawn, 2);
        assert!(drawer.vertex_history(3).is_none());
    }

    #[test]
    fn test_curve_style_change_notifies_and_invalidates() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut drawer = GraphDrawer::default();
        let sink = Rc::clone(&seen);
        drawer.on_curve_style_changed(move |style| sink.borrow_mut().push(style));

        let mut graph = two_vertex_graph();
        let mut surface = DisplayList::new();
        drawer.draw(&mut graph, Rect::new(0.0, 0.0, 200.0, 100.0), &mut surface);
        assert!(drawer.edge_history(10).is_some());

        drawer.set_curve_style(EdgeCurveStyle::Bezier);
        drawer.set_curve_style(EdgeCurveStyle::Bezier);
        assert!(drawer.edge_history(10).is_none());
        assert_eq!(*seen.borrow(), vec![EdgeCurveStyle::Bezier]);
    }

    #[test]
    fn test_from_settings_applies_values() {
        let mut settings = DrawSettings::new();
        settings.graph_scale = 2.0;
        settings.margin = 12;
        settings.vertex.radius = 5.0;
        settings.edge.curve_style = EdgeCurveStyle::Bezier;
        let drawer =
            GraphDrawer::from_settings(&settings, Rc::new(MonospaceTextMeasurer::new())).unwrap();
        assert_eq!(drawer.graph_scale(), 2.0);
        assert_eq!(drawer.margin, 12);
        assert_eq!(drawer.vertex_drawer.radius, 5.0);
        assert_eq!(drawer.curve_style(), EdgeCurveStyle::Bezier);

        settings.graph_scale = 50.0;
        assert!(GraphDrawer::from_settings(&settings, Rc::new(MonospaceTextMeasurer::new())).is_err());
    }
}
