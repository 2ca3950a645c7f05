//! Vertices, edges and their typed per-element visual overrides.

use serde::{Deserialize, Serialize};

use crate::core::error::ElementKind;
use crate::core::types::{Color, Point};
use crate::platform::surface::ImageSource;

pub type VertexId = u32;
pub type EdgeId = u32;

/// Whether, and how, an element is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Visible,
    /// Drawn with the filtered alpha, overriding every other alpha source.
    Filtered,
    /// Not drawn at all.
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexShape {
    Circle,
    Disk,
    Sphere,
    Square,
    SolidSquare,
    Diamond,
    SolidDiamond,
    Triangle,
    SolidTriangle,
    Image,
    Label,
    SolidTaperedDiamond,
    SolidRoundedX,
}

impl VertexShape {
    /// Solid shapes are filled with the vertex color; hollow ones are outlined
    /// and filled with a transparent brush.
    pub fn is_solid(self) -> bool {
        matches!(
            self,
            VertexShape::Disk
                | VertexShape::Sphere
                | VertexShape::SolidSquare
                | VertexShape::SolidDiamond
                | VertexShape::SolidTriangle
                | VertexShape::SolidTaperedDiamond
                | VertexShape::SolidRoundedX
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VertexEffect {
    #[default]
    None,
    OuterGlow,
    DropShadow,
}

/// Where an annotation is placed relative to its vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexLabelPosition {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    Nowhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EdgeStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDotDot,
}

impl EdgeStyle {
    /// Dash pattern in multiples of the pen width. Empty means solid.
    pub fn dashes(self) -> &'static [f64] {
        match self {
            EdgeStyle::Solid => &[],
            EdgeStyle::Dash => &[4.0, 2.0],
            EdgeStyle::Dot => &[1.0, 2.0],
            EdgeStyle::DashDot => &[4.0, 2.0, 1.0, 2.0],
            EdgeStyle::DashDotDot => &[4.0, 2.0, 1.0, 2.0, 1.0, 2.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EdgeCurveStyle {
    #[default]
    Straight,
    Bezier,
    CurveThroughIntermediatePoints,
}

/// A color override as delivered by the attribute store. Both forms are
/// coerced to [`Color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorValue {
    Rgba(Color),
    /// Packed `0xAARRGGBB`.
    Argb(u32),
}

impl ColorValue {
    pub fn to_color(self) -> Color {
        match self {
            ColorValue::Rgba(color) => color,
            ColorValue::Argb(argb) => Color::from_argb(argb),
        }
    }
}

impl From<Color> for ColorValue {
    fn from(color: Color) -> Self {
        ColorValue::Rgba(color)
    }
}

/// Color override slots an element can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorKey {
    Color,
    LabelFillColor,
    LabelTextColor,
}

/// Size-like override slots. Each has its own valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeKey {
    Radius,
    Width,
    LabelFontSize,
}

impl SizeKey {
    pub fn name(self) -> &'static str {
        match self {
            SizeKey::Radius => "radius",
            SizeKey::Width => "width",
            SizeKey::LabelFontSize => "label font size",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexAttributes {
    pub shape: Option<VertexShape>,
    pub radius: Option<f32>,
    pub color: Option<ColorValue>,
    pub alpha: Option<f32>,
    pub label: Option<String>,
    pub label_position: Option<VertexLabelPosition>,
    pub label_font_size: Option<f32>,
    pub label_fill_color: Option<ColorValue>,
    pub image: Option<ImageSource>,
    pub effect: Option<VertexEffect>,
    pub selected: bool,
    pub visibility: Option<Visibility>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: VertexId,
    /// Assigned by layout; corrected in place when bounds limiting moves the
    /// vertex. Must be finite to be drawn.
    pub position: Point,
    pub attributes: VertexAttributes,
}

impl Vertex {
    pub fn new(id: VertexId, x: f64, y: f64) -> Self {
        Self {
            id,
            position: Point::new(x, y),
            attributes: VertexAttributes::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeAttributes {
    pub width: Option<f32>,
    pub style: Option<EdgeStyle>,
    pub color: Option<ColorValue>,
    pub alpha: Option<f32>,
    pub label: Option<String>,
    pub label_color: Option<ColorValue>,
    pub label_font_size: Option<f32>,
    pub intermediate_points: Option<Vec<Point>>,
    pub selected: bool,
    pub visibility: Option<Visibility>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub vertex1: VertexId,
    pub vertex2: VertexId,
    pub directed: bool,
    pub attributes: EdgeAttributes,
}

impl Edge {
    pub fn new(id: EdgeId, vertex1: VertexId, vertex2: VertexId, directed: bool) -> Self {
        Self {
            id,
            vertex1,
            vertex2,
            directed,
            attributes: EdgeAttributes::default(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.vertex1 == self.vertex2
    }
}

/// The override lookups the style resolver needs from an element.
pub trait StyledElement {
    fn element_id(&self) -> u32;
    fn element_kind(&self) -> ElementKind;
    fn color_value(&self, key: ColorKey) -> Option<ColorValue>;
    fn size_value(&self, key: SizeKey) -> Option<f32>;
    fn alpha_value(&self) -> Option<f32>;
    fn is_selected(&self) -> bool;
    fn visibility(&self) -> Option<Visibility>;
}

impl StyledElement for Vertex {
    fn element_id(&self) -> u32 {
        self.id
    }

    fn element_kind(&self) -> ElementKind {
        ElementKind::Vertex
    }

    fn color_value(&self, key: ColorKey) -> Option<ColorValue> {
        match key {
            ColorKey::Color => self.attributes.color,
            ColorKey::LabelFillColor => self.attributes.label_fill_color,
            ColorKey::LabelTextColor => None,
        }
    }

    fn size_value(&self, key: SizeKey) -> Option<f32> {
        match key {
            SizeKey::Radius => self.attributes.radius,
            SizeKey::LabelFontSize => self.attributes.label_font_size,
            SizeKey::Width => None,
        }
    }

    fn alpha_value(&self) -> Option<f32> {
        self.attributes.alpha
    }

    fn is_selected(&self) -> bool {
        self.attributes.selected
    }

    fn visibility(&self) -> Option<Visibility> {
        self.attributes.visibility
    }
}

impl StyledElement for Edge {
    fn element_id(&self) -> u32 {
        self.id
    }

    fn element_kind(&self) -> ElementKind {
        ElementKind::Edge
    }

    fn color_value(&self, key: ColorKey) -> Option<ColorValue> {
        match key {
            ColorKey::Color => self.attributes.color,
            ColorKey::LabelTextColor => self.attributes.label_color,
            ColorKey::LabelFillColor => None,
        }
    }

    fn size_value(&self, key: SizeKey) -> Option<f32> {
        match key {
            SizeKey::Width => self.attributes.width,
            SizeKey::LabelFontSize => self.attributes.label_font_size,
            SizeKey::Radius => None,
        }
    }

    fn alpha_value(&self) -> Option<f32> {
        self.attributes.alpha
    }

    fn is_selected(&self) -> bool {
        self.attributes.selected
    }

    fn visibility(&self) -> Option<Visibility> {
        self.attributes.visibility
    }
}

/// The complete graph handed to a render pass
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn find_vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.iter().find(|v| v.id == id)
    }

    pub fn find_vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.iter_mut().find(|v| v.id == id)
    }

    pub fn find_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }
}
