//! Abstract drawing interface the builders emit primitives into.

use crate::core::types::{Color, Point, Rect};
use crate::graph::geometry::PathGeometry;

/// Outline description. `dashes` are multiples of `width`; empty is solid.
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub width: f64,
    pub dashes: Vec<f64>,
}

impl Pen {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dashes: Vec::new(),
        }
    }

    pub fn dashed(color: Color, width: f64, dashes: &[f64]) -> Self {
        Self {
            color,
            width,
            dashes: dashes.to_vec(),
        }
    }

    /// Dash lengths in surface units.
    pub fn scaled_dashes(&self) -> Vec<f64> {
        self.dashes.iter().map(|d| d * self.width).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    Solid(Color),
    /// Gradient from `inner` at `origin` to `outer` at the shape's edge.
    /// `origin` is relative to the shape's bounding box (0..1 on each axis).
    RadialGradient {
        origin: Point,
        inner: Color,
        outer: Color,
    },
}

impl Brush {
    /// Hollow shapes are filled with this so their interior stays hit-testable.
    pub const TRANSPARENT: Brush = Brush::Solid(Color::TRANSPARENT);
}

/// A run of text. `origin` is the top-left of the first line before rotation;
/// `angle` is in radians, clockwise on a y-down surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub origin: Point,
    pub font_size: f64,
    pub color: Color,
    pub angle: f64,
}

impl TextRun {
    pub fn new(text: impl Into<String>, origin: Point, font_size: f64, color: Color) -> Self {
        Self {
            text: text.into(),
            origin,
            font_size,
            color,
            angle: 0.0,
        }
    }

    pub fn rotated(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }
}

/// Reference to a bitmap plus its natural size in surface units.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSource {
    pub uri: String,
    pub width: f64,
    pub height: f64,
}

impl ImageSource {
    pub fn new(uri: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            uri: uri.into(),
            width,
            height,
        }
    }
}

pub trait DrawingSurface {
    fn draw_line(&mut self, p1: Point, p2: Point, pen: &Pen);

    fn draw_ellipse(
        &mut self,
        center: Point,
        radius_x: f64,
        radius_y: f64,
        brush: Option<&Brush>,
        pen: Option<&Pen>,
    );

    fn draw_polygon(&mut self, points: &[Point], brush: Option<&Brush>, pen: Option<&Pen>);

    fn draw_path(&mut self, path: &PathGeometry, brush: Option<&Brush>, pen: Option<&Pen>);

    fn draw_rectangle(
        &mut self,
        rect: Rect,
        corner_radius: f64,
        brush: Option<&Brush>,
        pen: Option<&Pen>,
    );

    fn draw_text(&mut self, run: &TextRun);

    fn draw_image(&mut self, image: &ImageSource, rect: Rect);

    // Glow and drop shadow effects
    fn draw_shadow(&mut self, rect: Rect, corner_radius: f64, color: Color, blur: f64, offset: Point);
}
