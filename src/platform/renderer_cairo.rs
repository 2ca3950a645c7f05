//! Cairo-backed drawing surface and text measurement.

use std::f64::consts::PI;
use std::fs::File;

use cairo::{Context, FontSlant, FontWeight, Format, ImageSurface, RadialGradient};
use log::warn;

use crate::core::types::{Color, Point, Rect, Size};
use crate::graph::geometry::{PathGeometry, PathSegment};
use crate::platform::surface::{Brush, DrawingSurface, ImageSource, Pen, TextRun};
use crate::platform::text::TextMeasurer;

const FONT_FACE: &str = "sans-serif";

pub struct RendererCairo {
    cr: Context,
}

impl RendererCairo {
    pub fn new(cr: Context) -> Self {
        Self { cr }
    }

    /// Update the Cairo context (e.g., after the target surface changed).
    pub fn set_context(&mut self, cr: Context) {
        self.cr = cr;
    }

    pub fn context(&self) -> &Context {
        &self.cr
    }

    fn set_color(&self, color: Color) {
        let (r, g, b, a) = color.to_unit_rgba();
        self.cr.set_source_rgba(r, g, b, a);
    }

    fn rounded_rect_path(&self, rect: Rect, r: f64) {
        self.cr.new_path();
        let r = r.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        if r <= 0.0 {
            self.cr.rectangle(rect.x, rect.y, rect.width, rect.height);
            return;
        }
        let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
        self.cr.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
        self.cr.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
        self.cr.arc(x + r, y + h - r, r, PI / 2.0, PI);
        self.cr.arc(x + r, y + r, r, PI, 3.0 * PI / 2.0);
        self.cr.close_path();
    }

    fn geometry_path(&self, path: &PathGeometry) {
        self.cr.new_path();
        self.cr.move_to(path.start.x, path.start.y);
        let mut current = path.start;
        for segment in &path.segments {
            match *segment {
                PathSegment::Line(end) => {
                    self.cr.line_to(end.x, end.y);
                    current = end;
                }
                PathSegment::Quadratic { control, end } => {
                    // Cairo only has cubics.
                    let c1 = current + (control - current) * (2.0 / 3.0);
                    let c2 = end + (control - end) * (2.0 / 3.0);
                    self.cr.curve_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
                    current = end;
                }
                PathSegment::Cubic {
                    control1,
                    control2,
                    end,
                } => {
                    self.cr
                        .curve_to(control1.x, control1.y, control2.x, control2.y, end.x, end.y);
                    current = end;
                }
            }
        }
        if path.closed {
            self.cr.close_path();
        }
    }

    /// Fill and/or stroke the current path.
    fn paint_path(&self, brush: Option<&Brush>, pen: Option<&Pen>) {
        if let Some(brush) = brush {
            self.set_brush(brush);
            self.cr.fill_preserve().ok();
        }
        if let Some(pen) = pen {
            self.set_color(pen.color);
            self.cr.set_line_width(pen.width);
            self.cr.set_dash(&pen.scaled_dashes(), 0.0);
            self.cr.stroke_preserve().ok();
            self.cr.set_dash(&[], 0.0);
        }
        self.cr.new_path();
    }

    fn set_brush(&self, brush: &Brush) {
        match brush {
            Brush::Solid(color) => self.set_color(*color),
            Brush::RadialGradient {
                origin,
                inner,
                outer,
            } => {
                let (x1, y1, x2, y2) = self.cr.fill_extents().unwrap_or((0.0, 0.0, 0.0, 0.0));
                let width = x2 - x1;
                let height = y2 - y1;
                let focus = Point::new(x1 + origin.x * width, y1 + origin.y * height);
                let center = Point::new(x1 + width / 2.0, y1 + height / 2.0);
                let gradient =
                    RadialGradient::new(focus.x, focus.y, 0.0, center.x, center.y, width.max(height) / 2.0);
                let (r, g, b, a) = inner.to_unit_rgba();
                gradient.add_color_stop_rgba(0.0, r, g, b, a);
                let (r, g, b, a) = outer.to_unit_rgba();
                gradient.add_color_stop_rgba(1.0, r, g, b, a);
                self.cr.set_source(&gradient).ok();
            }
        }
    }
}

impl DrawingSurface for RendererCairo {
    fn draw_line(&mut self, p1: Point, p2: Point, pen: &Pen) {
        self.cr.new_path();
        self.cr.move_to(p1.x, p1.y);
        self.cr.line_to(p2.x, p2.y);
        self.paint_path(None, Some(pen));
    }

    fn draw_ellipse(
        &mut self,
        center: Point,
        radius_x: f64,
        radius_y: f64,
        brush: Option<&Brush>,
        pen: Option<&Pen>,
    ) {
        if radius_x <= 0.0 || radius_y <= 0.0 {
            return;
        }
        self.cr.save().ok();
        self.cr.new_path();
        self.cr.translate(center.x, center.y);
        self.cr.scale(radius_x, radius_y);
        self.cr.arc(0.0, 0.0, 1.0, 0.0, 2.0 * PI);
        self.cr.restore().ok();
        self.paint_path(brush, pen);
    }

    fn draw_polygon(&mut self, points: &[Point], brush: Option<&Brush>, pen: Option<&Pen>) {
        let Some(first) = points.first() else {
            return;
        };
        self.cr.new_path();
        self.cr.move_to(first.x, first.y);
        for p in &points[1..] {
            self.cr.line_to(p.x, p.y);
        }
        self.cr.close_path();
        self.paint_path(brush, pen);
    }

    fn draw_path(&mut self, path: &PathGeometry, brush: Option<&Brush>, pen: Option<&Pen>) {
        self.geometry_path(path);
        self.paint_path(brush, pen);
    }

    fn draw_rectangle(
        &mut self,
        rect: Rect,
        corner_radius: f64,
        brush: Option<&Brush>,
        pen: Option<&Pen>,
    ) {
        self.rounded_rect_path(rect, corner_radius);
        self.paint_path(brush, pen);
    }

    fn draw_text(&mut self, run: &TextRun) {
        self.set_color(run.color);
        self.cr
            .select_font_face(FONT_FACE, FontSlant::Normal, FontWeight::Normal);
        self.cr.set_font_size(run.font_size);
        let (ascent, line_height) = match self.cr.font_extents() {
            Ok(extents) => (extents.ascent(), extents.height()),
            Err(_) => (run.font_size, run.font_size * 1.2),
        };

        self.cr.save().ok();
        self.cr.translate(run.origin.x, run.origin.y);
        self.cr.rotate(run.angle);
        for (i, line) in run.text.split('\n').enumerate() {
            self.cr.move_to(0.0, ascent + i as f64 * line_height);
            self.cr.show_text(line).ok();
        }
        self.cr.restore().ok();
        self.cr.new_path();
    }

    fn draw_image(&mut self, image: &ImageSource, rect: Rect) {
        let surface = File::open(&image.uri)
            .map_err(|e| e.to_string())
            .and_then(|mut file| ImageSurface::create_from_png(&mut file).map_err(|e| e.to_string()));
        let surface = match surface {
            Ok(surface) => surface,
            Err(e) => {
                warn!("Failed to load image {}: {}", image.uri, e);
                return;
            }
        };
        let (w, h) = (surface.width() as f64, surface.height() as f64);
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        self.cr.save().ok();
        self.cr.translate(rect.x, rect.y);
        self.cr.scale(rect.width / w, rect.height / h);
        if self.cr.set_source_surface(&surface, 0.0, 0.0).is_ok() {
            self.cr.paint().ok();
        }
        self.cr.restore().ok();
    }

    fn draw_shadow(&mut self, rect: Rect, corner_radius: f64, color: Color, blur: f64, offset: Point) {
        // Approximate blur with expanding translucent rounded rects
        let steps = 5;
        let base = rect.offset(offset.x, offset.y);
        for i in 0..steps {
            let expand = blur * (i as f64 + 1.0) / steps as f64;
            let alpha = color.a as f64 * (1.0 - i as f64 / steps as f64) * 0.3;
            self.rounded_rect_path(base.inflate(expand, expand), corner_radius + expand);
            self.paint_path(Some(&Brush::Solid(color.with_alpha(alpha.round() as u8))), None);
        }
    }
}

/// Measures text with Cairo's toy font API on a scratch surface.
pub struct CairoTextMeasurer {
    cr: Context,
}

impl CairoTextMeasurer {
    pub fn new() -> Result<Self, cairo::Error> {
        let surface = ImageSurface::create(Format::ARgb32, 1, 1)?;
        let cr = Context::new(&surface)?;
        cr.select_font_face(FONT_FACE, FontSlant::Normal, FontWeight::Normal);
        Ok(Self { cr })
    }
}

impl TextMeasurer for CairoTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> Size {
        if text.is_empty() {
            return Size::new(0.0, 0.0);
        }
        self.cr.set_font_size(font_size);
        let line_height = self.line_height(font_size);
        let mut width: f64 = 0.0;
        let mut lines = 0usize;
        for line in text.split('\n') {
            lines += 1;
            if let Ok(extents) = self.cr.text_extents(line) {
                width = width.max(extents.x_advance());
            }
        }
        Size::new(width, line_height * lines as f64)
    }

    fn line_height(&self, font_size: f64) -> f64 {
        self.cr.set_font_size(font_size);
        self.cr
            .font_extents()
            .map(|extents| extents.height())
            .unwrap_or(font_size * 1.2)
    }
}
