//! Builds the drawn form of a vertex: shape, optional effect, annotation,
//! and the history record later read by edges.

use std::rc::Rc;

use log::{debug, trace};

use crate::core::config;
use crate::core::error::{DrawError, DrawResult, ElementKind};
use crate::core::types::{Color, Point, Rect};
use crate::graph::context::GraphDrawingContext;
use crate::graph::geometry;
use crate::graph::history::{ShapeGeometry, VertexDrawingHistory};
use crate::graph::model::{
    ColorKey, SizeKey, Vertex, VertexEffect, VertexLabelPosition, VertexShape, Visibility,
};
use crate::graph::style::StyleResolver;
use crate::graph::vertex_label::VertexLabelDrawer;
use crate::platform::display_list::DisplayList;
use crate::platform::surface::{Brush, DrawingSurface, Pen, TextRun};
use crate::platform::text::{truncate_graphemes, MonospaceTextMeasurer, TextBlock, TextMeasurer};

pub struct VertexDrawer {
    pub style: StyleResolver,
    pub shape: VertexShape,
    /// Unscaled default radius.
    pub radius: f64,
    pub effect: VertexEffect,
    pub relative_outer_glow_size: f64,
    pub label_position: VertexLabelPosition,
    pub label_fill_color: Color,
    pub label_wrap_text: bool,
    pub label_wrap_max_text_width: f64,
    pub limit_vertices_to_bounds: bool,
    pub font_size: f64,
    pub max_label_length: Option<usize>,
    pub label_drawer: VertexLabelDrawer,
    measurer: Rc<dyn TextMeasurer>,
}

/// Per-vertex state shared by the shape-specific steps.
struct Resolved {
    visibility: Visibility,
    selected: bool,
    label: Option<String>,
}

impl VertexDrawer {
    pub fn new(measurer: Rc<dyn TextMeasurer>) -> Self {
        Self {
            style: StyleResolver::new(config::VERTEX_COLOR, config::SELECTED_COLOR),
            shape: VertexShape::Disk,
            radius: config::VERTEX_RADIUS,
            effect: VertexEffect::None,
            relative_outer_glow_size: config::RELATIVE_OUTER_GLOW_SIZE,
            label_position: VertexLabelPosition::TopRight,
            label_fill_color: config::LABEL_FILL_COLOR,
            label_wrap_text: true,
            label_wrap_max_text_width: config::LABEL_WRAP_MAX_TEXT_WIDTH,
            limit_vertices_to_bounds: true,
            font_size: config::FONT_SIZE,
            max_label_length: None,
            label_drawer: VertexLabelDrawer::new(),
            measurer,
        }
    }

    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    /// Draw `vertex`, correcting its position in place when it has to be
    /// moved inside the usable rectangle. `Ok(None)` means it was not drawn.
    pub fn try_draw_vertex(
        &self,
        vertex: &mut Vertex,
        ctx: &GraphDrawingContext,
    ) -> DrawResult<Option<VertexDrawingHistory>> {
        let Some(usable) = ctx.usable_rect() else {
            debug!("vertex {} skipped: no usable drawing area", vertex.id);
            return Ok(None);
        };
        let visibility = self.style.visibility(vertex);
        if visibility == Visibility::Hidden {
            return Ok(None);
        }
        if let Some(value) = [vertex.position.x, vertex.position.y]
            .into_iter()
            .find(|c| !c.is_finite())
        {
            return Err(DrawError::OutOfRange {
                element: ElementKind::Vertex,
                id: vertex.id,
                key: "position",
                value,
                min: f64::MIN,
                max: f64::MAX,
            });
        }

        let resolved = Resolved {
            visibility,
            selected: self.style.draw_as_selected(vertex),
            label: self.label_text(vertex),
        };

        let mut shape = vertex.attributes.shape.unwrap_or(self.shape);
        if (shape == VertexShape::Label && resolved.label.is_none())
            || (shape == VertexShape::Image && vertex.attributes.image.is_none())
        {
            shape = VertexShape::Disk;
        }

        let history = match shape {
            VertexShape::Label => self.draw_label_shape(vertex, ctx, &usable, &resolved)?,
            VertexShape::Image => self.draw_image_shape(vertex, ctx, &usable, &resolved)?,
            _ => self.draw_simple_shape(vertex, shape, ctx, &usable, &resolved)?,
        };
        trace!(
            "vertex {} drawn as {:?} at ({:.1}, {:.1})",
            vertex.id,
            shape,
            history.location.x,
            history.location.y
        );
        Ok(Some(history))
    }

    fn label_text(&self, vertex: &Vertex) -> Option<String> {
        let text = vertex.attributes.label.as_deref()?;
        let text = match self.max_label_length {
            Some(max) => truncate_graphemes(text, max),
            None => text.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn label_font_size(&self, vertex: &Vertex) -> DrawResult<f64> {
        self.style.size(
            vertex,
            SizeKey::LabelFontSize,
            self.font_size,
            config::LABEL_FONT_SIZE_MIN,
            config::LABEL_FONT_SIZE_MAX,
        )
    }

    fn label_block(&self, text: &str, font_size: f64) -> TextBlock {
        let scale = self.style.graph_scale();
        let wrap_width = self
            .label_wrap_text
            .then(|| self.label_wrap_max_text_width * scale);
        TextBlock::layout(
            self.measurer(),
            text,
            font_size * scale,
            wrap_width,
            Some(config::LABEL_MAX_HEIGHT * scale),
        )
    }

    /// Move `bounds` inside `usable` when limiting is on, shifting the vertex
    /// by the same amount.
    fn move_if_necessary(&self, vertex: &mut Vertex, usable: &Rect, bounds: Rect) -> Rect {
        if !self.limit_vertices_to_bounds {
            return bounds;
        }
        let moved = bounds.move_within(usable);
        let delta = moved.top_left() - bounds.top_left();
        if delta != Point::default() {
            debug!(
                "vertex {} moved by ({:.1}, {:.1}) to stay in bounds",
                vertex.id, delta.x, delta.y
            );
            vertex.position += delta;
        }
        moved
    }

    fn draw_simple_shape(
        &self,
        vertex: &mut Vertex,
        shape: VertexShape,
        ctx: &GraphDrawingContext,
        usable: &Rect,
        resolved: &Resolved,
    ) -> DrawResult<VertexDrawingHistory> {
        let radius = self.style.scaled_size(
            vertex,
            SizeKey::Radius,
            self.radius,
            config::VERTEX_RADIUS_MIN,
            config::VERTEX_RADIUS_MAX,
        )?;
        let color = self.style.color(vertex, resolved.visibility, resolved.selected)?;

        let location = vertex.position;
        let (bounds, path) = match shape {
            VertexShape::Triangle | VertexShape::SolidTriangle => (
                Rect::triangle_bounds_from_center_and_half_width(location, radius),
                None,
            ),
            VertexShape::SolidTaperedDiamond => {
                let path = geometry::tapered_diamond(location, radius);
                (path.bounds(), Some(path))
            }
            VertexShape::SolidRoundedX => {
                let path = geometry::rounded_x(location, radius);
                (path.bounds(), Some(path))
            }
            _ => (Rect::square_from_center_and_half_width(location, radius), None),
        };
        let moved = self.move_if_necessary(vertex, usable, bounds);
        let delta = moved.top_left() - bounds.top_left();
        let location = vertex.position;
        let path = path.map(|p| p.translated(delta));

        let shape_geometry = match (shape, path) {
            (VertexShape::Sphere, _) => ShapeGeometry::Sphere { radius },
            (VertexShape::Square | VertexShape::SolidSquare, _) => {
                ShapeGeometry::Square { half_width: radius }
            }
            (VertexShape::Diamond | VertexShape::SolidDiamond, _) => {
                ShapeGeometry::Diamond { half_width: radius }
            }
            (VertexShape::Triangle | VertexShape::SolidTriangle, _) => {
                ShapeGeometry::Triangle { half_width: radius }
            }
            (VertexShape::SolidTaperedDiamond, Some(path)) => ShapeGeometry::TaperedDiamond {
                half_width: radius,
                path,
            },
            (VertexShape::SolidRoundedX, Some(path)) => ShapeGeometry::RoundedX {
                half_width: radius,
                path,
            },
            _ => ShapeGeometry::Circle { radius },
        };

        let mut visual = DisplayList::new();
        let corner_radius = match shape_geometry {
            ShapeGeometry::Circle { .. } | ShapeGeometry::Sphere { .. } => radius,
            _ => 0.0,
        };
        self.draw_effect(&mut visual, ctx, vertex, moved, corner_radius, color, radius, false);

        let pen = Pen::solid(color, config::VERTEX_PEN_WIDTH);
        let solid = shape.is_solid();
        let fill = if solid {
            Brush::Solid(color)
        } else {
            Brush::TRANSPARENT
        };
        let outline = if solid { None } else { Some(&pen) };
        match &shape_geometry {
            ShapeGeometry::Circle { .. } => {
                visual.draw_ellipse(location, radius, radius, Some(&fill), outline)
            }
            ShapeGeometry::Sphere { .. } => {
                let gradient = Brush::RadialGradient {
                    origin: Point::new(0.3, 0.3),
                    inner: Color::WHITE.with_alpha(color.a),
                    outer: color,
                };
                visual.draw_ellipse(location, radius, radius, Some(&gradient), None)
            }
            ShapeGeometry::Square { .. } => visual.draw_rectangle(moved, 0.0, Some(&fill), outline),
            ShapeGeometry::Diamond { .. } => {
                visual.draw_path(&geometry::diamond(location, radius), Some(&fill), outline)
            }
            ShapeGeometry::Triangle { .. } => {
                visual.draw_path(&geometry::triangle(location, radius), Some(&fill), outline)
            }
            ShapeGeometry::TaperedDiamond { path, .. } | ShapeGeometry::RoundedX { path, .. } => {
                visual.draw_path(path, Some(&fill), Some(&pen))
            }
            ShapeGeometry::Image { .. } | ShapeGeometry::Label { .. } => {}
        }

        if let Some(text) = &resolved.label {
            let font_size = self.label_font_size(vertex)?;
            self.draw_annotation(&mut visual, ctx, vertex, &shape_geometry, location, text, font_size, color);
        }

        Ok(VertexDrawingHistory {
            vertex_id: vertex.id,
            location,
            shape,
            geometry: shape_geometry,
            color,
            selected: resolved.selected,
            visual,
        })
    }

    fn draw_image_shape(
        &self,
        vertex: &mut Vertex,
        ctx: &GraphDrawingContext,
        usable: &Rect,
        resolved: &Resolved,
    ) -> DrawResult<VertexDrawingHistory> {
        let image = match vertex.attributes.image.clone() {
            Some(image) => image,
            None => return self.draw_simple_shape(vertex, VertexShape::Disk, ctx, usable, resolved),
        };
        let scale = self.style.graph_scale();
        let bounds = Rect::centered(vertex.position, image.width * scale, image.height * scale);
        let moved = self.move_if_necessary(vertex, usable, bounds);
        let location = vertex.position;

        let alpha = if resolved.selected {
            255
        } else {
            self.style.alpha(vertex, resolved.visibility, 255)?
        };
        let color = self.style.color(vertex, resolved.visibility, resolved.selected)?;
        let shape_geometry = ShapeGeometry::Image { bounds: moved };

        let mut visual = DisplayList::new();
        if alpha > 0 {
            self.draw_effect(&mut visual, ctx, vertex, moved, 0.0, color, 0.0, true);
            visual.draw_image(&image, moved);
            visual.draw_rectangle(
                moved,
                0.0,
                None,
                Some(&Pen::solid(color, config::VERTEX_PEN_WIDTH)),
            );
            if alpha < 255 {
                let fade = ctx.back_color().with_alpha(255 - alpha);
                visual.draw_rectangle(moved, 0.0, Some(&Brush::Solid(fade)), None);
            }
            if let Some(text) = &resolved.label {
                let font_size = self.label_font_size(vertex)?;
                self.draw_annotation(&mut visual, ctx, vertex, &shape_geometry, location, text, font_size, color);
            }
        }

        Ok(VertexDrawingHistory {
            vertex_id: vertex.id,
            location,
            shape: VertexShape::Image,
            geometry: shape_geometry,
            color,
            selected: resolved.selected,
            visual,
        })
    }

    fn draw_label_shape(
        &self,
        vertex: &mut Vertex,
        ctx: &GraphDrawingContext,
        usable: &Rect,
        resolved: &Resolved,
    ) -> DrawResult<VertexDrawingHistory> {
        let text = match &resolved.label {
            Some(text) => text.clone(),
            None => return self.draw_simple_shape(vertex, VertexShape::Disk, ctx, usable, resolved),
        };
        let font_size = self.label_font_size(vertex)?;
        let block = self.label_block(&text, font_size);
        let scale = self.style.graph_scale();

        let mut text_color = self.style.color(vertex, resolved.visibility, false)?;
        let mut fill_color = self.style.color_for_key(
            vertex,
            ColorKey::LabelFillColor,
            self.label_fill_color,
            resolved.visibility,
            true,
        )?;
        let outline_color = if resolved.selected {
            text_color = text_color.with_alpha(255);
            fill_color = fill_color.with_alpha(255);
            self.style.selected_color
        } else {
            text_color
        };

        let padding = (3.0 + (font_size - 14.0) * 2.0 / 25.4).max(0.0) * scale;
        let bounds = Rect::centered(vertex.position, block.width, block.height)
            .inflate(padding, 0.7 * padding);
        let moved = self.move_if_necessary(vertex, usable, bounds);
        let location = vertex.position;

        let mut visual = DisplayList::new();
        self.draw_effect(&mut visual, ctx, vertex, moved, 0.0, outline_color, 0.0, true);
        visual.draw_rectangle(
            moved,
            0.0,
            Some(&Brush::Solid(fill_color)),
            Some(&Pen::solid(outline_color, config::VERTEX_PEN_WIDTH)),
        );
        let top = location.y - block.height / 2.0;
        for (i, line) in block.lines.iter().enumerate() {
            let x = location.x - block.line_widths[i] / 2.0;
            let y = top + i as f64 * block.line_height;
            visual.draw_text(&TextRun::new(line.clone(), Point::new(x, y), block.font_size, text_color));
        }

        Ok(VertexDrawingHistory {
            vertex_id: vertex.id,
            location,
            shape: VertexShape::Label,
            geometry: ShapeGeometry::Label { bounds: moved },
            color: outline_color,
            selected: resolved.selected,
            visual,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_annotation(
        &self,
        surface: &mut dyn DrawingSurface,
        ctx: &GraphDrawingContext,
        vertex: &Vertex,
        shape: &ShapeGeometry,
        location: Point,
        text: &str,
        font_size: f64,
        color: Color,
    ) {
        let position = vertex.attributes.label_position.unwrap_or(self.label_position);
        if position == VertexLabelPosition::Nowhere {
            return;
        }
        let block = self.label_block(text, font_size);
        self.label_drawer
            .draw_label(surface, ctx, shape, location, position, &block, color);
    }

    /// Glow or drop shadow behind the shape. Rectangular shapes (image and
    /// label) use fixed sizes; the rest scale with the radius.
    #[allow(clippy::too_many_arguments)]
    fn draw_effect(
        &self,
        surface: &mut dyn DrawingSurface,
        ctx: &GraphDrawingContext,
        vertex: &Vertex,
        bounds: Rect,
        corner_radius: f64,
        color: Color,
        radius: f64,
        rectangular: bool,
    ) {
        match vertex.attributes.effect.unwrap_or(self.effect) {
            VertexEffect::None => {}
            VertexEffect::OuterGlow => {
                let glow = if rectangular {
                    transform_value_to_range(self.relative_outer_glow_size, 1.0, 10.0, 4.0, 50.0)
                } else {
                    transform_value_to_range(
                        radius * self.relative_outer_glow_size,
                        3.0,
                        300.0,
                        4.0,
                        180.0,
                    )
                };
                let glow_color = color.with_alpha((color.a as f64 * 0.9) as u8);
                surface.draw_shadow(bounds, corner_radius, glow_color, glow, Point::default());
            }
            VertexEffect::DropShadow => {
                let (depth, opacity) = if rectangular {
                    (7.0, 0.4)
                } else {
                    (transform_value_to_range(radius, 3.0, 50.0, 4.0, 20.0), 0.6)
                };
                let shadow_color = ctx
                    .back_color()
                    .contrasting()
                    .with_alpha((255.0 * opacity) as u8);
                let offset = Point::new(depth, depth) * std::f64::consts::FRAC_1_SQRT_2;
                surface.draw_shadow(bounds, corner_radius, shadow_color, 5.0, offset);
            }
        }
    }
}

impl Default for VertexDrawer {
    fn default() -> Self {
        Self::new(Rc::new(MonospaceTextMeasurer::new()))
    }
}

/// Map `value` from `[source_min, source_max]` onto `[dest_min, dest_max]`,
/// clamping first.
pub fn transform_value_to_range(
    value: f64,
    source_min: f64,
    source_max: f64,
    dest_min: f64,
    dest_max: f64,
) -> f64 {
    let clamped = value.clamp(source_min, source_max);
    dest_min + (clamped - source_min) / (source_max - source_min) * (dest_max - dest_min)
}
