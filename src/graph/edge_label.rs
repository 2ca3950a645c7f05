//! Labels drawn along edges.

use log::trace;
use unicode_segmentation::UnicodeSegmentation;

use crate::core::config;
use crate::core::types::{Color, Point};
use crate::graph::context::GraphDrawingContext;
use crate::graph::geometry::QuadraticBezier;
use crate::platform::surface::{Brush, DrawingSurface, TextRun};
use crate::platform::text::{TextBlock, TextMeasurer};

/// How a label fits between two edge endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelFit {
    pub block: TextBlock,
    /// Width of the reference glyph kept free at each end.
    pub buffer: f64,
    pub edge_length: f64,
    pub available_width: f64,
    pub too_wide: bool,
    /// Where the text starts, as a fraction of the edge length.
    pub origin_fraction: f64,
}

impl LabelFit {
    /// `None` when the edge is too short for any text or the text is empty.
    pub fn compute(
        measurer: &dyn TextMeasurer,
        text: &str,
        font_size: f64,
        endpoint1: Point,
        endpoint2: Point,
    ) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        let buffer = measurer.measure(config::LABEL_BUFFER_GLYPH, font_size).width;
        let edge_length = endpoint1.distance_to(endpoint2);
        let available_width = edge_length - 2.0 * buffer;
        if available_width <= 0.0 {
            return None;
        }
        let block = TextBlock::layout(measurer, text, font_size, None, None);
        if block.width <= 0.0 {
            return None;
        }
        let too_wide = block.width > available_width;
        let origin_fraction = if too_wide {
            buffer / edge_length
        } else {
            ((edge_length - block.width) / 2.0) / edge_length
        };
        Some(Self {
            block,
            buffer,
            edge_length,
            available_width,
            too_wide,
            origin_fraction,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabelDrawer {
    pub background_alpha: u8,
    /// Per-grapheme curved labels end in an ellipsis once they come within this
    /// many buffer widths of the far endpoint.
    pub ellipsis_buffer_multiple: f64,
}

impl EdgeLabelDrawer {
    pub fn new() -> Self {
        Self {
            background_alpha: config::EDGE_LABEL_BACKGROUND_ALPHA,
            ellipsis_buffer_multiple: config::BEZIER_LABEL_ELLIPSIS_BUFFER_MULTIPLE,
        }
    }

    fn background(&self, ctx: &GraphDrawingContext, edge_color: Color) -> Brush {
        Brush::Solid(
            ctx.back_color()
                .with_alpha(self.background_alpha.min(edge_color.a)),
        )
    }

    /// Text along a straight edge, drawn in a frame rotated so the edge runs
    /// left to right. Returns whether anything was drawn.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_straight_label(
        &self,
        surface: &mut dyn DrawingSurface,
        measurer: &dyn TextMeasurer,
        ctx: &GraphDrawingContext,
        endpoint1: Point,
        endpoint2: Point,
        text: &str,
        font_size: f64,
        color: Color,
        edge_color: Color,
    ) -> bool {
        let Some(fit) = LabelFit::compute(measurer, text, font_size, endpoint1, endpoint2) else {
            return false;
        };
        let (start, end) = if endpoint2.x < endpoint1.x {
            (endpoint2, endpoint1)
        } else {
            (endpoint1, endpoint2)
        };
        let direction = end - start;
        let angle = direction.y.atan2(direction.x);
        let to_surface = |local: Point| start + local.rotated_around(Point::default(), angle);

        let block = if fit.too_wide {
            fit.block.trimmed_to(measurer, fit.available_width)
        } else {
            fit.block.clone()
        };
        let origin = Point::new(fit.origin_fraction * fit.edge_length, -block.height / 2.0);
        let (rect_left, rect_width) = if fit.too_wide {
            (origin.x, fit.available_width)
        } else {
            (
                origin.x - fit.buffer,
                (block.width + 2.0 * fit.buffer).min(fit.available_width),
            )
        };
        let corners = [
            Point::new(rect_left, origin.y),
            Point::new(rect_left + rect_width, origin.y),
            Point::new(rect_left + rect_width, origin.y + block.height),
            Point::new(rect_left, origin.y + block.height),
        ]
        .map(to_surface);
        surface.draw_polygon(&corners, Some(&self.background(ctx, edge_color)), None);

        for (i, line) in block.lines.iter().enumerate() {
            let local = Point::new(origin.x, origin.y + i as f64 * block.line_height);
            surface.draw_text(
                &TextRun::new(line.clone(), to_surface(local), block.font_size, color).rotated(angle),
            );
        }
        true
    }

    /// Text following a quadratic curve, one grapheme at a time.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_bezier_label(
        &self,
        surface: &mut dyn DrawingSurface,
        measurer: &dyn TextMeasurer,
        ctx: &GraphDrawingContext,
        curve: &QuadraticBezier,
        text: &str,
        font_size: f64,
        color: Color,
        edge_color: Color,
    ) -> bool {
        let curve = if curve.end.x < curve.start.x {
            curve.reversed()
        } else {
            *curve
        };
        let Some(fit) = LabelFit::compute(measurer, text, font_size, curve.start, curve.end) else {
            return false;
        };
        let far_end = curve.end;
        let stop_distance = self.ellipsis_buffer_multiple * fit.buffer;
        let background = self.background(ctx, edge_color);
        let block_height = fit.block.height;
        let line_step = block_height / fit.block.lines.len() as f64;

        let mut line_offset = 0.0;
        let mut glyphs = 0usize;
        for line in &fit.block.lines {
            let mut fraction = fit.origin_fraction;
            for cluster in line.graphemes(true) {
                let (point, tangent) = curve.point_at_fraction_length(fraction);
                let angle = tangent.y.atan2(tangent.x);

                let ends_here = point.distance_to(far_end) <= stop_distance;
                let glyph = if ends_here {
                    config::ELLIPSIS.to_string()
                } else {
                    cluster.to_string()
                };
                let size = measurer.measure(&glyph, font_size);

                let rotate = |local: Point| local.rotated_around(Point::default(), angle);
                let top_left = point + rotate(Point::new(0.0, -block_height / 2.0 + line_offset));
                let corners = [
                    Point::new(0.0, 0.0),
                    Point::new(size.width, 0.0),
                    Point::new(size.width, size.height),
                    Point::new(0.0, size.height),
                ]
                .map(|corner| top_left + rotate(corner));
                surface.draw_polygon(&corners, Some(&background), None);
                surface.draw_text(&TextRun::new(glyph, top_left, font_size, color).rotated(angle));
                glyphs += 1;

                if ends_here {
                    break;
                }
                fraction += size.width / fit.edge_length;
            }
            line_offset += line_step;
        }
        trace!("curved label drew {} glyphs", glyphs);
        true
    }
}

impl Default for EdgeLabelDrawer {
    fn default() -> Self {
        Self::new()
    }
}
