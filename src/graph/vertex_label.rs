//! Annotation labels drawn next to vertices.

use log::debug;

use crate::core::config;
use crate::core::types::{Color, Point, Rect, Size};
use crate::graph::context::GraphDrawingContext;
use crate::graph::history::ShapeGeometry;
use crate::graph::model::VertexLabelPosition;
use crate::platform::surface::{Brush, DrawingSurface, TextRun};
use crate::platform::text::TextBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlignment {
    Left,
    Center,
    Right,
}

/// Labels on the left of a vertex are right-aligned so they hug it, and
/// vice versa.
pub fn text_alignment(position: VertexLabelPosition) -> TextAlignment {
    use VertexLabelPosition::*;
    match position {
        TopLeft | MiddleLeft | BottomLeft => TextAlignment::Right,
        TopRight | MiddleRight | BottomRight => TextAlignment::Left,
        TopCenter | MiddleCenter | BottomCenter | Nowhere => TextAlignment::Center,
    }
}

/// Unclamped label bounds for a label anchored at `anchor`.
pub fn label_bounds(anchor: Point, position: VertexLabelPosition, size: Size) -> Rect {
    use VertexLabelPosition::*;
    let mut x = anchor.x;
    let mut y = anchor.y;
    match position {
        TopLeft | TopCenter | TopRight => y -= size.height + config::LABEL_VERTICAL_MARGIN,
        MiddleLeft => {
            y -= size.height / 2.0;
            x -= config::LABEL_HORIZONTAL_MARGIN;
        }
        MiddleCenter | Nowhere => y -= size.height / 2.0,
        MiddleRight => {
            y -= size.height / 2.0;
            x += config::LABEL_HORIZONTAL_MARGIN;
        }
        BottomLeft | BottomCenter | BottomRight => y += config::LABEL_VERTICAL_MARGIN,
    }

    let left = match text_alignment(position) {
        TextAlignment::Right => x - size.width,
        TextAlignment::Center => x - size.width / 2.0,
        TextAlignment::Left => x,
    };
    Rect::new(left, y, size.width, size.height)
}

/// Translate the label, per axis, so it does not cross the usable
/// rectangle. Alignment is untouched.
pub fn clamp_label(bounds: Rect, usable: &Rect) -> Rect {
    let dx = (usable.left() - bounds.left()).max(0.0) - (bounds.right() - usable.right()).max(0.0);
    let dy = (usable.top() - bounds.top()).max(0.0) - (bounds.bottom() - usable.bottom()).max(0.0);
    bounds.offset(dx, dy)
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexLabelDrawer {
    pub background_alpha: u8,
}

impl VertexLabelDrawer {
    pub fn new() -> Self {
        Self {
            background_alpha: config::VERTEX_LABEL_BACKGROUND_ALPHA,
        }
    }

    /// Draw an annotation for a vertex drawn as `shape` at `center`.
    /// Returns the final label bounds, or `None` when nothing was drawn.
    pub fn draw_label(
        &self,
        surface: &mut dyn DrawingSurface,
        ctx: &GraphDrawingContext,
        shape: &ShapeGeometry,
        center: Point,
        position: VertexLabelPosition,
        block: &TextBlock,
        color: Color,
    ) -> Option<Rect> {
        if position == VertexLabelPosition::Nowhere || block.lines.is_empty() {
            return None;
        }
        let usable = ctx.usable_rect()?;
        let size = Size::new(block.width, block.height);
        if size.is_empty() {
            return None;
        }

        let anchor = shape.label_location(center, position);
        let unclamped = label_bounds(anchor, position, size);
        let pad = config::LABEL_BACKGROUND_PADDING;
        let background = clamp_label(unclamped.inflate(pad, pad), &usable);
        let bounds = background.inflate(-pad, -pad);
        if bounds != unclamped {
            debug!(
                "label moved by ({:.1}, {:.1}) to stay in bounds",
                bounds.x - unclamped.x,
                bounds.y - unclamped.y
            );
        }

        let background_color = ctx
            .back_color()
            .with_alpha(self.background_alpha.min(color.a));
        surface.draw_rectangle(
            background,
            config::LABEL_BACKGROUND_CORNER_RADIUS,
            Some(&Brush::Solid(background_color)),
            None,
        );

        let alignment = text_alignment(position);
        for (i, line) in block.lines.iter().enumerate() {
            let line_width = block.line_widths[i];
            let x = match alignment {
                TextAlignment::Left => bounds.left(),
                TextAlignment::Center => bounds.center().x - line_width / 2.0,
                TextAlignment::Right => bounds.right() - line_width,
            };
            let y = bounds.top() + i as f64 * block.line_height;
            surface.draw_text(&TextRun::new(line.clone(), Point::new(x, y), block.font_size, color));
        }
        Some(bounds)
    }
}

impl Default for VertexLabelDrawer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::display_list::{DisplayList, DrawCommand};
    use crate::platform::text::MonospaceTextMeasurer;

    #[test]
    fn test_alignment_mirrors_position() {
        assert_eq!(text_alignment(VertexLabelPosition::TopLeft), TextAlignment::Right);
        assert_eq!(text_alignment(VertexLabelPosition::BottomCenter), TextAlignment::Center);
        assert_eq!(text_alignment(VertexLabelPosition::MiddleRight), TextAlignment::Left);
    }

    #[test]
    fn test_label_bounds_offsets() {
        let size = Size::new(20.0, 10.0);
        let anchor = Point::new(50.0, 50.0);
        assert_eq!(
            label_bounds(anchor, VertexLabelPosition::TopRight, size),
            Rect::new(50.0, 38.0, 20.0, 10.0)
        );
        assert_eq!(
            label_bounds(anchor, VertexLabelPosition::MiddleLeft, size),
            Rect::new(27.0, 45.0, 20.0, 10.0)
        );
        assert_eq!(
            label_bounds(anchor, VertexLabelPosition::BottomCenter, size),
            Rect::new(40.0, 52.0, 20.0, 10.0)
        );
    }

    #[test]
    fn test_clamp_is_idempotent_for_in_bounds_label() {
        let usable = Rect::new(5.0, 5.0, 90.0, 90.0);
        let inside = Rect::new(10.0, 10.0, 20.0, 10.0);
        assert_eq!(clamp_label(inside, &usable), inside);

        let outside = Rect::new(85.0, -3.0, 20.0, 10.0);
        let clamped = clamp_label(outside, &usable);
        assert_eq!(clamped, Rect::new(75.0, 5.0, 20.0, 10.0));
        assert_eq!(clamp_label(clamped, &usable), clamped);
    }

    #[test]
    fn test_draw_label_background_then_text() {
        let ctx = GraphDrawingContext::new(Rect::new(0.0, 0.0, 100.0, 100.0), 5, Color::WHITE);
        let measurer = MonospaceTextMeasurer::new();
        let block = TextBlock::layout(&measurer, "hub", 10.0, None, None);
        let mut list = DisplayList::new();
        let drawer = VertexLabelDrawer::new();
        let bounds = drawer
            .draw_label(
                &mut list,
                &ctx,
                &ShapeGeometry::Circle { radius: 3.0 },
                Point::new(90.0, 50.0),
                VertexLabelPosition::MiddleRight,
                &block,
                Color::rgba(0, 0, 0, 100),
            )
            .unwrap();
        assert!(bounds.right() <= 95.0 + 1e-9);
        match &list.commands()[0] {
            DrawCommand::Rectangle {
                rect,
                brush: Some(Brush::Solid(c)),
                ..
            } => {
                assert_eq!(*c, Color::rgba(255, 255, 255, 100));
                // The padded background stays flush inside the usable area.
                assert!((rect.right() - 95.0).abs() < 1e-9);
                let pad = config::LABEL_BACKGROUND_PADDING;
                assert!((bounds.right() + pad - rect.right()).abs() < 1e-9);
                assert!((bounds.left() - pad - rect.left()).abs() < 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(list.texts().count(), 1);
    }

    #[test]
    fn test_nowhere_draws_nothing() {
        let ctx = GraphDrawingContext::new(Rect::new(0.0, 0.0, 100.0, 100.0), 5, Color::WHITE);
        let measurer = MonospaceTextMeasurer::new();
        let block = TextBlock::layout(&measurer, "x", 10.0, None, None);
        let mut list = DisplayList::new();
        let drawn = VertexLabelDrawer::new().draw_label(
            &mut list,
            &ctx,
            &ShapeGeometry::Circle { radius: 3.0 },
            Point::new(50.0, 50.0),
            VertexLabelPosition::Nowhere,
            &block,
            Color::BLACK,
        );
        assert!(drawn.is_none());
        assert!(list.is_empty());
    }
}
