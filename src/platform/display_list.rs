//! Recording surface. Each element's drawing lands in its own list, which is
//! later replayed onto the real surface and kept for hit testing.

use crate::core::types::{Color, Point, Rect};
use crate::graph::geometry::PathGeometry;
use crate::platform::surface::{Brush, DrawingSurface, ImageSource, Pen, TextRun};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        p1: Point,
        p2: Point,
        pen: Pen,
    },
    Ellipse {
        center: Point,
        radius_x: f64,
        radius_y: f64,
        brush: Option<Brush>,
        pen: Option<Pen>,
    },
    Polygon {
        points: Vec<Point>,
        brush: Option<Brush>,
        pen: Option<Pen>,
    },
    Path {
        path: PathGeometry,
        brush: Option<Brush>,
        pen: Option<Pen>,
    },
    Rectangle {
        rect: Rect,
        corner_radius: f64,
        brush: Option<Brush>,
        pen: Option<Pen>,
    },
    Text(TextRun),
    Image {
        image: ImageSource,
        rect: Rect,
    },
    Shadow {
        rect: Rect,
        corner_radius: f64,
        color: Color,
        blur: f64,
        offset: Point,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text(run) => Some(run),
            _ => None,
        })
    }

    /// Re-issue every recorded primitive, in order, onto `target`.
    pub fn replay(&self, target: &mut dyn DrawingSurface) {
        for command in &self.commands {
            match command {
                DrawCommand::Line { p1, p2, pen } => target.draw_line(*p1, *p2, pen),
                DrawCommand::Ellipse {
                    center,
                    radius_x,
                    radius_y,
                    brush,
                    pen,
                } => target.draw_ellipse(*center, *radius_x, *radius_y, brush.as_ref(), pen.as_ref()),
                DrawCommand::Polygon { points, brush, pen } => {
                    target.draw_polygon(points, brush.as_ref(), pen.as_ref())
                }
                DrawCommand::Path { path, brush, pen } => {
                    target.draw_path(path, brush.as_ref(), pen.as_ref())
                }
                DrawCommand::Rectangle {
                    rect,
                    corner_radius,
                    brush,
                    pen,
                } => target.draw_rectangle(*rect, *corner_radius, brush.as_ref(), pen.as_ref()),
                DrawCommand::Text(run) => target.draw_text(run),
                DrawCommand::Image { image, rect } => target.draw_image(image, *rect),
                DrawCommand::Shadow {
                    rect,
                    corner_radius,
                    color,
                    blur,
                    offset,
                } => target.draw_shadow(*rect, *corner_radius, *color, *blur, *offset),
            }
        }
    }
}

impl DrawingSurface for DisplayList {
    fn draw_line(&mut self, p1: Point, p2: Point, pen: &Pen) {
        self.commands.push(DrawCommand::Line {
            p1,
            p2,
            pen: pen.clone(),
        });
    }

    fn draw_ellipse(
        &mut self,
        center: Point,
        radius_x: f64,
        radius_y: f64,
        brush: Option<&Brush>,
        pen: Option<&Pen>,
    ) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            radius_x,
            radius_y,
            brush: brush.cloned(),
            pen: pen.cloned(),
        });
    }

    fn draw_polygon(&mut self, points: &[Point], brush: Option<&Brush>, pen: Option<&Pen>) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            brush: brush.cloned(),
            pen: pen.cloned(),
        });
    }

    fn draw_path(&mut self, path: &PathGeometry, brush: Option<&Brush>, pen: Option<&Pen>) {
        self.commands.push(DrawCommand::Path {
            path: path.clone(),
            brush: brush.cloned(),
            pen: pen.cloned(),
        });
    }

    fn draw_rectangle(
        &mut self,
        rect: Rect,
        corner_radius: f64,
        brush: Option<&Brush>,
        pen: Option<&Pen>,
    ) {
        self.commands.push(DrawCommand::Rectangle {
            rect,
            corner_radius,
            brush: brush.cloned(),
            pen: pen.cloned(),
        });
    }

    fn draw_text(&mut self, run: &TextRun) {
        self.commands.push(DrawCommand::Text(run.clone()));
    }

    fn draw_image(&mut self, image: &ImageSource, rect: Rect) {
        self.commands.push(DrawCommand::Image {
            image: image.clone(),
            rect,
        });
    }

    fn draw_shadow(&mut self, rect: Rect, corner_radius: f64, color: Color, blur: f64, offset: Point) {
        self.commands.push(DrawCommand::Shadow {
            rect,
            corner_radius,
            color,
            blur,
            offset,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_preserves_order() {
        let mut list = DisplayList::new();
        list.draw_line(Point::new(0.0, 0.0), Point::new(1.0, 1.0), &Pen::solid(Color::BLACK, 1.0));
        list.draw_text(&TextRun::new("a", Point::new(2.0, 2.0), 10.0, Color::BLACK));
        list.draw_ellipse(Point::new(5.0, 5.0), 2.0, 2.0, Some(&Brush::TRANSPARENT), None);

        let mut copy = DisplayList::new();
        list.replay(&mut copy);
        assert_eq!(copy, list);
        assert_eq!(copy.len(), 3);
        assert!(matches!(copy.commands()[1], DrawCommand::Text(_)));
    }

    #[test]
    fn test_texts_filter() {
        let mut list = DisplayList::new();
        assert!(list.is_empty());
        list.draw_text(&TextRun::new("x", Point::default(), 10.0, Color::BLACK));
        list.draw_rectangle(Rect::new(0.0, 0.0, 1.0, 1.0), 0.0, None, None);
        let texts: Vec<&str> = list.texts().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["x"]);
    }
}
