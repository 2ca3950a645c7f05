//! Drawing-history records: what was drawn for each vertex and edge during a
//! render pass, and the geometric queries later steps ask of it.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use crate::core::types::{angle_between_points, Color, Point, Rect, RectEdge, COS_30, TAN_30};
use crate::graph::geometry::{self, PathGeometry, QuadraticBezier};
use crate::graph::model::{EdgeId, VertexId, VertexLabelPosition, VertexShape};
use crate::platform::display_list::DisplayList;

/// Shape-specific geometry of a drawn vertex, relative to its location.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    /// Circle and disk.
    Circle { radius: f64 },
    Sphere { radius: f64 },
    /// Hollow and solid squares.
    Square { half_width: f64 },
    Diamond { half_width: f64 },
    Triangle { half_width: f64 },
    TaperedDiamond { half_width: f64, path: PathGeometry },
    RoundedX { half_width: f64, path: PathGeometry },
    Image { bounds: Rect },
    Label { bounds: Rect },
}

impl ShapeGeometry {
    /// Where an edge heading for `towards` meets this shape's boundary.
    pub fn edge_endpoint(&self, center: Point, towards: Point) -> Point {
        match self {
            ShapeGeometry::Circle { radius } | ShapeGeometry::Sphere { radius } => {
                let direction = (towards - center).normalized();
                center + direction * *radius
            }
            ShapeGeometry::Square { half_width } => ray_exit(
                &Rect::square_from_center_and_half_width(center, *half_width),
                center,
                towards,
            ),
            ShapeGeometry::Image { bounds } | ShapeGeometry::Label { bounds } => {
                ray_exit(bounds, center, towards)
            }
            ShapeGeometry::Diamond { half_width } => {
                // A diamond is a square rotated by 45 degrees.
                let rotated = towards.rotated_around(center, FRAC_PI_4);
                let square =
                    Rect::square_from_center_and_half_width(center, half_width * FRAC_1_SQRT_2);
                ray_exit(&square, center, rotated).rotated_around(center, -FRAC_PI_4)
            }
            ShapeGeometry::Triangle { half_width } => {
                triangle_edge_endpoint(center, *half_width, towards)
            }
            ShapeGeometry::TaperedDiamond { .. } | ShapeGeometry::RoundedX { .. } => center,
        }
    }

    /// Attachment point for a self-loop placed on `side`.
    pub fn self_loop_endpoint(&self, center: Point, side: RectEdge) -> Point {
        match self {
            ShapeGeometry::Circle { radius } | ShapeGeometry::Sphere { radius } => {
                side_midpoint(&Rect::square_from_center_and_half_width(center, *radius), side)
            }
            ShapeGeometry::Square { half_width }
            | ShapeGeometry::Diamond { half_width }
            | ShapeGeometry::TaperedDiamond { half_width, .. }
            | ShapeGeometry::RoundedX { half_width, .. } => {
                side_midpoint(&Rect::square_from_center_and_half_width(center, *half_width), side)
            }
            ShapeGeometry::Image { bounds } | ShapeGeometry::Label { bounds } => {
                side_midpoint(bounds, side)
            }
            ShapeGeometry::Triangle { half_width } => {
                let base_y = center.y + half_width * TAN_30;
                match side {
                    RectEdge::Top => Point::new(center.x, center.y - half_width / COS_30),
                    RectEdge::Left => Point::new(center.x - half_width, base_y),
                    RectEdge::Right => Point::new(center.x + half_width, base_y),
                    RectEdge::Bottom => Point::new(center.x, base_y),
                }
            }
        }
    }

    /// Anchor for an annotation at `position`, assuming a zero-height label
    /// with no margin. `Nowhere` yields the center.
    pub fn label_location(&self, center: Point, position: VertexLabelPosition) -> Point {
        use VertexLabelPosition::*;
        match self {
            ShapeGeometry::Circle { radius } | ShapeGeometry::Sphere { radius } => {
                let r = *radius;
                let d = r * FRAC_1_SQRT_2;
                let offset = match position {
                    TopLeft => Point::new(-d, -d),
                    TopCenter => Point::new(0.0, -r),
                    TopRight => Point::new(d, -d),
                    MiddleLeft => Point::new(-r, 0.0),
                    MiddleCenter | Nowhere => Point::new(0.0, 0.0),
                    MiddleRight => Point::new(r, 0.0),
                    BottomLeft => Point::new(-d, d),
                    BottomCenter => Point::new(0.0, r),
                    BottomRight => Point::new(d, d),
                };
                center + offset
            }
            ShapeGeometry::Diamond { half_width }
            | ShapeGeometry::TaperedDiamond { half_width, .. } => {
                let h = *half_width;
                let offset = match position {
                    TopLeft => Point::new(-h / 2.0, -h / 2.0),
                    TopCenter => Point::new(0.0, -h),
                    TopRight => Point::new(h / 2.0, -h / 2.0),
                    MiddleLeft => Point::new(-h, 0.0),
                    MiddleCenter | Nowhere => Point::new(0.0, 0.0),
                    MiddleRight => Point::new(h, 0.0),
                    BottomLeft => Point::new(-h / 2.0, h / 2.0),
                    BottomCenter => Point::new(0.0, h),
                    BottomRight => Point::new(h / 2.0, h / 2.0),
                };
                center + offset
            }
            ShapeGeometry::Triangle { half_width } => {
                let bounds = Rect::triangle_bounds_from_center_and_half_width(center, *half_width);
                let center_x = bounds.center().x;
                let center_y = bounds.top() + 1.2 * (bounds.height / 2.0);
                match position {
                    TopLeft | TopCenter | TopRight => Point::new(center_x, bounds.top()),
                    MiddleLeft => Point::new(center_x - half_width, center_y),
                    MiddleCenter => Point::new(center_x, center_y),
                    MiddleRight => Point::new(center_x + half_width, center_y),
                    BottomLeft => bounds.bottom_left(),
                    BottomCenter => Point::new(center_x, bounds.bottom()),
                    BottomRight => bounds.bottom_right(),
                    Nowhere => center,
                }
            }
            ShapeGeometry::Square { .. }
            | ShapeGeometry::RoundedX { .. }
            | ShapeGeometry::Image { .. }
            | ShapeGeometry::Label { .. } => {
                let b = self.bounds(center);
                let c = b.center();
                match position {
                    TopLeft => b.top_left(),
                    TopCenter => Point::new(c.x, b.top()),
                    TopRight => b.top_right(),
                    MiddleLeft => Point::new(b.left(), c.y),
                    MiddleCenter | Nowhere => c,
                    MiddleRight => Point::new(b.right(), c.y),
                    BottomLeft => b.bottom_left(),
                    BottomCenter => Point::new(c.x, b.bottom()),
                    BottomRight => b.bottom_right(),
                }
            }
        }
    }

    /// Outline as drawn, for hit testing.
    pub fn outline(&self, center: Point) -> PathGeometry {
        match self {
            ShapeGeometry::Circle { radius } | ShapeGeometry::Sphere { radius } => {
                let steps = 48;
                let points: Vec<Point> = (0..steps)
                    .map(|i| {
                        let a = i as f64 * std::f64::consts::TAU / steps as f64;
                        Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
                    })
                    .collect();
                PathGeometry::polygon(&points)
            }
            ShapeGeometry::Diamond { half_width } => geometry::diamond(center, *half_width),
            ShapeGeometry::Triangle { half_width } => geometry::triangle(center, *half_width),
            ShapeGeometry::TaperedDiamond { path, .. } | ShapeGeometry::RoundedX { path, .. } => {
                path.clone()
            }
            ShapeGeometry::Square { .. } | ShapeGeometry::Image { .. } | ShapeGeometry::Label { .. } => {
                let b = self.bounds(center);
                PathGeometry::polygon(&[b.top_left(), b.top_right(), b.bottom_right(), b.bottom_left()])
            }
        }
    }

    pub fn bounds(&self, center: Point) -> Rect {
        match self {
            ShapeGeometry::Circle { radius } | ShapeGeometry::Sphere { radius } => {
                Rect::square_from_center_and_half_width(center, *radius)
            }
            ShapeGeometry::Square { half_width } | ShapeGeometry::Diamond { half_width } => {
                Rect::square_from_center_and_half_width(center, *half_width)
            }
            ShapeGeometry::Triangle { half_width } => {
                Rect::triangle_bounds_from_center_and_half_width(center, *half_width)
            }
            ShapeGeometry::TaperedDiamond { path, .. } | ShapeGeometry::RoundedX { path, .. } => {
                path.bounds()
            }
            ShapeGeometry::Image { bounds } | ShapeGeometry::Label { bounds } => *bounds,
        }
    }

    pub fn contains_point(&self, center: Point, point: Point) -> bool {
        match self {
            ShapeGeometry::Circle { radius } | ShapeGeometry::Sphere { radius } => {
                center.distance_to(point) <= *radius
            }
            ShapeGeometry::Square { .. } | ShapeGeometry::Image { .. } | ShapeGeometry::Label { .. } => {
                self.bounds(center).contains(point)
            }
            _ => self.outline(center).contains(point),
        }
    }
}

/// Point where the ray from `center` (inside `rect`) toward `towards` leaves
/// the rectangle.
fn ray_exit(rect: &Rect, center: Point, towards: Point) -> Point {
    let d = towards - center;
    let half_w = rect.width / 2.0;
    let half_h = rect.height / 2.0;
    let tx = if d.x.abs() > 1e-12 { half_w / d.x.abs() } else { f64::INFINITY };
    let ty = if d.y.abs() > 1e-12 { half_h / d.y.abs() } else { f64::INFINITY };
    let t = tx.min(ty);
    if !t.is_finite() {
        return center;
    }
    center + d * t
}

fn side_midpoint(rect: &Rect, side: RectEdge) -> Point {
    let c = rect.center();
    match side {
        RectEdge::Top => Point::new(c.x, rect.top()),
        RectEdge::Left => Point::new(rect.left(), c.y),
        RectEdge::Right => Point::new(rect.right(), c.y),
        RectEdge::Bottom => Point::new(c.x, rect.bottom()),
    }
}

/// Rotate the facing side of the triangle to vertical, intersect with its
/// inscribed-height rectangle, rotate back.
fn triangle_edge_endpoint(center: Point, half_width: f64, towards: Point) -> Point {
    let angle = angle_between_points(center, towards).to_degrees();
    let rotation_degrees: f64 = if (-30.0..90.0).contains(&angle) {
        30.0
    } else if (-150.0..-30.0).contains(&angle) {
        270.0
    } else {
        150.0
    };
    let rotation = rotation_degrees.to_radians();

    let rotated = towards.rotated_around(center, rotation);
    let rect = Rect::centered(center, 2.0 * half_width * TAN_30, 2.0 * half_width);
    ray_exit(&rect, center, rotated).rotated_around(center, -rotation)
}

/// Record of one drawn vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexDrawingHistory {
    pub vertex_id: VertexId,
    /// Location after any bounds correction.
    pub location: Point,
    pub shape: VertexShape,
    pub geometry: ShapeGeometry,
    pub color: Color,
    pub selected: bool,
    pub visual: DisplayList,
}

impl VertexDrawingHistory {
    pub fn edge_endpoint(&self, towards: Point) -> Point {
        self.geometry.edge_endpoint(self.location, towards)
    }

    pub fn self_loop_endpoint(&self, side: RectEdge) -> Point {
        self.geometry.self_loop_endpoint(self.location, side)
    }

    pub fn label_location(&self, position: VertexLabelPosition) -> Point {
        self.geometry.label_location(self.location, position)
    }

    pub fn bounds(&self) -> Rect {
        self.geometry.bounds(self.location)
    }

    pub fn bounds_path(&self) -> PathGeometry {
        self.geometry.outline(self.location)
    }

    pub fn contains_point(&self, point: Point) -> bool {
        self.geometry.contains_point(self.location, point)
    }
}

/// Curve an edge was drawn as, after endpoint adjustment and shortening.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeGeometry {
    Straight { start: Point, end: Point },
    Bezier(QuadraticBezier),
    /// Flattened curve through intermediate points.
    Curve(PathGeometry),
    SelfLoop { center: Point, radius: f64 },
}

/// Record of one drawn edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDrawingHistory {
    pub edge_id: EdgeId,
    pub vertex1_location: Point,
    pub vertex2_location: Point,
    pub geometry: EdgeGeometry,
    pub arrow: Option<Vec<Point>>,
    pub color: Color,
    pub width: f64,
    pub selected: bool,
    pub visual: DisplayList,
}

impl EdgeDrawingHistory {
    /// Width-inflated rectangle running from one vertex location to the
    /// other. Not available for self-loops.
    pub fn bounds(&self) -> Option<Vec<Point>> {
        if matches!(self.geometry, EdgeGeometry::SelfLoop { .. }) {
            return None;
        }
        let (a, b) = (self.vertex1_location, self.vertex2_location);
        let direction = (b - a).normalized();
        let normal = Point::new(-direction.y, direction.x) * (self.width / 2.0);
        Some(vec![a + normal, b + normal, b - normal, a - normal])
    }

    pub fn contains_point(&self, point: Point) -> bool {
        let half = self.width / 2.0;
        let on_arrow = self
            .arrow
            .as_ref()
            .map_or(false, |arrow| geometry::polygon_contains(arrow, point));
        on_arrow
            || match &self.geometry {
                EdgeGeometry::SelfLoop { center, radius } => {
                    (center.distance_to(point) - radius).abs() <= half
                }
                EdgeGeometry::Straight { start, end } => {
                    geometry::segment_distance(point, *start, *end) <= half
                }
                EdgeGeometry::Bezier(curve) => curve.to_path().distance_to_outline(point) <= half,
                EdgeGeometry::Curve(path) => path.distance_to_outline(point) <= half,
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!(a.distance_to(b) < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_circle_endpoint_on_boundary() {
        let shape = ShapeGeometry::Circle { radius: 5.0 };
        let center = Point::new(10.0, 10.0);
        let p = shape.edge_endpoint(center, Point::new(10.0, 50.0));
        assert_close(p, Point::new(10.0, 15.0));
    }

    #[test]
    fn test_square_endpoint_exits_side() {
        let shape = ShapeGeometry::Square { half_width: 4.0 };
        let center = Point::new(0.0, 0.0);
        assert_close(shape.edge_endpoint(center, Point::new(100.0, 10.0)), Point::new(4.0, 0.4));
        assert_close(shape.edge_endpoint(center, Point::new(0.0, -9.0)), Point::new(0.0, -4.0));
    }

    #[test]
    fn test_diamond_endpoint_on_axis_hits_vertex() {
        let shape = ShapeGeometry::Diamond { half_width: 6.0 };
        let center = Point::new(0.0, 0.0);
        assert_close(shape.edge_endpoint(center, Point::new(20.0, 0.0)), Point::new(6.0, 0.0));
        assert_close(shape.edge_endpoint(center, Point::new(0.0, -20.0)), Point::new(0.0, -6.0));
    }

    #[test]
    fn test_triangle_endpoints_lie_on_outline() {
        let center = Point::new(50.0, 50.0);
        let shape = ShapeGeometry::Triangle { half_width: 10.0 };
        let outline = shape.outline(center);
        for towards in [
            Point::new(100.0, 50.0),
            Point::new(0.0, 50.0),
            Point::new(50.0, 100.0),
            Point::new(50.0, 0.0),
            Point::new(90.0, 10.0),
        ] {
            let p = shape.edge_endpoint(center, towards);
            assert!(outline.distance_to_outline(p) < 1e-6, "{p:?}");
        }
        // Straight down hits the base midpoint.
        assert_close(
            shape.edge_endpoint(center, Point::new(50.0, 100.0)),
            Point::new(50.0, 50.0 + 10.0 * TAN_30),
        );
    }

    #[test]
    fn test_tapered_shapes_use_center() {
        let center = Point::new(3.0, 4.0);
        let shape = ShapeGeometry::RoundedX {
            half_width: 5.0,
            path: geometry::rounded_x(center, 5.0),
        };
        assert_eq!(shape.edge_endpoint(center, Point::new(100.0, 4.0)), center);
    }

    #[test]
    fn test_self_loop_endpoints() {
        let center = Point::new(0.0, 0.0);
        let circle = ShapeGeometry::Circle { radius: 3.0 };
        assert_close(circle.self_loop_endpoint(center, RectEdge::Bottom), Point::new(0.0, 3.0));
        let triangle = ShapeGeometry::Triangle { half_width: 6.0 };
        assert_close(
            triangle.self_loop_endpoint(center, RectEdge::Top),
            Point::new(0.0, -6.0 / COS_30),
        );
        let label = ShapeGeometry::Label {
            bounds: Rect::new(-10.0, -5.0, 20.0, 10.0),
        };
        assert_close(label.self_loop_endpoint(center, RectEdge::Right), Point::new(10.0, 0.0));
    }

    #[test]
    fn test_label_locations() {
        let center = Point::new(0.0, 0.0);
        let square = ShapeGeometry::Square { half_width: 2.0 };
        assert_close(
            square.label_location(center, VertexLabelPosition::TopRight),
            Point::new(2.0, -2.0),
        );
        let circle = ShapeGeometry::Circle { radius: 2.0 };
        assert_close(
            circle.label_location(center, VertexLabelPosition::BottomCenter),
            Point::new(0.0, 2.0),
        );
        assert_eq!(circle.label_location(center, VertexLabelPosition::Nowhere), center);
    }

    #[test]
    fn test_vertex_contains_point() {
        let history = VertexDrawingHistory {
            vertex_id: 1,
            location: Point::new(10.0, 10.0),
            shape: VertexShape::Diamond,
            geometry: ShapeGeometry::Diamond { half_width: 5.0 },
            color: Color::BLACK,
            selected: false,
            visual: DisplayList::new(),
        };
        assert!(history.contains_point(Point::new(10.0, 10.0)));
        assert!(history.contains_point(Point::new(12.0, 11.0)));
        assert!(!history.contains_point(Point::new(14.5, 14.5)));
        assert_eq!(history.bounds(), Rect::new(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn test_edge_bounds_and_hit() {
        let history = EdgeDrawingHistory {
            edge_id: 1,
            vertex1_location: Point::new(0.0, 0.0),
            vertex2_location: Point::new(10.0, 0.0),
            geometry: EdgeGeometry::Straight {
                start: Point::new(0.0, 0.0),
                end: Point::new(10.0, 0.0),
            },
            arrow: None,
            color: Color::BLACK,
            width: 2.0,
            selected: false,
            visual: DisplayList::new(),
        };
        let bounds = history.bounds().unwrap();
        assert_close(bounds[0], Point::new(0.0, 1.0));
        assert_close(bounds[2], Point::new(10.0, -1.0));
        assert!(history.contains_point(Point::new(5.0, 0.8)));
        assert!(!history.contains_point(Point::new(5.0, 1.5)));

        let self_loop = EdgeDrawingHistory {
            geometry: EdgeGeometry::SelfLoop {
                center: Point::new(0.0, 0.0),
                radius: 10.0,
            },
            ..history
        };
        assert!(self_loop.bounds().is_none());
        assert!(self_loop.contains_point(Point::new(10.5, 0.0)));
        assert!(!self_loop.contains_point(Point::new(0.0, 0.0)));
    }
}
