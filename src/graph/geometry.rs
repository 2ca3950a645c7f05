//! Path geometry: vertex outlines, curves and their sampling.

use crate::core::config;
use crate::core::types::{Point, Rect, COS_30, TAN_30};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line(Point),
    Quadratic { control: Point, end: Point },
    Cubic { control1: Point, control2: Point, end: Point },
}

impl PathSegment {
    fn end(&self) -> Point {
        match *self {
            PathSegment::Line(end) => end,
            PathSegment::Quadratic { end, .. } => end,
            PathSegment::Cubic { end, .. } => end,
        }
    }

    fn translated(&self, delta: Point) -> Self {
        match *self {
            PathSegment::Line(end) => PathSegment::Line(end + delta),
            PathSegment::Quadratic { control, end } => PathSegment::Quadratic {
                control: control + delta,
                end: end + delta,
            },
            PathSegment::Cubic {
                control1,
                control2,
                end,
            } => PathSegment::Cubic {
                control1: control1 + delta,
                control2: control2 + delta,
                end: end + delta,
            },
        }
    }
}

/// A single figure made of line and Bezier segments.
#[derive(Debug, Clone, PartialEq)]
pub struct PathGeometry {
    pub start: Point,
    pub segments: Vec<PathSegment>,
    pub closed: bool,
}

impl PathGeometry {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            segments: Vec::new(),
            closed: false,
        }
    }

    /// Closed polygon through `points`. An empty slice yields an empty path at
    /// the origin.
    pub fn polygon(points: &[Point]) -> Self {
        let mut path = Self::new(points.first().copied().unwrap_or_default());
        for p in points.iter().skip(1) {
            path.segments.push(PathSegment::Line(*p));
        }
        path.closed = true;
        path
    }

    /// Open polyline through `points`.
    pub fn polyline(points: &[Point]) -> Self {
        let mut path = Self::polygon(points);
        path.closed = false;
        path
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.segments.push(PathSegment::Line(p));
        self
    }

    pub fn quadratic_to(&mut self, control: Point, end: Point) -> &mut Self {
        self.segments.push(PathSegment::Quadratic { control, end });
        self
    }

    pub fn cubic_to(&mut self, control1: Point, control2: Point, end: Point) -> &mut Self {
        self.segments.push(PathSegment::Cubic {
            control1,
            control2,
            end,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.closed = true;
        self
    }

    pub fn translated(&self, delta: Point) -> Self {
        Self {
            start: self.start + delta,
            segments: self.segments.iter().map(|s| s.translated(delta)).collect(),
            closed: self.closed,
        }
    }

    /// Approximate the path by a polyline. Curves are sampled at a fixed step
    /// count.
    pub fn flatten(&self) -> Vec<Point> {
        let steps = config::BEZIER_FLATTEN_STEPS;
        let mut points = vec![self.start];
        let mut current = self.start;
        for segment in &self.segments {
            match *segment {
                PathSegment::Line(end) => points.push(end),
                PathSegment::Quadratic { control, end } => {
                    let curve = QuadraticBezier::new(current, control, end);
                    for i in 1..=steps {
                        points.push(curve.point_at(i as f64 / steps as f64));
                    }
                }
                PathSegment::Cubic {
                    control1,
                    control2,
                    end,
                } => {
                    for i in 1..=steps {
                        let t = i as f64 / steps as f64;
                        points.push(cubic_point(current, control1, control2, end, t));
                    }
                }
            }
            current = segment.end();
        }
        points
    }

    pub fn bounds(&self) -> Rect {
        Rect::bounding(&self.flatten())
    }

    /// Even-odd containment test. Open paths contain nothing.
    pub fn contains(&self, point: Point) -> bool {
        self.closed && polygon_contains(&self.flatten(), point)
    }

    /// Shortest distance from `point` to the outline.
    pub fn distance_to_outline(&self, point: Point) -> f64 {
        let mut points = self.flatten();
        if self.closed {
            points.push(self.start);
        }
        polyline_distance(&points, point)
    }
}

/// Point on a cubic Bezier curve at parameter t.
pub fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let tt = t * t;
    let uu = u * u;
    let uuu = uu * u;
    let ttt = tt * t;

    Point {
        x: uuu * p0.x + 3.0 * uu * t * p1.x + 3.0 * u * tt * p2.x + ttt * p3.x,
        y: uuu * p0.y + 3.0 * uu * t * p1.y + 3.0 * u * tt * p2.y + ttt * p3.y,
    }
}

/// Even-odd ray casting against a closed polygon.
pub fn polygon_contains(points: &[Point], point: Point) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (pi, pj) = (points[i], points[j]);
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

pub fn segment_distance(point: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq < 1e-12 {
        return point.distance_to(a);
    }
    let t = (((point.x - a.x) * ab.x + (point.y - a.y) * ab.y) / len_sq).clamp(0.0, 1.0);
    point.distance_to(a + ab * t)
}

pub fn polyline_distance(points: &[Point], point: Point) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => point.distance_to(*only),
        _ => points
            .windows(2)
            .map(|w| segment_distance(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

// --- Vertex outlines ---

pub fn diamond(center: Point, half_width: f64) -> PathGeometry {
    PathGeometry::polygon(&[
        Point::new(center.x - half_width, center.y),
        Point::new(center.x, center.y - half_width),
        Point::new(center.x + half_width, center.y),
        Point::new(center.x, center.y + half_width),
    ])
}

/// Equilateral triangle, apex up, with `half_width` as the inscribed radius
/// scale used by the triangle bounds.
pub fn triangle(center: Point, half_width: f64) -> PathGeometry {
    let base_y = center.y + half_width * TAN_30;
    PathGeometry::polygon(&[
        Point::new(center.x, center.y - half_width / COS_30),
        Point::new(center.x + half_width, base_y),
        Point::new(center.x - half_width, base_y),
    ])
}

/// Diamond with concave sides.
pub fn tapered_diamond(center: Point, half_width: f64) -> PathGeometry {
    let h = half_width;
    let left = Point::new(center.x - h, center.y);
    let top = Point::new(center.x, center.y - h);
    let right = Point::new(center.x + h, center.y);
    let bottom = Point::new(center.x, center.y + h);
    let s = 0.65 * h;
    let l = 0.65 * h;

    let mut path = PathGeometry::new(left);
    path.cubic_to(
        Point::new(left.x + s, top.y + l),
        Point::new(left.x + l, top.y + s),
        top,
    )
    .cubic_to(
        Point::new(right.x - l, top.y + s),
        Point::new(right.x - s, top.y + l),
        right,
    )
    .cubic_to(
        Point::new(right.x - s, bottom.y - l),
        Point::new(right.x - l, bottom.y - s),
        bottom,
    )
    .cubic_to(
        Point::new(left.x + l, bottom.y - s),
        Point::new(left.x + s, bottom.y - l),
        left,
    )
    .close();
    path
}

/// An X with rounded arms.
pub fn rounded_x(center: Point, half_width: f64) -> PathGeometry {
    let h = half_width;
    let s = 0.25 * h;
    let l = 0.45 * h;
    let middle = 0.75 * h;

    let top_left = Point::new(center.x - h, center.y - h);
    let top_middle = Point::new(center.x, center.y - middle);
    let top_right = Point::new(center.x + h, center.y - h);
    let right_middle = Point::new(center.x + middle, center.y);
    let bottom_right = Point::new(center.x + h, center.y + h);
    let bottom_middle = Point::new(center.x, center.y + middle);
    let bottom_left = Point::new(center.x - h, center.y + h);
    let left_middle = Point::new(center.x - middle, center.y);

    let mut path = PathGeometry::new(top_left);
    path.cubic_to(
        Point::new(top_left.x + s, top_middle.y - l),
        Point::new(top_left.x + l, top_middle.y - s),
        top_middle,
    )
    .cubic_to(
        Point::new(top_right.x - l, top_middle.y - s),
        Point::new(top_right.x - s, top_middle.y - l),
        top_right,
    )
    .cubic_to(
        Point::new(right_middle.x + l, top_right.y + s),
        Point::new(right_middle.x + s, top_right.y + l),
        right_middle,
    )
    .cubic_to(
        Point::new(right_middle.x + s, bottom_right.y - l),
        Point::new(right_middle.x + l, bottom_right.y - s),
        bottom_right,
    )
    .cubic_to(
        Point::new(bottom_right.x - s, bottom_middle.y + l),
        Point::new(bottom_right.x - l, bottom_middle.y + s),
        bottom_middle,
    )
    .cubic_to(
        Point::new(bottom_left.x + l, bottom_middle.y + s),
        Point::new(bottom_left.x + s, bottom_middle.y + l),
        bottom_left,
    )
    .cubic_to(
        Point::new(left_middle.x - l, bottom_left.y - s),
        Point::new(left_middle.x - s, bottom_left.y - l),
        left_middle,
    )
    .cubic_to(
        Point::new(left_middle.x - s, top_left.y + l),
        Point::new(left_middle.x - l, top_left.y + s),
        top_left,
    )
    .close();
    path
}

// --- Quadratic Bezier ---

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl QuadraticBezier {
    pub fn new(start: Point, control: Point, end: Point) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.control, self.start)
    }

    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        Point::new(
            u * u * self.start.x + 2.0 * u * t * self.control.x + t * t * self.end.x,
            u * u * self.start.y + 2.0 * u * t * self.control.y + t * t * self.end.y,
        )
    }

    /// Unit tangent at parameter t.
    pub fn tangent_at(&self, t: f64) -> Point {
        let d = (self.control - self.start) * (2.0 * (1.0 - t)) + (self.end - self.control) * (2.0 * t);
        let unit = d.normalized();
        if unit == Point::default() {
            (self.end - self.start).normalized()
        } else {
            unit
        }
    }

    fn arc_length_table(&self) -> Vec<f64> {
        let samples = config::ARC_LENGTH_SAMPLES;
        let mut table = Vec::with_capacity(samples + 1);
        table.push(0.0);
        let mut previous = self.start;
        let mut total = 0.0;
        for i in 1..=samples {
            let p = self.point_at(i as f64 / samples as f64);
            total += previous.distance_to(p);
            table.push(total);
            previous = p;
        }
        table
    }

    pub fn length(&self) -> f64 {
        self.arc_length_table().last().copied().unwrap_or(0.0)
    }

    /// Point and unit tangent at `fraction` (0..1) of the arc length.
    pub fn point_at_fraction_length(&self, fraction: f64) -> (Point, Point) {
        let t = self.parameter_at_fraction_length(fraction);
        (self.point_at(t), self.tangent_at(t))
    }

    fn parameter_at_fraction_length(&self, fraction: f64) -> f64 {
        let table = self.arc_length_table();
        let total = table.last().copied().unwrap_or(0.0);
        if total <= 0.0 {
            return fraction.clamp(0.0, 1.0);
        }
        let target = fraction.clamp(0.0, 1.0) * total;
        let samples = table.len() - 1;
        let index = table.partition_point(|&len| len < target);
        if index == 0 {
            return 0.0;
        }
        if index > samples {
            return 1.0;
        }
        let (lo, hi) = (table[index - 1], table[index]);
        let local = if hi > lo { (target - lo) / (hi - lo) } else { 0.0 };
        ((index - 1) as f64 + local) / samples as f64
    }

    pub fn to_path(&self) -> PathGeometry {
        let mut path = PathGeometry::new(self.start);
        path.quadratic_to(self.control, self.end);
        path
    }
}

/// Control point that bows a quadratic edge away from the graph center.
///
/// The displacement is `factor` times the full endpoint distance, applied
/// perpendicular to the chord at its midpoint. The bow direction depends on
/// the chord's slope and on which half of `graph_rect` the midpoint lies in.
/// The result is clamped into `usable_rect`.
pub fn bezier_control_point(
    endpoint1: Point,
    endpoint2: Point,
    factor: f64,
    graph_rect: &Rect,
    usable_rect: &Rect,
) -> Point {
    let a = endpoint1;
    let b = Point::new(
        (endpoint1.x + endpoint2.x) / 2.0,
        (endpoint1.y + endpoint2.y) / 2.0,
    );
    let side_c = a.distance_to(b);
    if side_c <= 0.0 {
        return usable_rect.clamp_point(b);
    }
    let mut side_a = factor * endpoint1.distance_to(endpoint2);

    let dx = endpoint2.x - endpoint1.x;
    let dy = endpoint2.y - endpoint1.y;
    let abs_atan2 = dy.abs().atan2(dx.abs()).abs();

    let quarter = std::f64::consts::FRAC_PI_4;
    if (quarter..=3.0 * quarter).contains(&abs_atan2) {
        if endpoint2.y > a.y {
            side_a = -side_a;
        }
        if b.x - graph_rect.left() < graph_rect.right() - b.x {
            side_a = -side_a;
        }
    } else {
        if endpoint2.x < a.x {
            side_a = -side_a;
        }
        if b.y - graph_rect.top() < graph_rect.bottom() - b.y {
            side_a = -side_a;
        }
    }

    let c = Point::new(
        b.x + side_a * (a.y - b.y) / side_c,
        b.y + side_a * (b.x - a.x) / side_c,
    );
    usable_rect.clamp_point(c)
}

// --- Curve through points ---

/// Smooth open curve through `points` (cardinal spline) flattened into a
/// polyline. Sample density follows `tolerance`, floored at
/// [`config::CURVE_THROUGH_POINTS_TOLERANCE_MIN`].
pub fn curve_through_points(points: &[Point], tension: f64, tolerance: f64) -> PathGeometry {
    let mut out = Vec::new();
    if let Some(first) = points.first() {
        out.push(*first);
    }
    let n = points.len();
    if n < 2 {
        return PathGeometry::polyline(&out);
    }
    if n == 2 {
        add_spline_segment(&mut out, points[0], points[0], points[1], points[1], tension, tolerance);
        return PathGeometry::polyline(&out);
    }

    for i in 0..n {
        if i == 0 {
            add_spline_segment(&mut out, points[0], points[0], points[1], points[2], tension, tolerance);
        } else if i == n - 2 {
            add_spline_segment(
                &mut out,
                points[i - 1],
                points[i],
                points[i + 1],
                points[i + 1],
                tension,
                tolerance,
            );
        } else if i != n - 1 {
            add_spline_segment(
                &mut out,
                points[i - 1],
                points[i],
                points[i + 1],
                points[i + 2],
                tension,
                tolerance,
            );
        }
    }
    PathGeometry::polyline(&out)
}

/// Append the samples of the spline segment between `p1` and `p2`.
fn add_spline_segment(
    out: &mut Vec<Point>,
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    tension: f64,
    tolerance: f64,
) {
    let tolerance = tolerance.max(config::CURVE_THROUGH_POINTS_TOLERANCE_MIN);
    let count = ((((p1.x - p2.x).abs() + (p1.y - p2.y).abs()) / tolerance) as usize)
        .min(config::CURVE_SEGMENT_MAX_SAMPLES);
    if count <= 2 {
        out.push(p2);
        return;
    }

    let sx1 = tension * (p2.x - p0.x);
    let sy1 = tension * (p2.y - p0.y);
    let sx2 = tension * (p3.x - p1.x);
    let sy2 = tension * (p3.y - p1.y);

    let ax = sx1 + sx2 + 2.0 * p1.x - 2.0 * p2.x;
    let ay = sy1 + sy2 + 2.0 * p1.y - 2.0 * p2.y;
    let bx = -2.0 * sx1 - sx2 - 3.0 * p1.x + 3.0 * p2.x;
    let by = -2.0 * sy1 - sy2 - 3.0 * p1.y + 3.0 * p2.y;

    for i in 1..count {
        let t = i as f64 / (count - 1) as f64;
        let tt = t * t;
        let ttt = tt * t;
        out.push(Point::new(
            ax * ttt + bx * tt + sx1 * t + p1.x,
            ay * ttt + by * tt + sy1 * t + p1.y,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_contains() {
        let square = PathGeometry::polygon(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        assert!(square.contains(Point::new(5.0, 5.0)));
        assert!(!square.contains(Point::new(15.0, 5.0)));
        assert!(!PathGeometry::polyline(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)])
            .contains(Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_diamond_bounds() {
        let b = diamond(Point::new(50.0, 50.0), 10.0).bounds();
        assert_eq!(b, Rect::new(40.0, 40.0, 20.0, 20.0));
    }

    #[test]
    fn test_triangle_matches_triangle_bounds() {
        let center = Point::new(20.0, 20.0);
        let path_bounds = triangle(center, 6.0).bounds();
        let expected = Rect::triangle_bounds_from_center_and_half_width(center, 6.0);
        assert!((path_bounds.top() - expected.top()).abs() < 1e-9);
        assert!((path_bounds.bottom() - expected.bottom()).abs() < 1e-9);
        assert!((path_bounds.width - expected.width).abs() < 1e-9);
    }

    #[test]
    fn test_tapered_diamond_and_rounded_x_stay_within_half_width() {
        let center = Point::new(0.0, 0.0);
        for path in [tapered_diamond(center, 10.0), rounded_x(center, 10.0)] {
            let b = path.bounds();
            assert!(b.left() >= -10.0 - 1e-9 && b.right() <= 10.0 + 1e-9);
            assert!(b.top() >= -10.0 - 1e-9 && b.bottom() <= 10.0 + 1e-9);
            assert!(path.contains(center));
        }
    }

    #[test]
    fn test_translated_path() {
        let moved = diamond(Point::new(0.0, 0.0), 1.0).translated(Point::new(5.0, 5.0));
        assert_eq!(moved.bounds(), Rect::new(4.0, 4.0, 2.0, 2.0));
    }

    #[test]
    fn test_quadratic_fraction_length_endpoints() {
        let curve = QuadraticBezier::new(
            Point::new(0.0, 0.0),
            Point::new(50.0, 50.0),
            Point::new(100.0, 0.0),
        );
        let (p0, _) = curve.point_at_fraction_length(0.0);
        let (p1, _) = curve.point_at_fraction_length(1.0);
        assert!(p0.distance_to(curve.start) < 1e-9);
        assert!(p1.distance_to(curve.end) < 1e-9);
        let (mid, tangent) = curve.point_at_fraction_length(0.5);
        assert!((mid.x - 50.0).abs() < 1e-6);
        assert!(tangent.y.abs() < 1e-6 && tangent.x > 0.0);
    }

    #[test]
    fn test_straight_quadratic_length() {
        let curve = QuadraticBezier::new(
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!((curve.length() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_control_point_is_perpendicular_and_clamped() {
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
        let usable = Rect::new(5.0, 5.0, 90.0, 90.0);
        let c = bezier_control_point(
            Point::new(20.0, 30.0),
            Point::new(80.0, 30.0),
            0.2,
            &viewport,
            &usable,
        );
        // Horizontal chord in the upper half: bows away by 0.2 * 60.
        assert!((c.x - 50.0).abs() < 1e-9);
        assert!((c.y - 18.0).abs() < 1e-9);
        assert!(usable.contains(c));

        let clamped = bezier_control_point(
            Point::new(20.0, 6.0),
            Point::new(80.0, 6.0),
            1.0,
            &viewport,
            &usable,
        );
        assert!(usable.contains(clamped));
    }

    #[test]
    fn test_curve_through_points_hits_every_point() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 40.0),
            Point::new(100.0, 0.0),
        ];
        let curve = curve_through_points(&points, 0.5, 8.0).flatten();
        for p in points {
            assert!(polyline_distance(&curve, p) < 1e-6);
        }
        assert_eq!(curve.first().copied(), Some(points[0]));
        let last = curve.last().copied().unwrap_or_default();
        assert!(last.distance_to(points[2]) < 1e-6);
    }

    #[test]
    fn test_short_spline_segment_is_a_line() {
        let curve = curve_through_points(&[Point::new(0.0, 0.0), Point::new(4.0, 4.0)], 0.5, 8.0);
        assert_eq!(curve.flatten(), vec![Point::new(0.0, 0.0), Point::new(4.0, 4.0)]);
    }

    #[test]
    fn test_degenerate_tolerance_is_bounded() {
        let points = [Point::new(0.0, 0.0), Point::new(40.0, 30.0)];
        for tolerance in [0.0, 1e-300, f64::NAN] {
            let curve = curve_through_points(&points, 0.5, tolerance).flatten();
            // 70 / 0.5 samples, the first being the start point.
            assert_eq!(curve.len(), 140);
            assert!(curve.last().unwrap().distance_to(points[1]) < 1e-6);
        }

        let far = [Point::new(0.0, 0.0), Point::new(4000.0, 3000.0)];
        let curve = curve_through_points(&far, 0.5, 0.5).flatten();
        assert_eq!(curve.len(), config::CURVE_SEGMENT_MAX_SAMPLES);
    }
}
