//! Common geometry and color types shared by every builder.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;

use super::error::DrawError;

/// 2D point (also used as a free vector)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len < 1e-10 {
            Self::default()
        } else {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (other - *self).length()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Rotate around `center`. Positive angles turn clockwise on a y-down
    /// surface.
    pub fn rotated_around(&self, center: Point, angle_radians: f64) -> Self {
        let (sin, cos) = angle_radians.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Self {
            x: center.x + dx * cos - dy * sin,
            y: center.y + dx * sin + dy * cos,
        }
    }
}

/// Angle of the line from `p1` to `p2`, measured counter-clockwise from the
/// positive x axis as seen on screen (y grows downward).
pub fn angle_between_points(p1: Point, p2: Point) -> f64 {
    (p1.y - p2.y).atan2(p2.x - p1.x)
}

impl std::ops::Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
        }
    }
}

impl std::ops::AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// One of the four sides of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RectEdge {
    Top,
    Left,
    Right,
    Bottom,
}

/// Axis-aligned rectangle, origin at the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_points(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    /// Rectangle of the given size centered on `center`.
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    pub fn square_from_center_and_half_width(center: Point, half_width: f64) -> Self {
        Self::centered(center, 2.0 * half_width, 2.0 * half_width)
    }

    /// Bounds of an equilateral, apex-up triangle whose centroid is `center`
    /// and whose base is `2 * half_width` wide.
    pub fn triangle_bounds_from_center_and_half_width(center: Point, half_width: f64) -> Self {
        let apex_y = center.y - half_width / COS_30;
        let base_y = center.y + half_width * TAN_30;
        Self::new(
            center.x - half_width,
            apex_y,
            2.0 * half_width,
            base_y - apex_y,
        )
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left(), self.top())
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.right(), self.top())
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.left(), self.bottom())
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Containment with a small tolerance for accumulated float error.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-6;
        other.left() >= self.left() - EPS
            && other.right() <= self.right() + EPS
            && other.top() >= self.top() - EPS
            && other.bottom() <= self.bottom() + EPS
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grow (or shrink, with negative amounts) on every side.
    pub fn inflate(&self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.x - dx,
            self.y - dy,
            self.width + 2.0 * dx,
            self.height + 2.0 * dy,
        )
    }

    /// The rectangle shrunk by `margin` on all sides, or `None` when nothing
    /// is left.
    pub fn minus_margin(&self, margin: f64) -> Option<Rect> {
        let shrunk = self.inflate(-margin, -margin);
        if shrunk.is_empty() {
            None
        } else {
            Some(shrunk)
        }
    }

    pub fn union(&self, other: &Rect) -> Self {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }

    /// Smallest rectangle containing every point. Empty input yields the
    /// default rectangle.
    pub fn bounding(points: &[Point]) -> Self {
        let mut iter = points.iter();
        let first = match iter.next() {
            Some(p) => *p,
            None => return Self::default(),
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Clamp a point into the rectangle.
    pub fn clamp_point(&self, point: Point) -> Point {
        Point::new(
            point.x.max(self.left()).min(self.right()),
            point.y.max(self.top()).min(self.bottom()),
        )
    }

    /// Translate (never resize) so the rectangle fits inside `bounds`.
    ///
    /// Each axis moves independently and only as far as needed. A rectangle
    /// larger than `bounds` on an axis is aligned with the left/top side.
    pub fn move_within(&self, bounds: &Rect) -> Rect {
        let mut dx = bounds.left() - self.left();
        if !(self.width > bounds.width || dx > 0.0) {
            dx = (bounds.right() - self.right()).min(0.0);
        }

        let mut dy = bounds.top() - self.top();
        if !(self.height > bounds.height || dy > 0.0) {
            dy = (bounds.bottom() - self.bottom()).min(0.0);
        }

        self.offset(dx, dy)
    }

    /// The side of the rectangle farthest from `point`. Points outside the
    /// rectangle (and empty rectangles) report `Left`.
    pub fn farthest_edge(&self, point: Point) -> RectEdge {
        if self.is_empty() || !self.contains(point) {
            return RectEdge::Left;
        }

        let candidates = [
            (RectEdge::Right, self.right() - point.x),
            (RectEdge::Top, point.y - self.top()),
            (RectEdge::Bottom, self.bottom() - point.y),
        ];

        let mut farthest = RectEdge::Left;
        let mut greatest = point.x - self.left();
        for (edge, distance) in candidates {
            if distance > greatest {
                farthest = edge;
                greatest = distance;
            }
        }
        farthest
    }
}

pub const COS_30: f64 = 0.866_025_403_784_438_6;
pub const TAN_30: f64 = 0.577_350_269_189_625_8;

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `0xRRGGBB` plus an explicit alpha.
    pub const fn from_hex(hex: u32, alpha: u8) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
            a: alpha,
        }
    }

    /// Packed `0xAARRGGBB`.
    pub const fn from_argb(argb: u32) -> Self {
        Self::from_hex(argb & 0x00FF_FFFF, ((argb >> 24) & 0xFF) as u8)
    }

    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self { a: alpha, ..self }
    }

    /// Channels as `0.0..=1.0` floats, in r, g, b, a order.
    pub fn to_unit_rgba(self) -> (f64, f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64 / 255.0,
        )
    }

    pub fn brightness(self) -> f64 {
        0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64
    }

    /// Black or white, whichever contrasts most with `self`. Alpha is kept.
    pub fn contrasting(self) -> Self {
        let component = if self.brightness() < 127.0 { 0xFF } else { 0x00 };
        Self::rgba(component, component, component, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Parses the textual color forms accepted in settings and attribute data:
/// `#RRGGBB`, `#AARRGGBB`, `r,g,b` and `r,g,b,a`.
pub struct ColorParser {
    hex_re: Regex,
    components_re: Regex,
}

impl ColorParser {
    pub fn new() -> Self {
        Self {
            hex_re: Regex::new(r"^#([0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$")
                .expect("hex color pattern must compile"),
            components_re: Regex::new(
                r"^(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})(?:\s*,\s*(\d{1,3}))?$",
            )
            .expect("component color pattern must compile"),
        }
    }

    pub fn parse(&self, text: &str) -> Option<Color> {
        let text = text.trim();
        self.try_hex(text).or_else(|| self.try_components(text))
    }

    fn try_hex(&self, text: &str) -> Option<Color> {
        let caps = self.hex_re.captures(text)?;
        let digits = &caps[1];
        let value = u32::from_str_radix(digits, 16).ok()?;
        if digits.len() == 6 {
            Some(Color::from_hex(value, 255))
        } else {
            Some(Color::from_argb(value))
        }
    }

    fn try_components(&self, text: &str) -> Option<Color> {
        let caps = self.components_re.captures(text)?;
        let r: u8 = caps[1].parse().ok()?;
        let g: u8 = caps[2].parse().ok()?;
        let b: u8 = caps[3].parse().ok()?;
        let a: u8 = match caps.get(4) {
            Some(m) => m.as_str().parse().ok()?,
            None => 255,
        };
        Some(Color::rgba(r, g, b, a))
    }
}

impl Default for ColorParser {
    fn default() -> Self {
        Self::new()
    }
}

fn color_parser() -> &'static ColorParser {
    static PARSER: OnceLock<ColorParser> = OnceLock::new();
    PARSER.get_or_init(ColorParser::new)
}

impl FromStr for Color {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        color_parser()
            .parse(s)
            .ok_or_else(|| DrawError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = DrawError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        if color.a == 255 {
            format!("#{:02X}{:02X}{:02X}", color.r, color.g, color.b)
        } else {
            format!("#{:08X}", color.to_argb())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minus_margin() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(rect.minus_margin(5.0), Some(Rect::new(5.0, 5.0, 90.0, 90.0)));
        assert_eq!(rect.minus_margin(50.0), None);
        assert_eq!(Rect::new(0.0, 0.0, 8.0, 100.0).minus_margin(5.0), None);
    }

    #[test]
    fn test_move_within_is_minimal_per_axis() {
        let bounds = Rect::new(5.0, 5.0, 90.0, 90.0);

        let far = Rect::new(990.0, 990.0, 20.0, 20.0).move_within(&bounds);
        assert_eq!(far, Rect::new(75.0, 75.0, 20.0, 20.0));

        let left_only = Rect::new(-10.0, 40.0, 10.0, 10.0).move_within(&bounds);
        assert_eq!(left_only, Rect::new(5.0, 40.0, 10.0, 10.0));

        let inside = Rect::new(20.0, 30.0, 10.0, 10.0);
        assert_eq!(inside.move_within(&bounds), inside);
    }

    #[test]
    fn test_move_within_oversized_aligns_left_top() {
        let bounds = Rect::new(5.0, 5.0, 90.0, 90.0);
        let big = Rect::new(50.0, 50.0, 200.0, 10.0).move_within(&bounds);
        assert_eq!(big.x, 5.0);
        assert_eq!(big.width, 200.0);
    }

    #[test]
    fn test_farthest_edge() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(rect.farthest_edge(Point::new(50.0, 5.0)), RectEdge::Bottom);
        assert_eq!(rect.farthest_edge(Point::new(50.0, 95.0)), RectEdge::Top);
        assert_eq!(rect.farthest_edge(Point::new(90.0, 50.0)), RectEdge::Left);
        assert_eq!(rect.farthest_edge(Point::new(10.0, 50.0)), RectEdge::Right);
        assert_eq!(rect.farthest_edge(Point::new(500.0, 50.0)), RectEdge::Left);
    }

    #[test]
    fn test_triangle_bounds() {
        let bounds = Rect::triangle_bounds_from_center_and_half_width(Point::new(0.0, 0.0), 10.0);
        assert!((bounds.top() + 10.0 / COS_30).abs() < 1e-9);
        assert!((bounds.bottom() - 10.0 * TAN_30).abs() < 1e-9);
        assert_eq!(bounds.width, 20.0);
    }

    #[test]
    fn test_rotation_is_clockwise_on_screen() {
        let p = Point::new(1.0, 0.0).rotated_around(Point::default(), std::f64::consts::FRAC_PI_2);
        assert!((p.x).abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_color_parse() {
        assert_eq!("#FF0000".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(
            "#80112233".parse::<Color>().unwrap(),
            Color::rgba(0x11, 0x22, 0x33, 0x80)
        );
        assert_eq!("10, 20, 30".parse::<Color>().unwrap(), Color::rgb(10, 20, 30));
        assert_eq!(
            "10,20,30,40".parse::<Color>().unwrap(),
            Color::rgba(10, 20, 30, 40)
        );
        assert!("red".parse::<Color>().is_err());
        assert!("300,0,0".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_string_round_trip_keeps_alpha() {
        let color = Color::rgba(1, 2, 3, 4);
        let text: String = color.into();
        assert_eq!(text, "#04010203");
        assert_eq!(text.parse::<Color>().unwrap(), color);
    }

    #[test]
    fn test_contrasting() {
        assert_eq!(Color::BLACK.contrasting(), Color::WHITE);
        assert_eq!(Color::WHITE.contrasting(), Color::BLACK);
    }
}
