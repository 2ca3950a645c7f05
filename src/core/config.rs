//! Visual and behavioral constants.

use super::types::Color;

// --- Default colors ---
pub const BG_COLOR: Color = Color::from_hex(0xFFFFFF, 255);
pub const VERTEX_COLOR: Color = Color::from_hex(0x000000, 255);
pub const EDGE_COLOR: Color = Color::from_hex(0x000000, 255);
pub const SELECTED_COLOR: Color = Color::from_hex(0x3399FF, 255);
pub const LABEL_FILL_COLOR: Color = Color::from_hex(0xFFFFFF, 255);
pub const LABEL_TEXT_COLOR: Color = Color::from_hex(0x000000, 255);

// --- Alpha ---
pub const FILTERED_ALPHA: u8 = 10;
pub const VERTEX_LABEL_BACKGROUND_ALPHA: u8 = 220;
/// 80% of opaque.
pub const EDGE_LABEL_BACKGROUND_ALPHA: u8 = 204;

// --- Viewport ---
/// Blank border kept inside the viewport.
pub const MARGIN: u32 = 6;

// --- Graph scale ---
pub const GRAPH_SCALE_MIN: f64 = 0.01;
pub const GRAPH_SCALE_MAX: f64 = 10.0;

// --- Vertices ---
pub const VERTEX_RADIUS: f64 = 3.0;
pub const VERTEX_RADIUS_MIN: f64 = 0.1;
pub const VERTEX_RADIUS_MAX: f64 = 549.0;
pub const RELATIVE_OUTER_GLOW_SIZE: f64 = 3.0;
pub const RELATIVE_OUTER_GLOW_SIZE_MIN: f64 = 1.0;
pub const RELATIVE_OUTER_GLOW_SIZE_MAX: f64 = 10.0;
pub const VERTEX_PEN_WIDTH: f64 = 1.0;

// --- Labels ---
pub const FONT_SIZE: f64 = 10.0;
pub const LABEL_FONT_SIZE_MIN: f64 = 1.0;
pub const LABEL_FONT_SIZE_MAX: f64 = 500.0;
pub const LABEL_WRAP_MAX_TEXT_WIDTH: f64 = 300.0;
pub const LABEL_MAX_HEIGHT: f64 = 550.0;
pub const LABEL_HORIZONTAL_MARGIN: f64 = 3.0;
pub const LABEL_VERTICAL_MARGIN: f64 = 2.0;
pub const LABEL_BACKGROUND_PADDING: f64 = 1.0;
pub const LABEL_BACKGROUND_CORNER_RADIUS: f64 = 2.0;
pub const ELLIPSIS: &str = "\u{2026}";
/// Reference glyph used to size the buffers at both ends of an edge label.
pub const LABEL_BUFFER_GLYPH: &str = "i";

// --- Edges ---
pub const EDGE_WIDTH: f64 = 1.0;
pub const EDGE_WIDTH_MIN: f64 = 1.0;
pub const EDGE_WIDTH_MAX: f64 = 20.0;
pub const RELATIVE_ARROW_SIZE: f64 = 3.0;
pub const RELATIVE_ARROW_SIZE_MIN: f64 = 0.0;
pub const RELATIVE_ARROW_SIZE_MAX: f64 = 20.0;
pub const ARROW_WIDTH_FACTOR: f64 = 1.5;
/// How far the shortened line end sits inside the arrow base.
pub const ARROW_BASE_OVERLAP: f64 = 0.2;
pub const BEZIER_DISPLACEMENT_FACTOR: f64 = 0.2;
pub const SELF_LOOP_CIRCLE_RADIUS: f64 = 10.0;
/// Angular correction applied to self-loop arrows (pi / 13).
pub const SELF_LOOP_ARROW_CORRECTION: f64 = std::f64::consts::PI / 13.0;
pub const CURVE_THROUGH_POINTS_TOLERANCE: f64 = 8.0;
pub const CURVE_THROUGH_POINTS_TOLERANCE_MIN: f64 = 0.5;
/// Upper bound on samples taken for one spline segment.
pub const CURVE_SEGMENT_MAX_SAMPLES: usize = 1024;
pub const CURVE_THROUGH_POINTS_TENSION: f64 = 0.5;
pub const BEZIER_LABEL_ELLIPSIS_BUFFER_MULTIPLE: f64 = 6.0;

// --- Alpha range for per-element overrides ---
pub const ALPHA_MIN: f64 = 0.0;
pub const ALPHA_MAX: f64 = 255.0;

// --- Geometry sampling ---
/// Line segments per Bezier segment when flattening paths.
pub const BEZIER_FLATTEN_STEPS: usize = 32;
/// Samples used for arc-length lookups on quadratic curves.
pub const ARC_LENGTH_SAMPLES: usize = 100;
