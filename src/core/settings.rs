//! Draw settings, loadable from JSON.

use serde::{Deserialize, Serialize};

use super::config;
use super::error::{DrawError, DrawResult};
use super::types::Color;
use crate::graph::model::{EdgeCurveStyle, VertexEffect, VertexLabelPosition, VertexShape};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawSettings {
    pub background_color: Color,
    pub margin: u32,
    pub graph_scale: f64,
    pub use_selection: bool,
    pub filtered_alpha: u8,
    pub vertex: VertexSettings,
    pub edge: EdgeSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VertexSettings {
    pub shape: VertexShape,
    pub radius: f64,
    pub color: Color,
    pub selected_color: Color,
    pub effect: VertexEffect,
    pub relative_outer_glow_size: f64,
    pub label_position: VertexLabelPosition,
    pub label_fill_color: Color,
    pub label_wrap_text: bool,
    pub label_wrap_max_text_width: f64,
    pub label_background_alpha: u8,
    pub limit_vertices_to_bounds: bool,
    pub font_size: f64,
    pub max_label_length: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeSettings {
    pub width: f64,
    pub color: Color,
    pub selected_color: Color,
    pub curve_style: EdgeCurveStyle,
    pub bezier_displacement_factor: f64,
    pub draw_arrow_on_directed_edge: bool,
    pub relative_arrow_size: f64,
    pub label_text_color: Color,
    pub label_background_alpha: u8,
    pub font_size: f64,
    pub max_label_length: Option<usize>,
    pub curve_tolerance: f64,
    pub ellipsis_buffer_multiple: f64,
}

impl DrawSettings {
    pub fn new() -> Self {
        Self {
            background_color: config::BG_COLOR,
            margin: config::MARGIN,
            graph_scale: 1.0,
            use_selection: true,
            filtered_alpha: config::FILTERED_ALPHA,
            vertex: VertexSettings::new(),
            edge: EdgeSettings::new(),
        }
    }

    /// Parse and validate.
    pub fn from_json(json: &str) -> DrawResult<Self> {
        let settings: DrawSettings =
            serde_json::from_str(json).map_err(|e| DrawError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> DrawResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DrawError::InvalidSettings(e.to_string()))
    }

    pub fn validate(&self) -> DrawResult<()> {
        check_range("graph_scale", self.graph_scale, config::GRAPH_SCALE_MIN, config::GRAPH_SCALE_MAX)?;
        check_range(
            "vertex.radius",
            self.vertex.radius,
            config::VERTEX_RADIUS_MIN,
            config::VERTEX_RADIUS_MAX,
        )?;
        check_range(
            "vertex.relative_outer_glow_size",
            self.vertex.relative_outer_glow_size,
            config::RELATIVE_OUTER_GLOW_SIZE_MIN,
            config::RELATIVE_OUTER_GLOW_SIZE_MAX,
        )?;
        check_range(
            "vertex.font_size",
            self.vertex.font_size,
            config::LABEL_FONT_SIZE_MIN,
            config::LABEL_FONT_SIZE_MAX,
        )?;
        check_range(
            "vertex.label_wrap_max_text_width",
            self.vertex.label_wrap_max_text_width,
            1.0,
            f64::MAX,
        )?;
        check_range("edge.width", self.edge.width, config::EDGE_WIDTH_MIN, config::EDGE_WIDTH_MAX)?;
        check_range(
            "edge.relative_arrow_size",
            self.edge.relative_arrow_size,
            config::RELATIVE_ARROW_SIZE_MIN,
            config::RELATIVE_ARROW_SIZE_MAX,
        )?;
        check_range(
            "edge.font_size",
            self.edge.font_size,
            config::LABEL_FONT_SIZE_MIN,
            config::LABEL_FONT_SIZE_MAX,
        )?;
        check_range(
            "edge.bezier_displacement_factor",
            self.edge.bezier_displacement_factor,
            0.0,
            f64::MAX,
        )?;
        check_range(
            "edge.curve_tolerance",
            self.edge.curve_tolerance,
            config::CURVE_THROUGH_POINTS_TOLERANCE_MIN,
            f64::MAX,
        )?;
        check_range(
            "edge.ellipsis_buffer_multiple",
            self.edge.ellipsis_buffer_multiple,
            0.0,
            f64::MAX,
        )?;
        Ok(())
    }
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexSettings {
    pub fn new() -> Self {
        Self {
            shape: VertexShape::Disk,
            radius: config::VERTEX_RADIUS,
            color: config::VERTEX_COLOR,
            selected_color: config::SELECTED_COLOR,
            effect: VertexEffect::None,
            relative_outer_glow_size: config::RELATIVE_OUTER_GLOW_SIZE,
            label_position: VertexLabelPosition::TopRight,
            label_fill_color: config::LABEL_FILL_COLOR,
            label_wrap_text: true,
            label_wrap_max_text_width: config::LABEL_WRAP_MAX_TEXT_WIDTH,
            label_background_alpha: config::VERTEX_LABEL_BACKGROUND_ALPHA,
            limit_vertices_to_bounds: true,
            font_size: config::FONT_SIZE,
            max_label_length: None,
        }
    }
}

impl Default for VertexSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeSettings {
    pub fn new() -> Self {
        Self {
            width: config::EDGE_WIDTH,
            color: config::EDGE_COLOR,
            selected_color: config::SELECTED_COLOR,
            curve_style: EdgeCurveStyle::Straight,
            bezier_displacement_factor: config::BEZIER_DISPLACEMENT_FACTOR,
            draw_arrow_on_directed_edge: true,
            relative_arrow_size: config::RELATIVE_ARROW_SIZE,
            label_text_color: config::LABEL_TEXT_COLOR,
            label_background_alpha: config::EDGE_LABEL_BACKGROUND_ALPHA,
            font_size: config::FONT_SIZE,
            max_label_length: None,
            curve_tolerance: config::CURVE_THROUGH_POINTS_TOLERANCE,
            ellipsis_buffer_multiple: config::BEZIER_LABEL_ELLIPSIS_BUFFER_MULTIPLE,
        }
    }
}

impl Default for EdgeSettings {
    fn default() -> Self {
        Self::new()
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> DrawResult<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(DrawError::InvalidSettings(format!(
            "{name} must be between {min} and {max}, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(DrawSettings::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let json = r##"{
            "graph_scale": 2.0,
            "background_color": "#000000",
            "vertex": { "shape": "Diamond", "color": "255,0,0" },
            "edge": { "curve_style": "Bezier" }
        }"##;
        let settings = DrawSettings::from_json(json).unwrap();
        assert_eq!(settings.graph_scale, 2.0);
        assert_eq!(settings.background_color, Color::BLACK);
        assert_eq!(settings.vertex.shape, VertexShape::Diamond);
        assert_eq!(settings.vertex.color, Color::rgb(255, 0, 0));
        assert_eq!(settings.vertex.radius, config::VERTEX_RADIUS);
        assert_eq!(settings.edge.curve_style, EdgeCurveStyle::Bezier);
    }

    #[test]
    fn test_from_json_rejects_out_of_range_scale() {
        let err = DrawSettings::from_json(r#"{ "graph_scale": 50.0 }"#).unwrap_err();
        assert!(matches!(err, DrawError::InvalidSettings(msg) if msg.contains("graph_scale")));
    }

    #[test]
    fn test_from_json_rejects_tiny_curve_tolerance() {
        let err = DrawSettings::from_json(r#"{ "edge": { "curve_tolerance": 1e-300 } }"#).unwrap_err();
        assert!(matches!(err, DrawError::InvalidSettings(msg) if msg.contains("curve_tolerance")));
    }

    #[test]
    fn test_from_json_rejects_bad_color() {
        let err = DrawSettings::from_json(r#"{ "background_color": "teal-ish" }"#).unwrap_err();
        assert!(matches!(err, DrawError::InvalidSettings(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = DrawSettings::default();
        settings.edge.width = 3.0;
        settings.vertex.selected_color = Color::rgba(1, 2, 3, 4);
        let json = settings.to_json().unwrap();
        assert_eq!(DrawSettings::from_json(&json).unwrap(), settings);
    }
}
