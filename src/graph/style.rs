//! Resolves final colors, alphas and sizes from per-element overrides,
//! drawer defaults, selection and visibility.

use crate::core::config;
use crate::core::error::{DrawError, DrawResult};
use crate::core::types::Color;
use crate::graph::model::{ColorKey, SizeKey, StyledElement, Visibility};

#[derive(Debug, Clone, PartialEq)]
pub struct StyleResolver {
    /// When false, selection flags on elements are ignored.
    pub use_selection: bool,
    pub color: Color,
    pub selected_color: Color,
    pub filtered_alpha: u8,
    graph_scale: f64,
}

impl StyleResolver {
    pub fn new(color: Color, selected_color: Color) -> Self {
        Self {
            use_selection: true,
            color,
            selected_color,
            filtered_alpha: config::FILTERED_ALPHA,
            graph_scale: 1.0,
        }
    }

    pub fn graph_scale(&self) -> f64 {
        self.graph_scale
    }

    pub fn set_graph_scale(&mut self, scale: f64) -> DrawResult<()> {
        if !(config::GRAPH_SCALE_MIN..=config::GRAPH_SCALE_MAX).contains(&scale) {
            return Err(DrawError::InvalidSettings(format!(
                "graph scale must be between {} and {}, got {scale}",
                config::GRAPH_SCALE_MIN,
                config::GRAPH_SCALE_MAX
            )));
        }
        self.graph_scale = scale;
        Ok(())
    }

    pub fn visibility<E: StyledElement>(&self, element: &E) -> Visibility {
        element.visibility().unwrap_or_default()
    }

    pub fn draw_as_selected<E: StyledElement>(&self, element: &E) -> bool {
        self.use_selection && element.is_selected()
    }

    /// The element's main color.
    pub fn color<E: StyledElement>(
        &self,
        element: &E,
        visibility: Visibility,
        selected: bool,
    ) -> DrawResult<Color> {
        if selected {
            let alpha = if visibility == Visibility::Filtered {
                self.filtered_alpha
            } else {
                255
            };
            return Ok(self.selected_color.with_alpha(alpha));
        }
        self.color_for_key(element, ColorKey::Color, self.color, visibility, true)
    }

    /// Override for `key` if present, otherwise `default`. The override takes
    /// the default's alpha; `apply_alpha` then layers visibility and the
    /// per-element alpha on top.
    pub fn color_for_key<E: StyledElement>(
        &self,
        element: &E,
        key: ColorKey,
        default: Color,
        visibility: Visibility,
        apply_alpha: bool,
    ) -> DrawResult<Color> {
        let color = match element.color_value(key) {
            Some(value) => value.to_color().with_alpha(default.a),
            None => default,
        };
        if !apply_alpha {
            return Ok(color);
        }
        let alpha = self.alpha(element, visibility, color.a)?;
        Ok(color.with_alpha(alpha))
    }

    pub fn alpha<E: StyledElement>(
        &self,
        element: &E,
        visibility: Visibility,
        default_alpha: u8,
    ) -> DrawResult<u8> {
        if visibility == Visibility::Filtered {
            return Ok(self.filtered_alpha);
        }
        match element.alpha_value() {
            Some(alpha) => {
                let alpha = validate(element, "alpha", alpha, config::ALPHA_MIN, config::ALPHA_MAX)?;
                Ok(alpha as u8)
            }
            None => Ok(default_alpha),
        }
    }

    /// Validated override or `default`, before graph scaling.
    pub fn size<E: StyledElement>(
        &self,
        element: &E,
        key: SizeKey,
        default: f64,
        min: f64,
        max: f64,
    ) -> DrawResult<f64> {
        match element.size_value(key) {
            Some(value) => validate(element, key.name(), value, min, max),
            None => Ok(default),
        }
    }

    pub fn scaled_size<E: StyledElement>(
        &self,
        element: &E,
        key: SizeKey,
        default: f64,
        min: f64,
        max: f64,
    ) -> DrawResult<f64> {
        Ok(self.size(element, key, default, min, max)? * self.graph_scale)
    }
}

impl Default for StyleResolver {
    fn default() -> Self {
        Self::new(Color::BLACK, config::SELECTED_COLOR)
    }
}

fn validate<E: StyledElement>(
    element: &E,
    key: &'static str,
    value: f32,
    min: f64,
    max: f64,
) -> DrawResult<f64> {
    let value = value as f64;
    if value.is_nan() || value < min || value > max {
        return Err(DrawError::OutOfRange {
            element: element.element_kind(),
            id: element.element_id(),
            key,
            value,
            min,
            max,
        });
    }
    Ok(value)
}
