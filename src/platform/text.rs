//! Text measurement and line layout.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::core::config;
use crate::core::types::Size;

/// Measures rendered text extents at a given font size.
pub trait TextMeasurer {
    /// Extent of `text`, including trailing whitespace. Embedded newlines
    /// produce multiple lines. Empty text measures as zero.
    fn measure(&self, text: &str, font_size: f64) -> Size;

    fn line_height(&self, font_size: f64) -> f64 {
        self.measure("X", font_size).height
    }
}

/// Fixed-pitch approximation, used when no real font backend is available.
/// Wide glyphs take two cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceTextMeasurer {
    pub char_width_ratio: f64,
    pub line_height_ratio: f64,
}

impl MonospaceTextMeasurer {
    pub fn new() -> Self {
        Self {
            char_width_ratio: 0.6,
            line_height_ratio: 1.2,
        }
    }
}

impl Default for MonospaceTextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer for MonospaceTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> Size {
        if text.is_empty() {
            return Size::new(0.0, 0.0);
        }
        let lines = text.split('\n');
        let mut line_count = 0usize;
        let mut widest = 0usize;
        for line in lines {
            line_count += 1;
            widest = widest.max(line.width());
        }
        Size::new(
            widest as f64 * self.char_width_ratio * font_size,
            line_count as f64 * self.line_height_ratio * font_size,
        )
    }
}

/// Keep at most `max_graphemes` user-perceived characters.
pub fn truncate_graphemes(text: &str, max_graphemes: usize) -> String {
    text.graphemes(true).take(max_graphemes).collect()
}

/// Shorten `text` from the end until it plus an ellipsis fits in `max_width`.
pub fn trim_with_ellipsis(
    measurer: &dyn TextMeasurer,
    text: &str,
    font_size: f64,
    max_width: f64,
) -> String {
    if measurer.measure(text, font_size).width <= max_width {
        return text.to_string();
    }
    let boundaries: Vec<usize> = text.grapheme_indices(true).map(|(i, _)| i).collect();
    for &end in boundaries.iter().skip(1).rev() {
        let mut candidate = text[..end].to_string();
        candidate.push_str(config::ELLIPSIS);
        if measurer.measure(&candidate, font_size).width <= max_width {
            return candidate;
        }
    }
    config::ELLIPSIS.to_string()
}

/// Text laid out into lines, the measured analogue of a formatted text
/// object.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub line_widths: Vec<f64>,
    pub font_size: f64,
    pub line_height: f64,
    pub width: f64,
    pub height: f64,
}

impl TextBlock {
    /// Lay out `text`, word-wrapping at `max_width` and dropping lines past
    /// `max_height`. Cut-off text ends with an ellipsis.
    pub fn layout(
        measurer: &dyn TextMeasurer,
        text: &str,
        font_size: f64,
        max_width: Option<f64>,
        max_height: Option<f64>,
    ) -> Self {
        let line_height = measurer.line_height(font_size);
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            match max_width {
                Some(width) => wrap_paragraph(measurer, paragraph, font_size, width, &mut lines),
                None => lines.push(paragraph.to_string()),
            }
        }

        if let Some(max_height) = max_height {
            let max_lines = if line_height > 0.0 {
                ((max_height / line_height).floor() as usize).max(1)
            } else {
                lines.len()
            };
            if lines.len() > max_lines {
                lines.truncate(max_lines);
                if let Some(last) = lines.last_mut() {
                    let limit = max_width.unwrap_or(f64::INFINITY);
                    let mut ended = last.trim_end().to_string();
                    ended.push_str(config::ELLIPSIS);
                    *last = trim_with_ellipsis(measurer, &ended, font_size, limit);
                }
            }
        }

        Self::from_lines(measurer, lines, font_size, line_height)
    }

    /// Re-measure after the lines were edited.
    pub fn from_lines(
        measurer: &dyn TextMeasurer,
        lines: Vec<String>,
        font_size: f64,
        line_height: f64,
    ) -> Self {
        let line_widths: Vec<f64> = lines
            .iter()
            .map(|line| measurer.measure(line, font_size).width)
            .collect();
        let width = line_widths.iter().copied().fold(0.0, f64::max);
        let height = line_height * lines.len() as f64;
        Self {
            lines,
            line_widths,
            font_size,
            line_height,
            width,
            height,
        }
    }

    /// Trim every line so none exceeds `max_width`.
    pub fn trimmed_to(&self, measurer: &dyn TextMeasurer, max_width: f64) -> Self {
        let lines = self
            .lines
            .iter()
            .map(|line| trim_with_ellipsis(measurer, line, self.font_size, max_width))
            .collect();
        Self::from_lines(measurer, lines, self.font_size, self.line_height)
    }
}

fn wrap_paragraph(
    measurer: &dyn TextMeasurer,
    paragraph: &str,
    font_size: f64,
    max_width: f64,
    out: &mut Vec<String>,
) {
    let mut current = String::new();
    for word in paragraph.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if current.is_empty() || measurer.measure(&candidate, font_size).width <= max_width {
            current = candidate;
        } else {
            out.push(trim_with_ellipsis(measurer, &current, font_size, max_width));
            current = word.to_string();
        }
    }
    out.push(trim_with_ellipsis(measurer, &current, font_size, max_width));
}
