//! Per-pass drawing context.

use crate::core::types::{Color, Rect};

/// Read-only for the whole pass: viewport, margin, back color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphDrawingContext {
    viewport: Rect,
    margin: u32,
    back_color: Color,
    usable: Option<Rect>,
}

impl GraphDrawingContext {
    pub fn new(viewport: Rect, margin: u32, back_color: Color) -> Self {
        Self {
            viewport,
            margin,
            back_color,
            usable: viewport.minus_margin(margin as f64),
        }
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    pub fn back_color(&self) -> Color {
        self.back_color
    }

    /// Viewport shrunk by the margin, or `None` when that leaves nothing.
    pub fn usable_rect(&self) -> Option<Rect> {
        self.usable
    }
}
