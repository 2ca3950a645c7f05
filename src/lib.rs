//! Geometry and style resolution for drawing graph elements.
//!
//! A render pass resolves each vertex's shape, size and color, keeps it
//! inside the viewport, then draws every edge between the resulting vertex
//! outlines with optional arrowheads, curves and labels. Output goes to any
//! [`platform::surface::DrawingSurface`]; every element also keeps a
//! [`platform::display_list::DisplayList`] of what it drew.

pub mod core;
pub mod graph;
pub mod platform;

pub use crate::core::error::{DrawError, DrawResult, ElementKind};
pub use crate::core::settings::DrawSettings;
pub use crate::core::types::{Color, Point, Rect, Size};
pub use crate::graph::graph_drawer::{GraphDrawer, RenderReport};
pub use crate::graph::model::{Edge, Graph, Vertex};
pub use crate::platform::display_list::DisplayList;
pub use crate::platform::surface::DrawingSurface;
pub use crate::platform::text::{MonospaceTextMeasurer, TextMeasurer};
