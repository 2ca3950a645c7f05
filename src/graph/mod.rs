pub mod context;
pub mod edge_drawer;
pub mod edge_label;
pub mod geometry;
pub mod graph_drawer;
pub mod history;
pub mod model;
pub mod style;
pub mod vertex_drawer;
pub mod vertex_label;
