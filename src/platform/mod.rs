pub mod display_list;
#[cfg(feature = "cairo")]
pub mod renderer_cairo;
pub mod surface;
pub mod text;
