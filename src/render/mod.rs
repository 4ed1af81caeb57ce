//! Encoders turning a figure into SVG, PDF and raster output
//!
//! All of them go through [`scene::build_scene`], which lays the figure out and
//! produces drawing primitives.

pub mod config;
pub mod font;
pub mod pdf;
pub mod raster;
pub mod scene;
pub mod svg;

pub use config::SvgConfig;
pub use pdf::render_pdf;
pub use raster::{raster_size, render_raster};
pub use scene::{build_scene, Scene};
pub use svg::render_svg;
