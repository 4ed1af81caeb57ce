//! Subplot grid layout
//!
//! Panel rectangles are derived from `figure.subplot.*` margins and spacing
//! by a small Cassowary constraint system.

pub mod config;
pub mod error;
pub mod grid;
pub mod solver;
pub mod types;

pub use config::SubplotParams;
pub use error::LayoutError;
pub use grid::grid_cells;
pub use types::{BoundingBox, Point};
