//! Figure model: figures, panels, lines and annotations

pub mod axes;
pub mod builder;
pub mod color;
pub mod line;
pub mod model;

pub use axes::{Axes, Axis, LineDefaults, PanelId, Scale};
pub use builder::{new_figure, FigureOptions};
pub use color::{Color, ColorParseError};
pub use line::{Line, Marker};
pub use model::{Figure, FigureText, HAlign, TextId, TextStyle, VAlign};
