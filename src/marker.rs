//! Hollow-marker styling for plotted lines

use crate::figure::{Axes, Color, Line, Marker};

/// Edge widths below this are raised to [`MIN_EDGE_WIDTH`]
const THIN_EDGE: f64 = 1.0;
const MIN_EDGE_WIDTH: f64 = 1.2;

/// Give a line's markers a white face and an edge in the line's color.
///
/// Edge widths under 1.0 are raised to 1.2. Applying this twice changes
/// nothing further.
pub fn apply_marker_style(line: &mut Line) {
    line.marker_face_color = Some(Color::WHITE);
    line.marker_edge_color = Some(line.color);
    if line.marker_edge_width < THIN_EDGE {
        line.marker_edge_width = MIN_EDGE_WIDTH;
    }
}

/// Options for [`plot_line`]
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub marker: Option<Marker>,
    pub label: Option<String>,
    pub color: Option<Color>,
    pub width: Option<f64>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            marker: Some(Marker::Circle),
            label: None,
            color: None,
            width: None,
        }
    }
}

impl PlotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marker(mut self, marker: Option<Marker>) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }
}

/// Plot a styled line on `axes` and return its index
pub fn plot_line(axes: &mut Axes, xs: &[f64], ys: &[f64], options: PlotOptions) -> usize {
    let index = axes.plot(xs, ys);
    if let Some(line) = axes.line_mut(index) {
        line.marker = options.marker;
        line.label = options.label;
        if let Some(color) = options.color {
            line.color = color;
        }
        if let Some(width) = options.width {
            line.width = width;
        }
        apply_marker_style(line);
    }
    index
}
