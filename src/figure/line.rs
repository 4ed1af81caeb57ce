//! Plotted line artifacts

use std::str::FromStr;

use super::color::Color;

/// Marker shapes drawn at each data point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Point,
    Circle,
    Square,
    Diamond,
    Triangle,
    Plus,
    Cross,
}

impl Marker {
    /// Single-character code, as accepted by [`FromStr`]
    pub fn code(&self) -> &'static str {
        match self {
            Marker::Point => ".",
            Marker::Circle => "o",
            Marker::Square => "s",
            Marker::Diamond => "D",
            Marker::Triangle => "^",
            Marker::Plus => "+",
            Marker::Cross => "x",
        }
    }

    /// Whether the marker has an interior that takes a face color
    pub fn is_filled(&self) -> bool {
        !matches!(self, Marker::Plus | Marker::Cross)
    }
}

impl FromStr for Marker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "." | "point" => Ok(Marker::Point),
            "o" | "circle" => Ok(Marker::Circle),
            "s" | "square" => Ok(Marker::Square),
            "D" | "d" | "diamond" => Ok(Marker::Diamond),
            "^" | "triangle" => Ok(Marker::Triangle),
            "+" | "plus" => Ok(Marker::Plus),
            "x" | "cross" => Ok(Marker::Cross),
            other => Err(format!("unknown marker '{}'", other)),
        }
    }
}

/// A polyline with optional markers
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub color: Color,
    /// Stroke width in points
    pub width: f64,
    pub marker: Option<Marker>,
    /// Marker diameter in points
    pub marker_size: f64,
    /// `None` means "same as the line color"
    pub marker_face_color: Option<Color>,
    /// `None` means "same as the line color"
    pub marker_edge_color: Option<Color>,
    /// Marker edge stroke width in points
    pub marker_edge_width: f64,
    pub label: Option<String>,
}

impl Line {
    /// Build a line from paired samples; extra samples on either side are dropped
    pub fn new(xs: &[f64], ys: &[f64], color: Color) -> Self {
        let n = xs.len().min(ys.len());
        Self {
            xs: xs[..n].to_vec(),
            ys: ys[..n].to_vec(),
            color,
            width: 1.5,
            marker: None,
            marker_size: 6.0,
            marker_face_color: None,
            marker_edge_color: None,
            marker_edge_width: 1.0,
            label: None,
        }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    pub fn face_color(&self) -> Color {
        self.marker_face_color.unwrap_or(self.color)
    }

    pub fn edge_color(&self) -> Color {
        self.marker_edge_color.unwrap_or(self.color)
    }
}
