//! The figure: panels plus figure-level annotations

use super::axes::{Axes, PanelId};
use super::color::Color;
use crate::style::StyleParams;

/// Identifies a figure-level text annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Appearance of a text annotation
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in points
    pub size: f64,
    pub color: Color,
    pub alpha: f64,
    pub italic: bool,
    pub bold: bool,
    pub halign: HAlign,
    pub valign: VAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            color: Color::BLACK,
            alpha: 1.0,
            italic: false,
            bold: false,
            halign: HAlign::Left,
            valign: VAlign::Bottom,
        }
    }
}

/// Text placed in figure-relative coordinates (0,0 bottom-left, 1,1 top-right)
#[derive(Debug, Clone, PartialEq)]
pub struct FigureText {
    pub id: TextId,
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub style: TextStyle,
}

/// A chart made of a grid of panels
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Size in inches
    pub size: (f64, f64),
    pub dpi: f64,
    pub facecolor: Color,
    pub title: Option<String>,
    params: StyleParams,
    grid: (usize, usize),
    axes: Vec<Axes>,
    texts: Vec<FigureText>,
    next_text: u32,
    redraw_requests: u64,
}

impl Figure {
    /// Build a figure with a `rows x cols` grid of panels from `params`.
    ///
    /// Callers normally go through [`crate::new_figure`], which validates the
    /// grid shape and handles profiles.
    pub(crate) fn with_grid(rows: usize, cols: usize, params: &StyleParams) -> Self {
        let axes = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .enumerate()
            .map(|(i, pos)| Axes::new(PanelId(i as u32), pos, params))
            .collect();
        Self {
            size: params.figsize,
            dpi: params.figure_dpi,
            facecolor: params.figure_facecolor,
            title: None,
            params: params.clone(),
            grid: (rows, cols),
            axes,
            texts: Vec::new(),
            next_text: 0,
            redraw_requests: 0,
        }
    }

    /// Rendering defaults this figure was built with
    pub fn params(&self) -> &StyleParams {
        &self.params
    }

    /// Grid shape as (rows, cols)
    pub fn grid(&self) -> (usize, usize) {
        self.grid
    }

    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    pub fn axes_mut(&mut self) -> &mut [Axes] {
        &mut self.axes
    }

    /// Panel at a grid position
    pub fn subplot(&mut self, row: usize, col: usize) -> Option<&mut Axes> {
        self.axes.iter_mut().find(|a| a.position == (row, col))
    }

    pub fn panel(&self, id: PanelId) -> Option<&Axes> {
        self.axes.iter().find(|a| a.id() == id)
    }

    pub fn panel_mut(&mut self, id: PanelId) -> Option<&mut Axes> {
        self.axes.iter_mut().find(|a| a.id() == id)
    }

    /// Remove a panel, leaving its grid cell empty
    pub fn remove_panel(&mut self, id: PanelId) -> Option<Axes> {
        let index = self.axes.iter().position(|a| a.id() == id)?;
        Some(self.axes.remove(index))
    }

    pub fn texts(&self) -> &[FigureText] {
        &self.texts
    }

    /// Add a figure-level text annotation
    pub fn add_text(
        &mut self,
        x: f64,
        y: f64,
        content: impl Into<String>,
        style: TextStyle,
    ) -> TextId {
        let id = TextId(self.next_text);
        self.next_text += 1;
        self.texts.push(FigureText {
            id,
            x,
            y,
            content: content.into(),
            style,
        });
        id
    }

    /// Remove an annotation; returns false if it was not present
    pub fn remove_text(&mut self, id: TextId) -> bool {
        let before = self.texts.len();
        self.texts.retain(|t| t.id != id);
        self.texts.len() != before
    }

    /// Mark the figure as needing a redraw
    pub fn request_redraw(&mut self) {
        self.redraw_requests += 1;
    }

    /// Number of redraws requested so far
    pub fn redraw_requests(&self) -> u64 {
        self.redraw_requests
    }
}
