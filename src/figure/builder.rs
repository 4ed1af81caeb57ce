//! Figure creation with an optional style profile

use tracing::debug;

use super::model::Figure;
use crate::style::{StyleContext, StyleProfile};
use crate::{positive, Error};

/// Options for [`new_figure`]
#[derive(Debug, Clone, PartialEq)]
pub struct FigureOptions {
    pub rows: usize,
    pub cols: usize,
    /// Profile applied only while the figure is built
    pub profile: Option<StyleProfile>,
    /// Size in inches, overriding the profile's
    pub figsize: Option<(f64, f64)>,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            rows: 1,
            cols: 1,
            profile: None,
            figsize: None,
        }
    }
}

impl FigureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    pub fn with_profile(mut self, profile: StyleProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_figsize(mut self, width: f64, height: f64) -> Self {
        self.figsize = Some((width, height));
        self
    }
}

/// Create a figure with a grid of panels.
///
/// A profile given in `options` is applied to `ctx` only for the duration of
/// construction; the context's own defaults are unchanged afterwards.
pub fn new_figure(ctx: &mut StyleContext, options: FigureOptions) -> Result<Figure, Error> {
    let FigureOptions {
        rows,
        cols,
        profile,
        figsize,
    } = options;
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidGrid { rows, cols });
    }
    if let Some((width, height)) = figsize {
        positive("figure width", width)?;
        positive("figure height", height)?;
    }

    let mut figure = match profile {
        Some(profile) => ctx.with_style(profile.tag(), |ctx| {
            Figure::with_grid(rows, cols, ctx.params())
        })?,
        None => Figure::with_grid(rows, cols, ctx.params()),
    };
    if let Some(size) = figsize {
        figure.size = size;
    }
    debug!(rows, cols, profile = ?profile, "created figure");
    Ok(figure)
}
