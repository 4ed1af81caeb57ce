//! Figure descriptions in TOML
//!
//! ```toml
//! rows = 1
//! cols = 2
//! profile = "paper"
//!
//! [[panels]]
//! row = 0
//! col = 0
//! title = "Response"
//! xlabel = "time (s)"
//!
//! [[panels.series]]
//! x = [0.0, 1.0, 2.0]
//! y = [0.0, 0.8, 1.0]
//! label = "step"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::figure::{new_figure, Color, Figure, FigureOptions, Marker, Scale};
use crate::marker::{plot_line, PlotOptions};
use crate::style::{StyleContext, StyleProfile};
use crate::Error;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FigureDocument {
    #[serde(default = "one")]
    pub rows: usize,
    #[serde(default = "one")]
    pub cols: usize,
    pub profile: Option<String>,
    pub figsize: Option<[f64; 2]>,
    pub title: Option<String>,
    #[serde(default)]
    pub panels: Vec<PanelSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelSpec {
    #[serde(default)]
    pub row: usize,
    #[serde(default)]
    pub col: usize,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub xlim: Option<[f64; 2]>,
    pub ylim: Option<[f64; 2]>,
    pub grid: Option<bool>,
    #[serde(default)]
    pub series: Vec<SeriesSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesSpec {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub label: Option<String>,
    /// Marker code, or `none`; circles when absent
    pub marker: Option<String>,
    pub color: Option<String>,
    pub width: Option<f64>,
}

fn one() -> usize {
    1
}

impl FigureDocument {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, Error> {
        Ok(toml::from_str(content)?)
    }

    /// Build the described figure. `profile` takes precedence over the
    /// document's own profile.
    pub fn build(
        &self,
        ctx: &mut StyleContext,
        profile: Option<StyleProfile>,
    ) -> Result<Figure, Error> {
        let profile = match (profile, &self.profile) {
            (Some(p), _) => Some(p),
            (None, Some(tag)) => Some(tag.parse::<StyleProfile>()?),
            (None, None) => None,
        };
        let options = FigureOptions {
            rows: self.rows,
            cols: self.cols,
            profile,
            figsize: self.figsize.map(|[w, h]| (w, h)),
        };
        let mut figure = new_figure(ctx, options)?;
        figure.title = self.title.clone();

        for entry in &self.panels {
            let axes = figure
                .subplot(entry.row, entry.col)
                .ok_or_else(|| Error::InvalidDocument {
                    message: format!(
                        "panel ({}, {}) is outside the {}x{} grid",
                        entry.row, entry.col, self.rows, self.cols
                    ),
                })?;
            if let Some(title) = &entry.title {
                axes.set_title(title.as_str());
            }
            if let Some(label) = &entry.xlabel {
                axes.set_label(Scale::X, label.as_str());
            }
            if let Some(label) = &entry.ylabel {
                axes.set_label(Scale::Y, label.as_str());
            }
            if let Some([lo, hi]) = entry.xlim {
                axes.set_limits(Scale::X, lo, hi);
            }
            if let Some([lo, hi]) = entry.ylim {
                axes.set_limits(Scale::Y, lo, hi);
            }
            if let Some(grid) = entry.grid {
                axes.grid = grid;
            }
            for series in &entry.series {
                let options = series.plot_options()?;
                plot_line(axes, &series.x, &series.y, options);
            }
        }
        Ok(figure)
    }
}

impl SeriesSpec {
    fn plot_options(&self) -> Result<PlotOptions, Error> {
        let mut options = PlotOptions::new();
        if let Some(code) = &self.marker {
            let marker = if code.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(code.parse::<Marker>().map_err(|message| Error::InvalidDocument { message })?)
            };
            options = options.with_marker(marker);
        }
        if let Some(color) = &self.color {
            let color = color.parse::<Color>().map_err(|e| Error::InvalidDocument {
                message: e.to_string(),
            })?;
            options = options.with_color(color);
        }
        if let Some(width) = self.width {
            options = options.with_width(width);
        }
        if let Some(label) = &self.label {
            options = options.with_label(label.as_str());
        }
        Ok(options)
    }
}
