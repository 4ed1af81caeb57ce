//! Figure Template - style profiles, figure helpers and declassified export
//!
//! This library provides named style profiles loaded from `.figstyle` files, a
//! small figure model with SVG and PNG encoders, and an export helper that can
//! also write a "declassified" variant of a figure with ticks hidden and a
//! watermark added.
//!
//! # Example
//!
//! ```rust,no_run
//! use figure_template::{
//!     new_figure, plot_line, save_figure, AxisSelector, FigureOptions, PlotOptions,
//!     SaveOptions, StyleContext, StyleProfile,
//! };
//!
//! let mut ctx = StyleContext::default();
//! let options = FigureOptions::new().with_profile(StyleProfile::Paper);
//! let mut fig = new_figure(&mut ctx, options).unwrap();
//! if let Some(axes) = fig.subplot(0, 0) {
//!     plot_line(axes, &[0.0, 1.0, 2.0], &[1.0, 3.0, 2.0], PlotOptions::new());
//! }
//! let options = SaveOptions::new()
//!     .with_formats(["png", "svg"])
//!     .with_declassify(AxisSelector::Y);
//! let written = save_figure(&mut fig, "out/fig1", &options).unwrap();
//! assert_eq!(written.len(), 4);
//! ```

pub mod declassify;
pub mod document;
pub mod error;
pub mod export;
pub mod figure;
pub mod layout;
pub mod marker;
pub mod render;
pub mod style;

pub use declassify::{declassify, restore, AxisSelector, RestoreRecord};
pub use document::FigureDocument;
pub use error::ParseError;
pub use export::{save_figure, ExportFormat, Exporter, Inkscape, SaveOptions, VectorConverter};
pub use figure::{new_figure, Axes, Color, Figure, FigureOptions, Line, Marker, PanelId, Scale};
pub use layout::LayoutError;
pub use marker::{apply_marker_style, plot_line, PlotOptions};
pub use render::{render_pdf, render_raster, render_svg, SvgConfig};
pub use style::{StyleContext, StyleError, StyleLibrary, StyleParams, StyleProfile};

use thiserror::Error;

/// Errors raised by figure creation and export
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Style(#[from] StyleError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("invalid grid {rows}x{cols}: rows and columns must be at least 1")]
    InvalidGrid { rows: usize, cols: usize },

    #[error("unsupported export format '{format}' (expected png, svg, pdf or emf)")]
    UnsupportedFormat { format: String },

    #[error("invalid {name} {value}: must be a finite number greater than zero")]
    InvalidOption { name: &'static str, value: f64 },

    #[error("cannot rasterize a {width}x{height} px image")]
    ImageSize { width: f64, height: f64 },

    #[error("invalid declassify selector '{value}' (expected x, y or both)")]
    InvalidSelector { value: String },

    #[error("failed to parse figure document: {0}")]
    Document(#[from] toml::de::Error),

    #[error("invalid figure document: {message}")]
    InvalidDocument { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// `value` if it is finite and greater than zero
pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64, Error> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidOption { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidGrid { rows: 0, cols: 2 };
        insta::assert_snapshot!(err.to_string(), @"invalid grid 0x2: rows and columns must be at least 1");
        let err = Error::UnsupportedFormat {
            format: "tiff".to_string(),
        };
        insta::assert_snapshot!(err.to_string(), @"unsupported export format 'tiff' (expected png, svg, pdf or emf)");
        let err = Error::InvalidOption {
            name: "dpi",
            value: -72.0,
        };
        insta::assert_snapshot!(err.to_string(), @"invalid dpi -72: must be a finite number greater than zero");
    }

    #[test]
    fn test_style_errors_convert() {
        let err: Error = StyleError::InvalidProfile {
            name: "poster".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Style(StyleError::InvalidProfile { .. })));
    }

    #[test]
    fn test_positive_rejects_degenerate_values() {
        assert_eq!(positive("dpi", 150.0).unwrap(), 150.0);
        for value in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                positive("dpi", value),
                Err(Error::InvalidOption { name: "dpi", .. })
            ));
        }
    }
}
