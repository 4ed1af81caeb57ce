//! Writing figures to disk
//!
//! [`Exporter::save`] writes every requested format next to a base path and can
//! add a declassified variant of the same formats. Options are checked before
//! anything touches the disk. EMF output goes through an
//! SVG intermediate and a [`VectorConverter`]; when conversion is not possible
//! the SVG is kept and a warning is logged.

pub mod convert;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};

pub use convert::{ConvertError, Inkscape, VectorConverter, INKSCAPE_ENV};

use crate::declassify::{declassify, restore, AxisSelector};
use crate::figure::Figure;
use crate::render::{raster_size, render_pdf, render_raster, render_svg, SvgConfig};
use crate::{positive, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Png,
    Svg,
    Pdf,
    /// Written as SVG, then converted
    Emf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Emf => "emf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(ExportFormat::Png),
            "svg" => Ok(ExportFormat::Svg),
            "pdf" => Ok(ExportFormat::Pdf),
            "emf" => Ok(ExportFormat::Emf),
            other => Err(Error::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Options for [`save_figure`] and [`Exporter::save`]
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOptions {
    /// Format tags: `png`, `svg`, `pdf` or `emf`
    pub formats: Vec<String>,
    /// Overrides `savefig.dpi`
    pub dpi: Option<f64>,
    /// Overrides `savefig.transparent`
    pub transparent: Option<bool>,
    /// Also write a declassified variant
    pub declassify: Option<AxisSelector>,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            formats: vec!["png".to_string()],
            dpi: None,
            transparent: None,
            declassify: None,
        }
    }
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = formats.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = Some(dpi);
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = Some(transparent);
        self
    }

    pub fn with_declassify(mut self, selector: AxisSelector) -> Self {
        self.declassify = Some(selector);
        self
    }
}

/// Writes figures, converting vector output with `C`
#[derive(Debug, Clone)]
pub struct Exporter<C = Inkscape> {
    converter: C,
    svg: SvgConfig,
}

impl Default for Exporter<Inkscape> {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter<Inkscape> {
    /// Exporter using Inkscape as found from the environment
    pub fn new() -> Self {
        Self::with_converter(Inkscape::from_env())
    }
}

impl<C: VectorConverter> Exporter<C> {
    pub fn with_converter(converter: C) -> Self {
        Self {
            converter,
            svg: SvgConfig::default(),
        }
    }

    pub fn with_svg_config(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Save `figure` as `<base>.<format>` for every requested format.
    ///
    /// Returns the written paths in the order they were produced. With a
    /// declassify selector, the same formats are written again to
    /// `<base>_declass_*` while the figure is declassified; the figure is
    /// restored afterwards even if that second pass fails.
    pub fn save(
        &self,
        figure: &mut Figure,
        base: impl AsRef<Path>,
        options: &SaveOptions,
    ) -> Result<Vec<PathBuf>, Error> {
        let mut formats: Vec<ExportFormat> = Vec::with_capacity(options.formats.len());
        for tag in &options.formats {
            let format = tag.parse::<ExportFormat>()?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }

        let dpi = options
            .dpi
            .or(figure.params().savefig_dpi)
            .unwrap_or(figure.dpi);
        positive("dpi", dpi)?;
        positive("figure width", figure.size.0)?;
        positive("figure height", figure.size.1)?;
        if formats.contains(&ExportFormat::Png) {
            raster_size(figure, dpi)?;
        }
        let transparent = options
            .transparent
            .unwrap_or(figure.params().savefig_transparent);

        let base = base.as_ref();
        if let Some(parent) = base.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut written = self.export_pass(figure, base, &formats, dpi, transparent)?;

        if let Some(selector) = options.declassify {
            let stem = base
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let declass_base = base.with_file_name(format!("{}_{}", stem, selector.suffix()));

            let record = declassify(figure, selector);
            let pass = self.export_pass(figure, &declass_base, &formats, dpi, transparent);
            restore(figure, record);
            written.extend(pass?);
        }

        Ok(written)
    }

    fn export_pass(
        &self,
        figure: &Figure,
        base: &Path,
        formats: &[ExportFormat],
        dpi: f64,
        transparent: bool,
    ) -> Result<Vec<PathBuf>, Error> {
        let mut written: Vec<PathBuf> = Vec::new();
        for format in formats {
            let path = base.with_extension(format.extension());
            match format {
                ExportFormat::Png => {
                    let image = render_raster(figure, dpi, transparent)?;
                    image.save_with_format(&path, image::ImageFormat::Png)?;
                    info!(path = %path.display(), dpi, "wrote png");
                    written.push(path);
                }
                ExportFormat::Svg => {
                    // Already written as the intermediate of an earlier emf
                    if !written.contains(&path) {
                        self.write_svg(figure, &path, transparent)?;
                        written.push(path);
                    }
                }
                ExportFormat::Pdf => {
                    fs::write(&path, render_pdf(figure, transparent)?)?;
                    info!(path = %path.display(), "wrote pdf");
                    written.push(path);
                }
                ExportFormat::Emf => {
                    let svg_path = base.with_extension("svg");
                    if !written.contains(&svg_path) {
                        self.write_svg(figure, &svg_path, transparent)?;
                        written.push(svg_path.clone());
                    }
                    match self.converter.convert(&svg_path, &path) {
                        Ok(()) => {
                            info!(path = %path.display(), "wrote emf");
                            written.push(path);
                        }
                        Err(e) => warn!(
                            error = %e,
                            svg = %svg_path.display(),
                            "EMF conversion skipped, keeping SVG"
                        ),
                    }
                }
            }
        }
        Ok(written)
    }

    fn write_svg(&self, figure: &Figure, path: &Path, transparent: bool) -> Result<(), Error> {
        let svg = render_svg(figure, &self.svg, transparent)?;
        fs::write(path, svg)?;
        info!(path = %path.display(), "wrote svg");
        Ok(())
    }
}

/// Save `figure` with the default exporter
pub fn save_figure(
    figure: &mut Figure,
    base: impl AsRef<Path>,
    options: &SaveOptions,
) -> Result<Vec<PathBuf>, Error> {
    Exporter::new().save(figure, base, options)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::style::StyleParams;

    /// Fails every conversion, counting the attempts
    #[derive(Default)]
    struct Unavailable {
        attempts: Cell<usize>,
    }

    impl VectorConverter for Unavailable {
        fn convert(&self, _svg: &Path, _output: &Path) -> Result<(), ConvertError> {
            self.attempts.set(self.attempts.get() + 1);
            Err(ConvertError::NotFound {
                program: "inkscape".to_string(),
            })
        }
    }

    fn figure() -> Figure {
        let mut fig = Figure::with_grid(1, 1, &StyleParams::default());
        fig.size = (2.0, 1.5);
        fig.axes_mut()[0].plot(&[0.0, 1.0], &[0.0, 1.0]);
        fig
    }

    #[test]
    fn test_format_tags() {
        assert_eq!("emf".parse::<ExportFormat>().unwrap(), ExportFormat::Emf);
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!(matches!(
            "eps".parse::<ExportFormat>(),
            Err(Error::UnsupportedFormat { ref format }) if format == "eps"
        ));
    }

    #[test]
    fn test_unknown_format_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("out").join("fig");
        let options = SaveOptions::new().with_formats(["png", "tiff"]);
        let err = Exporter::with_converter(Unavailable::default())
            .save(&mut figure(), &base, &options)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_duplicate_tags_are_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("fig");
        let options = SaveOptions::new().with_formats(["svg", "emf", "svg"]);
        let written = Exporter::with_converter(Unavailable::default())
            .save(&mut figure(), &base, &options)
            .unwrap();
        assert_eq!(written, vec![dir.path().join("fig.svg")]);
    }

    #[test]
    fn test_dpi_override_sets_png_size() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("fig");
        let options = SaveOptions::new().with_dpi(50.0);
        let written = Exporter::with_converter(Unavailable::default())
            .save(&mut figure(), &base, &options)
            .unwrap();
        let image = image::open(&written[0]).unwrap();
        assert_eq!((image.width(), image.height()), (100, 75));
    }

    #[test]
    fn test_repeated_emf_converts_once() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("fig");
        let exporter = Exporter::with_converter(Unavailable::default());
        let options = SaveOptions::new().with_formats(["emf", "emf"]);
        let written = exporter.save(&mut figure(), &base, &options).unwrap();
        assert_eq!(written, vec![dir.path().join("fig.svg")]);
        assert_eq!(exporter.converter().attempts.get(), 1);
    }

    #[test]
    fn test_pdf_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("fig");
        let options = SaveOptions::new().with_formats(["pdf"]);
        let written = Exporter::with_converter(Unavailable::default())
            .save(&mut figure(), &base, &options)
            .unwrap();
        assert_eq!(written, vec![dir.path().join("fig.pdf")]);
        let bytes = std::fs::read(&written[0]).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_degenerate_dpi_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("out").join("fig");
        for dpi in [0.0, -72.0, f64::NAN, f64::INFINITY] {
            let options = SaveOptions::new()
                .with_formats(["svg", "png"])
                .with_dpi(dpi);
            let err = Exporter::with_converter(Unavailable::default())
                .save(&mut figure(), &base, &options)
                .unwrap_err();
            assert!(
                matches!(err, Error::InvalidOption { name: "dpi", .. }),
                "dpi {} gave {}",
                dpi,
                err
            );
        }
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_oversized_png_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("fig");
        let options = SaveOptions::new()
            .with_formats(["svg", "png"])
            .with_dpi(1.0e6);
        let err = Exporter::with_converter(Unavailable::default())
            .save(&mut figure(), &base, &options)
            .unwrap_err();
        assert!(matches!(err, Error::ImageSize { .. }));
        assert!(!dir.path().join("fig.svg").exists());
    }

    #[test]
    fn test_degenerate_figure_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut fig = figure();
        fig.size = (2.0, 0.0);
        let err = Exporter::with_converter(Unavailable::default())
            .save(&mut fig, dir.path().join("fig"), &SaveOptions::new())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidOption {
                name: "figure height",
                ..
            }
        ));
    }
}
