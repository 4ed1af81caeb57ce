//! Integration tests for multi-format export with declassified variants

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

mod common;

use figure_template::export::ConvertError;
use figure_template::{
    new_figure, plot_line, AxisSelector, Error, Exporter, Figure, FigureOptions, Inkscape,
    PlotOptions, SaveOptions, StyleContext, StyleLibrary, StyleProfile, VectorConverter,
};

/// Writes a placeholder file and records every call
#[derive(Default)]
struct Recording {
    calls: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl VectorConverter for Recording {
    fn convert(&self, svg: &Path, output: &Path) -> Result<(), ConvertError> {
        assert!(svg.is_file(), "svg should exist before conversion");
        fs::write(output, b"EMF").map_err(|source| ConvertError::Io {
            program: "recording".to_string(),
            source,
        })?;
        self.calls
            .borrow_mut()
            .push((svg.to_path_buf(), output.to_path_buf()));
        Ok(())
    }
}

fn figure(profile: Option<StyleProfile>) -> Figure {
    let mut ctx = StyleContext::new(StyleLibrary::bundled());
    let mut options = FigureOptions::new().with_grid(1, 2).with_figsize(2.0, 1.5);
    if let Some(profile) = profile {
        options = options.with_profile(profile).with_figsize(3.5, 2.6);
    }
    let mut fig = new_figure(&mut ctx, options).expect("Should create figure");
    for axes in fig.axes_mut() {
        plot_line(axes, &[0.0, 1.0, 2.0], &[1.0, 0.5, 2.0], PlotOptions::new());
    }
    fig
}

fn recording_exporter() -> Exporter<Recording> {
    Exporter::with_converter(Recording::default())
}

#[test]
fn test_png_export_creates_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("out").join("fig1");
    let written = recording_exporter()
        .save(&mut figure(None), &base, &SaveOptions::new())
        .unwrap();
    assert_eq!(written, vec![dir.path().join("out").join("fig1.png")]);
    assert!(written[0].is_file());
}

#[test]
fn test_declassified_variant_follows_normal_output() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("fig1");
    let mut fig = figure(None);
    let before = fig.clone();
    let options = SaveOptions::new()
        .with_formats(["png", "svg"])
        .with_declassify(AxisSelector::Y);

    let written = recording_exporter().save(&mut fig, &base, &options).unwrap();

    let expected: Vec<PathBuf> = [
        "fig1.png",
        "fig1.svg",
        "fig1_declass_y.png",
        "fig1_declass_y.svg",
    ]
    .iter()
    .map(|name| dir.path().join(name))
    .collect();
    assert_eq!(written, expected);
    for path in &written {
        assert!(path.is_file(), "{} should exist", path.display());
    }
    assert_eq!(fig.axes(), before.axes());
    assert_eq!(fig.texts(), before.texts());

    let normal = fs::read_to_string(dir.path().join("fig1.svg")).unwrap();
    let redacted = fs::read_to_string(dir.path().join("fig1_declass_y.svg")).unwrap();
    assert!(!normal.contains("DECLASSIFIE"));
    assert!(redacted.contains("DECLASSIFIE"));
}

#[test]
fn test_missing_inkscape_keeps_svg_only() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("fig1");
    let exporter = Exporter::with_converter(Inkscape::new("figure-template-missing-inkscape"));
    let options = SaveOptions::new().with_formats(["emf"]);

    let (result, logs) =
        common::capture_logs(|| exporter.save(&mut figure(None), &base, &options));
    let written = result.unwrap();

    let svg = dir.path().join("fig1.svg");
    assert_eq!(written, vec![svg.clone()]);
    assert!(!dir.path().join("fig1.emf").exists());
    let warning = logs
        .lines()
        .find(|line| line.contains("WARN"))
        .expect("conversion failure should log a warning");
    assert!(warning.contains("EMF conversion skipped, keeping SVG"));
    assert!(warning.contains(&format!("svg={}", svg.display())));
    assert!(warning.contains("figure-template-missing-inkscape"));
}

#[test]
fn test_conversion_order_across_passes() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("fig");
    let exporter = recording_exporter();
    let options = SaveOptions::new()
        .with_formats(["svg", "emf"])
        .with_declassify(AxisSelector::X);

    let written = exporter.save(&mut figure(None), &base, &options).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["fig.svg", "fig.emf", "fig_declass_x.svg", "fig_declass_x.emf"]
    );
    let calls = exporter.converter().calls.borrow();
    assert_eq!(
        *calls,
        vec![
            (dir.path().join("fig.svg"), dir.path().join("fig.emf")),
            (
                dir.path().join("fig_declass_x.svg"),
                dir.path().join("fig_declass_x.emf")
            ),
        ]
    );
}

#[test]
fn test_emf_alone_writes_intermediate_svg_first() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("fig");
    let options = SaveOptions::new().with_formats(["emf", "png"]);
    let written = recording_exporter()
        .save(&mut figure(None), &base, &options)
        .unwrap();
    assert_eq!(
        written,
        vec![
            dir.path().join("fig.svg"),
            dir.path().join("fig.emf"),
            dir.path().join("fig.png"),
        ]
    );
}

#[test]
fn test_failed_declassified_pass_still_restores() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("fig");
    fs::create_dir(dir.path().join("fig_declass_x.png")).unwrap();
    let mut fig = figure(None);
    let before = fig.clone();
    let options = SaveOptions::new().with_declassify(AxisSelector::X);

    let result = recording_exporter().save(&mut fig, &base, &options);

    assert!(result.is_err());
    assert!(dir.path().join("fig.png").is_file());
    assert_eq!(fig.axes(), before.axes());
    assert!(fig.texts().is_empty());
}

#[test]
fn test_unsupported_format_is_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("fig");
    let options = SaveOptions::new().with_formats(["png", "eps"]);
    let err = recording_exporter()
        .save(&mut figure(None), &base, &options)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { ref format } if format == "eps"));
    assert!(!dir.path().join("fig.png").exists());
}

#[test]
fn test_pdf_in_both_passes() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("fig1");
    let options = SaveOptions::new()
        .with_formats(["pdf", "svg"])
        .with_declassify(AxisSelector::Both);

    let written = recording_exporter()
        .save(&mut figure(None), &base, &options)
        .unwrap();

    let expected: Vec<PathBuf> = [
        "fig1.pdf",
        "fig1.svg",
        "fig1_declass_xy.pdf",
        "fig1_declass_xy.svg",
    ]
    .iter()
    .map(|name| dir.path().join(name))
    .collect();
    assert_eq!(written, expected);
    let normal = fs::read(dir.path().join("fig1.pdf")).unwrap();
    let redacted = fs::read(dir.path().join("fig1_declass_xy.pdf")).unwrap();
    assert!(normal.starts_with(b"%PDF-") && redacted.starts_with(b"%PDF-"));
    let watermark: &[u8] = b"(DECLASSIFIE)";
    assert!(!normal.windows(watermark.len()).any(|w| w == watermark));
    assert!(redacted.windows(watermark.len()).any(|w| w == watermark));
}

#[test]
fn test_transparent_override() {
    let dir = tempfile::tempdir().unwrap();
    let mut fig = figure(None);

    let opaque = dir.path().join("opaque");
    let written = recording_exporter()
        .save(&mut fig, &opaque, &SaveOptions::new())
        .unwrap();
    let image = image::open(&written[0]).unwrap().to_rgba8();
    assert_eq!(image.get_pixel(0, 0).0[3], 255);

    let clear = dir.path().join("clear");
    let options = SaveOptions::new().with_transparent(true);
    let written = recording_exporter().save(&mut fig, &clear, &options).unwrap();
    let image = image::open(&written[0]).unwrap().to_rgba8();
    assert_eq!(image.get_pixel(0, 0).0[3], 0);
}

#[test]
fn test_profile_save_dpi_sets_png_size() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("paper");
    let written = recording_exporter()
        .save(&mut figure(Some(StyleProfile::Paper)), &base, &SaveOptions::new())
        .unwrap();
    let image = image::open(&written[0]).unwrap();
    assert_eq!((image.width(), image.height()), (1050, 780));
}
