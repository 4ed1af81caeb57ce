//! Integration tests for declassify / restore across multi-panel figures

use pretty_assertions::assert_eq;

use figure_template::{
    declassify, new_figure, plot_line, render_svg, restore, AxisSelector, Figure, FigureOptions,
    PanelId, PlotOptions, Scale, StyleContext, StyleLibrary, SvgConfig,
};

fn figure(rows: usize, cols: usize) -> Figure {
    let mut ctx = StyleContext::new(StyleLibrary::bundled());
    let mut fig = new_figure(&mut ctx, FigureOptions::new().with_grid(rows, cols))
        .expect("Should create figure");
    for (i, axes) in fig.axes_mut().iter_mut().enumerate() {
        let offset = i as f64;
        plot_line(
            axes,
            &[0.0, 1.0, 2.0, 3.0],
            &[offset, offset + 2.0, offset + 1.0, offset + 3.0],
            PlotOptions::new(),
        );
    }
    fig
}

#[test]
fn test_round_trip_for_every_selector() {
    for selector in [AxisSelector::X, AxisSelector::Y, AxisSelector::Both] {
        let mut fig = figure(2, 3);
        let before = fig.clone();

        let record = declassify(&mut fig, selector);
        assert_eq!(record.panels.len(), 6);
        assert_eq!(record.annotations.len(), 1);
        for axes in fig.axes() {
            for scale in [Scale::X, Scale::Y] {
                let hidden = selector.scales().contains(&scale);
                let axis = axes.axis(scale);
                assert_eq!(axis.ticks_visible, !hidden, "{:?} {:?}", selector, scale);
                assert_eq!(axis.labels_visible, !hidden, "{:?} {:?}", selector, scale);
            }
        }

        restore(&mut fig, record);
        assert_eq!(fig.axes(), before.axes());
        assert_eq!(fig.texts(), before.texts());
    }
}

#[test]
fn test_record_captures_ticks_and_labels() {
    let mut fig = figure(1, 2);
    fig.axes_mut()[0].set_ticks(
        Scale::Y,
        vec![0.0, 1.5, 3.0],
        Some(vec!["low".into(), "mid".into(), "high".into()]),
    );
    let record = declassify(&mut fig, AxisSelector::Y);
    let snapshot = &record.panels[0].scales[0];
    assert_eq!(snapshot.scale, Scale::Y);
    assert_eq!(snapshot.ticks, vec![0.0, 1.5, 3.0]);
    assert_eq!(snapshot.labels, vec!["low", "mid", "high"]);
    assert!(snapshot.ticks_visible && snapshot.labels_visible);
    restore(&mut fig, record);
}

#[test]
fn test_partially_hidden_state_is_restored_exactly() {
    let mut fig = figure(2, 2);
    fig.axes_mut()[0].set_tick_visibility(Scale::X, false, true);
    fig.axes_mut()[3].set_tick_visibility(Scale::Y, true, false);
    let before = fig.clone();

    let record = declassify(&mut fig, AxisSelector::Both);
    restore(&mut fig, record);

    assert_eq!(fig.axes(), before.axes());
    assert!(!fig.axes()[0].xaxis.ticks_visible);
    assert!(fig.axes()[0].xaxis.labels_visible);
    assert!(!fig.axes()[3].yaxis.labels_visible);
}

#[test]
fn test_restore_keeps_user_annotations() {
    let mut fig = figure(1, 1);
    fig.add_text(0.5, 0.95, "draft", Default::default());
    let record = declassify(&mut fig, AxisSelector::X);
    assert_eq!(fig.texts().len(), 2);
    restore(&mut fig, record);
    assert_eq!(fig.texts().len(), 1);
    assert_eq!(fig.texts()[0].content, "draft");
}

#[test]
fn test_restore_after_panel_removal() {
    let mut fig = figure(1, 3);
    let record = declassify(&mut fig, AxisSelector::Both);
    fig.remove_panel(PanelId(1));
    restore(&mut fig, record);
    assert_eq!(fig.axes().len(), 2);
    for axes in fig.axes() {
        assert!(axes.xaxis.ticks_visible && axes.yaxis.labels_visible);
    }
    assert_eq!(fig.redraw_requests(), 1);
}

#[test]
fn test_declassified_svg_has_watermark_and_no_ticks() {
    let mut fig = figure(1, 2);
    let config = SvgConfig::new().with_pretty_print(false);

    let normal = render_svg(&fig, &config, false).expect("Should render");
    assert!(normal.contains(r#"class="ft-tick""#));
    assert!(!normal.contains("DECLASSIFIE"));

    let record = declassify(&mut fig, AxisSelector::Both);
    let redacted = render_svg(&fig, &config, false).expect("Should render");
    restore(&mut fig, record);

    assert!(!redacted.contains(r#"class="ft-tick""#));
    assert!(redacted.contains(">DECLASSIFIE</text>"));
    assert_eq!(render_svg(&fig, &config, false).expect("Should render"), normal);
}
