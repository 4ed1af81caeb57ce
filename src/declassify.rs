//! Declassified figure variants
//!
//! [`declassify`] hides tick marks and tick labels on the selected scales of
//! every panel and stamps a watermark on the figure. It returns a
//! [`RestoreRecord`] which [`restore`] uses to put the figure back exactly as
//! it was.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::figure::{Color, Figure, HAlign, PanelId, Scale, TextId, TextStyle, VAlign};
use crate::Error;

pub const WATERMARK_TEXT: &str = "DECLASSIFIE";
/// Figure-relative position of the watermark's bottom-left corner
pub const WATERMARK_POSITION: (f64, f64) = (0.05, 0.02);

fn watermark_style() -> TextStyle {
    TextStyle {
        size: 9.0,
        color: Color::gray(0.60),
        alpha: 0.8,
        italic: true,
        bold: true,
        halign: HAlign::Left,
        valign: VAlign::Bottom,
    }
}

/// Which scales to scrub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisSelector {
    X,
    Y,
    Both,
}

impl AxisSelector {
    pub fn scales(&self) -> &'static [Scale] {
        match self {
            AxisSelector::X => &[Scale::X],
            AxisSelector::Y => &[Scale::Y],
            AxisSelector::Both => &[Scale::X, Scale::Y],
        }
    }

    /// File-name suffix of the declassified export
    pub fn suffix(&self) -> &'static str {
        match self {
            AxisSelector::X => "declass_x",
            AxisSelector::Y => "declass_y",
            AxisSelector::Both => "declass_xy",
        }
    }
}

impl FromStr for AxisSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(AxisSelector::X),
            "y" => Ok(AxisSelector::Y),
            "both" | "xy" => Ok(AxisSelector::Both),
            other => Err(Error::InvalidSelector {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for AxisSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AxisSelector::X => "x",
            AxisSelector::Y => "y",
            AxisSelector::Both => "both",
        })
    }
}

/// Tick state of one scale before it was hidden
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSnapshot {
    pub scale: Scale,
    pub ticks: Vec<f64>,
    pub labels: Vec<String>,
    pub ticks_visible: bool,
    pub labels_visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSnapshot {
    pub panel: PanelId,
    pub scales: Vec<ScaleSnapshot>,
}

/// Everything [`restore`] needs to undo a [`declassify`]
#[derive(Debug, Clone, PartialEq)]
#[must_use = "the figure stays declassified unless the record is passed to `restore`"]
pub struct RestoreRecord {
    pub selector: AxisSelector,
    pub panels: Vec<PanelSnapshot>,
    /// Annotations added by declassify
    pub annotations: Vec<TextId>,
}

/// Hide ticks and tick labels on the selected scales and add the watermark
pub fn declassify(figure: &mut Figure, selector: AxisSelector) -> RestoreRecord {
    let mut panels = Vec::with_capacity(figure.axes().len());
    for axes in figure.axes_mut() {
        let mut scales = Vec::with_capacity(selector.scales().len());
        for &scale in selector.scales() {
            let axis = axes.axis(scale);
            scales.push(ScaleSnapshot {
                scale,
                ticks: axes.ticks(scale),
                labels: axes.tick_labels(scale),
                ticks_visible: axis.ticks_visible,
                labels_visible: axis.labels_visible,
            });
            axes.set_tick_visibility(scale, false, false);
        }
        panels.push(PanelSnapshot {
            panel: axes.id(),
            scales,
        });
    }

    let (x, y) = WATERMARK_POSITION;
    let watermark = figure.add_text(x, y, WATERMARK_TEXT, watermark_style());
    debug!(selector = %selector, panels = panels.len(), "declassified figure");

    RestoreRecord {
        selector,
        panels,
        annotations: vec![watermark],
    }
}

/// Undo a [`declassify`]
///
/// Panels removed since the record was taken are skipped.
pub fn restore(figure: &mut Figure, record: RestoreRecord) {
    for snapshot in record.panels {
        let Some(axes) = figure.panel_mut(snapshot.panel) else {
            debug!(panel = snapshot.panel.0, "panel no longer exists, skipping restore");
            continue;
        };
        for scale in snapshot.scales {
            axes.set_tick_visibility(scale.scale, scale.ticks_visible, scale.labels_visible);
        }
    }
    for id in record.annotations {
        if !figure.remove_text(id) {
            debug!(text = id.0, "annotation already removed");
        }
    }
    figure.request_redraw();
}
