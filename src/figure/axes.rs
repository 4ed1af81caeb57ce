//! Panels and their two scales

use super::color::Color;
use super::line::{Line, Marker};
use crate::style::StyleParams;

/// Identifies a panel within its figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(pub u32);

/// One of the two perpendicular scales of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scale {
    X,
    Y,
}

impl Scale {
    pub fn name(&self) -> &'static str {
        match self {
            Scale::X => "x",
            Scale::Y => "y",
        }
    }
}

/// Tick and label state of one scale
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub label: Option<String>,
    /// Explicit view limits; autoscaled from data when `None`
    pub limits: Option<(f64, f64)>,
    /// Explicit tick positions; located automatically when `None`
    pub fixed_ticks: Option<Vec<f64>>,
    /// Explicit tick labels, paired with `fixed_ticks`
    pub fixed_labels: Option<Vec<String>>,
    pub ticks_visible: bool,
    pub labels_visible: bool,
    /// Autoscale padding as a fraction of the data span
    pub margin: f64,
}

impl Axis {
    fn new(margin: f64) -> Self {
        Self {
            label: None,
            limits: None,
            fixed_ticks: None,
            fixed_labels: None,
            ticks_visible: true,
            labels_visible: true,
            margin,
        }
    }
}

/// Line defaults captured from the style when the panel was created
#[derive(Debug, Clone, PartialEq)]
pub struct LineDefaults {
    pub width: f64,
    pub marker_size: f64,
    pub marker_edge_width: f64,
    pub marker: Option<Marker>,
    pub cycle: Vec<Color>,
}

/// A single plotting surface
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    id: PanelId,
    /// Grid position (row, column)
    pub position: (usize, usize),
    pub title: Option<String>,
    pub facecolor: Color,
    pub grid: bool,
    pub xaxis: Axis,
    pub yaxis: Axis,
    lines: Vec<Line>,
    defaults: LineDefaults,
    cycle_index: usize,
}

impl Axes {
    pub(crate) fn new(id: PanelId, position: (usize, usize), params: &StyleParams) -> Self {
        Self {
            id,
            position,
            title: None,
            facecolor: params.axes_facecolor,
            grid: params.axes_grid,
            xaxis: Axis::new(params.axes_xmargin),
            yaxis: Axis::new(params.axes_ymargin),
            lines: Vec::new(),
            defaults: LineDefaults {
                width: params.lines_linewidth,
                marker_size: params.lines_markersize,
                marker_edge_width: params.lines_markeredgewidth,
                marker: params.lines_marker,
                cycle: params.color_cycle.clone(),
            },
            cycle_index: 0,
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn axis(&self, scale: Scale) -> &Axis {
        match scale {
            Scale::X => &self.xaxis,
            Scale::Y => &self.yaxis,
        }
    }

    pub fn axis_mut(&mut self, scale: Scale) -> &mut Axis {
        match scale {
            Scale::X => &mut self.xaxis,
            Scale::Y => &mut self.yaxis,
        }
    }

    pub fn line_defaults(&self) -> &LineDefaults {
        &self.defaults
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_mut(&mut self, index: usize) -> Option<&mut Line> {
        self.lines.get_mut(index)
    }

    /// Next color of the panel's cycle
    pub fn next_color(&mut self) -> Color {
        if self.defaults.cycle.is_empty() {
            return Color::BLACK;
        }
        let color = self.defaults.cycle[self.cycle_index % self.defaults.cycle.len()];
        self.cycle_index += 1;
        color
    }

    /// Plot `ys` against `xs` with the panel's defaults; returns the line index
    pub fn plot(&mut self, xs: &[f64], ys: &[f64]) -> usize {
        let color = self.next_color();
        let mut line = Line::new(xs, ys, color);
        line.width = self.defaults.width;
        line.marker_size = self.defaults.marker_size;
        line.marker_edge_width = self.defaults.marker_edge_width;
        line.marker = self.defaults.marker;
        self.lines.push(line);
        self.lines.len() - 1
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_label(&mut self, scale: Scale, label: impl Into<String>) {
        self.axis_mut(scale).label = Some(label.into());
    }

    pub fn set_limits(&mut self, scale: Scale, lo: f64, hi: f64) {
        self.axis_mut(scale).limits = Some((lo, hi));
    }

    /// Fix tick positions, optionally with their labels
    pub fn set_ticks(&mut self, scale: Scale, ticks: Vec<f64>, labels: Option<Vec<String>>) {
        let axis = self.axis_mut(scale);
        axis.fixed_ticks = Some(ticks);
        axis.fixed_labels = labels;
    }

    /// Show or hide tick marks and tick labels on one scale
    pub fn set_tick_visibility(&mut self, scale: Scale, ticks: bool, labels: bool) {
        let axis = self.axis_mut(scale);
        axis.ticks_visible = ticks;
        axis.labels_visible = labels;
    }

    fn data_range(&self, scale: Scale) -> Option<(f64, f64)> {
        let values = self.lines.iter().flat_map(|line| match scale {
            Scale::X => line.xs.iter(),
            Scale::Y => line.ys.iter(),
        });
        values
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Current view limits of one scale
    pub fn view_limits(&self, scale: Scale) -> (f64, f64) {
        let axis = self.axis(scale);
        if let Some(limits) = axis.limits {
            return limits;
        }
        match self.data_range(scale) {
            None => (0.0, 1.0),
            Some((lo, hi)) if lo == hi => {
                let pad = if lo == 0.0 { 0.5 } else { lo.abs() * 0.05 };
                (lo - pad, hi + pad)
            }
            Some((lo, hi)) => {
                let pad = (hi - lo) * axis.margin;
                (lo - pad, hi + pad)
            }
        }
    }

    /// Tick positions of one scale, explicit or located inside the view limits
    pub fn ticks(&self, scale: Scale) -> Vec<f64> {
        if let Some(ticks) = &self.axis(scale).fixed_ticks {
            return ticks.clone();
        }
        let (lo, hi) = self.view_limits(scale);
        locate_ticks(lo, hi, 5)
    }

    /// Tick label text of one scale
    pub fn tick_labels(&self, scale: Scale) -> Vec<String> {
        let ticks = self.ticks(scale);
        if let Some(labels) = &self.axis(scale).fixed_labels {
            return ticks
                .iter()
                .enumerate()
                .map(|(i, _)| labels.get(i).cloned().unwrap_or_default())
                .collect();
        }
        format_ticks(&ticks)
    }
}

/// Round `x` to a 1-2-2.5-5 step of the same magnitude
fn nice_step(raw: f64) -> f64 {
    let exponent = raw.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 2.5 {
        2.5
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Evenly spaced round tick positions inside `[lo, hi]`, about `target` of them
pub fn locate_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 || target == 0 {
        return vec![lo];
    }
    let step = nice_step(span / target as f64);
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last)
        .map(|i| {
            let v = i as f64 * step;
            // Snap away float noise such as 0.30000000000000004
            (v / step).round() * step
        })
        .collect()
}

/// Format tick positions with a shared number of decimals
pub fn format_ticks(ticks: &[f64]) -> Vec<String> {
    let decimals = if ticks.len() >= 2 {
        let step = (ticks[1] - ticks[0]).abs();
        decimals_for(step)
    } else {
        ticks.first().map(|t| decimals_for(t.abs())).unwrap_or(0)
    };
    ticks
        .iter()
        .map(|t| {
            let s = format!("{:.*}", decimals, t);
            if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
                s[1..].to_string()
            } else {
                s
            }
        })
        .collect()
}

fn decimals_for(step: f64) -> usize {
    if step == 0.0 || !step.is_finite() {
        return 0;
    }
    (0..6)
        .find(|&d| {
            let scaled = step * 10f64.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(6)
}
