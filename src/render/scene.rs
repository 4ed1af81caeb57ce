//! Conversion of a figure into resolution-independent drawing primitives
//!
//! Coordinates are in output units (`pt * dpi / 72`), origin at the top-left
//! corner, y growing downwards. Both encoders consume the same [`Scene`].

use crate::figure::{Axes, Color, Figure, HAlign, Marker, PanelId, Scale, VAlign};
use crate::layout::{grid_cells, BoundingBox, LayoutError, Point};
use crate::style::{StyleParams, TickParams};

/// Gap between tick marks and their labels, in points
const TICK_PAD: f64 = 3.5;
/// Gap between tick labels and the axis label, in points
const LABEL_PAD: f64 = 4.0;
/// Gap between the panel top and its title, in points
const TITLE_PAD: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub position: Point,
    pub content: String,
    /// Font size in output units
    pub size: f64,
    pub color: Color,
    pub halign: HAlign,
    pub valign: VAlign,
    pub italic: bool,
    pub bold: bool,
    /// Rotated a quarter turn counter-clockwise
    pub vertical: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        rect: BoundingBox,
        fill: Option<Color>,
        stroke: Option<Stroke>,
        class: &'static str,
    },
    Segment {
        from: Point,
        to: Point,
        stroke: Stroke,
        class: &'static str,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Stroke,
    },
    Marker {
        center: Point,
        marker: Marker,
        /// Marker diameter in output units
        size: f64,
        face: Color,
        edge: Stroke,
    },
    Text(TextPrimitive),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelScene {
    pub id: PanelId,
    pub bounds: BoundingBox,
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub background: Option<Color>,
    pub panels: Vec<PanelScene>,
    /// Figure-level text, drawn above the panels
    pub overlay: Vec<TextPrimitive>,
}

/// Lay out `figure` at `dpi`
///
/// With `transparent` set, figure and panel backgrounds are left out.
pub fn build_scene(figure: &Figure, dpi: f64, transparent: bool) -> Result<Scene, LayoutError> {
    let width = figure.size.0 * dpi;
    let height = figure.size.1 * dpi;
    let k = dpi / 72.0;
    let params = figure.params();
    let (rows, cols) = figure.grid();
    let cells = grid_cells(rows, cols, width, height, &params.subplot)?;

    let panels = figure
        .axes()
        .iter()
        .map(|axes| {
            let (row, col) = axes.position;
            let bounds = cells[row * cols + col];
            PanelScene {
                id: axes.id(),
                bounds,
                primitives: panel_primitives(axes, bounds, params, k, transparent),
            }
        })
        .collect();

    let mut overlay = Vec::new();
    if let Some(title) = &figure.title {
        overlay.push(TextPrimitive {
            position: Point::new(width / 2.0, height * 0.02),
            content: title.clone(),
            size: params.axes_titlesize.resolve(params.font_size) * 1.2 * k,
            color: params.text_color,
            halign: HAlign::Center,
            valign: VAlign::Top,
            italic: false,
            bold: false,
            vertical: false,
        });
    }
    for text in figure.texts() {
        let style = &text.style;
        overlay.push(TextPrimitive {
            position: Point::new(text.x * width, (1.0 - text.y) * height),
            content: text.content.clone(),
            size: style.size * k,
            color: style.color.with_alpha(style.alpha),
            halign: style.halign,
            valign: style.valign,
            italic: style.italic,
            bold: style.bold,
            vertical: false,
        });
    }

    let background = if transparent || figure.facecolor.is_transparent() {
        None
    } else {
        Some(figure.facecolor)
    };

    Ok(Scene {
        width,
        height,
        background,
        panels,
        overlay,
    })
}

/// Maps data values of one scale onto an output interval
#[derive(Debug, Clone, Copy)]
struct Mapping {
    lo: f64,
    hi: f64,
    start: f64,
    end: f64,
}

impl Mapping {
    fn new((lo, hi): (f64, f64), start: f64, end: f64) -> Self {
        Self { lo, hi, start, end }
    }

    fn map(&self, v: f64) -> f64 {
        let span = self.hi - self.lo;
        if span == 0.0 {
            return (self.start + self.end) / 2.0;
        }
        self.start + (v - self.lo) / span * (self.end - self.start)
    }

    fn contains(&self, v: f64) -> bool {
        let (lo, hi) = if self.lo <= self.hi {
            (self.lo, self.hi)
        } else {
            (self.hi, self.lo)
        };
        let eps = (hi - lo).abs() * 1e-9;
        v >= lo - eps && v <= hi + eps
    }
}

fn text(
    position: Point,
    content: impl Into<String>,
    size: f64,
    color: Color,
    halign: HAlign,
    valign: VAlign,
) -> TextPrimitive {
    TextPrimitive {
        position,
        content: content.into(),
        size,
        color,
        halign,
        valign,
        italic: false,
        bold: false,
        vertical: false,
    }
}

fn panel_primitives(
    axes: &Axes,
    bounds: BoundingBox,
    params: &StyleParams,
    k: f64,
    transparent: bool,
) -> Vec<Primitive> {
    let xmap = Mapping::new(axes.view_limits(Scale::X), bounds.x, bounds.right());
    let ymap = Mapping::new(axes.view_limits(Scale::Y), bounds.bottom(), bounds.y);
    let xticks: Vec<f64> = axes
        .ticks(Scale::X)
        .into_iter()
        .filter(|t| xmap.contains(*t))
        .collect();
    let yticks: Vec<f64> = axes
        .ticks(Scale::Y)
        .into_iter()
        .filter(|t| ymap.contains(*t))
        .collect();

    let mut out = Vec::new();

    if !transparent && !axes.facecolor.is_transparent() {
        out.push(Primitive::Rect {
            rect: bounds,
            fill: Some(axes.facecolor),
            stroke: None,
            class: "background",
        });
    }

    if axes.grid {
        let stroke = Stroke {
            color: params.grid_color.with_alpha(params.grid_alpha),
            width: params.grid_linewidth * k,
        };
        for &t in &xticks {
            let x = xmap.map(t);
            out.push(Primitive::Segment {
                from: Point::new(x, bounds.y),
                to: Point::new(x, bounds.bottom()),
                stroke,
                class: "grid",
            });
        }
        for &t in &yticks {
            let y = ymap.map(t);
            out.push(Primitive::Segment {
                from: Point::new(bounds.x, y),
                to: Point::new(bounds.right(), y),
                stroke,
                class: "grid",
            });
        }
    }

    for line in axes.lines() {
        let points: Vec<Point> = line
            .points()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(x, y)| Point::new(xmap.map(x), ymap.map(y)))
            .collect();
        if line.width > 0.0 && points.len() > 1 {
            out.push(Primitive::Polyline {
                points: points.clone(),
                stroke: Stroke {
                    color: line.color,
                    width: line.width * k,
                },
            });
        }
        if let Some(marker) = line.marker {
            let edge = Stroke {
                color: line.edge_color(),
                width: line.marker_edge_width * k,
            };
            for center in points {
                out.push(Primitive::Marker {
                    center,
                    marker,
                    size: line.marker_size * k,
                    face: line.face_color(),
                    edge,
                });
            }
        }
    }

    out.push(Primitive::Rect {
        rect: bounds,
        fill: None,
        stroke: Some(Stroke {
            color: params.axes_edgecolor,
            width: params.axes_linewidth * k,
        }),
        class: "spine",
    });

    let x_extent = tick_primitives(
        &mut out,
        axes,
        Scale::X,
        &xticks,
        &xmap,
        bounds,
        &params.xtick,
        params.font_size,
        k,
    );
    let y_extent = tick_primitives(
        &mut out,
        axes,
        Scale::Y,
        &yticks,
        &ymap,
        bounds,
        &params.ytick,
        params.font_size,
        k,
    );

    let label_size = params.axes_labelsize.resolve(params.font_size) * k;
    if let Some(label) = &axes.xaxis.label {
        out.push(Primitive::Text(text(
            Point::new(bounds.center().x, bounds.bottom() + x_extent + LABEL_PAD * k),
            label.as_str(),
            label_size,
            params.text_color,
            HAlign::Center,
            VAlign::Top,
        )));
    }
    if let Some(label) = &axes.yaxis.label {
        let mut t = text(
            Point::new(bounds.x - y_extent - LABEL_PAD * k, bounds.center().y),
            label.as_str(),
            label_size,
            params.text_color,
            HAlign::Center,
            VAlign::Bottom,
        );
        t.vertical = true;
        out.push(Primitive::Text(t));
    }
    if let Some(title) = &axes.title {
        out.push(Primitive::Text(text(
            Point::new(bounds.center().x, bounds.y - TITLE_PAD * k),
            title.as_str(),
            params.axes_titlesize.resolve(params.font_size) * k,
            params.text_color,
            HAlign::Center,
            VAlign::Bottom,
        )));
    }

    out
}

/// Push tick marks and labels of one scale; returns how far they reach
/// outside the panel
#[allow(clippy::too_many_arguments)]
fn tick_primitives(
    out: &mut Vec<Primitive>,
    axes: &Axes,
    scale: Scale,
    ticks: &[f64],
    mapping: &Mapping,
    bounds: BoundingBox,
    tick: &TickParams,
    font_size: f64,
    k: f64,
) -> f64 {
    let axis = axes.axis(scale);
    let length = tick.major_size * k;
    let mut extent = 0.0;

    if axis.ticks_visible {
        let stroke = Stroke {
            color: tick.color,
            width: tick.major_width * k,
        };
        for &t in ticks {
            let v = mapping.map(t);
            let (from, to) = match scale {
                Scale::X => (
                    Point::new(v, bounds.bottom()),
                    Point::new(v, bounds.bottom() + length),
                ),
                Scale::Y => (Point::new(bounds.x, v), Point::new(bounds.x - length, v)),
            };
            out.push(Primitive::Segment {
                from,
                to,
                stroke,
                class: "tick",
            });
        }
        extent += length;
    }

    if axis.labels_visible {
        let size = tick.label_size.resolve(font_size) * k;
        let all_ticks = axes.ticks(scale);
        let all_labels = axes.tick_labels(scale);
        let offset = length + TICK_PAD * k;
        let mut widest: f64 = 0.0;
        for &t in ticks {
            let Some(index) = all_ticks.iter().position(|v| *v == t) else {
                continue;
            };
            let label = all_labels.get(index).cloned().unwrap_or_default();
            if label.is_empty() {
                continue;
            }
            let v = mapping.map(t);
            let primitive = match scale {
                Scale::X => text(
                    Point::new(v, bounds.bottom() + offset),
                    label.as_str(),
                    size,
                    tick.color,
                    HAlign::Center,
                    VAlign::Top,
                ),
                Scale::Y => text(
                    Point::new(bounds.x - offset, v),
                    label.as_str(),
                    size,
                    tick.color,
                    HAlign::Right,
                    VAlign::Center,
                ),
            };
            widest = widest.max(estimate_width(&label, size));
            out.push(Primitive::Text(primitive));
        }
        extent = offset
            + match scale {
                Scale::X => size,
                Scale::Y => widest,
            };
    }

    extent
}

/// Rough advance width of `text` at `size`, without font metrics
pub fn estimate_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * 0.6
}

/// Geometry of one marker, shared by both encoders
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerShape {
    Disc { radius: f64 },
    Polygon(Vec<Point>),
    /// Open strokes that take the edge color only
    Strokes(Vec<(Point, Point)>),
}

pub fn marker_shape(marker: Marker, center: Point, size: f64) -> MarkerShape {
    let r = size / 2.0;
    let Point { x, y } = center;
    match marker {
        Marker::Circle => MarkerShape::Disc { radius: r },
        Marker::Point => MarkerShape::Disc { radius: r / 2.0 },
        Marker::Square => {
            let h = r / std::f64::consts::SQRT_2;
            MarkerShape::Polygon(vec![
                Point::new(x - h, y - h),
                Point::new(x + h, y - h),
                Point::new(x + h, y + h),
                Point::new(x - h, y + h),
            ])
        }
        Marker::Diamond => MarkerShape::Polygon(vec![
            Point::new(x, y - r),
            Point::new(x + r, y),
            Point::new(x, y + r),
            Point::new(x - r, y),
        ]),
        Marker::Triangle => MarkerShape::Polygon(vec![
            Point::new(x, y - r),
            Point::new(x + r * 0.866, y + r * 0.5),
            Point::new(x - r * 0.866, y + r * 0.5),
        ]),
        Marker::Plus => MarkerShape::Strokes(vec![
            (Point::new(x - r, y), Point::new(x + r, y)),
            (Point::new(x, y - r), Point::new(x, y + r)),
        ]),
        Marker::Cross => {
            let h = r / std::f64::consts::SQRT_2;
            MarkerShape::Strokes(vec![
                (Point::new(x - h, y - h), Point::new(x + h, y + h)),
                (Point::new(x - h, y + h), Point::new(x + h, y - h)),
            ])
        }
    }
}
