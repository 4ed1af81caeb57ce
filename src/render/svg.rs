//! SVG generation from a figure scene
//!
//! The scene is built at 72 dpi so that one output unit is one point.

use crate::figure::{Color, Figure, HAlign, VAlign};
use crate::layout::{BoundingBox, LayoutError, Point};

use super::scene::{build_scene, marker_shape, MarkerShape, Primitive, Stroke, TextPrimitive};
use super::SvgConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    styles: Vec<String>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            styles: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    /// Add a CSS rule to the document's `<style>` block
    pub fn add_style(&mut self, css: impl Into<String>) {
        self.styles.push(css.into());
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn num(&self, v: f64) -> String {
        format_number(v, self.config.precision)
    }

    fn points(&self, points: &[Point]) -> String {
        points
            .iter()
            .map(|p| format!("{},{}", self.num(p.x), self.num(p.y)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Stroke attributes, or nothing for no stroke
    pub fn stroke_attrs(&self, stroke: Option<Stroke>) -> String {
        match stroke {
            Some(s) if !s.color.is_transparent() && s.width > 0.0 => format!(
                r#" stroke="{}" stroke-width="{}"{}"#,
                s.color.to_hex(),
                self.num(s.width),
                opacity_attr("stroke-opacity", s.color)
            ),
            _ => String::new(),
        }
    }

    /// Add a rectangle element
    pub fn add_rect(&mut self, rect: BoundingBox, class: &str, paint: &str) {
        self.elements.push(format!(
            r#"{}<rect class="{}{}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
            self.indent_str(),
            self.prefix(),
            class,
            self.num(rect.x),
            self.num(rect.y),
            self.num(rect.width),
            self.num(rect.height),
            paint
        ));
    }

    /// Add a line element
    pub fn add_line(&mut self, from: Point, to: Point, class: &str, paint: &str) {
        self.elements.push(format!(
            r#"{}<line class="{}{}" x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            self.indent_str(),
            self.prefix(),
            class,
            self.num(from.x),
            self.num(from.y),
            self.num(to.x),
            self.num(to.y),
            paint
        ));
    }

    /// Add a polyline element
    pub fn add_polyline(&mut self, points: &[Point], class: &str, paint: &str) {
        self.elements.push(format!(
            r#"{}<polyline class="{}{}" points="{}" fill="none" stroke-linejoin="round" stroke-linecap="round"{}/>"#,
            self.indent_str(),
            self.prefix(),
            class,
            self.points(points),
            paint
        ));
    }

    /// Add a polygon element
    pub fn add_polygon(&mut self, points: &[Point], class: &str, paint: &str) {
        self.elements.push(format!(
            r#"{}<polygon class="{}{}" points="{}"{}/>"#,
            self.indent_str(),
            self.prefix(),
            class,
            self.points(points),
            paint
        ));
    }

    /// Add a circle element
    pub fn add_circle(&mut self, center: Point, r: f64, class: &str, paint: &str) {
        self.elements.push(format!(
            r#"{}<circle class="{}{}" cx="{}" cy="{}" r="{}"{}/>"#,
            self.indent_str(),
            self.prefix(),
            class,
            self.num(center.x),
            self.num(center.y),
            self.num(r),
            paint
        ));
    }

    /// Add a text element
    pub fn add_text(&mut self, text: &TextPrimitive, class: &str) {
        let anchor = match text.halign {
            HAlign::Left => "start",
            HAlign::Center => "middle",
            HAlign::Right => "end",
        };
        let baseline = match text.valign {
            VAlign::Top => r#" dominant-baseline="hanging""#,
            VAlign::Center => r#" dominant-baseline="central""#,
            VAlign::Bottom => "",
        };
        let x = self.num(text.position.x);
        let y = self.num(text.position.y);
        let transform = if text.vertical {
            format!(r#" transform="rotate(-90 {} {})""#, x, y)
        } else {
            String::new()
        };
        let mut font = format!(r#" font-size="{}""#, self.num(text.size));
        if text.italic {
            font.push_str(r#" font-style="italic""#);
        }
        if text.bold {
            font.push_str(r#" font-weight="bold""#);
        }

        self.elements.push(format!(
            r#"{}<text class="{}text {}{}" x="{}" y="{}" text-anchor="{}"{}{}{}{}>{}</text>"#,
            self.indent_str(),
            self.prefix(),
            self.prefix(),
            class,
            x,
            y,
            anchor,
            baseline,
            transform,
            font,
            fill_attrs(Some(text.color)),
            escape_xml(&text.content)
        ));
    }

    /// Add a group element with optional ID
    pub fn start_group(&mut self, id: Option<&str>, class: &str) {
        let id_attr = id.map(|i| format!(r#" id="{}""#, i)).unwrap_or_default();
        self.elements.push(format!(
            r#"{}<g{} class="{}{}">"#,
            self.indent_str(),
            id_attr,
            self.prefix(),
            class
        ));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string; `width` and `height` are in points
    pub fn build(self, width: f64, height: f64) -> String {
        let nl = self.newline();
        let pad = if self.config.pretty_print { "  " } else { "" };
        let w = self.num(width);
        let h = self.num(height);

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}pt" height="{}pt" viewBox="0 0 {} {}">"#,
            w, h, w, h
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str(pad);
            svg.push_str("<style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str(pad);
                svg.push_str(pad);
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str(pad);
            svg.push_str("</style>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Render a figure to an SVG document sized in points
pub fn render_svg(
    figure: &Figure,
    config: &SvgConfig,
    transparent: bool,
) -> Result<String, LayoutError> {
    let scene = build_scene(figure, 72.0, transparent)?;
    let mut builder = SvgBuilder::new(config.clone());

    let prefix = builder.prefix();
    let families = figure
        .params()
        .font_family
        .iter()
        .map(|f| {
            if f.contains(' ') {
                format!("'{}'", f)
            } else {
                f.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    builder.add_style(escape_xml(&format!(
        ".{}text {{ font-family: {}; }}",
        prefix, families
    )));

    if let Some(background) = scene.background {
        builder.add_rect(
            BoundingBox::new(0.0, 0.0, scene.width, scene.height),
            "figure-background",
            &fill_attrs(Some(background)),
        );
    }

    for panel in &scene.panels {
        let id = format!("axes_{}", panel.id.0 + 1);
        builder.start_group(Some(&id), "axes");
        for primitive in &panel.primitives {
            render_primitive(primitive, &mut builder);
        }
        builder.end_group();
    }

    if !scene.overlay.is_empty() {
        builder.start_group(None, "annotations");
        for text in &scene.overlay {
            builder.add_text(text, "annotation");
        }
        builder.end_group();
    }

    Ok(builder.build(scene.width, scene.height))
}

fn render_primitive(primitive: &Primitive, builder: &mut SvgBuilder) {
    match primitive {
        Primitive::Rect {
            rect,
            fill,
            stroke,
            class,
        } => {
            let paint = format!("{}{}", fill_attrs(*fill), builder.stroke_attrs(*stroke));
            builder.add_rect(*rect, class, &paint);
        }
        Primitive::Segment {
            from,
            to,
            stroke,
            class,
        } => {
            let paint = builder.stroke_attrs(Some(*stroke));
            builder.add_line(*from, *to, class, &paint);
        }
        Primitive::Polyline { points, stroke } => {
            let paint = builder.stroke_attrs(Some(*stroke));
            builder.add_polyline(points, "line", &paint);
        }
        Primitive::Marker {
            center,
            marker,
            size,
            face,
            edge,
        } => {
            let paint = format!(
                "{}{}",
                fill_attrs(Some(*face)),
                builder.stroke_attrs(Some(*edge))
            );
            match marker_shape(*marker, *center, *size) {
                MarkerShape::Disc { radius } => {
                    builder.add_circle(*center, radius, "marker", &paint)
                }
                MarkerShape::Polygon(points) => builder.add_polygon(&points, "marker", &paint),
                MarkerShape::Strokes(strokes) => {
                    let paint = builder.stroke_attrs(Some(*edge));
                    for (from, to) in strokes {
                        builder.add_line(from, to, "marker", &paint);
                    }
                }
            }
        }
        Primitive::Text(text) => builder.add_text(text, "label"),
    }
}

/// Fill attributes; transparent or absent colors give `fill="none"`
fn fill_attrs(color: Option<Color>) -> String {
    match color {
        Some(c) if !c.is_transparent() => {
            format!(r#" fill="{}"{}"#, c.to_hex(), opacity_attr("fill-opacity", c))
        }
        _ => r#" fill="none""#.to_string(),
    }
}

fn opacity_attr(name: &str, color: Color) -> String {
    if color.a == 255 {
        String::new()
    } else {
        format!(r#" {}="{}""#, name, format_number(color.opacity(), 3))
    }
}

/// Format a coordinate with at most `precision` decimals, dropping trailing zeros
fn format_number(v: f64, precision: usize) -> String {
    let s = format!("{:.*}", precision, v);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

/// Escape special XML characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
