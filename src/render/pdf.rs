//! Single-page PDF encoder
//!
//! Draws the same scene as the SVG encoder at 72 dpi, so one output unit is
//! one point. Text uses the standard base-14 fonts and needs no embedding.

use pdf_writer::types::{LineCapStyle, LineJoinStyle};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use crate::figure::{Color, Figure, HAlign, VAlign};
use crate::layout::{BoundingBox, Point};
use crate::Error;

use super::scene::{
    build_scene, estimate_width, marker_shape, MarkerShape, Primitive, Stroke, TextPrimitive,
};

/// Bezier control distance for a quarter circle
const KAPPA: f64 = 0.552_284_75;
/// Cap height as a fraction of the font size
const CAP_HEIGHT: f64 = 0.72;

/// Indexed by `bold * 2 + italic`
const FONT_NAMES: [&[u8]; 4] = [b"F0", b"F1", b"F2", b"F3"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Sans,
    Serif,
    Mono,
}

impl Family {
    /// First entry of `font.family` that maps onto a base-14 family
    fn from_families(families: &[String]) -> Self {
        for family in families {
            match family.to_ascii_lowercase().as_str() {
                "sans-serif" | "sans" | "helvetica" | "arial" | "dejavu sans" => {
                    return Family::Sans;
                }
                "serif" | "times" | "times new roman" | "dejavu serif" => return Family::Serif,
                "monospace" | "courier" | "courier new" | "dejavu sans mono" => {
                    return Family::Mono;
                }
                _ => {}
            }
        }
        Family::Sans
    }

    fn base_font(self, bold: bool, italic: bool) -> &'static str {
        match (self, bold, italic) {
            (Family::Sans, false, false) => "Helvetica",
            (Family::Sans, false, true) => "Helvetica-Oblique",
            (Family::Sans, true, false) => "Helvetica-Bold",
            (Family::Sans, true, true) => "Helvetica-BoldOblique",
            (Family::Serif, false, false) => "Times-Roman",
            (Family::Serif, false, true) => "Times-Italic",
            (Family::Serif, true, false) => "Times-Bold",
            (Family::Serif, true, true) => "Times-BoldItalic",
            (Family::Mono, false, false) => "Courier",
            (Family::Mono, false, true) => "Courier-Oblique",
            (Family::Mono, true, false) => "Courier-Bold",
            (Family::Mono, true, true) => "Courier-BoldOblique",
        }
    }
}

/// Content stream of the page plus the resources it refers to
struct Page {
    content: Content,
    height: f64,
    family: Family,
    /// One graphics state per distinct alpha, named `GS<index>`
    alphas: Vec<u8>,
}

impl Page {
    fn new(height: f64, family: Family) -> Self {
        Self {
            content: Content::new(),
            height,
            family,
            alphas: Vec::new(),
        }
    }

    /// Scene points have y growing downwards, PDF user space upwards
    fn flip(&self, p: Point) -> (f32, f32) {
        (p.x as f32, (self.height - p.y) as f32)
    }

    fn set_alpha(&mut self, alpha: u8) {
        if alpha == u8::MAX {
            return;
        }
        let index = match self.alphas.iter().position(|a| *a == alpha) {
            Some(index) => index,
            None => {
                self.alphas.push(alpha);
                self.alphas.len() - 1
            }
        };
        let name = format!("GS{}", index);
        self.content.set_parameters(Name(name.as_bytes()));
    }

    fn trace(&mut self, points: &[Point], close: bool) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let (x, y) = self.flip(*first);
        self.content.move_to(x, y);
        for point in rest {
            let (x, y) = self.flip(*point);
            self.content.line_to(x, y);
        }
        if close {
            self.content.close_path();
        }
    }

    fn trace_circle(&mut self, center: Point, r: f64) {
        let (cx, cy) = self.flip(center);
        let (r, k) = (r as f32, (r * KAPPA) as f32);
        self.content
            .move_to(cx + r, cy)
            .cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r)
            .cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy)
            .cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r)
            .cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy)
            .close_path();
    }

    fn fill_with(&mut self, color: Color, trace: impl FnOnce(&mut Self)) {
        if color.is_transparent() {
            return;
        }
        self.content.save_state();
        self.set_alpha(color.a);
        self.content.set_fill_rgb(unit(color.r), unit(color.g), unit(color.b));
        trace(self);
        self.content.fill_nonzero();
        self.content.restore_state();
    }

    fn stroke_with(&mut self, stroke: Stroke, cap: LineCapStyle, trace: impl FnOnce(&mut Self)) {
        if stroke.width <= 0.0 || stroke.color.is_transparent() {
            return;
        }
        let Color { r, g, b, a } = stroke.color;
        self.content.save_state();
        self.set_alpha(a);
        self.content
            .set_stroke_rgb(unit(r), unit(g), unit(b))
            .set_line_width(stroke.width as f32)
            .set_line_cap(cap)
            .set_line_join(LineJoinStyle::RoundJoin);
        trace(self);
        self.content.stroke();
        self.content.restore_state();
    }

    fn draw(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::Rect {
                rect, fill, stroke, ..
            } => {
                let outline = corners(*rect);
                if let Some(fill) = fill {
                    self.fill_with(*fill, |page| page.trace(&outline, true));
                }
                if let Some(stroke) = stroke {
                    self.stroke_with(*stroke, LineCapStyle::ButtCap, |page| {
                        page.trace(&outline, true)
                    });
                }
            }
            Primitive::Segment {
                from, to, stroke, ..
            } => self.stroke_with(*stroke, LineCapStyle::ButtCap, |page| {
                page.trace(&[*from, *to], false)
            }),
            Primitive::Polyline { points, stroke } => {
                self.stroke_with(*stroke, LineCapStyle::RoundCap, |page| {
                    page.trace(points, false)
                })
            }
            Primitive::Marker {
                center,
                marker,
                size,
                face,
                edge,
            } => match marker_shape(*marker, *center, *size) {
                MarkerShape::Disc { radius } => {
                    self.fill_with(*face, |page| page.trace_circle(*center, radius));
                    self.stroke_with(*edge, LineCapStyle::ButtCap, |page| {
                        page.trace_circle(*center, radius)
                    });
                }
                MarkerShape::Polygon(points) => {
                    self.fill_with(*face, |page| page.trace(&points, true));
                    self.stroke_with(*edge, LineCapStyle::ButtCap, |page| {
                        page.trace(&points, true)
                    });
                }
                MarkerShape::Strokes(strokes) => {
                    for (from, to) in strokes {
                        self.stroke_with(*edge, LineCapStyle::ButtCap, |page| {
                            page.trace(&[from, to], false)
                        });
                    }
                }
            },
            Primitive::Text(text) => self.text(text),
        }
    }

    fn text(&mut self, text: &TextPrimitive) {
        if text.content.is_empty() || text.color.is_transparent() {
            return;
        }
        // Offsets along the reading direction and towards the glyph bottoms
        let along = match text.halign {
            HAlign::Left => 0.0,
            HAlign::Center => -estimate_width(&text.content, text.size) / 2.0,
            HAlign::Right => -estimate_width(&text.content, text.size),
        };
        let down = match text.valign {
            VAlign::Top => text.size * CAP_HEIGHT,
            VAlign::Center => text.size * CAP_HEIGHT / 2.0,
            VAlign::Bottom => 0.0,
        };
        let Point { x, y } = text.position;
        let (origin, matrix) = if text.vertical {
            (Point::new(x + down, y - along), [0.0, 1.0, -1.0, 0.0])
        } else {
            (Point::new(x + along, y + down), [1.0, 0.0, 0.0, 1.0])
        };
        let (ox, oy) = self.flip(origin);
        let font = FONT_NAMES[usize::from(text.bold) * 2 + usize::from(text.italic)];
        let bytes = win_ansi(&text.content);

        let Color { r, g, b, a } = text.color;
        self.content.save_state();
        self.set_alpha(a);
        self.content
            .set_fill_rgb(unit(r), unit(g), unit(b))
            .begin_text()
            .set_font(Name(font), text.size as f32)
            .set_text_matrix([matrix[0], matrix[1], matrix[2], matrix[3], ox, oy])
            .show(Str(&bytes))
            .end_text();
        self.content.restore_state();
    }

    fn finish(self, width: f64, height: f64) -> Vec<u8> {
        let catalog_id = Ref::new(1);
        let tree_id = Ref::new(2);
        let page_id = Ref::new(3);
        let content_id = Ref::new(4);
        let font_ids: Vec<Ref> = (5..9).map(Ref::new).collect();
        let state_ids: Vec<Ref> = (0..self.alphas.len())
            .map(|i| Ref::new(9 + i as i32))
            .collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id).kids([page_id]).count(1);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, width as f32, height as f32));
        page.parent(tree_id);
        page.contents(content_id);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        for (name, id) in FONT_NAMES.iter().zip(&font_ids) {
            fonts.pair(Name(*name), *id);
        }
        fonts.finish();
        if !state_ids.is_empty() {
            let mut states = resources.ext_g_states();
            for (index, id) in state_ids.iter().enumerate() {
                let name = format!("GS{}", index);
                states.pair(Name(name.as_bytes()), *id);
            }
            states.finish();
        }
        resources.finish();
        page.finish();

        for (index, id) in font_ids.iter().enumerate() {
            let base = self.family.base_font(index >= 2, index % 2 == 1);
            pdf.type1_font(*id)
                .base_font(Name(base.as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }
        for (alpha, id) in self.alphas.iter().zip(&state_ids) {
            let alpha = f32::from(*alpha) / 255.0;
            pdf.ext_graphics(*id)
                .non_stroking_alpha(alpha)
                .stroking_alpha(alpha);
        }
        pdf.stream(content_id, &self.content.finish());
        pdf.finish()
    }
}

fn unit(channel: u8) -> f32 {
    f32::from(channel) / 255.0
}

fn corners(rect: BoundingBox) -> [Point; 4] {
    [
        Point::new(rect.x, rect.y),
        Point::new(rect.right(), rect.y),
        Point::new(rect.right(), rect.bottom()),
        Point::new(rect.x, rect.bottom()),
    ]
}

/// Latin-1 bytes, `?` for anything outside it
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Render a figure to a one-page PDF sized in points
pub fn render_pdf(figure: &Figure, transparent: bool) -> Result<Vec<u8>, Error> {
    let scene = build_scene(figure, 72.0, transparent)?;
    let family = Family::from_families(&figure.params().font_family);
    let mut page = Page::new(scene.height, family);

    if let Some(background) = scene.background {
        let sheet = corners(BoundingBox::new(0.0, 0.0, scene.width, scene.height));
        page.fill_with(background, |page| page.trace(&sheet, true));
    }
    for panel in &scene.panels {
        for primitive in &panel.primitives {
            page.draw(primitive);
        }
    }
    for text in &scene.overlay {
        page.text(text);
    }
    Ok(page.finish(scene.width, scene.height))
}
