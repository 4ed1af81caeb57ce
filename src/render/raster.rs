//! Software rasterizer producing an RGBA image from a figure scene

use image::{Rgba, RgbaImage};

use crate::figure::{Color, Figure, HAlign, VAlign};
use crate::layout::{BoundingBox, Point};
use crate::Error;

use super::font;
use super::scene::{build_scene, marker_shape, MarkerShape, Primitive, Stroke, TextPrimitive};

/// Cap height of the bitmap font as a fraction of the font size
const CAP_HEIGHT: f64 = 0.72;
/// Horizontal shear of italic glyphs per glyph row
const ITALIC_SLANT: f64 = 0.2;
/// Largest image [`render_raster`] allocates, in pixels
pub const MAX_PIXELS: u64 = 1 << 27;

/// A drawing surface with source-over blending
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Option<Color>) -> Self {
        let fill = background
            .map(|c| Rgba([c.r, c.g, c.b, c.a]))
            .unwrap_or(Rgba([0, 0, 0, 0]));
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), fill),
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn blend(&mut self, x: i64, y: i64, color: Color) {
        let (width, height) = self.image.dimensions();
        if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
            return;
        }
        let src_a = color.opacity();
        if src_a <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let dst_a = f64::from(dst.0[3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let mix = |s: u8, d: u8| -> u8 {
            let v = (f64::from(s) * src_a + f64::from(d) * dst_a * (1.0 - src_a)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        *dst = Rgba([
            mix(color.r, dst.0[0]),
            mix(color.g, dst.0[1]),
            mix(color.b, dst.0[2]),
            (out_a * 255.0).round() as u8,
        ]);
    }

    /// Pixel rows and columns whose centers fall inside `[lo, hi)`
    fn span(lo: f64, hi: f64) -> std::ops::Range<i64> {
        ((lo - 0.5).ceil() as i64)..((hi - 0.5).ceil() as i64)
    }

    pub fn fill_rect(&mut self, rect: BoundingBox, color: Color) {
        for y in Self::span(rect.y, rect.bottom()) {
            for x in Self::span(rect.x, rect.right()) {
                self.blend(x, y, color);
            }
        }
    }

    pub fn stroke_rect(&mut self, rect: BoundingBox, stroke: Stroke) {
        let corners = [
            Point::new(rect.x, rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.right(), rect.bottom()),
            Point::new(rect.x, rect.bottom()),
            Point::new(rect.x, rect.y),
        ];
        for pair in corners.windows(2) {
            self.line(pair[0], pair[1], stroke);
        }
    }

    /// Thick line: every pixel whose center is within half the width of the segment
    pub fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        let half = stroke.width.max(1.0) / 2.0;
        let xs = Self::span(from.x.min(to.x) - half, from.x.max(to.x) + half);
        let ys = Self::span(from.y.min(to.y) - half, from.y.max(to.y) + half);
        for y in ys {
            for x in xs.clone() {
                let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if distance_to_segment(p, from, to) <= half {
                    self.blend(x, y, stroke.color);
                }
            }
        }
    }

    pub fn polyline(&mut self, points: &[Point], stroke: Stroke) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], stroke);
        }
    }

    pub fn circle(&mut self, center: Point, radius: f64, fill: Color, edge: Stroke) {
        let half = edge.width / 2.0;
        let reach = radius + half;
        for y in Self::span(center.y - reach, center.y + reach) {
            for x in Self::span(center.x - reach, center.x + reach) {
                let dx = x as f64 + 0.5 - center.x;
                let dy = y as f64 + 0.5 - center.y;
                let d = (dx * dx + dy * dy).sqrt();
                if edge.width > 0.0 && (d - radius).abs() <= half.max(0.5) {
                    self.blend(x, y, edge.color);
                } else if d < radius {
                    self.blend(x, y, fill);
                }
            }
        }
    }

    /// Fill a polygon by the even-odd rule over pixel centers
    pub fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if points.len() < 3 {
            return;
        }
        let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for p in points {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        for y in Self::span(y0, y1) {
            for x in Self::span(x0, x1) {
                if contains(points, Point::new(x as f64 + 0.5, y as f64 + 0.5)) {
                    self.blend(x, y, color);
                }
            }
        }
    }

    pub fn text(&mut self, text: &TextPrimitive) {
        let cell = (text.size * CAP_HEIGHT / font::GLYPH_HEIGHT as f64).max(1.0);
        let width = font::text_cells(&text.content) as f64 * cell;
        let height = font::GLYPH_HEIGHT as f64 * cell;
        let u0 = match text.halign {
            HAlign::Left => 0.0,
            HAlign::Center => -width / 2.0,
            HAlign::Right => -width,
        };
        let v0 = match text.valign {
            VAlign::Top => 0.0,
            VAlign::Center => -height / 2.0,
            VAlign::Bottom => -height,
        };
        let weight = if text.bold { 2 } else { 1 };

        for (i, c) in text.content.chars().enumerate() {
            let glyph = font::glyph(c);
            for col in 0..font::GLYPH_WIDTH {
                for row in 0..font::GLYPH_HEIGHT {
                    if !font::is_set(&glyph, col, row) {
                        continue;
                    }
                    let slant = if text.italic {
                        (font::GLYPH_HEIGHT - 1 - row) as f64 * cell * ITALIC_SLANT
                    } else {
                        0.0
                    };
                    for extra in 0..weight {
                        let u = u0
                            + ((i * font::ADVANCE + col) as f64 + extra as f64 * 0.5) * cell
                            + slant;
                        let v = v0 + row as f64 * cell;
                        let rect = if text.vertical {
                            BoundingBox::new(
                                text.position.x + v,
                                text.position.y - u - cell,
                                cell,
                                cell,
                            )
                        } else {
                            BoundingBox::new(text.position.x + u, text.position.y + v, cell, cell)
                        };
                        self.fill_rect(rect, text.color);
                    }
                }
            }
        }
    }

    fn draw(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::Rect {
                rect, fill, stroke, ..
            } => {
                if let Some(fill) = fill {
                    self.fill_rect(*rect, *fill);
                }
                if let Some(stroke) = stroke {
                    self.stroke_rect(*rect, *stroke);
                }
            }
            Primitive::Segment {
                from, to, stroke, ..
            } => self.line(*from, *to, *stroke),
            Primitive::Polyline { points, stroke } => self.polyline(points, *stroke),
            Primitive::Marker {
                center,
                marker,
                size,
                face,
                edge,
            } => match marker_shape(*marker, *center, *size) {
                MarkerShape::Disc { radius } => self.circle(*center, radius, *face, *edge),
                MarkerShape::Polygon(points) => {
                    self.fill_polygon(&points, *face);
                    let mut closed = points.clone();
                    closed.push(points[0]);
                    self.polyline(&closed, *edge);
                }
                MarkerShape::Strokes(strokes) => {
                    for (from, to) in strokes {
                        self.line(from, to, *edge);
                    }
                }
            },
            Primitive::Text(text) => self.text(text),
        }
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

fn contains(polygon: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Pixel dimensions of `figure` at `dpi`
///
/// Fails for empty images and for images above [`MAX_PIXELS`].
pub fn raster_size(figure: &Figure, dpi: f64) -> Result<(u32, u32), Error> {
    let width = (figure.size.0 * dpi).round();
    let height = (figure.size.1 * dpi).round();
    let fits = width >= 1.0
        && height >= 1.0
        && width <= f64::from(u32::MAX)
        && height <= f64::from(u32::MAX)
        && width * height <= MAX_PIXELS as f64;
    if !fits {
        return Err(Error::ImageSize { width, height });
    }
    Ok((width as u32, height as u32))
}

/// Rasterize a figure at `dpi`
pub fn render_raster(figure: &Figure, dpi: f64, transparent: bool) -> Result<RgbaImage, Error> {
    let (width, height) = raster_size(figure, dpi)?;
    let scene = build_scene(figure, dpi, transparent)?;
    let mut canvas = Canvas::new(width, height, scene.background);
    for panel in &scene.panels {
        for primitive in &panel.primitives {
            canvas.draw(primitive);
        }
    }
    for text in &scene.overlay {
        canvas.text(text);
    }
    Ok(canvas.into_image())
}
