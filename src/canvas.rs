// filepath: src/canvas.rs
//! Software drawing surface
//!
//! `PixelCanvas` implements [`DrawingSurface`] directly on an RGBA8 byte
//! buffer. Paths are flattened to polylines and filled with the nonzero
//! winding rule at pixel centres; there is no anti-aliasing except for
//! glyph coverage. Text needs a `fontdue` font; without one, measurement
//! falls back to an estimate and text drawing is skipped.

use crate::color::Color;
use crate::surface::{DrawingSurface, TextMetrics};
use crate::text::{font_pixel_size, DEFAULT_FONT};
use fontdue::{Font, FontSettings};
use log::debug;
use std::f32::consts::{PI, TAU};
use std::{fs, path::Path};

/// Average glyph advance as a fraction of the font size, used without a font
const ESTIMATED_ADVANCE: f32 = 0.6;

/// Load a TrueType/OpenType font for use with [`PixelCanvas::with_font`]
pub fn load_font(path: &Path) -> Result<Font, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    let font = Font::from_bytes(bytes, FontSettings::default())
        .map_err(|e| format!("failed to parse font {}: {}", path.display(), e))?;
    Ok(font)
}

#[derive(Debug, Clone, Default)]
struct SubPath {
    points: Vec<(f32, f32)>,
    closed: bool,
}

#[derive(Debug, Clone)]
struct PaintState {
    fill: Color,
    stroke: Color,
    line_width: f32,
    font: String,
    /// Per-pixel coverage, `None` when nothing is clipped
    clip: Option<Vec<u8>>,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: 1.0,
            font: DEFAULT_FONT.to_string(),
            clip: None,
        }
    }
}

/// Drawing surface backed by an RGBA8 pixel buffer
pub struct PixelCanvas<'a> {
    buffer: &'a mut [u8],
    width: u32,
    height: u32,
    font: Option<&'a Font>,
    subpaths: Vec<SubPath>,
    state: PaintState,
    saved: Vec<PaintState>,
}

impl<'a> PixelCanvas<'a> {
    /// Create a new canvas from a raw buffer of `width * height * 4` bytes
    pub fn new(buffer: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            buffer,
            width,
            height,
            font: None,
            subpaths: Vec::new(),
            state: PaintState::default(),
            saved: Vec::new(),
        }
    }

    pub fn with_font(mut self, font: &'a Font) -> Self {
        self.font = Some(font);
        self
    }

    /// Get the width of the canvas
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height of the canvas
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_line_width(&mut self, line_width: f32) {
        self.state.line_width = line_width;
    }

    /// Colour of a single pixel, `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y) * 4;
        let px = self.buffer.get(idx..idx + 4)?;
        Some(Color([px[0], px[1], px[2], px[3]]))
    }

    /// Overwrite every pixel with `color`, ignoring the clip
    pub fn clear(&mut self, color: Color) {
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color.0);
        }
    }

    /// Draw a filled axis-aligned rectangle, respecting the clip
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        // Ensure the rectangle is within bounds
        let x_start = x.max(0) as u32;
        let y_start = y.max(0) as u32;
        let x_end = (x as i64 + width as i64).clamp(0, self.width as i64) as u32;
        let y_end = (y as i64 + height as i64).clamp(0, self.height as i64) as u32;

        if x_end <= x_start || y_end <= y_start {
            return; // Nothing to draw
        }

        let mut mask = self.empty_mask();
        for y in y_start..y_end {
            for x in x_start..x_end {
                mask[self.index(x, y)] = 255;
            }
        }
        self.paint_mask(&mask, color);
    }

    fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn empty_mask(&self) -> Vec<u8> {
        vec![0; self.pixel_count()]
    }

    fn current_point(&self) -> Option<(f32, f32)> {
        self.subpaths
            .last()
            .filter(|sp| !sp.closed)
            .and_then(|sp| sp.points.last().copied())
    }

    /// Point where the next subpath starts after a `close_path`
    fn reopen_point(&self) -> Option<(f32, f32)> {
        self.subpaths
            .last()
            .filter(|sp| sp.closed)
            .and_then(|sp| sp.points.first().copied())
    }

    fn push_point(&mut self, x: f32, y: f32) {
        if let Some(sp) = self.subpaths.last_mut().filter(|sp| !sp.closed) {
            sp.points.push((x, y));
            return;
        }

        let mut points = Vec::new();
        if let Some(start) = self.reopen_point() {
            points.push(start);
        }
        points.push((x, y));
        self.subpaths.push(SubPath {
            points,
            closed: false,
        });
    }

    /// Coverage of the current path under the nonzero winding rule
    fn path_mask(&self) -> Vec<u8> {
        let mut mask = self.empty_mask();
        let edges: Vec<((f32, f32), (f32, f32))> = self
            .subpaths
            .iter()
            .filter(|sp| sp.points.len() > 2)
            .flat_map(|sp| {
                let n = sp.points.len();
                (0..n).map(move |i| (sp.points[i], sp.points[(i + 1) % n]))
            })
            .collect();
        if edges.is_empty() {
            return mask;
        }

        let mut crossings: Vec<(f32, i32)> = Vec::new();
        for row in 0..self.height {
            let cy = row as f32 + 0.5;
            crossings.clear();
            for &((x0, y0), (x1, y1)) in &edges {
                let dir = if y0 <= cy && cy < y1 {
                    1
                } else if y1 <= cy && cy < y0 {
                    -1
                } else {
                    continue;
                };
                let t = (cy - y0) / (y1 - y0);
                crossings.push((x0 + t * (x1 - x0), dir));
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                // Pixel centres inside [left, right)
                let left = (pair[0].0 - 0.5).ceil().max(0.0);
                let right = (pair[1].0 - 0.5).ceil().min(self.width as f32);
                let mut col = left;
                while col < right {
                    mask[self.index(col as u32, row)] = 255;
                    col += 1.0;
                }
            }
        }
        mask
    }

    /// Coverage of the current path's outline at the current line width
    fn stroke_mask(&self) -> Vec<u8> {
        let mut mask = self.empty_mask();
        let half = (self.state.line_width / 2.0).max(0.5);

        for sp in &self.subpaths {
            let n = sp.points.len();
            let segments = if sp.closed { n } else { n.saturating_sub(1) };
            for i in 0..segments {
                let a = sp.points[i];
                let b = sp.points[(i + 1) % n];
                self.stamp_segment(&mut mask, a, b, half);
            }
        }
        mask
    }

    fn stamp_segment(&self, mask: &mut [u8], a: (f32, f32), b: (f32, f32), half: f32) {
        let x_min = (a.0.min(b.0) - half).floor().max(0.0) as u32;
        let y_min = (a.1.min(b.1) - half).floor().max(0.0) as u32;
        let x_max = ((a.0.max(b.0) + half).ceil().max(0.0) as u32).min(self.width);
        let y_max = ((a.1.max(b.1) + half).ceil().max(0.0) as u32).min(self.height);

        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let len_sq = dx * dx + dy * dy;
        for y in y_min..y_max {
            for x in x_min..x_max {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                let t = if len_sq > 0.0 {
                    (((px - a.0) * dx + (py - a.1) * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let (qx, qy) = (a.0 + t * dx - px, a.1 + t * dy - py);
                if qx * qx + qy * qy <= half * half {
                    mask[self.index(x, y)] = 255;
                }
            }
        }
    }

    /// Blend `color` through `mask` and the active clip
    fn paint_mask(&mut self, mask: &[u8], color: Color) {
        let clip = self.state.clip.as_deref();
        for (i, &coverage) in mask.iter().enumerate() {
            if coverage == 0 {
                continue;
            }
            let clip_coverage = clip.map_or(255, |c| c[i]);
            if clip_coverage == 0 {
                continue;
            }
            let alpha = color.a() as u32 * coverage as u32 * clip_coverage as u32 / (255 * 255);
            let Some(dst) = self.buffer.get_mut(i * 4..i * 4 + 4) else {
                break;
            };
            blend(dst, color, alpha);
        }
    }

    fn font_size(&self) -> f32 {
        font_pixel_size(&self.state.font)
    }

    /// Glyph coverage for `text` with its baseline at `(x, y)`, squeezed
    /// horizontally to fit `max_width`
    fn text_mask(&self, font: &Font, text: &str, x: f32, y: f32, max_width: f32) -> Vec<u8> {
        let size = self.font_size();
        let mut mask = self.empty_mask();
        let width = measure_with_font(font, text, size);
        let scale = if max_width > 0.0 && width > max_width {
            max_width / width
        } else {
            1.0
        };

        let mut pen = 0.0f32;
        for ch in text.chars() {
            let (metrics, bitmap) = font.rasterize(ch, size);
            let top = y - (metrics.height as i32 + metrics.ymin) as f32;
            for row in 0..metrics.height {
                let ty = (top + row as f32).floor();
                if ty < 0.0 || ty >= self.height as f32 {
                    continue;
                }
                for col in 0..metrics.width {
                    let coverage = bitmap[row * metrics.width + col];
                    if coverage == 0 {
                        continue;
                    }
                    let gx = pen + metrics.xmin as f32 + col as f32;
                    let tx = (x + gx * scale).floor();
                    if tx < 0.0 || tx >= self.width as f32 {
                        continue;
                    }
                    let idx = self.index(tx as u32, ty as u32);
                    mask[idx] = mask[idx].max(coverage);
                }
            }
            pen += metrics.advance_width;
        }
        mask
    }

    /// Pixels on the boundary of a glyph mask
    fn outline_mask(&self, mask: &[u8]) -> Vec<u8> {
        let (w, h) = (self.width as usize, self.height as usize);
        let inside = |x: usize, y: usize| mask[y * w + x] >= 128;
        let mut outline = self.empty_mask();
        for y in 0..h {
            for x in 0..w {
                if !inside(x, y) {
                    continue;
                }
                let edge = x == 0
                    || y == 0
                    || x + 1 == w
                    || y + 1 == h
                    || !inside(x - 1, y)
                    || !inside(x + 1, y)
                    || !inside(x, y - 1)
                    || !inside(x, y + 1);
                if edge {
                    outline[y * w + x] = 255;
                }
            }
        }
        outline
    }
}

fn measure_with_font(font: &Font, text: &str, size: f32) -> f32 {
    text.chars()
        .map(|ch| font.metrics(ch, size).advance_width)
        .sum()
}

/// Source-over blend of `color` at `alpha` (0..=255) into an RGBA pixel
fn blend(dst: &mut [u8], color: Color, alpha: u32) {
    let inv = 255 - alpha;
    for c in 0..3 {
        dst[c] = ((color.0[c] as u32 * alpha + dst[c] as u32 * inv) / 255) as u8;
    }
    dst[3] = (alpha + dst[3] as u32 * inv / 255) as u8;
}

impl DrawingSurface for PixelCanvas<'_> {
    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32) {
        let raw = end_angle - start_angle;
        let sweep = if raw >= TAU { TAU } else { raw.rem_euclid(TAU) };
        let steps = ((sweep * radius.abs() / 2.0).ceil())
            .max((sweep / (PI / 16.0)).ceil())
            .clamp(1.0, 512.0) as usize;

        for i in 0..=steps {
            let angle = start_angle + sweep * i as f32 / steps as f32;
            self.push_point(cx + radius * angle.cos(), cy + radius * angle.sin());
        }
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push_point(x, y);
    }

    fn close_path(&mut self) {
        if self.current_point().is_some() {
            if let Some(sp) = self.subpaths.last_mut() {
                sp.closed = true;
            }
        }
    }

    fn clip(&mut self) {
        let path = self.path_mask();
        let clip = match self.state.clip.take() {
            Some(existing) => existing
                .iter()
                .zip(&path)
                .map(|(&a, &b)| ((a as u32 * b as u32) / 255) as u8)
                .collect(),
            None => path,
        };
        self.state.clip = Some(clip);
    }

    fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn fill(&mut self) {
        let mask = self.path_mask();
        self.paint_mask(&mask, self.state.fill);
    }

    fn stroke(&mut self) {
        let mask = self.stroke_mask();
        self.paint_mask(&mask, self.state.stroke);
    }

    fn assign_fill_style(&mut self, color: Color) {
        self.state.fill = color;
    }

    fn assign_stroke_style(&mut self, color: Color) {
        self.state.stroke = color;
    }

    fn set_font(&mut self, font: &str) {
        self.state.font = font.to_string();
    }

    fn measure_text(&mut self, text: &str) -> TextMetrics {
        let size = self.font_size();
        let width = match self.font {
            Some(font) => measure_with_font(font, text, size),
            None => text.chars().count() as f32 * size * ESTIMATED_ADVANCE,
        };
        TextMetrics { width }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, max_width: f32) {
        let Some(font) = self.font else {
            debug!("PixelCanvas: no font loaded, skipping fill_text({:?})", text);
            return;
        };
        let mask = self.text_mask(font, text, x, y, max_width);
        self.paint_mask(&mask, self.state.fill);
    }

    fn stroke_text(&mut self, text: &str, x: f32, y: f32, max_width: f32) {
        let Some(font) = self.font else {
            debug!("PixelCanvas: no font loaded, skipping stroke_text({:?})", text);
            return;
        };
        let glyphs = self.text_mask(font, text, x, y, max_width);
        let outline = self.outline_mask(&glyphs);
        self.paint_mask(&outline, self.state.stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{fill_arrow_circle, fill_round_rect, stroke_round_rect, ArrowCircle};
    use crate::surface::Rect;
    use crate::text::{fill_auto_wrap_text, WrapOptions};

    const RED: Color = Color::rgb(255, 0, 0);

    static TEST_FONT: &[u8] = include_bytes!("../assets/DejaVuSans-Bold.ttf");

    fn test_font() -> Font {
        Font::from_bytes(TEST_FONT, FontSettings::default()).unwrap()
    }

    fn buffer(w: u32, h: u32) -> Vec<u8> {
        vec![0; (w * h * 4) as usize]
    }

    #[test]
    fn fill_rect_clamps_to_bounds() {
        let mut buf = buffer(4, 4);
        let mut canvas = PixelCanvas::new(&mut buf, 4, 4);
        canvas.fill_rect(-2, 2, 10, 10, RED);
        assert_eq!(canvas.pixel(0, 1), Some(Color::TRANSPARENT));
        assert_eq!(canvas.pixel(3, 3), Some(RED));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn far_offset_rect_does_not_overflow() {
        let mut buf = buffer(2, 2);
        let mut canvas = PixelCanvas::new(&mut buf, 2, 2);
        canvas.fill_rect(i32::MAX - 1, 0, 10, 1, Color::WHITE);
        canvas.fill_rect(0, i32::MAX, 1, u32::MAX, Color::WHITE);
        canvas.fill_rect(-5, 0, u32::MAX, 1, RED);

        assert_eq!(canvas.pixel(0, 0), Some(RED));
        assert_eq!(canvas.pixel(1, 0), Some(RED));
        assert_eq!(canvas.pixel(1, 1), Some(Color::TRANSPARENT));
    }

    #[test]
    fn rounded_rect_leaves_corners_empty() {
        let mut buf = buffer(20, 20);
        let mut canvas = PixelCanvas::new(&mut buf, 20, 20);
        assert!(fill_round_rect(&mut canvas, Rect::new(0.0, 0.0, 20.0, 20.0), 8.0, RED));

        assert_eq!(canvas.pixel(10, 10), Some(RED));
        assert_eq!(canvas.pixel(10, 0), Some(RED));
        for (x, y) in [(0, 0), (19, 0), (0, 19), (19, 19)] {
            assert_eq!(canvas.pixel(x, y), Some(Color::TRANSPARENT), "corner {x},{y}");
        }
    }

    #[test]
    fn rounded_rect_clip_does_not_leak() {
        let mut buf = buffer(20, 20);
        let mut canvas = PixelCanvas::new(&mut buf, 20, 20);
        fill_round_rect(&mut canvas, Rect::new(0.0, 0.0, 20.0, 20.0), 8.0, RED);

        canvas.fill_rect(0, 0, 20, 20, Color::WHITE);
        assert_eq!(canvas.pixel(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn stroke_outlines_without_filling() {
        let mut buf = buffer(30, 30);
        let mut canvas = PixelCanvas::new(&mut buf, 30, 30);
        canvas.set_line_width(2.0);
        assert!(stroke_round_rect(&mut canvas, Rect::new(5.0, 5.0, 20.0, 20.0), 4.0, RED));

        assert_eq!(canvas.pixel(15, 15), Some(Color::TRANSPARENT));
        assert_eq!(canvas.pixel(15, 5), Some(RED));
    }

    #[test]
    fn arrow_circle_fills_nub() {
        let mut buf = buffer(60, 40);
        let mut canvas = PixelCanvas::new(&mut buf, 60, 40);
        fill_arrow_circle(&mut canvas, &ArrowCircle::new(20.0, 20.0, 10.0), RED);

        assert_eq!(canvas.pixel(20, 20), Some(RED));
        // Tip of the nub reaches x = 50
        assert_eq!(canvas.pixel(45, 20), Some(RED));
        assert_eq!(canvas.pixel(45, 10), Some(Color::TRANSPARENT));
    }

    #[test]
    fn half_transparent_fill_blends() {
        let mut buf = buffer(1, 1);
        let mut canvas = PixelCanvas::new(&mut buf, 1, 1);
        canvas.clear(Color::BLACK);
        canvas.fill_rect(0, 0, 1, 1, Color::rgba(255, 255, 255, 51));
        assert_eq!(canvas.pixel(0, 0), Some(Color::rgba(51, 51, 51, 255)));
    }

    #[test]
    fn measures_without_font() {
        let mut buf = buffer(1, 1);
        let mut canvas = PixelCanvas::new(&mut buf, 1, 1);
        canvas.set_font("10px sans-serif");
        assert_eq!(canvas.measure_text("abc").width, 18.0);
    }

    #[test]
    fn text_without_font_draws_nothing() {
        let mut buf = buffer(50, 50);
        let mut canvas = PixelCanvas::new(&mut buf, 50, 50);
        let info = fill_auto_wrap_text(&mut canvas, "hello world", 0.0, 20.0, 30.0, &WrapOptions::default());
        assert!(info.rows > 1);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn missing_font_file_is_an_error() {
        assert!(load_font(Path::new("/nonexistent/font.ttf")).is_err());
    }

    #[test]
    fn font_measurement_sums_advances() {
        let font = test_font();
        let mut buf = buffer(1, 1);
        let mut canvas = PixelCanvas::new(&mut buf, 1, 1).with_font(&font);
        canvas.set_font("32px DejaVu Sans");

        let one = canvas.measure_text("H").width;
        let two = canvas.measure_text("HH").width;
        assert!(one > 0.0);
        assert!((two - 2.0 * one).abs() < 1e-3);

        canvas.set_font("16px DejaVu Sans");
        assert!(canvas.measure_text("H").width < one);
    }

    #[test]
    fn fill_text_sits_on_baseline_and_fits_max_width() {
        let font = test_font();
        let (w, h) = (200, 60);
        let mut buf = buffer(w, h);
        let mut canvas = PixelCanvas::new(&mut buf, w, h).with_font(&font);
        canvas.set_font("32px DejaVu Sans");
        assert!(canvas.measure_text("HHHHHH").width > 50.0);

        canvas.assign_fill_style(RED);
        canvas.fill_text("HHHHHH", 10.0, 40.0, 50.0);

        let painted: Vec<(u32, u32)> = (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) != Some(Color::TRANSPARENT))
            .collect();
        assert!(!painted.is_empty());
        for &(x, y) in &painted {
            assert!((10..60).contains(&x), "pixel {x},{y} outside max width");
            assert!((8..=40).contains(&y), "pixel {x},{y} off the baseline");
        }
        assert!(painted.iter().any(|&(_, y)| y >= 36));
    }

    #[test]
    fn stroke_text_leaves_glyph_interior_untouched() {
        let font = test_font();
        let (w, h) = (80, 80);
        let mut buf = buffer(w, h);
        let mut canvas = PixelCanvas::new(&mut buf, w, h).with_font(&font);
        canvas.set_font("64px DejaVu Sans");

        let glyphs = canvas.text_mask(&font, "I", 10.0, 70.0, 100.0);
        let inside = |x: u32, y: u32| glyphs[canvas.index(x, y)] >= 128;
        let interior: Vec<(u32, u32)> = (1..h - 1)
            .flat_map(|y| (1..w - 1).map(move |x| (x, y)))
            .filter(|&(x, y)| {
                inside(x, y)
                    && inside(x - 1, y)
                    && inside(x + 1, y)
                    && inside(x, y - 1)
                    && inside(x, y + 1)
            })
            .collect();
        assert!(!interior.is_empty());

        canvas.assign_stroke_style(RED);
        canvas.stroke_text("I", 10.0, 70.0, 100.0);

        for &(x, y) in &interior {
            assert_eq!(canvas.pixel(x, y), Some(Color::TRANSPARENT), "interior {x},{y}");
        }
        assert!((0..h).any(|y| (0..w).any(|x| canvas.pixel(x, y) == Some(RED))));
    }
}
