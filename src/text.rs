// filepath: src/text.rs
//! Wrapped text drawing
//!
//! Greedy single-axis line wrapping driven by the surface's own text
//! measurement, with optional truncation after a maximum number of lines.
//!
//! Offsets produced here count Unicode scalar values, not bytes.

use crate::surface::{DrawingSurface, PaintScope};
use log::debug;
use std::borrow::Cow;

pub const DEFAULT_LINE_HEIGHT: f32 = 30.0;
pub const DEFAULT_FONT: &str = "20px PingFang-SC-Heavy";
/// Appended to truncated text
pub const ELLIPSIS: &str = "...";
/// Canvas default when a font descriptor names no pixel size
pub const DEFAULT_FONT_SIZE: f32 = 10.0;

/// Extract the pixel size from a CSS-like font descriptor such as
/// `"bold 20px PingFang-SC-Heavy"`
pub fn font_pixel_size(descriptor: &str) -> f32 {
    descriptor
        .split_whitespace()
        .filter_map(|token| token.strip_suffix("px"))
        .find_map(|size| size.parse::<f32>().ok())
        .filter(|size| size.is_finite() && *size > 0.0)
        .unwrap_or(DEFAULT_FONT_SIZE)
}

/// Layout options for [`fill_auto_wrap_text`] and [`stroke_auto_wrap_text`]
#[derive(Debug, Clone, PartialEq)]
pub struct WrapOptions {
    pub line_height: f32,
    pub font: String,
    /// Maximum number of visible lines; overflow is replaced by an ellipsis.
    /// `None` and `Some(0)` both mean unlimited.
    pub lines: Option<usize>,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            line_height: DEFAULT_LINE_HEIGHT,
            font: DEFAULT_FONT.to_string(),
            lines: None,
        }
    }
}

impl WrapOptions {
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    pub fn with_lines(mut self, lines: usize) -> Self {
        self.lines = Some(lines);
        self
    }

    fn line_limit(&self) -> Option<usize> {
        self.lines.filter(|&n| n > 0)
    }
}

/// Where the text ended up after drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapInfo {
    pub x: f32,
    /// Baseline of the line after the last one drawn
    pub y: f32,
    /// Number of lines drawn
    pub rows: usize,
}

/// Character-offset view over a string
struct CharOffsets<'a> {
    text: &'a str,
    bytes: Vec<usize>,
}

impl<'a> CharOffsets<'a> {
    fn new(text: &'a str) -> Self {
        let bytes = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { text, bytes }
    }

    fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    /// Characters between two offsets. Offsets past the end are clamped
    /// and reversed bounds are swapped.
    fn substring(&self, start: usize, end: usize) -> &'a str {
        let start = start.min(self.len());
        let end = end.min(self.len());
        let (start, end) = if start > end { (end, start) } else { (start, end) };
        &self.text[self.bytes[start]..self.bytes[end]]
    }
}

/// Compute greedy line-break offsets for `text`.
///
/// The result always starts with `0` and ends with the text length. A line
/// feed or carriage return (other than the final character) ends its line,
/// and a pending line whose measured width exceeds `width_limit` is broken
/// before the current character. Both rules are checked at every character
/// and may fire together; the trailing length is appended even if it repeats
/// the previous entry.
///
/// Sets the surface font to `font` as a side effect.
pub fn text_wrap<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    width_limit: f32,
    text: &str,
    font: &str,
) -> Vec<usize> {
    let mut breaks = vec![0];
    if text.is_empty() {
        return breaks;
    }

    surface.set_font(font);
    let offsets = CharOffsets::new(text);
    let last = offsets.len() - 1;

    for (index, ch) in text.chars().enumerate() {
        let line_start = breaks[breaks.len() - 1];
        let width = surface
            .measure_text(offsets.substring(line_start, index))
            .width;

        if matches!(ch, '\r' | '\n') && index != last {
            breaks.push(index + 1);
        }
        if width > width_limit {
            breaks.push(index);
        }
    }

    breaks.push(offsets.len());
    breaks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextPaint {
    Fill,
    Stroke,
}

/// Draw `text` wrapped to `width_limit` with filled glyphs.
///
/// Lines are placed at `y`, `y + line_height`, ... When `options.lines` is
/// exceeded the last visible line ends with [`ELLIPSIS`].
pub fn fill_auto_wrap_text<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    text: &str,
    x: f32,
    y: f32,
    width_limit: f32,
    options: &WrapOptions,
) -> WrapInfo {
    auto_wrap_text(surface, text, x, y, width_limit, options, TextPaint::Fill)
}

/// Same as [`fill_auto_wrap_text`] but outlines the glyphs
pub fn stroke_auto_wrap_text<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    text: &str,
    x: f32,
    y: f32,
    width_limit: f32,
    options: &WrapOptions,
) -> WrapInfo {
    auto_wrap_text(surface, text, x, y, width_limit, options, TextPaint::Stroke)
}

fn auto_wrap_text<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    text: &str,
    x: f32,
    y: f32,
    width_limit: f32,
    options: &WrapOptions,
    paint: TextPaint,
) -> WrapInfo {
    let mut scope = PaintScope::new(surface);
    let breaks = text_wrap(&mut *scope, width_limit, text, &options.font);
    let limit = options.line_limit();

    let display: Cow<'_, str> = match limit {
        Some(n) if breaks.len() - 1 > n => {
            let end = breaks[n].saturating_sub(1);
            let head = CharOffsets::new(text).substring(0, end);
            Cow::Owned(format!("{}{}", head, ELLIPSIS))
        }
        _ => Cow::Borrowed(text),
    };

    // The last kept offset is pushed past the ellipsis so the final line
    // includes it.
    let kept: Vec<usize> = match limit {
        Some(n) => breaks
            .iter()
            .take(n.saturating_add(1))
            .enumerate()
            .map(|(i, &b)| if i == n { b + 2 } else { b })
            .collect(),
        None => breaks.clone(),
    };

    if breaks.len() > 1 {
        let offsets = CharOffsets::new(&display);
        for (row, pair) in kept.windows(2).enumerate() {
            let line = offsets.substring(pair[0], pair[1]);
            let line_y = y + options.line_height * row as f32;
            match paint {
                TextPaint::Fill => scope.fill_text(line, x, line_y, width_limit),
                TextPaint::Stroke => scope.stroke_text(line, x, line_y, width_limit),
            }
        }
    }

    let rows = kept.len() - 1;
    debug!(
        "auto_wrap_text: {} breaks, {} rows drawn ({:?})",
        breaks.len(),
        rows,
        paint
    );

    WrapInfo {
        x,
        y: y + options.line_height * rows as f32,
        rows,
    }
}
