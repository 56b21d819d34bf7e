// filepath: src/recording.rs
//! Recording drawing surface
//!
//! A surface that performs no rasterisation and instead keeps every call it
//! receives as a [`DrawCall`]. Useful as a display list for replaying onto
//! another surface, and as the surface the crate's tests assert against.

use crate::color::Color;
use crate::surface::{ColorApplicationMode, DrawingSurface, TextMetrics};
use crate::text::{font_pixel_size, DEFAULT_FONT};

/// Average glyph advance as a fraction of the font size
const ESTIMATED_ADVANCE: f32 = 0.6;

/// A single recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    BeginPath,
    Arc {
        cx: f32,
        cy: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
    LineTo {
        x: f32,
        y: f32,
    },
    ClosePath,
    Clip,
    Save,
    Restore,
    Fill,
    Stroke,
    SetFillStyle(Color),
    SetStrokeStyle(Color),
    AssignFillStyle(Color),
    AssignStrokeStyle(Color),
    SetFont(String),
    FillText {
        text: String,
        x: f32,
        y: f32,
        max_width: f32,
    },
    StrokeText {
        text: String,
        x: f32,
        y: f32,
        max_width: f32,
    },
}

pub struct RecordingSurface {
    calls: Vec<DrawCall>,
    color_mode: ColorApplicationMode,
    char_advance: Option<f32>,
    font: String,
    font_stack: Vec<String>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            color_mode: ColorApplicationMode::PropertyStyle,
            char_advance: None,
            font: DEFAULT_FONT.to_string(),
            font_stack: Vec::new(),
        }
    }

    /// Declare which colour convention this surface reports
    pub fn with_color_mode(mut self, mode: ColorApplicationMode) -> Self {
        self.color_mode = mode;
        self
    }

    /// Measure every character as exactly `advance` wide, ignoring the font
    pub fn with_char_advance(mut self, advance: f32) -> Self {
        self.char_advance = Some(advance);
        self
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    /// Text passed to `fill_text` or `stroke_text`, in call order
    pub fn drawn_text(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::FillText { text, .. } | DrawCall::StrokeText { text, .. } => {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// Replay the recorded calls onto another surface
    pub fn replay<S: DrawingSurface + ?Sized>(&self, target: &mut S) {
        for call in &self.calls {
            match call {
                DrawCall::BeginPath => target.begin_path(),
                DrawCall::Arc {
                    cx,
                    cy,
                    radius,
                    start_angle,
                    end_angle,
                } => target.arc(*cx, *cy, *radius, *start_angle, *end_angle),
                DrawCall::LineTo { x, y } => target.line_to(*x, *y),
                DrawCall::ClosePath => target.close_path(),
                DrawCall::Clip => target.clip(),
                DrawCall::Save => target.save(),
                DrawCall::Restore => target.restore(),
                DrawCall::Fill => target.fill(),
                DrawCall::Stroke => target.stroke(),
                DrawCall::SetFillStyle(c) => target.set_fill_style(*c),
                DrawCall::SetStrokeStyle(c) => target.set_stroke_style(*c),
                DrawCall::AssignFillStyle(c) => target.assign_fill_style(*c),
                DrawCall::AssignStrokeStyle(c) => target.assign_stroke_style(*c),
                DrawCall::SetFont(font) => target.set_font(font),
                DrawCall::FillText {
                    text,
                    x,
                    y,
                    max_width,
                } => target.fill_text(text, *x, *y, *max_width),
                DrawCall::StrokeText {
                    text,
                    x,
                    y,
                    max_width,
                } => target.stroke_text(text, *x, *y, *max_width),
            }
        }
    }
}

impl DrawingSurface for RecordingSurface {
    fn begin_path(&mut self) {
        self.calls.push(DrawCall::BeginPath);
    }

    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32) {
        self.calls.push(DrawCall::Arc {
            cx,
            cy,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.calls.push(DrawCall::LineTo { x, y });
    }

    fn close_path(&mut self) {
        self.calls.push(DrawCall::ClosePath);
    }

    fn clip(&mut self) {
        self.calls.push(DrawCall::Clip);
    }

    fn save(&mut self) {
        self.font_stack.push(self.font.clone());
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        if let Some(font) = self.font_stack.pop() {
            self.font = font;
        }
        self.calls.push(DrawCall::Restore);
    }

    fn fill(&mut self) {
        self.calls.push(DrawCall::Fill);
    }

    fn stroke(&mut self) {
        self.calls.push(DrawCall::Stroke);
    }

    fn color_mode(&self) -> ColorApplicationMode {
        self.color_mode
    }

    fn set_fill_style(&mut self, color: Color) {
        self.calls.push(DrawCall::SetFillStyle(color));
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.calls.push(DrawCall::SetStrokeStyle(color));
    }

    fn assign_fill_style(&mut self, color: Color) {
        self.calls.push(DrawCall::AssignFillStyle(color));
    }

    fn assign_stroke_style(&mut self, color: Color) {
        self.calls.push(DrawCall::AssignStrokeStyle(color));
    }

    fn set_font(&mut self, font: &str) {
        self.font = font.to_string();
        self.calls.push(DrawCall::SetFont(font.to_string()));
    }

    fn measure_text(&mut self, text: &str) -> TextMetrics {
        let advance = self
            .char_advance
            .unwrap_or_else(|| font_pixel_size(&self.font) * ESTIMATED_ADVANCE);
        TextMetrics {
            width: text.chars().count() as f32 * advance,
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, max_width: f32) {
        self.calls.push(DrawCall::FillText {
            text: text.to_string(),
            x,
            y,
            max_width,
        });
    }

    fn stroke_text(&mut self, text: &str, x: f32, y: f32, max_width: f32) {
        self.calls.push(DrawCall::StrokeText {
            text: text.to_string(),
            x,
            y,
            max_width,
        });
    }
}
