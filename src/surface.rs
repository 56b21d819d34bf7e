// filepath: src/surface.rs
//! Drawing surface interface
//!
//! This file defines the trait every drawing surface must implement to be
//! usable with the helpers in this crate, plus the small pieces of shared
//! machinery (paint-state scoping, colour application) the helpers build on.

use crate::color::Color;
use std::ops::{Deref, DerefMut};

/// Axis-aligned rectangle in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Result of measuring a string with the surface's current font
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub width: f32,
}

/// How a surface expects fill/stroke colours to be applied.
///
/// Some canvas implementations expose setter methods (`setFillStyle`),
/// others a plain style property (`fillStyle = ...`). A surface declares its
/// convention once through [`DrawingSurface::color_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorApplicationMode {
    MethodStyle,
    #[default]
    PropertyStyle,
}

/// Canvas-style immediate-mode drawing surface
pub trait DrawingSurface {
    /// Start a new, empty path
    fn begin_path(&mut self);

    /// Append a clockwise circular arc around `(cx, cy)`
    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32);

    fn line_to(&mut self, x: f32, y: f32);

    fn close_path(&mut self);

    /// Intersect the current clip region with the current path
    fn clip(&mut self);

    /// Push the paint state (colours, font, clip) onto the state stack
    fn save(&mut self);

    /// Pop the most recently saved paint state
    fn restore(&mut self);

    fn fill(&mut self);

    fn stroke(&mut self);

    /// Colour convention of this surface
    fn color_mode(&self) -> ColorApplicationMode {
        ColorApplicationMode::PropertyStyle
    }

    /// Method-style fill colour setter
    fn set_fill_style(&mut self, color: Color) {
        self.assign_fill_style(color);
    }

    /// Method-style stroke colour setter
    fn set_stroke_style(&mut self, color: Color) {
        self.assign_stroke_style(color);
    }

    /// Property-style fill colour assignment
    fn assign_fill_style(&mut self, color: Color);

    /// Property-style stroke colour assignment
    fn assign_stroke_style(&mut self, color: Color);

    /// Set the font descriptor (e.g. `"20px sans-serif"`) used for text
    fn set_font(&mut self, font: &str);

    fn measure_text(&mut self, text: &str) -> TextMetrics;

    fn fill_text(&mut self, text: &str, x: f32, y: f32, max_width: f32);

    fn stroke_text(&mut self, text: &str, x: f32, y: f32, max_width: f32);
}

/// Apply a fill colour using whichever convention the surface declares
pub fn apply_fill_color<S: DrawingSurface + ?Sized>(surface: &mut S, color: Color) {
    match surface.color_mode() {
        ColorApplicationMode::MethodStyle => surface.set_fill_style(color),
        ColorApplicationMode::PropertyStyle => surface.assign_fill_style(color),
    }
}

/// Apply a stroke colour using whichever convention the surface declares
pub fn apply_stroke_color<S: DrawingSurface + ?Sized>(surface: &mut S, color: Color) {
    match surface.color_mode() {
        ColorApplicationMode::MethodStyle => surface.set_stroke_style(color),
        ColorApplicationMode::PropertyStyle => surface.assign_stroke_style(color),
    }
}

/// Saved paint state that is restored when dropped.
///
/// Derefs to the wrapped surface so drawing continues through the guard.
pub struct PaintScope<'a, S: DrawingSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: DrawingSurface + ?Sized> PaintScope<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: DrawingSurface + ?Sized> Deref for PaintScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: DrawingSurface + ?Sized> DerefMut for PaintScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: DrawingSurface + ?Sized> Drop for PaintScope<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}
