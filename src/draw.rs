// filepath: src/draw.rs
//! Shape helpers
//!
//! Rounded rectangles and arrow-notched circles, built from the primitive
//! path calls of a [`DrawingSurface`]. All paint-state changes happen inside
//! a [`PaintScope`] so nothing leaks to later drawing.

use crate::color::Color;
use crate::surface::{apply_fill_color, apply_stroke_color, DrawingSurface, PaintScope, Rect};
use log::debug;
use std::f32::consts::PI;

pub const DEFAULT_CORNER_RADIUS: f32 = 10.0;
pub const DEFAULT_ARROW_ANGLE: f32 = 0.1;
pub const DEFAULT_ARROW_LENGTH: f32 = 20.0;

/// Whether a corner radius fits inside the rectangle
pub fn radius_fits(rect: &Rect, radius: f32) -> bool {
    2.0 * radius <= rect.width && 2.0 * radius <= rect.height
}

/// Trace a rounded rectangle clockwise starting at the bottom-right corner,
/// then clip to it.
///
/// The clip stays active until the enclosing `save`/`restore` pair ends.
/// Callers must ensure [`radius_fits`] holds.
pub fn round_rect_path<S: DrawingSurface + ?Sized>(surface: &mut S, rect: Rect, radius: f32) {
    let Rect {
        x,
        y,
        width,
        height,
    } = rect;

    surface.begin_path();
    // Bottom-right corner, 0 to PI/2
    surface.arc(x + width - radius, y + height - radius, radius, 0.0, PI / 2.0);
    surface.line_to(x + radius, y + height);
    // Bottom-left corner
    surface.arc(x + radius, y + height - radius, radius, PI / 2.0, PI);
    surface.line_to(x, y + radius);
    // Top-left corner
    surface.arc(x + radius, y + radius, radius, PI, PI * 3.0 / 2.0);
    surface.line_to(x + width - radius, y);
    // Top-right corner
    surface.arc(x + width - radius, y + radius, radius, PI * 3.0 / 2.0, PI * 2.0);
    surface.line_to(x + width, y + height - radius);
    surface.close_path();
    surface.clip();
}

/// Fill a rounded rectangle.
///
/// Returns `false` without drawing anything when the corner diameter exceeds
/// either side of the rectangle.
pub fn fill_round_rect<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    rect: Rect,
    radius: f32,
    color: Color,
) -> bool {
    if !radius_fits(&rect, radius) {
        debug!("fill_round_rect: radius {} too large for {:?}", radius, rect);
        return false;
    }

    let mut scope = PaintScope::new(surface);
    round_rect_path(&mut *scope, rect, radius);
    apply_fill_color(&mut *scope, color);
    scope.fill();
    true
}

/// Stroke the outline of a rounded rectangle.
///
/// Returns `false` without drawing anything when the corner diameter exceeds
/// either side of the rectangle.
pub fn stroke_round_rect<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    rect: Rect,
    radius: f32,
    color: Color,
) -> bool {
    if !radius_fits(&rect, radius) {
        debug!("stroke_round_rect: radius {} too large for {:?}", radius, rect);
        return false;
    }

    let mut scope = PaintScope::new(surface);
    round_rect_path(&mut *scope, rect, radius);
    apply_stroke_color(&mut *scope, color);
    scope.stroke();
    true
}

/// A circle with a pointer nub sticking out along the positive x axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowCircle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Half the angular gap of the notch, in multiples of PI
    pub angle: f32,
    /// Distance the nub tip reaches past the circle edge
    pub length: f32,
}

impl ArrowCircle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            radius,
            angle: DEFAULT_ARROW_ANGLE,
            length: DEFAULT_ARROW_LENGTH,
        }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_length(mut self, length: f32) -> Self {
        self.length = length;
        self
    }

    pub fn start_angle(&self) -> f32 {
        self.angle * PI
    }

    pub fn end_angle(&self) -> f32 {
        (2.0 - self.angle) * PI
    }

    /// Angle covered by the circular part of the outline
    pub fn sweep(&self) -> f32 {
        self.end_angle() - self.start_angle()
    }
}

/// Trace the outline of an arrow circle without painting it
pub fn arrow_circle_path<S: DrawingSurface + ?Sized>(surface: &mut S, shape: &ArrowCircle) {
    surface.begin_path();
    surface.arc(
        shape.x,
        shape.y,
        shape.radius,
        shape.start_angle(),
        shape.end_angle(),
    );
    surface.line_to(shape.x + shape.radius + shape.length, shape.y);
    surface.close_path();
}

pub fn fill_arrow_circle<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    shape: &ArrowCircle,
    color: Color,
) {
    arrow_circle_path(surface, shape);
    let mut scope = PaintScope::new(surface);
    apply_fill_color(&mut *scope, color);
    scope.fill();
}

pub fn stroke_arrow_circle<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    shape: &ArrowCircle,
    color: Color,
) {
    arrow_circle_path(surface, shape);
    let mut scope = PaintScope::new(surface);
    apply_stroke_color(&mut *scope, color);
    scope.stroke();
}
