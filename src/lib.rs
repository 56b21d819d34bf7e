pub mod canvas;
pub mod color;
pub mod config;
pub mod draw;
pub mod recording;
pub mod surface;
pub mod text;

pub use crate::canvas::PixelCanvas;
pub use crate::color::Color;
pub use crate::config::KitConfig;
pub use crate::draw::{
    arrow_circle_path, fill_arrow_circle, fill_round_rect, round_rect_path, stroke_arrow_circle,
    stroke_round_rect, ArrowCircle,
};
pub use crate::recording::{DrawCall, RecordingSurface};
pub use crate::surface::{ColorApplicationMode, DrawingSurface, PaintScope, Rect, TextMetrics};
pub use crate::text::{fill_auto_wrap_text, stroke_auto_wrap_text, text_wrap, WrapInfo, WrapOptions};
