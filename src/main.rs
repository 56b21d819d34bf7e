// filepath: src/main.rs
//! Demo renderer: draws a sample card with every helper and writes it out
//! as a binary PPM image.

use canvas_kit::surface::apply_fill_color;
use canvas_kit::{
    fill_arrow_circle, fill_auto_wrap_text, fill_round_rect, stroke_round_rect, ArrowCircle,
    Color, KitConfig, PixelCanvas, Rect,
};
use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const WIDTH: u32 = 360;
const HEIGHT: u32 = 220;
const DEFAULT_OUTPUT: &str = "canvas-kit-demo.ppm";
const SAMPLE_TEXT: &str = "Rounded corners, arrow circles and wrapped text.\n\
    Long paragraphs are cut off after the configured number of lines and end with an ellipsis.";

fn render_card(canvas: &mut PixelCanvas, config: &KitConfig) {
    let style = config.shape_style();
    let card = Rect::new(20.0, 20.0, (WIDTH - 40) as f32, (HEIGHT - 40) as f32);

    canvas.clear(Color::rgb(32, 34, 40));
    if !fill_round_rect(canvas, card, style.corner_radius, style.fill_color) {
        warn!(
            "Corner radius {} does not fit the card, skipping background",
            style.corner_radius
        );
    }
    if !stroke_round_rect(canvas, card, style.corner_radius, style.stroke_color) {
        warn!("Corner radius {} does not fit the card, skipping border", style.corner_radius);
    }

    let marker = ArrowCircle::new(50.0, 55.0, 14.0)
        .with_angle(style.arrow_angle)
        .with_length(style.arrow_length);
    fill_arrow_circle(canvas, &marker, Color::rgb(230, 90, 60));

    let mut options = config.wrap_options();
    if options.lines.is_none() {
        options.lines = Some(4);
    }
    apply_fill_color(canvas, Color::rgb(20, 20, 20));
    let info = fill_auto_wrap_text(canvas, SAMPLE_TEXT, 40.0, 110.0, card.width - 40.0, &options);
    info!("Text drawn in {} rows, next baseline at y={}", info.rows, info.y);
}

fn write_ppm(path: &Path, rgba: &[u8], width: u32, height: u32) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write!(out, "P6\n{} {}\n255\n", width, height)?;
    for pixel in rgba.chunks_exact(4) {
        out.write_all(&pixel[..3])?;
    }
    out.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting canvas-kit demo");

    let config = KitConfig::load_from_file().unwrap_or_else(|e| {
        warn!("Failed to load configuration: {}, using defaults", e);
        KitConfig::default()
    });
    info!("Configuration loaded");

    let font = config.load_font().unwrap_or_else(|e| {
        warn!("Failed to load font: {}, text will not be rendered", e);
        None
    });
    if font.is_none() {
        info!("No font configured (text.font_path), text is measured but not drawn");
    }

    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let mut buffer = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
    {
        let mut canvas = PixelCanvas::new(&mut buffer, WIDTH, HEIGHT);
        if let Some(font) = &font {
            canvas = canvas.with_font(font);
        }
        render_card(&mut canvas, &config);
    }

    write_ppm(&output, &buffer, WIDTH, HEIGHT)?;
    info!("Wrote {}x{} image to {}", WIDTH, HEIGHT, output.display());
    Ok(())
}
