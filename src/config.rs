// filepath: src/config.rs
//! Configuration handling for canvas-kit
//!
//! This file defines the default drawing styles callers can keep in a TOML
//! file and provides functionality to load and save them. The drawing
//! helpers never read configuration on their own; callers resolve a style
//! and pass the values in.

use crate::color::Color;
use crate::draw::{DEFAULT_ARROW_ANGLE, DEFAULT_ARROW_LENGTH, DEFAULT_CORNER_RADIUS};
use crate::text::{WrapOptions, DEFAULT_FONT, DEFAULT_LINE_HEIGHT};
use fontdue::Font;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Style properties for shapes
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ShapeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow_angle: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow_length: Option<f32>,
}

/// Style properties for wrapped text
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<usize>,
    /// Font file used by the pixel canvas
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KitConfig {
    #[serde(default)]
    pub shapes: ShapeStyle,

    #[serde(default)]
    pub text: TextStyle,
}

/// Resolved shape style with no Option fields
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyleResolved {
    pub corner_radius: f32,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub arrow_angle: f32,
    pub arrow_length: f32,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            shapes: ShapeStyle {
                corner_radius: Some(DEFAULT_CORNER_RADIUS),
                fill_color: Some(Color::WHITE),
                stroke_color: Some(Color::WHITE),
                arrow_angle: Some(DEFAULT_ARROW_ANGLE),
                arrow_length: Some(DEFAULT_ARROW_LENGTH),
            },
            text: TextStyle {
                line_height: Some(DEFAULT_LINE_HEIGHT),
                font: Some(DEFAULT_FONT.to_string()),
                lines: None,
                font_path: None,
            },
        }
    }
}

impl KitConfig {
    /// Get the path to the configuration file
    pub fn get_config_path() -> PathBuf {
        let config_dir = if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("canvas-kit")
        } else {
            PathBuf::from(".config/canvas-kit")
        };

        config_dir.join("config.toml")
    }

    /// Load configuration from the default location, writing the defaults
    /// there if no file exists yet
    pub fn load_from_file() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from_path(&Self::get_config_path())
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let config: Self = toml::from_str(&content)?;
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config at {}, writing defaults", path.display());
                let default_config = Self::default();
                default_config.save_to_path(path)?;
                Ok(default_config)
            }
            Err(e) => Err(Box::new(e)),
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        // Create the directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Shape style with built-in defaults filled in
    pub fn shape_style(&self) -> ShapeStyleResolved {
        let s = &self.shapes;
        ShapeStyleResolved {
            corner_radius: s.corner_radius.unwrap_or(DEFAULT_CORNER_RADIUS),
            fill_color: s.fill_color.unwrap_or(Color::WHITE),
            stroke_color: s.stroke_color.unwrap_or(Color::WHITE),
            arrow_angle: s.arrow_angle.unwrap_or(DEFAULT_ARROW_ANGLE),
            arrow_length: s.arrow_length.unwrap_or(DEFAULT_ARROW_LENGTH),
        }
    }

    pub fn wrap_options(&self) -> WrapOptions {
        WrapOptions {
            line_height: self.text.line_height.unwrap_or(DEFAULT_LINE_HEIGHT),
            font: self
                .text
                .font
                .clone()
                .unwrap_or_else(|| DEFAULT_FONT.to_string()),
            lines: self.text.lines,
        }
    }

    /// Load the configured font file, if any
    pub fn load_font(&self) -> Result<Option<Font>, Box<dyn std::error::Error>> {
        match &self.text.font_path {
            Some(path) => Ok(Some(crate::canvas::load_font(path)?)),
            None => Ok(None),
        }
    }
}
