//! Runtime configuration.
//!
//! Defaults reproduce the reference setup: a 192x128 display, the 16-color
//! default palette, and the cross cursor glyph with its hotspot at (3, 3).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::gfx::cursor::{CROSS_GLYPH, CROSS_HOTSPOT};
use crate::gfx::Palette;

/// The default 16-color palette.
pub const DEFAULT_COLORS: [&str; 16] = [
    "#050506", // 0  Black
    "#192739", // 1  Dark Blue
    "#551823", // 2  Maroon
    "#074c35", // 3  Dark Green
    "#885135", // 4  Brown
    "#45454c", // 5  Dark grey
    "#908f88", // 6  Light grey
    "#fffbe8", // 7  White
    "#b60a04", // 8  Red
    "#ff6e11", // 9  Orange
    "#ffec62", // 10 Yellow
    "#7aa143", // 11 Green
    "#8bb6d2", // 12 Cyan
    "#5a45b4", // 13 Blue
    "#f06391", // 14 Pink
    "#f4be8b", // 15 Tan
];

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    /// Palette entries as `#rrggbb` literals.
    pub colors: Vec<String>,
    pub cursor: CursorConfig,
}

/// Display dimensions and host scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    /// Integer surface-to-framebuffer scale.
    pub scale: u32,
}

/// Cursor glyph and hotspot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub width: u32,
    pub height: u32,
    /// Row-major glyph literal of hex palette indices.
    pub glyph: String,
    pub hotspot_x: u32,
    pub hotspot_y: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            cursor: CursorConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 192,
            height: 128,
            scale: 1,
        }
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            glyph: CROSS_GLYPH.to_string(),
            hotspot_x: CROSS_HOTSPOT.0,
            hotspot_y: CROSS_HOTSPOT.1,
        }
    }
}

impl Config {
    /// Load a JSON config file. Malformed JSON is `InvalidConfig`, not a
    /// silent fallback to defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(Error::InvalidConfig)
    }

    /// Write this config as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let text = serde_json::to_string_pretty(self).map_err(Error::InvalidConfig)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Build the palette this config describes.
    pub fn palette(&self) -> Result<Palette, Error> {
        let colors: Vec<&str> = self.colors.iter().map(String::as_str).collect();
        Palette::new(&colors)
    }
}
