//! Error types for drawing and format failures.
//!
//! Registry lookups are deliberately not represented here: a missing
//! peripheral type or id is a normal query outcome and surfaces as `None`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("point ({x}, {y}) outside {width}x{height} frame")]
    PointOutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    #[error("rectangle {w}x{h} at ({x}, {y}) not contained in {width}x{height} frame")]
    RectOutOfBounds {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        width: u32,
        height: u32,
    },

    #[error("color id {id} outside palette of {len} entries")]
    ColorOutOfBounds { id: u8, len: usize },

    #[error("invalid hex color literal {0:?}, expected \"#rrggbb\"")]
    InvalidHexColor(String),

    #[error("palette must have at least one entry")]
    EmptyPalette,

    #[error("invalid config file: {0}")]
    InvalidConfig(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is a geometry violation (as opposed to a format one).
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            Error::PointOutOfBounds { .. }
                | Error::RectOutOfBounds { .. }
                | Error::ColorOutOfBounds { .. }
        )
    }
}
