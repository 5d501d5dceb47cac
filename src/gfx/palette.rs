//! Shared color table for indexed drawing.
//!
//! A palette is a fixed-size list of RGBA8 entries. Exactly one entry is the
//! designated transparent color (alpha 0); every other entry carries alpha
//! 255. Frames store palette *indices* and resolve them against this table
//! at write time, so editing a palette entry affects only pixels written
//! after the edit. Already-resolved pixels are not repainted; this is a
//! documented consistency boundary, not a bug to paper over.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Index into a palette.
pub type ColorId = u8;

/// A single RGBA8 pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black, the value cleared overlay pixels take.
    pub const TRANSPARENT: Rgba8 = Rgba8 { r: 0, g: 0, b: 0, a: 0 };

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Parse a `#rrggbb` literal into an RGB triple.
fn parse_hex(literal: &str) -> Result<(u8, u8, u8), Error> {
    let digits = literal
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| Error::InvalidHexColor(literal.to_string()))?;
    // Unwraps cannot fire: all six digits were just validated.
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap();
    Ok((channel(0), channel(2), channel(4)))
}

/// A fixed color table with one active and one transparent entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<Rgba8>,
    active: ColorId,
    transparent: ColorId,
}

impl Palette {
    /// Build a palette from `#rrggbb` literals.
    ///
    /// Entry 0 starts as the transparent color; everything else is opaque.
    pub fn new(hex_colors: &[&str]) -> Result<Self, Error> {
        if hex_colors.is_empty() {
            return Err(Error::EmptyPalette);
        }
        let mut colors = Vec::with_capacity(hex_colors.len());
        for literal in hex_colors {
            let (r, g, b) = parse_hex(literal)?;
            colors.push(Rgba8::opaque(r, g, b));
        }
        colors[0].a = 0;
        Ok(Self {
            colors,
            active: 0,
            transparent: 0,
        })
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Look up an entry. `None` for an id outside the table.
    pub fn color(&self, id: ColorId) -> Option<Rgba8> {
        self.colors.get(id as usize).copied()
    }

    /// The default draw color used when an operation passes no color.
    pub fn active(&self) -> ColorId {
        self.active
    }

    pub fn set_active(&mut self, id: ColorId) -> Result<(), Error> {
        self.check(id)?;
        self.active = id;
        Ok(())
    }

    /// The single id whose pixels are skipped by blits.
    pub fn transparent(&self) -> ColorId {
        self.transparent
    }

    /// Move transparency to `id`.
    ///
    /// The previous holder becomes opaque in the same operation, so at most
    /// one entry ever has alpha 0.
    pub fn set_transparent(&mut self, id: ColorId) -> Result<(), Error> {
        self.check(id)?;
        self.colors[self.transparent as usize].a = 255;
        self.colors[id as usize].a = 0;
        self.transparent = id;
        Ok(())
    }

    /// Replace the RGB channels of an entry. Alpha is governed solely by the
    /// transparency assignment and is left untouched.
    pub fn set_color(&mut self, id: ColorId, r: u8, g: u8, b: u8) -> Result<(), Error> {
        self.check(id)?;
        let entry = &mut self.colors[id as usize];
        entry.r = r;
        entry.g = g;
        entry.b = b;
        Ok(())
    }

    /// Replace an entry from a `#rrggbb` literal.
    pub fn set_hex(&mut self, id: ColorId, literal: &str) -> Result<(), Error> {
        let (r, g, b) = parse_hex(literal)?;
        self.set_color(id, r, g, b)
    }

    /// Format an entry as a `#rrggbb` literal.
    pub fn hex(&self, id: ColorId) -> Option<String> {
        self.color(id)
            .map(|c| format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b))
    }

    /// Resolve an optional draw color to a concrete id and its RGBA value,
    /// defaulting to the active color.
    pub(crate) fn resolve(&self, color: Option<ColorId>) -> Result<(ColorId, Rgba8), Error> {
        let id = color.unwrap_or(self.active);
        let rgba = self.color(id).ok_or(Error::ColorOutOfBounds {
            id,
            len: self.colors.len(),
        })?;
        Ok((id, rgba))
    }

    fn check(&self, id: ColorId) -> Result<(), Error> {
        if (id as usize) < self.colors.len() {
            Ok(())
        } else {
            Err(Error::ColorOutOfBounds {
                id,
                len: self.colors.len(),
            })
        }
    }
}
