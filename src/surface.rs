//! Render surface boundary.
//!
//! A `RenderSurface` is the host-owned pixel sink a display (or cursor
//! overlay) flushes into. The host also owns the per-frame ticking primitive;
//! the core only promises to flush its dirty region when ticked. The crate
//! ships `MemorySurface`, a plain CPU buffer used by tests and the headless
//! demo; windowing backends implement the same trait on the host side.

use serde::{Deserialize, Serialize};

use crate::gfx::Rgba8;

/// A fixed-size RGBA8 pixel sink.
pub trait RenderSurface: Send {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Write a `w`×`h` row-major block of pixels at `(x, y)`.
    ///
    /// Replace semantics, alpha included. The block is guaranteed by callers
    /// to be fully contained in the surface.
    fn write_block(&mut self, x: u32, y: u32, w: u32, h: u32, pixels: &[Rgba8]);

    /// Reset a `w`×`h` block at `(x, y)` to fully transparent.
    fn clear_block(&mut self, x: u32, y: u32, w: u32, h: u32);

    /// Hide or show the host's own pointer over this surface. Hosts without
    /// a pointer ignore this.
    fn set_pointer_hidden(&mut self, _hidden: bool) {}
}

/// Shared handle to a surface. Lets the host keep a probe on a surface it
/// has handed to a display or cursor.
impl<S: RenderSurface> RenderSurface for std::sync::Arc<std::sync::Mutex<S>> {
    fn width(&self) -> u32 {
        self.lock().unwrap().width()
    }

    fn height(&self) -> u32 {
        self.lock().unwrap().height()
    }

    fn write_block(&mut self, x: u32, y: u32, w: u32, h: u32, pixels: &[Rgba8]) {
        self.lock().unwrap().write_block(x, y, w, h, pixels);
    }

    fn clear_block(&mut self, x: u32, y: u32, w: u32, h: u32) {
        self.lock().unwrap().clear_block(x, y, w, h);
    }

    fn set_pointer_hidden(&mut self, hidden: bool) {
        self.lock().unwrap().set_pointer_hidden(hidden);
    }
}

/// An in-memory render surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySurface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
    /// Last pointer-visibility request, observable by tests.
    pub pointer_hidden: bool,
}

impl MemorySurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba8::TRANSPARENT; (width * height) as usize],
            pointer_hidden: false,
        }
    }

    /// The full pixel buffer, row-major.
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn pixel_at(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }
}

impl RenderSurface for MemorySurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn write_block(&mut self, x: u32, y: u32, w: u32, h: u32, pixels: &[Rgba8]) {
        debug_assert_eq!(pixels.len(), (w * h) as usize);
        debug_assert!(x + w <= self.width && y + h <= self.height);
        for row in 0..h {
            let src = (row * w) as usize;
            let dst = ((y + row) * self.width + x) as usize;
            self.pixels[dst..dst + w as usize].copy_from_slice(&pixels[src..src + w as usize]);
        }
    }

    fn clear_block(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let len = w.min(self.width.saturating_sub(x)) as usize;
        if len == 0 {
            return;
        }
        for row in 0..h.min(self.height.saturating_sub(y)) {
            let dst = ((y + row) * self.width + x) as usize;
            self.pixels[dst..dst + len].fill(Rgba8::TRANSPARENT);
        }
    }

    fn set_pointer_hidden(&mut self, hidden: bool) {
        self.pointer_hidden = hidden;
    }
}
