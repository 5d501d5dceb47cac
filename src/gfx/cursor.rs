//! Overlay cursor.
//!
//! The cursor is a small glyph repeatedly erased and redrawn on its own
//! overlay surface, layered above the main surface by the host. It never
//! touches the main frame's pixels or dirty state: erase is a transparent
//! clear of the previous footprint, draw is a plain block write of the
//! resolved glyph (transparent glyph pixels stay transparent on the overlay,
//! letting the background show through).

use crate::gfx::{IndexedFrame, Palette};
use crate::surface::RenderSurface;

/// The default cursor glyph: an 8x8 cross with a white core and dark fringe.
pub const CROSS_GLYPH: &str = concat!(
    "00070000", "00272000", "02000200", "77000770", "02000200", "00272000", "00070000",
    "00000000"
);

/// Default hotspot of the cross glyph (its center).
pub const CROSS_HOTSPOT: (u32, u32) = (3, 3);

/// A transient glyph overlay tracking the last drawn footprint.
pub struct Cursor {
    glyph: IndexedFrame,
    overlay: Box<dyn RenderSurface>,
    /// Top-left of the last drawn footprint; can be negative when the
    /// hotspot pulls the glyph past the surface edge.
    x: i64,
    y: i64,
    offset_x: u32,
    offset_y: u32,
    /// Cached erase extent: glyph size plus hotspot offset.
    erase_w: u32,
    erase_h: u32,
}

impl Cursor {
    /// A cursor with the default cross glyph.
    pub fn new(overlay: Box<dyn RenderSurface>, palette: &Palette) -> Self {
        let glyph = IndexedFrame::from_glyph(8, 8, CROSS_GLYPH, palette);
        Self::with_glyph(overlay, glyph, CROSS_HOTSPOT.0, CROSS_HOTSPOT.1)
    }

    /// A cursor with a custom glyph and hotspot.
    pub fn with_glyph(
        overlay: Box<dyn RenderSurface>,
        glyph: IndexedFrame,
        hotspot_x: u32,
        hotspot_y: u32,
    ) -> Self {
        let mut cursor = Self {
            glyph,
            overlay,
            x: 0,
            y: 0,
            offset_x: 0,
            offset_y: 0,
            erase_w: 0,
            erase_h: 0,
        };
        cursor.set_offset(hotspot_x, hotspot_y);
        cursor
    }

    /// The hotspot offset.
    pub fn offset(&self) -> (u32, u32) {
        (self.offset_x, self.offset_y)
    }

    /// Move the hotspot. The cached erase extent follows.
    pub fn set_offset(&mut self, x: u32, y: u32) {
        self.offset_x = x;
        self.offset_y = y;
        self.erase_w = self.glyph.width() + x;
        self.erase_h = self.glyph.height() + y;
    }

    /// Top-left of the last drawn footprint.
    pub fn position(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// Erase the previous footprint and composite the glyph with its hotspot
    /// at `(x, y)`.
    ///
    /// Safe to call at full input rate; every call draws.
    pub fn draw(&mut self, x: u32, y: u32) {
        self.erase();
        let tx = x as i64 - self.offset_x as i64;
        let ty = y as i64 - self.offset_y as i64;
        self.blit_glyph(tx, ty);
        self.x = tx;
        self.y = ty;
    }

    /// Erase the last drawn footprint without redrawing. Used when the
    /// cursor's device is unmounted or hidden.
    pub fn clear(&mut self) {
        self.erase();
    }

    fn erase(&mut self) {
        if let Some((x, y, w, h)) =
            clip(self.x, self.y, self.erase_w, self.erase_h, &*self.overlay)
        {
            self.overlay.clear_block(x, y, w, h);
        }
    }

    /// Write the visible part of the glyph at `(tx, ty)`, replace semantics.
    fn blit_glyph(&mut self, tx: i64, ty: i64) {
        let Some((x, y, w, h)) = clip(tx, ty, self.glyph.width(), self.glyph.height(), &*self.overlay)
        else {
            return;
        };
        let src_x = (x as i64 - tx) as u32;
        let src_y = (y as i64 - ty) as u32;
        let mut block = Vec::with_capacity((w * h) as usize);
        for row in 0..h {
            let offset = ((src_y + row) * self.glyph.width() + src_x) as usize;
            block.extend_from_slice(&self.glyph.resolved()[offset..offset + w as usize]);
        }
        self.overlay.write_block(x, y, w, h, &block);
    }

    #[cfg(test)]
    fn glyph_pixel(&self, x: u32, y: u32) -> Option<crate::gfx::Rgba8> {
        self.glyph.pixel_at(x, y)
    }
}

/// Intersect a possibly negative rectangle with a surface's bounds.
fn clip(x: i64, y: i64, w: u32, h: u32, surface: &dyn RenderSurface) -> Option<(u32, u32, u32, u32)> {
    let left = x.max(0);
    let top = y.max(0);
    let right = (x + w as i64).min(surface.width() as i64);
    let bottom = (y + h as i64).min(surface.height() as i64);
    if left < right && top < bottom {
        Some((
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::surface::MemorySurface;

    fn setup() -> (Cursor, Arc<Mutex<MemorySurface>>, Palette) {
        let palette = Palette::new(&[
            "#050506", "#192739", "#551823", "#074c35", "#885135", "#45454c", "#908f88",
            "#fffbe8",
        ])
        .unwrap();
        let overlay = Arc::new(Mutex::new(MemorySurface::new(32, 32)));
        let cursor = Cursor::new(Box::new(overlay.clone()), &palette);
        (cursor, overlay, palette)
    }

    #[test]
    fn test_draw_places_hotspot() {
        let (mut cursor, overlay, _p) = setup();
        cursor.draw(10, 10);
        assert_eq!(cursor.position(), (7, 7));
        let surface = overlay.lock().unwrap();
        // Glyph pixel (3, 0) is color 7 (the cross arm above the hotspot).
        let expected = cursor.glyph_pixel(3, 0).unwrap();
        assert_eq!(surface.pixel_at(10, 7), Some(expected));
        assert_ne!(expected.a, 0);
    }

    #[test]
    fn test_redraw_erases_previous_footprint() {
        let (mut cursor, overlay, _p) = setup();
        cursor.draw(10, 10);
        cursor.draw(25, 25);
        let surface = overlay.lock().unwrap();
        // Nothing opaque left around the old position.
        for y in 4..15 {
            for x in 4..15 {
                assert_eq!(surface.pixel_at(x, y).unwrap().a, 0, "({x}, {y})");
            }
        }
        assert_ne!(surface.pixel_at(25, 22).unwrap().a, 0);
    }

    #[test]
    fn test_clear_erases_without_redraw() {
        let (mut cursor, overlay, _p) = setup();
        cursor.draw(16, 16);
        cursor.clear();
        let surface = overlay.lock().unwrap();
        assert!(surface.pixels().iter().all(|px| px.a == 0));
    }

    #[test]
    fn test_draw_near_origin_clips() {
        let (mut cursor, overlay, _p) = setup();
        // Hotspot at (0,0) puts the glyph's top-left rows off-surface.
        cursor.draw(0, 0);
        assert_eq!(cursor.position(), (-3, -3));
        let surface = overlay.lock().unwrap();
        // Visible part matches the glyph's lower-right quadrant.
        let expected = cursor.glyph_pixel(5, 3).unwrap();
        assert_eq!(surface.pixel_at(2, 0), Some(expected));
        assert_ne!(expected.a, 0);
        // And the next draw fully erases the clipped footprint.
        drop(surface);
        cursor.draw(20, 20);
        let surface = overlay.lock().unwrap();
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(surface.pixel_at(x, y).unwrap().a, 0);
            }
        }
    }

    #[test]
    fn test_rapid_draw_sequence_leaves_single_footprint() {
        let (mut cursor, overlay, _p) = setup();
        for i in 0..20u32 {
            cursor.draw(4 + i, 8);
        }
        let surface = overlay.lock().unwrap();
        let opaque: usize = surface.pixels().iter().filter(|px| px.a != 0).count();
        // Exactly one glyph's worth of opaque pixels (the cross has 16).
        assert_eq!(opaque, 16);
    }
}
