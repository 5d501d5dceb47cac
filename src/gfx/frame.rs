//! Indexed pixel frames.
//!
//! An `IndexedFrame` is a 2D grid of palette indices with a parallel cache of
//! resolved RGBA pixels and a cumulative dirty rectangle. The two planes are
//! updated in lockstep on every write; the resolved plane is never recomputed
//! wholesale. The dirty rectangle is the true bounding union of every write
//! since the last flush and is consumed by [`take_dirty`].
//!
//! [`take_dirty`]: IndexedFrame::take_dirty

use tracing::warn;

use crate::error::Error;

use super::palette::{ColorId, Palette, Rgba8};
use super::rect::Rect;

/// Source coordinates for `(x, y)` in variant `step` of a square tile of
/// side `size`.
///
/// Steps 0-3 are clockwise quarter turns; steps 4-7 are the horizontally
/// mirrored quarter turns. Pure index arithmetic, usable for compositing
/// rotated glyph variants without recomputing geometry.
pub fn flip_index(step: u8, x: u32, y: u32, size: u32) -> (u32, u32) {
    let m = size - 1;
    let (x, y) = if step >= 4 { (m - x, y) } else { (x, y) };
    match step % 4 {
        0 => (x, y),
        1 => (y, m - x),
        2 => (m - x, m - y),
        _ => (m - y, x),
    }
}

/// A palette-indexed pixel grid with a resolved-RGBA cache and dirty
/// tracking.
#[derive(Debug, Clone)]
pub struct IndexedFrame {
    width: u32,
    height: u32,
    /// Palette index per pixel, row-major.
    indexed: Vec<ColorId>,
    /// Resolved RGBA per pixel, kept in lockstep with `indexed`.
    resolved: Vec<Rgba8>,
    /// Bounding rectangle of all writes since the last flush.
    dirty: Option<Rect>,
}

impl IndexedFrame {
    /// Create a fully transparent frame.
    pub fn new(width: u32, height: u32, palette: &Palette) -> Self {
        let transparent = palette.transparent();
        let len = (width * height) as usize;
        Self {
            width,
            height,
            indexed: vec![transparent; len],
            resolved: vec![
                palette.color(transparent).unwrap_or(Rgba8::TRANSPARENT);
                len
            ],
            dirty: None,
        }
    }

    /// Create a frame from a row-major string of single-hex-digit palette
    /// indices (the glyph/sprite literal format).
    ///
    /// A malformed literal (wrong length, non-hex digit, or digit outside
    /// the palette) degrades to a fully transparent frame rather than
    /// faulting.
    pub fn from_glyph(width: u32, height: u32, literal: &str, palette: &Palette) -> Self {
        let mut frame = Self::new(width, height, palette);
        match parse_glyph(width, height, literal, palette) {
            Some(indices) => {
                for (i, id) in indices.into_iter().enumerate() {
                    frame.indexed[i] = id;
                    // Digit range was validated against the palette.
                    frame.resolved[i] = palette.color(id).unwrap_or(Rgba8::TRANSPARENT);
                }
                frame.mark_dirty(Rect::new(0, 0, width, height));
            }
            None => {
                warn!(width, height, len = literal.len(), "malformed glyph literal, frame left transparent");
            }
        }
        frame
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The palette index at `(x, y)`, `None` outside the frame.
    pub fn index_at(&self, x: u32, y: u32) -> Option<ColorId> {
        self.offset(x, y).map(|i| self.indexed[i])
    }

    /// The resolved pixel at `(x, y)`, `None` outside the frame.
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<Rgba8> {
        self.offset(x, y).map(|i| self.resolved[i])
    }

    /// The indexed plane, row-major.
    pub fn indexed(&self) -> &[ColorId] {
        &self.indexed
    }

    /// The resolved plane, row-major.
    pub fn resolved(&self) -> &[Rgba8] {
        &self.resolved
    }

    /// The pending dirty rectangle, if any writes occurred since the last
    /// flush.
    pub fn dirty(&self) -> Option<Rect> {
        self.dirty
    }

    /// Consume the dirty rectangle. The caller is expected to flush exactly
    /// this region.
    pub fn take_dirty(&mut self) -> Option<Rect> {
        self.dirty.take()
    }

    /// Fill the whole frame with one color.
    pub fn clear(&mut self, palette: &Palette, color: ColorId) -> Result<(), Error> {
        let (id, rgba) = palette.resolve(Some(color))?;
        self.indexed.fill(id);
        self.resolved.fill(rgba);
        self.mark_dirty(Rect::new(0, 0, self.width, self.height));
        Ok(())
    }

    /// Write a single pixel. `None` draws with the palette's active color.
    pub fn point(
        &mut self,
        palette: &Palette,
        x: u32,
        y: u32,
        color: Option<ColorId>,
    ) -> Result<(), Error> {
        let i = self.offset(x, y).ok_or(Error::PointOutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        let (id, rgba) = palette.resolve(color)?;
        self.indexed[i] = id;
        self.resolved[i] = rgba;
        self.mark_dirty(Rect::new(x, y, 1, 1));
        Ok(())
    }

    /// Draw a filled or outlined rectangle.
    ///
    /// The rectangle must be fully contained in the frame. A zero-sized
    /// rectangle is a no-op. The outline variant writes the top and bottom
    /// rows fully and the left and right columns fully.
    pub fn rectangle(
        &mut self,
        palette: &Palette,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        filled: bool,
        color: Option<ColorId>,
    ) -> Result<(), Error> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        if x.checked_add(w).map_or(true, |r| r > self.width)
            || y.checked_add(h).map_or(true, |b| b > self.height)
        {
            return Err(Error::RectOutOfBounds {
                x,
                y,
                w,
                h,
                width: self.width,
                height: self.height,
            });
        }
        let (id, rgba) = palette.resolve(color)?;
        if filled {
            for row in y..y + h {
                let offset = (row * self.width + x) as usize;
                self.indexed[offset..offset + w as usize].fill(id);
                self.resolved[offset..offset + w as usize].fill(rgba);
            }
        } else {
            for row in y..y + h {
                let offset = (row * self.width) as usize;
                self.write(offset + x as usize, id, rgba);
                self.write(offset + (x + w - 1) as usize, id, rgba);
            }
            for col in x..x + w {
                self.write((y * self.width + col) as usize, id, rgba);
                self.write(((y + h - 1) * self.width + col) as usize, id, rgba);
            }
        }
        self.mark_dirty(Rect::new(x, y, w, h));
        Ok(())
    }

    /// Blit a sub-rectangle of `src` into this frame at `(x, y)`.
    ///
    /// The copied region is clipped to both frames; a fully clipped-out copy
    /// is a no-op. Source pixels carrying the palette's transparent id are
    /// skipped, leaving the destination untouched. Clipping is the contract
    /// here, never an error.
    #[allow(clippy::too_many_arguments)]
    pub fn copy_from(
        &mut self,
        palette: &Palette,
        src: &IndexedFrame,
        x: u32,
        y: u32,
        src_x: u32,
        src_y: u32,
        src_w: u32,
        src_h: u32,
    ) {
        let w = self
            .width
            .saturating_sub(x)
            .min(src.width.saturating_sub(src_x))
            .min(src_w);
        let h = self
            .height
            .saturating_sub(y)
            .min(src.height.saturating_sub(src_y))
            .min(src_h);
        if w == 0 || h == 0 {
            return;
        }
        let transparent = palette.transparent();
        for row in 0..h {
            let src_offset = ((src_y + row) * src.width + src_x) as usize;
            let dst_offset = ((y + row) * self.width + x) as usize;
            for col in 0..w as usize {
                let id = src.indexed[src_offset + col];
                if id != transparent {
                    self.indexed[dst_offset + col] = id;
                    self.resolved[dst_offset + col] = src.resolved[src_offset + col];
                }
            }
        }
        self.mark_dirty(Rect::new(x, y, w, h));
    }

    /// Blit all of `src` at `(x, y)`.
    pub fn paste(&mut self, palette: &Palette, src: &IndexedFrame, x: u32, y: u32) {
        self.copy_from(palette, src, x, y, 0, 0, src.width, src.height);
    }

    /// A rotated/mirrored copy of a square frame (see [`flip_index`]).
    ///
    /// Non-square frames are returned unrotated.
    pub fn flipped(&self, step: u8) -> IndexedFrame {
        if self.width != self.height {
            warn!(width = self.width, height = self.height, "flip requested on non-square frame");
            return self.clone();
        }
        let mut out = self.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                let (sx, sy) = flip_index(step, x, y, self.width);
                let src = (sy * self.width + sx) as usize;
                let dst = (y * self.width + x) as usize;
                out.indexed[dst] = self.indexed[src];
                out.resolved[dst] = self.resolved[src];
            }
        }
        out.dirty = Some(Rect::new(0, 0, self.width, self.height));
        out
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    fn write(&mut self, offset: usize, id: ColorId, rgba: Rgba8) {
        self.indexed[offset] = id;
        self.resolved[offset] = rgba;
    }

    fn mark_dirty(&mut self, rect: Rect) {
        self.dirty = Some(match self.dirty {
            Some(dirty) => dirty.union(&rect),
            None => rect,
        });
    }
}

/// Validate and decode a glyph literal. `None` on any malformation.
fn parse_glyph(width: u32, height: u32, literal: &str, palette: &Palette) -> Option<Vec<ColorId>> {
    if literal.len() != (width * height) as usize {
        return None;
    }
    literal
        .chars()
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as ColorId)
                .filter(|id| (*id as usize) < palette.len())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Palette {
        Palette::new(&[
            "#050506", "#192739", "#551823", "#074c35", "#885135", "#45454c", "#908f88",
            "#fffbe8",
        ])
        .unwrap()
    }

    /// Check the resolved-cache invariant over the whole frame.
    fn assert_cache_consistent(frame: &IndexedFrame, palette: &Palette) {
        for (i, &id) in frame.indexed().iter().enumerate() {
            assert_eq!(
                frame.resolved()[i],
                palette.color(id).unwrap(),
                "cache out of sync at pixel {i}"
            );
        }
    }

    #[test]
    fn test_new_frame_is_transparent() {
        let p = palette();
        let f = IndexedFrame::new(4, 3, &p);
        assert!(f.indexed().iter().all(|&id| id == p.transparent()));
        assert!(f.resolved().iter().all(|c| c.a == 0));
        assert_eq!(f.dirty(), None);
        assert_cache_consistent(&f, &p);
    }

    #[test]
    fn test_clear_then_point_scenario() {
        // The 4x3 scenario: clear(1), point(2,1,0) with id 0 transparent.
        let p = palette();
        let mut f = IndexedFrame::new(4, 3, &p);
        f.clear(&p, 1).unwrap();
        f.point(&p, 2, 1, Some(0)).unwrap();
        assert_eq!(f.indexed(), &[1, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1]);
        assert_eq!(f.resolved()[6].a, 0);
        assert_cache_consistent(&f, &p);
    }

    #[test]
    fn test_point_out_of_bounds() {
        let p = palette();
        let mut f = IndexedFrame::new(4, 3, &p);
        assert!(matches!(
            f.point(&p, 4, 0, None),
            Err(Error::PointOutOfBounds { .. })
        ));
        assert!(f.point(&p, 0, 3, None).is_err());
        assert_eq!(f.dirty(), None);
    }

    #[test]
    fn test_point_uses_active_color() {
        let mut p = palette();
        p.set_active(5).unwrap();
        let mut f = IndexedFrame::new(4, 3, &p);
        f.point(&p, 1, 1, None).unwrap();
        assert_eq!(f.index_at(1, 1), Some(5));
        assert_eq!(f.pixel_at(1, 1), p.color(5));
    }

    #[test]
    fn test_filled_rectangle() {
        let p = palette();
        let mut f = IndexedFrame::new(8, 8, &p);
        f.rectangle(&p, 2, 1, 3, 4, true, Some(7)).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                let inside = (2..5).contains(&x) && (1..5).contains(&y);
                let expected = if inside { 7 } else { p.transparent() };
                assert_eq!(f.index_at(x, y), Some(expected), "({x}, {y})");
            }
        }
        assert_eq!(f.dirty(), Some(Rect::new(2, 1, 3, 4)));
        assert_cache_consistent(&f, &p);
    }

    #[test]
    fn test_outline_rectangle() {
        let p = palette();
        let mut f = IndexedFrame::new(8, 8, &p);
        f.rectangle(&p, 1, 1, 5, 4, false, Some(3)).unwrap();
        for y in 0..8u32 {
            for x in 0..8u32 {
                let on_border = ((1..6).contains(&x) && (y == 1 || y == 4))
                    || ((1..5).contains(&y) && (x == 1 || x == 5));
                let expected = if on_border { 3 } else { p.transparent() };
                assert_eq!(f.index_at(x, y), Some(expected), "({x}, {y})");
            }
        }
        assert_cache_consistent(&f, &p);
    }

    #[test]
    fn test_degenerate_outline() {
        let p = palette();
        let mut f = IndexedFrame::new(8, 8, &p);
        // 1-wide outline is a vertical line, 1-tall a horizontal one.
        f.rectangle(&p, 3, 0, 1, 8, false, Some(2)).unwrap();
        for y in 0..8 {
            assert_eq!(f.index_at(3, y), Some(2));
        }
        f.rectangle(&p, 0, 0, 8, 1, false, Some(4)).unwrap();
        for x in 0..8 {
            assert_eq!(f.index_at(x, 0), Some(4));
        }
        assert_cache_consistent(&f, &p);
    }

    #[test]
    fn test_zero_sized_rectangle_is_noop() {
        let p = palette();
        let mut f = IndexedFrame::new(8, 8, &p);
        f.rectangle(&p, 2, 2, 0, 3, true, None).unwrap();
        f.rectangle(&p, 2, 2, 3, 0, false, None).unwrap();
        assert_eq!(f.dirty(), None);
    }

    #[test]
    fn test_rectangle_must_be_contained() {
        let p = palette();
        let mut f = IndexedFrame::new(8, 8, &p);
        assert!(f.rectangle(&p, 5, 5, 4, 2, true, None).is_err());
        assert!(f.rectangle(&p, 0, 0, 9, 1, false, None).is_err());
        // Overflowing coordinates must not wrap.
        assert!(f.rectangle(&p, u32::MAX, 0, 2, 2, true, None).is_err());
    }

    #[test]
    fn test_dirty_union_covers_disjoint_writes() {
        let p = palette();
        let mut f = IndexedFrame::new(16, 16, &p);
        f.point(&p, 1, 2, Some(1)).unwrap();
        f.point(&p, 12, 9, Some(1)).unwrap();
        let dirty = f.dirty().unwrap();
        assert!(dirty.contains_point(1, 2));
        assert!(dirty.contains_point(12, 9));
        assert_eq!(dirty, Rect::new(1, 2, 12, 8));
    }

    #[test]
    fn test_take_dirty_resets() {
        let p = palette();
        let mut f = IndexedFrame::new(4, 4, &p);
        f.clear(&p, 1).unwrap();
        assert_eq!(f.take_dirty(), Some(Rect::new(0, 0, 4, 4)));
        assert_eq!(f.take_dirty(), None);
        f.point(&p, 3, 3, Some(2)).unwrap();
        assert_eq!(f.take_dirty(), Some(Rect::new(3, 3, 1, 1)));
    }

    #[test]
    fn test_copy_skips_transparent_pixels() {
        let p = palette();
        let mut dst = IndexedFrame::new(4, 4, &p);
        dst.clear(&p, 6).unwrap();
        let sprite = IndexedFrame::from_glyph(2, 2, "1001", &p);
        dst.paste(&p, &sprite, 1, 1);
        assert_eq!(dst.index_at(1, 1), Some(1));
        assert_eq!(dst.index_at(2, 2), Some(1));
        // Transparent sprite pixels leave the background alone.
        assert_eq!(dst.index_at(2, 1), Some(6));
        assert_eq!(dst.index_at(1, 2), Some(6));
        assert_cache_consistent(&dst, &p);
    }

    #[test]
    fn test_copy_clips_to_both_frames() {
        let p = palette();
        let mut dst = IndexedFrame::new(4, 4, &p);
        let mut src = IndexedFrame::new(3, 3, &p);
        src.clear(&p, 2).unwrap();
        dst.copy_from(&p, &src, 2, 2, 1, 1, 10, 10);
        // Copy width = min(4-2, 3-1, 10) = 2.
        for y in 0..4 {
            for x in 0..4 {
                let expected = if x >= 2 && y >= 2 { 2 } else { p.transparent() };
                assert_eq!(dst.index_at(x, y), Some(expected), "({x}, {y})");
            }
        }
        assert_eq!(dst.dirty(), Some(Rect::new(2, 2, 2, 2)));
    }

    #[test]
    fn test_copy_fully_clipped_is_noop() {
        let p = palette();
        let mut dst = IndexedFrame::new(4, 4, &p);
        let mut src = IndexedFrame::new(2, 2, &p);
        src.clear(&p, 1).unwrap();
        dst.copy_from(&p, &src, 4, 0, 0, 0, 2, 2);
        dst.copy_from(&p, &src, 0, 0, 2, 2, 2, 2);
        assert_eq!(dst.dirty(), None);
        assert!(dst.indexed().iter().all(|&id| id == p.transparent()));
    }

    #[test]
    fn test_glyph_literal() {
        let p = palette();
        let f = IndexedFrame::from_glyph(2, 2, "0173", &p);
        assert_eq!(f.indexed(), &[0, 1, 7, 3]);
        assert_cache_consistent(&f, &p);
    }

    #[test]
    fn test_malformed_glyph_degrades_to_transparent() {
        let p = palette();
        // Wrong length, non-hex digit, and digit outside the 8-entry palette.
        for literal in ["017", "01g3", "0193"] {
            let f = IndexedFrame::from_glyph(2, 2, literal, &p);
            assert!(
                f.indexed().iter().all(|&id| id == p.transparent()),
                "{literal:?} should degrade"
            );
        }
    }

    #[test]
    fn test_flip_identity_and_rotations() {
        let p = palette();
        // Asymmetric 2x2 tile.
        let f = IndexedFrame::from_glyph(2, 2, "1000", &p);
        assert_eq!(f.flipped(0).indexed(), f.indexed());
        // 90 cw moves the top-left pixel to the top-right.
        assert_eq!(f.flipped(1).indexed(), &[0, 1, 0, 0]);
        assert_eq!(f.flipped(2).indexed(), &[0, 0, 0, 1]);
        assert_eq!(f.flipped(3).indexed(), &[0, 0, 1, 0]);
        // Mirrored identity swaps columns.
        assert_eq!(f.flipped(4).indexed(), &[0, 1, 0, 0]);
    }

    #[test]
    fn test_flip_round_trip() {
        let p = palette();
        let f = IndexedFrame::from_glyph(4, 4, "1234567012345670", &p);
        let rotated = f.flipped(1).flipped(1).flipped(1).flipped(1);
        assert_eq!(rotated.indexed(), f.indexed());
        assert_cache_consistent(&rotated, &p);
    }

    #[test]
    fn test_stale_palette_entry_not_repainted() {
        // Editing the palette affects later writes only.
        let mut p = palette();
        let mut f = IndexedFrame::new(2, 1, &p);
        f.point(&p, 0, 0, Some(3)).unwrap();
        let before = f.pixel_at(0, 0).unwrap();
        p.set_hex(3, "#123456").unwrap();
        assert_eq!(f.pixel_at(0, 0), Some(before));
        f.point(&p, 1, 0, Some(3)).unwrap();
        assert_eq!(f.pixel_at(1, 0), p.color(3));
    }
}
