//! The principal frame bound to a render surface.
//!
//! A display owns one `IndexedFrame` matching its surface's dimensions and a
//! cursor on a separate overlay surface, so cursor traffic never dirties the
//! main frame. The host ticks `refresh` once per frame; only the dirty
//! sub-rectangle is flushed. A display is itself a peripheral (`"display"`)
//! so consumers can look it up through the registry instead of a global.

use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use crate::bus::{Capability, Dispatch, EventPayload, Peripheral};
use crate::error::Error;
use crate::surface::RenderSurface;

use super::cursor::Cursor;
use super::frame::IndexedFrame;
use super::palette::{ColorId, Palette};

struct DisplayInner {
    frame: IndexedFrame,
    surface: Box<dyn RenderSurface>,
    cursor: Cursor,
    palette: Arc<RwLock<Palette>>,
    dispatch: Option<Dispatch>,
}

/// An indexed frame bound 1:1 to a render surface, with an overlay cursor.
pub struct Display {
    inner: Arc<Mutex<DisplayInner>>,
}

impl Display {
    /// Bind a display to `surface`, with the default cross cursor drawing
    /// on `overlay`. Frame dimensions are taken from the surface.
    pub fn new(
        surface: Box<dyn RenderSurface>,
        overlay: Box<dyn RenderSurface>,
        palette: Arc<RwLock<Palette>>,
    ) -> Self {
        let cursor = Cursor::new(overlay, &palette.read().unwrap());
        Self::with_cursor(surface, cursor, palette)
    }

    /// Bind a display to `surface` with a prebuilt cursor.
    pub fn with_cursor(
        surface: Box<dyn RenderSurface>,
        cursor: Cursor,
        palette: Arc<RwLock<Palette>>,
    ) -> Self {
        let frame = IndexedFrame::new(surface.width(), surface.height(), &palette.read().unwrap());
        Self {
            inner: Arc::new(Mutex::new(DisplayInner {
                frame,
                surface,
                cursor,
                palette,
                dispatch: None,
            })),
        }
    }

    /// The capability surface for this display: exactly the sanctioned
    /// operations, pre-bound to the shared display state.
    pub fn handle(&self) -> DisplayHandle {
        DisplayHandle {
            inner: self.inner.clone(),
        }
    }

    /// Build a sprite frame from a glyph literal against this display's
    /// palette. A malformed literal yields a transparent sprite.
    pub fn image(&self, width: u32, height: u32, literal: &str) -> IndexedFrame {
        let inner = self.inner.lock().unwrap();
        let palette = inner.palette.read().unwrap();
        IndexedFrame::from_glyph(width, height, literal, &palette)
    }

    /// Paste a sprite at `(x, y)`, clipped, skipping transparent pixels.
    pub fn blit(&self, sprite: &IndexedFrame, x: u32, y: u32) {
        let mut inner = self.inner.lock().unwrap();
        let palette = inner.palette.clone();
        let palette = palette.read().unwrap();
        inner.frame.paste(&palette, sprite, x, y);
    }

    /// Paste a rotated/mirrored variant of a square sprite (see
    /// [`flip_index`](super::frame::flip_index)).
    pub fn blit_flipped(&self, sprite: &IndexedFrame, step: u8, x: u32, y: u32) {
        self.blit(&sprite.flipped(step), x, y);
    }
}

impl Peripheral for Display {
    fn type_name(&self) -> &'static str {
        "display"
    }

    /// Take ownership of custom cursor rendering: hide the host pointer and
    /// accept the dispatch channel. The host keeps ticking `refresh`.
    fn start(&mut self, dispatch: Dispatch) {
        let mut inner = self.inner.lock().unwrap();
        inner.dispatch = Some(dispatch);
        inner.surface.set_pointer_hidden(true);
        debug!("display started");
    }

    fn stop(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        inner.dispatch = None;
        inner.surface.set_pointer_hidden(false);
        inner.cursor.clear();
        debug!("display stopped");
    }

    fn capability(&self) -> Capability {
        Capability::Display(self.handle())
    }
}

/// The whitelisted operation set a mounted display exports.
///
/// Everything here forwards to the shared display state; holding a handle
/// grants exactly these operations and nothing else.
#[derive(Clone)]
pub struct DisplayHandle {
    inner: Arc<Mutex<DisplayInner>>,
}

impl DisplayHandle {
    pub fn type_name(&self) -> &'static str {
        "display"
    }

    pub fn width(&self) -> u32 {
        self.inner.lock().unwrap().frame.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.lock().unwrap().frame.height()
    }

    /// Fill the whole frame with one color.
    pub fn clear(&self, color: ColorId) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        let palette = inner.palette.clone();
        let palette = palette.read().unwrap();
        inner.frame.clear(&palette, color)
    }

    /// Write one pixel; `None` uses the palette's active color.
    pub fn point(&self, x: u32, y: u32, color: Option<ColorId>) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        let palette = inner.palette.clone();
        let palette = palette.read().unwrap();
        inner.frame.point(&palette, x, y, color)
    }

    /// Draw a filled or outlined rectangle, fully contained in the frame.
    #[allow(clippy::too_many_arguments)]
    pub fn rectangle(
        &self,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        filled: bool,
        color: Option<ColorId>,
    ) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        let palette = inner.palette.clone();
        let palette = palette.read().unwrap();
        inner.frame.rectangle(&palette, x, y, w, h, filled, color)
    }

    /// Redraw the cursor with its hotspot at `(x, y)`.
    pub fn cursor_draw(&self, x: u32, y: u32) {
        self.inner.lock().unwrap().cursor.draw(x, y);
    }

    /// Erase the cursor's last footprint.
    pub fn cursor_clear(&self) {
        self.inner.lock().unwrap().cursor.clear();
    }

    /// Flush the dirty sub-rectangle to the surface, if any.
    ///
    /// Called by the host once per frame tick; a tick with no pending dirt
    /// is a no-op.
    pub fn refresh(&self) {
        let mut inner = self.inner.lock().unwrap();
        let Some(rect) = inner.frame.take_dirty() else {
            return;
        };
        let mut block = Vec::with_capacity((rect.w * rect.h) as usize);
        for row in rect.y..rect.bottom() {
            let offset = (row * inner.frame.width() + rect.x) as usize;
            block.extend_from_slice(&inner.frame.resolved()[offset..offset + rect.w as usize]);
        }
        inner.surface.write_block(rect.x, rect.y, rect.w, rect.h, &block);
    }

    /// Ask the consumer loop for a repaint outside the regular tick.
    /// Inert unless the display is mounted.
    pub fn request_redraw(&self) {
        let inner = self.inner.lock().unwrap();
        if let Some(dispatch) = &inner.dispatch {
            dispatch.send(EventPayload::RedrawRequested);
        }
    }
}
