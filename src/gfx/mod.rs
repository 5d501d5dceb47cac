//! Pixel graphics: palette, indexed frames, cursor, and display.
//!
//! Everything here is synchronous and lock-free. Drawing operations take the
//! palette by reference on every call; sharing a palette between frames is
//! the runtime layer's concern.

pub mod cursor;
pub mod display;
pub mod frame;
pub mod palette;
pub mod rect;

pub use cursor::Cursor;
pub use display::{Display, DisplayHandle};
pub use frame::{flip_index, IndexedFrame};
pub use palette::{ColorId, Palette, Rgba8};
pub use rect::Rect;
