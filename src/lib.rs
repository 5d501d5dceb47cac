//! Framebus
//!
//! A small 2D pixel-graphics runtime: an indexed-color framebuffer compositor
//! driven by a pull-based peripheral event bus. This crate provides:
//!
//! - `gfx`: palette, indexed frames, drawing primitives, cursor, display
//! - `bus`: the ordered event queue and the peripheral registry
//! - `surface`: the render-surface boundary to the host
//! - `peripherals`: input devices (pointer)
//! - `runtime`: the process-wide context wiring everything together

pub mod bus;
pub mod config;
pub mod error;
pub mod gfx;
pub mod peripherals;
pub mod runtime;
pub mod surface;

pub use bus::{
    Capability, Dispatch, Event, EventBus, EventPayload, Peripheral, PeripheralId,
    PeripheralRegistry,
};
pub use config::Config;
pub use error::Error;
pub use gfx::{Cursor, Display, DisplayHandle, IndexedFrame, Palette, Rect, Rgba8};
pub use peripherals::{Pointer, PointerInjector};
pub use runtime::Runtime;
pub use surface::{MemorySurface, RenderSurface};
