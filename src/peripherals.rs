//! Input peripherals.
//!
//! The pointer device sits at the host boundary: the host feeds it raw
//! pointer positions (surface pixels), it normalizes them to framebuffer
//! units and dispatches `mousemove` events onto the bus. The host side keeps
//! a `PointerInjector`; the registry owns the `Pointer` itself once mounted.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::bus::{Capability, Dispatch, EventPayload, Peripheral};

struct PointerShared {
    width: u32,
    height: u32,
    /// Integer surface-to-framebuffer scale; at least 1.
    scale: AtomicU32,
    /// Bound channel while mounted, `None` otherwise.
    dispatch: Mutex<Option<Dispatch>>,
}

/// A pointer device (`type_name = "mouse"`). Exports no capability surface.
pub struct Pointer {
    shared: Arc<PointerShared>,
}

impl Pointer {
    /// A pointer over a `width`×`height` framebuffer at scale 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            shared: Arc::new(PointerShared {
                width,
                height,
                scale: AtomicU32::new(1),
                dispatch: Mutex::new(None),
            }),
        }
    }

    /// The host-side handle for feeding raw positions. Grab it before
    /// mounting; mounting consumes the device.
    pub fn injector(&self) -> PointerInjector {
        PointerInjector {
            shared: self.shared.clone(),
        }
    }
}

impl Peripheral for Pointer {
    fn type_name(&self) -> &'static str {
        "mouse"
    }

    fn start(&mut self, dispatch: Dispatch) {
        *self.shared.dispatch.lock().unwrap() = Some(dispatch);
    }

    fn stop(&mut self) {
        *self.shared.dispatch.lock().unwrap() = None;
    }

    fn capability(&self) -> Capability {
        Capability::None
    }
}

/// Host-side handle feeding raw pointer positions into a mounted `Pointer`.
#[derive(Clone)]
pub struct PointerInjector {
    shared: Arc<PointerShared>,
}

impl PointerInjector {
    /// Feed one raw pointer position in surface pixels.
    ///
    /// The position is divided by the current scale (truncating) and clamped
    /// to the framebuffer extent before dispatch. Inert while the device is
    /// not mounted.
    pub fn inject(&self, raw_x: u32, raw_y: u32) {
        let scale = self.shared.scale.load(Ordering::Acquire).max(1);
        let x = (raw_x / scale).min(self.shared.width.saturating_sub(1));
        let y = (raw_y / scale).min(self.shared.height.saturating_sub(1));
        let dispatch = self.shared.dispatch.lock().unwrap();
        match &*dispatch {
            Some(dispatch) => dispatch.send(EventPayload::PointerMove { x, y }),
            None => debug!(raw_x, raw_y, "pointer input before mount dropped"),
        }
    }

    /// Update the surface-to-framebuffer scale (host resize handling).
    /// Zero is treated as 1.
    pub fn set_scale(&self, scale: u32) {
        self.shared.scale.store(scale.max(1), Ordering::Release);
    }
}
