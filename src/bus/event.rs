//! Event records carried by the bus.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a mounted peripheral. Assigned at mount, never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PeripheralId(pub(crate) u64);

impl PeripheralId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PeripheralId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened. Known payloads are typed; devices with their own
/// vocabulary use `Custom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    /// Synthetic event pushed when a peripheral is mounted.
    Mount,
    /// Synthetic event pushed when a peripheral is unmounted.
    Unmount,
    /// Pointer moved, coordinates already in framebuffer units.
    PointerMove { x: u32, y: u32 },
    /// A display wants a repaint outside the regular tick.
    RedrawRequested,
    /// Device-defined event.
    Custom { name: String, data: serde_json::Value },
}

impl EventPayload {
    /// The wire name of this payload.
    pub fn name(&self) -> &str {
        match self {
            EventPayload::Mount => "mount",
            EventPayload::Unmount => "unmount",
            EventPayload::PointerMove { .. } => "mousemove",
            EventPayload::RedrawRequested => "redraw",
            EventPayload::Custom { name, .. } => name,
        }
    }
}

/// An immutable event record: which peripheral, and what happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub peripheral: PeripheralId,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(peripheral: PeripheralId, payload: EventPayload) -> Self {
        Self { peripheral, payload }
    }
}
