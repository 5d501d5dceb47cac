//! Peripheral event bus.
//!
//! A single ordered queue fed by independently-timed producers, drained by
//! one consumer through blocking or passive pulls, plus the registry that
//! mounts devices onto the queue and exposes their capability surfaces.

pub mod event;
pub mod queue;
pub mod registry;

pub use event::{Event, EventPayload, PeripheralId};
pub use queue::EventBus;
pub use registry::{Capability, Dispatch, Peripheral, PeripheralRegistry};
