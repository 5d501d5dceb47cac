//! Peripheral registry and lifecycle.
//!
//! Peripherals are mounted devices with a stable numeric id, a typed
//! dispatch channel into the bus, and a capability surface exposing only
//! their sanctioned operations. The lifecycle is a two-state machine:
//! unmounted -> mounted -> unmounted, with no intermediate states.
//! Re-mounting allocates a fresh id; ids are never reused.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::gfx::DisplayHandle;

use super::event::{Event, EventPayload, PeripheralId};
use super::queue::EventBus;

/// A mountable input/output device.
///
/// `start` must return quickly: a device that needs background work spawns
/// it and keeps a clone of its dispatch channel. Registration does not wait
/// for device-internal readiness.
pub trait Peripheral: Send {
    /// Logical device category, e.g. `"display"` or `"mouse"`.
    fn type_name(&self) -> &'static str;

    /// Begin producing events through `dispatch`.
    fn start(&mut self, dispatch: Dispatch);

    /// Stop producing events. Called on unmount.
    fn stop(&mut self) {}

    /// The operation set this device exports to consumers.
    fn capability(&self) -> Capability {
        Capability::None
    }
}

struct DispatchShared {
    bus: Arc<EventBus>,
    id: PeripheralId,
    enabled: AtomicBool,
}

/// A peripheral's bound event producer channel.
///
/// Cloneable so a device can hand it to background threads. Severed on
/// unmount: in-flight clones go inert rather than resurrecting the device
/// on the bus.
#[derive(Clone)]
pub struct Dispatch {
    shared: Arc<DispatchShared>,
}

impl Dispatch {
    fn new(bus: Arc<EventBus>, id: PeripheralId) -> Self {
        Self {
            shared: Arc::new(DispatchShared {
                bus,
                id,
                enabled: AtomicBool::new(true),
            }),
        }
    }

    /// The id this channel is bound to.
    pub fn id(&self) -> PeripheralId {
        self.shared.id
    }

    /// Push an event for this peripheral. Inert after unmount.
    pub fn send(&self, payload: EventPayload) {
        if !self.shared.enabled.load(Ordering::Acquire) {
            debug!(peripheral = %self.shared.id, name = payload.name(), "dispatch on unmounted peripheral dropped");
            return;
        }
        self.shared.bus.push(Event::new(self.shared.id, payload));
    }

    fn sever(&self) {
        self.shared.enabled.store(false, Ordering::Release);
    }
}

/// A device's exported operation set.
///
/// Each variant is a concrete handle whose method set *is* the whitelist,
/// pre-bound to the device's shared state. Devices exporting nothing (the
/// pointer) use `None`.
#[derive(Clone)]
pub enum Capability {
    None,
    Display(DisplayHandle),
}

impl Capability {
    pub fn as_display(&self) -> Option<&DisplayHandle> {
        match self {
            Capability::Display(handle) => Some(handle),
            Capability::None => None,
        }
    }
}

struct Entry {
    type_name: &'static str,
    capability: Capability,
    peripheral: Box<dyn Peripheral>,
    dispatch: Dispatch,
}

/// The process-wide table of mounted peripherals.
pub struct PeripheralRegistry {
    bus: Arc<EventBus>,
    next_id: u64,
    by_id: HashMap<PeripheralId, Entry>,
    by_type: HashMap<&'static str, PeripheralId>,
}

impl PeripheralRegistry {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            next_id: 0,
            by_id: HashMap::new(),
            by_type: HashMap::new(),
        }
    }

    /// The bus this registry feeds.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Mount a peripheral: assign the next id, push the synthetic `Mount`
    /// event, then start the device.
    ///
    /// The `Mount` event is pushed before `start` so it precedes any
    /// device-originated event for that id. A later mount of an already
    /// mounted type takes over the type lookup; the earlier instance stays
    /// mounted and reachable by id.
    pub fn mount(&mut self, mut peripheral: Box<dyn Peripheral>) -> PeripheralId {
        let id = PeripheralId(self.next_id);
        self.next_id += 1;
        let type_name = peripheral.type_name();
        let dispatch = Dispatch::new(self.bus.clone(), id);
        self.bus.push(Event::new(id, EventPayload::Mount));
        peripheral.start(dispatch.clone());
        let capability = peripheral.capability();
        if let Some(shadowed) = self.by_type.insert(type_name, id) {
            debug!(type_name, %shadowed, replacement = %id, "type lookup shadowed by later mount");
        }
        self.by_id.insert(
            id,
            Entry {
                type_name,
                capability,
                peripheral,
                dispatch,
            },
        );
        debug!(%id, type_name, "peripheral mounted");
        id
    }

    /// Unmount a peripheral: stop it, sever its dispatch, remove it from
    /// both lookups, and push the `Unmount` event. Unknown ids are a no-op.
    pub fn unmount(&mut self, id: PeripheralId) {
        let Some(mut entry) = self.by_id.remove(&id) else {
            return;
        };
        // Only drop the type mapping if this instance still owns it; a
        // shadowed instance must not evict its replacement.
        if self.by_type.get(entry.type_name) == Some(&id) {
            self.by_type.remove(entry.type_name);
        }
        entry.peripheral.stop();
        entry.dispatch.sever();
        self.bus.push(Event::new(id, EventPayload::Unmount));
        debug!(%id, entry.type_name, "peripheral unmounted");
    }

    /// The capability surface of the last-mounted peripheral of a type.
    /// Absence is a normal outcome, not a fault.
    pub fn get(&self, type_name: &str) -> Option<Capability> {
        let id = self.by_type.get(type_name)?;
        self.by_id.get(id).map(|entry| entry.capability.clone())
    }

    /// Ids of all mounted peripherals, ascending.
    pub fn ids(&self) -> Vec<PeripheralId> {
        let mut ids: Vec<_> = self.by_id.keys().copied().collect();
        ids.sort();
        ids
    }

    /// The type of a mounted peripheral.
    pub fn type_name(&self, id: PeripheralId) -> Option<&'static str> {
        self.by_id.get(&id).map(|entry| entry.type_name)
    }
}
