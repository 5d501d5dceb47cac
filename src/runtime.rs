//! The process-wide runtime context.
//!
//! One `Runtime` is constructed at startup and passed explicitly to whatever
//! needs it: the render loop, input adapters, consumer tasks. There is no
//! implicit global lookup. Consumer loops are explicit threads blocking on
//! the bus; they observe shutdown through a stop flag checked before every
//! suspend plus the bus's close signal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::bus::{Event, EventBus, PeripheralRegistry};
use crate::config::Config;
use crate::error::Error;
use crate::gfx::Palette;

/// Everything a framebus process shares: one palette, one registry, one bus.
pub struct Runtime {
    palette: Arc<RwLock<Palette>>,
    registry: PeripheralRegistry,
}

impl Runtime {
    /// Build the context a config describes. Nothing is mounted yet.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let palette = Arc::new(RwLock::new(config.palette()?));
        let registry = PeripheralRegistry::new(Arc::new(EventBus::new()));
        info!(colors = config.colors.len(), "runtime created");
        Ok(Self { palette, registry })
    }

    /// The shared palette. Displays hold a clone of this handle.
    pub fn palette(&self) -> &Arc<RwLock<Palette>> {
        &self.palette
    }

    pub fn registry(&self) -> &PeripheralRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PeripheralRegistry {
        &mut self.registry
    }

    /// The shared bus, for consumer threads.
    pub fn bus(&self) -> Arc<EventBus> {
        self.registry.bus().clone()
    }

    /// Unmount every peripheral, then close the bus so parked consumers
    /// wake and exit.
    pub fn shutdown(&mut self) {
        for id in self.registry.ids() {
            self.registry.unmount(id);
        }
        self.registry.bus().close();
        info!("runtime shut down");
    }
}

/// Run a consumer loop: block on the bus, hand each event to `on_event`,
/// re-enter.
///
/// The stop flag is checked before each suspend; setting it alone does not
/// wake a parked pull, so stoppers set the flag and then close the bus (or
/// push a final event). Exits when the flag is set or the bus closes.
pub fn run_consumer<F>(bus: &EventBus, stop: &AtomicBool, mut on_event: F)
where
    F: FnMut(Event),
{
    while !stop.load(Ordering::Acquire) {
        match bus.pull() {
            Some(event) => on_event(event),
            None => break,
        }
    }
}
