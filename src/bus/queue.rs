//! The ordered event queue.
//!
//! A single-consumer, multi-producer queue with strict global FIFO delivery.
//! Producers never block: `push` either hands the event to the oldest
//! waiting consumer or appends it. Consumers pull: `pull` blocks until an
//! event arrives (the only blocking point in the crate), `try_pull` is the
//! passive non-blocking poll. Both queues are unbounded; a producer faster
//! than its consumer grows memory without bound, which is acceptable for a
//! UI-scale input stream.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::Mutex;

use tracing::{debug, warn};

use super::event::Event;

struct Inner {
    /// Events not yet delivered.
    events: VecDeque<Event>,
    /// Parked consumers, oldest first. Invariant: `events` and `waiters`
    /// are never both non-empty.
    waiters: VecDeque<mpsc::Sender<Event>>,
    closed: bool,
}

/// The process-wide event queue.
pub struct EventBus {
    inner: Mutex<Inner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                events: VecDeque::new(),
                waiters: VecDeque::new(),
                closed: false,
            }),
        }
    }

    /// Enqueue an event, waking the oldest waiting consumer if one exists.
    ///
    /// A waiter that abandoned its pull (dropped receiver) is discarded and
    /// the next one is tried, so an abandoned pull can never swallow an
    /// event. Pushes after `close` are dropped.
    pub fn push(&self, event: Event) {
        let mut inner = self.inner.lock().unwrap();
        if inner.closed {
            warn!(peripheral = %event.peripheral, name = event.payload.name(), "push on closed bus dropped");
            return;
        }
        let mut event = event;
        while let Some(waiter) = inner.waiters.pop_front() {
            match waiter.send(event) {
                Ok(()) => return,
                Err(mpsc::SendError(rejected)) => event = rejected,
            }
        }
        inner.events.push_back(event);
    }

    /// Block until the next event, FIFO.
    ///
    /// Returns immediately when an event is queued. Returns `None` once the
    /// bus is closed and drained. Concurrent pulls are served in the order
    /// they were issued.
    pub fn pull(&self) -> Option<Event> {
        let receiver = {
            let mut inner = self.inner.lock().unwrap();
            if let Some(event) = inner.events.pop_front() {
                return Some(event);
            }
            if inner.closed {
                return None;
            }
            let (sender, receiver) = mpsc::channel();
            inner.waiters.push_back(sender);
            receiver
        };
        // Suspend outside the lock; close() wakes us by dropping the sender.
        receiver.recv().ok()
    }

    /// Non-blocking poll: the next event if one is queued, `None` otherwise.
    pub fn try_pull(&self) -> Option<Event> {
        self.inner.lock().unwrap().events.pop_front()
    }

    /// Stop signal: wake every parked consumer with "no event" and refuse
    /// further pushes. Already-queued events remain drainable.
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.closed = true;
        let woken = inner.waiters.len();
        inner.waiters.clear();
        debug!(woken, pending = inner.events.len(), "bus closed");
    }

    /// Number of undelivered events.
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().events.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
