//! # Broadcast bus for telemetry events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`]. The engine
//! always attaches one as a telemetry sink so that any number of observers
//! (renderers, audit logs, tests) can follow the event trail via
//! [`Toaster::events`](crate::Toaster::events).
//!
//! ## Architecture
//! ```text
//! Scheduler ──► Telemetry sinks ──► Bus ──► receiver 1 (renderer)
//!                                       ├─► receiver 2 (audit)
//!                                       └─► receiver N
//! SubscriberSet workers ── overflow/panic ──► Bus
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active receivers at send time.

use tokio::sync::broadcast;

use super::event::Event;
use crate::telemetry::Telemetry;

/// Broadcast channel for telemetry events.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately (send clones internally).
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity.
    ///
    /// The minimum capacity is 1 (clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Publishes a borrowed event by cloning it.
    pub fn publish_ref(&self, ev: &Event) {
        let _ = self.tx.send(ev.clone());
    }

    /// Creates a new receiver that will observe subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Telemetry for Bus {
    fn record(&self, event: &Event) {
        self.publish_ref(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn receivers_observe_published_events() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        bus.record(&Event::new(EventKind::Shown));
        let got = rx.recv().await.expect("event");
        assert_eq!(got.kind, EventKind::Shown);
    }

    #[test]
    fn publish_without_receivers_is_silent() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::Dropped));
    }
}
