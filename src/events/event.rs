//! # Telemetry events emitted by the scheduler.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Presentation events**: what the user saw (shown, dismissed, transitions)
//! - **Admission events**: what happened at the queue (coalesced, dropped)
//! - **Plumbing events**: renderer reports and subscriber health
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! notification ids, dismissal methods and drop reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically in the order state transitions occur. Use `seq` to restore the
//! exact order when events are delivered through independent queues.
//!
//! ## Example
//! ```rust
//! use toastvisor::{DismissalMethod, Event, EventKind, NotificationItem};
//!
//! let item = NotificationItem::success("Saved");
//! let ev = Event::dismissed(item.id(), DismissalMethod::UserTap);
//!
//! assert_eq!(ev.kind, EventKind::Dismissed);
//! assert_eq!(ev.id, Some(item.id()));
//! assert_eq!(ev.method, Some(DismissalMethod::UserTap));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::core::StateLabel;
use crate::notification::{
    DismissalMethod, DisplayDuration, DropReason, NotificationId, NotificationItem,
    NotificationKind, Priority,
};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of telemetry events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Presentation events ===
    /// A notification became visible.
    ///
    /// Sets:
    /// - `id`: notification id
    /// - `notification`: notification kind
    /// - `priority`: effective priority
    /// - `duration`: resolved visible duration
    Shown,

    /// A visible notification started leaving the slot.
    ///
    /// Sets:
    /// - `id`: notification id
    /// - `method`: how it was retired
    Dismissed,

    /// The presentation slot changed state.
    ///
    /// Sets:
    /// - `from`, `to`: state labels
    /// - `id`: item involved in the new state, if any
    StateTransition,

    // === Admission events ===
    /// A queued item was replaced by a newer equivalent.
    ///
    /// Sets:
    /// - `id`: the replaced (original) id
    /// - `related`: the updated id now holding the queue position
    Coalesced,

    /// An item was shed before it was ever shown.
    ///
    /// Sets:
    /// - `id`: dropped item id
    /// - `drop_reason`: why
    Dropped,

    // === Plumbing events ===
    /// Renderer reported an animation's performance.
    ///
    /// Sets:
    /// - `frame_drops`: dropped frames
    /// - `elapsed_ms`: animation duration (ms)
    AnimationPerformance,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `source`: subscriber name
    /// - `reason`: "full" or "closed"
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `source`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,
}

/// Telemetry event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Primary notification id.
    pub id: Option<NotificationId>,
    /// Secondary id (`Coalesced`: the updated item).
    pub related: Option<NotificationId>,
    /// Kind of the notification (`Shown`).
    pub notification: Option<NotificationKind>,
    /// Effective priority (`Shown`).
    pub priority: Option<Priority>,
    /// Resolved visible duration (`Shown`).
    pub duration: Option<DisplayDuration>,
    /// Dismissal method (`Dismissed`).
    pub method: Option<DismissalMethod>,
    /// Drop reason (`Dropped`).
    pub drop_reason: Option<DropReason>,
    /// Dropped frames (`AnimationPerformance`).
    pub frame_drops: Option<u32>,
    /// Elapsed time in milliseconds (compact).
    pub elapsed_ms: Option<u32>,
    /// Previous slot state (`StateTransition`).
    pub from: Option<StateLabel>,
    /// New slot state (`StateTransition`).
    pub to: Option<StateLabel>,
    /// Emitting component (subscriber name).
    pub source: Option<Arc<str>>,
    /// Human-readable reason (overflow/panic details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            id: None,
            related: None,
            notification: None,
            priority: None,
            duration: None,
            method: None,
            drop_reason: None,
            frame_drops: None,
            elapsed_ms: None,
            from: None,
            to: None,
            source: None,
            reason: None,
        }
    }

    /// Attaches the primary notification id.
    #[inline]
    pub fn with_id(mut self, id: NotificationId) -> Self {
        self.id = Some(id);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the emitting component's name.
    #[inline]
    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attaches an elapsed duration (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.elapsed_ms = Some(ms);
        self
    }

    /// Creates a `Shown` event for `item`.
    pub fn shown(item: &NotificationItem) -> Self {
        let mut ev = Event::new(EventKind::Shown).with_id(item.id());
        ev.notification = Some(item.kind().clone());
        ev.priority = Some(item.priority());
        ev.duration = Some(item.duration());
        ev
    }

    /// Creates a `Dismissed` event.
    pub fn dismissed(id: NotificationId, method: DismissalMethod) -> Self {
        let mut ev = Event::new(EventKind::Dismissed).with_id(id);
        ev.method = Some(method);
        ev
    }

    /// Creates a `Coalesced` event (`original` replaced by `updated`).
    pub fn coalesced(original: NotificationId, updated: NotificationId) -> Self {
        let mut ev = Event::new(EventKind::Coalesced).with_id(original);
        ev.related = Some(updated);
        ev
    }

    /// Creates a `Dropped` event.
    pub fn dropped(id: NotificationId, reason: DropReason) -> Self {
        let mut ev = Event::new(EventKind::Dropped).with_id(id);
        ev.drop_reason = Some(reason);
        ev
    }

    /// Creates a `StateTransition` event.
    pub fn transition(from: StateLabel, to: StateLabel, id: Option<NotificationId>) -> Self {
        let mut ev = Event::new(EventKind::StateTransition);
        ev.from = Some(from);
        ev.to = Some(to);
        ev.id = id;
        ev
    }

    /// Creates an `AnimationPerformance` event.
    pub fn animation_performance(frame_drops: u32, duration: Duration) -> Self {
        let mut ev = Event::new(EventKind::AnimationPerformance).with_elapsed(duration);
        ev.frame_drops = Some(frame_drops);
        ev
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_source(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_source(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::Shown);
        let b = Event::new(EventKind::Shown);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn shown_captures_item_metadata() {
        let item = NotificationItem::warning("Battery low");
        let ev = Event::shown(&item);
        assert_eq!(ev.id, Some(item.id()));
        assert_eq!(ev.notification, Some(NotificationKind::Warning));
        assert_eq!(ev.priority, Some(Priority::Elevated));
        assert_eq!(ev.duration, Some(item.duration()));
    }

    #[test]
    fn elapsed_saturates() {
        let ev = Event::animation_performance(3, Duration::from_secs(u64::MAX / 2));
        assert_eq!(ev.elapsed_ms, Some(u32::MAX));
        assert_eq!(ev.frame_drops, Some(3));
    }
}
