//! # Telemetry port.
//!
//! [`Telemetry`] is the interface the scheduler calls on every observable
//! event. It is invoked **synchronously**, on the scheduler's thread of
//! control, in the exact order transitions occur; nothing is reordered,
//! duplicated or retried.
//!
//! Implementors either override the named hooks they care about, or override
//! [`Telemetry::record`] to receive the raw [`Event`] (that is what [`Bus`],
//! [`SubscriberSet`] and [`Recorder`] do). All hooks default to no-ops, and
//! [`NoopTelemetry`] is what the engine uses when nothing is attached; the
//! engine behaves identically either way.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use toastvisor::{DropReason, NotificationId, Telemetry};
//!
//! #[derive(Default)]
//! struct DropCounter(AtomicUsize);
//!
//! impl Telemetry for DropCounter {
//!     fn dropped(&self, _id: NotificationId, _reason: DropReason) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//! ```
//!
//! [`Bus`]: crate::events::Bus
//! [`SubscriberSet`]: crate::subscribers::SubscriberSet

mod recorder;

pub use recorder::Recorder;

use std::time::Duration;

use crate::core::StateLabel;
use crate::events::{Event, EventKind};
use crate::notification::{
    DismissalMethod, DisplayDuration, DropReason, NotificationId, NotificationKind,
};

/// Observer of scheduler events.
pub trait Telemetry: Send + Sync + 'static {
    /// Receives every event; the default implementation dispatches to the named hooks.
    fn record(&self, event: &Event) {
        match event.kind {
            EventKind::Shown => {
                if let (Some(kind), Some(duration)) = (&event.notification, event.duration) {
                    self.shown(kind, duration);
                }
            }
            EventKind::Dismissed => {
                if let (Some(id), Some(method)) = (event.id, event.method) {
                    self.dismissed(id, method);
                }
            }
            EventKind::Coalesced => {
                if let (Some(original), Some(updated)) = (event.id, event.related) {
                    self.coalesced(original, updated);
                }
            }
            EventKind::Dropped => {
                if let (Some(id), Some(reason)) = (event.id, event.drop_reason) {
                    self.dropped(id, reason);
                }
            }
            EventKind::AnimationPerformance => {
                let frames = event.frame_drops.unwrap_or(0);
                let elapsed = Duration::from_millis(u64::from(event.elapsed_ms.unwrap_or(0)));
                self.animation_performance(frames, elapsed);
            }
            EventKind::StateTransition => {
                if let (Some(from), Some(to)) = (event.from, event.to) {
                    self.state_transition(from, to);
                }
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {}
        }
    }

    /// A notification became visible.
    fn shown(&self, _kind: &NotificationKind, _duration: DisplayDuration) {}

    /// A visible notification was retired.
    fn dismissed(&self, _id: NotificationId, _method: DismissalMethod) {}

    /// `original` (queued) was replaced by `updated`.
    fn coalesced(&self, _original: NotificationId, _updated: NotificationId) {}

    /// An item was shed before being shown.
    fn dropped(&self, _id: NotificationId, _reason: DropReason) {}

    /// Renderer-reported animation statistics.
    fn animation_performance(&self, _frame_drops: u32, _duration: Duration) {}

    /// The presentation slot changed state.
    fn state_transition(&self, _from: StateLabel, _to: StateLabel) {}
}

/// Telemetry sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {}
