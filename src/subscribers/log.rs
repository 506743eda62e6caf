//! # LogWriter: structured telemetry logging
//!
//! A subscriber that renders every [`Event`] as a `tracing` record under the
//! `toastvisor::telemetry` target. Pair it with any `tracing` subscriber.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO toastvisor::telemetry: shown id=#3 kind=error priority=critical duration=Timed(8s)
//! INFO toastvisor::telemetry: dismissed id=#1 method=interrupted
//! DEBUG toastvisor::telemetry: transition from=presenting to=interrupted
//! WARN toastvisor::telemetry: dropped id=#9 reason=queue_full
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

const TARGET: &str = "toastvisor::telemetry";

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let id = e.id.map(|id| id.to_string()).unwrap_or_default();
        match e.kind {
            EventKind::Shown => {
                tracing::info!(
                    target: TARGET,
                    seq = e.seq,
                    %id,
                    kind = e.notification.as_ref().map(|k| k.as_label()).unwrap_or("?"),
                    priority = e.priority.map(|p| p.as_label()).unwrap_or("?"),
                    duration = ?e.duration,
                    "shown"
                );
            }
            EventKind::Dismissed => {
                tracing::info!(
                    target: TARGET,
                    seq = e.seq,
                    %id,
                    method = e.method.map(|m| m.as_label()).unwrap_or("?"),
                    "dismissed"
                );
            }
            EventKind::StateTransition => {
                tracing::debug!(
                    target: TARGET,
                    seq = e.seq,
                    from = e.from.map(|s| s.as_label()).unwrap_or("?"),
                    to = e.to.map(|s| s.as_label()).unwrap_or("?"),
                    "transition"
                );
            }
            EventKind::Coalesced => {
                tracing::debug!(
                    target: TARGET,
                    seq = e.seq,
                    original = %id,
                    updated = %e.related.map(|r| r.to_string()).unwrap_or_default(),
                    "coalesced"
                );
            }
            EventKind::Dropped => {
                tracing::warn!(
                    target: TARGET,
                    seq = e.seq,
                    %id,
                    reason = e.drop_reason.map(|r| r.as_label()).unwrap_or("?"),
                    "dropped"
                );
            }
            EventKind::AnimationPerformance => {
                tracing::debug!(
                    target: TARGET,
                    seq = e.seq,
                    frame_drops = e.frame_drops.unwrap_or(0),
                    elapsed_ms = e.elapsed_ms.unwrap_or(0),
                    "animation"
                );
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                tracing::warn!(
                    target: TARGET,
                    seq = e.seq,
                    subscriber = e.source.as_deref().unwrap_or("unknown"),
                    reason = e.reason.as_deref().unwrap_or("unknown"),
                    "subscriber trouble"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
