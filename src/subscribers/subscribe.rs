//! # Async subscriber trait
//!
//! `Subscribe` is the extension point for plugging slow or I/O-bound telemetry
//! consumers into the engine (analytics upload, audit files). Each subscriber
//! is driven by a dedicated worker loop fed by a bounded queue that is owned by
//! the [`SubscriberSet`](crate::subscribers::SubscriberSet), so it never delays
//! the scheduler.
//!
//! ## Contract
//! - Implementations may be slow; they do **not** block the scheduler nor
//!   other subscribers.
//! - Each subscriber **declares** its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. If a queue overflows, events for that
//!   subscriber are **dropped** and a `SubscriberOverflow` event is published.
//!
//! ## Example (skeleton)
//! ```rust
//! use toastvisor::{Event, Subscribe};
//!
//! struct Analytics;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for Analytics {
//!     async fn on_event(&self, _ev: &Event) {
//!         // batch and upload...
//!     }
//!     fn name(&self) -> &'static str { "analytics" }
//!     fn queue_capacity(&self) -> usize { 512 }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for async event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
