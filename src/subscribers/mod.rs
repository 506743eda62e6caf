//! # Async telemetry subscribers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] that
//! adapts any number of async subscribers to the synchronous
//! [`Telemetry`](crate::Telemetry) port.
//!
//! ## Architecture
//! ```text
//! Scheduler ── record(&Event) ──► SubscriberSet ──► per-subscriber queue
//!                                                     │
//!                                                ┌────┴────┬─────────┐
//!                                                ▼         ▼         ▼
//!                                            LogWriter  Analytics  Custom
//! ```
//!
//! Enable the `logging` feature for the built-in `LogWriter`.

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
