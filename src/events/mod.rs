//! Telemetry events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to fan out
//! the scheduler's audit trail.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publisher**: the scheduler, through its telemetry sinks; `SubscriberSet`
//!   workers (overflow/panic).
//! - **Consumers**: any [`Telemetry`](crate::Telemetry) sink, bus receivers.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
