//! # toastvisor
//!
//! **Toastvisor** is a single-slot scheduler for transient, non-modal
//! notifications ("toasts").
//!
//! Requests arrive from anywhere in an application; the engine guarantees
//! that at most one notification is visible at a time, that strictly
//! higher-priority notifications preempt lower ones, that duplicates merge,
//! and that overload degrades by dropping low-priority work (never by
//! returning errors). Every observable step is reported, in order, through a
//! telemetry port.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   app code (any task)          renderer                      host
//!     show / dismiss /      tap / gesture / scene /      memory warning
//!     dismiss_all           report_animation
//!          │                        │                           │
//!          ▼                        ▼                           ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Toaster (cloneable port) ── Command ──► bounded mailbox          │
//! └──────────────────────────────────┬────────────────────────────────┘
//!                                    ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EngineActor (one task, one command at a time)                    │
//! │   └─ Scheduler                                                    │
//! │       - AdmissionQueue (coalesce → rate limit → capacity)         │
//! │       - PresentationState + step() (pure state machine)           │
//! │       - SlotTimer (single, pausable)                              │
//! │       - PerformanceMonitor (owned, sheds on pressure)             │
//! │       - Haptics / ActionDispatch collaborators                    │
//! └───────┬───────────────────────────────────────────────┬───────────┘
//!         │ record(&Event), in transition order           │ watch
//!         ▼                                               ▼
//!   Bus (broadcast) · SubscriberSet · user Telemetry   PresentationSnapshot
//! ```
//!
//! ### Presentation lifecycle
//! ```text
//! Idle ──► Presenting(A) ──timer / dismiss / swipe──► Dismissing(A) ──exit──► Idle
//!              │
//!              └─ higher priority B ──► Interrupted(A, B) ──► Presenting(B)
//! ```
//!
//! ## Features
//! | Area               | Description                                                | Key types / traits                          |
//! |--------------------|------------------------------------------------------------|---------------------------------------------|
//! | **Model**          | Notifications, kinds, priorities, options, actions.        | [`NotificationItem`], [`Priority`]          |
//! | **Engine**         | Runs the scheduler actor and hands out ports.              | [`ToastEngine`], [`Toaster`]                |
//! | **Telemetry**      | Ordered audit trail of every transition and drop.          | [`Telemetry`], [`Event`], [`Subscribe`]     |
//! | **Gestures**       | Pure swipe-to-dismiss decision.                            | [`gesture::decide`]                         |
//! | **Haptics**        | Directive resolution and hardware port.                    | [`resolve_haptic`], [`Haptics`]             |
//! | **Configuration**  | Capacities, windows, durations, thresholds.                | [`ToastConfig`]                             |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] subscriber that renders
//!   events as `tracing` records.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use toastvisor::{AdmissionOutcome, NotificationItem, Recorder, ToastConfig, ToastEngine};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let recorder = Arc::new(Recorder::new());
//!     let engine = ToastEngine::builder(ToastConfig::default())
//!         .with_telemetry(recorder.clone())
//!         .build();
//!     let toaster = engine.handle();
//!
//!     let outcome = toaster.admit(NotificationItem::success("Saved")).await?;
//!     assert_eq!(outcome, AdmissionOutcome::Accepted);
//!
//!     toaster.dismiss_all().await;
//!     engine.shutdown().await;
//!     assert!(!recorder.is_empty());
//!     Ok(())
//! }
//! ```
mod actions;
mod config;
mod core;
mod error;
mod haptics;
mod notification;
mod performance;
mod port;

pub mod events;
pub mod gesture;
pub mod subscribers;
pub mod telemetry;

// ---- Public re-exports ----

pub use actions::{ActionCommand, ActionDispatch, ActionRegistry, NotificationAction};
pub use config::{DurationDefaults, ToastConfig};
pub use crate::core::{
    Admission, AdmissionOutcome, AdmissionQueue, Collaborators, PresentationSnapshot,
    PresentationState, SceneMode, SceneSignal, Scheduler, StateLabel, ToastEngine,
    ToastEngineBuilder,
};
pub use error::PortError;
pub use events::{Bus, Event, EventKind};
pub use gesture::{Decision, DragSample, Edge, GestureThresholds};
pub use haptics::{HapticDirective, HapticEffect, Haptics, NoopHaptics, resolve_haptic};
pub use notification::{
    CoalescingKey, DismissalMethod, DisplayDuration, DropReason, KeyDerivation, NotificationId,
    NotificationItem, NotificationKind, Options, Priority,
};
pub use performance::{PerformanceMonitor, PerformanceStats, Pressure};
pub use port::Toaster;
pub use subscribers::{Subscribe, SubscriberSet};
pub use telemetry::{NoopTelemetry, Recorder, Telemetry};

/// Pure state machine, for renderers and tests that drive it directly.
pub mod machine {
    pub use crate::core::machine::{Effect, SlotEvent, Step, step};
}

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
