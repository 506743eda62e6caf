//! Engine core: admission, presentation lifecycle, scheduling.
//!
//! The public API from this module is [`ToastEngine`] (plus the value types a
//! caller or renderer sees). Everything else is wired internally.
//!
//! Internal modules:
//! - [`queue`]: admission queue with coalescing, rate limiting and capacity shedding;
//! - [`machine`]: pure presentation state machine;
//! - [`timer`]: the slot's single pausable timer;
//! - [`scheduler`]: synchronous owner of queue, state and timer;
//! - [`actor`]: mailbox loop serializing every command onto the scheduler;
//! - [`builder`]: wires collaborators and spawns the actor.

mod actor;
mod builder;
mod engine;
pub mod machine;
pub mod queue;
pub mod scheduler;
mod timer;

pub(crate) use actor::Command;
pub use builder::ToastEngineBuilder;
pub use engine::ToastEngine;
pub use machine::{PresentationState, StateLabel};
pub use queue::{Admission, AdmissionOutcome, AdmissionQueue};
pub use scheduler::{Collaborators, PresentationSnapshot, SceneMode, SceneSignal, Scheduler};
