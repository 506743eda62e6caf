//! Notification data model: identity, kind, priority, options, action, and the
//! reasons an item leaves (or never reaches) the presentation slot.

mod item;
mod kind;
mod reason;

pub use item::{
    CoalescingKey, DisplayDuration, KeyDerivation, NotificationId, NotificationItem, Options,
};
pub use kind::{NotificationKind, Priority};
pub use reason::{DismissalMethod, DropReason};
