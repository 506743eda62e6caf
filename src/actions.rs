//! # Notification actions as opaque commands.
//!
//! A toast may carry one action ("Undo", "Retry", ...). Instead of capturing a
//! closure inside the notification value, the action is an [`ActionCommand`]:
//! a plain `(id, payload)` message. When the user taps the action, the
//! scheduler hands the command to an [`ActionDispatch`] implementation, usually
//! an [`ActionRegistry`] that maps command ids to handlers owned by the caller.
//!
//! ```text
//! NotificationItem { action: ("Undo", ActionCommand{ id: "undo-delete", payload }) }
//!        │ action_tap(id)
//!        ▼
//! Scheduler ──► ActionDispatch::dispatch(&ActionCommand) ──► registry["undo-delete"](cmd)
//!        └────► dismissRequested(id, ActionTap)
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

/// Opaque command emitted when an action is tapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionCommand {
    /// Handler id in the caller's registry.
    pub id: Arc<str>,
    /// Optional opaque argument (e.g. a record id to restore).
    pub payload: Option<Arc<str>>,
}

impl ActionCommand {
    /// Creates a command without payload.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            payload: None,
        }
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Arc<str>>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

/// Label + command shown as the toast's button.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationAction {
    /// Button label (display blob, never interpreted).
    pub label: Arc<str>,
    /// Command dispatched on tap.
    pub command: ActionCommand,
}

impl NotificationAction {
    /// Creates an action.
    pub fn new(label: impl Into<Arc<str>>, command: ActionCommand) -> Self {
        Self {
            label: label.into(),
            command,
        }
    }
}

/// Receiver of tapped action commands.
///
/// Called on the scheduler's thread of control; must not block.
pub trait ActionDispatch: Send + Sync + 'static {
    /// Handles one tapped command.
    fn dispatch(&self, command: &ActionCommand);
}

type Handler = Arc<dyn Fn(&ActionCommand) + Send + Sync>;

/// Map of command id → handler.
///
/// Unknown ids are logged and ignored.
#[derive(Default)]
pub struct ActionRegistry {
    handlers: RwLock<HashMap<Arc<str>, Handler>>,
}

impl ActionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the handler for `id`.
    pub fn register<F>(&self, id: impl Into<Arc<str>>, handler: F)
    where
        F: Fn(&ActionCommand) + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        handlers.insert(id.into(), Arc::new(handler));
    }

    /// Removes the handler for `id`; returns whether one existed.
    pub fn unregister(&self, id: &str) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        handlers.remove(id).is_some()
    }

    /// Returns whether a handler exists for `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        handlers.contains_key(id)
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<&str> = handlers.keys().map(|k| k.as_ref()).collect();
        ids.sort_unstable();
        f.debug_struct("ActionRegistry").field("ids", &ids).finish()
    }
}

impl ActionDispatch for ActionRegistry {
    fn dispatch(&self, command: &ActionCommand) {
        // Clone out so the handler runs without holding the lock.
        let handler = {
            let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
            handlers.get(&command.id).cloned()
        };
        match handler {
            Some(h) => h(command),
            None => tracing::warn!(action = %command.id, "no handler registered for action"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn dispatch_runs_registered_handler() {
        let registry = ActionRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        registry.register("undo", move |cmd| {
            assert_eq!(cmd.payload.as_deref(), Some("42"));
            seen.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&ActionCommand::new("undo").with_payload("42"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_command_is_ignored() {
        let registry = ActionRegistry::new();
        registry.dispatch(&ActionCommand::new("missing"));
        assert!(!registry.contains("missing"));
    }

    #[test]
    fn unregister_removes_handler() {
        let registry = ActionRegistry::new();
        registry.register("retry", |_| {});
        assert!(registry.unregister("retry"));
        assert!(!registry.unregister("retry"));
    }
}
