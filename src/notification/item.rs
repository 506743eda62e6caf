//! # Notification values.
//!
//! A [`NotificationItem`] is created by the caller, owned by the admission queue
//! until it is promoted, then owned by the presentation slot while visible,
//! then dropped. It is never mutated after admission.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use toastvisor::{DisplayDuration, NotificationItem, NotificationKind, Priority};
//!
//! let item = NotificationItem::new(NotificationKind::Warning, "Low battery")
//!     .with_duration(DisplayDuration::Timed(Duration::from_secs(10)))
//!     .with_priority(Priority::Critical);
//!
//! assert_eq!(item.priority(), Priority::Critical);
//! assert_eq!(item.message(), "Low battery");
//! ```

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::actions::NotificationAction;
use crate::config::ToastConfig;
use crate::haptics::HapticDirective;

use super::kind::{NotificationKind, Priority};

/// Global counter for notification ids.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque, process-unique notification identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value (for logs).
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How long a notification stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayDuration {
    /// Auto-dismiss after this long (time spent backgrounded does not count).
    Timed(Duration),
    /// Stays until the user acts or it is dismissed.
    Persistent,
}

impl DisplayDuration {
    /// Returns the finite duration, if any.
    #[inline]
    pub fn as_timed(self) -> Option<Duration> {
        match self {
            DisplayDuration::Timed(d) => Some(d),
            DisplayDuration::Persistent => None,
        }
    }
}

/// Key under which duplicate requests merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoalescingKey(u64);

impl CoalescingKey {
    /// Key from an explicit caller-chosen name.
    pub fn named(name: &str) -> Self {
        Self(hash_of(&("named", name)))
    }

    /// Key from kind + message payload.
    pub fn of_kind_and_message(kind: &NotificationKind, message: &str) -> Self {
        Self(hash_of(&(kind, message)))
    }

    /// Key from the message payload only.
    pub fn of_message(message: &str) -> Self {
        Self(hash_of(&("message", message)))
    }

    fn of_identity(id: NotificationId) -> Self {
        Self(hash_of(&("identity", id)))
    }
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut h = DefaultHasher::new();
    value.hash(&mut h);
    h.finish()
}

/// How the default coalescing key is derived when an item has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyDerivation {
    /// Hash of kind + message (same text, same kind → same toast).
    #[default]
    KindAndMessage,
    /// Hash of the message only (kind changes still merge).
    MessageOnly,
    /// Every item is unique; only explicit keys coalesce.
    IdentityOnly,
}

impl KeyDerivation {
    /// Derives the key for `item`, honouring an explicit key if present.
    pub fn key_for(self, item: &NotificationItem) -> CoalescingKey {
        if let Some(key) = item.coalescing_key {
            return key;
        }
        match self {
            KeyDerivation::KindAndMessage => {
                CoalescingKey::of_kind_and_message(&item.kind, &item.message)
            }
            KeyDerivation::MessageOnly => CoalescingKey::of_message(&item.message),
            KeyDerivation::IdentityOnly => CoalescingKey::of_identity(item.id),
        }
    }
}

/// Per-item presentation options. Unset fields take engine defaults at admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    /// Visible duration (`None` = default for the item's priority).
    pub duration: Option<DisplayDuration>,
    /// Haptic request.
    pub haptic: HapticDirective,
    /// Span during which an identical key merges (`None` = engine default).
    pub dedup_window: Option<Duration>,
}

impl Options {
    /// Options with haptics suppressed.
    pub fn silent() -> Self {
        Self {
            haptic: HapticDirective::None,
            ..Self::default()
        }
    }
}

/// A notification request.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationItem {
    id: NotificationId,
    kind: NotificationKind,
    message: Arc<str>,
    priority: Priority,
    options: Options,
    action: Option<NotificationAction>,
    coalescing_key: Option<CoalescingKey>,
}

impl NotificationItem {
    /// Creates an item with a fresh id and the kind's default priority.
    pub fn new(kind: NotificationKind, message: impl Into<Arc<str>>) -> Self {
        Self {
            id: NotificationId::next(),
            priority: kind.default_priority(),
            kind,
            message: message.into(),
            options: Options::default(),
            action: None,
            coalescing_key: None,
        }
    }

    /// Success item.
    pub fn success(message: impl Into<Arc<str>>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    /// Error item.
    pub fn error(message: impl Into<Arc<str>>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    /// Info item.
    pub fn info(message: impl Into<Arc<str>>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    /// Warning item.
    pub fn warning(message: impl Into<Arc<str>>) -> Self {
        Self::new(NotificationKind::Warning, message)
    }

    /// Overrides the kind-derived priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Replaces all options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Sets the visible duration.
    #[must_use]
    pub fn with_duration(mut self, duration: DisplayDuration) -> Self {
        self.options.duration = Some(duration);
        self
    }

    /// Sets the haptic directive.
    #[must_use]
    pub fn with_haptic(mut self, haptic: HapticDirective) -> Self {
        self.options.haptic = haptic;
        self
    }

    /// Sets the dedup window.
    #[must_use]
    pub fn with_dedup_window(mut self, window: Duration) -> Self {
        self.options.dedup_window = Some(window);
        self
    }

    /// Attaches an action button.
    #[must_use]
    pub fn with_action(mut self, action: NotificationAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Sets an explicit coalescing key.
    #[must_use]
    pub fn with_coalescing_key(mut self, key: CoalescingKey) -> Self {
        self.coalescing_key = Some(key);
        self
    }

    #[inline]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> &NotificationKind {
        &self.kind
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[inline]
    pub fn action(&self) -> Option<&NotificationAction> {
        self.action.as_ref()
    }

    /// Explicit coalescing key, if the caller supplied one.
    #[inline]
    pub fn coalescing_key(&self) -> Option<CoalescingKey> {
        self.coalescing_key
    }

    /// Visible duration, falling back to built-in defaults if unresolved.
    pub fn duration(&self) -> DisplayDuration {
        self.options
            .duration
            .unwrap_or_else(|| ToastConfig::default().durations.for_item(self))
    }

    /// Dedup window, falling back to the built-in default if unresolved.
    pub fn dedup_window(&self) -> Duration {
        self.options
            .dedup_window
            .unwrap_or(ToastConfig::default().dedup_window)
    }

    /// Fills every unset option from `cfg` and pins the coalescing key.
    ///
    /// Called once at admission; after this the item is frozen.
    pub(crate) fn resolved(mut self, cfg: &ToastConfig) -> Self {
        if self.options.duration.is_none() {
            self.options.duration = Some(cfg.durations.for_item(&self));
        }
        if self.options.dedup_window.is_none() {
            self.options.dedup_window = Some(cfg.dedup_window);
        }
        if !cfg.haptics_enabled {
            self.options.haptic = HapticDirective::Disabled;
        }
        self.coalescing_key = Some(cfg.key_derivation.key_for(&self));
        self
    }
}
