//! # Notification kinds and priorities.
//!
//! [`NotificationKind`] is the closed set of toast flavours. Each kind maps to a
//! default [`Priority`] (used by admission and interruption) and a default
//! haptic effect (see [`resolve_haptic`](crate::haptics::resolve_haptic)).
//!
//! ## Default priorities
//! ```text
//! success ─┐
//! info    ─┼─► Normal
//! custom  ─┘
//! warning ───► Elevated
//! error   ───► Critical
//! ```

use std::fmt;
use std::sync::Arc;

/// Ordered urgency of a notification.
///
/// `Normal < Elevated < Critical`. A visible item is only ever preempted by a
/// **strictly** higher priority (see [`Priority::can_interrupt`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    /// Routine feedback (saved, copied, sent).
    #[default]
    Normal,
    /// Something the user should notice soon.
    Elevated,
    /// Must be seen now; preempts anything lower.
    Critical,
}

impl Priority {
    /// Returns `true` iff `self` is strictly more urgent than `other`.
    ///
    /// # Example
    /// ```
    /// use toastvisor::Priority;
    ///
    /// assert!(Priority::Critical.can_interrupt(Priority::Normal));
    /// assert!(!Priority::Elevated.can_interrupt(Priority::Elevated));
    /// assert!(!Priority::Normal.can_interrupt(Priority::Critical));
    /// ```
    #[inline]
    #[must_use]
    pub fn can_interrupt(self, other: Priority) -> bool {
        self > other
    }

    /// Short stable label for logs/metrics.
    pub fn as_label(self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Elevated => "elevated",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Flavour of a notification.
///
/// `Custom` carries opaque references to an icon and an accent resource; the
/// engine never interprets them, the renderer does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Operation completed.
    Success,
    /// Operation failed.
    Error,
    /// Neutral information.
    Info,
    /// Non-blocking warning.
    Warning,
    /// Application-defined look.
    Custom {
        /// Renderer-side icon reference.
        icon: Arc<str>,
        /// Renderer-side accent colour reference.
        accent: Arc<str>,
    },
}

impl NotificationKind {
    /// Builds a custom kind.
    pub fn custom(icon: impl Into<Arc<str>>, accent: impl Into<Arc<str>>) -> Self {
        Self::Custom {
            icon: icon.into(),
            accent: accent.into(),
        }
    }

    /// Priority used when the item does not override it.
    #[must_use]
    pub fn default_priority(&self) -> Priority {
        match self {
            NotificationKind::Success | NotificationKind::Info | NotificationKind::Custom { .. } => {
                Priority::Normal
            }
            NotificationKind::Warning => Priority::Elevated,
            NotificationKind::Error => Priority::Critical,
        }
    }

    /// Short stable label for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
            NotificationKind::Custom { .. } => "custom",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
