//! Why a notification left the slot, or never reached it.

use std::fmt;

/// How a visible notification was retired.
///
/// Purely observational: recorded in telemetry for every exit, never fed back
/// into scheduling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissalMethod {
    /// Auto-dismiss timer expired.
    Automatic,
    /// User tapped the toast body.
    UserTap,
    /// User swiped the toast past the dismiss threshold.
    UserSwipe,
    /// User tapped the toast's action.
    ActionTap,
    /// Application code called `dismiss`/`dismiss_all`.
    Programmatic,
    /// Preempted by a higher-priority notification.
    Interrupted,
    /// The hosting scene went away.
    SceneInactive,
}

impl DismissalMethod {
    /// Short stable label (snake_case) for logs/metrics.
    pub fn as_label(self) -> &'static str {
        match self {
            DismissalMethod::Automatic => "automatic",
            DismissalMethod::UserTap => "user_tap",
            DismissalMethod::UserSwipe => "user_swipe",
            DismissalMethod::ActionTap => "action_tap",
            DismissalMethod::Programmatic => "programmatic",
            DismissalMethod::Interrupted => "interrupted",
            DismissalMethod::SceneInactive => "scene_inactive",
        }
    }
}

impl fmt::Display for DismissalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Why a notification was shed before it was ever shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// Queue at capacity and the item lost the priority comparison.
    QueueFull,
    /// Too many admissions in the rate window.
    RateLimited,
    /// No scene is attached to present into.
    SceneUnavailable,
    /// Shed on a memory warning.
    LowMemory,
    /// Host is backgrounded and the item is not urgent enough to wait.
    Backgrounded,
    /// Shed because the renderer reported sustained frame drops.
    PerformanceOptimization,
}

impl DropReason {
    /// Short stable label (snake_case) for logs/metrics.
    pub fn as_label(self) -> &'static str {
        match self {
            DropReason::QueueFull => "queue_full",
            DropReason::RateLimited => "rate_limited",
            DropReason::SceneUnavailable => "scene_unavailable",
            DropReason::LowMemory => "low_memory",
            DropReason::Backgrounded => "backgrounded",
            DropReason::PerformanceOptimization => "performance_optimization",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
