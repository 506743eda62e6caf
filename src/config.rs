//! # Engine configuration.
//!
//! Provides [`ToastConfig`], the centralized settings for the toast engine.
//!
//! Config is used in two ways:
//! 1. **Engine creation**: `ToastEngine::builder(config)`
//! 2. **Item defaults**: unset [`Options`](crate::Options) fields are filled from
//!    the config when the item is admitted.
//!
//! ## Sentinel values
//! - `rate_limit = 0` → unlimited (no rate limiter)
//! - `exit_grace = 0s` → dismissals land in `idle` immediately
//! - `frame_drop_budget = 0` → never shed for rendering performance

use std::time::Duration;

use crate::gesture::GestureThresholds;
use crate::notification::{DisplayDuration, KeyDerivation, NotificationItem, Priority};

/// Default visible durations, by priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DurationDefaults {
    /// `Normal` items.
    pub normal: DisplayDuration,
    /// `Elevated` items.
    pub elevated: DisplayDuration,
    /// `Critical` items without an action.
    pub critical: DisplayDuration,
    /// `Critical` items carrying an action (persistent until acted on).
    pub critical_with_action: DisplayDuration,
}

impl DurationDefaults {
    /// Default duration for an item that did not choose one.
    pub fn for_item(&self, item: &NotificationItem) -> DisplayDuration {
        match item.priority() {
            Priority::Normal => self.normal,
            Priority::Elevated => self.elevated,
            Priority::Critical if item.action().is_some() => self.critical_with_action,
            Priority::Critical => self.critical,
        }
    }
}

impl Default for DurationDefaults {
    /// `4s` normal, `6s` elevated, `8s` critical, persistent critical-with-action.
    fn default() -> Self {
        Self {
            normal: DisplayDuration::Timed(Duration::from_secs(4)),
            elevated: DisplayDuration::Timed(Duration::from_secs(6)),
            critical: DisplayDuration::Timed(Duration::from_secs(8)),
            critical_with_action: DisplayDuration::Persistent,
        }
    }
}

/// Global configuration for the toast engine.
///
/// ## Field semantics
/// - `queue_capacity`: Max items waiting for the slot (min 1; clamped)
/// - `rate_limit`/`rate_window`: Max admissions per sliding window (`0` = unlimited)
/// - `dedup_window`: Default window in which identical keys merge
/// - `exit_grace`: Time spent in `dismissing` before the slot frees (`0s` = immediate)
/// - `mailbox_capacity`: Bound of the command channel feeding the scheduler
/// - `bus_capacity`: Telemetry broadcast ring buffer size (min 1)
///
/// ## Notes
/// All fields are public. Prefer the helper accessors to avoid sprinkling
/// sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct ToastConfig {
    /// Maximum number of queued (not visible) notifications.
    pub queue_capacity: usize,

    /// Maximum accepted admissions per `rate_window`.
    ///
    /// - `0` = unlimited
    /// - `n > 0` = the `n+1`-th admission inside the window is dropped with `RateLimited`
    pub rate_limit: usize,

    /// Sliding window for `rate_limit`.
    pub rate_window: Duration,

    /// Dedup window for items that do not set one.
    pub dedup_window: Duration,

    /// Default visible durations.
    pub durations: DurationDefaults,

    /// Exit animation allowance between `dismissing` and `idle`.
    pub exit_grace: Duration,

    /// Capacity of the command mailbox.
    ///
    /// When full, `show()` waits and `try_show()` returns `PortError::Full`.
    pub mailbox_capacity: usize,

    /// Capacity of the telemetry broadcast bus.
    pub bus_capacity: usize,

    /// Master haptics switch; `false` behaves as `HapticDirective::Disabled` everywhere.
    pub haptics_enabled: bool,

    /// Default coalescing key derivation.
    pub key_derivation: KeyDerivation,

    /// Swipe-to-dismiss thresholds.
    pub gesture: GestureThresholds,

    /// Frame drops per reported animation above which queued `Normal` items are shed.
    pub frame_drop_budget: u32,
}

impl ToastConfig {
    /// Returns the queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }

    /// Returns the rate limit as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → at most `n` admissions per `rate_window`
    #[inline]
    pub fn rate_limit(&self) -> Option<usize> {
        if self.rate_limit == 0 || self.rate_window.is_zero() {
            None
        } else {
            Some(self.rate_limit)
        }
    }

    /// Returns the exit grace as an `Option`.
    ///
    /// - `None` → leave `dismissing` immediately
    /// - `Some(d)` → stay in `dismissing` for `d`
    #[inline]
    pub fn exit_grace(&self) -> Option<Duration> {
        if self.exit_grace.is_zero() {
            None
        } else {
            Some(self.exit_grace)
        }
    }

    /// Returns the frame-drop budget as an `Option` (`None` = never shed).
    #[inline]
    pub fn frame_drop_budget(&self) -> Option<u32> {
        if self.frame_drop_budget == 0 {
            None
        } else {
            Some(self.frame_drop_budget)
        }
    }

    /// Returns the mailbox capacity clamped to a minimum of 1.
    #[inline]
    pub fn mailbox_capacity_clamped(&self) -> usize {
        self.mailbox_capacity.max(1)
    }

    /// Returns the bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for ToastConfig {
    /// Default configuration:
    ///
    /// - `queue_capacity = 20`
    /// - `rate_limit = 5` per `rate_window = 2s`
    /// - `dedup_window = 3s`
    /// - `durations = DurationDefaults::default()`
    /// - `exit_grace = 300ms`
    /// - `mailbox_capacity = 256`, `bus_capacity = 1024`
    /// - `haptics_enabled = true`
    /// - `key_derivation = KindAndMessage`
    /// - `gesture = 30 units / 200 units·s⁻¹`
    /// - `frame_drop_budget = 30`
    fn default() -> Self {
        Self {
            queue_capacity: 20,
            rate_limit: 5,
            rate_window: Duration::from_secs(2),
            dedup_window: Duration::from_secs(3),
            durations: DurationDefaults::default(),
            exit_grace: Duration::from_millis(300),
            mailbox_capacity: 256,
            bus_capacity: 1024,
            haptics_enabled: true,
            key_derivation: KeyDerivation::default(),
            gesture: GestureThresholds::default(),
            frame_drop_budget: 30,
        }
    }
}
