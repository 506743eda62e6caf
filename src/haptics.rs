//! # Haptic directive resolution.
//!
//! Every notification carries a [`HapticDirective`]. When the item starts
//! presenting, the scheduler resolves it once via [`resolve_haptic`] and hands
//! the resulting [`HapticEffect`] (if any) to the injected [`Haptics`]
//! collaborator. Resolution is pure; playback is fire-and-forget and never
//! retried.
//!
//! ```text
//! Disabled ─────────► none
//! None ─────────────► none
//! Explicit(effect) ─► effect
//! Auto ──► success  ► SuccessNotification
//!          error    ► ErrorNotification
//!          warning  ► WarningNotification
//!          info     ► LightImpact
//!          custom   ► MediumImpact
//! ```

use crate::notification::NotificationKind;

/// A concrete haptic pattern understood by the haptic collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticEffect {
    SuccessNotification,
    ErrorNotification,
    WarningNotification,
    LightImpact,
    MediumImpact,
    HeavyImpact,
    Selection,
}

/// Per-notification haptic request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HapticDirective {
    /// Use the kind's default effect.
    #[default]
    Auto,
    /// No haptic for this item.
    None,
    /// Play exactly this effect.
    Explicit(HapticEffect),
    /// Haptics switched off (e.g. by a user setting); always yields nothing.
    Disabled,
}

/// Resolves a directive against a kind.
///
/// # Example
/// ```
/// use toastvisor::{HapticDirective, HapticEffect, NotificationKind, resolve_haptic};
///
/// assert_eq!(
///     resolve_haptic(&NotificationKind::Error, HapticDirective::Auto),
///     Some(HapticEffect::ErrorNotification),
/// );
/// assert_eq!(resolve_haptic(&NotificationKind::Error, HapticDirective::Disabled), None);
/// ```
#[must_use]
pub fn resolve_haptic(kind: &NotificationKind, directive: HapticDirective) -> Option<HapticEffect> {
    match directive {
        HapticDirective::Disabled | HapticDirective::None => None,
        HapticDirective::Explicit(effect) => Some(effect),
        HapticDirective::Auto => Some(match kind {
            NotificationKind::Success => HapticEffect::SuccessNotification,
            NotificationKind::Error => HapticEffect::ErrorNotification,
            NotificationKind::Warning => HapticEffect::WarningNotification,
            NotificationKind::Info => HapticEffect::LightImpact,
            NotificationKind::Custom { .. } => HapticEffect::MediumImpact,
        }),
    }
}

/// Haptic hardware collaborator.
///
/// Called on the scheduler's thread of control; implementations must return
/// quickly (queue the effect, don't block on hardware).
pub trait Haptics: Send + Sync + 'static {
    /// Plays a resolved effect.
    fn play(&self, effect: HapticEffect);
}

/// Default collaborator: does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn play(&self, _effect: HapticEffect) {}
}
