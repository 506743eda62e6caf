//! # Presentation state machine.
//!
//! Pure lifecycle of the single visible slot. [`step`] takes the current
//! [`PresentationState`] and one [`SlotEvent`] and returns the next state plus
//! the [`Effect`]s the scheduler must carry out (timers, telemetry, queue
//! edits). No I/O, no clock, no allocation beyond the effect list.
//!
//! ```text
//!                 SlotIdleAndQueueNonEmpty
//!        ┌──────┐ ───────────────────────► ┌────────────┐
//!        │ Idle │                          │ Presenting │◄──────────┐
//!        └──────┘ ◄─── DismissAll ──────── └────────────┘           │
//!           ▲                                 │       │             │ Handoff
//!           │ ExitCompleted   TimerExpired /  │       │ HigherPriorityArrived
//!           │                 DismissRequested│       │ (warranted) │
//!           │                 SceneBecameInactive     ▼             │
//!        ┌────────────┐ ◄─────────────────────┘   ┌─────────────┐   │
//!        │ Dismissing │                           │ Interrupted │ ──┘
//!        └────────────┘                           └─────────────┘
//! ```
//!
//! Every event that does not apply to the current state is a no-op, except
//! [`SlotEvent::HigherPriorityArrived`], whose item is handed back through
//! [`Effect::Requeue`] so it is never lost.
//!
//! The engine's scheduler only raises `HigherPriorityArrived` after checking
//! that the queue head outranks the visible item, so under the engine
//! `Requeue` does not occur. It exists for callers that drive [`step`]
//! directly: whoever sends the event owns putting the item back, and
//! [`AdmissionQueue::requeue`](super::queue::AdmissionQueue::requeue) places
//! it at the head of its band.

use std::fmt;
use std::time::Duration;

use crate::notification::{DismissalMethod, NotificationId, NotificationItem};

/// Name of a [`PresentationState`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StateLabel {
    #[default]
    Idle,
    Presenting,
    Dismissing,
    Interrupted,
}

impl StateLabel {
    /// Short stable label for logs/metrics.
    pub fn as_label(self) -> &'static str {
        match self {
            StateLabel::Idle => "idle",
            StateLabel::Presenting => "presenting",
            StateLabel::Dismissing => "dismissing",
            StateLabel::Interrupted => "interrupted",
        }
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// State of the presentation slot. Owns the visible item(s).
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PresentationState {
    /// Nothing visible, no timer armed.
    #[default]
    Idle,
    /// `item` is visible.
    Presenting(NotificationItem),
    /// `item` is leaving.
    Dismissing {
        item: NotificationItem,
        method: DismissalMethod,
    },
    /// `current` is being retired so that `next` can show.
    Interrupted {
        current: NotificationItem,
        next: NotificationItem,
    },
}

impl PresentationState {
    pub fn label(&self) -> StateLabel {
        match self {
            PresentationState::Idle => StateLabel::Idle,
            PresentationState::Presenting(_) => StateLabel::Presenting,
            PresentationState::Dismissing { .. } => StateLabel::Dismissing,
            PresentationState::Interrupted { .. } => StateLabel::Interrupted,
        }
    }

    /// The item a renderer should draw, if any.
    pub fn visible(&self) -> Option<&NotificationItem> {
        match self {
            PresentationState::Idle => None,
            PresentationState::Presenting(item) => Some(item),
            PresentationState::Dismissing { item, .. } => Some(item),
            PresentationState::Interrupted { next, .. } => Some(next),
        }
    }

    /// The item currently in `Presenting`, if any.
    pub fn presenting(&self) -> Option<&NotificationItem> {
        match self {
            PresentationState::Presenting(item) => Some(item),
            _ => None,
        }
    }

    /// Number of items in `Presenting` or `Dismissing`; never more than one.
    pub fn active_count(&self) -> usize {
        match self {
            PresentationState::Idle => 0,
            PresentationState::Presenting(_) | PresentationState::Dismissing { .. } => 1,
            // `current` has already been dismissed and `next` is not yet shown.
            PresentationState::Interrupted { .. } => 0,
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, PresentationState::Idle)
    }
}

/// Input to [`step`].
#[derive(Debug, Clone, PartialEq)]
pub enum SlotEvent {
    /// The slot is free and this item was popped from the queue.
    SlotIdleAndQueueNonEmpty(NotificationItem),
    /// The auto-dismiss timer for `id` fired.
    TimerExpired(NotificationId),
    /// Someone asked for `id` to go away.
    DismissRequested(NotificationId, DismissalMethod),
    /// An item that may outrank the visible one.
    HigherPriorityArrived(NotificationItem),
    DismissAllRequested,
    /// The hosting scene went away.
    SceneBecameInactive,
    /// The exit of `id` finished.
    ExitCompleted(NotificationId),
    /// Completes an interruption by promoting the pending item.
    Handoff,
}

/// Side effect requested by [`step`], applied by the scheduler in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Slot changed state; `id` is the item the new state concerns.
    Transition {
        from: StateLabel,
        to: StateLabel,
        id: Option<NotificationId>,
    },
    /// Item became visible.
    Shown(NotificationItem),
    /// Visible item started leaving.
    Dismissed {
        id: NotificationId,
        method: DismissalMethod,
    },
    /// Arm the auto-dismiss timer.
    ArmTimer { id: NotificationId, after: Duration },
    /// Cancel whatever timer is armed.
    CancelTimer,
    /// Start the exit of `id`; followed later by [`SlotEvent::ExitCompleted`].
    BeginExit { id: NotificationId },
    /// Put the item back at the head of its priority band.
    Requeue(NotificationItem),
    /// Empty the admission queue.
    ClearQueue,
}

/// Result of [`step`].
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: PresentationState,
    pub effects: Vec<Effect>,
}

impl Step {
    fn unchanged(state: PresentationState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

/// Transition function of the presentation slot.
pub fn step(state: PresentationState, event: SlotEvent) -> Step {
    use PresentationState as S;
    use SlotEvent as E;

    match (state, event) {
        (S::Idle, E::SlotIdleAndQueueNonEmpty(item)) => present(StateLabel::Idle, item, Vec::new()),

        (S::Presenting(item), E::TimerExpired(id)) if id == item.id() => {
            begin_dismiss(item, DismissalMethod::Automatic)
        }
        (S::Presenting(item), E::DismissRequested(id, method)) if id == item.id() => {
            begin_dismiss(item, method)
        }
        (S::Presenting(item), E::SceneBecameInactive) => {
            begin_dismiss(item, DismissalMethod::SceneInactive)
        }

        (S::Presenting(current), E::HigherPriorityArrived(next)) => {
            if next.priority().can_interrupt(current.priority()) {
                let effects = vec![
                    Effect::CancelTimer,
                    Effect::Transition {
                        from: StateLabel::Presenting,
                        to: StateLabel::Interrupted,
                        id: Some(next.id()),
                    },
                    Effect::Dismissed {
                        id: current.id(),
                        method: DismissalMethod::Interrupted,
                    },
                ];
                Step {
                    state: S::Interrupted { current, next },
                    effects,
                }
            } else {
                Step {
                    state: S::Presenting(current),
                    effects: vec![Effect::Requeue(next)],
                }
            }
        }
        (state, E::HigherPriorityArrived(next)) => Step {
            state,
            effects: vec![Effect::Requeue(next)],
        },

        (S::Interrupted { next, .. }, E::Handoff) => {
            present(StateLabel::Interrupted, next, Vec::new())
        }

        (S::Dismissing { item, .. }, E::ExitCompleted(id)) if id == item.id() => Step {
            state: S::Idle,
            effects: vec![Effect::Transition {
                from: StateLabel::Dismissing,
                to: StateLabel::Idle,
                id: None,
            }],
        },

        (S::Idle, E::DismissAllRequested) => Step {
            state: S::Idle,
            effects: vec![Effect::ClearQueue],
        },
        (S::Presenting(item), E::DismissAllRequested) => Step {
            state: S::Idle,
            effects: vec![
                Effect::CancelTimer,
                Effect::Transition {
                    from: StateLabel::Presenting,
                    to: StateLabel::Idle,
                    id: None,
                },
                Effect::Dismissed {
                    id: item.id(),
                    method: DismissalMethod::Programmatic,
                },
                Effect::ClearQueue,
            ],
        },
        (state @ (S::Dismissing { .. } | S::Interrupted { .. }), E::DismissAllRequested) => Step {
            effects: vec![
                Effect::CancelTimer,
                Effect::Transition {
                    from: state.label(),
                    to: StateLabel::Idle,
                    id: None,
                },
                Effect::ClearQueue,
            ],
            state: S::Idle,
        },

        (state, _) => Step::unchanged(state),
    }
}

fn present(from: StateLabel, item: NotificationItem, mut effects: Vec<Effect>) -> Step {
    let id = item.id();
    effects.push(Effect::Transition {
        from,
        to: StateLabel::Presenting,
        id: Some(id),
    });
    effects.push(Effect::Shown(item.clone()));
    if let Some(after) = item.duration().as_timed() {
        effects.push(Effect::ArmTimer { id, after });
    }
    Step {
        state: PresentationState::Presenting(item),
        effects,
    }
}

fn begin_dismiss(item: NotificationItem, method: DismissalMethod) -> Step {
    let id = item.id();
    Step {
        state: PresentationState::Dismissing { item, method },
        effects: vec![
            Effect::CancelTimer,
            Effect::Transition {
                from: StateLabel::Presenting,
                to: StateLabel::Dismissing,
                id: Some(id),
            },
            Effect::Dismissed { id, method },
            Effect::BeginExit { id },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{DisplayDuration, Priority};

    fn presenting(item: &NotificationItem) -> PresentationState {
        PresentationState::Presenting(item.clone())
    }

    #[test]
    fn idle_presents_and_arms_timer() {
        let item = NotificationItem::info("hi").with_duration(DisplayDuration::Timed(
            Duration::from_secs(4),
        ));
        let s = step(
            PresentationState::Idle,
            SlotEvent::SlotIdleAndQueueNonEmpty(item.clone()),
        );
        assert_eq!(s.state, presenting(&item));
        assert_eq!(
            s.effects,
            vec![
                Effect::Transition {
                    from: StateLabel::Idle,
                    to: StateLabel::Presenting,
                    id: Some(item.id()),
                },
                Effect::Shown(item.clone()),
                Effect::ArmTimer {
                    id: item.id(),
                    after: Duration::from_secs(4),
                },
            ]
        );
    }

    #[test]
    fn persistent_item_arms_nothing() {
        let item = NotificationItem::error("sticky").with_duration(DisplayDuration::Persistent);
        let s = step(
            PresentationState::Idle,
            SlotEvent::SlotIdleAndQueueNonEmpty(item),
        );
        assert!(!s.effects.iter().any(|e| matches!(e, Effect::ArmTimer { .. })));
    }

    #[test]
    fn timer_expiry_dismisses_automatically() {
        let item = NotificationItem::info("hi");
        let s = step(presenting(&item), SlotEvent::TimerExpired(item.id()));
        assert_eq!(s.state.label(), StateLabel::Dismissing);
        assert!(s.effects.contains(&Effect::Dismissed {
            id: item.id(),
            method: DismissalMethod::Automatic,
        }));
        assert!(s.effects.contains(&Effect::BeginExit { id: item.id() }));
    }

    #[test]
    fn stale_timer_and_mismatched_dismiss_are_noops() {
        let item = NotificationItem::info("hi");
        let other = NotificationItem::info("other");

        let s = step(presenting(&item), SlotEvent::TimerExpired(other.id()));
        assert_eq!(s.state, presenting(&item));
        assert!(s.effects.is_empty());

        let s = step(
            presenting(&item),
            SlotEvent::DismissRequested(other.id(), DismissalMethod::Programmatic),
        );
        assert_eq!(s.state, presenting(&item));
        assert!(s.effects.is_empty());
    }

    #[test]
    fn dismissing_ignores_repeat_dismiss() {
        let item = NotificationItem::info("hi");
        let state = PresentationState::Dismissing {
            item: item.clone(),
            method: DismissalMethod::UserTap,
        };
        let s = step(
            state.clone(),
            SlotEvent::DismissRequested(item.id(), DismissalMethod::UserTap),
        );
        assert_eq!(s.state, state);
        assert!(s.effects.is_empty());
    }

    #[test]
    fn exit_completion_returns_to_idle() {
        let item = NotificationItem::info("hi");
        let state = PresentationState::Dismissing {
            item: item.clone(),
            method: DismissalMethod::Automatic,
        };
        let s = step(state, SlotEvent::ExitCompleted(item.id()));
        assert!(s.state.is_idle());
    }

    #[test]
    fn warranted_interruption_then_handoff() {
        let a = NotificationItem::info("a");
        let b = NotificationItem::error("b");
        let s = step(presenting(&a), SlotEvent::HigherPriorityArrived(b.clone()));
        assert_eq!(s.state.label(), StateLabel::Interrupted);
        assert_eq!(s.state.active_count(), 0);
        assert_eq!(
            s.effects.last(),
            Some(&Effect::Dismissed {
                id: a.id(),
                method: DismissalMethod::Interrupted,
            })
        );

        let s = step(s.state, SlotEvent::Handoff);
        assert_eq!(s.state, presenting(&b));
        assert_eq!(
            s.effects[0],
            Effect::Transition {
                from: StateLabel::Interrupted,
                to: StateLabel::Presenting,
                id: Some(b.id()),
            }
        );
        assert_eq!(s.effects[1], Effect::Shown(b));
    }

    #[test]
    fn unwarranted_interruption_requeues() {
        let a = NotificationItem::error("a");
        let b = NotificationItem::warning("b");
        assert_eq!(b.priority(), Priority::Elevated);
        let s = step(presenting(&a), SlotEvent::HigherPriorityArrived(b.clone()));
        assert_eq!(s.state, presenting(&a));
        assert_eq!(s.effects, vec![Effect::Requeue(b)]);
    }

    #[test]
    fn dismiss_all_from_every_state_lands_idle() {
        let a = NotificationItem::info("a");
        let b = NotificationItem::error("b");
        let states = [
            PresentationState::Idle,
            presenting(&a),
            PresentationState::Dismissing {
                item: a.clone(),
                method: DismissalMethod::UserSwipe,
            },
            PresentationState::Interrupted {
                current: a.clone(),
                next: b.clone(),
            },
        ];
        for state in states {
            let s = step(state, SlotEvent::DismissAllRequested);
            assert!(s.state.is_idle());
            assert_eq!(s.effects.last(), Some(&Effect::ClearQueue));
        }
    }

    #[test]
    fn dismiss_all_reports_programmatic_only_for_presenting() {
        let a = NotificationItem::info("a");
        let s = step(presenting(&a), SlotEvent::DismissAllRequested);
        assert!(s.effects.contains(&Effect::Dismissed {
            id: a.id(),
            method: DismissalMethod::Programmatic,
        }));

        let s = step(
            PresentationState::Dismissing {
                item: a.clone(),
                method: DismissalMethod::Automatic,
            },
            SlotEvent::DismissAllRequested,
        );
        assert!(!s.effects.iter().any(|e| matches!(e, Effect::Dismissed { .. })));
    }

    #[test]
    fn scene_inactive_dismisses_visible_item() {
        let a = NotificationItem::info("a");
        let s = step(presenting(&a), SlotEvent::SceneBecameInactive);
        assert_eq!(
            s.state,
            PresentationState::Dismissing {
                item: a,
                method: DismissalMethod::SceneInactive,
            }
        );
        let s = step(PresentationState::Idle, SlotEvent::SceneBecameInactive);
        assert!(s.state.is_idle() && s.effects.is_empty());
    }

    #[test]
    fn labels_are_lowercase() {
        assert_eq!(StateLabel::Presenting.to_string(), "presenting");
        assert_eq!(StateLabel::Interrupted.as_label(), "interrupted");
    }
}
