//! Single-slot timer with pause/resume.
//!
//! At most one timer exists at a time and it always belongs to the item in
//! the slot. Expiry is reported with the id it was armed for; the scheduler
//! feeds that id to the state machine, which ignores it if the slot has moved
//! on.
//!
//! A duration too long to be represented as an instant arms a timer that
//! never fires, the same as a persistent item.

use std::time::Duration;

use tokio::time::Instant;

use crate::notification::NotificationId;

/// What an expiry means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPurpose {
    /// Visible duration elapsed.
    AutoDismiss,
    /// Exit grace elapsed.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running { deadline: Instant },
    /// Running, but the deadline lies past the clock's range.
    Unbounded,
    Paused { remaining: Duration },
}

impl Phase {
    fn running(now: Instant, after: Duration) -> Self {
        match now.checked_add(after) {
            Some(deadline) => Phase::Running { deadline },
            None => Phase::Unbounded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Armed {
    id: NotificationId,
    purpose: TimerPurpose,
    phase: Phase,
}

/// The slot's only timer.
#[derive(Debug, Default)]
pub struct SlotTimer {
    armed: Option<Armed>,
}

impl SlotTimer {
    /// Arms (replacing any previous timer).
    ///
    /// If the timer is currently held paused, a new auto-dismiss timer starts
    /// paused too.
    pub fn arm(&mut self, id: NotificationId, purpose: TimerPurpose, after: Duration, now: Instant, paused: bool) {
        let phase = if paused && purpose == TimerPurpose::AutoDismiss {
            Phase::Paused { remaining: after }
        } else {
            Phase::running(now, after)
        };
        self.armed = Some(Armed { id, purpose, phase });
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Freezes a running auto-dismiss timer; exit timers keep running.
    pub fn pause(&mut self, now: Instant) {
        if let Some(armed) = self.armed.as_mut() {
            if armed.purpose == TimerPurpose::AutoDismiss {
                match armed.phase {
                    Phase::Running { deadline } => {
                        armed.phase = Phase::Paused {
                            remaining: deadline.saturating_duration_since(now),
                        };
                    }
                    Phase::Unbounded => {
                        armed.phase = Phase::Paused {
                            remaining: Duration::MAX,
                        };
                    }
                    Phase::Paused { .. } => {}
                }
            }
        }
    }

    /// Restarts a paused timer with whatever time it had left.
    pub fn resume(&mut self, now: Instant) {
        if let Some(armed) = self.armed.as_mut() {
            if let Phase::Paused { remaining } = armed.phase {
                armed.phase = Phase::running(now, remaining);
            }
        }
    }

    /// When the timer fires, if it is running.
    pub fn deadline(&self) -> Option<Instant> {
        match self.armed?.phase {
            Phase::Running { deadline } => Some(deadline),
            Phase::Unbounded | Phase::Paused { .. } => None,
        }
    }

    /// Time left before expiry (paused or not).
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self.armed?.phase {
            Phase::Running { deadline } => Some(deadline.saturating_duration_since(now)),
            Phase::Unbounded => Some(Duration::MAX),
            Phase::Paused { remaining } => Some(remaining),
        }
    }

    /// Disarms and returns the timer if its deadline has passed.
    pub fn take_expired(&mut self, now: Instant) -> Option<(NotificationId, TimerPurpose)> {
        let armed = self.armed?;
        match armed.phase {
            Phase::Running { deadline } if deadline <= now => {
                self.armed = None;
                Some((armed.id, armed.purpose))
            }
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    #[cfg(test)]
    pub fn is_paused(&self) -> bool {
        matches!(
            self.armed,
            Some(Armed {
                phase: Phase::Paused { .. },
                ..
            })
        )
    }
}
