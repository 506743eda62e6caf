//! # Admission queue
//!
//! Holds notifications that are waiting for the presentation slot and applies
//! coalescing and overload shedding on insert.
//!
//! ## Admission order
//! ```text
//! enqueue(item, now)
//!   ├─ 1. same key queued & inside its dedup window ─► replace in place ─► Coalesced(original)
//!   ├─ 2. rate window saturated ───────────────────► Dropped(RateLimited)
//!   ├─ 3. at capacity:
//!   │      ├─ item.priority ≤ lowest queued ───────► Dropped(QueueFull)
//!   │      └─ item.priority > lowest queued ───────► evict newest lowest ─► Accepted
//!   └─ 4. otherwise ───────────────────────────────► Accepted
//! ```
//!
//! ## Pop order
//! Strict priority; FIFO within a priority band. Under sustained high-priority
//! load `Normal` items may wait indefinitely (no aging).

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

use crate::notification::{
    CoalescingKey, DropReason, KeyDerivation, NotificationId, NotificationItem, Priority,
};

/// Result of offering an item to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionOutcome {
    /// Queued as a new entry.
    Accepted,
    /// Replaced an equivalent queued item (same position).
    Coalesced {
        /// Id of the item that was replaced.
        replaced: NotificationId,
    },
    /// Never queued.
    Dropped(DropReason),
    /// Equivalent to the item currently visible; ignored.
    AlreadyVisible(NotificationId),
}

impl AdmissionOutcome {
    /// Returns whether the item now occupies a queue position.
    #[inline]
    pub fn is_queued(self) -> bool {
        matches!(
            self,
            AdmissionOutcome::Accepted | AdmissionOutcome::Coalesced { .. }
        )
    }
}

/// Outcome plus the id of any item evicted to make room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub outcome: AdmissionOutcome,
    /// Lower-priority item dropped (`QueueFull`) to make room, if any.
    pub evicted: Option<NotificationId>,
}

impl Admission {
    fn only(outcome: AdmissionOutcome) -> Self {
        Self {
            outcome,
            evicted: None,
        }
    }
}

#[derive(Debug)]
struct Queued {
    item: NotificationItem,
    key: CoalescingKey,
    seq: u64,
    admitted_at: Instant,
}

/// Sliding-window admission counter.
#[derive(Debug)]
struct RateLimiter {
    limit: usize,
    window: Duration,
    accepted: VecDeque<Instant>,
}

impl RateLimiter {
    fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            accepted: VecDeque::new(),
        }
    }

    fn saturated(&mut self, now: Instant) -> bool {
        while let Some(&t) = self.accepted.front() {
            if now.saturating_duration_since(t) >= self.window {
                self.accepted.pop_front();
            } else {
                break;
            }
        }
        self.accepted.len() >= self.limit
    }

    fn record(&mut self, now: Instant) {
        self.accepted.push_back(now);
    }
}

/// Bounded, priority-ordered waiting room for notifications.
#[derive(Debug)]
pub struct AdmissionQueue {
    entries: Vec<Queued>,
    capacity: usize,
    limiter: Option<RateLimiter>,
    keys: KeyDerivation,
    next_back: u64,
    next_front: u64,
}

/// Sequence numbers start mid-range so requeued items can go in front.
const SEQ_ORIGIN: u64 = 1 << 62;

impl AdmissionQueue {
    /// Creates a queue holding at most `capacity` items (min 1).
    ///
    /// `rate` is `(limit, window)`; `None` disables rate limiting.
    pub fn new(capacity: usize, rate: Option<(usize, Duration)>) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
            limiter: rate.map(|(limit, window)| RateLimiter::new(limit, window)),
            keys: KeyDerivation::default(),
            next_back: SEQ_ORIGIN,
            next_front: SEQ_ORIGIN - 1,
        }
    }

    /// Derives coalescing keys with `keys` for items that carry none.
    #[must_use]
    pub fn with_key_derivation(mut self, keys: KeyDerivation) -> Self {
        self.keys = keys;
        self
    }

    /// Offers an item; see the module docs for the decision order.
    pub fn enqueue(&mut self, item: NotificationItem, now: Instant) -> Admission {
        let key = self.keys.key_for(&item);

        if let Some(slot) = self
            .entries
            .iter_mut()
            .find(|q| q.key == key && now.saturating_duration_since(q.admitted_at) <= q.item.dedup_window())
        {
            let replaced = slot.item.id();
            slot.item = item;
            slot.admitted_at = now;
            return Admission::only(AdmissionOutcome::Coalesced { replaced });
        }

        if let Some(limiter) = self.limiter.as_mut() {
            if limiter.saturated(now) {
                return Admission::only(AdmissionOutcome::Dropped(DropReason::RateLimited));
            }
        }

        let mut evicted = None;
        if self.entries.len() >= self.capacity {
            match self.lowest_priority() {
                Some(lowest) if item.priority() > lowest => {
                    evicted = self.evict_newest_of(lowest);
                }
                _ => return Admission::only(AdmissionOutcome::Dropped(DropReason::QueueFull)),
            }
        }

        let seq = self.next_back;
        self.next_back += 1;
        self.entries.push(Queued {
            item,
            key,
            seq,
            admitted_at: now,
        });
        if let Some(limiter) = self.limiter.as_mut() {
            limiter.record(now);
        }

        Admission {
            outcome: AdmissionOutcome::Accepted,
            evicted,
        }
    }

    /// Puts an item back at the head of its priority band, bypassing admission.
    ///
    /// Used for [`Effect::Requeue`](super::machine::Effect::Requeue), which the
    /// state machine emits when asked to interrupt with an item that does not
    /// outrank the visible one.
    pub fn requeue(&mut self, item: NotificationItem, now: Instant) {
        let key = self.keys.key_for(&item);
        let seq = self.next_front;
        self.next_front = self.next_front.saturating_sub(1);
        self.entries.push(Queued {
            item,
            key,
            seq,
            admitted_at: now,
        });
    }

    /// Removes and returns the next item to present.
    pub fn pop(&mut self) -> Option<NotificationItem> {
        let idx = self.head_index()?;
        Some(self.entries.swap_remove(idx).item)
    }

    /// Priority of the next item to present.
    pub fn peek_priority(&self) -> Option<Priority> {
        self.head_index().map(|i| self.entries[i].item.priority())
    }

    /// Removes a specific item.
    pub fn take(&mut self, id: NotificationId) -> Option<NotificationItem> {
        let idx = self.entries.iter().position(|q| q.item.id() == id)?;
        Some(self.entries.swap_remove(idx).item)
    }

    /// Removes every item whose priority is `priority`; returns their ids in pop order.
    pub fn shed(&mut self, priority: Priority) -> Vec<NotificationId> {
        let mut shed: Vec<(u64, NotificationId)> = Vec::new();
        self.entries.retain(|q| {
            if q.item.priority() == priority {
                shed.push((q.seq, q.item.id()));
                false
            } else {
                true
            }
        });
        shed.sort_unstable_by_key(|(seq, _)| *seq);
        shed.into_iter().map(|(_, id)| id).collect()
    }

    /// Empties the queue; returns how many items were removed.
    pub fn clear(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    /// Returns whether an item is queued.
    pub fn contains(&self, id: NotificationId) -> bool {
        self.entries.iter().any(|q| q.item.id() == id)
    }

    /// Ids in the order they would be popped.
    pub fn ids(&self) -> Vec<NotificationId> {
        let mut order: Vec<&Queued> = self.entries.iter().collect();
        order.sort_unstable_by(|a, b| {
            b.item
                .priority()
                .cmp(&a.item.priority())
                .then(a.seq.cmp(&b.seq))
        });
        order.into_iter().map(|q| q.item.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn head_index(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| {
                a.item
                    .priority()
                    .cmp(&b.item.priority())
                    .then(b.seq.cmp(&a.seq))
            })
            .map(|(i, _)| i)
    }

    fn lowest_priority(&self) -> Option<Priority> {
        self.entries.iter().map(|q| q.item.priority()).min()
    }

    fn evict_newest_of(&mut self, priority: Priority) -> Option<NotificationId> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, q)| q.item.priority() == priority)
            .max_by_key(|(_, q)| q.seq)
            .map(|(i, _)| i)?;
        Some(self.entries.swap_remove(idx).item.id())
    }
}
