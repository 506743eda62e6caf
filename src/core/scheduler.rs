//! # Scheduler: the single owner of the presentation slot.
//!
//! [`Scheduler`] owns the [`PresentationState`], the [`AdmissionQueue`], the
//! [`SlotTimer`] and the collaborators (telemetry sinks, haptics, action
//! dispatch, performance monitor). It is a synchronous value driven by
//! explicit instants; the [`actor`](super::actor) serializes callers onto it
//! and sleeps until [`Scheduler::next_deadline`].
//!
//! ## Flow of one command
//! ```text
//! command(now) ──► admission / scene / overload bookkeeping
//!                        │
//!                        ▼
//!                 drive(SlotEvent) ──► machine::step ──► effects ──► timer, queue,
//!                        │                                            telemetry, haptics
//!                        ▼
//!                 settle(now): hand off interruptions, finish immediate exits,
//!                              promote the queue head while the scene allows it
//! ```
//!
//! ## Rules
//! - Every state change is reported to every telemetry sink, in order, before
//!   the command returns.
//! - Promotion (idle → presenting, or interruption by the queue head) happens
//!   only while the scene is active and connected.
//! - Commands that name an id not in the slot are no-ops.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::actions::{ActionDispatch, ActionRegistry};
use crate::config::ToastConfig;
use crate::events::Event;
use crate::gesture::{Decision, DragSample};
use crate::haptics::{Haptics, NoopHaptics, resolve_haptic};
use crate::notification::{
    DismissalMethod, DropReason, NotificationId, NotificationItem, Priority,
};
use crate::performance::{PerformanceMonitor, PerformanceStats, Pressure};
use crate::telemetry::{NoopTelemetry, Telemetry};

use super::machine::{Effect, PresentationState, SlotEvent, StateLabel, step};
use super::queue::{Admission, AdmissionOutcome, AdmissionQueue};
use super::timer::{SlotTimer, TimerPurpose};

/// Lifecycle signal forwarded by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneSignal {
    /// Host went to the background: pause the visible timer.
    Inactive,
    /// Host came back: resume the visible timer.
    Active,
    /// Presentation surface went away: retire the visible item.
    Disconnected,
    /// Presentation surface is back.
    Connected,
}

/// Scene condition as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneMode {
    #[default]
    Active,
    Inactive,
    Disconnected,
}

impl SceneMode {
    /// Short stable label for logs/metrics.
    pub fn as_label(self) -> &'static str {
        match self {
            SceneMode::Active => "active",
            SceneMode::Inactive => "inactive",
            SceneMode::Disconnected => "disconnected",
        }
    }
}

/// What a renderer needs to draw the slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PresentationSnapshot {
    pub state: StateLabel,
    /// Item to draw, if any.
    pub item: Option<NotificationItem>,
    /// Items waiting.
    pub queued: usize,
    pub scene: SceneMode,
}

/// External parties the scheduler calls.
pub struct Collaborators {
    /// Sinks called on every event, in order.
    pub telemetry: Vec<Arc<dyn Telemetry>>,
    pub haptics: Arc<dyn Haptics>,
    pub actions: Arc<dyn ActionDispatch>,
    pub performance: PerformanceMonitor,
}

impl Collaborators {
    /// No-op collaborators for `cfg`.
    pub fn new(cfg: &ToastConfig) -> Self {
        Self {
            telemetry: vec![Arc::new(NoopTelemetry)],
            haptics: Arc::new(NoopHaptics),
            actions: Arc::new(ActionRegistry::new()),
            performance: PerformanceMonitor::from_config(cfg),
        }
    }
}

/// Synchronous presentation scheduler.
pub struct Scheduler {
    cfg: ToastConfig,
    state: PresentationState,
    queue: AdmissionQueue,
    timer: SlotTimer,
    shown_at: Option<Instant>,
    foreground: bool,
    connected: bool,
    telemetry: Vec<Arc<dyn Telemetry>>,
    haptics: Arc<dyn Haptics>,
    actions: Arc<dyn ActionDispatch>,
    performance: PerformanceMonitor,
}

impl Scheduler {
    /// Creates an idle scheduler.
    pub fn new(cfg: ToastConfig, collaborators: Collaborators) -> Self {
        let rate = cfg.rate_limit().map(|limit| (limit, cfg.rate_window));
        let queue = AdmissionQueue::new(cfg.queue_capacity_clamped(), rate)
            .with_key_derivation(cfg.key_derivation);
        Self {
            cfg,
            state: PresentationState::Idle,
            queue,
            timer: SlotTimer::default(),
            shown_at: None,
            foreground: true,
            connected: true,
            telemetry: collaborators.telemetry,
            haptics: collaborators.haptics,
            actions: collaborators.actions,
            performance: collaborators.performance,
        }
    }

    /// Admits an item and presents it if the slot allows.
    pub fn show(&mut self, item: NotificationItem, now: Instant) -> AdmissionOutcome {
        let item = item.resolved(&self.cfg);
        let id = item.id();

        if let Some(reason) = self.scene_drop_reason(&item) {
            self.emit(Event::dropped(id, reason));
            return AdmissionOutcome::Dropped(reason);
        }
        if let Some(visible) = self.matching_visible(&item, now) {
            tracing::debug!(id = %id, visible = %visible, "already visible");
            return AdmissionOutcome::AlreadyVisible(visible);
        }

        let Admission { outcome, evicted } = self.queue.enqueue(item, now);
        if let Some(evicted) = evicted {
            self.emit(Event::dropped(evicted, DropReason::QueueFull));
        }
        match outcome {
            AdmissionOutcome::Coalesced { replaced } => self.emit(Event::coalesced(replaced, id)),
            AdmissionOutcome::Dropped(reason) => self.emit(Event::dropped(id, reason)),
            AdmissionOutcome::Accepted | AdmissionOutcome::AlreadyVisible(_) => {}
        }

        self.settle(now);
        outcome
    }

    /// Retires `id` with `method`.
    ///
    /// A queued (not yet shown) `id` is withdrawn silently; an unknown id is
    /// ignored.
    pub fn dismiss(&mut self, id: NotificationId, method: DismissalMethod, now: Instant) {
        if self.queue.take(id).is_some() {
            tracing::debug!(id = %id, "withdrawn from queue");
        } else {
            self.drive(SlotEvent::DismissRequested(id, method), now);
        }
        self.settle(now);
    }

    /// Retires the visible item and empties the queue.
    pub fn dismiss_all(&mut self, now: Instant) {
        self.drive(SlotEvent::DismissAllRequested, now);
        self.settle(now);
    }

    /// User tapped the toast body.
    pub fn tap(&mut self, id: NotificationId, now: Instant) {
        self.dismiss(id, DismissalMethod::UserTap, now);
    }

    /// User tapped the toast's action button.
    ///
    /// Dispatches the item's command, then dismisses it. Returns `false` if
    /// `id` is not presenting.
    pub fn action_tap(&mut self, id: NotificationId, now: Instant) -> bool {
        let Some(item) = self.state.presenting().filter(|item| item.id() == id) else {
            return false;
        };
        if let Some(action) = item.action() {
            self.actions.dispatch(&action.command);
        }
        self.drive(SlotEvent::DismissRequested(id, DismissalMethod::ActionTap), now);
        self.settle(now);
        true
    }

    /// Runs the gesture decision for `id` and dismisses on [`Decision::Dismiss`].
    pub fn gesture(&mut self, id: NotificationId, sample: DragSample, now: Instant) -> Decision {
        let decision = self.cfg.gesture.decide(sample);
        if decision == Decision::Dismiss {
            self.drive(SlotEvent::DismissRequested(id, DismissalMethod::UserSwipe), now);
            self.settle(now);
        }
        decision
    }

    /// Applies a scene lifecycle signal.
    pub fn scene(&mut self, signal: SceneSignal, now: Instant) {
        tracing::debug!(signal = ?signal, "scene");
        match signal {
            SceneSignal::Inactive => {
                self.foreground = false;
                self.timer.pause(now);
            }
            SceneSignal::Active => {
                self.foreground = true;
                self.timer.resume(now);
            }
            SceneSignal::Disconnected => {
                self.connected = false;
                self.drive(SlotEvent::SceneBecameInactive, now);
            }
            SceneSignal::Connected => {
                self.connected = true;
            }
        }
        self.settle(now);
    }

    /// Host memory warning: sheds queued `Normal` items.
    pub fn memory_warning(&mut self, now: Instant) {
        let pressure = self.performance.on_memory_warning();
        self.relieve(pressure);
        self.settle(now);
    }

    /// Renderer animation report; may shed queued `Normal` items.
    pub fn report_animation(&mut self, frame_drops: u32, duration: Duration, now: Instant) {
        self.emit(Event::animation_performance(frame_drops, duration));
        let pressure = self.performance.on_animation(frame_drops, duration);
        self.relieve(pressure);
        self.settle(now);
    }

    /// Fires the timer if its deadline has passed.
    pub fn on_deadline(&mut self, now: Instant) {
        while let Some((id, purpose)) = self.timer.take_expired(now) {
            let event = match purpose {
                TimerPurpose::AutoDismiss => SlotEvent::TimerExpired(id),
                TimerPurpose::Exit => SlotEvent::ExitCompleted(id),
            };
            self.drive(event, now);
            self.settle(now);
        }
    }

    /// When [`Scheduler::on_deadline`] next needs to run.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn snapshot(&self) -> PresentationSnapshot {
        PresentationSnapshot {
            state: self.state.label(),
            item: self.state.visible().cloned(),
            queued: self.queue.len(),
            scene: self.scene_mode(),
        }
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Queued ids in presentation order.
    pub fn queued(&self) -> Vec<NotificationId> {
        self.queue.ids()
    }

    pub fn scene_mode(&self) -> SceneMode {
        if !self.connected {
            SceneMode::Disconnected
        } else if !self.foreground {
            SceneMode::Inactive
        } else {
            SceneMode::Active
        }
    }

    /// Time left on the visible item's timer.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    pub fn performance(&self) -> PerformanceStats {
        self.performance.stats()
    }

    pub fn config(&self) -> &ToastConfig {
        &self.cfg
    }

    fn scene_drop_reason(&self, item: &NotificationItem) -> Option<DropReason> {
        if !self.connected {
            Some(DropReason::SceneUnavailable)
        } else if !self.foreground && item.priority() == Priority::Normal {
            Some(DropReason::Backgrounded)
        } else {
            None
        }
    }

    fn matching_visible(&self, item: &NotificationItem, now: Instant) -> Option<NotificationId> {
        let visible = self.state.presenting()?;
        let shown_at = self.shown_at?;
        let same_key = visible.coalescing_key().is_some() && visible.coalescing_key() == item.coalescing_key();
        let fresh = now.saturating_duration_since(shown_at) <= visible.dedup_window();
        (same_key && fresh).then(|| visible.id())
    }

    fn relieve(&mut self, pressure: Pressure) {
        if let Pressure::Shed(reason) = pressure {
            let shed = self.queue.shed(Priority::Normal);
            if !shed.is_empty() {
                tracing::debug!(count = shed.len(), reason = %reason, "shedding queued items");
            }
            for id in shed {
                self.emit(Event::dropped(id, reason));
            }
        }
    }

    fn can_promote(&self) -> bool {
        self.foreground && self.connected
    }

    /// Runs internal follow-up events until the slot is stable.
    fn settle(&mut self, now: Instant) {
        loop {
            let event = match &self.state {
                PresentationState::Interrupted { .. } => SlotEvent::Handoff,
                PresentationState::Dismissing { item, .. } if self.cfg.exit_grace().is_none() => {
                    SlotEvent::ExitCompleted(item.id())
                }
                PresentationState::Idle if self.can_promote() => match self.queue.pop() {
                    Some(next) => SlotEvent::SlotIdleAndQueueNonEmpty(next),
                    None => break,
                },
                PresentationState::Presenting(current)
                    if self.can_promote()
                        && self
                            .queue
                            .peek_priority()
                            .is_some_and(|p| p.can_interrupt(current.priority())) =>
                {
                    match self.queue.pop() {
                        Some(next) => SlotEvent::HigherPriorityArrived(next),
                        None => break,
                    }
                }
                _ => break,
            };
            self.drive(event, now);
        }
    }

    fn drive(&mut self, event: SlotEvent, now: Instant) {
        let stepped = step(mem::take(&mut self.state), event);
        self.state = stepped.state;
        for effect in stepped.effects {
            self.apply(effect, now);
        }
    }

    fn apply(&mut self, effect: Effect, now: Instant) {
        match effect {
            Effect::Transition { from, to, id } => {
                tracing::debug!(from = %from, to = %to, id = ?id, "transition");
                self.emit(Event::transition(from, to, id));
            }
            Effect::Shown(item) => {
                self.shown_at = Some(now);
                self.emit(Event::shown(&item));
                if let Some(effect) = resolve_haptic(item.kind(), item.options().haptic) {
                    self.haptics.play(effect);
                }
            }
            Effect::Dismissed { id, method } => {
                self.emit(Event::dismissed(id, method));
            }
            Effect::ArmTimer { id, after } => {
                self.timer
                    .arm(id, TimerPurpose::AutoDismiss, after, now, !self.foreground);
            }
            Effect::CancelTimer => self.timer.cancel(),
            Effect::BeginExit { id } => {
                if let Some(grace) = self.cfg.exit_grace() {
                    self.timer.arm(id, TimerPurpose::Exit, grace, now, false);
                }
            }
            Effect::Requeue(item) => self.queue.requeue(item, now),
            Effect::ClearQueue => {
                let cleared = self.queue.clear();
                if cleared > 0 {
                    tracing::debug!(cleared, "queue cleared");
                }
            }
        }
    }

    fn emit(&self, event: Event) {
        for sink in &self.telemetry {
            sink.record(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use proptest::prelude::*;

    use super::*;
    use crate::actions::{ActionCommand, NotificationAction};
    use crate::events::EventKind;
    use crate::gesture::Edge;
    use crate::haptics::{HapticDirective, HapticEffect};
    use crate::notification::{DisplayDuration, KeyDerivation};
    use crate::telemetry::Recorder;

    fn harness(cfg: ToastConfig) -> (Scheduler, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::new());
        let mut collab = Collaborators::new(&cfg);
        collab.telemetry = vec![recorder.clone()];
        (Scheduler::new(cfg, collab), recorder)
    }

    fn immediate() -> ToastConfig {
        ToastConfig {
            exit_grace: Duration::ZERO,
            rate_limit: 0,
            ..ToastConfig::default()
        }
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn first_show_presents_immediately() {
        let t0 = Instant::now();
        let (mut s, rec) = harness(ToastConfig::default());
        let item = NotificationItem::success("Saved");
        let id = item.id();

        assert_eq!(s.show(item, t0), AdmissionOutcome::Accepted);
        assert_eq!(s.snapshot().state, StateLabel::Presenting);
        assert_eq!(s.snapshot().item.map(|i| i.id()), Some(id));
        assert_eq!(s.next_deadline(), Some(t0 + secs(4)));
        assert_eq!(rec.kinds(), vec![EventKind::StateTransition, EventKind::Shown]);
    }

    #[test]
    fn auto_dismiss_then_exit_grace_then_next() {
        let t0 = Instant::now();
        let (mut s, rec) = harness(ToastConfig::default());
        let a = NotificationItem::info("a");
        let b = NotificationItem::info("b");
        let (a_id, b_id) = (a.id(), b.id());
        s.show(a, t0);
        s.show(b, t0);
        assert_eq!(s.queued(), vec![b_id]);

        s.on_deadline(t0 + secs(4));
        assert_eq!(s.state().label(), StateLabel::Dismissing);
        assert_eq!(s.next_deadline(), Some(t0 + secs(4) + Duration::from_millis(300)));

        s.on_deadline(t0 + secs(4) + Duration::from_millis(300));
        assert_eq!(s.state().presenting().map(|i| i.id()), Some(b_id));

        let dismissed = rec.of_kind(EventKind::Dismissed);
        assert_eq!(dismissed.len(), 1);
        assert_eq!(dismissed[0].id, Some(a_id));
        assert_eq!(dismissed[0].method, Some(DismissalMethod::Automatic));
    }

    #[test]
    fn huge_duration_behaves_as_persistent() {
        let t0 = Instant::now();
        let (mut s, rec) = harness(ToastConfig::default());
        let item = NotificationItem::info("x").with_duration(DisplayDuration::Timed(Duration::MAX));
        let id = item.id();

        assert_eq!(s.show(item, t0), AdmissionOutcome::Accepted);
        assert_eq!(s.next_deadline(), None);

        s.on_deadline(t0 + secs(3600));
        assert_eq!(s.state().presenting().map(|i| i.id()), Some(id));
        assert!(rec.of_kind(EventKind::Dismissed).is_empty());

        s.scene(SceneSignal::Inactive, t0 + secs(3601));
        s.scene(SceneSignal::Active, t0 + secs(3602));
        s.on_deadline(t0 + secs(7200));
        assert_eq!(s.state().presenting().map(|i| i.id()), Some(id));

        s.dismiss(id, DismissalMethod::Programmatic, t0 + secs(7201));
        assert_eq!(s.state().label(), StateLabel::Dismissing);
    }

    #[test]
    fn huge_exit_grace_keeps_slot_dismissing() {
        let t0 = Instant::now();
        let cfg = ToastConfig {
            exit_grace: Duration::MAX,
            ..ToastConfig::default()
        };
        let (mut s, _rec) = harness(cfg);
        let item = NotificationItem::info("x");
        let id = item.id();
        s.show(item, t0);

        s.dismiss(id, DismissalMethod::Programmatic, t0 + secs(1));
        assert_eq!(s.state().label(), StateLabel::Dismissing);
        assert_eq!(s.next_deadline(), None);

        s.on_deadline(t0 + secs(3600));
        assert_eq!(s.state().label(), StateLabel::Dismissing);
    }

    #[test]
    fn max_rate_limit_is_accepted() {
        let t0 = Instant::now();
        let cfg = ToastConfig {
            rate_limit: usize::MAX,
            ..ToastConfig::default()
        };
        let (mut s, _rec) = harness(cfg);
        for i in 0..10 {
            assert!(s.show(NotificationItem::info(format!("n{i}")), t0).is_queued());
        }
    }

    #[test]
    fn configured_key_derivation_drives_coalescing() {
        let t0 = Instant::now();
        let cfg = ToastConfig {
            key_derivation: KeyDerivation::MessageOnly,
            ..immediate()
        };
        let (mut s, rec) = harness(cfg);
        s.show(NotificationItem::error("busy"), t0);
        s.show(NotificationItem::info("Same"), t0);
        s.show(NotificationItem::warning("Same"), t0);
        assert_eq!(s.queue_len(), 1);
        assert_eq!(rec.of_kind(EventKind::Coalesced).len(), 1);
    }

    #[test]
    fn critical_preempts_normal_in_order() {
        let t0 = Instant::now();
        let (mut s, rec) = harness(immediate());
        let a = NotificationItem::info("a");
        let b = NotificationItem::error("b");
        let (a_id, b_id) = (a.id(), b.id());
        s.show(a, t0);
        rec.clear();

        s.show(b, t0 + secs(1));
        assert_eq!(s.state().presenting().map(|i| i.id()), Some(b_id));

        let events = rec.events();
        let transitions: Vec<_> = events
            .iter()
            .filter(|e| e.kind == EventKind::StateTransition)
            .map(|e| (e.from, e.to))
            .collect();
        assert_eq!(
            transitions,
            vec![
                (Some(StateLabel::Presenting), Some(StateLabel::Interrupted)),
                (Some(StateLabel::Interrupted), Some(StateLabel::Presenting)),
            ]
        );
        let dismissed = events.iter().position(|e| e.kind == EventKind::Dismissed).unwrap();
        let shown = events.iter().position(|e| e.kind == EventKind::Shown).unwrap();
        assert!(dismissed < shown);
        assert_eq!(events[dismissed].id, Some(a_id));
        assert_eq!(events[dismissed].method, Some(DismissalMethod::Interrupted));
        assert_eq!(events[shown].id, Some(b_id));
        // interrupted item does not come back
        assert_eq!(s.queue_len(), 0);
    }

    #[test]
    fn lower_priority_waits_in_queue() {
        let t0 = Instant::now();
        let (mut s, _rec) = harness(immediate());
        let a = NotificationItem::error("a");
        let b = NotificationItem::warning("b");
        let (a_id, b_id) = (a.id(), b.id());
        s.show(a, t0);
        assert_eq!(s.show(b, t0), AdmissionOutcome::Accepted);
        assert_eq!(s.state().presenting().map(|i| i.id()), Some(a_id));
        assert_eq!(s.queued(), vec![b_id]);
    }

    #[test]
    fn coalescing_counts() {
        let t0 = Instant::now();
        let (mut s, rec) = harness(immediate());
        s.show(NotificationItem::error("busy"), t0);
        for i in 0..5 {
            s.show(NotificationItem::info("Same"), t0 + Duration::from_millis(100 * i));
        }
        assert_eq!(s.queue_len(), 1);
        assert_eq!(rec.of_kind(EventKind::Coalesced).len(), 4);
    }

    #[test]
    fn duplicate_of_visible_item_is_ignored() {
        let t0 = Instant::now();
        let (mut s, rec) = harness(immediate());
        let first = NotificationItem::success("Saved");
        let first_id = first.id();
        s.show(first, t0);
        let before = rec.len();

        let outcome = s.show(NotificationItem::success("Saved"), t0 + secs(1));
        assert_eq!(outcome, AdmissionOutcome::AlreadyVisible(first_id));
        assert_eq!(rec.len(), before);
        assert_eq!(s.queue_len(), 0);
    }

    #[test]
    fn overflow_drops_newcomer_or_evicts() {
        let t0 = Instant::now();
        let (mut s, rec) = harness(immediate());
        s.show(NotificationItem::error("hold the slot").with_duration(DisplayDuration::Persistent), t0);
        for i in 0..20 {
            s.show(NotificationItem::info(format!("n{i}")), t0);
        }
        assert_eq!(s.queue_len(), 20);

        let extra = NotificationItem::info("one more");
        let extra_id = extra.id();
        assert_eq!(
            s.show(extra, t0),
            AdmissionOutcome::Dropped(DropReason::QueueFull)
        );
        let drops = rec.of_kind(EventKind::Dropped);
        assert_eq!(drops.last().and_then(|e| e.id), Some(extra_id));

        let critical = NotificationItem::error("critical").with_priority(Priority::Critical);
        assert_eq!(s.show(critical, t0), AdmissionOutcome::Accepted);
        assert_eq!(s.queue_len(), 20);
        let drops = rec.of_kind(EventKind::Dropped);
        assert_eq!(drops.len(), 2);
        assert_eq!(drops[1].drop_reason, Some(DropReason::QueueFull));
    }

    #[test]
    fn rate_limit_is_reported() {
        let t0 = Instant::now();
        let cfg = ToastConfig {
            exit_grace: Duration::ZERO,
            ..ToastConfig::default()
        };
        let (mut s, rec) = harness(cfg);
        for i in 0..6 {
            s.show(NotificationItem::info(format!("n{i}")), t0);
        }
        let drops = rec.of_kind(EventKind::Dropped);
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].drop_reason, Some(DropReason::RateLimited));
    }

    #[test]
    fn unknown_dismiss_is_silent() {
        let t0 = Instant::now();
        let (mut s, rec) = harness(immediate());
        s.show(NotificationItem::info("a"), t0);
        let before = (s.snapshot(), rec.len());
        s.dismiss(NotificationId::next(), DismissalMethod::Programmatic, t0);
        assert_eq!((s.snapshot(), rec.len()), before);
    }

    #[test]
    fn dismissing_twice_reports_once() {
        let t0 = Instant::now();
        let (mut s, rec) = harness(ToastConfig::default());
        let a = NotificationItem::info("a");
        let id = a.id();
        s.show(a, t0);
        s.dismiss(id, DismissalMethod::Programmatic, t0);
        s.dismiss(id, DismissalMethod::Programmatic, t0);
        assert_eq!(rec.of_kind(EventKind::Dismissed).len(), 1);
    }

    #[test]
    fn queued_item_can_be_withdrawn() {
        let t0 = Instant::now();
        let (mut s, rec) = harness(immediate());
        s.show(NotificationItem::error("slot"), t0);
        let queued = NotificationItem::info("later");
        let id = queued.id();
        s.show(queued, t0);
        let before = rec.len();
        s.dismiss(id, DismissalMethod::Programmatic, t0);
        assert_eq!(s.queue_len(), 0);
        assert_eq!(rec.len(), before);
    }

    #[test]
    fn dismiss_all_empties_everything() {
        let t0 = Instant::now();
        let (mut s, rec) = harness(ToastConfig::default());
        let a = NotificationItem::info("a");
        let a_id = a.id();
        s.show(a, t0);
        s.show(NotificationItem::info("b"), t0);
        s.show(NotificationItem::info("c"), t0);

        s.dismiss_all(t0);
        assert!(s.state().is_idle());
        assert_eq!(s.queue_len(), 0);
        assert_eq!(s.next_deadline(), None);
        let dismissed = rec.of_kind(EventKind::Dismissed);
        assert_eq!(dismissed.len(), 1);
        assert_eq!(dismissed[0].id, Some(a_id));
        assert_eq!(dismissed[0].method, Some(DismissalMethod::Programmatic));
        assert!(rec.of_kind(EventKind::Dropped).is_empty());
    }

    #[test]
    fn timer_pauses_while_inactive() {
        let t0 = Instant::now();
        let (mut s, _rec) = harness(immediate());
        let a = NotificationItem::info("a").with_duration(DisplayDuration::Timed(secs(4)));
        s.show(a, t0);

        s.scene(SceneSignal::Inactive, t0 + secs(1));
        assert_eq!(s.next_deadline(), None);
        s.on_deadline(t0 + secs(500));
        assert_eq!(s.state().label(), StateLabel::Presenting);

        let resumed = t0 + secs(600);
        s.scene(SceneSignal::Active, resumed);
        assert_eq!(s.next_deadline(), Some(resumed + secs(3)));
        s.on_deadline(resumed + Duration::from_millis(2999));
        assert_eq!(s.state().label(), StateLabel::Presenting);
        s.on_deadline(resumed + secs(3));
        assert!(s.state().is_idle());
    }

    #[test]
    fn backgrounded_drops_normal_and_holds_higher() {
        let t0 = Instant::now();
        let (mut s, _rec) = harness(immediate());
        s.scene(SceneSignal::Inactive, t0);
        assert_eq!(
            s.show(NotificationItem::info("bg"), t0),
            AdmissionOutcome::Dropped(DropReason::Backgrounded)
        );
        let warning = NotificationItem::warning("later");
        let id = warning.id();
        assert_eq!(s.show(warning, t0), AdmissionOutcome::Accepted);
        assert!(s.state().is_idle());

        s.scene(SceneSignal::Active, t0 + secs(5));
        assert_eq!(s.state().presenting().map(|i| i.id()), Some(id));
    }

    #[test]
    fn disconnect_retires_visible_and_keeps_queue() {
        let t0 = Instant::now();
        let (mut s, rec) = harness(immediate());
        let a = NotificationItem::error("a");
        let a_id = a.id();
        s.show(a, t0);
        s.show(NotificationItem::info("queued"), t0);

        s.scene(SceneSignal::Disconnected, t0);
        assert!(s.state().is_idle());
        assert_eq!(s.queue_len(), 1);
        assert_eq!(s.snapshot().scene, SceneMode::Disconnected);
        let dismissed = rec.of_kind(EventKind::Dismissed);
        assert_eq!(dismissed[0].id, Some(a_id));
        assert_eq!(dismissed[0].method, Some(DismissalMethod::SceneInactive));

        assert_eq!(
            s.show(NotificationItem::error("lost"), t0),
            AdmissionOutcome::Dropped(DropReason::SceneUnavailable)
        );

        s.scene(SceneSignal::Connected, t0);
        assert_eq!(s.state().label(), StateLabel::Presenting);
        assert_eq!(s.queue_len(), 0);
    }

    #[test]
    fn overload_signals_shed_normal_items() {
        let t0 = Instant::now();
        let (mut s, rec) = harness(immediate());
        s.show(NotificationItem::error("slot"), t0);
        s.show(NotificationItem::info("n1"), t0);
        s.show(NotificationItem::info("n2"), t0);
        s.show(NotificationItem::warning("w"), t0);

        s.memory_warning(t0);
        assert_eq!(s.queue_len(), 1);
        let drops = rec.of_kind(EventKind::Dropped);
        assert_eq!(drops.len(), 2);
        assert!(drops.iter().all(|e| e.drop_reason == Some(DropReason::LowMemory)));

        s.show(NotificationItem::info("n3"), t0);
        s.report_animation(5, Duration::from_millis(300), t0);
        assert_eq!(s.queue_len(), 2);
        s.report_animation(45, Duration::from_millis(300), t0);
        assert_eq!(s.queue_len(), 1);
        let last = rec.of_kind(EventKind::Dropped).pop().and_then(|e| e.drop_reason);
        assert_eq!(last, Some(DropReason::PerformanceOptimization));
        assert_eq!(rec.of_kind(EventKind::AnimationPerformance).len(), 2);
        assert_eq!(s.performance().animation_reports, 2);
    }

    #[test]
    fn action_tap_dispatches_then_dismisses() {
        let t0 = Instant::now();
        let cfg = immediate();
        let registry = Arc::new(ActionRegistry::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        registry.register("undo", move |cmd: &ActionCommand| {
            sink.lock().unwrap().push(cmd.payload.clone());
        });
        let recorder = Arc::new(Recorder::new());
        let mut collab = Collaborators::new(&cfg);
        collab.telemetry = vec![recorder.clone()];
        collab.actions = registry;
        let mut s = Scheduler::new(cfg, collab);

        let item = NotificationItem::info("Deleted").with_action(NotificationAction::new(
            "Undo",
            ActionCommand::new("undo").with_payload("msg-7"),
        ));
        let id = item.id();
        s.show(item, t0);
        assert!(s.action_tap(id, t0));
        assert!(!s.action_tap(id, t0));

        assert_eq!(seen.lock().unwrap().as_slice(), &[Some(Arc::<str>::from("msg-7"))]);
        let dismissed = recorder.of_kind(EventKind::Dismissed);
        assert_eq!(dismissed[0].method, Some(DismissalMethod::ActionTap));
    }

    #[test]
    fn gesture_dismisses_past_threshold() {
        let t0 = Instant::now();
        let (mut s, rec) = harness(immediate());
        let a = NotificationItem::info("a");
        let id = a.id();
        s.show(a, t0);

        let decision = s.gesture(id, DragSample::new(10.0, 50.0, Edge::Top), t0);
        assert_eq!(decision, Decision::SpringBack);
        assert_eq!(s.state().label(), StateLabel::Presenting);

        let decision = s.gesture(id, DragSample::new(40.0, 0.0, Edge::Top), t0);
        assert_eq!(decision, Decision::Dismiss);
        assert_eq!(
            rec.of_kind(EventKind::Dismissed)[0].method,
            Some(DismissalMethod::UserSwipe)
        );
    }

    #[derive(Default)]
    struct HapticLog(Mutex<Vec<HapticEffect>>);

    impl Haptics for HapticLog {
        fn play(&self, effect: HapticEffect) {
            self.0.lock().unwrap().push(effect);
        }
    }

    #[test]
    fn haptics_resolved_at_presentation() {
        let t0 = Instant::now();
        let cfg = immediate();
        let log = Arc::new(HapticLog::default());
        let mut collab = Collaborators::new(&cfg);
        collab.haptics = log.clone();
        let mut s = Scheduler::new(cfg, collab);

        let a = NotificationItem::success("ok");
        let a_id = a.id();
        s.show(a, t0);
        s.dismiss(a_id, DismissalMethod::Programmatic, t0);
        s.show(
            NotificationItem::info("quiet").with_haptic(HapticDirective::None),
            t0,
        );

        assert_eq!(
            log.0.lock().unwrap().as_slice(),
            &[HapticEffect::SuccessNotification]
        );
    }

    #[test]
    fn haptics_disabled_globally() {
        let t0 = Instant::now();
        let cfg = ToastConfig {
            haptics_enabled: false,
            ..immediate()
        };
        let log = Arc::new(HapticLog::default());
        let mut collab = Collaborators::new(&cfg);
        collab.haptics = log.clone();
        let mut s = Scheduler::new(cfg, collab);
        s.show(
            NotificationItem::error("boom").with_haptic(HapticDirective::Explicit(HapticEffect::HeavyImpact)),
            t0,
        );
        assert!(log.0.lock().unwrap().is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Show(u8, u8),
        Dismiss(usize),
        DismissAll,
        Advance(u16),
        Scene(u8),
        Memory,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u8..3, 0u8..4).prop_map(|(p, m)| Op::Show(p, m)),
            2 => (0usize..8).prop_map(Op::Dismiss),
            1 => Just(Op::DismissAll),
            3 => (0u16..5000).prop_map(Op::Advance),
            1 => (0u8..4).prop_map(Op::Scene),
            1 => Just(Op::Memory),
        ]
    }

    fn run(ops: &[Op], exit_grace: Duration) -> (Scheduler, Arc<Recorder>, Instant) {
        let cfg = ToastConfig {
            exit_grace,
            queue_capacity: 4,
            ..ToastConfig::default()
        };
        let (mut s, rec) = harness(cfg);
        let mut now = Instant::now();
        let mut ids = Vec::new();
        for op in ops {
            match op {
                Op::Show(p, m) => {
                    let priority = [Priority::Normal, Priority::Elevated, Priority::Critical][*p as usize];
                    let item = NotificationItem::info(format!("m{m}")).with_priority(priority);
                    ids.push(item.id());
                    s.show(item, now);
                }
                Op::Dismiss(i) => {
                    if let Some(id) = ids.get(*i).copied() {
                        s.dismiss(id, DismissalMethod::Programmatic, now);
                    }
                }
                Op::DismissAll => s.dismiss_all(now),
                Op::Advance(ms) => {
                    now += Duration::from_millis(u64::from(*ms));
                    s.on_deadline(now);
                }
                Op::Scene(k) => {
                    let signal = [
                        SceneSignal::Inactive,
                        SceneSignal::Active,
                        SceneSignal::Disconnected,
                        SceneSignal::Connected,
                    ][*k as usize];
                    s.scene(signal, now);
                }
                Op::Memory => s.memory_warning(now),
            }
            assert!(s.state().active_count() <= 1);
            assert!(!matches!(s.state(), PresentationState::Interrupted { .. }));
        }
        (s, rec, now)
    }

    proptest! {
        #[test]
        fn at_most_one_item_is_ever_active(
            ops in proptest::collection::vec(op(), 1..60),
            grace in prop_oneof![Just(0u64), Just(300u64)],
        ) {
            let (_s, rec, _now) = run(&ops, Duration::from_millis(grace));

            // Replay the audit trail: a Shown may only happen on an empty slot.
            let mut active: Option<NotificationId> = None;
            for ev in rec.events() {
                match ev.kind {
                    EventKind::Shown => {
                        prop_assert!(active.is_none(), "shown {:?} while {:?} active", ev.id, active);
                        active = ev.id;
                    }
                    EventKind::Dismissed if ev.method == Some(DismissalMethod::Interrupted) => {
                        prop_assert_eq!(active, ev.id);
                        active = None;
                    }
                    EventKind::StateTransition if ev.to == Some(StateLabel::Idle) => {
                        active = None;
                    }
                    _ => {}
                }
            }
        }

        #[test]
        fn dismiss_all_always_lands_idle(
            ops in proptest::collection::vec(op(), 0..60),
        ) {
            let (mut s, _rec, now) = run(&ops, Duration::from_millis(300));
            s.dismiss_all(now);
            prop_assert!(s.state().is_idle());
            prop_assert_eq!(s.queue_len(), 0);
            prop_assert_eq!(s.next_deadline(), None);
        }

        #[test]
        fn seq_is_strictly_increasing(
            ops in proptest::collection::vec(op(), 1..40),
        ) {
            let (_s, rec, _now) = run(&ops, Duration::ZERO);
            let seqs: Vec<u64> = rec.events().iter().map(|e| e.seq).collect();
            prop_assert!(seqs.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
