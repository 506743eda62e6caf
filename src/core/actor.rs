//! # Engine actor: the single thread of control over the [`Scheduler`].
//!
//! Every [`Toaster`](crate::Toaster) call becomes a [`Command`] on one bounded
//! mailbox. The actor owns the scheduler outright and processes one command
//! at a time, so no two transitions can interleave.
//!
//! ```text
//! loop {
//!   select! (biased) {
//!     token.cancelled()           → exit
//!     mailbox.recv()              → on_deadline(now); handle(cmd)
//!     sleep_until(next_deadline)  → on_deadline(now)
//!   }
//!   publish snapshot (watch, only if changed)
//! }
//! ```
//!
//! Expired timers are always processed before the next command so the audit
//! trail reflects wall-clock order.

use std::future;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use crate::gesture::DragSample;
use crate::notification::{DismissalMethod, NotificationId, NotificationItem};

use super::queue::AdmissionOutcome;
use super::scheduler::{PresentationSnapshot, SceneSignal, Scheduler};

/// Message sent from the port to the actor.
#[derive(Debug)]
pub(crate) enum Command {
    Show {
        item: NotificationItem,
        reply: Option<oneshot::Sender<AdmissionOutcome>>,
    },
    Dismiss(NotificationId),
    DismissAll,
    Tap(NotificationId),
    ActionTap(NotificationId),
    Gesture(NotificationId, DragSample),
    Scene(SceneSignal),
    MemoryWarning,
    Animation {
        frame_drops: u32,
        duration: Duration,
    },
}

impl Command {
    fn as_label(&self) -> &'static str {
        match self {
            Command::Show { .. } => "show",
            Command::Dismiss(_) => "dismiss",
            Command::DismissAll => "dismiss_all",
            Command::Tap(_) => "tap",
            Command::ActionTap(_) => "action_tap",
            Command::Gesture(..) => "gesture",
            Command::Scene(_) => "scene",
            Command::MemoryWarning => "memory_warning",
            Command::Animation { .. } => "animation",
        }
    }
}

pub(crate) struct EngineActor {
    scheduler: Scheduler,
    rx: mpsc::Receiver<Command>,
    state_tx: watch::Sender<PresentationSnapshot>,
}

impl EngineActor {
    pub(crate) fn new(
        scheduler: Scheduler,
        rx: mpsc::Receiver<Command>,
        state_tx: watch::Sender<PresentationSnapshot>,
    ) -> Self {
        Self {
            scheduler,
            rx,
            state_tx,
        }
    }

    /// Runs until cancelled or until every port handle is dropped.
    pub(crate) async fn run(mut self, token: CancellationToken) {
        self.publish();
        loop {
            let deadline = self.scheduler.next_deadline();
            tokio::select! {
                biased;

                _ = token.cancelled() => break,

                cmd = self.rx.recv() => {
                    let Some(cmd) = cmd else { break };
                    let now = Instant::now();
                    self.scheduler.on_deadline(now);
                    self.handle(cmd, now);
                }
                _ = wait_for(deadline) => {
                    self.scheduler.on_deadline(Instant::now());
                }
            }
            self.publish();
        }
        tracing::debug!(queued = self.scheduler.queue_len(), "engine actor stopped");
    }

    fn handle(&mut self, cmd: Command, now: Instant) {
        tracing::trace!(command = cmd.as_label(), "command");
        match cmd {
            Command::Show { item, reply } => {
                let outcome = self.scheduler.show(item, now);
                if let Some(reply) = reply {
                    let _ = reply.send(outcome);
                }
            }
            Command::Dismiss(id) => self.scheduler.dismiss(id, DismissalMethod::Programmatic, now),
            Command::DismissAll => self.scheduler.dismiss_all(now),
            Command::Tap(id) => self.scheduler.tap(id, now),
            Command::ActionTap(id) => {
                if !self.scheduler.action_tap(id, now) {
                    tracing::debug!(id = %id, "action tap on item that is not presenting");
                }
            }
            Command::Gesture(id, sample) => {
                let _ = self.scheduler.gesture(id, sample, now);
            }
            Command::Scene(signal) => self.scheduler.scene(signal, now),
            Command::MemoryWarning => self.scheduler.memory_warning(now),
            Command::Animation {
                frame_drops,
                duration,
            } => self.scheduler.report_animation(frame_drops, duration, now),
        }
    }

    fn publish(&self) {
        let snapshot = self.scheduler.snapshot();
        self.state_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => future::pending().await,
    }
}
