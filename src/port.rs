//! # Presentation port.
//!
//! [`Toaster`] is the cloneable handle application code uses to talk to a
//! running [`ToastEngine`](crate::ToastEngine). Every call only enqueues a
//! command; the engine applies commands one at a time, in submission order.
//!
//! - Calls that return a value (`show`, `admit`, the kind helpers) fail with
//!   [`PortError`] if the engine is gone (or, for `try_show`, if the mailbox
//!   is full).
//! - Cancellation and renderer calls (`dismiss`, `dismiss_all`, `tap`, ...)
//!   never fail; if the engine is gone the call is logged and ignored.
//!
//! ## Example
//! ```rust
//! use toastvisor::{StateLabel, ToastConfig, ToastEngine};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = ToastEngine::start(ToastConfig::default());
//!     let toaster = engine.handle();
//!     let mut state = toaster.state();
//!
//!     let id = toaster.warning("Low battery").await?;
//!     state.wait_for(|s| s.state == StateLabel::Presenting).await?;
//!     assert_eq!(toaster.current().item.map(|i| i.id()), Some(id));
//!
//!     engine.shutdown().await;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::actions::NotificationAction;
use crate::core::{AdmissionOutcome, Command, PresentationSnapshot, SceneSignal};
use crate::error::PortError;
use crate::events::{Bus, Event};
use crate::gesture::DragSample;
use crate::notification::{NotificationId, NotificationItem, NotificationKind, Options};

/// Handle for submitting requests to the engine.
#[derive(Clone)]
pub struct Toaster {
    tx: mpsc::Sender<Command>,
    state: watch::Receiver<PresentationSnapshot>,
    bus: Bus,
}

impl Toaster {
    pub(crate) fn new(
        tx: mpsc::Sender<Command>,
        state: watch::Receiver<PresentationSnapshot>,
        bus: Bus,
    ) -> Self {
        Self { tx, state, bus }
    }

    /// Submits an item (waits if the mailbox is full).
    ///
    /// Returns the item's id as soon as the request is queued; the admission
    /// outcome is reported through telemetry. Use [`Toaster::admit`] to wait
    /// for the outcome instead.
    pub async fn show(&self, item: NotificationItem) -> Result<NotificationId, PortError> {
        let id = item.id();
        self.send(Command::Show { item, reply: None }).await?;
        Ok(id)
    }

    /// Submits an item and waits for the admission decision.
    pub async fn admit(&self, item: NotificationItem) -> Result<AdmissionOutcome, PortError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Show {
            item,
            reply: Some(reply),
        })
        .await?;
        rx.await.map_err(|_| PortError::Closed)
    }

    /// Submits an item without waiting (fails if the mailbox is full).
    pub fn try_show(&self, item: NotificationItem) -> Result<NotificationId, PortError> {
        let id = item.id();
        self.tx
            .try_send(Command::Show { item, reply: None })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => PortError::Full,
                mpsc::error::TrySendError::Closed(_) => PortError::Closed,
            })?;
        Ok(id)
    }

    /// Builds an item from parts and submits it.
    pub async fn show_message(
        &self,
        message: impl Into<Arc<str>>,
        kind: NotificationKind,
        options: Options,
        action: Option<NotificationAction>,
    ) -> Result<NotificationId, PortError> {
        let mut item = NotificationItem::new(kind, message).with_options(options);
        if let Some(action) = action {
            item = item.with_action(action);
        }
        self.show(item).await
    }

    pub async fn success(&self, message: impl Into<Arc<str>>) -> Result<NotificationId, PortError> {
        self.show(NotificationItem::success(message)).await
    }

    pub async fn error(&self, message: impl Into<Arc<str>>) -> Result<NotificationId, PortError> {
        self.show(NotificationItem::error(message)).await
    }

    pub async fn info(&self, message: impl Into<Arc<str>>) -> Result<NotificationId, PortError> {
        self.show(NotificationItem::info(message)).await
    }

    pub async fn warning(&self, message: impl Into<Arc<str>>) -> Result<NotificationId, PortError> {
        self.show(NotificationItem::warning(message)).await
    }

    /// [`Toaster::success`] without haptics.
    pub async fn success_silent(&self, message: impl Into<Arc<str>>) -> Result<NotificationId, PortError> {
        self.show(NotificationItem::success(message).with_options(Options::silent()))
            .await
    }

    /// [`Toaster::error`] without haptics.
    pub async fn error_silent(&self, message: impl Into<Arc<str>>) -> Result<NotificationId, PortError> {
        self.show(NotificationItem::error(message).with_options(Options::silent()))
            .await
    }

    /// [`Toaster::info`] without haptics.
    pub async fn info_silent(&self, message: impl Into<Arc<str>>) -> Result<NotificationId, PortError> {
        self.show(NotificationItem::info(message).with_options(Options::silent()))
            .await
    }

    /// [`Toaster::warning`] without haptics.
    pub async fn warning_silent(&self, message: impl Into<Arc<str>>) -> Result<NotificationId, PortError> {
        self.show(NotificationItem::warning(message).with_options(Options::silent()))
            .await
    }

    /// Retires `id` (programmatic). Unknown ids are ignored.
    pub async fn dismiss(&self, id: NotificationId) {
        self.send_or_log(Command::Dismiss(id)).await;
    }

    /// Retires the visible item and empties the queue.
    pub async fn dismiss_all(&self) {
        self.send_or_log(Command::DismissAll).await;
    }

    /// Renderer: the toast body was tapped.
    pub async fn tap(&self, id: NotificationId) {
        self.send_or_log(Command::Tap(id)).await;
    }

    /// Renderer: the toast's action button was tapped.
    pub async fn action_tap(&self, id: NotificationId) {
        self.send_or_log(Command::ActionTap(id)).await;
    }

    /// Renderer: a drag gesture ended with this sample.
    pub async fn gesture(&self, id: NotificationId, sample: DragSample) {
        self.send_or_log(Command::Gesture(id, sample)).await;
    }

    /// Renderer: scene lifecycle change.
    pub async fn scene(&self, signal: SceneSignal) {
        self.send_or_log(Command::Scene(signal)).await;
    }

    /// Renderer: animation statistics for the last transition.
    pub async fn report_animation(&self, frame_drops: u32, duration: Duration) {
        self.send_or_log(Command::Animation {
            frame_drops,
            duration,
        })
        .await;
    }

    /// Host: memory pressure.
    pub async fn memory_warning(&self) {
        self.send_or_log(Command::MemoryWarning).await;
    }

    /// Receiver that observes every presentation snapshot change.
    pub fn state(&self) -> watch::Receiver<PresentationSnapshot> {
        self.state.clone()
    }

    /// Latest presentation snapshot.
    pub fn current(&self) -> PresentationSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver of the telemetry audit trail (events after this call).
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Returns whether the engine has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn send(&self, cmd: Command) -> Result<(), PortError> {
        self.tx.send(cmd).await.map_err(|_| PortError::Closed)
    }

    async fn send_or_log(&self, cmd: Command) {
        if let Err(e) = self.tx.send(cmd).await {
            tracing::debug!(command = ?e.0, "engine closed; request ignored");
        }
    }
}
