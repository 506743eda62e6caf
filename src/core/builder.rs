use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::{
    actions::{ActionDispatch, ActionRegistry},
    config::ToastConfig,
    events::Bus,
    haptics::{Haptics, NoopHaptics},
    performance::PerformanceMonitor,
    port::Toaster,
    subscribers::{Subscribe, SubscriberSet},
    telemetry::{NoopTelemetry, Telemetry},
};

use super::{
    actor::EngineActor,
    engine::ToastEngine,
    scheduler::{Collaborators, PresentationSnapshot, Scheduler},
};

/// Builder for constructing a [`ToastEngine`] with optional collaborators.
pub struct ToastEngineBuilder {
    cfg: ToastConfig,
    telemetry: Arc<dyn Telemetry>,
    haptics: Arc<dyn Haptics>,
    actions: Arc<dyn ActionDispatch>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    performance: Option<PerformanceMonitor>,
}

impl ToastEngineBuilder {
    /// Creates a builder with no-op collaborators.
    pub fn new(cfg: ToastConfig) -> Self {
        Self {
            cfg,
            telemetry: Arc::new(NoopTelemetry),
            haptics: Arc::new(NoopHaptics),
            actions: Arc::new(ActionRegistry::new()),
            subscribers: Vec::new(),
            performance: None,
        }
    }

    /// Sets the synchronous telemetry sink.
    ///
    /// It is called on the engine's thread of control, in transition order.
    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Sets the haptic collaborator.
    pub fn with_haptics(mut self, haptics: Arc<dyn Haptics>) -> Self {
        self.haptics = haptics;
        self
    }

    /// Sets the receiver of tapped action commands (usually an [`ActionRegistry`]).
    pub fn with_actions(mut self, actions: Arc<dyn ActionDispatch>) -> Self {
        self.actions = actions;
        self
    }

    /// Sets async event subscribers.
    ///
    /// Each subscriber gets a dedicated worker with a bounded queue.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Uses a pre-built performance monitor instead of one derived from the config.
    pub fn with_performance(mut self, monitor: PerformanceMonitor) -> Self {
        self.performance = Some(monitor);
        self
    }

    /// Builds the engine and spawns its actor.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> ToastEngine {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        let mut telemetry: Vec<Arc<dyn Telemetry>> = vec![Arc::new(bus.clone())];
        let subscribers = if self.subscribers.is_empty() {
            None
        } else {
            let set = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));
            telemetry.push(set.clone());
            Some(set)
        };
        telemetry.push(self.telemetry);

        let performance = self
            .performance
            .unwrap_or_else(|| PerformanceMonitor::from_config(&self.cfg));
        let mailbox = self.cfg.mailbox_capacity_clamped();
        let scheduler = Scheduler::new(
            self.cfg,
            Collaborators {
                telemetry,
                haptics: self.haptics,
                actions: self.actions,
                performance,
            },
        );

        let (tx, rx) = mpsc::channel(mailbox);
        let (state_tx, state_rx) = watch::channel(PresentationSnapshot::default());
        let token = CancellationToken::new();

        let actor = EngineActor::new(scheduler, rx, state_tx);
        let join = tokio::spawn(actor.run(token.clone()));

        ToastEngine::new_internal(Toaster::new(tx, state_rx, bus), token, join, subscribers)
    }
}
