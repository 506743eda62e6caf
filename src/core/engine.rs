//! # Toast engine: owns the actor task and its collaborators.
//!
//! ```text
//! ToastEngine::builder(cfg)
//!     .with_telemetry(..) .with_haptics(..) .with_actions(..) .with_subscribers(..)
//!     .build()
//!         ├─► Bus (broadcast audit trail)
//!         ├─► SubscriberSet (one worker per subscriber, if any)
//!         ├─► Scheduler { queue, state machine, timer, collaborators }
//!         └─► spawn EngineActor::run(token)
//!
//! Toaster (cloneable port) ── Command ──► mailbox ──► EngineActor ──► Scheduler
//!                          ◄── watch<PresentationSnapshot> ──────────┘
//!
//! shutdown():
//!     token.cancel() ─► join actor (drops Scheduler) ─► SubscriberSet::shutdown()
//! ```
//!
//! ## Example
//! ```rust
//! use toastvisor::{NotificationItem, ToastConfig, ToastEngine};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = ToastEngine::builder(ToastConfig::default()).build();
//!     let toaster = engine.handle();
//!
//!     let id = toaster.success("Saved").await?;
//!     toaster.dismiss(id).await;
//!
//!     engine.shutdown().await;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::ToastConfig;
use crate::port::Toaster;
use crate::subscribers::SubscriberSet;

use super::builder::ToastEngineBuilder;

/// Running presentation engine.
pub struct ToastEngine {
    toaster: Toaster,
    token: CancellationToken,
    join: JoinHandle<()>,
    subscribers: Option<Arc<SubscriberSet>>,
}

impl ToastEngine {
    /// Starts building an engine.
    pub fn builder(cfg: ToastConfig) -> ToastEngineBuilder {
        ToastEngineBuilder::new(cfg)
    }

    /// Starts an engine with no collaborators attached.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(cfg: ToastConfig) -> Self {
        Self::builder(cfg).build()
    }

    pub(crate) fn new_internal(
        toaster: Toaster,
        token: CancellationToken,
        join: JoinHandle<()>,
        subscribers: Option<Arc<SubscriberSet>>,
    ) -> Self {
        Self {
            toaster,
            token,
            join,
            subscribers,
        }
    }

    /// Returns a cloneable port handle.
    pub fn handle(&self) -> Toaster {
        self.toaster.clone()
    }

    /// Stops the actor and drains subscriber workers.
    ///
    /// Pending commands still in the mailbox are discarded; calls made
    /// through remaining [`Toaster`] handles afterwards fail with
    /// [`PortError::Closed`](crate::PortError::Closed).
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(e) = self.join.await {
            tracing::error!(error = %e, "engine actor did not stop cleanly");
        }
        if let Some(set) = self.subscribers {
            match Arc::try_unwrap(set) {
                Ok(set) => set.shutdown().await,
                Err(_) => tracing::warn!("subscriber set still shared at shutdown"),
            }
        }
    }
}
