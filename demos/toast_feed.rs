//! # Example: Toast Feed
//!
//! Simulates a busy client: routine confirmations, a burst of duplicates, a
//! critical failure that preempts, a trip to the background and an undo
//! action. Every telemetry event is rendered by `LogWriter`.
//!
//! Run with: `cargo run --example toast_feed --features logging`

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use toastvisor::{
    ActionCommand, ActionRegistry, LogWriter, NotificationAction, NotificationItem, SceneSignal,
    StateLabel, Subscribe, ToastConfig, ToastEngine,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let actions = Arc::new(ActionRegistry::new());
    actions.register("restore", |cmd: &ActionCommand| {
        println!("[app] restoring {:?}", cmd.payload);
    });

    let cfg = ToastConfig {
        exit_grace: Duration::from_millis(150),
        ..ToastConfig::default()
    };
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let engine = ToastEngine::builder(cfg)
        .with_actions(actions)
        .with_subscribers(subs)
        .build();
    let toaster = engine.handle();

    // Routine feedback, then the same confirmation three more times.
    toaster.success("Post published").await?;
    for _ in 0..3 {
        toaster.info("Link copied").await?;
    }

    // Something is on fire: preempts whatever is visible.
    tokio::time::sleep(Duration::from_millis(500)).await;
    toaster.error("Upload failed: storage quota exceeded").await?;

    // User switches apps for a while; the visible timer stops counting.
    tokio::time::sleep(Duration::from_secs(1)).await;
    toaster.scene(SceneSignal::Inactive).await;
    tokio::time::sleep(Duration::from_secs(2)).await;
    toaster.scene(SceneSignal::Active).await;

    // Undo-able deletion.
    let deleted = NotificationItem::info("Message deleted").with_action(NotificationAction::new(
        "Undo",
        ActionCommand::new("restore").with_payload("msg-1138"),
    ));
    let deleted_id = toaster.show(deleted).await?;

    let mut state = toaster.state();
    state
        .wait_for(|s| s.item.as_ref().map(|i| i.id()) == Some(deleted_id))
        .await?;
    toaster.action_tap(deleted_id).await;

    state.wait_for(|s| s.state == StateLabel::Idle && s.queued == 0).await?;
    engine.shutdown().await;
    Ok(())
}
