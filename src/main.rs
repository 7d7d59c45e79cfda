mod engine;
mod presenter;

use std::sync::Arc;

use anyhow::Context;
use mailwatch_bridge::{BridgeChannels, MessageToController, presentation::PanelGeometry};
use tokio::sync::mpsc::Sender;

use crate::engine::StdinEngine;
use crate::presenter::Presenter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_colors(true)
        .with_threads(true)
        .with_local_timestamps()
        .init()
        .context("failed to build logger instance")?;

    let channels = BridgeChannels::default();
    let engine = Arc::new(StdinEngine::default());
    let controller = mailwatch_backend::run(
        channels.controller_rx,
        channels.controller_tx,
        engine.clone(),
    )
    .context("failed to start the notification controller")?;

    let tx = channels.presentation_tx;
    tx.send(MessageToController::PanelResized(PanelGeometry::default()))
        .await
        .context("notification controller stopped early")?;

    let presenter = tokio::spawn(Presenter::new(presenter::icon_path()).run(channels.presentation_rx));
    forward_update_signals(tx.clone());

    engine::feed_stdin(engine, tx).await?;

    tokio::task::spawn_blocking(move || controller.join())
        .await?
        .map_err(|_| anyhow::anyhow!("notification controller panicked"))?;
    presenter.await?;
    Ok(())
}

/// Turns `SIGUSR2` into a forced mail check.
#[cfg(unix)]
fn forward_update_signals(tx: Sender<MessageToController>) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut signals = match signal(SignalKind::user_defined2()) {
        Ok(signals) => signals,
        Err(err) => {
            log::warn!("Could not listen for SIGUSR2: {err}");
            return;
        }
    };
    tokio::spawn(async move {
        while signals.recv().await.is_some() {
            log::info!("Received SIGUSR2, forcing a mail check");
            if tx.send(MessageToController::ForceUpdate).await.is_err() {
                break;
            }
        }
    });
}

#[cfg(not(unix))]
fn forward_update_signals(_tx: Sender<MessageToController>) {}
