//! Application context and message dispatching utilities.
//!
//! The context owns the shared state and provides helpers for applying
//! controller outcomes: launching actions and pushing presentation updates
//! back to the bridge.

use std::{ops::ControlFlow, sync::Arc};

use mailwatch_bridge::{MessageFromController, MessageToController};
use tokio::sync::mpsc::{Receiver, Sender};

use crate::controller::{NotificationController, Outcome};
use crate::launcher::ActionLauncher;
use crate::services;
use crate::state::SharedState;

/// Shared application context passed to services and message handlers.
pub(crate) struct AppContext {
    /// Runtime state, including the controller.
    pub state: SharedState,
    /// Outbound channel to the presentation layer.
    pub tx: Sender<MessageFromController>,
    /// Launches the commands behind fired actions.
    pub launcher: Arc<dyn ActionLauncher>,
}

impl AppContext {
    /// Reads and applies messages one at a time until the bridge closes or
    /// a shutdown is requested.
    pub async fn consume_bridge_messages(self: &Arc<Self>, mut rx: Receiver<MessageToController>) {
        while let Some(message) = rx.recv().await {
            log::debug!("Got a controller message: {message:?}");
            if self.dispatch_message(message).await.is_break() {
                log::info!("Shutting down the notification controller");
                break;
            }
        }
    }

    /// Dispatches a received message down to individual service handlers.
    async fn dispatch_message(self: &Arc<Self>, message: MessageToController) -> ControlFlow<()> {
        match message {
            MessageToController::NewMessageCountChanged(count) => {
                services::mail_service::handle_new_message_count(self.clone(), count).await;
            }
            MessageToController::LogMessage(entry) => {
                services::log_service::handle_log_message(self.clone(), entry).await;
            }
            MessageToController::Acknowledge => {
                services::log_service::handle_acknowledge(self.clone()).await;
            }
            MessageToController::ClearLog => {
                services::log_service::handle_clear_log(self.clone()).await;
            }
            MessageToController::LogViewerOpened => {
                services::log_service::handle_log_viewer_opened(self.clone()).await;
            }
            MessageToController::LogViewerClosed => {
                services::log_service::handle_log_viewer_closed(self.clone()).await;
            }
            MessageToController::LogSnapshotRequest => {
                services::log_service::handle_log_snapshot_request(self.clone()).await;
            }
            MessageToController::Clicked(button) => {
                services::mail_service::handle_click(self.clone(), button).await;
            }
            MessageToController::ForceUpdate => {
                services::mail_service::handle_force_update(self.clone()).await;
            }
            MessageToController::PresentationRequest => {
                services::panel_service::handle_presentation_request(self.clone()).await;
            }
            MessageToController::PanelResized(geometry) => {
                services::panel_service::handle_panel_resized(self.clone(), geometry).await;
            }
            MessageToController::ConfigurationRequest => {
                services::config_service::handle_config_request(self.clone()).await;
            }
            MessageToController::UpdateConfiguration(config) => {
                services::config_service::handle_config_update(self.clone(), config).await;
            }
            MessageToController::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Runs `operation` against the controller and applies its outcome:
    /// fired actions are launched, the tooltip, icon and log snapshot are
    /// pushed to the presentation layer.
    pub async fn update<F>(&self, operation: F)
    where
        F: FnOnce(&mut NotificationController) -> Outcome,
    {
        let (outcome, icon, commands) = {
            let mut state = self.state.write().await;
            let controller = &mut state.controller;
            let outcome = operation(controller);
            let icon = if outcome.redraw {
                controller.compose_icon()
            } else {
                None
            };
            let commands: Vec<_> = outcome
                .actions
                .iter()
                .map(|action| (*action, controller.command_for(*action).map(str::to_string)))
                .collect();
            (outcome, icon, commands)
        };

        for (action, command) in commands {
            let Some(command) = command else {
                log::trace!("No command configured for {action:?}");
                continue;
            };
            log::info!("Running {action:?} command {command:?}");
            if let Err(err) = self.launcher.launch(&command) {
                log::error!("Could not run {action:?} command: {err}");
            }
        }

        if let Some(tooltip) = outcome.tooltip {
            self.send(MessageFromController::TooltipChanged(tooltip)).await;
        }
        match icon {
            Some(icon) => self.send(MessageFromController::IconChanged(icon)).await,
            None if outcome.redraw => log::debug!("No icon available, keeping the previous one"),
            None => {}
        }
        if let Some(snapshot) = outcome.snapshot {
            self.send(MessageFromController::LogSnapshot(snapshot)).await;
        }
    }

    /// Send a message to the presentation layer. A closed channel is logged
    /// and otherwise ignored.
    pub async fn send(&self, message: MessageFromController) {
        if let Err(err) = self.tx.send(message).await {
            log::warn!("Presentation layer is gone, dropping update: {err}");
        }
    }
}
