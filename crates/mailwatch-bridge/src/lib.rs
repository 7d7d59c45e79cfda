//! Communication bridge between the mail engine, the notification controller
//! and the presentation layer.
//!
//! This crate defines the types and protocols the controller consumes and
//! produces. The controller itself never talks to a widget toolkit or a mail
//! server directly:
//! - The mail engine and the presentation layer send messages (count
//!   changes, log entries, clicks, viewer open/close, resizes).
//! - The controller pushes presentation updates (composed icon, tooltip, log
//!   snapshots, configuration).
//!
//! Communication happens over bounded [`tokio::sync::mpsc`] channels wrapped
//! in [`BridgeChannels`]. A single consumer drains the inbound channel, so
//! every message is applied in arrival order.

pub mod config;
pub mod engine;
pub mod log;
pub mod presentation;

use tokio::sync::mpsc::{self, Receiver, Sender};

/// Messages emitted by the controller towards the presentation layer.
#[derive(Debug, Clone)]
pub enum MessageFromController {
    /// The composed icon changed and should be redrawn.
    IconChanged(presentation::ComposedIcon),
    /// The tooltip text changed.
    TooltipChanged(presentation::Tooltip),
    /// Ordered log scrollback, oldest entry first.
    LogSnapshot(Vec<log::LogEntry>),
    /// Response to a configuration request.
    ConfigurationResponse(config::Config),
}

/// Messages consumed by the controller.
///
/// The first two variants come from the mail engine; the rest come from the
/// presentation layer or the process itself.
#[derive(Debug, Clone)]
pub enum MessageToController {
    /// The total number of new messages changed.
    NewMessageCountChanged(u32),
    /// The engine logged a message.
    LogMessage(log::LogEntry),
    /// The user acknowledged the current log severity.
    Acknowledge,
    /// Clear the log scrollback.
    ClearLog,
    /// The applet button was clicked.
    Clicked(presentation::MouseButton),
    /// The log viewer was opened (or re-presented if already open).
    LogViewerOpened,
    /// The log viewer was closed.
    LogViewerClosed,
    /// Request the log scrollback without acknowledging it.
    LogSnapshotRequest,
    /// The panel allotted a different amount of space to the applet.
    PanelResized(presentation::PanelGeometry),
    /// Request for the current configuration.
    ConfigurationRequest,
    /// Replace the configuration and persist it.
    UpdateConfiguration(config::Config),
    /// Ask the engine for an immediate re-check.
    ForceUpdate,
    /// Resend the current icon and tooltip.
    PresentationRequest,
    /// Stop processing messages.
    Shutdown,
}

/// Paired `tokio::mpsc` channels between the controller and its
/// collaborators.
pub struct BridgeChannels {
    /// Receiver used by the presentation layer to get updates.
    pub presentation_rx: Receiver<MessageFromController>,
    /// Sender used by the engine and the presentation layer. Clone it for
    /// every producer.
    pub presentation_tx: Sender<MessageToController>,

    /// Receiver drained by the controller.
    pub controller_rx: Receiver<MessageToController>,
    /// Sender used by the controller to publish presentation updates.
    pub controller_tx: Sender<MessageFromController>,
}

impl BridgeChannels {
    /// Creates a new pair of bridged channels with the given buffer capacity.
    pub fn new(buffer: usize) -> Self {
        let (to_controller_tx, to_controller_rx) = mpsc::channel(buffer);
        let (to_presentation_tx, to_presentation_rx) = mpsc::channel(buffer);
        Self {
            presentation_tx: to_controller_tx,
            presentation_rx: to_presentation_rx,
            controller_rx: to_controller_rx,
            controller_tx: to_presentation_tx,
        }
    }
}

impl Default for BridgeChannels {
    fn default() -> Self {
        Self::new(64)
    }
}
