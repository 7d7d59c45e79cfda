use mailwatch_bridge::log::LogLevel;

use crate::controller::NotificationController;

/// What the applet currently shows, independent of how it is drawn.
///
/// Only [`NotificationController`] mutates this struct; everything else sees
/// it through shared references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationState {
    pub(crate) mail_present: bool,
    pub(crate) message_count: u32,
    pub(crate) max_severity: Option<LogLevel>,
}

impl NotificationState {
    /// Whether the new-mail icon is shown.
    pub fn mail_present(&self) -> bool {
        self.mail_present
    }

    /// Last observed number of new messages.
    pub fn message_count(&self) -> u32 {
        self.message_count
    }

    /// Highest severity logged since the last acknowledgment.
    pub fn max_severity(&self) -> Option<LogLevel> {
        self.max_severity
    }
}

/// Runtime state owned by the message loop.
///
/// Wrapped in [`SharedState`] so service handlers can reach it through the
/// application context. The loop only ever runs one handler at a time, so
/// the lock is never contended; it exists to hand the state to async
/// handlers.
pub struct State {
    /// The controller and everything it owns.
    pub controller: NotificationController,
    /// Where configuration changes are persisted, if anywhere.
    pub config_path: Option<std::path::PathBuf>,
}

/// Async-friendly shared reference to the runtime [`State`].
pub type SharedState = std::sync::Arc<tokio::sync::RwLock<State>>;
