//! Controller runtime setup and orchestration.
//!
//! This module wires together configuration, the controller and the message
//! dispatch loop that drains the bridge channel.

use std::{
    path::PathBuf,
    sync::Arc,
    thread::{self, JoinHandle},
};

use mailwatch_bridge::{
    MessageFromController, MessageToController, config::Config, engine::MailEngine,
};
use mailwatch_icon::{FilesystemTheme, IconComposer, IconTheme};
use tokio::sync::{
    RwLock,
    mpsc::{Receiver, Sender},
};

use crate::app::AppContext;
use crate::controller::NotificationController;
use crate::launcher::{ActionLauncher, CommandLauncher};
use crate::state::State;

/// Everything the controller loop needs besides its channels.
pub struct Backend {
    /// The external mail engine.
    pub engine: Arc<dyn MailEngine>,
    /// Launcher for configured commands.
    pub launcher: Arc<dyn ActionLauncher>,
    /// Initial configuration.
    pub config: Config,
    /// Where configuration updates are saved; `None` keeps them in memory.
    pub config_path: Option<PathBuf>,
    /// Theme used to resolve icon names.
    pub theme: Box<dyn IconTheme>,
}

impl Backend {
    /// Processes bridge messages until the channel closes or a
    /// [`MessageToController::Shutdown`] arrives.
    pub async fn serve(self, rx: Receiver<MessageToController>, tx: Sender<MessageFromController>) {
        let composer = IconComposer::new(self.theme);
        let controller = NotificationController::new(self.config, composer, self.engine);
        let state = Arc::new(RwLock::new(State {
            controller,
            config_path: self.config_path,
        }));

        let context = Arc::new(AppContext {
            state,
            tx,
            launcher: self.launcher,
        });
        context.consume_bridge_messages(rx).await;
    }
}

/// Load the user's configuration and start processing bridge messages.
async fn setup_backend(
    rx: Receiver<MessageToController>,
    tx: Sender<MessageFromController>,
    engine: Arc<dyn MailEngine>,
) {
    let (config, config_path) = match crate::config::load_config().await {
        Ok((config, config_path)) => (config, Some(config_path)),
        Err(err) => {
            log::error!("Could not load configuration, using defaults: {err}");
            (Config::default(), None)
        }
    };

    let theme = FilesystemTheme::system(config.icons.theme.as_deref());
    let backend = Backend {
        engine,
        launcher: Arc::new(CommandLauncher),
        config,
        config_path,
        theme: Box::new(theme),
    };
    backend.serve(rx, tx).await;
}

/// Spawn the controller runtime on its own thread and begin processing bridge
/// messages.
pub fn run(
    rx: Receiver<MessageToController>,
    tx: Sender<MessageFromController>,
    engine: Arc<dyn MailEngine>,
) -> std::io::Result<JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("mailwatch-controller".to_string())
        .spawn(move || runtime.block_on(setup_backend(rx, tx, engine)))
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;

    use image::{Rgba, RgbaImage};
    use mailwatch_bridge::{
        BridgeChannels,
        config::CommandsConfig,
        engine::MailboxCount,
        log::{LogEntry, LogLevel},
        presentation::{MouseButton, PanelGeometry, Tooltip},
    };

    use super::*;
    use crate::launcher::LaunchError;

    struct StaticEngine;

    impl MailEngine for StaticEngine {
        fn new_message_breakdown(&self) -> Vec<MailboxCount> {
            vec![MailboxCount::new("Inbox", 2)]
        }

        fn force_update(&self) {}
    }

    #[derive(Default)]
    struct RecordingLauncher {
        launched: Mutex<Vec<String>>,
    }

    impl ActionLauncher for RecordingLauncher {
        fn launch(&self, command: &str) -> Result<(), LaunchError> {
            self.launched.lock().unwrap().push(command.to_string());
            Ok(())
        }
    }

    struct FailingLauncher;

    impl ActionLauncher for FailingLauncher {
        fn launch(&self, command: &str) -> Result<(), LaunchError> {
            Err(LaunchError::SpawnError {
                program: command.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    fn write_png(path: &Path, size: u32) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbaImage::from_pixel(size, size, Rgba([1, 2, 3, 255]))
            .save(path)
            .unwrap();
    }

    async fn run_backend(
        config: Config,
        config_path: Option<PathBuf>,
        messages: Vec<MessageToController>,
    ) -> (Vec<MessageFromController>, Vec<String>) {
        let launcher = Arc::new(RecordingLauncher::default());
        let received = run_backend_with(launcher.clone(), config, config_path, messages).await;
        let launched = launcher.launched.lock().unwrap().clone();
        (received, launched)
    }

    async fn run_backend_with(
        launcher: Arc<dyn ActionLauncher>,
        config: Config,
        config_path: Option<PathBuf>,
        messages: Vec<MessageToController>,
    ) -> Vec<MessageFromController> {
        let icons = tempfile::tempdir().unwrap();
        write_png(&icons.path().join("hicolor/24x24/status/xfce-nomail.png"), 24);
        write_png(&icons.path().join("hicolor/24x24/status/xfce-newmail.png"), 24);

        let channels = BridgeChannels::new(64);
        let backend = Backend {
            engine: Arc::new(StaticEngine),
            launcher,
            config,
            config_path,
            theme: Box::new(FilesystemTheme::new(vec![icons.path().to_path_buf()], None)),
        };

        for message in messages {
            channels.presentation_tx.send(message).await.unwrap();
        }
        drop(channels.presentation_tx);
        backend
            .serve(channels.controller_rx, channels.controller_tx)
            .await;

        let mut rx = channels.presentation_rx;
        let mut received = Vec::new();
        while let Some(message) = rx.recv().await {
            received.push(message);
        }
        received
    }

    fn kind(message: &MessageFromController) -> &'static str {
        match message {
            MessageFromController::IconChanged(_) => "icon",
            MessageFromController::TooltipChanged(_) => "tooltip",
            MessageFromController::LogSnapshot(_) => "snapshot",
            MessageFromController::ConfigurationResponse(_) => "config",
        }
    }

    fn commands() -> Config {
        Config {
            commands: CommandsConfig {
                click_command: Some("thunderbird".into()),
                new_messages_command: Some("notify-send mail".into()),
                count_changed_command: Some("update-count".into()),
            },
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn count_changes_launch_commands_and_update_presentation() {
        let (received, launched) = run_backend(
            commands(),
            None,
            vec![
                MessageToController::PanelResized(PanelGeometry {
                    size: 28,
                    ..PanelGeometry::default()
                }),
                MessageToController::NewMessageCountChanged(2),
                MessageToController::NewMessageCountChanged(2),
                MessageToController::NewMessageCountChanged(0),
                MessageToController::Clicked(MouseButton::Primary),
            ],
        )
        .await;

        assert_eq!(
            launched,
            ["notify-send mail", "update-count", "update-count", "thunderbird"]
        );

        let tooltips: Vec<&Tooltip> = received
            .iter()
            .filter_map(|message| match message {
                MessageFromController::TooltipChanged(tooltip) => Some(tooltip),
                _ => None,
            })
            .collect();
        assert_eq!(
            tooltips,
            [
                &Tooltip::Markup("<big><b>You have 2 new messages</b></big>\n2 in Inbox".into()),
                &Tooltip::Plain("No new mail".into()),
            ]
        );

        let icons = received
            .iter()
            .filter(|message| matches!(message, MessageFromController::IconChanged(_)))
            .count();
        assert_eq!(icons, 3);
    }

    #[tokio::test]
    async fn viewer_receives_snapshot_and_shutdown_stops_processing() {
        let (received, launched) = run_backend(
            Config::default(),
            None,
            vec![
                MessageToController::LogMessage(LogEntry::now(LogLevel::Error, None, "boom")),
                MessageToController::LogViewerOpened,
                MessageToController::Shutdown,
                MessageToController::ClearLog,
            ],
        )
        .await;

        assert!(launched.is_empty());
        let snapshots: Vec<&Vec<LogEntry>> = received
            .iter()
            .filter_map(|message| match message {
                MessageFromController::LogSnapshot(snapshot) => Some(snapshot),
                _ => None,
            })
            .collect();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0][0].message, "boom");
    }

    #[tokio::test]
    async fn configuration_updates_are_applied_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let updated = Config {
            log_lines: 1,
            ..Config::default()
        };

        let (received, _) = run_backend(
            Config::default(),
            Some(path.clone()),
            vec![
                MessageToController::LogMessage(LogEntry::now(LogLevel::Info, None, "a")),
                MessageToController::LogMessage(LogEntry::now(LogLevel::Info, None, "b")),
                MessageToController::UpdateConfiguration(updated.clone()),
                MessageToController::ConfigurationRequest,
                MessageToController::LogSnapshotRequest,
            ],
        )
        .await;

        assert!(received.iter().any(|message| matches!(
            message,
            MessageFromController::ConfigurationResponse(config) if *config == updated
        )));
        let Some(MessageFromController::LogSnapshot(snapshot)) = received.last() else {
            panic!("expected a log snapshot last, got {received:?}");
        };
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].message, "b");

        let saved = crate::config::load_config_from(&path).await.unwrap();
        assert_eq!(saved, updated);
    }

    #[tokio::test]
    async fn launch_failures_do_not_disturb_later_events() {
        let received = run_backend_with(
            Arc::new(FailingLauncher),
            commands(),
            None,
            vec![
                MessageToController::NewMessageCountChanged(2),
                MessageToController::LogMessage(LogEntry::now(LogLevel::Error, None, "down")),
                MessageToController::LogSnapshotRequest,
            ],
        )
        .await;

        let kinds: Vec<_> = received.iter().map(kind).collect();
        assert_eq!(kinds, ["tooltip", "icon", "icon", "snapshot"]);
        assert!(matches!(
            &received[0],
            MessageFromController::TooltipChanged(Tooltip::Markup(text)) if text.contains("2 new messages")
        ));
        let MessageFromController::LogSnapshot(snapshot) = &received[3] else {
            unreachable!();
        };
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].message, "down");
    }

    #[tokio::test]
    async fn presentation_request_resends_tooltip_and_icon() {
        let (received, _) = run_backend(
            Config::default(),
            None,
            vec![
                MessageToController::NewMessageCountChanged(1),
                MessageToController::PresentationRequest,
            ],
        )
        .await;

        let kinds: Vec<_> = received.iter().map(kind).collect();
        assert_eq!(kinds, ["tooltip", "icon", "tooltip", "icon"]);
        assert!(matches!(
            &received[2],
            MessageFromController::TooltipChanged(Tooltip::Markup(text)) if text.contains("1 new message")
        ));
    }
}
