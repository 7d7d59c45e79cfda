//! The notification state machine.
//!
//! [`NotificationController`] turns engine events into a small visual state,
//! keeps the log scrollback bounded and decides which external actions to
//! fire. It does no I/O of its own: every operation returns an [`Outcome`]
//! describing what the caller must do (launch actions, push a tooltip,
//! redraw the icon).

use std::sync::Arc;

use mailwatch_bridge::{
    config::Config,
    engine::{MailEngine, MailboxCount},
    log::{LogEntry, LogLevel},
    presentation::{ComposedIcon, MouseButton, PanelGeometry, Tooltip},
};
use mailwatch_icon::{IconComposer, IconTheme, select_badge};

use crate::{log_store::LogStore, state::NotificationState};

/// Tooltip shown while there is no new mail.
pub const NO_NEW_MAIL: &str = "No new mail";

/// External actions the controller can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// The icon was clicked with the primary button.
    Click,
    /// The new message count went from zero to non-zero.
    NewMessages,
    /// The new message count changed.
    CountChanged,
}

/// Side effects requested by a controller operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Actions to launch, in order.
    pub actions: Vec<Action>,
    /// New tooltip, if it was rebuilt.
    pub tooltip: Option<Tooltip>,
    /// Whether the icon must be recomposed.
    pub redraw: bool,
    /// Log scrollback to hand to the viewer.
    pub snapshot: Option<Vec<LogEntry>>,
}

impl Outcome {
    fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    /// True when nothing observable has to happen.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Owns the applet state and applies engine and user events to it.
pub struct NotificationController {
    state: NotificationState,
    log: LogStore,
    composer: IconComposer,
    geometry: Option<PanelGeometry>,
    config: Config,
    engine: Arc<dyn MailEngine>,
    tooltip: Tooltip,
    viewer_open: bool,
}

impl NotificationController {
    pub fn new(config: Config, composer: IconComposer, engine: Arc<dyn MailEngine>) -> Self {
        Self {
            state: NotificationState::default(),
            log: LogStore::new(config.log_capacity()),
            composer,
            geometry: None,
            config,
            engine,
            tooltip: Tooltip::Plain(NO_NEW_MAIL.to_string()),
            viewer_open: false,
        }
    }

    pub fn state(&self) -> &NotificationState {
        &self.state
    }

    pub fn log(&self) -> &LogStore {
        &self.log
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    /// Last geometry reported by the panel, or the default before any.
    pub fn geometry(&self) -> PanelGeometry {
        self.geometry.unwrap_or_default()
    }

    /// Badge currently drawn on the icon, if any.
    pub fn badge(&self) -> Option<LogLevel> {
        select_badge(self.state.max_severity, self.config.show_log_status)
    }

    /// Configured command for `action`, ignoring blank values.
    pub fn command_for(&self, action: Action) -> Option<&str> {
        let commands = &self.config.commands;
        let command = match action {
            Action::Click => &commands.click_command,
            Action::NewMessages => &commands.new_messages_command,
            Action::CountChanged => &commands.count_changed_command,
        };
        command
            .as_deref()
            .filter(|command| !command.trim().is_empty())
    }

    /// Applies a change of the total new message count.
    pub fn on_new_message_count_changed(&mut self, new_count: u32) -> Outcome {
        let mut outcome = Outcome::default();

        if new_count == 0 {
            if self.state.mail_present {
                self.state.mail_present = false;
                self.state.message_count = 0;
                outcome.redraw = true;
                outcome.tooltip = Some(self.set_tooltip(Tooltip::Plain(NO_NEW_MAIL.to_string())));
                outcome.actions.push(Action::CountChanged);
            }
            return outcome;
        }

        if !self.state.mail_present {
            self.state.mail_present = true;
            outcome.redraw = true;
        }

        if new_count != self.state.message_count {
            let breakdown = self.engine.new_message_breakdown();
            let tooltip = Tooltip::Markup(new_mail_tooltip(new_count, &breakdown));
            outcome.tooltip = Some(self.set_tooltip(tooltip));

            if self.state.message_count == 0 {
                outcome.actions.push(Action::NewMessages);
            }
            outcome.actions.push(Action::CountChanged);
            self.state.message_count = new_count;
        }

        debug_assert_eq!(self.state.mail_present, self.state.message_count > 0);
        outcome
    }

    /// Records a log entry and raises the badge if it is more severe than
    /// anything unacknowledged.
    pub fn on_log_message(&mut self, entry: LogEntry) -> Outcome {
        let level = entry.level;
        self.log.append(entry);

        if Some(level) > self.state.max_severity {
            self.state.max_severity = Some(level);
            return Outcome::redraw();
        }
        Outcome::default()
    }

    /// Forgets the unacknowledged severity. Logged entries stay.
    pub fn on_acknowledge(&mut self) -> Outcome {
        self.state.max_severity = None;
        Outcome::redraw()
    }

    /// Empties the scrollback without touching the acknowledgment state.
    /// An open viewer is handed the emptied scrollback.
    pub fn on_clear_log(&mut self) -> Outcome {
        self.log.clear();
        Outcome {
            snapshot: self.viewer_open.then(Vec::new),
            ..Outcome::default()
        }
    }

    /// Handles a click on the applet button.
    pub fn on_click(&mut self, button: MouseButton) -> Outcome {
        match button {
            MouseButton::Primary => Outcome {
                actions: vec![Action::Click],
                ..Outcome::default()
            },
            MouseButton::Middle => {
                self.on_force_update();
                Outcome::default()
            }
            MouseButton::Secondary => Outcome::default(),
        }
    }

    /// Opens the singleton log viewer. Only the first open acknowledges;
    /// opening an already open viewer just re-presents it.
    pub fn on_log_viewer_opened(&mut self) -> Outcome {
        let mut outcome = if self.viewer_open {
            Outcome::default()
        } else {
            self.viewer_open = true;
            self.on_acknowledge()
        };
        outcome.snapshot = Some(self.log.snapshot());
        outcome
    }

    pub fn on_log_viewer_closed(&mut self) -> Outcome {
        self.viewer_open = false;
        Outcome::default()
    }

    /// Adopts new panel geometry. Cached pixmaps are dropped so they are
    /// reloaded at the new size. The first geometry always redraws.
    pub fn on_panel_resized(&mut self, geometry: PanelGeometry) -> Outcome {
        if self.geometry == Some(geometry) {
            return Outcome::default();
        }
        self.geometry = Some(geometry);
        self.composer.invalidate();
        Outcome::redraw()
    }

    /// Asks the engine to check every mailbox now.
    pub fn on_force_update(&self) {
        log::debug!("Forcing a mail check");
        self.engine.force_update();
    }

    /// Replaces the configuration. A lowered log capacity evicts right
    /// away; icon and badge changes trigger a redraw.
    pub fn apply_config(&mut self, config: Config) -> Outcome {
        let redraw = config.icons != self.config.icons
            || config.show_log_status != self.config.show_log_status;

        self.log.set_capacity(config.log_capacity());
        self.config = config;

        if redraw {
            self.composer.invalidate();
            Outcome::redraw()
        } else {
            Outcome::default()
        }
    }

    /// Switches the icon theme used to resolve themed names.
    pub fn set_icon_theme(&mut self, theme: impl IconTheme + 'static) {
        self.composer.set_theme(theme);
    }

    /// Composes the icon for the current state. `None` means the base icon
    /// could not be loaded and the previous image should stay.
    pub fn compose_icon(&mut self) -> Option<ComposedIcon> {
        let badge = self.badge();
        let geometry = self.geometry();
        self.composer.compose_icon(
            &geometry,
            &self.config.icons,
            self.state.mail_present,
            badge,
        )
    }

    /// Current icon and tooltip, for a presentation layer that attaches
    /// late and has seen no updates yet.
    pub fn presentation(&mut self) -> (Option<ComposedIcon>, Tooltip) {
        (self.compose_icon(), self.tooltip.clone())
    }

    fn set_tooltip(&mut self, tooltip: Tooltip) -> Tooltip {
        self.tooltip = tooltip.clone();
        tooltip
    }
}

/// Builds the new-mail tooltip: a pluralised headline followed by one line
/// per mailbox that has new messages.
pub fn new_mail_tooltip(count: u32, breakdown: &[MailboxCount]) -> String {
    let noun = if count == 1 { "message" } else { "messages" };
    let mut tooltip = format!("<big><b>You have {count} new {noun}</b></big>");
    for mailbox in breakdown.iter().filter(|mailbox| mailbox.count > 0) {
        tooltip.push('\n');
        tooltip.push_str(&format!(
            "{} in {}",
            mailbox.count,
            escape_markup(&mailbox.name)
        ));
    }
    tooltip
}

fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
