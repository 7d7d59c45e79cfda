use serde::{Deserialize, Serialize};

/// Themed icon shown while no new mail is present.
pub const DEFAULT_NORMAL_ICON: &str = "xfce-nomail";
/// Themed icon shown while new mail is present.
pub const DEFAULT_NEW_MAIL_ICON: &str = "xfce-newmail";
/// Number of log entries retained when nothing else is configured. Used both
/// for a fresh configuration and for one that lacks the `log_lines` key.
pub const DEFAULT_LOG_LINES: i64 = 500;

/// External commands fired by the controller. Every command is optional; an
/// unset or blank command makes the corresponding action a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Run when the icon is clicked with the primary button.
    pub click_command: Option<String>,
    /// Run when the new message count goes from zero to non-zero.
    pub new_messages_command: Option<String>,
    /// Run on every change of the new message count.
    pub count_changed_command: Option<String>,
}

/// Icon identifiers. Each value is either a name looked up in the icon theme
/// or an absolute path to an image file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IconsConfig {
    /// Icon displayed while there is no new mail.
    pub normal_icon: String,
    /// Icon displayed while there is new mail.
    pub new_mail_icon: String,
    /// Icon theme searched before `hicolor`.
    pub theme: Option<String>,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            normal_icon: DEFAULT_NORMAL_ICON.to_string(),
            new_mail_icon: DEFAULT_NEW_MAIL_ICON.to_string(),
            theme: None,
        }
    }
}

impl IconsConfig {
    /// Returns the configured normal icon, falling back to the built-in name
    /// when the value is blank.
    pub fn normal_icon(&self) -> &str {
        non_blank(&self.normal_icon).unwrap_or(DEFAULT_NORMAL_ICON)
    }

    /// Returns the configured new-mail icon, falling back to the built-in
    /// name when the value is blank.
    pub fn new_mail_icon(&self) -> &str {
        non_blank(&self.new_mail_icon).unwrap_or(DEFAULT_NEW_MAIL_ICON)
    }
}

/// Global applet configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of log entries kept in the scrollback. Negative values
    /// are accepted here and treated as zero.
    pub log_lines: i64,
    /// Whether the highest unacknowledged log severity is drawn as a badge.
    pub show_log_status: bool,
    /// Base icon identifiers.
    pub icons: IconsConfig,
    /// External command strings.
    pub commands: CommandsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_lines: DEFAULT_LOG_LINES,
            show_log_status: true,
            icons: IconsConfig::default(),
            commands: CommandsConfig::default(),
        }
    }
}

impl Config {
    /// Log capacity as an entry count, clamping negative values to zero.
    pub fn log_capacity(&self) -> usize {
        usize::try_from(self.log_lines.max(0)).unwrap_or(usize::MAX)
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_capacity_is_clamped() {
        let config = Config {
            log_lines: -4,
            ..Config::default()
        };
        assert_eq!(config.log_capacity(), 0);
    }

    #[test]
    fn blank_icon_names_fall_back_to_defaults() {
        let icons = IconsConfig {
            normal_icon: "  ".to_string(),
            new_mail_icon: String::new(),
            theme: None,
        };
        assert_eq!(icons.normal_icon(), DEFAULT_NORMAL_ICON);
        assert_eq!(icons.new_mail_icon(), DEFAULT_NEW_MAIL_ICON);
    }
}
