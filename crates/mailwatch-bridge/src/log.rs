use chrono::{DateTime, Local};

/// Severity of a log entry reported by the mail engine.
///
/// Variants are declared in rank order, so the derived ordering is the
/// severity ordering (`Info < Warning < Error`). "Nothing logged" is expressed
/// as `Option::<LogLevel>::None`, which sorts below every level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Informational message, e.g. a completed check.
    Info,
    /// Something the user may want to look at, but checking continues.
    Warning,
    /// A failure such as an unreachable server or rejected login.
    Error,
}

impl LogLevel {
    /// All levels, lowest first.
    pub const ALL: [LogLevel; 3] = [LogLevel::Info, LogLevel::Warning, LogLevel::Error];

    /// Converts a raw engine level. Values past the highest known level are
    /// clamped to [`LogLevel::Error`].
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => LogLevel::Info,
            1 => LogLevel::Warning,
            _ => LogLevel::Error,
        }
    }

    /// Themed icon name used for the badge and the log viewer column.
    pub fn icon_name(self) -> &'static str {
        match self {
            LogLevel::Info => "dialog-information",
            LogLevel::Warning => "dialog-warning",
            LogLevel::Error => "dialog-error",
        }
    }
}

/// A single entry in the applet's log scrollback. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// When the entry was recorded by the engine.
    pub timestamp: DateTime<Local>,
    /// Severity of the entry.
    pub level: LogLevel,
    /// Mailbox that produced the entry, if any.
    pub source: Option<String>,
    /// Message text.
    pub message: String,
}

impl LogEntry {
    /// Creates an entry stamped with the current local time.
    pub fn now(level: LogLevel, source: Option<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            source,
            message: message.into(),
        }
    }

    /// Message as shown in the log viewer: `"[source] message"` when the
    /// entry has a source.
    pub fn display_message(&self) -> String {
        match &self.source {
            Some(source) => format!("[{source}] {}", self.message),
            None => self.message.clone(),
        }
    }

    /// Timestamp as shown in the log viewer.
    pub fn display_timestamp(&self) -> String {
        self.timestamp.format("%c:").to_string()
    }
}
