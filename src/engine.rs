//! Line-oriented stand-in for the mail engine.
//!
//! A mail checker (or a shell script) writes one event per line to stdin:
//!
//! ```text
//! count 3 Inbox=2 Work=1
//! log error @Work connection refused
//! log info check finished
//! log 2 numeric levels clamp to error
//! ack | clear | view | close | update | refresh | quit
//! click [left|middle|right]
//! resize <size> [rows] [horizontal|vertical]
//! ```
//!
//! Force-update requests from the controller are written to stdout as
//! `update` lines so the producer can react to them.

use std::io::Write;
use std::sync::{Arc, Mutex};

use mailwatch_bridge::{
    MessageToController,
    engine::{MailEngine, MailboxCount},
    log::{LogEntry, LogLevel},
    presentation::{MouseButton, Orientation, PanelGeometry},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::Sender;

/// Errors produced while parsing an input line.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("missing argument for {0:?}")]
    MissingArgument(&'static str),
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    #[error("invalid mailbox count {0:?}, expected NAME=COUNT")]
    InvalidMailbox(String),
    #[error("unknown log level {0:?}")]
    UnknownLevel(String),
    #[error("unknown mouse button {0:?}")]
    UnknownButton(String),
    #[error("unknown orientation {0:?}")]
    UnknownOrientation(String),
}

/// A parsed input line.
#[derive(Debug)]
pub enum EngineLine {
    /// New total with its per-mailbox breakdown.
    Count {
        count: u32,
        breakdown: Vec<MailboxCount>,
    },
    /// Any other message for the controller.
    Message(MessageToController),
    /// End of input.
    Quit,
}

/// Mail engine fed from stdin. Update requests go to `output`, which is
/// stdout unless replaced; logging stays on stderr.
pub struct StdinEngine {
    breakdown: Mutex<Vec<MailboxCount>>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl Default for StdinEngine {
    fn default() -> Self {
        Self::with_output(std::io::stdout())
    }
}

impl MailEngine for StdinEngine {
    fn new_message_breakdown(&self) -> Vec<MailboxCount> {
        match self.breakdown.lock() {
            Ok(breakdown) => breakdown.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn force_update(&self) {
        let mut output = match self.output.lock() {
            Ok(output) => output,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = writeln!(output, "update").and_then(|_| output.flush()) {
            log::warn!("Could not forward update request: {err}");
        }
    }
}

impl StdinEngine {
    pub fn with_output(output: impl Write + Send + 'static) -> Self {
        Self {
            breakdown: Mutex::new(Vec::new()),
            output: Mutex::new(Box::new(output)),
        }
    }

    fn set_breakdown(&self, breakdown: Vec<MailboxCount>) {
        match self.breakdown.lock() {
            Ok(mut current) => *current = breakdown,
            Err(poisoned) => *poisoned.into_inner() = breakdown,
        }
    }
}

/// Reads stdin until EOF or `quit`, forwarding every event to the
/// controller. A shutdown message is sent at the end.
pub async fn feed_stdin(
    engine: Arc<StdinEngine>,
    tx: Sender<MessageToController>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let message = match parse_line(&line) {
            Ok(None) => continue,
            Ok(Some(EngineLine::Quit)) => break,
            Ok(Some(EngineLine::Count { count, breakdown })) => {
                engine.set_breakdown(breakdown);
                MessageToController::NewMessageCountChanged(count)
            }
            Ok(Some(EngineLine::Message(message))) => message,
            Err(err) => {
                log::warn!("Skipping input line {line:?}: {err}");
                continue;
            }
        };
        if tx.send(message).await.is_err() {
            log::warn!("Controller stopped, no longer reading input");
            return Ok(());
        }
    }

    // the controller may already be gone, nothing to do then
    let _ = tx.send(MessageToController::Shutdown).await;
    Ok(())
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<EngineLine>, LineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim_start();
    let message = match command {
        "count" => return parse_count(rest).map(Some),
        "log" => MessageToController::LogMessage(parse_log(rest)?),
        "ack" => MessageToController::Acknowledge,
        "clear" => MessageToController::ClearLog,
        "view" => MessageToController::LogViewerOpened,
        "close" => MessageToController::LogViewerClosed,
        "update" => MessageToController::ForceUpdate,
        "refresh" => MessageToController::PresentationRequest,
        "click" => MessageToController::Clicked(parse_button(rest)?),
        "resize" => MessageToController::PanelResized(parse_geometry(rest)?),
        "quit" => return Ok(Some(EngineLine::Quit)),
        other => return Err(LineError::UnknownCommand(other.to_string())),
    };
    Ok(Some(EngineLine::Message(message)))
}

fn parse_number(value: &str) -> Result<u32, LineError> {
    value
        .parse()
        .map_err(|_| LineError::InvalidNumber(value.to_string()))
}

fn parse_count(rest: &str) -> Result<EngineLine, LineError> {
    let mut words = rest.split_whitespace();
    let count = parse_number(words.next().ok_or(LineError::MissingArgument("count"))?)?;
    let breakdown = words
        .map(|word| {
            let (name, count) = word
                .rsplit_once('=')
                .ok_or_else(|| LineError::InvalidMailbox(word.to_string()))?;
            Ok(MailboxCount::new(name, parse_number(count)?))
        })
        .collect::<Result<_, LineError>>()?;
    Ok(EngineLine::Count { count, breakdown })
}

fn parse_log(rest: &str) -> Result<LogEntry, LineError> {
    let (level, rest) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let level = match level {
        "" => return Err(LineError::MissingArgument("log")),
        "info" => LogLevel::Info,
        "warning" | "warn" => LogLevel::Warning,
        "error" => LogLevel::Error,
        raw => match raw.parse() {
            Ok(raw) => LogLevel::from_raw(raw),
            Err(_) => return Err(LineError::UnknownLevel(raw.to_string())),
        },
    };

    let rest = rest.trim_start();
    let (source, message) = match rest.strip_prefix('@') {
        Some(tagged) => {
            let (source, message) = tagged.split_once(char::is_whitespace).unwrap_or((tagged, ""));
            (Some(source.to_string()), message.trim_start())
        }
        None => (None, rest),
    };
    Ok(LogEntry::now(level, source, message))
}

fn parse_button(rest: &str) -> Result<MouseButton, LineError> {
    match rest.trim() {
        "" | "left" => Ok(MouseButton::Primary),
        "middle" => Ok(MouseButton::Middle),
        "right" => Ok(MouseButton::Secondary),
        other => Err(LineError::UnknownButton(other.to_string())),
    }
}

fn parse_geometry(rest: &str) -> Result<PanelGeometry, LineError> {
    let mut words = rest.split_whitespace();
    let size = parse_number(words.next().ok_or(LineError::MissingArgument("resize"))?)?;
    let rows = words.next().map(parse_number).transpose()?.unwrap_or(1);
    let orientation = match words.next() {
        None | Some("horizontal") => Orientation::Horizontal,
        Some("vertical") => Orientation::Vertical,
        Some(other) => return Err(LineError::UnknownOrientation(other.to_string())),
    };
    Ok(PanelGeometry {
        size,
        rows,
        orientation,
        ..PanelGeometry::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_counts_with_breakdown() {
        let Some(EngineLine::Count { count, breakdown }) =
            parse_line("count 3 Inbox=2 lists=dev=1").unwrap()
        else {
            panic!("expected a count line");
        };
        assert_eq!(count, 3);
        assert_eq!(
            breakdown,
            [MailboxCount::new("Inbox", 2), MailboxCount::new("lists=dev", 1)]
        );
    }

    #[test]
    fn parses_log_lines_with_and_without_source() {
        let Some(EngineLine::Message(MessageToController::LogMessage(entry))) =
            parse_line("log error @Work connection refused").unwrap()
        else {
            panic!("expected a log line");
        };
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.source.as_deref(), Some("Work"));
        assert_eq!(entry.message, "connection refused");

        let Some(EngineLine::Message(MessageToController::LogMessage(entry))) =
            parse_line("log info  check finished").unwrap()
        else {
            panic!("expected a log line");
        };
        assert_eq!(entry.source, None);
        assert_eq!(entry.message, "check finished");
    }

    #[test]
    fn numeric_levels_are_clamped() {
        for (line, level) in [
            ("log 0 ok", LogLevel::Info),
            ("log 1 slow", LogLevel::Warning),
            ("log 7 broken", LogLevel::Error),
        ] {
            let Some(EngineLine::Message(MessageToController::LogMessage(entry))) =
                parse_line(line).unwrap()
            else {
                panic!("expected a log line for {line:?}");
            };
            assert_eq!(entry.level, level);
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn force_update_writes_only_protocol_lines() {
        let buffer = SharedBuffer::default();
        let engine = StdinEngine::with_output(buffer.clone());

        log::info!("log records never reach the protocol stream");
        engine.force_update();
        engine.force_update();

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "update\nupdate\n");
    }

    #[test]
    fn parses_simple_commands() {
        assert!(matches!(
            parse_line("view"),
            Ok(Some(EngineLine::Message(MessageToController::LogViewerOpened)))
        ));
        assert!(matches!(
            parse_line("click middle"),
            Ok(Some(EngineLine::Message(MessageToController::Clicked(
                MouseButton::Middle
            ))))
        ));
        assert!(matches!(parse_line("quit"), Ok(Some(EngineLine::Quit))));
        assert!(matches!(
            parse_line("refresh"),
            Ok(Some(EngineLine::Message(
                MessageToController::PresentationRequest
            )))
        ));
        assert!(matches!(parse_line("   "), Ok(None)));
        assert!(matches!(parse_line("# comment"), Ok(None)));
    }

    #[test]
    fn parses_resize() {
        let Some(EngineLine::Message(MessageToController::PanelResized(geometry))) =
            parse_line("resize 64 2 vertical").unwrap()
        else {
            panic!("expected a resize line");
        };
        assert_eq!(geometry.size, 64);
        assert_eq!(geometry.rows, 2);
        assert_eq!(geometry.orientation, Orientation::Vertical);
    }

    #[test]
    fn reports_malformed_lines() {
        assert_eq!(
            parse_line("frobnicate").unwrap_err(),
            LineError::UnknownCommand("frobnicate".into())
        );
        assert_eq!(
            parse_line("count").unwrap_err(),
            LineError::MissingArgument("count")
        );
        assert_eq!(
            parse_line("count x").unwrap_err(),
            LineError::InvalidNumber("x".into())
        );
        assert_eq!(
            parse_line("count 1 Inbox").unwrap_err(),
            LineError::InvalidMailbox("Inbox".into())
        );
        assert_eq!(
            parse_line("log fatal oops").unwrap_err(),
            LineError::UnknownLevel("fatal".into())
        );
    }

    #[test]
    fn engine_reports_the_latest_breakdown() {
        let engine = StdinEngine::with_output(std::io::sink());
        engine.set_breakdown(vec![MailboxCount::new("Inbox", 4)]);
        assert_eq!(
            engine.new_message_breakdown(),
            [MailboxCount::new("Inbox", 4)]
        );
    }
}
