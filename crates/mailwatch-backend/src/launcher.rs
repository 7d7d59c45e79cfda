//! Fire-and-forget launching of user-configured commands.

use std::process::Stdio;

/// Errors that can occur while launching an external command.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// The command line is empty after parsing.
    #[error("command line is empty")]
    EmptyCommand,
    /// The command line has unbalanced quotes or a dangling escape.
    #[error("failed to parse command line {0:?}")]
    ParseError(String),
    /// The process could not be spawned.
    #[error("failed to spawn {program:?}: {source}")]
    SpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Starts external commands without waiting for them.
pub trait ActionLauncher: Send + Sync {
    /// Launches `command`. Must return promptly; the outcome of the process
    /// itself is not reported back.
    fn launch(&self, command: &str) -> Result<(), LaunchError>;
}

/// Splits a shell-style command line into a program and its arguments.
pub fn parse_command_line(command: &str) -> Result<Vec<String>, LaunchError> {
    let argv = shlex::split(command).ok_or_else(|| LaunchError::ParseError(command.to_string()))?;
    if argv.is_empty() {
        return Err(LaunchError::EmptyCommand);
    }
    Ok(argv)
}

/// Launches commands as child processes on the current tokio runtime.
///
/// The child is reaped on a detached task that logs a non-zero exit status.
/// Must be called from within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandLauncher;

impl ActionLauncher for CommandLauncher {
    fn launch(&self, command: &str) -> Result<(), LaunchError> {
        let argv = parse_command_line(command)?;
        let (program, args) = argv.split_first().ok_or(LaunchError::EmptyCommand)?;

        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| LaunchError::SpawnError {
                program: program.clone(),
                source,
            })?;

        let command = command.to_string();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if !status.success() => {
                    log::warn!("Command {command:?} exited with {status}");
                }
                Ok(_) => log::trace!("Command {command:?} finished"),
                Err(err) => log::warn!("Failed to wait for {command:?}: {err}"),
            }
        });
        Ok(())
    }
}
