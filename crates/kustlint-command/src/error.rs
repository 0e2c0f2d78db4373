//! Command execution errors.

use std::process::ExitStatus;
use std::time::Duration;

/// Errors that can occur while running an external command.
///
/// Every variant carries the attempted command line. Failures that produced
/// diagnostics lead with the captured stderr text.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
  /// The program could not be started.
  #[error("{source}: {command}")]
  Launch {
    command: String,
    #[source]
    source: std::io::Error,
  },

  /// Waiting for the child process failed.
  #[error("{source}: {command}")]
  Wait {
    command: String,
    #[source]
    source: std::io::Error,
  },

  /// The program exited unsuccessfully.
  #[error("{}{status}: {command}", stderr_prefix(.stderr))]
  Exited {
    command: String,
    status: ExitStatus,
    stderr: String,
  },

  /// The program ran past its deadline and was killed.
  #[error("{}timed out after {timeout:?}: {command}", stderr_prefix(.stderr))]
  TimedOut {
    command: String,
    timeout: Duration,
    stderr: String,
  },
}

impl CommandError {
  /// The command line that was attempted.
  pub fn command(&self) -> &str {
    match self {
      Self::Launch { command, .. }
      | Self::Wait { command, .. }
      | Self::Exited { command, .. }
      | Self::TimedOut { command, .. } => command.as_str(),
    }
  }

  /// Diagnostics the program wrote to stderr, if it got far enough to write any.
  pub fn stderr(&self) -> Option<&str> {
    match self {
      Self::Exited { stderr, .. } | Self::TimedOut { stderr, .. } => Some(stderr.as_str()),
      Self::Launch { .. } | Self::Wait { .. } => None,
    }
  }
}

fn stderr_prefix(stderr: &str) -> String {
  let stderr = stderr.trim();
  if stderr.is_empty() {
    String::new()
  } else {
    format!("{}: ", stderr)
  }
}
