//! Subprocess-backed command runner.

use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

use crate::CommandRunner;
use crate::error::CommandError;
use crate::invocation::Invocation;

/// Wall-clock limit for a single command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// How long to keep reading stderr after killing a timed-out child.
///
/// A grandchild that inherited the pipe can hold it open after the child
/// dies; the drain is abandoned rather than stalling the worker, keeping
/// whatever it had read.
const KILL_DRAIN_GRACE: Duration = Duration::from_secs(5);

/// Runs commands as child processes with a hard deadline.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
  timeout: Duration,
}

impl ProcessRunner {
  pub fn new(timeout: Duration) -> Self {
    Self { timeout }
  }

  pub fn timeout(&self) -> Duration {
    self.timeout
  }
}

impl Default for ProcessRunner {
  fn default() -> Self {
    Self::new(DEFAULT_COMMAND_TIMEOUT)
  }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
  async fn run(&self, invocation: &Invocation) -> Result<(), CommandError> {
    let deadline = Instant::now() + self.timeout;
    let command = invocation.command_line();

    let mut cmd = Command::new(&invocation.program);
    cmd
      .args(&invocation.args)
      .current_dir(&invocation.dir)
      .envs(invocation.env.iter().map(|(key, value)| (key, value)))
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::piped())
      .kill_on_drop(true);

    debug!(command = %command, dir = %invocation.dir.display(), "running command");

    let mut child = cmd.spawn().map_err(|source| CommandError::Launch {
      command: command.clone(),
      source,
    })?;

    // Start draining before waiting so a chatty child never blocks on a full pipe.
    let captured = Captured::default();
    let drain = tokio::spawn(read_stream(child.stderr.take(), captured.clone()));

    match timeout_at(deadline, child.wait()).await {
      Ok(Ok(status)) => {
        let stderr = finish_drain(drain, &captured, deadline).await;
        if status.success() {
          Ok(())
        } else {
          Err(CommandError::Exited {
            command,
            status,
            stderr,
          })
        }
      }
      Ok(Err(source)) => {
        finish_drain(drain, &captured, deadline).await;
        Err(CommandError::Wait { command, source })
      }
      Err(_) => {
        warn!(command = %command, timeout = ?self.timeout, "command deadline exceeded, killing");
        if let Err(e) = child.kill().await {
          warn!(command = %command, error = %e, "failed to kill timed out command");
        }
        let stderr = finish_drain(drain, &captured, Instant::now() + KILL_DRAIN_GRACE).await;
        Err(CommandError::TimedOut {
          command,
          timeout: self.timeout,
          stderr,
        })
      }
    }
  }
}

/// Bytes read from a child's stderr, shared with the drain task so they
/// survive an aborted drain.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
  fn extend(&self, chunk: &[u8]) {
    self
      .0
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .extend_from_slice(chunk);
  }

  fn take(&self) -> String {
    let mut buf = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    String::from_utf8_lossy(&std::mem::take(&mut *buf)).into_owned()
  }
}

/// Read an output stream to the end, chunk by chunk, into `captured`.
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>, captured: Captured) {
  let Some(mut h) = handle else {
    return;
  };
  let mut chunk = vec![0u8; 8 * 1024];
  loop {
    match h.read(&mut chunk).await {
      Ok(0) => break,
      Ok(n) => captured.extend(&chunk[..n]),
      Err(e) => {
        warn!(error = %e, "failed to read command stderr");
        break;
      }
    }
  }
}

/// Wait for the drain task, giving up at `until`, and return what was read.
async fn finish_drain(mut drain: JoinHandle<()>, captured: &Captured, until: Instant) -> String {
  match timeout_at(until, &mut drain).await {
    Ok(Ok(())) => {}
    Ok(Err(e)) => warn!(error = %e, "stderr drain task failed"),
    Err(_) => {
      drain.abort();
      warn!("stderr still open past deadline, abandoning drain");
    }
  }
  captured.take()
}
