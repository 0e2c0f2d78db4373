//! Test doubles for the command and workspace seams.
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for downstream crates' tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kustlint_command::{CommandError, CommandRunner, Invocation};
use kustlint_workspace::{TempWorkspaceProvider, WorkspaceError, WorkspaceProvider};

/// A [`CommandRunner`] that never spawns anything.
///
/// It records every invocation and fails those whose command line contains
/// one of the configured patterns.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
  failures: Vec<(String, String)>,
  delay: Option<Duration>,
  invocations: Mutex<Vec<Invocation>>,
  in_flight: AtomicUsize,
  max_in_flight: AtomicUsize,
}

impl ScriptedRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fail any command whose command line contains `pattern`, reporting `stderr`.
  pub fn fail_when(mut self, pattern: impl Into<String>, stderr: impl Into<String>) -> Self {
    self.failures.push((pattern.into(), stderr.into()));
    self
  }

  /// Hold each command for `delay` before completing it.
  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = Some(delay);
    self
  }

  pub fn invocations(&self) -> Vec<Invocation> {
    self.invocations.lock().unwrap().clone()
  }

  pub fn command_lines(&self) -> Vec<String> {
    self
      .invocations()
      .iter()
      .map(Invocation::command_line)
      .collect()
  }

  pub fn dirs(&self) -> Vec<PathBuf> {
    self.invocations().into_iter().map(|i| i.dir).collect()
  }

  /// Highest number of commands that were running at the same time.
  pub fn max_in_flight(&self) -> usize {
    self.max_in_flight.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
  async fn run(&self, invocation: &Invocation) -> Result<(), CommandError> {
    self.invocations.lock().unwrap().push(invocation.clone());

    let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    self.max_in_flight.fetch_max(running, Ordering::SeqCst);
    if let Some(delay) = self.delay {
      tokio::time::sleep(delay).await;
    }
    self.in_flight.fetch_sub(1, Ordering::SeqCst);

    let command = invocation.command_line();
    match self
      .failures
      .iter()
      .find(|(pattern, _)| command.contains(pattern.as_str()))
    {
      Some((_, stderr)) => Err(CommandError::Launch {
        command,
        source: std::io::Error::other(stderr.clone()),
      }),
      None => Ok(()),
    }
  }
}

/// A [`TempWorkspaceProvider`] that can be told to fail and remembers what it removed.
#[derive(Debug)]
pub struct TestWorkspaces {
  inner: TempWorkspaceProvider,
  fail_create: bool,
  fail_remove: bool,
  removed: Mutex<Vec<PathBuf>>,
}

impl TestWorkspaces {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      inner: TempWorkspaceProvider::new(root),
      fail_create: false,
      fail_remove: false,
      removed: Mutex::new(Vec::new()),
    }
  }

  pub fn fail_create(mut self) -> Self {
    self.fail_create = true;
    self
  }

  pub fn fail_remove(mut self) -> Self {
    self.fail_remove = true;
    self
  }

  /// Paths passed to `remove`, in call order.
  pub fn removed(&self) -> Vec<PathBuf> {
    self.removed.lock().unwrap().clone()
  }
}

#[async_trait]
impl WorkspaceProvider for TestWorkspaces {
  async fn create(&self) -> Result<PathBuf, WorkspaceError> {
    if self.fail_create {
      return Err(WorkspaceError::Create {
        path: self.inner.root().join("kust-unavailable"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
      });
    }
    self.inner.create().await
  }

  async fn remove(&self, path: &Path) -> Result<(), WorkspaceError> {
    self.removed.lock().unwrap().push(path.to_path_buf());
    if self.fail_remove {
      return Err(WorkspaceError::Remove {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
      });
    }
    self.inner.remove(path).await
  }
}
