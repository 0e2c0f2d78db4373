//! Job step errors.

use std::fmt;

use kustlint_command::CommandError;
use kustlint_workspace::WorkspaceError;

/// The stages a job passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
  Workspace,
  Fetch,
  Checkout,
  Render,
  Cleanup,
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Step::Workspace => "workspace",
      Step::Fetch => "fetch",
      Step::Checkout => "checkout",
      Step::Render => "render",
      Step::Cleanup => "cleanup",
    };
    f.write_str(name)
  }
}

/// A failure recorded against a job.
///
/// Cleanup failures are never recorded, so there is no variant for them.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
  /// The scratch workspace could not be created.
  #[error(transparent)]
  Workspace(WorkspaceError),

  /// Cloning the repository failed.
  #[error("fetch failed: {0}")]
  Fetch(#[source] CommandError),

  /// Checking out the target revision failed.
  #[error("checkout failed: {0}")]
  Checkout(#[source] CommandError),

  /// Rendering the kustomization failed.
  #[error("render failed: {0}")]
  Render(#[source] CommandError),
}

impl StepError {
  /// The step that produced this error.
  pub fn step(&self) -> Step {
    match self {
      StepError::Workspace(_) => Step::Workspace,
      StepError::Fetch(_) => Step::Fetch,
      StepError::Checkout(_) => Step::Checkout,
      StepError::Render(_) => Step::Render,
    }
  }

  /// The failed command, for steps that run one.
  pub fn command(&self) -> Option<&CommandError> {
    match self {
      StepError::Workspace(_) => None,
      StepError::Fetch(e) | StepError::Checkout(e) | StepError::Render(e) => Some(e),
    }
  }
}
