//! Job executor implementation.

use std::path::Path;
use std::sync::Arc;

use kustlint_command::{CommandRunner, Invocation};
use kustlint_config::AppSource;
use kustlint_workspace::WorkspaceProvider;
use tracing::{debug, instrument, warn};

use crate::error::{Step, StepError};
use crate::result::LintResult;
use crate::toolchain::Toolchain;

/// Runs the fetch, checkout and render steps for one source at a time.
///
/// The executor is shared by every worker; each call to
/// [`execute`](Self::execute) gets its own workspace.
pub struct JobExecutor {
  runner: Arc<dyn CommandRunner>,
  workspaces: Arc<dyn WorkspaceProvider>,
  toolchain: Toolchain,
}

impl JobExecutor {
  pub fn new(
    runner: Arc<dyn CommandRunner>,
    workspaces: Arc<dyn WorkspaceProvider>,
    toolchain: Toolchain,
  ) -> Self {
    Self {
      runner,
      workspaces,
      toolchain,
    }
  }

  pub fn toolchain(&self) -> &Toolchain {
    &self.toolchain
  }

  /// Lint one source.
  ///
  /// Steps run in order and none is skipped because an earlier one failed.
  /// A failing step replaces any error recorded before it. The workspace is
  /// removed before returning; a removal failure is logged only.
  #[instrument(
    name = "job_execute",
    skip(self, app),
    fields(
      repo_url = %app.repo_url,
      path = %app.path,
      revision = %app.target_revision,
    )
  )]
  pub async fn execute(&self, app: AppSource) -> LintResult {
    let mut error = None;

    let (workspace, created) = match self.workspaces.create().await {
      Ok(path) => (path, true),
      Err(e) => {
        let attempted = e.path().to_path_buf();
        record(&mut error, StepError::Workspace(e));
        (attempted, false)
      }
    };

    let clone = self.toolchain.clone_source(&app, &workspace);
    if let Err(e) = self.run_step(Step::Fetch, &clone).await {
      record(&mut error, StepError::Fetch(e));
    }

    let checkout = self.toolchain.checkout(&app, &workspace);
    if let Err(e) = self.run_step(Step::Checkout, &checkout).await {
      record(&mut error, StepError::Checkout(e));
    }

    let render = self.toolchain.render(&app, &workspace);
    if let Err(e) = self.run_step(Step::Render, &render).await {
      record(&mut error, StepError::Render(e));
    }

    if created {
      self.cleanup(&workspace).await;
    }

    LintResult { app, error }
  }

  async fn run_step(
    &self,
    step: Step,
    invocation: &Invocation,
  ) -> Result<(), kustlint_command::CommandError> {
    debug!(%step, command = %invocation.command_line(), "step started");
    self.runner.run(invocation).await
  }

  async fn cleanup(&self, workspace: &Path) {
    match self.workspaces.remove(workspace).await {
      Ok(()) => debug!(step = %Step::Cleanup, workspace = %workspace.display(), "workspace removed"),
      Err(e) => warn!(step = %Step::Cleanup, error = %e, "failed to remove workspace"),
    }
  }
}

/// Store `err` as the job's error, replacing any earlier one.
fn record(slot: &mut Option<StepError>, err: StepError) {
  debug!(step = %err.step(), error = %err, "step failed");
  *slot = Some(err);
}
