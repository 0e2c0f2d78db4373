//! External tools a job invokes.

use std::path::Path;

use kustlint_command::Invocation;
use kustlint_config::AppSource;

pub const DEFAULT_FETCH_PROGRAM: &str = "git";
pub const DEFAULT_RENDER_PROGRAM: &str = "kustomize";
/// The kustomize release the render results are checked against.
pub const DEFAULT_RENDER_VERSION: &str = "v5.4.3";

/// Programs and fixed flags used to fetch and render a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  /// Version control tool, invoked as `clone` then `checkout`.
  pub fetch_program: String,
  /// Environment for every fetch invocation.
  pub fetch_env: Vec<(String, String)>,
  /// Render tool, invoked as `build`.
  pub render_program: String,
  /// Flags passed to `build` ahead of the path.
  pub render_flags: Vec<String>,
  /// Render tool version label reported in the summary.
  pub render_version: String,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self {
      fetch_program: DEFAULT_FETCH_PROGRAM.to_string(),
      // Fail instead of prompting for credentials on private or missing repositories.
      fetch_env: vec![("GIT_TERMINAL_PROMPT".to_string(), "0".to_string())],
      render_program: DEFAULT_RENDER_PROGRAM.to_string(),
      render_flags: vec!["--enable-helm".to_string()],
      render_version: DEFAULT_RENDER_VERSION.to_string(),
    }
  }
}

impl Toolchain {
  /// `clone <repoURL> <workspace>`, run inside the workspace.
  pub fn clone_source(&self, app: &AppSource, workspace: &Path) -> Invocation {
    self
      .fetch_invocation(workspace)
      .arg("clone")
      .arg(&app.repo_url)
      .arg(workspace.to_string_lossy())
  }

  /// `checkout <targetRevision>`, run inside the workspace.
  pub fn checkout(&self, app: &AppSource, workspace: &Path) -> Invocation {
    self
      .fetch_invocation(workspace)
      .arg("checkout")
      .arg(&app.target_revision)
  }

  /// `build <flags...> <path>`, run inside the workspace.
  pub fn render(&self, app: &AppSource, workspace: &Path) -> Invocation {
    Invocation::new(&self.render_program, workspace)
      .arg("build")
      .args(&self.render_flags)
      .arg(&app.path)
  }

  fn fetch_invocation(&self, workspace: &Path) -> Invocation {
    self
      .fetch_env
      .iter()
      .fold(
        Invocation::new(&self.fetch_program, workspace),
        |invocation, (key, value)| invocation.env(key, value),
      )
  }
}
