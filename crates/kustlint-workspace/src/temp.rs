use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::WorkspaceProvider;
use crate::error::WorkspaceError;

/// Directory name prefix for workspaces.
pub const DEFAULT_PREFIX: &str = "kust-";

/// Workspaces as uniquely named subdirectories of a root directory.
///
/// Layout:
/// ```text
/// {root}/
/// ├── kust-0b6f6d1e-4c1f-4a55-9f1e-2d1f0c5f3a11/
/// └── kust-9a3c2b7d-...
/// ```
#[derive(Debug, Clone)]
pub struct TempWorkspaceProvider {
  root: PathBuf,
  prefix: String,
}

impl TempWorkspaceProvider {
  /// Workspaces under the given root directory.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      prefix: DEFAULT_PREFIX.to_string(),
    }
  }

  pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.prefix = prefix.into();
    self
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  fn next_path(&self) -> PathBuf {
    self
      .root
      .join(format!("{}{}", self.prefix, uuid::Uuid::new_v4()))
  }
}

impl Default for TempWorkspaceProvider {
  /// Workspaces under the system temp directory.
  fn default() -> Self {
    Self::new(std::env::temp_dir())
  }
}

#[async_trait]
impl WorkspaceProvider for TempWorkspaceProvider {
  async fn create(&self) -> Result<PathBuf, WorkspaceError> {
    let path = self.next_path();
    // Not create_dir_all: an existing directory must fail rather than be shared.
    match fs::create_dir(&path).await {
      Ok(()) => Ok(path),
      Err(source) => Err(WorkspaceError::Create { path, source }),
    }
  }

  async fn remove(&self, path: &Path) -> Result<(), WorkspaceError> {
    fs::remove_dir_all(path)
      .await
      .map_err(|source| WorkspaceError::Remove {
        path: path.to_path_buf(),
        source,
      })
  }
}
