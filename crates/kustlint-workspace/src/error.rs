use std::path::PathBuf;

/// Errors from workspace creation and removal.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
  /// The directory could not be created. `path` is where it was attempted.
  #[error("failed to create workspace {}: {source}", .path.display())]
  Create {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The directory could not be removed.
  #[error("failed to remove workspace {}: {source}", .path.display())]
  Remove {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl WorkspaceError {
  /// The directory the failed operation targeted.
  pub fn path(&self) -> &std::path::Path {
    match self {
      Self::Create { path, .. } | Self::Remove { path, .. } => path.as_path(),
    }
  }
}
