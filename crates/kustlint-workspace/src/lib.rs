//! Scratch workspaces for kustlint jobs.
//!
//! Every job gets its own directory to clone and render in. The
//! [`WorkspaceProvider`] trait owns creating and removing those directories;
//! [`TempWorkspaceProvider`] places them under a temp root.

mod error;
mod temp;

pub use error::WorkspaceError;
pub use temp::{DEFAULT_PREFIX, TempWorkspaceProvider};

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Creates and removes per-job scratch directories.
///
/// Implementations must never hand the same directory to two jobs.
#[async_trait]
pub trait WorkspaceProvider: Send + Sync {
  /// Create a fresh, empty directory.
  async fn create(&self) -> Result<PathBuf, WorkspaceError>;

  /// Recursively remove a directory previously returned by [`create`](Self::create).
  async fn remove(&self, path: &Path) -> Result<(), WorkspaceError>;
}
