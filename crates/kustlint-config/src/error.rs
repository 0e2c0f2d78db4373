use std::path::PathBuf;

/// Errors that can occur while loading application sources.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The input file could not be read.
  #[error("failed to read {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The input file is not a valid list of application sources.
  #[error("failed to parse {}: {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// Inline input is not a valid list of application sources.
  #[error("invalid application list: {0}")]
  Json(#[from] serde_json::Error),
}
