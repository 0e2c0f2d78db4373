use std::path::Path;

use crate::error::ConfigError;
use crate::source::AppSource;

/// Parse a JSON array of application sources.
pub fn parse_apps(content: &str) -> Result<Vec<AppSource>, ConfigError> {
  Ok(serde_json::from_str(content)?)
}

/// Read and parse the application list at `path`.
pub fn load_apps(path: impl AsRef<Path>) -> Result<Vec<AppSource>, ConfigError> {
  let path = path.as_ref();
  let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
    path: path.to_path_buf(),
    source,
  })
}
