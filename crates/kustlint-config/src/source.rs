use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A single declared application source: where to fetch it from, which
/// directory to render, and at which revision.
///
/// Absent or `null` string fields read as empty strings; exports routinely
/// omit `targetRevision` when it is left at the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSource {
  /// Git URL the application's manifests live in.
  #[serde(rename = "repoURL", default, deserialize_with = "null_as_empty")]
  pub repo_url: String,

  /// Directory within the repository holding the kustomization.
  #[serde(default, deserialize_with = "null_as_empty")]
  pub path: String,

  /// Branch, tag or commit to check out before rendering.
  #[serde(rename = "targetRevision", default, deserialize_with = "null_as_empty")]
  pub target_revision: String,

  /// Per-application kustomize options. Carried through untouched.
  #[serde(default)]
  pub kustomize: serde_json::Value,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl AppSource {
  pub fn new(
    repo_url: impl Into<String>,
    path: impl Into<String>,
    target_revision: impl Into<String>,
  ) -> Self {
    Self {
      repo_url: repo_url.into(),
      path: path.into(),
      target_revision: target_revision.into(),
      kustomize: serde_json::Value::Null,
    }
  }
}

impl fmt::Display for AppSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} (path: {}, revision: {})",
      self.repo_url, self.path, self.target_revision
    )
  }
}
