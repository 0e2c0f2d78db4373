use kustlint_config::AppSource;

use crate::error::StepError;

/// Outcome of linting one application source.
#[derive(Debug)]
pub struct LintResult {
  /// The source that was processed.
  pub app: AppSource,
  /// Error from the last step that failed, if any did.
  pub error: Option<StepError>,
}

impl LintResult {
  pub fn is_success(&self) -> bool {
    self.error.is_none()
  }
}
