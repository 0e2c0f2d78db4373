//! Result aggregation.

use std::time::{Duration, Instant};

use kustlint_executor::LintResult;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Totals for a finished lint run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LintSummary {
  /// Results received.
  pub total: usize,
  /// Results that carried an error.
  pub failures: usize,
  /// Wall-clock time since the run's start instant.
  pub elapsed: Duration,
}

impl LintSummary {
  pub fn succeeded(&self) -> usize {
    self.total - self.failures
  }
}

/// Consume `results` until the stream closes, logging each outcome.
///
/// Successes are logged as `Linted(<n>): <repoURL>`, where `n` is the number
/// of results received so far; failures as `<error>: <source>`.
pub async fn aggregate(mut results: mpsc::Receiver<LintResult>, started: Instant) -> LintSummary {
  let mut total = 0;
  let mut failures = 0;

  while let Some(result) = results.recv().await {
    total += 1;
    match &result.error {
      Some(e) => {
        failures += 1;
        error!(
          repo_url = %result.app.repo_url,
          step = %e.step(),
          "{}: {}",
          e,
          result.app
        );
      }
      None => info!("Linted({}): {}", total, result.app.repo_url),
    }
  }

  LintSummary {
    total,
    failures,
    elapsed: started.elapsed(),
  }
}
