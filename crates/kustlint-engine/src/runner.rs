//! End-to-end lint run.

use std::sync::Arc;
use std::time::Instant;

use kustlint_config::{JobSet, job_count};
use kustlint_executor::JobExecutor;
use tokio::sync::mpsc;
use tracing::{Instrument, error, info, instrument};

use crate::aggregate::{LintSummary, aggregate};
use crate::config::EngineConfig;
use crate::dispatch::dispatch;
use crate::pool::WorkerPool;

/// Lints a whole job set.
///
/// # Usage
///
/// ```ignore
/// let executor = Arc::new(JobExecutor::new(runner, workspaces, Toolchain::default()));
/// let runner = LintRunner::new(EngineConfig::default(), executor);
///
/// let summary = runner.run(group_jobs(apps), Instant::now()).await;
/// println!("{} of {} failed", summary.failures, summary.total);
/// ```
pub struct LintRunner {
  config: EngineConfig,
  executor: Arc<JobExecutor>,
}

impl LintRunner {
  pub fn new(config: EngineConfig, executor: Arc<JobExecutor>) -> Self {
    Self { config, executor }
  }

  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  /// Dispatch, execute and aggregate every job, returning once the last
  /// result has been counted.
  ///
  /// `started` is the instant the summary's elapsed time is measured from.
  #[instrument(
    name = "lint_run",
    skip_all,
    fields(
      jobs = job_count(&jobs),
      workers = self.config.worker_count(),
    )
  )]
  pub async fn run(&self, jobs: JobSet, started: Instant) -> LintSummary {
    let workers = self.config.worker_count();
    let (job_tx, job_rx) = mpsc::channel(workers);
    let (result_tx, result_rx) = mpsc::channel(workers);

    let dispatcher = tokio::spawn(dispatch(jobs, job_tx).in_current_span());
    let pool = tokio::spawn(
      WorkerPool::new(workers, self.executor.clone())
        .run(job_rx, result_tx)
        .in_current_span(),
    );

    let summary = aggregate(result_rx, started).await;

    match dispatcher.await {
      Ok(sent) => info!(sent, "dispatcher finished"),
      Err(e) => error!(error = %e, "dispatcher exited abnormally"),
    }
    if let Err(e) = pool.await {
      error!(error = %e, "worker pool exited abnormally");
    }

    summary
  }
}
