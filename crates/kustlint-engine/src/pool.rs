//! Fixed-size pool of job executors.

use std::sync::Arc;

use kustlint_config::AppSource;
use kustlint_executor::{JobExecutor, LintResult};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info, warn};

/// Runs a fixed number of workers over one job queue.
///
/// Each worker pulls a job, executes it, and sends the result on. The pool
/// holds the original result sender and only drops it after every worker has
/// exited, so the result stream closes exactly once.
pub struct WorkerPool {
  workers: usize,
  executor: Arc<JobExecutor>,
}

impl WorkerPool {
  pub fn new(workers: usize, executor: Arc<JobExecutor>) -> Self {
    Self {
      workers: workers.max(1),
      executor,
    }
  }

  pub fn workers(&self) -> usize {
    self.workers
  }

  /// Drain `jobs` until it is closed and empty, publishing to `results`.
  ///
  /// Returns the number of jobs processed.
  pub async fn run(
    self,
    jobs: mpsc::Receiver<AppSource>,
    results: mpsc::Sender<LintResult>,
  ) -> usize {
    info!(workers = self.workers, "starting worker pool");

    let jobs = Arc::new(Mutex::new(jobs));
    let handles: Vec<_> = (0..self.workers)
      .map(|worker_id| {
        tokio::spawn(work(
          worker_id,
          jobs.clone(),
          results.clone(),
          self.executor.clone(),
        ))
      })
      .collect();

    let mut processed = 0;
    for (worker_id, joined) in futures::future::join_all(handles)
      .await
      .into_iter()
      .enumerate()
    {
      match joined {
        Ok(count) => processed += count,
        Err(e) => error!(worker_id, error = %e, "worker exited abnormally"),
      }
    }

    info!(processed, "worker pool drained");
    drop(results);
    processed
  }
}

async fn work(
  worker_id: usize,
  jobs: Arc<Mutex<mpsc::Receiver<AppSource>>>,
  results: mpsc::Sender<LintResult>,
  executor: Arc<JobExecutor>,
) -> usize {
  let mut processed = 0;
  loop {
    // The lock is released before the job runs so other workers can pull.
    let next = jobs.lock().await.recv().await;
    let Some(app) = next else {
      break;
    };

    let result = executor.execute(app).await;
    processed += 1;

    if let Err(unsent) = results.send(result).await {
      warn!(
        worker_id,
        repo_url = %unsent.0.app.repo_url,
        "result stream closed, worker stopping"
      );
      break;
    }
  }
  debug!(worker_id, processed, "worker finished");
  processed
}
