use kustlint_config::{AppSource, JobSet};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Send every job in `jobs` to the queue, then close it.
///
/// Group iteration order is unspecified. Returns how many jobs were sent,
/// which is fewer than the job count only if every receiver went away.
pub async fn dispatch(jobs: JobSet, queue: mpsc::Sender<AppSource>) -> usize {
  let mut sent = 0;
  for (key, group) in jobs {
    for app in group {
      if queue.send(app).await.is_err() {
        warn!(key = %key, sent, "job queue closed before dispatch finished");
        return sent;
      }
      sent += 1;
    }
  }
  debug!(sent, "all jobs dispatched");
  // `queue` drops here, closing the channel for the workers.
  sent
}
