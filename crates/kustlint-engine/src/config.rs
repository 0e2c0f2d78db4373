/// Number of jobs linted in parallel unless configured otherwise.
pub const DEFAULT_WORKERS: usize = 100;

/// Configuration for a lint run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
  /// Number of concurrent job executors.
  pub workers: usize,
}

impl EngineConfig {
  /// Worker count, never less than one so a non-empty job set always drains.
  pub fn worker_count(&self) -> usize {
    self.workers.max(1)
  }
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      workers: DEFAULT_WORKERS,
    }
  }
}
