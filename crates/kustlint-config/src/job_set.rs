//! Grouping of application sources into a job set.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use crate::source::AppSource;

/// Composite identity of a job: `<repoURL>/<path>/<targetRevision>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobKey(String);

impl JobKey {
  pub fn of(source: &AppSource) -> Self {
    Self(format!(
      "{}/{}/{}",
      source.repo_url, source.path, source.target_revision
    ))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Borrow<str> for JobKey {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for JobKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Jobs grouped under their composite key.
pub type JobSet = HashMap<JobKey, Vec<AppSource>>;

/// Group sources into a [`JobSet`].
///
/// Each source is stored under its composite key, appended to whatever group
/// is currently stored under its bare repository URL. Since composite keys
/// always carry the path and revision, that lookup is normally empty and a
/// repeated triple replaces the earlier entry.
pub fn group_jobs(apps: impl IntoIterator<Item = AppSource>) -> JobSet {
  let mut jobs = JobSet::new();
  for app in apps {
    let mut group = jobs
      .get(app.repo_url.as_str())
      .cloned()
      .unwrap_or_default();
    let key = JobKey::of(&app);
    group.push(app);
    jobs.insert(key, group);
  }
  jobs
}

/// Total number of jobs across all groups.
pub fn job_count(jobs: &JobSet) -> usize {
  jobs.values().map(Vec::len).sum()
}
