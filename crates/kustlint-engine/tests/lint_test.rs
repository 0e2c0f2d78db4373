//! End-to-end tests for LintRunner with scripted tools.

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use kustlint_config::{AppSource, group_jobs, parse_apps};
use kustlint_engine::{EngineConfig, LintRunner, LintSummary};
use kustlint_executor::testing::{ScriptedRunner, TestWorkspaces};
use kustlint_executor::{JobExecutor, Toolchain};

const UNREACHABLE: &str = "https://git.invalid/unreachable.git";

fn runner_with(
  workers: usize,
  commands: Arc<ScriptedRunner>,
  workspaces: Arc<TestWorkspaces>,
) -> LintRunner {
  let executor = JobExecutor::new(commands, workspaces, Toolchain::default());
  LintRunner::new(EngineConfig { workers }, Arc::new(executor))
}

fn apps(count: usize) -> Vec<AppSource> {
  (0..count)
    .map(|i| AppSource::new(format!("https://git.example.com/app-{i}.git"), "deploy", "main"))
    .collect()
}

/// Buffer that collects formatted log output.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
  fn contents(&self) -> String {
    String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
  }
}

impl io::Write for LogBuffer {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.0.lock().unwrap().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

async fn run_logged(runner: &LintRunner, apps: Vec<AppSource>) -> (LintSummary, String) {
  let logs = LogBuffer::default();
  let writer = logs.clone();
  let subscriber = tracing_subscriber::fmt()
    .with_writer(move || writer.clone())
    .with_max_level(tracing::Level::INFO)
    .with_ansi(false)
    .finish();
  let _guard = tracing::subscriber::set_default(subscriber);

  let summary = runner.run(group_jobs(apps), Instant::now()).await;
  (summary, logs.contents())
}

#[tokio::test]
async fn test_three_valid_sources() {
  let root = tempfile::tempdir().unwrap();
  let runner = runner_with(
    100,
    Arc::new(ScriptedRunner::new()),
    Arc::new(TestWorkspaces::new(root.path())),
  );

  let summary = runner.run(group_jobs(apps(3)), Instant::now()).await;

  assert_eq!(summary.total, 3);
  assert_eq!(summary.failures, 0);
}

#[tokio::test]
async fn test_unreachable_source_is_reported() {
  let root = tempfile::tempdir().unwrap();
  let commands = Arc::new(
    ScriptedRunner::new()
      .fail_when(UNREACHABLE, "fatal: unable to access: Could not resolve host: git.invalid"),
  );
  let runner = runner_with(100, commands, Arc::new(TestWorkspaces::new(root.path())));

  let mut input = apps(1);
  input.push(AppSource::new(UNREACHABLE, "deploy", "main"));

  let (summary, logs) = run_logged(&runner, input).await;

  assert_eq!(summary.total, 2);
  assert_eq!(summary.failures, 1);
  assert!(logs.contains("Linted(") && logs.contains("https://git.example.com/app-0.git"));
  let failure_line = logs
    .lines()
    .find(|line| line.contains("ERROR"))
    .expect("failure should be logged");
  assert!(failure_line.contains(UNREACHABLE));
  assert!(failure_line.contains("Could not resolve host"));
}

#[tokio::test]
async fn test_pool_events_carry_run_fields() {
  let root = tempfile::tempdir().unwrap();
  let runner = runner_with(
    3,
    Arc::new(ScriptedRunner::new()),
    Arc::new(TestWorkspaces::new(root.path())),
  );

  let (summary, logs) = run_logged(&runner, apps(4)).await;

  assert_eq!(summary.total, 4);
  for message in ["starting worker pool", "worker pool drained"] {
    let line = logs
      .lines()
      .find(|line| line.contains(message))
      .expect("pool event should be logged");
    assert!(line.contains("lint_run{"), "missing run span: {line}");
    assert!(line.contains("jobs=4") && line.contains("workers=3"), "missing fields: {line}");
  }
}

#[tokio::test]
async fn test_empty_input() {
  let root = tempfile::tempdir().unwrap();
  let runner = runner_with(
    100,
    Arc::new(ScriptedRunner::new()),
    Arc::new(TestWorkspaces::new(root.path())),
  );

  let summary = runner
    .run(group_jobs(parse_apps("[]").unwrap()), Instant::now())
    .await;

  assert_eq!(summary.total, 0);
  assert_eq!(summary.failures, 0);
}

#[tokio::test]
async fn test_more_jobs_than_workers() {
  let root = tempfile::tempdir().unwrap();
  let commands = Arc::new(ScriptedRunner::new());
  let runner = runner_with(7, commands.clone(), Arc::new(TestWorkspaces::new(root.path())));

  let summary = runner.run(group_jobs(apps(250)), Instant::now()).await;

  assert_eq!(summary.total, 250);
  assert_eq!(summary.failures, 0);

  // Every job cloned exactly once.
  let clones: Vec<String> = commands
    .command_lines()
    .into_iter()
    .filter(|line| line.starts_with("git clone"))
    .collect();
  let unique: HashSet<&String> = clones.iter().collect();
  assert_eq!(clones.len(), 250);
  assert_eq!(unique.len(), 250);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallelism_bounded_by_worker_count() {
  let root = tempfile::tempdir().unwrap();
  let commands = Arc::new(ScriptedRunner::new().with_delay(Duration::from_millis(10)));
  let runner = runner_with(4, commands.clone(), Arc::new(TestWorkspaces::new(root.path())));

  let summary = runner.run(group_jobs(apps(24)), Instant::now()).await;

  assert_eq!(summary.total, 24);
  assert!(commands.max_in_flight() <= 4);
  assert!(commands.max_in_flight() > 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_workspaces_are_unique_and_removed() {
  let root = tempfile::tempdir().unwrap();
  let commands = Arc::new(ScriptedRunner::new().with_delay(Duration::from_millis(5)));
  let workspaces = Arc::new(TestWorkspaces::new(root.path()));
  let runner = runner_with(16, commands.clone(), workspaces.clone());

  runner.run(group_jobs(apps(48)), Instant::now()).await;

  let invocations = commands.invocations();
  let clone_dirs: HashSet<PathBuf> = invocations
    .iter()
    .filter(|i| i.args.first().map(String::as_str) == Some("clone"))
    .map(|i| i.dir.clone())
    .collect();
  assert_eq!(clone_dirs.len(), 48);

  let removed: HashSet<PathBuf> = workspaces.removed().into_iter().collect();
  assert_eq!(removed, clone_dirs);
  assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_cleanup_failures_do_not_fail_jobs() {
  let root = tempfile::tempdir().unwrap();
  let runner = runner_with(
    4,
    Arc::new(ScriptedRunner::new()),
    Arc::new(TestWorkspaces::new(root.path()).fail_remove()),
  );

  let summary = runner.run(group_jobs(apps(5)), Instant::now()).await;

  assert_eq!(summary.total, 5);
  assert_eq!(summary.failures, 0);
}

#[tokio::test]
async fn test_workspace_failures_counted_per_job() {
  let root = tempfile::tempdir().unwrap();
  let runner = runner_with(
    4,
    Arc::new(ScriptedRunner::new()),
    Arc::new(TestWorkspaces::new(root.path()).fail_create()),
  );

  let summary = runner.run(group_jobs(apps(6)), Instant::now()).await;

  assert_eq!(summary.total, 6);
  assert_eq!(summary.failures, 6);
}

#[cfg(unix)]
mod with_processes {
  use super::*;
  use std::os::unix::fs::PermissionsExt;
  use std::path::Path;

  use kustlint_command::ProcessRunner;
  use kustlint_workspace::TempWorkspaceProvider;

  const FAKE_GIT: &str = r#"#!/bin/sh
case "$1" in
  clone)
    case "$2" in
      *unreachable*)
        echo "fatal: unable to access '$2': Could not resolve host" >&2
        exit 128
        ;;
    esac
    mkdir -p "$3/deploy" && echo "resources: []" > "$3/deploy/kustomization.yaml"
    ;;
  checkout)
    exit 0
    ;;
esac
"#;

  const FAKE_KUSTOMIZE: &str = r#"#!/bin/sh
[ "$1" = build ] && [ "$2" = --enable-helm ] || exit 2
if [ ! -f "$3/kustomization.yaml" ]; then
  echo "Error: unable to find one of 'kustomization.yaml' in directory '$3'" >&2
  exit 1
fi
"#;

  fn install(dir: &Path, name: &str, script: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
  }

  #[tokio::test]
  async fn test_real_processes_end_to_end() {
    let tools = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();

    let toolchain = Toolchain {
      fetch_program: install(tools.path(), "git", FAKE_GIT),
      render_program: install(tools.path(), "kustomize", FAKE_KUSTOMIZE),
      ..Toolchain::default()
    };
    let executor = JobExecutor::new(
      Arc::new(ProcessRunner::new(Duration::from_secs(30))),
      Arc::new(TempWorkspaceProvider::new(scratch.path())),
      toolchain,
    );
    let runner = LintRunner::new(EngineConfig { workers: 2 }, Arc::new(executor));

    let mut input = apps(2);
    input.push(AppSource::new(UNREACHABLE, "deploy", "main"));

    let (summary, logs) = run_logged(&runner, input).await;

    assert_eq!(summary.total, 3);
    assert_eq!(summary.failures, 1);
    assert!(logs.contains("unable to find one of 'kustomization.yaml'"));
    assert!(logs.contains(UNREACHABLE));
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
  }
}
