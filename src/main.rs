use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use kustlint_command::ProcessRunner;
use kustlint_config::{group_jobs, job_count, load_apps};
use kustlint_engine::{DEFAULT_WORKERS, EngineConfig, LintRunner, LintSummary};
use kustlint_executor::{
  DEFAULT_FETCH_PROGRAM, DEFAULT_RENDER_PROGRAM, DEFAULT_RENDER_VERSION, JobExecutor, Toolchain,
};
use kustlint_workspace::TempWorkspaceProvider;

const DEFAULT_INPUT: &str = "argo-cd/kust-apps/kust-apps.json";
const DEFAULT_LOG_FILTER: &str = "kustlint=info,kustlint_engine=info,kustlint_executor=info";

/// Kustlint - render every kustomize-based Argo CD application and report
/// the ones that fail
#[derive(Parser)]
#[command(name = "kustlint")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the exported application list (JSON)
  #[arg(default_value = DEFAULT_INPUT)]
  input: PathBuf,

  /// Number of applications linted in parallel
  #[arg(long, default_value_t = DEFAULT_WORKERS)]
  workers: usize,

  /// Time limit for each git or kustomize invocation (e.g. "90s", "5m")
  #[arg(long, value_parser = humantime::parse_duration, default_value = "5m")]
  timeout: Duration,

  /// Directory scratch workspaces are created in (default: system temp dir)
  #[arg(long)]
  temp_root: Option<PathBuf>,

  /// git executable
  #[arg(long, default_value = DEFAULT_FETCH_PROGRAM)]
  git: String,

  /// kustomize executable
  #[arg(long, default_value = DEFAULT_RENDER_PROGRAM)]
  kustomize: String,

  /// kustomize release the results are reported against
  #[arg(long, default_value = DEFAULT_RENDER_VERSION)]
  kustomize_version: String,

  /// Log output format
  #[arg(long, value_enum, default_value_t = LogFormat::Text)]
  log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
  Text,
  Json,
}

fn main() -> Result<()> {
  let started = Instant::now();
  let cli = Cli::parse();

  init_tracing(cli.log_format);

  let rt = tokio::runtime::Runtime::new()?;
  let summary = rt.block_on(async { lint(&cli, started).await })?;

  println!(
    "Linted {}({}) kustomize Argo CD applications to kustomize {} in {}",
    summary.total,
    summary.failures,
    cli.kustomize_version,
    humantime::format_duration(round_to_millis(summary.elapsed)),
  );

  Ok(())
}

async fn lint(cli: &Cli, started: Instant) -> Result<LintSummary> {
  let apps = load_apps(&cli.input)
    .with_context(|| format!("failed to load applications from {}", cli.input.display()))?;
  let jobs = group_jobs(apps);

  tracing::info!(
    input = %cli.input.display(),
    jobs = job_count(&jobs),
    workers = cli.workers,
    timeout = %humantime::format_duration(cli.timeout),
    "loaded applications"
  );

  let toolchain = Toolchain {
    fetch_program: cli.git.clone(),
    render_program: cli.kustomize.clone(),
    render_version: cli.kustomize_version.clone(),
    ..Toolchain::default()
  };
  let workspaces = match &cli.temp_root {
    Some(root) => TempWorkspaceProvider::new(root),
    None => TempWorkspaceProvider::default(),
  };
  let executor = JobExecutor::new(
    Arc::new(ProcessRunner::new(cli.timeout)),
    Arc::new(workspaces),
    toolchain,
  );

  let runner = LintRunner::new(
    EngineConfig {
      workers: cli.workers,
    },
    Arc::new(executor),
  );

  Ok(runner.run(jobs, started).await)
}

fn init_tracing(format: LogFormat) {
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
  let registry = tracing_subscriber::registry().with(filter);

  match format {
    LogFormat::Text => registry
      .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
      .init(),
    LogFormat::Json => registry
      .with(
        tracing_subscriber::fmt::layer()
          .json()
          .with_writer(std::io::stderr),
      )
      .init(),
  }
}

fn round_to_millis(elapsed: Duration) -> Duration {
  Duration::from_millis(elapsed.as_millis() as u64)
}
