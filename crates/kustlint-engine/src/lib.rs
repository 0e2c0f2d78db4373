//! Kustlint Engine
//!
//! Runs a [`JobSet`](kustlint_config::JobSet) through a fixed-size pool of
//! job executors and reduces the outcomes to a [`LintSummary`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  job queue   ┌──────────────────────────┐  results   ┌──────────────┐
//! │  dispatch()  │ ───────────▶ │        WorkerPool        │ ─────────▶ │ aggregate()  │
//! │ sends every  │   (mpsc)     │ N workers, each running  │   (mpsc)   │ counts, logs │
//! │ job once,    │              │ JobExecutor::execute     │            │ per-job      │
//! │ then closes  │              │ closes results when all  │            │ outcome      │
//! └──────────────┘              │ workers have exited      │            └──────────────┘
//!                               └──────────────────────────┘
//! ```
//!
//! [`LintRunner`] wires the three together.

mod aggregate;
mod config;
mod dispatch;
mod pool;
mod runner;

pub use aggregate::{LintSummary, aggregate};
pub use config::{DEFAULT_WORKERS, EngineConfig};
pub use dispatch::dispatch;
pub use pool::WorkerPool;
pub use runner::LintRunner;
