//! External command execution for kustlint.
//!
//! The [`CommandRunner`] trait is the only thing the job executor knows about
//! running tools. [`ProcessRunner`] is the real implementation: it spawns the
//! program with `tokio::process`, drains its stderr concurrently, and kills it
//! once the per-invocation deadline passes.

mod error;
mod invocation;
mod process;

pub use error::CommandError;
pub use invocation::Invocation;
pub use process::{DEFAULT_COMMAND_TIMEOUT, ProcessRunner};

use async_trait::async_trait;

/// Runs one external command to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
  /// Run the invocation, returning `Ok` only on a clean zero exit.
  async fn run(&self, invocation: &Invocation) -> Result<(), CommandError>;
}
