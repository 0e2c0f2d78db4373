//! Job execution for kustlint.
//!
//! The [`JobExecutor`] takes one [`AppSource`](kustlint_config::AppSource)
//! through its whole lifecycle: create a scratch workspace, clone the
//! repository, check out the target revision, render the kustomization, and
//! remove the workspace again. Every step runs even when an earlier one
//! failed; the [`LintResult`] carries the error of the last step that failed.

mod error;
mod executor;
mod result;
mod toolchain;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{Step, StepError};
pub use executor::JobExecutor;
pub use result::LintResult;
pub use toolchain::{
  DEFAULT_FETCH_PROGRAM, DEFAULT_RENDER_PROGRAM, DEFAULT_RENDER_VERSION, Toolchain,
};
