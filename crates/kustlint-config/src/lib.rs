//! Kustlint Config
//!
//! This crate contains the serializable application source descriptors that
//! kustlint validates, the loader for the exported application list, and the
//! grouping of sources into a [`JobSet`] keyed by their composite identity.
//!
//! Sources are loaded from a JSON array such as:
//!
//! ```json
//! [
//!   {
//!     "repoURL": "https://github.com/example/deploy.git",
//!     "path": "apps/payments/overlays/prod",
//!     "targetRevision": "main",
//!     "kustomize": {}
//!   }
//! ]
//! ```

mod error;
mod job_set;
mod load;
mod source;

pub use error::ConfigError;
pub use job_set::{JobKey, JobSet, group_jobs, job_count};
pub use load::{load_apps, parse_apps};
pub use source::AppSource;
