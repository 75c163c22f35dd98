//! Records returned by the GitHub Actions API.
//!
//! All records are read-only snapshots: every poll fetches a fresh set.

mod job;
mod run;
mod status;

pub use job::{Job, Step};
pub use run::{PullRequestRef, WorkflowRun};
pub use status::{Conclusion, RunStatus};
