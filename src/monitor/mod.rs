//! Run-completion monitor.
//!
//! Polls the CI provider for the workflow runs of one commit until they all
//! complete, printing throttled progress and a success or failure report.
//! Pure pieces (retry classification, log tail, job table, print throttle)
//! live in their own modules; [`Session`] drives them.

mod cancel;
pub mod classify;
mod config;
mod fetch;
pub mod report;
mod session;
pub mod summary;
mod tail;
pub mod throttle;

pub use cancel::{CancelCause, Cancellation};
pub use classify::{classify, is_retryable, Disposition};
pub use config::{MonitorConfig, Target, DEFAULT_FAILED_OUTPUT_LINES};
pub use fetch::wait_for_latest_run;
pub use session::{MonitorError, PollOutcome, Session};
pub use summary::{summarize, JobSummary};
pub use tail::tail;
pub use throttle::{should_print, ProgressThrottle};

use crate::github::ClientError;
use crate::models::{Job, WorkflowRun};

/// The CI provider calls a session depends on.
pub trait CiProvider {
    /// Runs for a commit, most recent first.
    fn list_runs_for_commit(&self, sha: &str) -> Result<Vec<WorkflowRun>, ClientError>;

    fn list_jobs(&self, run_id: u64) -> Result<Vec<Job>, ClientError>;

    /// Raw, already decompressed log of a job.
    fn fetch_job_log(&self, job_id: u64) -> Result<Vec<u8>, ClientError>;
}
