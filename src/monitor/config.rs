//! Configuration for a monitoring session

use std::time::Duration;

/// Default number of log lines shown for a failed job.
pub const DEFAULT_FAILED_OUTPUT_LINES: usize = 100;

/// Timing and output settings for a session.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Wait between polls while runs are in progress.
    pub poll_interval: Duration,
    /// Wait after a retryable network error.
    pub retry_backoff: Duration,
    /// Wait while no run exists for the commit yet.
    pub no_runs_backoff: Duration,
    /// Lines of the failed job's log to show.
    pub failed_output_lines: usize,
    /// Highlight failed jobs with terminal colours.
    pub color: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            retry_backoff: Duration::from_secs(2),
            no_runs_backoff: Duration::from_secs(5),
            failed_output_lines: DEFAULT_FAILED_OUTPUT_LINES,
            color: false,
        }
    }
}

/// The commit being watched and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub sha: String,
}

impl Target {
    pub fn pull_request_url(&self, number: u64) -> String {
        format!(
            "https://{}/{}/{}/pull/{number}",
            self.host, self.owner, self.repo
        )
    }

    pub fn branch_url(&self) -> String {
        format!(
            "https://{}/{}/{}/tree/{}",
            self.host, self.owner, self.repo, self.branch
        )
    }
}

/// First 8 characters of a commit, for notices.
pub(crate) fn short_sha(sha: &str) -> &str {
    match sha.char_indices().nth(8) {
        Some((idx, _)) => &sha[..idx],
        None => sha,
    }
}
