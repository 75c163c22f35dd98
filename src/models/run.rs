use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::status::{Conclusion, RunStatus};
use crate::duration;

/// Pull request associated with a workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub number: u64,
    #[serde(default)]
    pub url: String,
}

/// One execution of a workflow, triggered by a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub head_branch: Option<String>,
    #[serde(default)]
    pub head_sha: String,
    #[serde(default)]
    pub run_number: u64,
    #[serde(default)]
    pub event: String,
    pub status: RunStatus,
    pub conclusion: Option<Conclusion>,
    #[serde(default)]
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub run_started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pull_requests: Vec<PullRequestRef>,
}

impl WorkflowRun {
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    pub fn is_success(&self) -> bool {
        self.is_completed() && self.conclusion == Some(Conclusion::Success)
    }

    /// Completed with a failure, cancelled or timed-out conclusion.
    pub fn is_failed(&self) -> bool {
        self.is_completed() && self.conclusion.as_ref().is_some_and(Conclusion::is_failure)
    }

    /// The conclusion once completed, the status otherwise.
    pub fn status_label(&self) -> &str {
        match (&self.conclusion, self.is_completed()) {
            (Some(conclusion), true) => conclusion.as_str(),
            _ => self.status.as_str(),
        }
    }

    /// Wall-clock duration of the run as of `now`, rounded to whole seconds.
    ///
    /// Completed runs end at their last update; runs still going end at
    /// `now`. A run that has not started yet has zero duration, and clock
    /// skew never produces a negative value.
    pub fn duration_at(&self, now: DateTime<Utc>) -> Duration {
        let Some(started) = self.run_started_at else {
            return Duration::ZERO;
        };
        let end = if self.is_completed() {
            self.updated_at
        } else {
            now
        };
        let elapsed = (end - started).to_std().unwrap_or(Duration::ZERO);
        duration::round(elapsed, Duration::from_secs(1))
    }

    pub fn duration(&self) -> Duration {
        self.duration_at(Utc::now())
    }
}
