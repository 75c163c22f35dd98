use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::status::{Conclusion, RunStatus};

/// One unit of work within a workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    pub run_id: u64,
    pub name: String,
    pub status: RunStatus,
    pub conclusion: Option<Conclusion>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub html_url: String,
}

/// A step within a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub status: RunStatus,
    pub conclusion: Option<Conclusion>,
    pub number: u32,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn failed(&self) -> bool {
        self.conclusion == Some(Conclusion::Failure)
    }

    /// Time between start and completion, zero unless both are known.
    pub fn duration(&self) -> Duration {
        match (self.started_at, self.completed_at) {
            (Some(started), Some(completed)) => {
                (completed - started).to_std().unwrap_or(Duration::ZERO)
            }
            _ => Duration::ZERO,
        }
    }
}
