//! Job duration table for a workflow run.

use std::fmt::Write as _;
use std::time::Duration;

use crate::duration::{format_duration, round};
use crate::models::Job;

/// 256-colour red used to flag a failed job's duration.
const FAILED_COLOR: &str = "\x1B[38;05;160m";
const ATTR_RESET: &str = "\x1B[0m";

/// Rendered job table plus the job to investigate.
#[derive(Debug)]
pub struct JobSummary<'a> {
    /// Aligned `name duration` lines, preceded by a blank line.
    pub table: String,
    /// First job, in API order, whose conclusion is `failure`.
    pub failed_job: Option<&'a Job>,
}

impl JobSummary<'_> {
    /// Width of the first table row, used to size the rule under it.
    pub fn first_row_width(&self) -> usize {
        self.table
            .get(1..)
            .and_then(|rows| rows.lines().next())
            .map_or(0, |row| row.chars().count())
    }
}

/// Precision used when showing a job duration: whole seconds past a minute,
/// hundredths of a second below it.
pub fn display_precision(d: Duration) -> Duration {
    if d > Duration::from_secs(60) {
        round(d, Duration::from_secs(1))
    } else {
        round(d, Duration::from_millis(10))
    }
}

/// Render `jobs` in the order given.
///
/// `color` should be set only when the output is an interactive terminal;
/// it wraps failed jobs' durations in a highlight escape sequence.
pub fn summarize(jobs: &[Job], color: bool) -> JobSummary<'_> {
    let name_width = jobs
        .iter()
        .map(|job| job.name.chars().count())
        .max()
        .unwrap_or(0);

    let mut table = String::from("\n");
    let mut failed_job = None;

    for job in jobs {
        let duration = format_duration(display_precision(job.duration()));
        let failed = job.failed();
        if failed && failed_job.is_none() {
            failed_job = Some(job);
        }

        let duration = if failed && color {
            format!("{FAILED_COLOR}{duration:<8}{ATTR_RESET}")
        } else {
            duration
        };
        // Writing to a String cannot fail.
        let _ = writeln!(table, "{:<name_width$} {duration}", job.name);
    }

    JobSummary { table, failed_job }
}
