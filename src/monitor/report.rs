//! Text rendered at the end of a session and while it is running.

use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::config::Target;
use super::summary::summarize;
use super::tail::tail;
use super::CiProvider;
use crate::duration::format_duration;
use crate::models::WorkflowRun;

const FOOTER_RULE_WIDTH: usize = 40;

/// One progress line for a run that may still be going.
pub fn status_line(run: &WorkflowRun, now: DateTime<Utc>) -> String {
    format!(
        "Workflow {:?} {} ({} elapsed)",
        run.name,
        run.status_label(),
        format_duration(run.duration_at(now))
    )
}

/// Job table for `run`, or a one-line error if the jobs could not be listed.
pub fn jobs_table<P: CiProvider + ?Sized>(provider: &P, run: &WorkflowRun, color: bool) -> String {
    match provider.list_jobs(run.id) {
        Ok(jobs) => summarize(&jobs, color).table,
        Err(err) => format!("\nError fetching jobs: {err}\n"),
    }
}

/// Job table, a rule, and the tail of the first failed job's log.
///
/// The log is best-effort: if it cannot be fetched the report is rendered
/// without an excerpt.
pub fn failure_report<P: CiProvider + ?Sized>(
    provider: &P,
    run: &WorkflowRun,
    lines: usize,
    color: bool,
) -> String {
    let jobs = match provider.list_jobs(run.id) {
        Ok(jobs) => jobs,
        Err(err) => return format!("\nError fetching jobs: {err}\n"),
    };
    let summary = summarize(&jobs, color);

    let excerpt = match summary.failed_job {
        Some(job) => match provider.fetch_job_log(job.id) {
            Ok(log) => String::from_utf8_lossy(tail(&log, lines)).into_owned(),
            Err(err) => {
                tracing::warn!(job_id = job.id, error = %err, "could not fetch failed job log");
                String::new()
            }
        },
        None => String::new(),
    };

    let mut report = summary.table.clone();
    report.push('\n');
    report.push_str(&"=".repeat(summary.first_row_width()));
    if !excerpt.is_empty() {
        let _ = write!(report, "\nLast {lines} lines of failed build output:\n\n");
        report.push_str(&excerpt);
    }
    report
}

/// Closing block of a successful session.
pub fn success_footer(target: &Target, runs: &[WorkflowRun], total: Duration) -> String {
    let mut footer = String::from("\n");
    let _ = writeln!(footer, "{}", "=".repeat(FOOTER_RULE_WIDTH));
    let _ = writeln!(
        footer,
        "Tests on {} took {}. Quitting.",
        target.branch,
        format_duration(total)
    );

    if let Some(latest) = runs.first() {
        let _ = writeln!(footer, "{}", latest.html_url);
        match latest.pull_requests.first() {
            Some(pr) => {
                let _ = writeln!(footer, "{}", target.pull_request_url(pr.number));
            }
            None => {
                let _ = writeln!(footer, "{}", target.branch_url());
            }
        }
    }
    footer
}

/// Longest duration among `runs`; they run in parallel, so this is the
/// wall-clock time of the whole build.
pub fn total_duration(runs: &[WorkflowRun], now: DateTime<Utc>) -> Duration {
    runs.iter()
        .map(|run| run.duration_at(now))
        .max()
        .unwrap_or(Duration::ZERO)
}
