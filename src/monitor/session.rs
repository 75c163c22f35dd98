//! The polling loop.
//!
//! State machine per poll:
//! - fetch error, retryable → `Retrying` (notice, short backoff)
//! - fetch error, fatal → abort
//! - no runs → `NoRunsYet` (notice, longer backoff)
//! - some runs incomplete → `InProgress` (throttled status lines)
//! - all complete, one failed → `Failed` (failure report, terminal)
//! - all complete, none failed → `Succeeded` (success report, terminal)
//!
//! Cancellation or the deadline ends the session at the next check or wait.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use chrono::Utc;
use colored::Colorize;
use thiserror::Error;

use super::cancel::{CancelCause, Cancellation};
use super::config::{MonitorConfig, Target};
use super::fetch::{fetch_runs, Fetched};
use super::report::{failure_report, jobs_table, status_line, success_footer, total_duration};
use super::throttle::ProgressThrottle;
use super::CiProvider;
use crate::github::ClientError;
use crate::models::WorkflowRun;
use crate::notify::Notifier;

/// Why a session ended without success.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Cancelled(#[from] CancelCause),

    /// The watched workflow failed. Not a defect of the monitor itself.
    #[error("Build on {branch} failed!")]
    BuildFailed { branch: String },

    #[error("writing progress output: {0}")]
    Output(#[from] io::Error),
}

/// State reached by one poll.
#[derive(Debug)]
pub enum PollOutcome {
    Retrying,
    NoRunsYet,
    InProgress,
    Succeeded { total: Duration },
    Failed { run: Box<WorkflowRun> },
}

/// One `wait` invocation: owns the throttle state and the output stream.
pub struct Session<'a, P: ?Sized, N: ?Sized, W> {
    provider: &'a P,
    notifier: &'a N,
    out: W,
    target: Target,
    config: MonitorConfig,
    cancel: Cancellation,
    throttle: ProgressThrottle,
}

impl<'a, P, N, W> Session<'a, P, N, W>
where
    P: CiProvider + ?Sized,
    N: Notifier + ?Sized,
    W: Write,
{
    pub fn new(
        provider: &'a P,
        notifier: &'a N,
        out: W,
        target: Target,
        config: MonitorConfig,
        cancel: Cancellation,
    ) -> Self {
        Self {
            provider,
            notifier,
            out,
            target,
            config,
            cancel,
            throttle: ProgressThrottle::new(Instant::now()),
        }
    }

    /// Poll until every run completes.
    ///
    /// Returns the build's total duration on success. A failed build is
    /// reported and then returned as [`MonitorError::BuildFailed`].
    pub fn run(&mut self) -> Result<Duration, MonitorError> {
        self.throttle = ProgressThrottle::new(Instant::now());
        loop {
            let wait = match self.poll_once()? {
                PollOutcome::Retrying => self.config.retry_backoff,
                PollOutcome::NoRunsYet => self.config.no_runs_backoff,
                PollOutcome::InProgress => self.config.poll_interval,
                PollOutcome::Succeeded { total } => return Ok(total),
                PollOutcome::Failed { .. } => {
                    return Err(MonitorError::BuildFailed {
                        branch: self.target.branch.clone(),
                    })
                }
            };
            self.cancel.sleep(wait)?;
        }
    }

    /// Run a single poll cycle, including any printing it calls for.
    pub fn poll_once(&mut self) -> Result<PollOutcome, MonitorError> {
        let runs = match fetch_runs(self.provider, &self.target.sha, &self.cancel, &mut self.out)? {
            Fetched::Runs(runs) => runs,
            Fetched::NoRuns => {
                self.throttle.mark_printed(Instant::now());
                return Ok(PollOutcome::NoRunsYet);
            }
            Fetched::Retry => {
                self.throttle.mark_printed(Instant::now());
                return Ok(PollOutcome::Retrying);
            }
        };

        let all_complete = runs.iter().all(WorkflowRun::is_completed);
        tracing::debug!(runs = runs.len(), all_complete, "polled workflow runs");
        if !all_complete {
            self.print_progress(&runs)?;
            return Ok(PollOutcome::InProgress);
        }

        match runs.iter().find(|run| run.is_failed()) {
            Some(failed) => {
                self.report_failure(failed)?;
                Ok(PollOutcome::Failed {
                    run: Box::new(failed.clone()),
                })
            }
            None => {
                let total = self.report_success(&runs)?;
                Ok(PollOutcome::Succeeded { total })
            }
        }
    }

    fn print_progress(&mut self, runs: &[WorkflowRun]) -> io::Result<()> {
        let now = Instant::now();
        if !self.throttle.is_due(now) {
            return Ok(());
        }
        let wall_now = Utc::now();
        for run in runs {
            writeln!(self.out, "{}", status_line(run, wall_now))?;
        }
        self.throttle.mark_printed(now);
        Ok(())
    }

    fn report_failure(&mut self, run: &WorkflowRun) -> io::Result<()> {
        tracing::debug!(run_id = run.id, name = %run.name, "workflow run failed");
        let report = failure_report(
            self.provider,
            run,
            self.config.failed_output_lines,
            self.config.color,
        );
        self.out.write_all(report.as_bytes())?;
        writeln!(self.out, "\nURL:\n{}", run.html_url)?;
        self.out.flush()?;
        self.notifier.notify(&self.notification_title(), "build failed");
        Ok(())
    }

    fn report_success(&mut self, runs: &[WorkflowRun]) -> io::Result<Duration> {
        let total = total_duration(runs, Utc::now());

        for run in runs {
            writeln!(self.out, "\nWorkflow {:?} (run {})", run.name, run.run_number)?;
            let table = jobs_table(self.provider, run, self.config.color);
            self.out
                .write_all(table.strip_prefix('\n').unwrap_or(&table).as_bytes())?;
        }

        let footer = success_footer(&self.target, runs, total);
        if self.config.color {
            write!(self.out, "{}", footer.green())?;
        } else {
            self.out.write_all(footer.as_bytes())?;
        }
        self.out.flush()?;

        let message = format!("{} build complete!", self.target.branch);
        self.notifier.notify(&self.notification_title(), &message);
        Ok(total)
    }

    fn notification_title(&self) -> String {
        format!("actions-wait ({})", self.target.repo)
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }
}
