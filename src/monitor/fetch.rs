//! One cancellable fetch of the runs for a commit.

use std::io::Write;

use super::cancel::Cancellation;
use super::classify::{classify, Disposition};
use super::config::{short_sha, MonitorConfig};
use super::session::MonitorError;
use super::CiProvider;
use crate::models::WorkflowRun;

pub(crate) enum Fetched {
    Runs(Vec<WorkflowRun>),
    NoRuns,
    Retry,
}

/// Fetch the runs for `sha`, printing a notice for the two transient cases
/// (network trouble, no runs yet). Fatal errors and cancellation are
/// returned as errors; cancellation wins over a concurrent request error.
pub(crate) fn fetch_runs<P, W>(
    provider: &P,
    sha: &str,
    cancel: &Cancellation,
    out: &mut W,
) -> Result<Fetched, MonitorError>
where
    P: CiProvider + ?Sized,
    W: Write,
{
    cancel.check()?;
    match provider.list_runs_for_commit(sha) {
        Ok(runs) if runs.is_empty() => {
            writeln!(
                out,
                "No workflow runs found for {} yet, waiting...",
                short_sha(sha)
            )?;
            Ok(Fetched::NoRuns)
        }
        Ok(runs) => Ok(Fetched::Runs(runs)),
        Err(err) => {
            cancel.check()?;
            match classify(&err) {
                Disposition::Fatal => Err(err.into()),
                Disposition::Retry => {
                    tracing::debug!(error = %err, "retryable error listing runs");
                    writeln!(out, "Caught network error: {err}. Continuing")?;
                    Ok(Fetched::Retry)
                }
            }
        }
    }
}

/// Poll until at least one run exists for `sha` and return the most recent.
pub fn wait_for_latest_run<P, W>(
    provider: &P,
    sha: &str,
    cancel: &Cancellation,
    config: &MonitorConfig,
    out: &mut W,
) -> Result<WorkflowRun, MonitorError>
where
    P: CiProvider + ?Sized,
    W: Write,
{
    loop {
        let wait = match fetch_runs(provider, sha, cancel, out)? {
            Fetched::Runs(runs) => {
                if let Some(latest) = runs.into_iter().next() {
                    return Ok(latest);
                }
                config.no_runs_backoff
            }
            Fetched::NoRuns => config.no_runs_backoff,
            Fetched::Retry => config.retry_backoff,
        };
        cancel.sleep(wait)?;
    }
}
