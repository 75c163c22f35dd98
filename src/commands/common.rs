//! Context shared by the `wait` and `open` commands.
//!
//! Resolves which commit to watch, which repository it belongs to and how
//! to authenticate against that repository's GitHub host.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::resolve_token;
use crate::git::{current_branch, remote_url, tip};
use crate::github::GithubClient;
use crate::monitor::{Cancellation, Target};

/// Resolve `reference` (default: the checked-out branch) and `remote` to a
/// watch target.
pub fn resolve_target(reference: Option<&str>, remote: &str, repo_root: &Path) -> Result<Target> {
    let branch = match reference {
        Some(reference) => reference.to_string(),
        None => current_branch(repo_root)?,
    };
    let sha = tip(&branch, repo_root)?;
    let remote = remote_url(remote, repo_root)?;
    tracing::debug!(%branch, %sha, host = %remote.host, "resolved target");

    Ok(Target {
        host: remote.host,
        owner: remote.owner,
        repo: remote.repo,
        branch,
        sha,
    })
}

/// Build an authenticated client for the target's repository, bounded by
/// `cancel`'s deadline.
pub fn github_client(target: &Target, cancel: &Cancellation) -> Result<GithubClient> {
    let token = resolve_token(&target.host)?;
    let client = GithubClient::new(&token, &target.host, &target.owner, &target.repo)
        .context("Failed to create GitHub client")?;
    Ok(client.with_cancellation(cancel.clone()))
}

/// Cancel `cancel` when the user presses Ctrl+C.
pub fn cancel_on_interrupt(cancel: &Cancellation) -> Result<()> {
    let cancel = cancel.clone();
    ctrlc::set_handler(move || cancel.cancel()).context("Failed to set Ctrl+C handler")
}
