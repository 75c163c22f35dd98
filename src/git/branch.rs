use anyhow::{bail, Context, Result};
use std::path::Path;

use super::runner::git_stdout;

/// Name of the checked-out branch.
pub fn current_branch(repo_root: &Path) -> Result<String> {
    let branch = git_stdout(&["rev-parse", "--abbrev-ref", "HEAD"], repo_root)
        .context("Failed to get current branch")?;
    if branch == "HEAD" {
        bail!("HEAD is detached; pass a branch or commit to wait for");
    }
    Ok(branch)
}

/// Full commit SHA that `reference` (branch, tag or commit) points at.
pub fn tip(reference: &str, repo_root: &Path) -> Result<String> {
    if reference.starts_with('-') {
        bail!("Invalid git reference: {reference}");
    }
    let spec = format!("{reference}^{{commit}}");
    git_stdout(&["rev-parse", "--verify", "--quiet", &spec], repo_root)
        .with_context(|| format!("Failed to resolve {reference} to a commit"))
}
