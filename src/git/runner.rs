//! Runs the `git` binary.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Run `git <args>` in `repo_root` and return its stdout, trimmed.
///
/// A non-zero exit is an error carrying git's stderr. Quiet lookups such as
/// `rev-parse --quiet` and `config --get` print nothing when they fail, so
/// the exit status is reported instead.
pub fn git_stdout(args: &[&str], repo_root: &Path) -> Result<String> {
    tracing::debug!(args = %args.join(" "), dir = %repo_root.display(), "running git");
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_root)
        .output()
        .with_context(|| format!("Failed to execute: git {}", args.join(" ")))?;

    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
    }

    let subcommand = args.first().copied().unwrap_or_default();
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        bail!("git {subcommand} exited with {}", output.status);
    }
    bail!("git {subcommand} failed: {stderr}")
}
