//! Open a URL in the platform's default browser.

use anyhow::{bail, Context, Result};
use std::process::Command;

/// Program and leading arguments used to open a URL on this platform.
fn opener() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        return ("open", &[]);
    }
    if cfg!(target_os = "windows") {
        return ("cmd", &["/c", "start"]);
    }
    ("xdg-open", &[])
}

pub fn open_url(url: &str) -> Result<()> {
    let (program, args) = opener();
    tracing::debug!(program, url, "opening browser");
    let status = Command::new(program)
        .args(args)
        .arg(url)
        .status()
        .with_context(|| format!("Failed to execute: {program}"))?;
    if !status.success() {
        bail!("{program} exited with: {status}");
    }
    Ok(())
}
