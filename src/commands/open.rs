//! Open command - open the commit's latest workflow run in a browser

use anyhow::Result;
use std::env;
use std::io;

use super::common::{cancel_on_interrupt, github_client, resolve_target};
use crate::browser::open_url;
use crate::monitor::{wait_for_latest_run, Cancellation, MonitorConfig};

/// Execute the open command, waiting for a run to appear if necessary.
pub fn execute(reference: Option<String>, remote: String) -> Result<()> {
    let repo_root = env::current_dir()?;
    let target = resolve_target(reference.as_deref(), &remote, &repo_root)?;

    let cancel = Cancellation::new();
    cancel_on_interrupt(&cancel)?;
    let client = github_client(&target, &cancel)?;

    let run = wait_for_latest_run(
        &client,
        &target.sha,
        &cancel,
        &MonitorConfig::default(),
        &mut io::stdout(),
    )?;
    println!("Opening {}", run.html_url);
    open_url(&run.html_url)
}
