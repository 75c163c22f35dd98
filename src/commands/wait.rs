//! Wait command - block until the commit's workflow runs complete

use anyhow::Result;
use std::env;
use std::io::{self, IsTerminal};
use std::time::Duration;

use super::common::{cancel_on_interrupt, github_client, resolve_target};
use crate::duration::format_duration;
use crate::monitor::{Cancellation, MonitorConfig, Session};
use crate::notify::{DesktopNotifier, Notifier, SilentNotifier};

/// Options for [`execute`], as parsed from the command line.
#[derive(Debug, Clone)]
pub struct WaitOptions {
    pub reference: Option<String>,
    pub remote: String,
    pub failed_output_lines: usize,
    pub timeout: Duration,
    pub notify: bool,
}

/// Execute the wait command.
///
/// Returns an error when the build fails, times out or is interrupted.
pub fn execute(options: WaitOptions) -> Result<()> {
    let repo_root = env::current_dir()?;
    let target = resolve_target(options.reference.as_deref(), &options.remote, &repo_root)?;

    let cancel = Cancellation::with_timeout(options.timeout);
    cancel_on_interrupt(&cancel)?;
    let client = github_client(&target, &cancel)?;

    let stdout = io::stdout();
    let config = MonitorConfig {
        failed_output_lines: options.failed_output_lines,
        color: stdout.is_terminal(),
        ..MonitorConfig::default()
    };

    println!("Waiting for GitHub Actions on {} to complete", target.branch);
    tracing::debug!(timeout = %format_duration(options.timeout), "starting session");

    let notifier: &dyn Notifier = if options.notify {
        &DesktopNotifier
    } else {
        &SilentNotifier
    };
    let mut session = Session::new(&client, notifier, stdout, target, config, cancel);
    session.run()?;
    Ok(())
}
