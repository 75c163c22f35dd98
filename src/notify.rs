//! Desktop notifications for finished builds.
//!
//! Uses notify-send on Linux and osascript on macOS.

use std::process::Command;

/// Surfaces a short message to the operator outside the terminal.
pub trait Notifier {
    fn notify(&self, title: &str, message: &str);
}

/// Platform desktop notifications. Failures are logged and never propagated.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) {
        send_desktop_notification(title, message);
    }
}

/// Notifier that drops every message, for `--no-notify` and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _title: &str, _message: &str) {}
}

/// Send a desktop notification, best-effort.
pub fn send_desktop_notification(title: &str, body: &str) {
    let result = if cfg!(target_os = "macos") {
        let script = applescript_notification(title, body);
        run_notifier("osascript", &["-e", script.as_str()])
    } else {
        run_notifier("notify-send", &["--app-name=actions-wait", title, body])
    };

    if let Err(e) = result {
        tracing::warn!("desktop notification failed: {e}");
    }
}

fn run_notifier(program: &str, args: &[&str]) -> Result<(), String> {
    tracing::debug!(program, "sending desktop notification");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| format!("{program} failed: {e}"))?;
    if output.status.success() {
        Ok(())
    } else {
        Err(format!("{program} exited with: {}", output.status))
    }
}

fn applescript_notification(title: &str, body: &str) -> String {
    format!(
        r#"display notification "{}" with title "{}""#,
        escape_applescript(body),
        escape_applescript(title)
    )
}

fn escape_applescript(s: &str) -> String {
    s.replace('\\', r"\\").replace('"', r#"\""#)
}
