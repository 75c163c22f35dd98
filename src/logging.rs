//! Diagnostic tracing setup.
//!
//! Progress and reports are written to stdout by the session. Tracing is
//! for diagnosing the tool itself and goes to stderr.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialise the global subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `debug` enables `debug` for this
/// crate and the default is `warn`.
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "warn,actions_wait=debug"
    } else {
        "warn"
    }
}
