//! Retry policy for failed GitHub requests.

use crate::github::{ClientError, NetOp, TransportError};

/// What the session should do after a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Transient network trouble: wait and poll again.
    Retry,
    /// Abort the session with this error.
    Fatal,
}

/// Decide whether a failed request is worth retrying.
///
/// A request-level wrapper is peeled off first. DNS failures and TCP
/// connection failures are retried, as is anything that timed out. Failures
/// after the connection was established (e.g. reading the response) are
/// not, since they can indicate a real protocol problem.
pub fn classify(err: &ClientError) -> Disposition {
    let cause = match err {
        ClientError::Url { source, .. } => source.as_ref(),
        other => other,
    };

    match cause {
        ClientError::Transport(TransportError::Dns { .. }) => Disposition::Retry,
        ClientError::Transport(TransportError::Op { op, network, .. }) => {
            if *op == NetOp::Dial && network == "tcp" {
                Disposition::Retry
            } else {
                Disposition::Fatal
            }
        }
        ClientError::Transport(transport) if transport.is_timeout() => Disposition::Retry,
        _ => Disposition::Fatal,
    }
}

/// `true` only for errors [`classify`] would retry; `None` is never retryable.
pub fn is_retryable(err: Option<&ClientError>) -> bool {
    err.is_some_and(|e| classify(e) == Disposition::Retry)
}
