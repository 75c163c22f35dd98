//! Error taxonomy for GitHub requests.
//!
//! Transport failures are normalised into [`TransportError`] so the retry
//! policy in [`crate::monitor::classify`] can reason about them without
//! depending on the HTTP stack's error internals.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use serde::Deserialize;
use thiserror::Error;

/// Low-level network operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetOp {
    /// Establishing the connection.
    Dial,
    /// Reading the response.
    Read,
    /// Writing the request.
    Write,
}

impl fmt::Display for NetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NetOp::Dial => "dial",
            NetOp::Read => "read",
            NetOp::Write => "write",
        })
    }
}

/// A failure below the HTTP layer.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("lookup {host}: {message}")]
    Dns { host: String, message: String },

    #[error("{op} {network}: {message}")]
    Op {
        op: NetOp,
        network: String,
        message: String,
    },

    #[error("{0} (timeout)")]
    Timeout(String),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}

/// Errors returned by [`super::GithubClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// A request-level failure naming the method and URL involved.
    #[error("{method} {url}: {source}")]
    Url {
        method: String,
        url: String,
        source: Box<ClientError>,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Non-2xx response with a decoded GitHub error message.
    #[error("GitHub API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not decode {status} error response as a GitHub error: {source}")]
    UndecodableError {
        status: u16,
        source: serde_json::Error,
    },

    #[error("decoding response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("building HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    /// Wrap a transport failure from `reqwest` with the request it belongs to.
    pub(crate) fn from_reqwest(method: &str, url: &str, err: &reqwest::Error) -> Self {
        ClientError::Url {
            method: method.to_string(),
            url: url.to_string(),
            source: Box::new(ClientError::Transport(transport_cause(err))),
        }
    }

    /// Build the error for a non-2xx response from its body.
    pub(crate) fn from_response_body(status: u16, body: &[u8]) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: String,
        }

        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) => ClientError::Api {
                status,
                message: parsed.message,
            },
            Err(source) => ClientError::UndecodableError { status, source },
        }
    }
}

fn transport_cause(err: &reqwest::Error) -> TransportError {
    // The request URL is already carried by the `Url` wrapper.
    let message = match err.source() {
        Some(cause) => error_chain(cause),
        None => err.to_string(),
    };
    if err.is_timeout() {
        return TransportError::Timeout(message);
    }
    if err.is_connect() {
        if chain_mentions(err, "dns error") {
            let host = err
                .url()
                .and_then(|u| u.host_str())
                .unwrap_or_default()
                .to_string();
            return TransportError::Dns { host, message };
        }
        return connect_failure(err, message);
    }
    if err.is_body() || err.is_decode() {
        return TransportError::Op {
            op: NetOp::Read,
            network: "tcp".to_string(),
            message,
        };
    }
    if err.is_request() {
        return TransportError::Op {
            op: NetOp::Write,
            network: "tcp".to_string(),
            message,
        };
    }
    TransportError::Other(message)
}

/// A connect-phase failure is a dial failure only when the socket itself
/// could not be established. TLS handshake and certificate errors surface
/// during connect too, but they are protocol problems.
fn connect_failure(err: &(dyn StdError + 'static), message: String) -> TransportError {
    match io_error_kind(err) {
        Some(kind) if is_dial_failure(kind) => TransportError::Op {
            op: NetOp::Dial,
            network: "tcp".to_string(),
            message,
        },
        _ => TransportError::Other(message),
    }
}

/// Kind of the first `io::Error` in the source chain.
fn io_error_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        current = e.source();
    }
    None
}

fn is_dial_failure(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::AddrNotAvailable
            | io::ErrorKind::HostUnreachable
            | io::ErrorKind::NetworkUnreachable
            | io::ErrorKind::NetworkDown
            | io::ErrorKind::TimedOut
    )
}

/// Join an error and its sources as `outer: inner: innermost`.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

fn chain_mentions(err: &(dyn StdError + 'static), needle: &str) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if e.to_string().to_lowercase().contains(needle) {
            return true;
        }
        current = e.source();
    }
    false
}
