//! Blocking GitHub REST client for the Actions endpoints.

mod client;
pub mod error;

pub use client::{api_base_url, GithubClient};
pub use error::{ClientError, NetOp, TransportError};
