//! Local repository lookups: current branch, commit of a ref, remote URL.

mod branch;
mod remote;
mod runner;

pub use branch::{current_branch, tip};
pub use remote::{parse_remote_url, remote_url, RemoteUrl};
pub use runner::git_stdout;
