use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use super::runner::git_stdout;

/// Host and repository a git remote points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl {
    pub host: String,
    pub owner: String,
    pub repo: String,
}

/// Read and parse the URL of the named remote.
pub fn remote_url(remote: &str, repo_root: &Path) -> Result<RemoteUrl> {
    let key = format!("remote.{remote}.url");
    let url = git_stdout(&["config", "--get", &key], repo_root)
        .with_context(|| format!("No URL configured for git remote '{remote}'"))?;
    parse_remote_url(&url)
}

fn remote_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // https://host/owner/repo(.git), ssh://user@host:port/owner/repo(.git)
            Regex::new(
                r"^(?:https?|ssh|git)://(?:[^@/]+@)?(?P<host>[^/:]+)(?::\d+)?/(?P<owner>[^/]+(?:/[^/]+)*)/(?P<repo>[^/]+?)(?:\.git)?/?$",
            )
            .expect("valid remote url pattern"),
            // git@host:owner/repo(.git)
            Regex::new(
                r"^(?:[^@/]+@)?(?P<host>[^/:]+):(?P<owner>[^/]+(?:/[^/]+)*)/(?P<repo>[^/]+?)(?:\.git)?/?$",
            )
            .expect("valid scp-style pattern"),
        ]
    })
}

/// Parse an https, ssh or scp-style git URL.
///
/// # Examples
///
/// ```
/// use actions_wait::git::parse_remote_url;
///
/// let remote = parse_remote_url("git@github.com:octo/hello.git").unwrap();
/// assert_eq!(remote.host, "github.com");
/// assert_eq!(remote.owner, "octo");
/// assert_eq!(remote.repo, "hello");
/// ```
pub fn parse_remote_url(url: &str) -> Result<RemoteUrl> {
    let url = url.trim();
    remote_patterns()
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .map(|caps| RemoteUrl {
            host: caps["host"].to_string(),
            owner: caps["owner"].to_string(),
            repo: caps["repo"].to_string(),
        })
        .ok_or_else(|| anyhow!("Unrecognized git remote URL: {url}"))
}
