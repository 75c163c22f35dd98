//! GitHub token resolution.
//!
//! Checks `GH_TOKEN`, then `GITHUB_TOKEN`, then a TOML config file at the
//! first existing of:
//! - `$XDG_CONFIG_HOME/actions-wait`
//! - `$HOME/cfg/actions-wait`
//! - `$HOME/.actions-wait`

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "actions-wait";
const FALLBACK_HOST: &str = "github.com";

/// Token entry for one GitHub host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub token: String,
}

/// Contents of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub hosts: HashMap<String, HostConfig>,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Token for `host`, falling back to the default host, then github.com.
    pub fn token_for(&self, host: &str) -> Option<&str> {
        [host, self.default.as_str(), FALLBACK_HOST]
            .into_iter()
            .filter(|h| !h.is_empty())
            .filter_map(|h| self.hosts.get(h))
            .map(|entry| entry.token.as_str())
            .find(|token| !token.is_empty())
    }
}

/// Places a token can come from, captured once from the environment.
#[derive(Debug, Clone, Default)]
pub struct TokenSources {
    pub gh_token: Option<String>,
    pub github_token: Option<String>,
    pub config_path: Option<PathBuf>,
}

impl TokenSources {
    pub fn from_env() -> Self {
        Self {
            gh_token: non_empty_var("GH_TOKEN"),
            github_token: non_empty_var("GITHUB_TOKEN"),
            config_path: find_config_path(
                env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
                dirs::home_dir(),
            ),
        }
    }

    pub fn resolve(&self, host: &str) -> Result<String> {
        if let Some(token) = self.gh_token.as_ref().or(self.github_token.as_ref()) {
            return Ok(token.clone());
        }

        let Some(path) = &self.config_path else {
            bail!(token_not_found_message(host));
        };
        tracing::debug!(path = %path.display(), "reading token from config file");

        let config = FileConfig::load(path)?;
        match config.token_for(host) {
            Some(token) => Ok(token.to_string()),
            None => bail!(token_not_found_message(host)),
        }
    }
}

/// Resolve a token for `host` from the process environment.
pub fn resolve_token(host: &str) -> Result<String> {
    TokenSources::from_env().resolve(host)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// First existing config file among the known locations.
pub fn find_config_path(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(xdg) = xdg_config_home {
        candidates.push(xdg.join(CONFIG_FILE_NAME));
    }
    if let Some(home) = home {
        candidates.push(home.join("cfg").join(CONFIG_FILE_NAME));
        candidates.push(home.join(format!(".{CONFIG_FILE_NAME}")));
    }
    candidates.into_iter().find(|path| path.is_file())
}

fn token_not_found_message(host: &str) -> String {
    format!(
        r#"Couldn't find a GitHub token for host "{host}".

Set the GH_TOKEN or GITHUB_TOKEN environment variable, or add a configuration file at
$XDG_CONFIG_HOME/{CONFIG_FILE_NAME}, $HOME/cfg/{CONFIG_FILE_NAME} or $HOME/.{CONFIG_FILE_NAME}:

default = "github.com"

[hosts."github.com"]
token = "ghp_xxxx"

Go to https://github.com/settings/tokens to create a token.
"#
    )
}
