//! HTTP client for the GitHub Actions REST endpoints.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::ClientError;
use crate::models::{Job, WorkflowRun};
use crate::monitor::{Cancellation, CiProvider};

const USER_AGENT: &str = concat!("actions-wait/", env!("CARGO_PKG_VERSION"));

pub(crate) const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
pub(crate) const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Budget for the job listing and log download behind a report.
pub(crate) const REPORT_REQUEST_TIMEOUT_SECS: u64 = 20;

const RUNS_PER_PAGE: u32 = 20;
const JOBS_PER_PAGE: u32 = 100;

#[derive(Deserialize)]
struct WorkflowRunsResponse {
    workflow_runs: Vec<WorkflowRun>,
}

#[derive(Deserialize)]
struct JobsResponse {
    jobs: Vec<Job>,
}

/// API root for a GitHub host: the public API for `github.com`, the
/// Enterprise `/api/v3` prefix for anything else.
pub fn api_base_url(host: &str) -> String {
    if host.is_empty() || host == "github.com" {
        "https://api.github.com".to_string()
    } else {
        format!("https://{host}/api/v3")
    }
}

/// Client scoped to a single repository.
pub struct GithubClient {
    http: Client,
    api_base: String,
    token: String,
    owner: String,
    repo: String,
    cancel: Option<Cancellation>,
}

impl GithubClient {
    pub fn new(token: &str, host: &str, owner: &str, repo: &str) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        // Redirects to the log storage host are followed by default; reqwest
        // drops the Authorization header when the redirect changes host.
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            api_base: api_base_url(host),
            token: token.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            cancel: None,
        })
    }

    /// Bound every request by the session's remaining time.
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Point the client at a different API root (GitHub Enterprise proxies,
    /// local test servers).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.owner, self.repo, path
        )
    }

    fn request_timeout(&self, limit: Duration) -> Duration {
        match self.cancel.as_ref().and_then(Cancellation::remaining) {
            Some(remaining) => remaining.min(limit),
            None => limit,
        }
    }

    fn get(&self, url: &str, limit: Duration) -> Result<Response, ClientError> {
        tracing::debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .timeout(self.request_timeout(limit))
            .send()
            .map_err(|e| ClientError::from_reqwest("GET", url, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .bytes()
                .map_err(|e| ClientError::from_reqwest("GET", url, &e))?;
            return Err(ClientError::from_response_body(status.as_u16(), &body));
        }
        Ok(response)
    }

    fn get_bytes(&self, url: &str, limit: Duration) -> Result<Vec<u8>, ClientError> {
        let response = self.get(url, limit)?;
        let body = response
            .bytes()
            .map_err(|e| ClientError::from_reqwest("GET", url, &e))?;
        Ok(body.to_vec())
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, limit: Duration) -> Result<T, ClientError> {
        let body = self.get_bytes(url, limit)?;
        serde_json::from_slice(&body).map_err(ClientError::Decode)
    }
}

impl CiProvider for GithubClient {
    fn list_runs_for_commit(&self, sha: &str) -> Result<Vec<WorkflowRun>, ClientError> {
        let url = self.repo_url(&format!(
            "actions/runs?head_sha={sha}&per_page={RUNS_PER_PAGE}"
        ));
        let response: WorkflowRunsResponse =
            self.get_json(&url, Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))?;
        tracing::debug!(count = response.workflow_runs.len(), %sha, "listed workflow runs");
        Ok(response.workflow_runs)
    }

    fn list_jobs(&self, run_id: u64) -> Result<Vec<Job>, ClientError> {
        let url = self.repo_url(&format!(
            "actions/runs/{run_id}/jobs?per_page={JOBS_PER_PAGE}"
        ));
        let response: JobsResponse =
            self.get_json(&url, Duration::from_secs(REPORT_REQUEST_TIMEOUT_SECS))?;
        Ok(response.jobs)
    }

    fn fetch_job_log(&self, job_id: u64) -> Result<Vec<u8>, ClientError> {
        let url = self.repo_url(&format!("actions/jobs/{job_id}/logs"));
        let log = self.get_bytes(&url, Duration::from_secs(REPORT_REQUEST_TIMEOUT_SECS))?;
        tracing::debug!(job_id, bytes = log.len(), "fetched job log");
        Ok(log)
    }
}
