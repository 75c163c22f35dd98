//! Shared test helpers: temporary git repositories and a stub GitHub API

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

use actions_wait::monitor::{MonitorConfig, Target};

pub const SHA: &str = "4f9c2d1e8b7a6f5e4d3c2b1a0f9e8d7c6b5a4f3e";

/// `"a\nb\nc\n"` gzip-compressed, as served with `Content-Encoding: gzip`.
pub const GZIP_LOG: &[u8] = &[
    0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x03, 0x4b, 0xe4, 0x4a, 0xe2, 0x4a, 0xe6,
    0x02, 0x00, 0xd9, 0x0e, 0x67, 0x0a, 0x06, 0x00, 0x00, 0x00,
];

/// Test helper: Create a temporary git repository with initial commit
pub fn init_test_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let repo_root = temp_dir.path();

    git(&["init"], repo_root);
    git(&["config", "user.email", "test@test.com"], repo_root);
    git(&["config", "user.name", "Test User"], repo_root);

    fs::write(repo_root.join("README.md"), "# Test Repository\n")
        .expect("Failed to write README.md");

    git(&["add", "."], repo_root);
    git(&["commit", "-m", "Initial commit"], repo_root);
    git(&["branch", "-M", "main"], repo_root);

    temp_dir
}

/// Test helper: Run a git command, panicking if it fails
pub fn git(args: &[&str], repo_root: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_root)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run git {args:?}: {e}"));
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

pub fn target() -> Target {
    Target {
        host: "github.com".to_string(),
        owner: "octo".to_string(),
        repo: "hello".to_string(),
        branch: "main".to_string(),
        sha: SHA.to_string(),
    }
}

/// Millisecond waits so whole sessions finish quickly.
pub fn fast_config(failed_output_lines: usize) -> MonitorConfig {
    MonitorConfig {
        poll_interval: std::time::Duration::from_millis(5),
        retry_backoff: std::time::Duration::from_millis(5),
        no_runs_backoff: std::time::Duration::from_millis(5),
        failed_output_lines,
        color: false,
    }
}

/// A canned HTTP response.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl StubResponse {
    pub fn json(body: &str) -> Self {
        Self::with_status(200, body).header("Content-Type", "application/json")
    }

    pub fn with_status(status: u16, body: &str) -> Self {
        Self::raw(status, body.as_bytes())
    }

    pub fn raw(status: u16, body: &[u8]) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.to_vec(),
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self::with_status(302, "").header("Location", location)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// A request as seen by the stub server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Path and query string.
    pub target: String,
    /// Lower-cased header names.
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Minimal HTTP/1.1 server answering by path prefix, one request per
/// connection. Unrouted paths get GitHub's 404 body.
pub struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn start(routes: Vec<(&'static str, StubResponse)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("Failed to read stub address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                serve(stream, &routes, &recorded);
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

fn serve(
    mut stream: TcpStream,
    routes: &[(&'static str, StubResponse)],
    recorded: &Mutex<Vec<RecordedRequest>>,
) {
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let target = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    recorded.lock().expect("requests lock").push(RecordedRequest {
        target: target.clone(),
        headers,
    });

    let response = routes
        .iter()
        .find(|(prefix, _)| target.starts_with(prefix))
        .map(|(_, response)| response.clone())
        .unwrap_or_else(|| StubResponse::with_status(404, r#"{"message":"Not Found"}"#));

    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        reason(response.status),
        response.body.len()
    );
    for (name, value) in &response.headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str("\r\n");

    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&response.body);
    let _ = stream.flush();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// `GET .../actions/runs` body with one run.
pub fn runs_body(id: u64, name: &str, status: &str, conclusion: Option<&str>) -> String {
    let conclusion = conclusion.map_or("null".to_string(), |c| format!("\"{c}\""));
    format!(
        r#"{{
  "total_count": 1,
  "workflow_runs": [
    {{
      "id": {id},
      "name": "{name}",
      "head_branch": "main",
      "head_sha": "{SHA}",
      "run_number": 42,
      "event": "push",
      "status": "{status}",
      "conclusion": {conclusion},
      "html_url": "https://github.com/octo/hello/actions/runs/{id}",
      "created_at": "2024-05-01T10:00:00Z",
      "updated_at": "2024-05-01T10:03:20Z",
      "run_started_at": "2024-05-01T10:00:00Z",
      "pull_requests": [
        {{ "number": 17, "url": "https://api.github.com/repos/octo/hello/pulls/17" }}
      ]
    }}
  ]
}}"#
    )
}

/// `GET .../jobs` body: a 12s failed `build` followed by a 5s `lint`.
pub fn jobs_body(run_id: u64, build_conclusion: &str) -> String {
    format!(
        r#"{{
  "total_count": 2,
  "jobs": [
    {{
      "id": 201,
      "run_id": {run_id},
      "name": "build",
      "status": "completed",
      "conclusion": "{build_conclusion}",
      "started_at": "2024-05-01T10:00:05Z",
      "completed_at": "2024-05-01T10:00:17Z",
      "steps": [
        {{ "name": "Set up job", "status": "completed", "conclusion": "success", "number": 1 }}
      ]
    }},
    {{
      "id": 202,
      "run_id": {run_id},
      "name": "lint",
      "status": "completed",
      "conclusion": "success",
      "started_at": "2024-05-01T10:00:05Z",
      "completed_at": "2024-05-01T10:00:10Z"
    }}
  ]
}}"#
    )
}
