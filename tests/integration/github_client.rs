//! GithubClient against a local stub of the REST API

use std::io::Write;
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

use actions_wait::github::{ClientError, GithubClient};
use actions_wait::models::{Conclusion, RunStatus};
use actions_wait::monitor::{classify, Cancellation, CiProvider, Disposition};

use super::helpers::{jobs_body, runs_body, StubResponse, StubServer, GZIP_LOG, SHA};

fn client(server: &StubServer) -> GithubClient {
    GithubClient::new("test-token", "github.com", "octo", "hello")
        .expect("Failed to build client")
        .with_api_base(server.base_url())
}

#[test]
fn test_list_runs_sends_query_and_credentials() {
    let server = StubServer::start(vec![(
        "/repos/octo/hello/actions/runs?",
        StubResponse::json(&runs_body(101, "CI", "in_progress", None)),
    )]);

    let runs = client(&server)
        .list_runs_for_commit(SHA)
        .expect("listing runs should succeed");

    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].id, 101);
    assert_eq!(runs[0].status, RunStatus::InProgress);
    assert_eq!(runs[0].conclusion, None);
    assert_eq!(runs[0].pull_requests[0].number, 17);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].target,
        format!("/repos/octo/hello/actions/runs?head_sha={SHA}&per_page=20")
    );
    assert_eq!(requests[0].header("authorization"), Some("Bearer test-token"));
    assert!(requests[0]
        .header("user-agent")
        .is_some_and(|ua| ua.starts_with("actions-wait/")));
    assert_eq!(
        requests[0].header("accept"),
        Some("application/vnd.github+json")
    );
}

#[test]
fn test_list_jobs_decodes_steps() {
    let server = StubServer::start(vec![(
        "/repos/octo/hello/actions/runs/101/jobs",
        StubResponse::json(&jobs_body(101, "failure")),
    )]);

    let jobs = client(&server).list_jobs(101).expect("listing jobs should succeed");

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].name, "build");
    assert_eq!(jobs[0].conclusion, Some(Conclusion::Failure));
    assert_eq!(jobs[0].duration(), Duration::from_secs(12));
    assert_eq!(jobs[0].steps.len(), 1);
    assert!(jobs[1].steps.is_empty());
    assert_eq!(
        server.requests()[0].target,
        "/repos/octo/hello/actions/runs/101/jobs?per_page=100"
    );
}

#[test]
fn test_fetch_job_log_follows_redirect() {
    let server = StubServer::start(vec![
        (
            "/repos/octo/hello/actions/jobs/201/logs",
            StubResponse::redirect("/download/201.txt"),
        ),
        (
            "/download/201.txt",
            StubResponse::with_status(200, "line one\nline two\n"),
        ),
    ]);

    let log = client(&server)
        .fetch_job_log(201)
        .expect("fetching the log should succeed");

    assert_eq!(log, b"line one\nline two\n");
    let targets: Vec<String> = server.requests().into_iter().map(|r| r.target).collect();
    assert_eq!(
        targets,
        vec!["/repos/octo/hello/actions/jobs/201/logs", "/download/201.txt"]
    );
}

#[test]
fn test_fetch_job_log_decodes_gzip() {
    let server = StubServer::start(vec![
        (
            "/repos/octo/hello/actions/jobs/201/logs",
            StubResponse::redirect("/download/201.txt.gz"),
        ),
        (
            "/download/201.txt.gz",
            StubResponse::raw(200, GZIP_LOG).header("Content-Encoding", "gzip"),
        ),
    ]);

    let log = client(&server)
        .fetch_job_log(201)
        .expect("fetching the log should succeed");

    assert_eq!(log, b"a\nb\nc\n");
}

#[test]
fn test_api_error_carries_status_and_message() {
    let server = StubServer::start(vec![(
        "/repos/octo/hello/actions/runs?",
        StubResponse::with_status(401, r#"{"message":"Bad credentials"}"#),
    )]);

    let err = client(&server)
        .list_runs_for_commit(SHA)
        .expect_err("401 should be an error");

    assert!(matches!(err, ClientError::Api { status: 401, .. }));
    assert_eq!(err.to_string(), "GitHub API error 401: Bad credentials");
    assert_eq!(classify(&err), Disposition::Fatal);
}

#[test]
fn test_undecodable_error_body() {
    let server = StubServer::start(vec![(
        "/repos/octo/hello/actions/runs?",
        StubResponse::with_status(500, "<html>upstream exploded</html>"),
    )]);

    let err = client(&server)
        .list_runs_for_commit(SHA)
        .expect_err("500 should be an error");

    assert!(matches!(err, ClientError::UndecodableError { status: 500, .. }));
    assert!(err.to_string().contains("500"));
    assert_eq!(classify(&err), Disposition::Fatal);
}

#[test]
fn test_connection_refused_is_retryable() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        listener.local_addr().expect("Failed to read address")
    };
    let client = GithubClient::new("test-token", "github.com", "octo", "hello")
        .expect("Failed to build client")
        .with_api_base(format!("http://{addr}"));

    let err = client
        .list_runs_for_commit(SHA)
        .expect_err("nothing is listening");

    assert!(matches!(err, ClientError::Url { .. }));
    let message = err.to_string();
    assert!(message.starts_with("GET http://127.0.0.1:"));
    assert_eq!(message.matches(&addr.to_string()).count(), 1);
    assert_eq!(classify(&err), Disposition::Retry);
}

#[test]
fn test_request_timeout_follows_session_deadline() {
    // Accepted by the kernel but never answered.
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");

    let cancel = Cancellation::with_timeout(Duration::from_millis(300));
    let client = GithubClient::new("test-token", "github.com", "octo", "hello")
        .expect("Failed to build client")
        .with_api_base(format!("http://{addr}"))
        .with_cancellation(cancel);

    let started = Instant::now();
    let err = client
        .list_runs_for_commit(SHA)
        .expect_err("request should time out");

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(classify(&err), Disposition::Retry);
    drop(listener);
}

#[test]
fn test_tls_handshake_failure_is_fatal() {
    // Plain HTTP where the client expects TLS.
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    thread::spawn(move || {
        // Streams stay open so the client reads the reply instead of a reset.
        let mut open = Vec::new();
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let _ = stream.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
            let _ = stream.flush();
            open.push(stream);
        }
    });
    let client = GithubClient::new("test-token", "github.com", "octo", "hello")
        .expect("Failed to build client")
        .with_api_base(format!("https://{addr}"))
        .with_cancellation(Cancellation::with_timeout(Duration::from_secs(10)));

    let err = client
        .list_runs_for_commit(SHA)
        .expect_err("TLS handshake should fail");

    assert_eq!(classify(&err), Disposition::Fatal);
}

