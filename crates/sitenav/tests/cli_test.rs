//! Integration tests for the `sitenav` CLI binary.
//!
//! Argument parsing, help output, completions and error handling run
//! without a server; the rest drive the binary against a wiremock backend.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const NO_HOME: &str = "/tmp/sitenav-cli-test-nonexistent";

/// Build a [`Command`] for the `sitenav` binary with env isolation.
///
/// Clears all `SITENAV_*` env vars and points config and data directories
/// at `home` so tests never touch the user's real configuration or likes.
fn sitenav_cmd_in(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("sitenav");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("SITENAV_PROFILE")
        .env_remove("SITENAV_SERVER")
        .env_remove("SITENAV_TOKEN")
        .env_remove("SITENAV_OUTPUT")
        .env_remove("SITENAV_INSECURE")
        .env_remove("SITENAV_TIMEOUT");
    cmd
}

fn sitenav_cmd() -> assert_cmd::Command {
    sitenav_cmd_in(Path::new(NO_HOME))
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn site_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Site {id}"),
        "url": format!("https://site{id}.example"),
        "description": "A site",
        "category_id": 1,
        "thumbnail": null,
        "status": status,
        "visits": 0,
        "likes": 4
    })
}

async fn mount_categories(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [{ "id": 1, "name": "Tools" }] })),
        )
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = sitenav_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    sitenav_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("website directory")
            .and(predicate::str::contains("sites"))
            .and(predicate::str::contains("categories")),
    );
}

#[test]
fn test_version_flag() {
    sitenav_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sitenav"));
}

#[test]
fn test_sites_help_lists_moderation() {
    sitenav_cmd()
        .args(["sites", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("approve")
                .and(predicate::str::contains("reject"))
                .and(predicate::str::contains("like")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    sitenav_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    sitenav_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = sitenav_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_sites_list_without_server() {
    sitenav_cmd()
        .args(["sites", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No directory server configured"));
}

#[test]
fn test_unknown_profile() {
    sitenav_cmd()
        .args(["--profile", "work", "sites", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'work' not found"));
}

#[test]
fn test_invalid_output_format() {
    let output = sitenav_cmd()
        .args(["--output", "invalid", "sites", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about invalid output format:\n{text}"
    );
}

#[test]
fn test_non_web_server_is_rejected() {
    sitenav_cmd()
        .args(["--server", "ftp://dir.example.com", "sites", "list"])
        .assert()
        .code(2);
}

#[test]
fn test_approve_requires_admin() {
    sitenav_cmd()
        .args(["--server", "http://127.0.0.1:9", "sites", "approve", "3", "--yes"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("admin"));
}

#[test]
fn test_admin_without_token() {
    sitenav_cmd()
        .args(["--server", "http://127.0.0.1:9", "--admin", "sites", "list"])
        .assert()
        .code(3);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    // `config show` renders the default config when no file exists.
    sitenav_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path() {
    sitenav_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Against a backend ───────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_categories_list_json() {
    let server = MockServer::start().await;
    mount_categories(&server).await;

    sitenav_cmd()
        .args(["--server", &server.uri(), "-o", "json-compact", "categories", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"id":1,"name":"Tools"}"#));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_users_only_list_approved() {
    let server = MockServer::start().await;
    mount_categories(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/websites"))
        .and(query_param("status", "approved"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [site_json(7, "approved"), site_json(8, "approved")] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    sitenav_cmd()
        .args(["--server", &server.uri(), "-o", "plain", "sites", "list", "--status", "pending"])
        .assert()
        .success()
        .stdout(predicate::str::diff("7\n8\n"))
        .stderr(predicate::str::contains("Only approved websites"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_like_is_sent_once_per_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/websites/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(site_json(7, "approved")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/websites/7/like"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();

    sitenav_cmd_in(home.path())
        .args(["--server", &server.uri(), "sites", "like", "7"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Liked (5 likes)"));

    sitenav_cmd_in(home.path())
        .args(["--server", &server.uri(), "sites", "like", "7"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Already liked"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_submit_without_category_makes_no_request() {
    let server = MockServer::start().await;
    mount_categories(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "allowSubmissions": true })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/websites"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    sitenav_cmd()
        .args([
            "--server",
            &server.uri(),
            "sites",
            "submit",
            "--url",
            "https://new.example",
            "--title",
            "New",
            "--description",
            "A new site",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Please select a category"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_submit_error_body_is_shown_verbatim() {
    let server = MockServer::start().await;
    mount_categories(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "allowSubmissions": true })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/websites"))
        .respond_with(ResponseTemplate::new(400).set_body_string("URL already exists"))
        .expect(1)
        .mount(&server)
        .await;

    sitenav_cmd()
        .args([
            "--server",
            &server.uri(),
            "sites",
            "submit",
            "--url",
            "https://new.example",
            "--title",
            "New",
            "--description",
            "A new site",
            "--category",
            "tools",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("URL already exists"));
}
