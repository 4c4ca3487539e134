//! Integration tests for the `vmswitch` CLI binary.
//!
//! Argument parsing, help output, completions, and config handling run
//! without a daemon; daemon-bound commands run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::process::Output;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `vmswitch` binary with env isolation.
///
/// Clears all `VMSWITCH_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn vmswitch_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("vmswitch");
    cmd.env("HOME", "/tmp/vmswitch-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/vmswitch-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("VMSWITCH_PROFILE")
        .env_remove("VMSWITCH_API_URL")
        .env_remove("VMSWITCH_OUTPUT")
        .env_remove("VMSWITCH_TIMEOUT")
        .env_remove("VMSWITCH_DEFAULT_PROFILE");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary against `server` off the async runtime.
async fn run_against(server: &MockServer, args: &[&str]) -> Output {
    let mut cmd = vmswitch_cmd();
    cmd.args(["--api-url", &server.uri()]).args(args);
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn domain_list() -> serde_json::Value {
    json!([
        {
            "id": -1,
            "uuid": "6f1c6e0a-8a52-4b1e-9d43-1c1f0c1c0a01",
            "autostart": false,
            "state": "SHUTOFF",
            "name": "fedora",
            "title": "Fedora Workstation"
        },
        {
            "id": 4,
            "uuid": "6f1c6e0a-8a52-4b1e-9d43-1c1f0c1c0a02",
            "autostart": true,
            "state": "RUNNING",
            "name": "win10",
            "title": "Windows 10"
        }
    ])
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = vmswitch_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    vmswitch_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("domains")
            .and(predicate::str::contains("switch"))
            .and(predicate::str::contains("poweroff"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    vmswitch_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vmswitch"));
}

#[test]
fn test_invalid_subcommand() {
    let output = vmswitch_cmd().arg("foobar").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("foobar"), "Expected error naming the subcommand:\n{text}");
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    vmswitch_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    vmswitch_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    vmswitch_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_defaults_as_json() {
    let output = vmswitch_cmd()
        .args(["config", "show", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let cfg: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(cfg["default_profile"], "default");
    assert_eq!(cfg["defaults"]["poll_interval_ms"], 1500);
    assert_eq!(cfg["defaults"]["retry_delay_ms"], 3000);
}

#[test]
fn test_config_from_tempdir() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("vmswitch");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "default_profile = \"desk\"\n\n[profiles.desk]\napi_url = \"http://10.0.0.2:8000\"\n",
    )
    .unwrap();

    vmswitch_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[profiles.desk]"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_unknown_profile_is_usage_error() {
    let output = vmswitch_cmd()
        .args(["--profile", "nope", "domains", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("nope"));
}

#[test]
fn test_invalid_api_url_is_usage_error() {
    let output = vmswitch_cmd()
        .args(["--api-url", "ftp://192.168.122.1", "domains", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unreachable_daemon_exit_code() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{port}");

    let output = vmswitch_cmd()
        .args(["--api-url", &url, "domains", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}

#[test]
fn test_poweroff_requires_yes_when_non_interactive() {
    let output = vmswitch_cmd()
        .args(["--api-url", "http://127.0.0.1:9", "poweroff"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

// ── Against a mocked daemon ─────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_domains_list_plain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/domain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(domain_list()))
        .mount(&server)
        .await;

    let output = run_against(&server, &["domains", "list", "-o", "plain"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "fedora\nwin10\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_domains_list_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/domain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(domain_list()))
        .mount(&server)
        .await;

    let output = run_against(&server, &["domains", "list"]).await;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Windows 10"));
    assert!(stdout.contains("RUNNING"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_domains_get_missing_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/domain/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not Found" })))
        .mount(&server)
        .await;

    let output = run_against(&server, &["domains", "get", "ghost"]).await;
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("ghost"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_switch_reports_title() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/domain/win10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(domain_list()[1].clone()))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/domain/win10"))
        .and(body_json(json!({ "state": "RUNNING" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "OK" })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["switch", "win10"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Switching to Windows 10"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_switch_rejected_by_daemon() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/domain/win10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(domain_list()[1].clone()))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/domain/win10"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "detail": "Domain already active" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["switch", "win10"]).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Domain already active"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_poweroff_with_yes() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/host"))
        .and(body_json(json!({ "state": "SHUTOFF" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "OK" })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["poweroff", "--yes"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Shutting off host"));
}
