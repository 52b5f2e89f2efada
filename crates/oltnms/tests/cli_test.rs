//! Integration tests for the `oltnms` binary.
//!
//! Argument parsing, help, completions and exit codes run without a
//! backend. The session tests stand up a wiremock server and run the
//! binary against it, with HOME pointed at a throwaway directory so the
//! session file written by `auth login` is picked up by the next command.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `oltnms` binary with env isolation.
///
/// Clears all `OLTNMS_*` env vars and points config and data directories
/// at `home` so tests never touch the user's real configuration.
fn oltnms_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("oltnms");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("OLTNMS_PROFILE")
        .env_remove("OLTNMS_BASE_URL")
        .env_remove("OLTNMS_OUTPUT")
        .env_remove("OLTNMS_INSECURE")
        .env_remove("OLTNMS_TIMEOUT")
        .env_remove("OLTNMS_PASSWORD")
        .env_remove("OLTNMS_OLT_PASSWORD");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn user_json() -> serde_json::Value {
    json!({ "id": 1, "name": "NOC Admin", "email": "noc@isp.net", "role": "admin" })
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-abc",
            "token_type": "bearer",
            "user": user_json()
        })))
        .mount(server)
        .await;
}

fn login(home: &Path, server: &MockServer) {
    oltnms_cmd(home)
        .env("OLTNMS_PASSWORD", "secret")
        .args(["--base-url", &server.uri(), "auth", "login", "--email", "noc@isp.net"])
        .assert()
        .success();
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = oltnms_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    oltnms_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("OLT")
            .and(predicate::str::contains("olts"))
            .and(predicate::str::contains("onus"))
            .and(predicate::str::contains("alarms")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    oltnms_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("oltnms"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    oltnms_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    oltnms_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    let output = oltnms_cmd(home.path()).arg("foobar").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_status_filter() {
    let home = tempfile::tempdir().unwrap();
    let output = oltnms_cmd(home.path())
        .args(["olts", "list", "--status", "sleeping"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_protected_command_requires_login() {
    let home = tempfile::tempdir().unwrap();
    oltnms_cmd(home.path())
        .args(["olts", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Not logged in").and(predicate::str::contains("auth login")));
}

#[test]
fn test_unknown_named_profile() {
    let home = tempfile::tempdir().unwrap();
    oltnms_cmd(home.path())
        .args(["--profile", "prod", "olts", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("prod"));
}

#[test]
fn test_logout_when_logged_out_is_ok() {
    let home = tempfile::tempdir().unwrap();
    oltnms_cmd(home.path()).args(["auth", "logout"]).assert().success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_without_terminal_needs_yes() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_login(&server).await;
    login(home.path(), &server);

    oltnms_cmd(home.path())
        .args(["--base-url", &server.uri(), "olts", "delete", "4"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    let home = tempfile::tempdir().unwrap();
    oltnms_cmd(home.path()).args(["config", "show"]).assert().success();
}

#[test]
fn test_config_set_then_profiles() {
    let home = tempfile::tempdir().unwrap();
    oltnms_cmd(home.path())
        .args(["config", "set", "base_url", "http://nms.lab:8000"])
        .assert()
        .success();
    oltnms_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *"));
    oltnms_cmd(home.path())
        .args(["-o", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://nms.lab:8000"));
}

#[test]
fn test_config_set_rejects_bad_url() {
    let home = tempfile::tempdir().unwrap();
    oltnms_cmd(home.path())
        .args(["config", "set", "base_url", "ftp://nms.lab"])
        .assert()
        .code(2);
}

// ── Session against a mock backend ──────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_then_list_olts() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/olts"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "OLT-Jakarta", "ip_address": "10.0.0.1", "status": "online" },
            { "id": 2, "name": "OLT-Bandung", "ip_address": "10.0.1.1", "status": "offline" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    login(home.path(), &server);

    let output = oltnms_cmd(home.path())
        .args(["--base-url", &server.uri(), "-o", "json", "olts", "list", "-s", "jakarta"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let olts: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = olts
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["OLT-Jakarta"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_token_ends_session() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/alarms"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "Token expired" })))
        .mount(&server)
        .await;

    login(home.path(), &server);

    oltnms_cmd(home.path())
        .args(["--base-url", &server.uri(), "alarms", "list"])
        .assert()
        .code(3);

    // The stored session was dropped, so the guard now stops the command
    // before any request is made.
    oltnms_cmd(home.path())
        .args(["--base-url", &server.uri(), "alarms", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Not logged in"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_olt_maps_to_not_found() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/olts/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "OLT not found" })))
        .mount(&server)
        .await;

    login(home.path(), &server);

    oltnms_cmd(home.path())
        .args(["--base-url", &server.uri(), "olts", "get", "99"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("olts list"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_whoami_reports_user() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&server)
        .await;

    login(home.path(), &server);

    oltnms_cmd(home.path())
        .args(["--base-url", &server.uri(), "auth", "whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NOC Admin").and(predicate::str::contains("admin")));
}
