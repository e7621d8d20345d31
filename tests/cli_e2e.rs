//! End-to-end CLI tests for the amuleweb binary.

mod support;

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use support::fixtures::{FOOTER_233, PREFS_PAGE, STATS_PAGE, download_page, download_row};

fn amuleweb() -> Command {
    let mut cmd = Command::cargo_bin("amuleweb").unwrap();
    cmd.env_remove("RUST_LOG").env("XDG_CONFIG_HOME", "/nonexistent-amuleweb-test");
    cmd
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    amuleweb()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Inspect aMule web interface pages"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    amuleweb()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("amuleweb"));
}

/// Test that an unknown document kind causes non-zero exit.
#[test]
fn test_binary_unknown_document_returns_error() {
    amuleweb()
        .arg("friends")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_stats_from_stdin() {
    amuleweb()
        .args(["stats", "-q"])
        .write_stdin(STATS_PAGE)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""primary":"Connected""#))
        .stdout(predicate::str::contains(r#""secondary":"Firewalled""#));
}

#[test]
fn test_binary_downloads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let page = download_page(&download_row("42", "debian.iso", "1 MB (25%)", "3.5 kb/s"), "");
    file.write_all(page.as_bytes()).unwrap();

    amuleweb()
        .args(["downloads", "--daemon-version", "2.3.3", "-q"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id":"42""#))
        .stdout(predicate::str::contains(r#""name":"debian.iso""#))
        .stdout(predicate::str::contains(r#""progress":25.0"#));
}

#[test]
fn test_binary_version_report() {
    amuleweb()
        .args(["version", "-q"])
        .write_stdin(FOOTER_233)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""version":"2.3.3""#));
}

#[test]
fn test_binary_prefs_output() {
    amuleweb()
        .args(["prefs", "-q"])
        .write_stdin(PREFS_PAGE)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""tcp_port":"4662""#));
}

#[test]
fn test_binary_link_reports_errors_per_line() {
    amuleweb()
        .args(["link", "-q"])
        .write_stdin(
            "ed2k://|file|Ubuntu-20.04.iso|2877227008|5E0A6F1D2C3B4A5D6E7F8A9B0C1D2E3F|/\n\
             ed2k://|file|bad.iso|0|5E0A6F1D2C3B4A5D6E7F8A9B0C1D2E3F|/\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""formattedSize":"2.68 GB""#))
        .stdout(predicate::str::contains(r#""kind":"invalid_size""#));
}

#[test]
fn test_binary_missing_file_fails() {
    amuleweb()
        .args(["log", "/nonexistent/page.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

/// Test that logs stay off stdout so the JSON remains parseable.
#[test]
fn test_binary_verbose_logs_go_to_stderr() {
    let output = amuleweb()
        .args(["stats", "-v"])
        .write_stdin(STATS_PAGE)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(value["primary"], "Connected");
}
