//! End-to-end tests of the `fapiao` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// `fapiao` with config and log file kept inside the workspace.
    fn fapiao(&self) -> Command {
        let mut cmd = Command::cargo_bin("fapiao").unwrap();
        cmd.arg("--config")
            .arg(self.path("config.json"))
            .arg("--log-file")
            .arg(self.path("fapiao.log"));
        cmd
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("fapiao")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("issue"));
}

#[test]
fn test_merge_empty_directory() {
    let ws = Workspace::new();
    let input = ws.path("in");
    let output = ws.path("out");

    ws.fapiao()
        .args(["merge", "--summary", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("No PDF files found"));

    assert!(input.is_dir());
    assert!(output.is_dir());
    assert!(read(&output.join("summary.csv")).starts_with("filename,invoice_code,date,year"));
    assert!(read(&ws.path("fapiao.log")).contains("Found 0 PDF files"));
}

#[test]
fn test_merge_skips_unreadable_pdf() {
    let ws = Workspace::new();
    let input = ws.path("in");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("broken.pdf"), b"not a pdf").unwrap();

    ws.fapiao()
        .args(["merge", "--summary", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(ws.path("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped files"));

    assert!(read(&ws.path("out").join("summary.csv")).contains("broken.pdf,,,,,,,skipped"));
}

#[test]
fn test_process_missing_file_fails() {
    let ws = Workspace::new();
    ws.fapiao()
        .args(["process"])
        .arg(ws.path("missing.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_malformed_config_is_rejected() {
    let ws = Workspace::new();
    fs::write(ws.path("config.json"), "{ nope").unwrap();

    ws.fapiao()
        .args(["merge", "--input"])
        .arg(ws.path("in"))
        .arg("--output")
        .arg(ws.path("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn test_config_init_get_set() {
    let ws = Workspace::new();
    let config = ws.path("nested/config.json");

    let fapiao = || {
        let mut cmd = Command::cargo_bin("fapiao").unwrap();
        cmd.arg("--config")
            .arg(&config)
            .arg("--log-file")
            .arg(ws.path("fapiao.log"));
        cmd
    };

    fapiao().args(["config", "init"]).assert().success();
    assert!(config.exists());

    fapiao()
        .args(["config", "get", "extraction.window_size"])
        .assert()
        .success()
        .stdout(predicate::str::contains("50"));

    fapiao()
        .args(["config", "set", "merge.unknown_date_name", "undated"])
        .assert()
        .success();
    assert!(read(&config).contains("\"undated\""));

    fapiao()
        .args(["config", "set", "merge.no_such_key", "1"])
        .assert()
        .failure();

    fapiao().args(["config", "init"]).assert().failure();
}

#[test]
fn test_issue_requires_credentials() {
    let ws = Workspace::new();
    ws.fapiao()
        .env_remove("JIRA_BASE_URL")
        .env_remove("JIRA_USER")
        .env_remove("JIRA_API_TOKEN")
        .current_dir(ws.dir.path())
        .args(["issue", "get", "FIN-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("JIRA_BASE_URL"));
}

#[test]
fn test_issue_reads_credentials_from_dotenv() {
    let ws = Workspace::new();
    // Nothing listens on port 1, so the request itself must fail
    fs::write(
        ws.path(".env"),
        "JIRA_BASE_URL=http://127.0.0.1:1\nJIRA_USER=alice\nJIRA_API_TOKEN=secret\n",
    )
    .unwrap();

    ws.fapiao()
        .env_remove("JIRA_BASE_URL")
        .env_remove("JIRA_USER")
        .env_remove("JIRA_API_TOKEN")
        .current_dir(ws.dir.path())
        .args(["issue", "get", "FIN-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP request failed"))
        .stderr(predicate::str::contains("is not set").not());
}

#[test]
fn test_config_commands_survive_broken_file() {
    let ws = Workspace::new();
    fs::write(ws.path("config.json"), "{ broken").unwrap();

    ws.fapiao()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("exists"));

    ws.fapiao()
        .args(["config", "init", "--force"])
        .assert()
        .success();

    let repaired: serde_json::Value = serde_json::from_str(&read(&ws.path("config.json"))).unwrap();
    assert_eq!(repaired["merge"]["unknown_date_name"], "unknown-date");
}
