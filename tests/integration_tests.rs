//! Integration tests for the pre-commit-mcp CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Command isolated from the caller's home config and environment
fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pre-commit-mcp").unwrap();
    cmd.env("HOME", home)
        .env_remove("RUST_LOG")
        .env_remove("PRE_COMMIT_MCP_CONFIG")
        .env_remove("PRE_COMMIT_MCP_RUNNER__TIMEOUT_SECS");
    cmd
}

fn git_repo() -> TempDir {
    let temp = TempDir::new().unwrap();
    git2::Repository::init(temp.path()).unwrap();
    fs::write(temp.path().join(".pre-commit-config.yaml"), "repos: []\n").unwrap();
    temp
}

/// Write a repository config that replaces the runner with a shell script
fn fake_runner(dir: &Path, script: &str) {
    let config = format!(
        "[runner]\nexecutable = \"sh\"\nargs = [\"-c\", '''{script}''']\ntimeout_secs = 10\n"
    );
    fs::write(dir.join("pre-commit-mcp.toml"), config).unwrap();
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let home = TempDir::new().unwrap();
    cli(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pre-commit"))
        .stdout(predicate::str::contains("serve"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    let home = TempDir::new().unwrap();
    cli(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pre-commit-mcp"));

    cli(home.path())
        .args(["version", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MCP protocol: 2024-11-05"));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    cli(home.path())
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_run_outside_repository_fails_hard() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    cli(home.path())
        .current_dir(dir.path())
        .arg("run")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("system_error"))
        .stdout(predicate::str::contains("git init"));
}

#[test]
fn test_run_reports_success() {
    let home = TempDir::new().unwrap();
    let repo = git_repo();
    fake_runner(
        repo.path(),
        "echo 'check yaml..........Passed'; echo 'ruff..........Passed'",
    );

    let output = cli(home.path())
        .current_dir(repo.path())
        .arg("run")
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "success");
    assert_eq!(report["summary"]["total_hooks"], 2);
    assert_eq!(report["summary"]["passed"], 2);
    assert_eq!(report["failures"], serde_json::json!({}));
}

#[test]
fn test_run_reports_hook_failure() {
    let home = TempDir::new().unwrap();
    let repo = git_repo();
    fake_runner(
        repo.path(),
        "printf 'check yaml....Failed\\n- hook id: check-yaml\\n- exit code: 1\\n\\nbad indent\\n'; exit 1",
    );

    let output = cli(home.path())
        .current_dir(repo.path())
        .arg("run")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "hooks_failed");
    assert_eq!(report["failures"]["check-yaml"][0]["passed"], false);
    assert_eq!(report["failures"]["check-yaml"][0]["detail"], "bad indent");
}

#[test]
fn test_run_text_format() {
    let home = TempDir::new().unwrap();
    let repo = git_repo();
    fake_runner(repo.path(), "echo 'ruff..........Passed'");

    cli(home.path())
        .current_dir(repo.path())
        .args(["run", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("success"));
}

#[test]
fn test_directory_flag() {
    let home = TempDir::new().unwrap();
    let repo = git_repo();
    fake_runner(repo.path(), "echo 'ruff..........Passed'");

    cli(home.path())
        .arg("-C")
        .arg(repo.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\""));
}

#[test]
fn test_serve_over_stdio() {
    let home = TempDir::new().unwrap();
    let repo = git_repo();
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "\n",
    );

    let output = cli(home.path())
        .current_dir(repo.path())
        .arg("serve")
        .write_stdin(input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let responses: Vec<serde_json::Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(responses[1]["result"]["tools"][0]["name"], "pre_commit_run");
}

#[test]
fn test_serve_tool_call() {
    let home = TempDir::new().unwrap();
    let repo = git_repo();
    fake_runner(repo.path(), "echo 'ruff..........Skipped'");
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"pre_commit_run","arguments":{}}}"#,
        "\n",
    );

    let output = cli(home.path())
        .current_dir(repo.path())
        .write_stdin(input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let response: serde_json::Value =
        serde_json::from_str(String::from_utf8(output.stdout).unwrap().trim()).unwrap();
    assert_eq!(response["result"]["isError"], false);
    assert_eq!(response["result"]["structuredContent"]["status"], "success");
    assert_eq!(response["result"]["structuredContent"]["summary"]["skipped"], 1);
}

#[test]
fn test_config_show() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    let output = cli(home.path())
        .current_dir(dir.path())
        .args(["config", "show"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["runner"]["executable"], "pre-commit");
    assert_eq!(config["runner"]["timeout_secs"], 60);

    cli(home.path())
        .current_dir(dir.path())
        .env("PRE_COMMIT_MCP_RUNNER__TIMEOUT_SECS", "15")
        .args(["config", "show", "--format", "toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("timeout_secs = 15"));
}

#[test]
fn test_config_validate_rejects_zero_timeout() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("custom.yaml");
    fs::write(&config_path, "runner:\n  timeout_secs: 0\n").unwrap();

    cli(home.path())
        .current_dir(dir.path())
        .args(["config", "validate", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_secs"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let home = TempDir::new().unwrap();

    cli(home.path())
        .args(["config", "show", "--config", "/nonexistent/pre-commit-mcp.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}
