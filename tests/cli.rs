//! Binary surface smoke tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Config with the simulated backend and no artificial delays
fn write_test_config(dir: &TempDir) -> String {
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[assistant]
backend = "simulated"
max_context_items = 20
max_recent_actions = 10

[simulated]
chat_ms = 0
suggest_ms = 0
explain_ms = 0
refactor_ms = 0

[ollama]
endpoint = "http://localhost:11434"
model = "codellama"

[workspace]
max_tree_depth = 4
max_buffer_chars = 5000
"#,
    )
    .unwrap();
    path.display().to_string()
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("devspark")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("suggest"))
        .stdout(predicate::str::contains("explain"))
        .stdout(predicate::str::contains("refactor"));
}

#[test]
fn one_shot_chat_greets_with_current_file() {
    let dir = TempDir::new().unwrap();
    let config = write_test_config(&dir);
    let file = dir.path().join("app.js");
    fs::write(&file, "console.log('hi');").unwrap();

    Command::cargo_bin("devspark")
        .unwrap()
        .args(["--config", config.as_str(), "--workspace"])
        .arg(dir.path())
        .args(["chat", "hello", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("app.js"));
}

#[test]
fn explain_prints_canned_explanation() {
    let dir = TempDir::new().unwrap();
    let config = write_test_config(&dir);
    let file = dir.path().join("main.js");
    fs::write(&file, "function add(a, b) { return a + b; }").unwrap();

    Command::cargo_bin("devspark")
        .unwrap()
        .args(["--config", config.as_str(), "--workspace"])
        .arg(dir.path())
        .arg("explain")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("This code appears to"));
}

#[test]
fn explain_missing_file_reports_error() {
    let dir = TempDir::new().unwrap();
    let config = write_test_config(&dir);

    Command::cargo_bin("devspark")
        .unwrap()
        .args(["--config", config.as_str(), "explain", "/nonexistent/file.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File not found"));
}

#[test]
fn config_show_prints_toml() {
    let dir = TempDir::new().unwrap();
    let config = write_test_config(&dir);

    Command::cargo_bin("devspark")
        .unwrap()
        .args(["--config", config.as_str(), "config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backend = \"simulated\""));
}
