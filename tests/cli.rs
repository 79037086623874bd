use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const INITIALIZE: &str = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"cli-test","version":"0.0.0"}}}"#;

fn handson() -> Command {
    Command::cargo_bin("mcp-handson").unwrap()
}

#[test]
fn help_lists_subcommands() {
    handson()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("rest-demo"));
}

#[test]
fn rejects_unknown_server() {
    handson()
        .args(["serve", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn hello_server_over_stdio() {
    let input = format!(
        "{}\n{}\n{}\n",
        INITIALIZE,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        r#"{"jsonrpc":"2.0","id":2,"method":"resources/read","params":{"uri":"hello://greeting"}}"#
    );

    handson()
        .args(["--log-level", "error", "serve", "hello"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name":"hello-mcp-server""#))
        .stdout(predicate::str::contains("Hello, MCP World!"));
}

#[test]
fn task_server_persists_to_data_file() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("tasks.json");
    let input = format!(
        "{}\n{}\n",
        INITIALIZE,
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"create_task","arguments":{"title":"From the CLI"}}}"#
    );

    handson()
        .arg("--log-level")
        .arg("error")
        .arg("--data-file")
        .arg(&data_file)
        .args(["serve", "tasks"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task"));

    let saved = std::fs::read_to_string(&data_file).unwrap();
    assert!(saved.contains("From the CLI"));
}

#[test]
fn basic_demo_drives_multi_tool_server() {
    let dir = TempDir::new().unwrap();

    handson()
        .arg("--log-level")
        .arg("error")
        .arg("--data-file")
        .arg(dir.path().join("tasks.json"))
        .args(["demo", "basic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("🧮 10 + 20 = 30"))
        .stdout(predicate::str::contains("Tokyo: 22°C, Sunny"));
}
