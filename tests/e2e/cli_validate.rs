//! CLI validation tests: signatures from files, arguments from flags or stdin.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map_or_else(|| manifest_dir.to_path_buf(), Path::to_path_buf)
}

fn base_command(args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_rguard"));
    command
        .args(args)
        .arg("--no-progress")
        .current_dir(workspace_root());
    for (key, _) in std::env::vars() {
        if key.starts_with("REQUEST_GUARD_") || key == "RUST_LOG" {
            command.env_remove(key);
        }
    }
    command
}

fn run_cli(args: &[&str]) -> io::Result<Output> {
    base_command(args).output()
}

fn run_cli_with_stdin(args: &[&str], stdin: &str) -> io::Result<Output> {
    let mut child = base_command(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("stdin not captured"))?
        .write_all(stdin.as_bytes())?;
    child.wait_with_output()
}

fn stdout_json(output: &Output) -> io::Result<serde_json::Value> {
    serde_json::from_slice(&output.stdout).map_err(io::Error::other)
}

const CREATE_USER: &str = "crates/testkit/fixtures/signature/create-user.toml";

#[test]
fn invalid_arguments_exit_two_with_every_failure() -> io::Result<()> {
    let output = run_cli(&[
        "--output",
        "json",
        "validate",
        "--signature",
        CREATE_USER,
        "--args-json",
        r#"{"email":"not-an-email"}"#,
    ])?;
    assert_eq!(output.status.code(), Some(2));

    let value = stdout_json(&output)?;
    assert_eq!(value.get("status"), Some(&serde_json::json!("rejected")));
    assert_eq!(
        value.get("errors"),
        Some(&serde_json::json!({
            "email": ["email must be a valid format"],
            "id": ["id is required"]
        }))
    );
    let fields: Vec<&str> = value
        .get("errors")
        .and_then(serde_json::Value::as_object)
        .map(|errors| errors.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(fields, vec!["id", "email"], "errors follow declared order");
    Ok(())
}

#[test]
fn valid_arguments_are_echoed() -> io::Result<()> {
    let output = run_cli(&[
        "--output",
        "json",
        "validate",
        "--signature",
        CREATE_USER,
        "--args-json",
        r#"{"id":"42","email":"a@b.com"}"#,
    ])?;
    assert!(output.status.success());

    let value = stdout_json(&output)?;
    assert_eq!(value.get("operation"), Some(&serde_json::json!("create_user")));
    assert_eq!(
        value.get("arguments"),
        Some(&serde_json::json!({"id": "42", "email": "a@b.com"}))
    );
    Ok(())
}

#[test]
fn arguments_can_come_from_stdin() -> io::Result<()> {
    let output = run_cli_with_stdin(
        &[
            "validate",
            "--signature",
            "crates/testkit/fixtures/signature/search.json",
            "--stdin",
        ],
        r#"{"query": "   ", "topK": 99, "language": "en", "token": "t"}"#,
    )?;
    assert_eq!(output.status.code(), Some(2));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("status: rejected\noperation: search\n"));
    assert!(stdout.contains("message: Request to search failed validation on 2 field(s)\n"));
    assert!(stdout.contains("  query:\n"));
    assert!(stdout.contains("  topK:\n"));
    assert!(!stdout.contains("language"));
    Ok(())
}

#[test]
fn broken_signature_file_is_reported() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{"operation":"broken","parameters":[{"name":"code","rules":[{"rule":"pattern","pattern":"("}]}]}"#,
    )?;
    let signature = path.to_string_lossy().to_string();

    let output = run_cli(&[
        "--output",
        "json",
        "validate",
        "--signature",
        &signature,
        "--args-json",
        "{}",
    ])?;
    assert_eq!(output.status.code(), Some(2));
    let value = stdout_json(&output)?;
    let code = value
        .get("error")
        .and_then(|error| error.get("code"))
        .and_then(serde_json::Value::as_str);
    assert_eq!(code, Some("ERR_SIGNATURE_INVALID_RULE"));
    Ok(())
}

#[test]
fn secret_arguments_are_not_echoed() -> io::Result<()> {
    let output = run_cli(&[
        "validate",
        "--signature",
        CREATE_USER,
        "--args-json",
        r#"{"id":"1","email":"a@b.com","password":"hunter2"}"#,
    ])?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("hunter2"));
    assert!(stdout.contains("[REDACTED]"));
    Ok(())
}
