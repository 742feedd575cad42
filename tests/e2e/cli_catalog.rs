//! CLI catalog and structured error tests.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map_or_else(|| manifest_dir.to_path_buf(), Path::to_path_buf)
}

fn run_cli(args: &[&str]) -> io::Result<Output> {
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
    command.output()
}

fn stdout_json(output: &Output) -> io::Result<serde_json::Value> {
    serde_json::from_slice(&output.stdout).map_err(io::Error::other)
}

#[test]
fn builtin_catalog_lists_every_entry() -> io::Result<()> {
    let output = run_cli(&["--output", "json", "catalog", "list"])?;
    assert!(output.status.success());

    let value = stdout_json(&output)?;
    let codes: Vec<&str> = value
        .get("errors")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| io::Error::other("missing errors array"))?
        .iter()
        .filter_map(|entry| entry.get("code").and_then(serde_json::Value::as_str))
        .collect();
    assert!(codes.contains(&"RESOURCE_NOT_FOUND"));
    assert!(codes.contains(&"REQUEST_VALIDATION_FAILED"));
    let mut sorted = codes.clone();
    sorted.sort_unstable();
    assert_eq!(codes, sorted, "catalog listing should be sorted by code");
    Ok(())
}

#[test]
fn unknown_code_exits_with_code_two() -> io::Result<()> {
    let show = run_cli(&["catalog", "show", "NOT_A_REAL_CODE"])?;
    assert_eq!(show.status.code(), Some(2));

    let build = run_cli(&["--output", "json", "error", "build", "NOT_A_REAL_CODE"])?;
    assert_eq!(build.status.code(), Some(2));
    let value = stdout_json(&build)?;
    let code = value
        .get("error")
        .and_then(|error| error.get("code"))
        .and_then(serde_json::Value::as_str);
    assert_eq!(code, Some("ERR_CATALOG_UNKNOWN_ERROR_CODE"));
    Ok(())
}

#[test]
fn error_build_renders_positional_arguments() -> io::Result<()> {
    let output = run_cli(&[
        "--output",
        "json",
        "error",
        "build",
        "RESOURCE_NOT_FOUND",
        "--module",
        "users",
        "--arg",
        "User",
        "--arg",
        "42",
    ])?;
    assert!(output.status.success());

    let value = stdout_json(&output)?;
    let error = value
        .get("error")
        .ok_or_else(|| io::Error::other("missing error payload"))?;
    assert_eq!(
        error.get("message"),
        Some(&serde_json::json!("User with id 42 was not found"))
    );
    assert_eq!(error.get("module"), Some(&serde_json::json!("users")));
    assert_eq!(error.get("args"), Some(&serde_json::json!(["User", 42])));
    assert_eq!(error.get("status"), Some(&serde_json::json!(404)));
    Ok(())
}

#[test]
fn arity_mismatch_is_reported_at_render_time() -> io::Result<()> {
    let output = run_cli(&["error", "build", "RESOURCE_NOT_FOUND", "--arg", "User"])?;
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("code: ERR_RENDER_TEMPLATE_MISMATCH\n"));
    Ok(())
}

#[test]
fn catalog_file_from_config_is_used() -> io::Result<()> {
    let output = run_cli(&[
        "--config",
        "crates/testkit/fixtures/config/guard-config.valid.toml",
        "error",
        "build",
        "INVOICE_NOT_FOUND",
        "--arg",
        "INV-7",
    ])?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("message: Invoice INV-7 was not found\n"));
    assert!(stdout.contains("service: billing\n"));
    assert!(stdout.contains("module: invoices\n"));
    Ok(())
}
