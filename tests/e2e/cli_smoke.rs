//! CLI smoke tests: info and effective config.

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

fn run_cli(args: &[&str], env: &[(&str, &str)]) -> io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_rguard"));
    command.args(args).current_dir(workspace_root());
    for (key, _) in std::env::vars() {
        if key.starts_with("REQUEST_GUARD_") || key == "RUST_LOG" {
            command.env_remove(key);
        }
    }
    command.envs(env.iter().copied());
    command.output()
}

fn stdout_json(output: &Output) -> io::Result<serde_json::Value> {
    serde_json::from_slice(&output.stdout).map_err(io::Error::other)
}

#[test]
fn info_json_is_deterministic() -> io::Result<()> {
    let first = run_cli(&["--output", "json", "info"], &[])?;
    let second = run_cli(&["--output", "json", "info"], &[])?;
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout, "info output should be deterministic");

    let value = stdout_json(&first)?;
    let name = value
        .get("build")
        .and_then(|build| build.get("name"))
        .and_then(serde_json::Value::as_str);
    assert_eq!(name, Some("rguard"));
    Ok(())
}

#[test]
fn config_show_applies_file_then_env() -> io::Result<()> {
    let output = run_cli(
        &[
            "--output",
            "json",
            "--config",
            "crates/testkit/fixtures/config/guard-config.valid.toml",
            "config",
            "show",
        ],
        &[("REQUEST_GUARD_DEFAULT_MODULE", "payments")],
    )?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let value = stdout_json(&output)?;
    let service = value.get("service").ok_or_else(|| io::Error::other("missing service"))?;
    assert_eq!(service.get("name"), Some(&serde_json::json!("billing")));
    assert_eq!(
        service.get("defaultModule"),
        Some(&serde_json::json!("payments"))
    );
    Ok(())
}

#[test]
fn invalid_config_exits_with_invalid_input() -> io::Result<()> {
    let output = run_cli(
        &[
            "--config",
            "crates/testkit/fixtures/config/guard-config.invalid.toml",
            "config",
            "show",
        ],
        &[],
    )?;
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("status: error\ncode: ERR_CONFIG_"));
    Ok(())
}

#[test]
fn invalid_env_exits_with_invalid_input() -> io::Result<()> {
    let output = run_cli(&["config", "show"], &[("REQUEST_GUARD_LOG_FORMAT", "yaml")])?;
    assert_eq!(output.status.code(), Some(2));
    Ok(())
}
