//! Output format helpers for CLI commands.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use clap::{Args, ValueEnum};
use request_guard_api::v1::{ApiV1ErrorDto, ApiV1ErrorKind, error_envelope_to_api_v1_error};
use request_guard_shared::ErrorEnvelope;
use serde::Serialize;

const FALLBACK_ERROR_JSON: &str = "{\"status\":\"error\",\"error\":{\"code\":\"ERR_CORE_INTERNAL\",\"message\":\"internal error\",\"kind\":\"INVARIANT\",\"status\":500}}";

/// Output format choices for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-friendly text output.
    Text,
    /// Machine-friendly JSON output.
    Json,
}

/// Output-related CLI flags.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output format for command responses.
    #[arg(long, global = true, value_enum)]
    pub output: Option<OutputFormat>,
    /// Suppress progress lines on stderr.
    #[arg(long, global = true)]
    pub no_progress: bool,
}

/// Output mode derived from CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub format: OutputFormat,
    pub no_progress: bool,
}

impl OutputMode {
    /// Build output mode from CLI flags.
    #[must_use]
    pub const fn from_args(args: &OutputArgs) -> Self {
        let format = match args.output {
            Some(value) => value,
            None => OutputFormat::Text,
        };
        Self {
            format,
            no_progress: args.no_progress,
        }
    }

    /// Returns true when JSON output is requested.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}

/// Pretty JSON with a trailing newline.
pub fn to_json_line<T: Serialize>(payload: &T) -> Result<String, CliError> {
    let mut output = serde_json::to_string_pretty(payload)?;
    output.push('\n');
    Ok(output)
}

/// Render a boundary failure.
pub fn envelope_output(mode: OutputMode, envelope: &ErrorEnvelope) -> CliOutput {
    let dto = error_envelope_to_api_v1_error(envelope, None);
    error_output(mode, &dto, ExitCode::for_envelope(envelope))
}

/// Render an API error payload with the given exit code.
pub fn error_output(mode: OutputMode, error: &ApiV1ErrorDto, exit_code: ExitCode) -> CliOutput {
    let mut stderr = String::new();
    log_info(&mut stderr, "command failed", mode.no_progress);

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": error,
        });
        // This is a CLI boundary, so JSON serialization errors are internal.
        to_json_line(&payload).unwrap_or_else(|_| format!("{FALLBACK_ERROR_JSON}\n"))
    } else {
        format_api_error_text(error)
    };

    CliOutput {
        stdout,
        stderr,
        exit_code,
    }
}

/// Text form of an API error payload.
pub fn format_api_error_text(error: &ApiV1ErrorDto) -> String {
    let mut out = String::new();
    out.push_str("status: error\n");
    push_line(&mut out, "code", &error.code);
    push_line(&mut out, "message", &error.message);
    push_line(
        &mut out,
        "kind",
        match error.kind {
            ApiV1ErrorKind::Expected => "EXPECTED",
            ApiV1ErrorKind::Invariant => "INVARIANT",
        },
    );

    if let Some(meta) = error.meta.as_ref()
        && !meta.is_empty()
    {
        out.push_str("meta:\n");
        for (key, value) in meta {
            out.push_str("  ");
            push_line(&mut out, key, value);
        }
    }

    out
}

/// Append `key: value\n`.
pub fn push_line(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push_str(": ");
    out.push_str(value);
    out.push('\n');
}

/// Progress line on stderr unless suppressed.
pub fn log_info(stderr: &mut String, message: &str, no_progress: bool) {
    if no_progress {
        return;
    }
    stderr.push_str("info: ");
    stderr.push_str(message);
    stderr.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use request_guard_shared::ErrorCode;

    const QUIET_JSON: OutputMode = OutputMode {
        format: OutputFormat::Json,
        no_progress: true,
    };

    #[test]
    fn log_info_respects_no_progress() {
        let mut stderr = String::new();
        log_info(&mut stderr, "hello", true);
        assert!(stderr.is_empty());
        log_info(&mut stderr, "hello", false);
        assert_eq!(stderr, "info: hello\n");
    }

    #[test]
    fn envelope_output_in_json_mode() -> Result<(), Box<dyn std::error::Error>> {
        let envelope = ErrorEnvelope::expected(ErrorCode::invalid_input(), "bad flag")
            .with_metadata("token", "abc");
        let output = envelope_output(QUIET_JSON, &envelope);
        assert_eq!(output.exit_code, ExitCode::InvalidInput);
        assert!(output.stderr.is_empty());

        let value: serde_json::Value = serde_json::from_str(output.stdout.trim())?;
        let code = value
            .get("error")
            .and_then(|error| error.get("code"))
            .and_then(serde_json::Value::as_str);
        assert_eq!(code, Some("ERR_CORE_INVALID_INPUT"));
        let token = value
            .get("error")
            .and_then(|error| error.get("meta"))
            .and_then(|meta| meta.get("token"))
            .and_then(serde_json::Value::as_str);
        assert_eq!(token, Some("[REDACTED]"));
        Ok(())
    }

    #[test]
    fn text_error_lists_metadata() {
        let envelope = ErrorEnvelope::expected(ErrorCode::not_found(), "missing")
            .with_metadata("path", "a.toml");
        let dto = error_envelope_to_api_v1_error(&envelope, None);
        let text = format_api_error_text(&dto);
        assert!(text.starts_with("status: error\ncode: ERR_CORE_NOT_FOUND\n"));
        assert!(text.contains("meta:\n  path: a.toml\n"));
    }
}
