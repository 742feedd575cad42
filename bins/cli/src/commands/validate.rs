//! `validate`: run a signature file against a set of arguments.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, envelope_output, error_output, log_info, push_line, to_json_line};
use request_guard_api::v1::{ApiV1Failure, ApiV1RejectionDto, structured_error_to_api_v1};
use request_guard_config::GuardConfig;
use request_guard_host::{Guard, GuardError, OperationTable};
use request_guard_shared::{ErrorEnvelope, REDACTED, is_secret_key};
use request_guard_validation::{ArgumentMap, OperationSignature};
use serde_json::{Value, json};
use std::io::{self, Read};
use std::path::Path;

const REJECTION_SUMMARY_CODE: &str = "REQUEST_VALIDATION_FAILED";

/// Arguments for `validate`.
#[derive(Debug, Clone, Copy)]
pub struct ValidateInput<'a> {
    pub signature: &'a Path,
    pub args_json: Option<&'a str>,
    pub from_stdin: bool,
}

/// Run `validate`.
pub fn run_validate(
    mode: OutputMode,
    config: &GuardConfig,
    input: ValidateInput<'_>,
) -> Result<CliOutput, CliError> {
    let raw = resolve_args_json(input)?;
    let arguments: ArgumentMap = serde_json::from_str(&raw).map_err(|error| {
        CliError::InvalidInput(format!("arguments must be a JSON object: {error}"))
    })?;

    let (guard, operation) = match build_guard(config, input.signature) {
        Ok(built) => built,
        Err(error) => return Ok(envelope_output(mode, &error)),
    };

    let mut stderr = String::new();
    match guard.check(&operation, &arguments) {
        Ok(validated) => {
            log_info(&mut stderr, "arguments accepted", mode.no_progress);
            let echoed = redact_arguments(&validated);
            let stdout = if mode.is_json() {
                to_json_line(&json!({
                    "status": "ok",
                    "operation": operation,
                    "arguments": echoed,
                }))?
            } else {
                let mut out = String::new();
                out.push_str("status: ok\n");
                push_line(&mut out, "operation", &operation);
                push_line(&mut out, "arguments", &serde_json::to_string(&echoed)?);
                out
            };
            Ok(CliOutput {
                stdout,
                stderr,
                exit_code: ExitCode::Ok,
            })
        },
        Err(error) => rejected_output(mode, &guard, &operation, &error, stderr),
    }
}

fn build_guard(
    config: &GuardConfig,
    signature_path: &Path,
) -> Result<(Guard, String), ErrorEnvelope> {
    let signature = OperationSignature::load_from_path(signature_path)?;
    let operation = signature.name().to_string();
    let table = OperationTable::builder()
        .register_signature(signature)?
        .build();
    Ok((Guard::from_config(config, table.into_shared())?, operation))
}

fn rejected_output(
    mode: OutputMode,
    guard: &Guard,
    operation: &str,
    error: &GuardError,
    mut stderr: String,
) -> Result<CliOutput, CliError> {
    let body = match error.to_api_v1(&guard.errors()) {
        ApiV1Failure::Rejected(body) => body,
        ApiV1Failure::Error(dto) => return Ok(error_output(mode, &dto, ExitCode::InvalidInput)),
    };
    log_info(&mut stderr, "arguments rejected", mode.no_progress);

    let stdout = if mode.is_json() {
        to_json_line(&json!({
            "status": "rejected",
            "operation": operation,
            "errors": body,
        }))?
    } else {
        format_rejection_text(operation, &rejection_summary(guard, operation, &body, error), &body)
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::InvalidInput,
    })
}

// Catalog wording when available, the error's own text otherwise.
fn rejection_summary(
    guard: &Guard,
    operation: &str,
    body: &ApiV1RejectionDto,
    error: &GuardError,
) -> String {
    guard
        .errors()
        .build_default(REJECTION_SUMMARY_CODE, [json!(operation), json!(body.0.len())])
        .ok()
        .and_then(|summary| structured_error_to_api_v1(&summary).ok())
        .map_or_else(|| error.to_string(), |dto| dto.message)
}

fn format_rejection_text(operation: &str, summary: &str, body: &ApiV1RejectionDto) -> String {
    let mut out = String::new();
    out.push_str("status: rejected\n");
    push_line(&mut out, "operation", operation);
    push_line(&mut out, "message", summary);
    out.push_str("errors:\n");
    for (field, messages) in body.0.iter() {
        out.push_str("  ");
        out.push_str(field);
        out.push_str(":\n");
        for message in messages {
            out.push_str("    - ");
            out.push_str(message);
            out.push('\n');
        }
    }
    out
}

fn redact_arguments(arguments: &ArgumentMap) -> ArgumentMap {
    arguments
        .iter()
        .map(|(key, value)| {
            let shown = if is_secret_key(key) {
                Value::String(REDACTED.to_string())
            } else {
                value.clone()
            };
            (key.clone(), shown)
        })
        .collect()
}

fn resolve_args_json(input: ValidateInput<'_>) -> Result<String, CliError> {
    if input.from_stdin {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim();
        if trimmed.is_empty() {
            return Err(CliError::InvalidInput("stdin arguments are empty".to_string()));
        }
        return Ok(trimmed.to_string());
    }
    input
        .args_json
        .map(str::to_owned)
        .ok_or_else(|| CliError::InvalidInput("missing --args-json or --stdin".to_string()))
}
