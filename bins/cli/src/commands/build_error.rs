//! `error build`: construct and render a structured error from the catalog.

use crate::CliOutput;
use crate::commands::catalog::load_registry;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, envelope_output, error_output, push_line, to_json_line};
use request_guard_api::v1::{ApiV1ErrorDto, error_envelope_to_api_v1_error, structured_error_to_api_v1};
use request_guard_catalog::ErrorBuilder;
use request_guard_config::GuardConfig;
use request_guard_shared::{ErrorCode, ErrorEnvelope};
use serde_json::Value;
use std::path::Path;

/// Arguments for `error build`.
#[derive(Debug, Clone, Copy)]
pub struct BuildErrorInput<'a> {
    pub code: &'a str,
    pub module: Option<&'a str>,
    pub args: &'a [String],
    pub catalog: Option<&'a Path>,
}

/// Run `error build`.
pub fn run_error_build(
    mode: OutputMode,
    config: &GuardConfig,
    input: BuildErrorInput<'_>,
) -> Result<CliOutput, CliError> {
    let registry = match load_registry(config, input.catalog) {
        Ok(registry) => registry,
        Err(error) => return Ok(envelope_output(mode, &error)),
    };
    let builder = ErrorBuilder::new(&registry)
        .with_service_name(config.service.name.clone())
        .with_default_module(config.service.default_module.clone());

    let content = input.args.iter().map(|raw| parse_arg(raw));
    let error = match builder.build(input.code, input.module, content) {
        Ok(error) => error,
        Err(unknown) => {
            let envelope: ErrorEnvelope = unknown.into();
            let dto = error_envelope_to_api_v1_error(&envelope, None);
            return Ok(error_output(mode, &dto, ExitCode::InvalidInput));
        },
    };

    let dto = match structured_error_to_api_v1(&error) {
        Ok(dto) => dto,
        Err(render_error) => {
            let envelope = ErrorEnvelope::expected(
                ErrorCode::new("render", "template_mismatch"),
                render_error.to_string(),
            )
            .with_metadata("code", error.code())
            .with_metadata("template", error.definition().template());
            return Ok(envelope_output(mode, &envelope));
        },
    };

    let stdout = if mode.is_json() {
        to_json_line(&serde_json::json!({
            "status": "ok",
            "error": dto,
        }))?
    } else {
        format_structured_text(&dto)?
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

// Plain words become strings; anything that parses as JSON keeps its type.
fn parse_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn format_structured_text(dto: &ApiV1ErrorDto) -> Result<String, CliError> {
    let mut out = String::new();
    push_line(&mut out, "code", &dto.code);
    push_line(&mut out, "message", &dto.message);
    push_line(&mut out, "status", &dto.status.to_string());
    if let Some(service) = &dto.service {
        push_line(&mut out, "service", service);
    }
    if let Some(module) = &dto.module {
        push_line(&mut out, "module", module);
    }
    if let Some(severity) = &dto.severity {
        push_line(&mut out, "severity", severity);
    }
    push_line(&mut out, "args", &serde_json::to_string(&dto.args)?);
    Ok(out)
}
