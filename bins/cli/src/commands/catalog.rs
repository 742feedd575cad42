//! Catalog inspection commands.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, envelope_output, error_output, push_line, to_json_line};
use request_guard_api::v1::error_envelope_to_api_v1_error;
use request_guard_catalog::{ErrorDefinition, ErrorRegistry};
use request_guard_config::GuardConfig;
use request_guard_shared::ErrorEnvelope;
use std::path::Path;

/// Load the catalog named on the command line, else the configured one,
/// else the built-in catalog.
pub fn load_registry(
    config: &GuardConfig,
    override_path: Option<&Path>,
) -> Result<ErrorRegistry, ErrorEnvelope> {
    let registry = match override_path.or(config.catalog.path.as_deref()) {
        Some(path) => ErrorRegistry::load_from_path(path)?,
        None => ErrorRegistry::builtin()?,
    };
    Ok(registry)
}

/// Run `catalog list`.
pub fn run_catalog_list(
    mode: OutputMode,
    config: &GuardConfig,
    catalog: Option<&Path>,
) -> Result<CliOutput, CliError> {
    let registry = match load_registry(config, catalog) {
        Ok(registry) => registry,
        Err(error) => return Ok(envelope_output(mode, &error)),
    };

    let stdout = if mode.is_json() {
        let definitions: Vec<&ErrorDefinition> = registry.definitions().collect();
        to_json_line(&serde_json::json!({
            "status": "ok",
            "count": definitions.len(),
            "errors": definitions,
        }))?
    } else {
        let mut out = String::new();
        for definition in registry.definitions() {
            out.push_str(&format!(
                "{:<28} {:<8} {:>3}  {}\n",
                definition.code(),
                definition.severity().as_str(),
                definition.status(),
                definition.template()
            ));
        }
        out
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

/// Run `catalog show <CODE>`.
pub fn run_catalog_show(
    mode: OutputMode,
    config: &GuardConfig,
    catalog: Option<&Path>,
    code: &str,
) -> Result<CliOutput, CliError> {
    let registry = match load_registry(config, catalog) {
        Ok(registry) => registry,
        Err(error) => return Ok(envelope_output(mode, &error)),
    };
    let definition = match registry.get_error(code) {
        Ok(definition) => definition,
        Err(unknown) => {
            let envelope: ErrorEnvelope = unknown.into();
            let dto = error_envelope_to_api_v1_error(&envelope, None);
            return Ok(error_output(mode, &dto, ExitCode::InvalidInput));
        },
    };

    let stdout = if mode.is_json() {
        to_json_line(&serde_json::json!({
            "status": "ok",
            "error": definition.as_ref(),
        }))?
    } else {
        let mut out = String::new();
        push_line(&mut out, "code", definition.code());
        push_line(&mut out, "severity", definition.severity().as_str());
        push_line(&mut out, "status", &definition.status().to_string());
        push_line(&mut out, "template", definition.template());
        out
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
