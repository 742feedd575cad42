//! API v1 DTO mapping helpers.

use crate::v1::render::{RenderError, render_structured_error};
use crate::v1::{
    ApiV1ErrorCode, ApiV1ErrorDto, ApiV1ErrorKind, ApiV1ErrorMeta, ApiV1RejectionDto, ApiV1Result,
};
use request_guard_catalog::{Severity, StructuredError};
use request_guard_shared::{ErrorCode, ErrorEnvelope, ErrorKind, is_secret_key, redact_if_secret};
use request_guard_validation::ValidationReport;

const API_V1_REDACTED_PREFIX: &str = "[REDACTED,len=";

/// Convert a shared `ErrorCode` into an API v1 error code string.
#[must_use]
pub fn error_code_to_api_v1(code: &ErrorCode) -> ApiV1ErrorCode {
    let namespace = sanitize_code_segment(code.namespace());
    let detail = sanitize_code_segment(code.code());
    format!("ERR_{namespace}_{detail}")
}

/// Map an `ErrorEnvelope` into an API v1 error DTO.
#[must_use]
pub fn error_envelope_to_api_v1_error(
    envelope: &ErrorEnvelope,
    extra_meta: Option<ApiV1ErrorMeta>,
) -> ApiV1ErrorDto {
    let mut merged = ApiV1ErrorMeta::new();
    for (key, value) in &envelope.metadata {
        merged.insert(key.clone(), value.clone());
    }
    if let Some(extra) = extra_meta {
        for (key, value) in extra {
            merged.insert(key, value);
        }
    }
    let meta = if merged.is_empty() {
        None
    } else {
        Some(redact_api_v1_meta(&merged))
    };

    ApiV1ErrorDto {
        code: error_code_to_api_v1(&envelope.code),
        message: envelope.message.clone(),
        kind: map_error_kind(envelope.kind),
        status: envelope_status(envelope),
        service: None,
        module: None,
        severity: None,
        args: Vec::new(),
        meta,
    }
}

/// Render a structured error into an API v1 error DTO.
///
/// This is where the catalog template meets its dynamic content; a template
/// whose placeholders disagree with the supplied values fails here.
pub fn structured_error_to_api_v1(error: &StructuredError) -> Result<ApiV1ErrorDto, RenderError> {
    let message = render_structured_error(error)?;
    let definition = error.definition();
    let kind = match definition.severity() {
        Severity::Critical => ApiV1ErrorKind::Invariant,
        Severity::Info | Severity::Warning | Severity::Error => ApiV1ErrorKind::Expected,
    };

    Ok(ApiV1ErrorDto {
        code: definition.code().to_string(),
        message,
        kind,
        status: definition.status(),
        service: Some(error.service_name().to_string()),
        module: Some(error.module().to_string()),
        severity: Some(definition.severity().as_str().to_string()),
        args: error.dynamic_content().to_vec(),
        meta: None,
    })
}

/// Map a validation report into the rejection body.
///
/// Field names, field order and message order are preserved verbatim.
#[must_use]
pub fn report_to_api_v1_rejection(report: &ValidationReport) -> ApiV1RejectionDto {
    ApiV1RejectionDto(report.clone())
}

/// Map a shared result into an API v1 result wrapper.
#[must_use]
pub fn result_to_api_v1_result<T>(
    result: Result<T, ErrorEnvelope>,
    extra_meta: Option<ApiV1ErrorMeta>,
) -> ApiV1Result<T> {
    match result {
        Ok(data) => ApiV1Result::ok(data),
        Err(error) => ApiV1Result::err(error_envelope_to_api_v1_error(&error, extra_meta)),
    }
}

const fn map_error_kind(kind: ErrorKind) -> ApiV1ErrorKind {
    match kind {
        ErrorKind::Expected | ErrorKind::Unexpected => ApiV1ErrorKind::Expected,
        ErrorKind::Invariant => ApiV1ErrorKind::Invariant,
    }
}

fn envelope_status(envelope: &ErrorEnvelope) -> u16 {
    if envelope.code == ErrorCode::not_found() {
        return 404;
    }
    if envelope.code == ErrorCode::permission_denied() {
        return 403;
    }
    match envelope.kind {
        ErrorKind::Expected => 400,
        ErrorKind::Invariant | ErrorKind::Unexpected => 500,
    }
}

fn sanitize_code_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn redact_api_v1_meta(meta: &ApiV1ErrorMeta) -> ApiV1ErrorMeta {
    let mut redacted = ApiV1ErrorMeta::new();
    for (key, value) in meta {
        let redacted_value = if is_argument_value_key(key) && !is_secret_key(key) {
            format!("{API_V1_REDACTED_PREFIX}{}]", value.len())
        } else {
            redact_if_secret(key, value)
        };
        redacted.insert(key.clone(), redacted_value);
    }
    redacted
}

// Raw caller input is reduced to its length.
fn is_argument_value_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key == "input" || key == "arguments"
}

#[cfg(test)]
mod tests {
    use super::*;
    use request_guard_catalog::{ErrorBuilder, ErrorDefinition, ErrorRegistry};
    use request_guard_shared::ErrorClass;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::error::Error;

    #[test]
    fn mapping_redacts_sensitive_metadata() -> Result<(), Box<dyn Error>> {
        let envelope = ErrorEnvelope::expected(
            ErrorCode::new("signature", "invalid_pattern"),
            "bad pattern",
        )
        .with_metadata("token", "secret-token")
        .with_metadata("apiKey", "sk-123")
        .with_metadata("input", "hello world")
        .with_metadata("parameter", "email");

        let dto = error_envelope_to_api_v1_error(&envelope, None);
        let meta = dto.meta.ok_or("meta should be present")?;
        assert_eq!(dto.code, "ERR_SIGNATURE_INVALID_PATTERN");
        assert_eq!(dto.kind, ApiV1ErrorKind::Expected);
        assert_eq!(dto.status, 400);
        assert_eq!(meta.get("token").map(String::as_str), Some("[REDACTED]"));
        assert_eq!(meta.get("apiKey").map(String::as_str), Some("[REDACTED]"));
        assert_eq!(
            meta.get("input").map(String::as_str),
            Some("[REDACTED,len=11]")
        );
        assert_eq!(meta.get("parameter").map(String::as_str), Some("email"));
        Ok(())
    }

    #[test]
    fn unexpected_errors_map_to_expected_kind() {
        let envelope = ErrorEnvelope::unexpected(ErrorCode::io(), "io", ErrorClass::Retriable);
        let dto = error_envelope_to_api_v1_error(&envelope, None);
        assert_eq!(dto.kind, ApiV1ErrorKind::Expected);
        assert_eq!(dto.status, 500);
    }

    #[test]
    fn well_known_codes_pick_their_status() {
        let missing = ErrorEnvelope::expected(ErrorCode::not_found(), "gone");
        assert_eq!(error_envelope_to_api_v1_error(&missing, None).status, 404);
        let denied = ErrorEnvelope::expected(ErrorCode::permission_denied(), "no");
        assert_eq!(error_envelope_to_api_v1_error(&denied, None).status, 403);
    }

    #[test]
    fn result_mapping_preserves_ok_and_err() -> Result<(), Box<dyn Error>> {
        let ok_result: Result<u32, ErrorEnvelope> = Ok(10);
        let mapped = result_to_api_v1_result(ok_result, None);
        assert!(matches!(mapped, ApiV1Result::Ok { ok: true, .. }));

        let mut extra = BTreeMap::new();
        extra.insert("requestId".to_string(), "abc".to_string());
        let err_result: Result<u32, ErrorEnvelope> = Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "bad input",
        ));
        let mapped = result_to_api_v1_result(err_result, Some(extra));
        let ApiV1Result::Err { ok: false, error } = mapped else {
            return Err("expected error wrapper".into());
        };
        let request_id = error.meta.as_ref().and_then(|meta| meta.get("requestId"));
        assert_eq!(request_id.map(String::as_str), Some("abc"));
        Ok(())
    }

    #[test]
    fn structured_errors_render_at_the_boundary() -> Result<(), Box<dyn Error>> {
        let registry = ErrorRegistry::from_definitions([ErrorDefinition::new(
            "RESOURCE_NOT_FOUND",
            "{0} with id {1} was not found",
        )
        .with_status(404)])?;
        let error = ErrorBuilder::new(&registry).build(
            "RESOURCE_NOT_FOUND",
            Some("accounts"),
            [json!("User"), json!(7)],
        )?;

        let dto = structured_error_to_api_v1(&error)?;
        assert_eq!(dto.code, "RESOURCE_NOT_FOUND");
        assert_eq!(dto.message, "User with id 7 was not found");
        assert_eq!(dto.status, 404);
        assert_eq!(dto.module.as_deref(), Some("accounts"));
        assert_eq!(dto.severity.as_deref(), Some("error"));
        assert_eq!(dto.args, vec![json!("User"), json!(7)]);
        Ok(())
    }

    #[test]
    fn arity_mismatch_fails_at_render_time() -> Result<(), Box<dyn Error>> {
        let registry =
            ErrorRegistry::from_definitions([ErrorDefinition::new("PAIR", "{0} and {1}")])?;
        let error = ErrorBuilder::new(&registry).build("PAIR", None, [json!("one")])?;
        let result = structured_error_to_api_v1(&error);
        assert!(matches!(
            result,
            Err(RenderError::MissingArgument { index: 1, .. })
        ));
        Ok(())
    }

    #[test]
    fn rejection_keeps_fields_and_message_order() {
        let mut report = ValidationReport::new();
        report.add_failure("email", "email is required");
        report.add_failure("email", "email must be a valid format");
        report.add_failure("id", "id is required");

        let dto = report_to_api_v1_rejection(&report);
        assert_eq!(
            dto.messages("email"),
            Some(
                [
                    "email is required".to_string(),
                    "email must be a valid format".to_string()
                ]
                .as_slice()
            )
        );
        assert_eq!(dto.0.len(), 2);
    }
}
