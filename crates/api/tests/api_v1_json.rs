//! API v1 wire-shape tests.

use request_guard_api::v1::{
    ApiV1ErrorDto, ApiV1Failure, ApiV1Result, API_V1_REJECTION_STATUS, api_v1_error_schema,
    api_v1_rejection_schema, error_envelope_to_api_v1_error, report_to_api_v1_rejection,
    structured_error_to_api_v1,
};
use request_guard_catalog::{ErrorBuilder, ErrorRegistry};
use request_guard_shared::{ErrorCode, ErrorEnvelope};
use request_guard_validation::ValidationReport;
use serde_json::json;
use std::error::Error;

#[test]
fn envelope_error_json_shape() -> Result<(), Box<dyn Error>> {
    let envelope = ErrorEnvelope::expected(
        ErrorCode::new("signature", "duplicate_parameter"),
        "parameter `email` is declared twice",
    )
    .with_metadata("parameter", "email")
    .with_metadata("password", "hunter2");
    let error_dto: ApiV1ErrorDto = error_envelope_to_api_v1_error(&envelope, None);

    assert_eq!(
        serde_json::to_value(&error_dto)?,
        json!({
            "code": "ERR_SIGNATURE_DUPLICATE_PARAMETER",
            "message": "parameter `email` is declared twice",
            "kind": "EXPECTED",
            "status": 400,
            "meta": {"parameter": "email", "password": "[REDACTED]"}
        })
    );

    let err_result: ApiV1Result<()> = ApiV1Result::err(error_dto);
    let value = serde_json::to_value(&err_result)?;
    assert_eq!(value.get("ok"), Some(&json!(false)));
    assert!(value.get("error").is_some());

    let ok_result = ApiV1Result::ok(json!({"userId": 1}));
    assert_eq!(
        serde_json::to_value(&ok_result)?,
        json!({"ok": true, "data": {"userId": 1}})
    );
    Ok(())
}

#[test]
fn structured_error_json_shape() -> Result<(), Box<dyn Error>> {
    let registry = ErrorRegistry::builtin()?;
    let error = ErrorBuilder::new(&registry)
        .with_service_name("accounts")
        .build("RESOURCE_NOT_FOUND", Some("users"), [json!("User"), json!(42)])?;

    let dto = structured_error_to_api_v1(&error)?;
    assert_eq!(
        serde_json::to_value(ApiV1Failure::Error(dto))?,
        json!({
            "code": "RESOURCE_NOT_FOUND",
            "message": "User with id 42 was not found",
            "kind": "EXPECTED",
            "status": 404,
            "service": "accounts",
            "module": "users",
            "severity": "info",
            "args": ["User", 42]
        })
    );
    Ok(())
}

#[test]
fn rejection_body_is_the_bare_field_map() -> Result<(), Box<dyn Error>> {
    let mut report = ValidationReport::new();
    report.add_failure("id", "id is required");
    report.add_failure("email", "email is required");
    report.add_failure("email", "email must be a valid format");

    let failure = ApiV1Failure::Rejected(report_to_api_v1_rejection(&report));
    assert_eq!(failure.status(), API_V1_REJECTION_STATUS);
    assert_eq!(
        serde_json::to_value(&failure)?,
        json!({
            "email": ["email is required", "email must be a valid format"],
            "id": ["id is required"]
        })
    );
    Ok(())
}

#[test]
fn schemas_describe_the_dtos() -> Result<(), Box<dyn Error>> {
    let error_schema = serde_json::to_value(api_v1_error_schema())?;
    let properties = error_schema
        .get("properties")
        .ok_or("error schema should list properties")?;
    for field in ["code", "message", "kind", "status", "args", "meta"] {
        assert!(properties.get(field).is_some(), "missing {field}");
    }

    let rejection_schema = serde_json::to_value(api_v1_rejection_schema())?;
    assert_eq!(rejection_schema.get("type"), Some(&json!("object")));
    Ok(())
}
