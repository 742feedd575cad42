//! JSON Schema exports for API v1 response DTOs.

use crate::v1::{ApiV1ErrorDto, ApiV1RejectionDto};
use schemars::{Schema, schema_for};

/// JSON Schema for `ApiV1ErrorDto`.
#[must_use]
pub fn api_v1_error_schema() -> Schema {
    schema_for!(ApiV1ErrorDto)
}

/// JSON Schema for `ApiV1RejectionDto`.
#[must_use]
pub fn api_v1_rejection_schema() -> Schema {
    schema_for!(ApiV1RejectionDto)
}
