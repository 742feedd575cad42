//! API v1 DTO types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use request_guard_validation::ValidationReport;
use serde_json::Value;
use std::collections::BTreeMap;

/// Status returned with a validation rejection.
pub const API_V1_REJECTION_STATUS: u16 = 400;

/// Error kind exposed in API v1 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiV1ErrorKind {
    /// Expected, user-facing errors (rejections, domain errors).
    Expected,
    /// Invariant violations that indicate a bug.
    Invariant,
}

/// API v1 error code string (stable contract value).
pub type ApiV1ErrorCode = String;

/// Metadata map attached to API v1 errors.
pub type ApiV1ErrorMeta = BTreeMap<String, String>;

/// API v1 error payload.
///
/// Domain errors carry `service`, `module`, `severity` and the positional
/// `args` they were built with; boundary failures carry `meta` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiV1ErrorDto {
    /// Stable error code (e.g. `RESOURCE_NOT_FOUND` or `ERR_CONFIG_EMPTY_FIELD`).
    pub code: ApiV1ErrorCode,
    /// Rendered, human-readable message.
    pub message: String,
    /// Error category.
    pub kind: ApiV1ErrorKind,
    /// Status hint for the transport.
    pub status: u16,
    /// Owning service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Subsystem that raised the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Catalog severity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Interpolation values in placeholder order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
    /// Optional metadata for debugging and correlation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ApiV1ErrorMeta>,
}

/// Rejection body: every failing field mapped to its ordered messages.
///
/// Fields appear in the order the operation declares them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ApiV1RejectionDto(
    #[schemars(with = "BTreeMap<String, Vec<String>>")] pub ValidationReport,
);

impl ApiV1RejectionDto {
    /// Messages for one field.
    #[must_use]
    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.0.messages(field)
    }
}

/// Client-visible failure: a rejection or an error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ApiV1Failure {
    /// Arguments failed validation; the handler never ran.
    Rejected(ApiV1RejectionDto),
    /// Any other failure.
    Error(ApiV1ErrorDto),
}

impl ApiV1Failure {
    /// Status hint for the transport.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Rejected(_) => API_V1_REJECTION_STATUS,
            Self::Error(error) => error.status,
        }
    }
}

/// API v1 result wrapper for success or failure payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiV1Result<T> {
    /// Success response.
    Ok {
        /// Indicates success.
        ok: bool,
        /// Success payload.
        data: T,
    },
    /// Error response.
    Err {
        /// Indicates failure.
        ok: bool,
        /// Error payload.
        error: ApiV1ErrorDto,
    },
}

impl<T> ApiV1Result<T> {
    /// Build a success response wrapper.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self::Ok { ok: true, data }
    }

    /// Build an error response wrapper.
    #[must_use]
    pub const fn err(error: ApiV1ErrorDto) -> Self {
        Self::Err { ok: false, error }
    }
}
