//! Boundary failures raised while guarding an invocation.

use request_guard_api::v1::{
    ApiV1Failure, error_envelope_to_api_v1_error, report_to_api_v1_rejection,
    structured_error_to_api_v1,
};
use request_guard_catalog::{ErrorBuilder, StructuredError};
use request_guard_shared::{ErrorCode, ErrorEnvelope};
use request_guard_validation::ValidationReport;
use serde_json::json;
use thiserror::Error;

/// Catalog code for an operation missing from the table.
pub const UNKNOWN_OPERATION_CODE: &str = "UNKNOWN_OPERATION";
/// Catalog code for arguments that passed validation but did not decode.
pub const INVALID_ARGUMENTS_CODE: &str = "INVALID_ARGUMENTS";

/// Why an invocation did not produce a handler result.
#[derive(Debug, Error)]
pub enum GuardError {
    /// No signature is registered under the requested name.
    #[error("operation `{operation}` is not registered")]
    UnknownOperation {
        /// Requested name.
        operation: String,
    },
    /// Validation failed; the handler was not invoked.
    #[error("request to `{operation}` failed validation on {} field(s)", .report.len())]
    Rejected {
        /// Operation that was requested.
        operation: String,
        /// Every failure, keyed by field.
        report: ValidationReport,
    },
    /// Arguments validated but could not be decoded into the operation type.
    #[error("arguments for `{operation}` could not be decoded: {source}")]
    Decode {
        /// Operation that was requested.
        operation: String,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// The handler reported a domain error.
    #[error(transparent)]
    Domain(#[from] StructuredError),
}

impl GuardError {
    /// Validation report, when this is a rejection.
    #[must_use]
    pub const fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Rejected { report, .. } => Some(report),
            Self::UnknownOperation { .. } | Self::Decode { .. } | Self::Domain(_) => None,
        }
    }

    /// Returns true when validation rejected the arguments.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Render into the client-visible payload.
    ///
    /// Rejections become the bare field map. Everything else is rendered from
    /// the catalog through `builder`; when the catalog lacks the code, or the
    /// template does not fit its values, the envelope form is used instead.
    #[must_use]
    pub fn to_api_v1(&self, builder: &ErrorBuilder<'_>) -> ApiV1Failure {
        match self {
            Self::Rejected { report, .. } => {
                ApiV1Failure::Rejected(report_to_api_v1_rejection(report))
            },
            Self::UnknownOperation { operation } => {
                self.catalog_failure(builder, UNKNOWN_OPERATION_CODE, vec![json!(operation)])
            },
            Self::Decode { operation, source } => self.catalog_failure(
                builder,
                INVALID_ARGUMENTS_CODE,
                vec![json!(operation), json!(source.to_string())],
            ),
            Self::Domain(error) => render_structured(error),
        }
    }

    fn catalog_failure(
        &self,
        builder: &ErrorBuilder<'_>,
        code: &str,
        args: Vec<serde_json::Value>,
    ) -> ApiV1Failure {
        match builder.build(code, Some("host"), args) {
            Ok(error) => render_structured(&error),
            Err(_) => self.envelope_failure(),
        }
    }

    fn envelope_failure(&self) -> ApiV1Failure {
        let envelope = ErrorEnvelope::from(self);
        ApiV1Failure::Error(error_envelope_to_api_v1_error(&envelope, None))
    }
}

fn render_structured(error: &StructuredError) -> ApiV1Failure {
    match structured_error_to_api_v1(error) {
        Ok(dto) => ApiV1Failure::Error(dto),
        Err(render_error) => {
            tracing::error!(
                code = error.code(),
                error = %render_error,
                "catalog template does not match its arguments"
            );
            let envelope = ErrorEnvelope::invariant(
                ErrorCode::new("render", "template_mismatch"),
                render_error.to_string(),
            )
            .with_metadata("code", error.code());
            ApiV1Failure::Error(error_envelope_to_api_v1_error(&envelope, None))
        },
    }
}

impl From<&GuardError> for ErrorEnvelope {
    fn from(error: &GuardError) -> Self {
        let message = error.to_string();
        match error {
            GuardError::UnknownOperation { operation } => {
                Self::expected(ErrorCode::not_found(), message)
                    .with_metadata("operation", operation.clone())
            },
            GuardError::Rejected { operation, report } => {
                Self::expected(ErrorCode::validation_failed(), message)
                    .with_metadata("operation", operation.clone())
                    .with_metadata("fields", report.fields().collect::<Vec<_>>().join(","))
            },
            GuardError::Decode { operation, .. } => {
                Self::expected(ErrorCode::invalid_input(), message)
                    .with_metadata("operation", operation.clone())
            },
            GuardError::Domain(structured) => structured.clone().into(),
        }
    }
}
