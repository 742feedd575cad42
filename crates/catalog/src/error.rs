//! Catalog and lookup failures.

use request_guard_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use std::path::PathBuf;
use thiserror::Error;

/// A code with no catalog entry.
///
/// This is a programmer error: the calling code references a definition the
/// catalog does not carry. It is never downgraded to a generic message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error code `{code}` is not registered in the catalog")]
pub struct UnknownErrorCode {
    /// The code that failed to resolve.
    pub code: String,
}

impl UnknownErrorCode {
    /// Create the failure for a code.
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl From<UnknownErrorCode> for ErrorEnvelope {
    fn from(error: UnknownErrorCode) -> Self {
        let message = error.to_string();
        Self::invariant(ErrorCode::unknown_error_code(), message).with_metadata("code", error.code)
    }
}

/// Failures while loading or installing a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog TOML did not parse.
    #[error("invalid catalog TOML: {0}")]
    Toml(#[from] toml::de::Error),
    /// Catalog JSON did not parse.
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Catalog file could not be read.
    #[error("failed to read catalog file {}: {source}", .path.display())]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Catalog file extension is neither `.toml` nor `.json`.
    #[error("unsupported catalog format `{extension}`; use .toml or .json")]
    UnsupportedFormat {
        /// Offending extension.
        extension: String,
    },
    /// Two entries share a code.
    #[error("duplicate error code `{code}` in catalog")]
    DuplicateCode {
        /// Repeated code.
        code: String,
    },
    /// An entry has an empty or whitespace code.
    #[error("catalog entry #{index} has a blank code")]
    BlankCode {
        /// Zero-based position in the source list.
        index: usize,
    },
    /// An entry's code has leading or trailing whitespace.
    #[error("catalog entry `{code}` has whitespace around its code")]
    PaddedCode {
        /// Code as written.
        code: String,
    },
    /// An entry has an empty template.
    #[error("catalog entry `{code}` has a blank template")]
    BlankTemplate {
        /// Code of the offending entry.
        code: String,
    },
    /// A process-wide registry is already installed.
    #[error("a global error registry is already installed")]
    AlreadyInstalled,
}

impl CatalogError {
    fn error_code(&self) -> ErrorCode {
        let code = match self {
            Self::Toml(_) => "invalid_toml",
            Self::Json(_) => "invalid_json",
            Self::Io { .. } => "catalog_io",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::DuplicateCode { .. } => "duplicate_code",
            Self::BlankCode { .. } => "blank_code",
            Self::PaddedCode { .. } => "padded_code",
            Self::BlankTemplate { .. } => "blank_template",
            Self::AlreadyInstalled => "already_installed",
        };
        ErrorCode::new("catalog", code)
    }
}

impl From<CatalogError> for ErrorEnvelope {
    fn from(error: CatalogError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        match error {
            CatalogError::Io { path, source } => {
                let class = if source.kind() == std::io::ErrorKind::Interrupted {
                    ErrorClass::Retriable
                } else {
                    ErrorClass::NonRetriable
                };
                Self::unexpected(code, message, class)
                    .with_metadata("path", path.to_string_lossy().to_string())
            },
            CatalogError::AlreadyInstalled => Self::invariant(code, message),
            CatalogError::DuplicateCode { code: entry }
            | CatalogError::PaddedCode { code: entry }
            | CatalogError::BlankTemplate { code: entry } => {
                Self::expected(code, message).with_metadata("code", entry)
            },
            CatalogError::BlankCode { index } => {
                Self::expected(code, message).with_metadata("index", index.to_string())
            },
            CatalogError::UnsupportedFormat { extension } => {
                Self::expected(code, message).with_metadata("extension", extension)
            },
            CatalogError::Toml(_) | CatalogError::Json(_) => Self::expected(code, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use request_guard_shared::ErrorKind;

    #[test]
    fn unknown_code_maps_to_invariant_envelope() {
        let envelope: ErrorEnvelope = UnknownErrorCode::new("NOPE").into();
        assert_eq!(envelope.kind, ErrorKind::Invariant);
        assert_eq!(envelope.code, ErrorCode::unknown_error_code());
        assert_eq!(envelope.metadata.get("code").map(String::as_str), Some("NOPE"));
    }

    #[test]
    fn catalog_errors_carry_metadata() {
        let envelope: ErrorEnvelope = CatalogError::DuplicateCode {
            code: "DUP".to_string(),
        }
        .into();
        assert_eq!(envelope.code.code(), "duplicate_code");
        assert_eq!(envelope.metadata.get("code").map(String::as_str), Some("DUP"));

        let envelope: ErrorEnvelope = CatalogError::Io {
            path: PathBuf::from("missing.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        }
        .into();
        assert_eq!(envelope.kind, ErrorKind::Unexpected);
        assert_eq!(
            envelope.metadata.get("path").map(String::as_str),
            Some("missing.toml")
        );
    }
}
