//! Catalog entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status hint used when a definition does not declare one.
pub const DEFAULT_STATUS: u16 = 400;

/// Default severity attached to a catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational; the caller can usually correct the request.
    Info,
    /// Recoverable problem worth surfacing.
    Warning,
    /// Failed operation.
    #[default]
    Error,
    /// Failure that needs operator attention.
    Critical,
}

impl Severity {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A single catalog entry: a stable code and its static metadata.
///
/// Definitions are immutable once loaded; the registry hands out shared
/// references to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorDefinition {
    code: String,
    template: String,
    #[serde(default)]
    severity: Severity,
    #[serde(default = "default_status")]
    status: u16,
}

const fn default_status() -> u16 {
    DEFAULT_STATUS
}

impl ErrorDefinition {
    /// Create a definition with the default severity and status.
    pub fn new(code: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            template: template.into(),
            severity: Severity::default(),
            status: DEFAULT_STATUS,
        }
    }

    /// Override the severity.
    #[must_use]
    pub const fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Override the status hint.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Stable catalog key.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Message template with positional `{n}` placeholders.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Default severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Status hint for the rendering boundary.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }
}
