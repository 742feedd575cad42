//! Structured error construction.

use crate::definition::{ErrorDefinition, Severity};
use crate::error::UnknownErrorCode;
use crate::registry::ErrorRegistry;
use request_guard_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Name of the service that owns errors built here.
pub const SERVICE_NAME: &str = "request-guard";

/// Module recorded when the caller does not name one.
pub const DEFAULT_MODULE: &str = "validation";

/// An error occurrence: catalog identity, owner, and interpolation values.
///
/// Immutable after construction. `dynamic_content` keeps the caller's order;
/// position `n` fills placeholder `{n}` when the error is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredError {
    definition: Arc<ErrorDefinition>,
    service_name: String,
    module: String,
    dynamic_content: Vec<Value>,
}

impl StructuredError {
    /// The catalog entry this error was built from.
    #[must_use]
    pub fn definition(&self) -> &ErrorDefinition {
        &self.definition
    }

    /// Shared handle to the catalog entry.
    #[must_use]
    pub fn definition_arc(&self) -> Arc<ErrorDefinition> {
        Arc::clone(&self.definition)
    }

    /// Catalog code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.definition.code()
    }

    /// Owning service.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Subsystem that raised the error.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Interpolation values in caller order.
    #[must_use]
    pub fn dynamic_content(&self) -> &[Value] {
        &self.dynamic_content
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}/{} {}: {}",
            self.service_name,
            self.module,
            self.definition.code(),
            self.definition.template()
        )
    }
}

impl std::error::Error for StructuredError {}

impl From<StructuredError> for ErrorEnvelope {
    fn from(error: StructuredError) -> Self {
        let code = ErrorCode::new(error.module.clone(), error.definition.code());
        let message = error.definition.template().to_string();
        let envelope = match error.definition.severity() {
            Severity::Critical => Self::unexpected(code, message, ErrorClass::NonRetriable),
            Severity::Info | Severity::Warning | Severity::Error => Self::expected(code, message),
        };
        envelope
            .with_metadata("service", error.service_name)
            .with_metadata("severity", error.definition.severity().as_str())
            .with_metadata("status", error.definition.status().to_string())
            .with_metadata("args", error.dynamic_content.len().to_string())
    }
}

/// Builds [`StructuredError`]s against a registry.
///
/// The builder looks codes up and records the caller's values verbatim. It
/// never interpolates templates or checks placeholder arity; that is left to
/// whoever renders the error.
#[derive(Debug, Clone)]
pub struct ErrorBuilder<'r> {
    registry: &'r ErrorRegistry,
    service_name: String,
    default_module: String,
}

impl<'r> ErrorBuilder<'r> {
    /// Create a builder owned by [`SERVICE_NAME`] defaulting to [`DEFAULT_MODULE`].
    #[must_use]
    pub fn new(registry: &'r ErrorRegistry) -> Self {
        Self {
            registry,
            service_name: SERVICE_NAME.to_string(),
            default_module: DEFAULT_MODULE.to_string(),
        }
    }

    /// Override the owning service name.
    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    /// Override the module used when callers omit one.
    #[must_use]
    pub fn with_default_module(mut self, module: impl Into<String>) -> Self {
        self.default_module = module.into();
        self
    }

    /// The registry this builder resolves codes against.
    #[must_use]
    pub const fn registry(&self) -> &'r ErrorRegistry {
        self.registry
    }

    /// Build an error for `code`, raised by `module` (or the default module).
    pub fn build<I>(
        &self,
        code: &str,
        module: Option<&str>,
        dynamic_content: I,
    ) -> Result<StructuredError, UnknownErrorCode>
    where
        I: IntoIterator<Item = Value>,
    {
        let module = module.unwrap_or(&self.default_module);
        let definition = self.registry.get_error(code).inspect_err(|_| {
            tracing::error!(code, module, "error code missing from catalog");
        })?;

        Ok(StructuredError {
            definition,
            service_name: self.service_name.clone(),
            module: module.to_string(),
            dynamic_content: dynamic_content.into_iter().collect(),
        })
    }

    /// Build an error raised by the default module.
    pub fn build_default<I>(
        &self,
        code: &str,
        dynamic_content: I,
    ) -> Result<StructuredError, UnknownErrorCode>
    where
        I: IntoIterator<Item = Value>,
    {
        self.build(code, None, dynamic_content)
    }
}
