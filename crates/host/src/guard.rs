//! The request boundary.
//!
//! Every invocation runs a fresh validation pipeline against the operation's
//! registered signature. Handlers only ever see arguments wrapped in
//! [`Validated`]; a rejected run returns the full report and the handler is
//! never called.

use crate::error::GuardError;
use crate::table::OperationTable;
use request_guard_catalog::{ErrorBuilder, ErrorRegistry, StructuredError};
use request_guard_config::GuardConfig;
use request_guard_shared::{ErrorEnvelope, Validated};
use request_guard_validation::{ArgumentMap, Operation, ValidationPipeline};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Validating front door for registered operations.
///
/// Cheap to clone; the table and catalog are shared.
#[derive(Debug, Clone)]
pub struct Guard {
    operations: Arc<OperationTable>,
    registry: Arc<ErrorRegistry>,
    service_name: String,
    default_module: String,
}

impl Guard {
    /// Guard `operations` with errors drawn from `registry`.
    #[must_use]
    pub fn new(operations: Arc<OperationTable>, registry: Arc<ErrorRegistry>) -> Self {
        Self {
            operations,
            registry,
            service_name: request_guard_catalog::SERVICE_NAME.to_string(),
            default_module: request_guard_catalog::DEFAULT_MODULE.to_string(),
        }
    }

    /// Build from configuration, loading the configured catalog (or the
    /// built-in one).
    pub fn from_config(
        config: &GuardConfig,
        operations: Arc<OperationTable>,
    ) -> Result<Self, ErrorEnvelope> {
        let registry = match &config.catalog.path {
            Some(path) => ErrorRegistry::load_from_path(path)?,
            None => ErrorRegistry::builtin()?,
        };
        Ok(Self::new(operations, Arc::new(registry))
            .with_service_name(config.service.name.clone())
            .with_default_module(config.service.default_module.clone()))
    }

    /// Override the owning service name.
    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    /// Override the default module for errors built through this guard.
    #[must_use]
    pub fn with_default_module(mut self, module: impl Into<String>) -> Self {
        self.default_module = module.into();
        self
    }

    /// Registered operations.
    #[must_use]
    pub fn operations(&self) -> &OperationTable {
        &self.operations
    }

    /// Error catalog.
    #[must_use]
    pub fn registry(&self) -> &ErrorRegistry {
        &self.registry
    }

    /// Error builder stamped with this guard's service and default module.
    #[must_use]
    pub fn errors(&self) -> ErrorBuilder<'_> {
        ErrorBuilder::new(&self.registry)
            .with_service_name(self.service_name.clone())
            .with_default_module(self.default_module.clone())
    }

    /// Validate `arguments` for `operation`.
    pub fn check<'a>(
        &self,
        operation: &str,
        arguments: &'a ArgumentMap,
    ) -> Result<Validated<&'a ArgumentMap>, GuardError> {
        let signature =
            self.operations
                .get(operation)
                .ok_or_else(|| GuardError::UnknownOperation {
                    operation: operation.to_string(),
                })?;

        let outcome = ValidationPipeline::new(signature).run(arguments);
        if outcome.is_valid() {
            return Ok(Validated::new(arguments));
        }

        let report = outcome.into_report();
        let fields: Vec<&str> = report.fields().collect();
        tracing::info!(
            operation,
            failures = report.failure_count(),
            fields = ?fields,
            "request rejected"
        );
        Err(GuardError::Rejected {
            operation: operation.to_string(),
            report,
        })
    }

    /// Validate, then hand the raw arguments to `handler`.
    pub fn dispatch<T, F>(
        &self,
        operation: &str,
        arguments: &ArgumentMap,
        handler: F,
    ) -> Result<T, GuardError>
    where
        F: FnOnce(Validated<&ArgumentMap>) -> Result<T, StructuredError>,
    {
        let validated = self.check(operation, arguments)?;
        tracing::debug!(operation, "dispatching to handler");
        handler(validated).map_err(GuardError::from)
    }

    /// Validate against `O`'s registered signature, decode into `O`, then
    /// call `handler`.
    pub fn invoke<O, T, F>(&self, arguments: &ArgumentMap, handler: F) -> Result<T, GuardError>
    where
        O: Operation + DeserializeOwned,
        F: FnOnce(Validated<O>) -> Result<T, StructuredError>,
    {
        let validated = self.check(O::NAME, arguments)?;
        let object: serde_json::Map<String, serde_json::Value> = validated
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let request: O = serde_json::from_value(serde_json::Value::Object(object)).map_err(
            |source| GuardError::Decode {
                operation: O::NAME.to_string(),
                source,
            },
        )?;
        tracing::debug!(operation = O::NAME, "dispatching to handler");
        handler(Validated::new(request)).map_err(GuardError::from)
    }
}
