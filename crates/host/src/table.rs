//! Registered operations keyed by name.

use request_guard_shared::{ErrorCode, ErrorEnvelope};
use request_guard_validation::{Operation, OperationSignature, SignatureError};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Failures while assembling an [`OperationTable`].
#[derive(Debug, Error)]
pub enum TableError {
    /// Two signatures share an operation name.
    #[error("operation `{operation}` is registered twice")]
    DuplicateOperation {
        /// Repeated name.
        operation: String,
    },
    /// An operation's signature failed to build.
    #[error("operation `{operation}` has an invalid signature: {source}")]
    Signature {
        /// Operation whose signature failed.
        operation: String,
        /// Underlying failure.
        #[source]
        source: SignatureError,
    },
}

impl From<TableError> for ErrorEnvelope {
    fn from(error: TableError) -> Self {
        let message = error.to_string();
        match error {
            TableError::DuplicateOperation { operation } => Self::invariant(
                ErrorCode::new("host", "duplicate_operation"),
                message,
            )
            .with_metadata("operation", operation),
            TableError::Signature { operation, source } => {
                let inner: Self = source.into();
                Self::invariant(inner.code, message).with_metadata("operation", operation)
            },
        }
    }
}

/// Immutable set of operation signatures.
///
/// Built once at startup and shared behind an `Arc`; every invocation reads
/// the same signatures.
#[derive(Debug, Clone, Default)]
pub struct OperationTable {
    signatures: BTreeMap<String, Arc<OperationSignature>>,
}

impl OperationTable {
    /// Start an empty table.
    #[must_use]
    pub fn builder() -> OperationTableBuilder {
        OperationTableBuilder::default()
    }

    /// Signature registered under `operation`.
    #[must_use]
    pub fn get(&self, operation: &str) -> Option<&OperationSignature> {
        self.signatures.get(operation).map(AsRef::as_ref)
    }

    /// Registered operation names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.signatures.keys().map(String::as_str)
    }

    /// Number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Returns true when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Freeze into a shareable handle.
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

/// Collects signatures for an [`OperationTable`].
#[derive(Debug, Default)]
pub struct OperationTableBuilder {
    signatures: BTreeMap<String, Arc<OperationSignature>>,
}

impl OperationTableBuilder {
    /// Register the signature declared by an [`Operation`] type.
    pub fn register<O: Operation>(self) -> Result<Self, TableError> {
        let signature = O::signature().map_err(|source| TableError::Signature {
            operation: O::NAME.to_string(),
            source,
        })?;
        self.register_signature(signature)
    }

    /// Register an already built signature.
    pub fn register_signature(mut self, signature: OperationSignature) -> Result<Self, TableError> {
        let operation = signature.name().to_string();
        if self.signatures.contains_key(&operation) {
            return Err(TableError::DuplicateOperation { operation });
        }
        tracing::debug!(
            operation = %operation,
            parameters = signature.len(),
            "operation registered"
        );
        self.signatures.insert(operation, Arc::new(signature));
        Ok(self)
    }

    /// Finish the table.
    #[must_use]
    pub fn build(self) -> OperationTable {
        OperationTable {
            signatures: self.signatures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use request_guard_validation::{Required, RuleSpec};
    use std::error::Error;

    fn signature(name: &str) -> Result<OperationSignature, SignatureError> {
        OperationSignature::builder(name)
            .parameter("id", [RuleSpec::new(Required::new())])
            .build()
    }

    #[test]
    fn duplicate_operations_are_rejected() -> Result<(), Box<dyn Error>> {
        let builder = OperationTable::builder().register_signature(signature("getUser")?)?;
        let result = builder.register_signature(signature("getUser")?);
        assert!(matches!(
            result,
            Err(TableError::DuplicateOperation { operation }) if operation == "getUser"
        ));
        Ok(())
    }

    #[test]
    fn names_are_sorted() -> Result<(), Box<dyn Error>> {
        let table = OperationTable::builder()
            .register_signature(signature("updateUser")?)?
            .register_signature(signature("createUser")?)?
            .build();
        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["createUser", "updateUser"]);
        assert_eq!(table.get("createUser").map(OperationSignature::len), Some(1));
        assert!(table.get("deleteUser").is_none());
        Ok(())
    }

    #[test]
    fn duplicate_maps_to_invariant_envelope() {
        let envelope: ErrorEnvelope = TableError::DuplicateOperation {
            operation: "x".to_string(),
        }
        .into();
        assert_eq!(envelope.kind, request_guard_shared::ErrorKind::Invariant);
        assert_eq!(envelope.code.code(), "duplicate_operation");
    }
}
