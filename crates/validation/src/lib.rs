//! # request-guard-validation
//!
//! Declarative parameter validation. An operation's parameters and their
//! ordered rules are registered once as an [`OperationSignature`]; each
//! invocation runs a fresh [`ValidationPipeline`] that evaluates every
//! declared parameter (absent ones included), collects every failure, and
//! returns a field-keyed [`ValidationReport`].
//!
//! Violations are data. Nothing in this crate returns an error for a failed
//! rule; errors are reserved for misconfigured rules and signatures.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod descriptor;
pub mod evaluator;
pub mod operation;
pub mod pipeline;
pub mod report;
pub mod rule;
pub mod rules;
pub mod signature;
pub mod value;

pub use descriptor::ParameterDescriptor;
pub use evaluator::evaluate;
pub use operation::Operation;
pub use pipeline::{PipelineState, ValidationOutcome, ValidationPipeline};
pub use report::ValidationReport;
pub use rule::{FIELD_PLACEHOLDER, Rule, RuleError, RuleSpec};
pub use rules::{Email, Length, NotBlank, Pattern, Range, Required, RuleConfig};
pub use signature::{
    OperationSignature, ParameterConfig, ParameterSpec, SignatureBuilder, SignatureConfig,
    SignatureError,
};
pub use value::{ArgumentMap, Supplied};
