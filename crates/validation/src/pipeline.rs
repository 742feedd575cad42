//! Per-invocation orchestration: resolve, evaluate, accumulate.
//!
//! A pipeline is created for one invocation and consumed by [`ValidationPipeline::run`],
//! so a finished run can never be restarted or reused. Runs share nothing
//! mutable; any number can execute concurrently against one signature.

use crate::descriptor::ParameterDescriptor;
use crate::evaluator::evaluate;
use crate::report::ValidationReport;
use crate::signature::OperationSignature;
use crate::value::ArgumentMap;

/// Lifecycle of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Created, not started.
    Idle,
    /// Evaluating parameters.
    Running,
    /// Finished with an empty report.
    CompleteValid,
    /// Finished with at least one failure.
    CompleteInvalid,
}

impl PipelineState {
    /// Returns true for either complete state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::CompleteValid | Self::CompleteInvalid)
    }
}

/// Validation of one operation invocation.
#[derive(Debug)]
pub struct ValidationPipeline<'s> {
    signature: &'s OperationSignature,
    state: PipelineState,
}

impl<'s> ValidationPipeline<'s> {
    /// Idle pipeline for `signature`.
    #[must_use]
    pub const fn new(signature: &'s OperationSignature) -> Self {
        Self {
            signature,
            state: PipelineState::Idle,
        }
    }

    /// Current state; always `Idle` before [`Self::run`].
    #[must_use]
    pub const fn state(&self) -> PipelineState {
        self.state
    }

    /// Evaluate every declared parameter against `arguments`.
    ///
    /// Parameters the caller did not supply are evaluated as absent.
    /// Parameters without a usable name are skipped and counted as excluded.
    /// Arguments the signature does not declare are ignored.
    pub fn run(mut self, arguments: &ArgumentMap) -> ValidationOutcome {
        self.state = PipelineState::Running;
        let operation = self.signature.name();
        tracing::debug!(
            operation,
            parameters = self.signature.len(),
            supplied = arguments.len(),
            "validation started"
        );

        let mut report = ValidationReport::new();
        let mut evaluated = 0;
        let mut excluded = 0;
        for (position, spec) in self.signature.parameters().iter().enumerate() {
            let Some(parameter) = ParameterDescriptor::resolve(spec, arguments) else {
                tracing::warn!(
                    operation,
                    position,
                    "parameter has no usable name; excluded from validation"
                );
                excluded += 1;
                continue;
            };
            evaluated += 1;
            report.add_failures(parameter.name(), evaluate(&parameter));
        }

        for key in arguments.keys() {
            let declared = self
                .signature
                .parameters()
                .iter()
                .any(|spec| spec.field_name() == Some(key.as_str()));
            if !declared {
                tracing::debug!(operation, argument = %key, "argument not declared; ignored");
            }
        }

        self.state = if report.is_valid() {
            PipelineState::CompleteValid
        } else {
            PipelineState::CompleteInvalid
        };
        tracing::debug!(
            operation,
            evaluated,
            excluded,
            failed_fields = report.len(),
            failures = report.failure_count(),
            "validation finished"
        );

        ValidationOutcome {
            state: self.state,
            report,
            evaluated,
            excluded,
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    state: PipelineState,
    report: ValidationReport,
    evaluated: usize,
    excluded: usize,
}

impl ValidationOutcome {
    /// Terminal state of the run.
    #[must_use]
    pub const fn state(&self) -> PipelineState {
        self.state
    }

    /// Returns true when the operation may proceed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self.state, PipelineState::CompleteValid)
    }

    /// The accumulated report.
    #[must_use]
    pub const fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Take the report.
    #[must_use]
    pub fn into_report(self) -> ValidationReport {
        self.report
    }

    /// Parameters evaluated, named ones only.
    #[must_use]
    pub const fn evaluated(&self) -> usize {
        self.evaluated
    }

    /// Parameters skipped for lack of a usable name.
    #[must_use]
    pub const fn excluded(&self) -> usize {
        self.excluded
    }
}
