//! The rule capability and its shared handle.

use crate::value::Supplied;
use request_guard_shared::{ErrorCode, ErrorEnvelope};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Placeholder replaced by the parameter name in rule messages.
pub const FIELD_PLACEHOLDER: &str = "{field}";

/// A validation rule bound to one parameter.
///
/// Rules see every supplied state, including [`Supplied::Absent`], and decide
/// for themselves whether it is a violation. New kinds are added by
/// implementing this trait; the evaluator never changes.
pub trait Rule: fmt::Debug + Send + Sync {
    /// Short identifier, e.g. `required`.
    fn kind(&self) -> &'static str;

    /// Returns true when the supplied value satisfies the rule.
    fn is_valid(&self, value: Supplied<'_>) -> bool;

    /// Message template; `{field}` is replaced by the parameter name.
    fn message_template(&self) -> &str;

    /// Field-specific failure message.
    fn message(&self, field: &str) -> String {
        self.message_template().replace(FIELD_PLACEHOLDER, field)
    }
}

/// Immutable, cheaply cloned handle to a rule.
#[derive(Clone)]
pub struct RuleSpec(Arc<dyn Rule>);

impl RuleSpec {
    /// Wrap a rule.
    pub fn new<R>(rule: R) -> Self
    where
        R: Rule + 'static,
    {
        Self(Arc::new(rule))
    }

    /// Rule identifier.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.0.kind()
    }

    /// Evaluate the rule against a supplied value.
    #[must_use]
    pub fn is_valid(&self, value: Supplied<'_>) -> bool {
        self.0.is_valid(value)
    }

    /// Failure message for `field`.
    #[must_use]
    pub fn message(&self, field: &str) -> String {
        self.0.message(field)
    }

    /// Raw message template.
    #[must_use]
    pub fn message_template(&self) -> &str {
        self.0.message_template()
    }
}

impl fmt::Debug for RuleSpec {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, formatter)
    }
}

/// Rule configuration that cannot produce a usable rule.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The pattern is not a valid regular expression.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// Offending pattern.
        pattern: String,
        /// Regex compile error.
        #[source]
        source: regex::Error,
    },
    /// Lower bound greater than upper bound.
    #[error("{kind} rule has min {min} greater than max {max}")]
    InvertedBounds {
        /// Rule kind.
        kind: &'static str,
        /// Lower bound as written.
        min: String,
        /// Upper bound as written.
        max: String,
    },
    /// A numeric bound is NaN or infinite.
    #[error("{kind} rule bound must be finite")]
    NonFiniteBound {
        /// Rule kind.
        kind: &'static str,
    },
}

impl From<RuleError> for ErrorEnvelope {
    fn from(error: RuleError) -> Self {
        let code = match &error {
            RuleError::InvalidPattern { .. } => "invalid_pattern",
            RuleError::InvertedBounds { .. } => "inverted_bounds",
            RuleError::NonFiniteBound { .. } => "non_finite_bound",
        };
        Self::expected(ErrorCode::new("validation", code), error.to_string())
    }
}
