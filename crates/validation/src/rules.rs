//! Built-in rules and their declarative configuration.
//!
//! Every rule except [`Required`] treats an absent or `null` argument as
//! valid, so optional parameters only need the checks that apply to the
//! value when it is present.

use crate::rule::{Rule, RuleError, RuleSpec};
use crate::value::Supplied;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$";

static EMAIL_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN));

const REQUIRED_MESSAGE: &str = "{field} is required";
const NOT_BLANK_MESSAGE: &str = "{field} must not be blank";
const EMAIL_MESSAGE: &str = "{field} must be a valid format";
const PATTERN_MESSAGE: &str = "{field} does not match the expected pattern";

/// Absent or `null` arguments fail.
#[derive(Debug, Clone)]
pub struct Required {
    message: String,
}

impl Required {
    /// Rule with the default message.
    #[must_use]
    pub fn new() -> Self {
        Self {
            message: REQUIRED_MESSAGE.to_string(),
        }
    }

    /// Replace the message template.
    #[must_use]
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message = template.into();
        self
    }
}

impl Default for Required {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Required {
    fn kind(&self) -> &'static str {
        "required"
    }

    fn is_valid(&self, value: Supplied<'_>) -> bool {
        !value.is_missing()
    }

    fn message_template(&self) -> &str {
        &self.message
    }
}

/// Strings must contain a non-whitespace character; arrays and objects must
/// not be empty.
#[derive(Debug, Clone)]
pub struct NotBlank {
    message: String,
}

impl NotBlank {
    /// Rule with the default message.
    #[must_use]
    pub fn new() -> Self {
        Self {
            message: NOT_BLANK_MESSAGE.to_string(),
        }
    }

    /// Replace the message template.
    #[must_use]
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message = template.into();
        self
    }
}

impl Default for NotBlank {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for NotBlank {
    fn kind(&self) -> &'static str {
        "not_blank"
    }

    fn is_valid(&self, value: Supplied<'_>) -> bool {
        match value.value() {
            None | Some(Value::Null | Value::Bool(_) | Value::Number(_)) => true,
            Some(Value::String(text)) => !text.trim().is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(entries)) => !entries.is_empty(),
        }
    }

    fn message_template(&self) -> &str {
        &self.message
    }
}

/// Strings must look like `local@domain.tld`.
#[derive(Debug, Clone)]
pub struct Email {
    message: String,
}

impl Email {
    /// Rule with the default message.
    #[must_use]
    pub fn new() -> Self {
        Self {
            message: EMAIL_MESSAGE.to_string(),
        }
    }

    /// Replace the message template.
    #[must_use]
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message = template.into();
        self
    }
}

impl Default for Email {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Email {
    fn kind(&self) -> &'static str {
        "email"
    }

    fn is_valid(&self, value: Supplied<'_>) -> bool {
        match value.value() {
            None | Some(Value::Null) => true,
            Some(Value::String(text)) => is_email_shaped(text),
            Some(_) => false,
        }
    }

    fn message_template(&self) -> &str {
        &self.message
    }
}

// `local@label.label[...]`: no whitespace, one `@`, no empty domain labels.
fn is_email_shaped(text: &str) -> bool {
    EMAIL_REGEX
        .as_ref()
        .is_ok_and(|regex| regex.is_match(text))
}

/// Strings must match a regular expression.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    message: String,
}

impl Pattern {
    /// Compile the pattern.
    pub fn new(pattern: &str) -> Result<Self, RuleError> {
        let regex = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            regex,
            message: PATTERN_MESSAGE.to_string(),
        })
    }

    /// Replace the message template.
    #[must_use]
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message = template.into();
        self
    }

    /// Source pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Rule for Pattern {
    fn kind(&self) -> &'static str {
        "pattern"
    }

    fn is_valid(&self, value: Supplied<'_>) -> bool {
        match value.value() {
            None | Some(Value::Null) => true,
            Some(Value::String(text)) => self.regex.is_match(text),
            Some(_) => false,
        }
    }

    fn message_template(&self) -> &str {
        &self.message
    }
}

/// Numbers must fall within inclusive bounds.
#[derive(Debug, Clone)]
pub struct Range {
    min: Option<f64>,
    max: Option<f64>,
    message: String,
}

impl Range {
    /// Build a range; at least one side may be open.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Result<Self, RuleError> {
        let non_finite = |bound: Option<f64>| bound.is_some_and(|value| !value.is_finite());
        if non_finite(min) || non_finite(max) {
            return Err(RuleError::NonFiniteBound { kind: "range" });
        }
        if let (Some(low), Some(high)) = (min, max) {
            if low > high {
                return Err(RuleError::InvertedBounds {
                    kind: "range",
                    min: low.to_string(),
                    max: high.to_string(),
                });
            }
        }
        let message = bounds_message("{field} must be", min, max);
        Ok(Self { min, max, message })
    }

    /// Replace the message template.
    #[must_use]
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message = template.into();
        self
    }

    fn contains(&self, number: f64) -> bool {
        self.min.is_none_or(|low| number >= low) && self.max.is_none_or(|high| number <= high)
    }
}

impl Rule for Range {
    fn kind(&self) -> &'static str {
        "range"
    }

    fn is_valid(&self, value: Supplied<'_>) -> bool {
        match value.value() {
            None | Some(Value::Null) => true,
            Some(Value::Number(number)) => number.as_f64().is_some_and(|n| self.contains(n)),
            Some(_) => false,
        }
    }

    fn message_template(&self) -> &str {
        &self.message
    }
}

/// Strings (in characters) and arrays (in items) must have a bounded length.
#[derive(Debug, Clone)]
pub struct Length {
    min: Option<usize>,
    max: Option<usize>,
    message: String,
}

impl Length {
    /// Build a length rule; either side may be open.
    pub fn new(min: Option<usize>, max: Option<usize>) -> Result<Self, RuleError> {
        if let (Some(low), Some(high)) = (min, max) {
            if low > high {
                return Err(RuleError::InvertedBounds {
                    kind: "length",
                    min: low.to_string(),
                    max: high.to_string(),
                });
            }
        }
        let message = bounds_message("{field} length must be", min, max);
        Ok(Self { min, max, message })
    }

    /// Replace the message template.
    #[must_use]
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message = template.into();
        self
    }

    fn contains(&self, length: usize) -> bool {
        self.min.is_none_or(|low| length >= low) && self.max.is_none_or(|high| length <= high)
    }
}

impl Rule for Length {
    fn kind(&self) -> &'static str {
        "length"
    }

    fn is_valid(&self, value: Supplied<'_>) -> bool {
        match value.value() {
            None | Some(Value::Null) => true,
            Some(Value::String(text)) => self.contains(text.chars().count()),
            Some(Value::Array(items)) => self.contains(items.len()),
            Some(_) => false,
        }
    }

    fn message_template(&self) -> &str {
        &self.message
    }
}

fn bounds_message<T: std::fmt::Display>(prefix: &str, min: Option<T>, max: Option<T>) -> String {
    match (min, max) {
        (Some(low), Some(high)) => format!("{prefix} between {low} and {high}"),
        (Some(low), None) => format!("{prefix} at least {low}"),
        (None, Some(high)) => format!("{prefix} at most {high}"),
        (None, None) => format!("{prefix} a valid value"),
    }
}

/// Declarative form of the built-in rules, as written in signature files.
///
/// ```toml
/// rules = [{ rule = "required" }, { rule = "length", max = 64 }]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleConfig {
    /// See [`Required`].
    Required {
        /// Custom message template.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// See [`NotBlank`].
    NotBlank {
        /// Custom message template.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// See [`Email`].
    Email {
        /// Custom message template.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// See [`Pattern`].
    Pattern {
        /// Regular expression.
        pattern: String,
        /// Custom message template.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// See [`Range`].
    Range {
        /// Inclusive lower bound.
        #[serde(default)]
        min: Option<f64>,
        /// Inclusive upper bound.
        #[serde(default)]
        max: Option<f64>,
        /// Custom message template.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// See [`Length`].
    Length {
        /// Inclusive lower bound.
        #[serde(default)]
        min: Option<usize>,
        /// Inclusive upper bound.
        #[serde(default)]
        max: Option<usize>,
        /// Custom message template.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl RuleConfig {
    /// Build the configured rule.
    pub fn into_rule(self) -> Result<RuleSpec, RuleError> {
        let spec = match self {
            Self::Required { message } => {
                RuleSpec::new(apply(Required::new(), message, |rule, t| rule.with_message(t)))
            },
            Self::NotBlank { message } => {
                RuleSpec::new(apply(NotBlank::new(), message, |rule, t| rule.with_message(t)))
            },
            Self::Email { message } => {
                RuleSpec::new(apply(Email::new(), message, |rule, t| rule.with_message(t)))
            },
            Self::Pattern { pattern, message } => {
                let rule = Pattern::new(&pattern)?;
                RuleSpec::new(apply(rule, message, |rule, t| rule.with_message(t)))
            },
            Self::Range { min, max, message } => {
                let rule = Range::new(min, max)?;
                RuleSpec::new(apply(rule, message, |rule, t| rule.with_message(t)))
            },
            Self::Length { min, max, message } => {
                let rule = Length::new(min, max)?;
                RuleSpec::new(apply(rule, message, |rule, t| rule.with_message(t)))
            },
        };
        Ok(spec)
    }
}

impl TryFrom<RuleConfig> for RuleSpec {
    type Error = RuleError;

    fn try_from(config: RuleConfig) -> Result<Self, Self::Error> {
        config.into_rule()
    }
}

fn apply<R>(rule: R, message: Option<String>, with_message: impl FnOnce(R, String) -> R) -> R {
    match message {
        Some(template) => with_message(rule, template),
        None => rule,
    }
}
