//! Operation signatures: the per-operation registration table of parameters
//! and their ordered rules.
//!
//! A signature is built once, when the operation is registered, and then
//! read by every pipeline run for that operation.

use crate::rule::{RuleError, RuleSpec};
use crate::rules::RuleConfig;
use request_guard_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A declared parameter and the rules attached to it, in declaration order.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    name: Option<String>,
    rules: Vec<RuleSpec>,
}

impl ParameterSpec {
    /// Named parameter with no rules.
    ///
    /// A blank name makes the parameter nameless. A name with surrounding
    /// whitespace is rejected when the signature is built.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            rules: Vec::new(),
        }
    }

    /// Parameter whose name is unavailable.
    #[must_use]
    pub const fn unnamed() -> Self {
        Self {
            name: None,
            rules: Vec::new(),
        }
    }

    /// Append a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: RuleSpec) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append several rules, keeping their order.
    #[must_use]
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = RuleSpec>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Declared name, as given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name usable as a report key: present and not blank.
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    /// Attached rules.
    #[must_use]
    pub fn rules(&self) -> &[RuleSpec] {
        &self.rules
    }
}

/// The declared parameter list of one operation.
#[derive(Debug, Clone)]
pub struct OperationSignature {
    name: String,
    parameters: Vec<ParameterSpec>,
}

impl OperationSignature {
    /// Start building a signature for `operation`.
    pub fn builder(operation: impl Into<String>) -> SignatureBuilder {
        SignatureBuilder {
            name: operation.into(),
            parameters: Vec::new(),
        }
    }

    /// Operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Number of declared parameters, named or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Returns true when the operation declares no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Build from the declarative form.
    pub fn from_config(config: SignatureConfig) -> Result<Self, SignatureError> {
        let mut builder = Self::builder(config.operation);
        for parameter in config.parameters {
            let label = parameter.name.clone().unwrap_or_default();
            let rules = parameter
                .rules
                .into_iter()
                .map(RuleConfig::into_rule)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| SignatureError::Rule {
                    parameter: label,
                    source,
                })?;
            let spec = parameter
                .name
                .map_or_else(ParameterSpec::unnamed, ParameterSpec::new)
                .with_rules(rules);
            builder = builder.push(spec);
        }
        builder.build()
    }

    /// Parse a TOML signature file.
    pub fn from_toml_str(input: &str) -> Result<Self, SignatureError> {
        let config: SignatureConfig = toml::from_str(input)?;
        Self::from_config(config)
    }

    /// Parse a JSON signature file.
    pub fn from_json_str(input: &str) -> Result<Self, SignatureError> {
        let config: SignatureConfig = serde_json::from_str(input)?;
        Self::from_config(config)
    }

    /// Load a signature file; `.toml` or `.json`.
    pub fn load_from_path(path: &Path) -> Result<Self, SignatureError> {
        let extension = path
            .extension()
            .and_then(|value| value.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let read = || {
            std::fs::read_to_string(path).map_err(|source| SignatureError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        match extension.as_str() {
            "toml" => Self::from_toml_str(&read()?),
            "json" => Self::from_json_str(&read()?),
            _ => Err(SignatureError::UnsupportedFormat { extension }),
        }
    }
}

/// Incremental [`OperationSignature`] construction.
#[derive(Debug, Clone)]
pub struct SignatureBuilder {
    name: String,
    parameters: Vec<ParameterSpec>,
}

impl SignatureBuilder {
    /// Declare a named parameter with its rules.
    #[must_use]
    pub fn parameter(
        self,
        name: impl Into<String>,
        rules: impl IntoIterator<Item = RuleSpec>,
    ) -> Self {
        self.push(ParameterSpec::new(name).with_rules(rules))
    }

    /// Declare a parameter whose name is unavailable.
    #[must_use]
    pub fn unnamed_parameter(self, rules: impl IntoIterator<Item = RuleSpec>) -> Self {
        self.push(ParameterSpec::unnamed().with_rules(rules))
    }

    /// Declare a prepared parameter.
    #[must_use]
    pub fn push(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Finish; the operation name must not be blank and field names must be
    /// unique and unpadded. The operation name is trimmed.
    pub fn build(self) -> Result<OperationSignature, SignatureError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(SignatureError::BlankOperation);
        }
        let mut seen = BTreeSet::new();
        for parameter in &self.parameters {
            let Some(field) = parameter.field_name() else {
                continue;
            };
            if field.trim() != field {
                return Err(SignatureError::PaddedParameter {
                    operation: name,
                    parameter: field.to_string(),
                });
            }
            if !seen.insert(field) {
                return Err(SignatureError::DuplicateParameter {
                    operation: name,
                    parameter: field.to_string(),
                });
            }
        }
        Ok(OperationSignature {
            name,
            parameters: self.parameters,
        })
    }
}

/// Signature file contents.
///
/// ```toml
/// operation = "create_user"
///
/// [[parameters]]
/// name = "email"
/// rules = [{ rule = "required" }, { rule = "email" }]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureConfig {
    /// Operation name.
    pub operation: String,
    /// Declared parameters in order.
    #[serde(default)]
    pub parameters: Vec<ParameterConfig>,
}

/// One parameter in a signature file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterConfig {
    /// Parameter name; omitted names are excluded from validation.
    #[serde(default)]
    pub name: Option<String>,
    /// Rules in evaluation order.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// Failures while building a signature.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// Operation name is empty.
    #[error("operation name must not be blank")]
    BlankOperation,
    /// Two parameters share a field name.
    #[error("operation `{operation}` declares parameter `{parameter}` more than once")]
    DuplicateParameter {
        /// Operation being built.
        operation: String,
        /// Repeated parameter name.
        parameter: String,
    },
    /// A parameter name has leading or trailing whitespace.
    #[error("operation `{operation}` declares parameter `{parameter}` with surrounding whitespace")]
    PaddedParameter {
        /// Operation being built.
        operation: String,
        /// Name as declared.
        parameter: String,
    },
    /// A rule could not be built.
    #[error("invalid rule on parameter `{parameter}`: {source}")]
    Rule {
        /// Parameter the rule belongs to.
        parameter: String,
        /// Rule failure.
        #[source]
        source: RuleError,
    },
    /// Signature TOML did not parse.
    #[error("invalid signature TOML: {0}")]
    Toml(#[from] toml::de::Error),
    /// Signature JSON did not parse.
    #[error("invalid signature JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Signature file could not be read.
    #[error("failed to read signature file {}: {source}", .path.display())]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Signature file extension is neither `.toml` nor `.json`.
    #[error("unsupported signature format `{extension}`; use .toml or .json")]
    UnsupportedFormat {
        /// Offending extension.
        extension: String,
    },
}

impl From<SignatureError> for ErrorEnvelope {
    fn from(error: SignatureError) -> Self {
        let code = match &error {
            SignatureError::BlankOperation => "blank_operation",
            SignatureError::DuplicateParameter { .. } => "duplicate_parameter",
            SignatureError::PaddedParameter { .. } => "padded_parameter",
            SignatureError::Rule { .. } => "invalid_rule",
            SignatureError::Toml(_) => "invalid_toml",
            SignatureError::Json(_) => "invalid_json",
            SignatureError::Io { .. } => "signature_io",
            SignatureError::UnsupportedFormat { .. } => "unsupported_format",
        };
        let message = error.to_string();
        let envelope = Self::expected(ErrorCode::new("signature", code), message);
        match error {
            SignatureError::Io { path, .. } => {
                envelope.with_metadata("path", path.to_string_lossy().to_string())
            },
            SignatureError::DuplicateParameter { parameter, .. }
            | SignatureError::PaddedParameter { parameter, .. }
            | SignatureError::Rule { parameter, .. } => envelope.with_metadata("parameter", parameter),
            _ => envelope,
        }
    }
}
