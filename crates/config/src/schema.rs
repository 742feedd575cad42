//! Guard configuration schema, defaults and validation.
//!
//! - Deserialization uses `serde` (TOML or JSON) with unknown fields rejected.
//! - Validation is manual and returns typed errors mapped to `ErrorEnvelope`.

use request_guard_shared::{ErrorCode, ErrorEnvelope, Validated};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default owning service name.
pub const DEFAULT_SERVICE_NAME: &str = "request-guard";
/// Default module recorded on structured errors.
pub const DEFAULT_MODULE_NAME: &str = "validation";

const SERVICE_NAME_MAX_CHARS: usize = 128;

/// Config that passed [`GuardConfig::validate`].
pub type ValidatedGuardConfig = Validated<GuardConfig>;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct GuardConfig {
    /// Service identity stamped on structured errors.
    pub service: ServiceConfig,
    /// Error catalog source.
    pub catalog: CatalogConfig,
    /// Logging output.
    pub log: LogConfig,
}

impl GuardConfig {
    /// Validate the merged config.
    pub fn validate(self) -> Result<ValidatedGuardConfig, ConfigSchemaError> {
        self.service.validate()?;
        self.catalog.validate()?;
        Ok(Validated::new(self))
    }
}

/// Service identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ServiceConfig {
    /// Owning service name.
    pub name: String,
    /// Module used when error construction does not name one.
    pub default_module: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVICE_NAME.to_string(),
            default_module: DEFAULT_MODULE_NAME.to_string(),
        }
    }
}

impl ServiceConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        validate_identifier("service", "name", &self.name)?;
        validate_identifier("service", "defaultModule", &self.default_module)
    }
}

/// Error catalog source; the built-in catalog is used without a path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CatalogConfig {
    /// Catalog file (`.toml` or `.json`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl CatalogConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        match &self.path {
            Some(path) if path.as_os_str().is_empty() => Err(ConfigSchemaError::EmptyField {
                section: "catalog",
                field: "path",
            }),
            _ => Ok(()),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LogConfig {
    /// Minimum level; `RUST_LOG` takes precedence at runtime.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything.
    Trace,
    /// Debug and above.
    Debug,
    /// Info and above.
    #[default]
    Info,
    /// Warnings and errors.
    Warn,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// Filter directive name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// One step more verbose, saturating at `trace`.
    #[must_use]
    pub const fn more_verbose(self) -> Self {
        match self {
            Self::Error => Self::Warn,
            Self::Warn => Self::Info,
            Self::Info => Self::Debug,
            Self::Debug | Self::Trace => Self::Trace,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(()),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

fn validate_identifier(
    section: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ConfigSchemaError> {
    if value.trim().is_empty() {
        return Err(ConfigSchemaError::EmptyField { section, field });
    }
    let len = value.chars().count();
    if len > SERVICE_NAME_MAX_CHARS {
        return Err(ConfigSchemaError::TooLong {
            section,
            field,
            len,
            max: SERVICE_NAME_MAX_CHARS,
        });
    }
    Ok(())
}

/// Parse a guard config from a JSON string and validate it.
pub fn parse_guard_config_json(input: &str) -> Result<ValidatedGuardConfig, ErrorEnvelope> {
    let config: GuardConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;

    config.validate().map_err(Into::into)
}

/// Parse a guard config from a TOML string and validate it.
pub fn parse_guard_config_toml(input: &str) -> Result<ValidatedGuardConfig, ErrorEnvelope> {
    let config: GuardConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;

    config.validate().map_err(Into::into)
}

/// Schema violations found after merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// A required string is empty or whitespace.
    EmptyField {
        /// Schema section (e.g. `service`).
        section: &'static str,
        /// Field name in the config file (e.g. `defaultModule`).
        field: &'static str,
    },
    /// A string exceeds its length limit.
    TooLong {
        /// Schema section.
        section: &'static str,
        /// Field name in the config file.
        field: &'static str,
        /// Length in characters.
        len: usize,
        /// Maximum allowed.
        max: usize,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyField { .. } => ErrorCode::new("config", "empty_field"),
            Self::TooLong { .. } => ErrorCode::new("config", "field_too_long"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { section, field } => {
                write!(formatter, "{section}.{field} must be non-empty")
            },
            Self::TooLong {
                section,
                field,
                len,
                max,
            } => write!(
                formatter,
                "{section}.{field} is too long ({len} chars, max {max})"
            ),
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let mut envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::EmptyField { section, field } => {
                envelope = envelope
                    .with_metadata("section", section)
                    .with_metadata("field", field);
            },
            ConfigSchemaError::TooLong {
                section,
                field,
                len,
                max,
            } => {
                envelope = envelope
                    .with_metadata("section", section)
                    .with_metadata("field", field)
                    .with_metadata("len", len.to_string())
                    .with_metadata("max", max.to_string());
            },
        }

        envelope
    }
}
