//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict (blank or unknown values fail fast) and reads from a
//! plain key/value map so tests never touch the process environment.

use crate::schema::{GuardConfig, LogFormat, LogLevel, ValidatedGuardConfig};
use request_guard_shared::{ErrorCode, ErrorEnvelope, redact_if_secret};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Env var: owning service name.
pub const ENV_SERVICE_NAME: &str = "REQUEST_GUARD_SERVICE_NAME";
/// Env var: default module for structured errors.
pub const ENV_DEFAULT_MODULE: &str = "REQUEST_GUARD_DEFAULT_MODULE";
/// Env var: error catalog path.
pub const ENV_CATALOG_PATH: &str = "REQUEST_GUARD_CATALOG_PATH";
/// Env var: log level.
pub const ENV_LOG_LEVEL: &str = "REQUEST_GUARD_LOG_LEVEL";
/// Env var: log format (`text` or `json`).
pub const ENV_LOG_FORMAT: &str = "REQUEST_GUARD_LOG_FORMAT";

const ALL_ENV_VARS: [&str; 5] = [
    ENV_SERVICE_NAME,
    ENV_DEFAULT_MODULE,
    ENV_CATALOG_PATH,
    ENV_LOG_LEVEL,
    ENV_LOG_FORMAT,
];

/// Parsed env overrides; `None` leaves the lower layer untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardEnv {
    /// `REQUEST_GUARD_SERVICE_NAME`.
    pub service_name: Option<String>,
    /// `REQUEST_GUARD_DEFAULT_MODULE`.
    pub default_module: Option<String>,
    /// `REQUEST_GUARD_CATALOG_PATH`.
    pub catalog_path: Option<PathBuf>,
    /// `REQUEST_GUARD_LOG_LEVEL`.
    pub log_level: Option<LogLevel>,
    /// `REQUEST_GUARD_LOG_FORMAT`.
    pub log_format: Option<LogFormat>,
}

impl GuardEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            service_name: parse_optional_trimmed_string(map, ENV_SERVICE_NAME)?,
            default_module: parse_optional_trimmed_string(map, ENV_DEFAULT_MODULE)?,
            catalog_path: parse_optional_trimmed_string(map, ENV_CATALOG_PATH)?
                .map(PathBuf::from),
            log_level: parse_optional_enum(map, ENV_LOG_LEVEL)?,
            log_format: parse_optional_enum(map, ENV_LOG_FORMAT)?,
        })
    }

    /// Parse env overrides from the current process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ALL_ENV_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }
        Self::from_map(&map)
    }
}

/// Apply env overrides on top of `config` and validate the result.
pub fn apply_env_overrides(
    mut config: GuardConfig,
    env: &GuardEnv,
) -> Result<ValidatedGuardConfig, ErrorEnvelope> {
    if let Some(name) = &env.service_name {
        config.service.name.clone_from(name);
    }
    if let Some(module) = &env.default_module {
        config.service.default_module.clone_from(module);
    }
    if let Some(path) = &env.catalog_path {
        config.catalog.path = Some(path.clone());
    }
    if let Some(level) = env.log_level {
        config.log.level = level;
    }
    if let Some(format) = env.log_format {
        config.log.format = format;
    }

    config.validate().map_err(Into::into)
}

/// Env parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// Env var was set but blank.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidEnum { var, value } => envelope
                .with_metadata("env_var", var)
                .with_metadata("value", redact_if_secret(var, &value)),
        }
    }
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<String>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    Ok(Some(trimmed.to_owned()))
}

fn parse_optional_enum<T>(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<T>, EnvParseError>
where
    T: std::str::FromStr,
{
    let Some(raw) = parse_optional_trimmed_string(map, var)? else {
        return Ok(None);
    };
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidEnum { var, value: raw })
}
