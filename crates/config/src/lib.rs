//! # request-guard-config
//!
//! Configuration schema, env overrides and loading for the guard host and
//! the CLI. This crate depends on `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (file + env).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use env::{
    ENV_CATALOG_PATH, ENV_DEFAULT_MODULE, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_SERVICE_NAME,
    EnvParseError, GuardEnv, apply_env_overrides,
};
pub use load::{
    load_guard_config_from_path, load_guard_config_std_env, to_pretty_json, to_pretty_toml,
};
pub use schema::{
    CatalogConfig, ConfigSchemaError, DEFAULT_MODULE_NAME, DEFAULT_SERVICE_NAME, GuardConfig,
    LogConfig, LogFormat, LogLevel, ServiceConfig, ValidatedGuardConfig, parse_guard_config_json,
    parse_guard_config_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use request_guard_shared::shared_crate_version;

    #[test]
    fn config_crate_compiles() {
        assert!(!config_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }
}
