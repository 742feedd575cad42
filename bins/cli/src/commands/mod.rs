//! CLI command handlers.

pub mod build_error;
pub mod catalog;
pub mod config;
pub mod info;
pub mod validate;

pub use build_error::{BuildErrorInput, run_error_build};
pub use catalog::{run_catalog_list, run_catalog_show};
pub use config::run_config_show;
pub use info::run_info;
pub use validate::{ValidateInput, run_validate};
