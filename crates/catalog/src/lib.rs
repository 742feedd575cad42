//! # request-guard-catalog
//!
//! Error definitions and the builder that turns a code plus dynamic content
//! into a [`StructuredError`].
//!
//! The registry is loaded once and read many times. Unknown codes are a
//! hard failure ([`UnknownErrorCode`]); nothing here falls back to a generic
//! message.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod builder;
pub mod definition;
pub mod error;
pub mod registry;

pub use builder::{DEFAULT_MODULE, ErrorBuilder, SERVICE_NAME, StructuredError};
pub use definition::{DEFAULT_STATUS, ErrorDefinition, Severity};
pub use error::{CatalogError, UnknownErrorCode};
pub use registry::{ErrorRegistry, global, install_global};
