//! # request-guard-host
//!
//! Wires the engines to a request boundary. Operations are registered once
//! in an [`OperationTable`]; a [`Guard`] validates every invocation against
//! its signature before the handler is reached, and renders rejections and
//! domain errors into API v1 payloads.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod error;
pub mod guard;
pub mod table;
pub mod telemetry;

pub use error::GuardError;
pub use guard::Guard;
pub use table::{OperationTable, OperationTableBuilder, TableError};
pub use telemetry::{TelemetryError, init_tracing};

/// Returns the host crate version.
#[must_use]
pub const fn host_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
