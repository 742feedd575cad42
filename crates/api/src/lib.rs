//! # request-guard-api
//!
//! API data transfer objects, template rendering and the mapping seam.
//! This is the rendering boundary: structured errors are interpolated here
//! and nowhere earlier.

/// API v1 DTOs.
pub mod v1;

/// Returns the api crate version.
#[must_use]
pub const fn api_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
