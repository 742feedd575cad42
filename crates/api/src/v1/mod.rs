//! API v1 DTOs and helpers.

mod mappers;
mod mapping;
mod render;
mod schema;
mod types;

pub use mappers::{
    error_code_to_api_v1, error_envelope_to_api_v1_error, report_to_api_v1_rejection,
    result_to_api_v1_result, structured_error_to_api_v1,
};
pub use mapping::{ResponseMapper, map_all};
pub use render::{RenderError, render_structured_error, render_template};
pub use schema::{api_v1_error_schema, api_v1_rejection_schema};
pub use types::*;
