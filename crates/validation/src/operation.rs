//! Operations that carry their own signature.

use crate::signature::{OperationSignature, SignatureError};

/// A request type whose parameters and rules are declared on the type.
///
/// Usually derived with `#[derive(Operation)]` from
/// `request-guard-validate-derive`:
///
/// ```ignore
/// #[derive(Deserialize, request_guard_validate_derive::Operation)]
/// #[operation(name = "create_user")]
/// struct CreateUser {
///     #[rule(required)]
///     id: Option<String>,
///     #[rule(required, email)]
///     email: Option<String>,
/// }
/// ```
pub trait Operation {
    /// Operation name used for registration and logging.
    const NAME: &'static str;

    /// Build the parameter table for this operation.
    ///
    /// Fails only when a declared rule is misconfigured, such as an invalid
    /// regular expression.
    fn signature() -> Result<OperationSignature, SignatureError>;
}
