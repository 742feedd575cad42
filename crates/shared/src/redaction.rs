//! Secret detection and redaction utilities.
//!
//! Argument names and error metadata keys pass through [`is_secret_key`]
//! before their values reach a log line or a rendered response.

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

/// Checks if a key/argument name likely refers to a secret.
///
/// Matching is case-insensitive and ignores `_`/`-` separators so that
/// `apiKey`, `api_key` and `API-KEY` are treated alike.
///
/// # Examples
///
/// ```
/// use request_guard_shared::is_secret_key;
///
/// assert!(is_secret_key("password"));
/// assert!(is_secret_key("apiKey"));
/// assert!(is_secret_key("X-Auth-Token"));
/// assert!(!is_secret_key("email"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let key: String = key
        .chars()
        .filter(|ch| *ch != '_' && *ch != '-')
        .map(|ch| ch.to_ascii_uppercase())
        .collect();
    key.contains("APIKEY")
        || key.contains("TOKEN")
        || key.contains("SECRET")
        || key.contains("PASSWORD")
        || key.contains("CREDENTIAL")
        || key.contains("AUTH")
}

/// Redacts a value if the key is likely a secret.
///
/// # Examples
///
/// ```
/// use request_guard_shared::redact_if_secret;
///
/// assert_eq!(redact_if_secret("password", "hunter2"), "[REDACTED]");
/// assert_eq!(redact_if_secret("email", "a@b.com"), "a@b.com");
/// ```
pub fn redact_if_secret(key: &str, value: &str) -> String {
    if is_secret_key(key) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}
