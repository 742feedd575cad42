//! Supplied argument values.

use serde_json::Value;
use std::collections::BTreeMap;

/// Caller-supplied arguments keyed by parameter name.
pub type ArgumentMap = BTreeMap<String, Value>;

/// The argument seen by a rule: either absent or a concrete JSON value.
///
/// `Absent` means the caller did not send the key at all. An explicit
/// `null` is `Present(Value::Null)`; rules decide whether the two differ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Supplied<'a> {
    /// No argument was supplied for the parameter.
    Absent,
    /// The supplied value.
    Present(&'a Value),
}

impl<'a> Supplied<'a> {
    /// Resolve a parameter by name.
    #[must_use]
    pub fn lookup(arguments: &'a ArgumentMap, name: &str) -> Self {
        arguments.get(name).map_or(Self::Absent, Self::Present)
    }

    /// Returns true when no argument was supplied.
    #[must_use]
    pub const fn is_absent(self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns true when the argument is absent or an explicit `null`.
    #[must_use]
    pub const fn is_missing(self) -> bool {
        matches!(self, Self::Absent | Self::Present(Value::Null))
    }

    /// The supplied value, if any.
    #[must_use]
    pub const fn value(self) -> Option<&'a Value> {
        match self {
            Self::Absent => None,
            Self::Present(value) => Some(value),
        }
    }
}

impl<'a> From<Option<&'a Value>> for Supplied<'a> {
    fn from(value: Option<&'a Value>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}
