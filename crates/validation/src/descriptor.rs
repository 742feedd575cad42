//! One parameter as seen by a single pipeline run.

use crate::rule::RuleSpec;
use crate::signature::ParameterSpec;
use crate::value::{ArgumentMap, Supplied};

/// A named parameter, its rules, and the argument resolved for it.
///
/// Built per run and dropped with it; borrows rules from the signature.
#[derive(Debug, Clone, Copy)]
pub struct ParameterDescriptor<'a> {
    name: &'a str,
    rules: &'a [RuleSpec],
    supplied: Supplied<'a>,
}

impl<'a> ParameterDescriptor<'a> {
    /// Descriptor from explicit parts.
    #[must_use]
    pub const fn new(name: &'a str, rules: &'a [RuleSpec], supplied: Supplied<'a>) -> Self {
        Self {
            name,
            rules,
            supplied,
        }
    }

    /// Resolve a declared parameter against the caller's arguments.
    ///
    /// Returns `None` when the parameter has no usable name.
    #[must_use]
    pub fn resolve(spec: &'a ParameterSpec, arguments: &'a ArgumentMap) -> Option<Self> {
        let name = spec.field_name()?;
        Some(Self::new(
            name,
            spec.rules(),
            Supplied::lookup(arguments, name),
        ))
    }

    /// Field name used in the report.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Rules in declaration order.
    #[must_use]
    pub const fn rules(&self) -> &'a [RuleSpec] {
        self.rules
    }

    /// Argument resolved for this parameter.
    #[must_use]
    pub const fn supplied(&self) -> Supplied<'a> {
        self.supplied
    }
}
