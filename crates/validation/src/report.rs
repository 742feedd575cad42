//! Field-keyed accumulation of validation failures.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Failure messages keyed by field name.
///
/// A field appears only once it has at least one message, so an empty report
/// is exactly a valid one. Fields keep the order of their first failure, which
/// for a pipeline run is the declared parameter order. Serializes as the bare
/// `field -> [messages]` map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    failures: Vec<(String, Vec<String>)>,
}

impl ValidationReport {
    /// Empty (valid) report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failure for `field`, after any earlier ones.
    pub fn add_failure(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        self.extend_field(&field, std::iter::once(message.into()));
    }

    /// Record several failures for `field`, keeping their order.
    ///
    /// An empty iterator leaves the report untouched.
    pub fn add_failures<I>(&mut self, field: &str, messages: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut messages = messages.into_iter().peekable();
        if messages.peek().is_none() {
            return;
        }
        self.extend_field(field, messages);
    }

    fn extend_field(&mut self, field: &str, messages: impl Iterator<Item = String>) {
        if let Some((_, existing)) = self.failures.iter_mut().find(|(name, _)| name == field) {
            existing.extend(messages);
        } else {
            self.failures.push((field.to_string(), messages.collect()));
        }
    }

    /// Returns true when no failure was recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Messages for one field.
    #[must_use]
    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.failures
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    /// Fields with at least one failure.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|(field, _)| field.as_str())
    }

    /// `(field, messages)` pairs in first-failure order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.failures
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Same as [`Self::is_valid`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of messages across fields.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.iter().map(|(_, messages)| messages.len()).sum()
    }

    /// The `(field, messages)` pairs.
    #[must_use]
    pub fn into_inner(self) -> Vec<(String, Vec<String>)> {
        self.failures
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.failures.len()))?;
        for (field, messages) in &self.failures {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ValidationReport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ReportVisitor)
    }
}

struct ReportVisitor;

impl<'de> Visitor<'de> for ReportVisitor {
    type Value = ValidationReport;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of field names to failure messages")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut report = ValidationReport::new();
        while let Some((field, messages)) = access.next_entry::<String, Vec<String>>()? {
            report.add_failures(&field, messages);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_tracks_emptiness() {
        let mut report = ValidationReport::new();
        assert!(report.is_valid());

        report.add_failures("quiet", Vec::new());
        assert!(report.is_valid());
        assert_eq!(report.messages("quiet"), None);

        report.add_failure("id", "id is required");
        report.add_failure("id", "id must be numeric");
        assert!(!report.is_valid());
        assert_eq!(report.len(), 1);
        assert_eq!(report.failure_count(), 2);
        assert_eq!(
            report.messages("id"),
            Some(["id is required".to_string(), "id must be numeric".to_string()].as_slice())
        );
    }

    #[test]
    fn serializes_as_bare_map() -> Result<(), serde_json::Error> {
        let mut report = ValidationReport::new();
        report.add_failure("email", "email must be a valid format");
        assert_eq!(
            serde_json::to_value(&report)?,
            serde_json::json!({"email": ["email must be a valid format"]})
        );
        Ok(())
    }

    #[test]
    fn fields_keep_first_failure_order() -> Result<(), serde_json::Error> {
        let mut report = ValidationReport::new();
        report.add_failure("zeta", "zeta is required");
        report.add_failure("alpha", "alpha is required");
        report.add_failure("zeta", "zeta must not be blank");

        let fields: Vec<&str> = report.fields().collect();
        assert_eq!(fields, vec!["zeta", "alpha"]);
        assert_eq!(
            serde_json::to_string(&report)?,
            r#"{"zeta":["zeta is required","zeta must not be blank"],"alpha":["alpha is required"]}"#
        );

        let parsed: ValidationReport = serde_json::from_str(
            r#"{"zeta":["zeta is required","zeta must not be blank"],"alpha":["alpha is required"]}"#,
        )?;
        assert_eq!(parsed, report);
        Ok(())
    }
}
