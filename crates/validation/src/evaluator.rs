//! Per-parameter rule evaluation.

use crate::descriptor::ParameterDescriptor;

/// Evaluate every rule on `parameter`, in order, and collect one message per
/// failing rule.
///
/// A failing rule never stops later rules from running. Absence gets no
/// special treatment here; each rule decides what it means.
#[must_use]
pub fn evaluate(parameter: &ParameterDescriptor<'_>) -> Vec<String> {
    parameter
        .rules()
        .iter()
        .filter(|rule| !rule.is_valid(parameter.supplied()))
        .map(|rule| rule.message(parameter.name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Rule, RuleSpec};
    use crate::rules::{Email, Length, Required};
    use crate::value::Supplied;
    use serde_json::json;
    use std::error::Error;

    #[derive(Debug)]
    struct Fixed {
        valid: bool,
        label: &'static str,
    }

    impl Rule for Fixed {
        fn kind(&self) -> &'static str {
            "fixed"
        }

        fn is_valid(&self, _value: Supplied<'_>) -> bool {
            self.valid
        }

        fn message_template(&self) -> &str {
            self.label
        }
    }

    #[test]
    fn failing_rule_does_not_short_circuit() {
        let rules = [
            RuleSpec::new(Fixed {
                valid: false,
                label: "{field}: first",
            }),
            RuleSpec::new(Fixed {
                valid: false,
                label: "{field}: second",
            }),
            RuleSpec::new(Fixed {
                valid: true,
                label: "{field}: third",
            }),
        ];
        let parameter = ParameterDescriptor::new("name", &rules, Supplied::Absent);
        assert_eq!(evaluate(&parameter), vec!["name: first", "name: second"]);
    }

    #[test]
    fn absence_is_left_to_the_rules() -> Result<(), Box<dyn Error>> {
        let rules = [
            RuleSpec::new(Required::new()),
            RuleSpec::new(Email::new()),
            RuleSpec::new(Length::new(Some(3), None)?),
        ];
        let parameter = ParameterDescriptor::new("email", &rules, Supplied::Absent);
        assert_eq!(evaluate(&parameter), vec!["email is required"]);
        Ok(())
    }

    #[test]
    fn valid_value_yields_no_messages() {
        let rules = [RuleSpec::new(Required::new()), RuleSpec::new(Email::new())];
        let value = json!("a@b.com");
        let parameter = ParameterDescriptor::new("email", &rules, Supplied::Present(&value));
        assert!(evaluate(&parameter).is_empty());
    }
}
