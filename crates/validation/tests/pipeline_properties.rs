//! Pipeline guarantees: every parameter evaluated, every failure kept.

use proptest::prelude::*;
use request_guard_validation::{
    ArgumentMap, Email, OperationSignature, PipelineState, Required, Rule, RuleSpec, Supplied,
    ValidationPipeline, ValidationReport,
};
use serde_json::json;
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct Calls {
    total: AtomicUsize,
    absent: AtomicUsize,
}

#[derive(Debug)]
struct Counting(Arc<Calls>);

impl Rule for Counting {
    fn kind(&self) -> &'static str {
        "counting"
    }

    fn is_valid(&self, value: Supplied<'_>) -> bool {
        self.0.total.fetch_add(1, Ordering::SeqCst);
        if value.is_absent() {
            self.0.absent.fetch_add(1, Ordering::SeqCst);
        }
        true
    }

    fn message_template(&self) -> &str {
        "{field} was counted"
    }
}

#[derive(Debug)]
struct Verdict {
    valid: bool,
    label: &'static str,
}

impl Rule for Verdict {
    fn kind(&self) -> &'static str {
        "verdict"
    }

    fn is_valid(&self, _value: Supplied<'_>) -> bool {
        self.valid
    }

    fn message_template(&self) -> &str {
        self.label
    }
}

fn create_user() -> Result<OperationSignature, Box<dyn Error>> {
    Ok(OperationSignature::builder("create_user")
        .parameter("id", [RuleSpec::new(Required::new())])
        .parameter(
            "email",
            [RuleSpec::new(Required::new()), RuleSpec::new(Email::new())],
        )
        .build()?)
}

proptest! {
    #[test]
    fn every_declared_parameter_is_evaluated(declared in 0usize..12, supplied_mask in any::<u16>()) {
        let calls = Arc::new(Calls::default());
        let mut builder = OperationSignature::builder("counted");
        let mut arguments = ArgumentMap::new();
        let mut supplied = 0;
        for index in 0..declared {
            let name = format!("p{index}");
            if supplied_mask & (1 << index) != 0 {
                arguments.insert(name.clone(), json!(index));
                supplied += 1;
            }
            builder = builder.parameter(name, [RuleSpec::new(Counting(Arc::clone(&calls)))]);
        }
        let signature = builder.build().map_err(|err| TestCaseError::fail(err.to_string()))?;

        let outcome = ValidationPipeline::new(&signature).run(&arguments);

        prop_assert_eq!(outcome.evaluated(), declared);
        prop_assert_eq!(calls.total.load(Ordering::SeqCst), declared);
        prop_assert_eq!(calls.absent.load(Ordering::SeqCst), declared - supplied);
        prop_assert!(outcome.is_valid());
    }

    #[test]
    fn validity_never_reverts(failures in proptest::collection::vec(("[a-c]", "[a-z]{1,6}"), 0..16)) {
        let mut report = ValidationReport::new();
        let mut seen_failure = false;
        for (field, message) in failures {
            report.add_failure(field, message);
            seen_failure = true;
            prop_assert!(!report.is_valid());
        }
        prop_assert_eq!(report.is_valid(), !seen_failure);
        prop_assert_eq!(report.is_valid(), report.is_empty());
    }
}

#[test]
fn failing_rules_are_all_reported_in_order() -> Result<(), Box<dyn Error>> {
    let signature = OperationSignature::builder("ordered")
        .parameter(
            "code",
            [
                RuleSpec::new(Verdict {
                    valid: false,
                    label: "{field} failed R1",
                }),
                RuleSpec::new(Verdict {
                    valid: false,
                    label: "{field} failed R2",
                }),
                RuleSpec::new(Verdict {
                    valid: true,
                    label: "{field} failed R3",
                }),
            ],
        )
        .build()?;

    let outcome = ValidationPipeline::new(&signature).run(&ArgumentMap::new());
    assert_eq!(
        outcome.report().messages("code"),
        Some(["code failed R1".to_string(), "code failed R2".to_string()].as_slice())
    );
    assert_eq!(outcome.report().failure_count(), 2);
    Ok(())
}

#[test]
fn missing_id_and_bad_email_are_reported_together() -> Result<(), Box<dyn Error>> {
    let signature = create_user()?;
    let arguments: ArgumentMap = serde_json::from_value(json!({"email": "not-an-email"}))?;

    let outcome = ValidationPipeline::new(&signature).run(&arguments);

    assert_eq!(outcome.state(), PipelineState::CompleteInvalid);
    assert!(!outcome.is_valid());
    assert_eq!(
        serde_json::to_value(outcome.report())?,
        json!({
            "id": ["id is required"],
            "email": ["email must be a valid format"]
        })
    );
    Ok(())
}

#[test]
fn complete_arguments_pass_untouched() -> Result<(), Box<dyn Error>> {
    let signature = create_user()?;
    let arguments: ArgumentMap = serde_json::from_value(json!({"id": "42", "email": "a@b.com"}))?;
    let before = arguments.clone();

    let outcome = ValidationPipeline::new(&signature).run(&arguments);

    assert_eq!(outcome.state(), PipelineState::CompleteValid);
    assert!(outcome.report().is_valid());
    assert_eq!(serde_json::to_value(outcome.report())?, json!({}));
    assert_eq!(arguments, before);
    Ok(())
}

#[test]
fn explicit_null_counts_as_missing_for_required() -> Result<(), Box<dyn Error>> {
    let signature = create_user()?;
    let arguments: ArgumentMap = serde_json::from_value(json!({"id": null, "email": null}))?;

    let report = ValidationPipeline::new(&signature).run(&arguments).into_report();
    assert_eq!(report.messages("id"), Some(["id is required".to_string()].as_slice()));
    assert_eq!(
        report.messages("email"),
        Some(["email is required".to_string()].as_slice())
    );
    Ok(())
}

#[test]
fn concurrent_runs_share_one_signature() -> Result<(), Box<dyn Error>> {
    let signature = Arc::new(create_user()?);
    let handles: Vec<_> = (0..8)
        .map(|index| {
            let signature = Arc::clone(&signature);
            std::thread::spawn(move || {
                let mut arguments = ArgumentMap::new();
                if index % 2 == 0 {
                    arguments.insert("id".to_string(), json!(index));
                    arguments.insert("email".to_string(), json!("a@b.com"));
                }
                ValidationPipeline::new(&signature).run(&arguments).is_valid()
            })
        })
        .collect();

    for (index, handle) in handles.into_iter().enumerate() {
        let valid = handle.join().map_err(|_| "validation thread panicked")?;
        assert_eq!(valid, index % 2 == 0);
    }
    Ok(())
}
