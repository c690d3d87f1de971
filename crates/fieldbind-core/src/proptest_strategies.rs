//! Property-based testing strategies for generating test data
//!
//! Random but well-formed results, locales and declarative chain specs for
//! the property tests in this crate.

#![cfg(test)]

use crate::catalog::{ChainSpec, ConverterSpec, ModelKind, ValidatorSpec};
use crate::context::Locale;
use crate::result::{Severity, ValidationResult};
use proptest::option;
use proptest::prelude::*;

pub fn severity_strategy() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Ok),
        Just(Severity::Info),
        Just(Severity::Warning),
        Just(Severity::Error),
    ]
}

pub fn validation_result_strategy() -> impl Strategy<Value = ValidationResult> {
    (severity_strategy(), "[a-zA-Z ]{1,30}")
        .prop_map(|(severity, message)| ValidationResult::create(message, severity))
}

pub fn locale_strategy() -> impl Strategy<Value = Locale> {
    prop_oneof![
        Just(Locale::new("en-US")),
        Just(Locale::new("en-GB")),
        Just(Locale::new("de-DE")),
        Just(Locale::new("fr_FR.UTF-8")),
        Just(Locale::new("ja-JP")),
    ]
}

fn message_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z ]{2,24}"
}

/// Validators that apply to text values
pub fn text_validator_spec_strategy() -> impl Strategy<Value = ValidatorSpec> {
    prop_oneof![
        (message_strategy(), option::of(0usize..5), option::of(5usize..20)).prop_map(|(message, min, max)| {
            ValidatorSpec::Length {
                message,
                min,
                max,
                severity: None,
            }
        }),
        message_strategy().prop_map(|message| ValidatorSpec::Pattern {
            message,
            pattern: "[a-z0-9]+".to_string(),
            severity: None,
        }),
        message_strategy().prop_map(|message| ValidatorSpec::Email {
            message,
            severity: None,
        }),
        (message_strategy(), option::of(severity_strategy()))
            .prop_map(|(message, severity)| ValidatorSpec::NotBlank { message, severity }),
    ]
}

pub fn text_chain_strategy() -> impl Strategy<Value = ChainSpec> {
    (
        option::of(message_strategy()),
        proptest::collection::vec(text_validator_spec_strategy(), 0..4),
    )
        .prop_map(|(required, presentation_validators)| ChainSpec {
            model: ModelKind::Text,
            required,
            presentation_validators,
            ..ChainSpec::default()
        })
}

pub fn integer_chain_strategy() -> impl Strategy<Value = ChainSpec> {
    (message_strategy(), option::of(-5i64..5)).prop_map(|(message, empty)| ChainSpec {
        model: ModelKind::Integer,
        converter: Some(ConverterSpec {
            message: Some(message),
            format: None,
            empty_value: empty.map(|value| value.to_string()),
        }),
        ..ChainSpec::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Binder;
    use crate::catalog;
    use crate::field::MemoryField;
    use std::rc::Rc;

    proptest! {
        #[test]
        fn test_text_chains_serialize_and_apply(chain in text_chain_strategy()) {
            let json = serde_json::to_string(&chain).unwrap();
            let back: ChainSpec = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(&back, &chain);

            let binder: Binder<String> = Binder::new();
            let builder = catalog::apply(&chain, binder.for_field(Rc::new(MemoryField::text())));
            prop_assert!(builder.is_ok());
        }

        #[test]
        fn test_integer_chains_apply(chain in integer_chain_strategy(), input in "[0-9]{1,6}") {
            let field = Rc::new(MemoryField::text());
            let binder: Binder<i64> = Binder::new();
            let binding = catalog::apply(&chain, binder.for_field(Rc::clone(&field))).unwrap().bind(0);
            field.input(input.clone());
            prop_assert_eq!(binding.value().unwrap(), input.parse::<i64>().unwrap());
        }

        #[test]
        fn test_worst_is_at_least_every_severity(results in proptest::collection::vec(validation_result_strategy(), 1..8)) {
            let worst = ValidationResult::worst(results.iter()).unwrap();
            prop_assert!(results.iter().all(|result| result.severity() <= worst.severity()));
        }

        #[test]
        fn test_locale_normalization_is_stable(locale in locale_strategy()) {
            prop_assert_eq!(Locale::new(locale.as_str()), locale.clone());
            prop_assert!(!locale.as_str().contains('_'));
        }
    }
}
