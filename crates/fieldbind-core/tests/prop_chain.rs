//! Property-based tests for converter and validator chains
//!
//! These tests verify composition laws that must hold for every input:
//! associativity of chaining, ordering of collected validation results and
//! round-trips through converters with a true inverse.

use chrono::NaiveDate;
use fieldbind_core::converters::{StringToDateConverter, StringToIntegerConverter};
use fieldbind_core::{
    ConversionResult, Converter, FnConverter, Pipeline, ResultAggregator, ValidationResult, Validator, ValueContext,
};
use proptest::prelude::*;

fn parse_converter() -> FnConverter<String, i64> {
    FnConverter::from_fallible(|s: String| s.trim().parse::<i64>(), |n: i64| n.to_string(), "Must enter a number")
}

/// Shifts by `offset`; refuses to produce a negative value
fn shift_converter(offset: i64) -> FnConverter<i64, i64> {
    FnConverter::new(
        move |n: i64, _ctx: &ValueContext| match n.checked_add(offset) {
            Some(shifted) if shifted >= 0 => ConversionResult::ok(shifted),
            _ => ConversionResult::error("Out of range"),
        },
        move |n: i64, _ctx: &ValueContext| n.wrapping_sub(offset),
    )
}

fn label_converter() -> FnConverter<i64, String> {
    FnConverter::from_fns(|n: i64| format!("#{}", n), |s: String| s.trim_start_matches('#').parse().unwrap_or(0))
}

fn failing_at(index: usize, failing: usize) -> Validator<i64> {
    Validator::from_predicate(move |_: &i64| index != failing, format!("V{} failed", index)).named(format!("v{}", index))
}

fn summary<T: Clone>(aggregator: &ResultAggregator<T>) -> (ConversionResult<T>, Vec<ValidationResult>) {
    (aggregator.result().clone(), aggregator.validation_results().to_vec())
}

proptest! {
    #[test]
    fn test_converter_chain_is_associative(input in "-?[0-9]{1,4}|[a-z]{1,3}", offset in -50i64..50, model in 0i64..5000) {
        let ctx = ValueContext::default();
        let left = parse_converter().chain(shift_converter(offset)).chain(label_converter());
        let right = parse_converter().chain(shift_converter(offset).chain(label_converter()));

        prop_assert_eq!(
            left.convert_to_model(input.clone(), &ctx),
            right.convert_to_model(input, &ctx)
        );
        let label = format!("#{}", model);
        prop_assert_eq!(
            left.convert_to_presentation(label.clone(), &ctx),
            right.convert_to_presentation(label, &ctx)
        );
    }

    #[test]
    fn test_pipeline_chain_is_associative(input in "-?[0-9]{1,4}|[a-z]{1,3}", offset in -50i64..50, limit in 0i64..500) {
        let ctx = ValueContext::default();
        let first = || Pipeline::<String, String>::identity()
            .then_validator(Validator::from_predicate(|s: &String| !s.is_empty(), "Required"))
            .then_converter(parse_converter());
        let second = || Pipeline::<i64, i64>::identity()
            .then_validator(Validator::from_predicate(move |n: &i64| *n <= limit, "Too large"))
            .then_converter(shift_converter(offset));
        let third = || Pipeline::<i64, i64>::identity().then_converter(label_converter());

        let left = first().chain(second()).chain(third());
        let right = first().chain(second().chain(third()));

        prop_assert_eq!(
            summary(&left.convert_to_model(input.clone(), &ctx)),
            summary(&right.convert_to_model(input, &ctx))
        );
        prop_assert_eq!(left.stage_names(), right.stage_names());

        let model = Some(format!("#{}", limit));
        prop_assert_eq!(
            left.convert_to_presentation(model.clone(), &ctx),
            right.convert_to_presentation(model, &ctx)
        );
    }

    #[test]
    fn test_results_stop_at_first_failure((count, failing) in (1usize..8).prop_flat_map(|n| (Just(n), 0..n)), value in any::<i64>()) {
        let ctx = ValueContext::default();
        let pipeline = (0..count).fold(Pipeline::<i64, i64>::identity(), |pipeline, index| {
            pipeline.then_validator(failing_at(index, failing))
        });

        let aggregate = pipeline.convert_to_model(value, &ctx);

        prop_assert!(aggregate.is_error());
        let results = aggregate.validation_results();
        prop_assert_eq!(results.len(), failing + 1);
        prop_assert!(results[..failing].iter().all(|result| result.is_ok()));
        let expected = format!("V{} failed", failing);
        prop_assert_eq!(results[failing].message(), Some(expected.as_str()));
    }

    #[test]
    fn test_integer_round_trip(value in any::<i64>()) {
        let ctx = ValueContext::default();
        let converter = StringToIntegerConverter::new("Must enter a number");
        let text = converter.convert_to_presentation(value, &ctx);
        let model = converter.convert_to_model(text.clone(), &ctx);
        prop_assert_eq!(model.value(), Some(&value));
        prop_assert_eq!(converter.convert_to_presentation(value, &ctx), text);
    }

    #[test]
    fn test_date_round_trip(days in 0i32..100_000) {
        let ctx = ValueContext::default();
        let converter = StringToDateConverter::new("Bad date").with_format("%d.%m.%Y");
        let date = NaiveDate::from_num_days_from_ce_opt(700_000 + days).unwrap();
        let text = converter.convert_to_presentation(date, &ctx);
        prop_assert_eq!(converter.convert_to_model(text, &ctx).into_value(), Some(date));
    }
}
