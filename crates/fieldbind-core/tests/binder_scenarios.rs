//! End-to-end scenarios for the binder
//!
//! Each test drives a binder only through its public API and an in-memory
//! field, the way an application view would.

mod test_support;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use fieldbind_core::converters::{DateToDateTimeConverter, StringToFloatConverter, StringToIntegerConverter};
use fieldbind_core::validators;
use fieldbind_core::{
    Binder, BindingValidationStatus, Error, Field, FixedLocale, Locale, MemoryField, MemoryLabel, Severity,
    StatusKind,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use test_support::{length_5_to_10, record_events, text_field, LENGTH_MESSAGE};

#[test]
fn test_text_length_rejects_short_input() {
    let field = text_field();
    let binder: Binder<String> = Binder::new();
    let binding = binder
        .for_field(Rc::clone(&field))
        .as_required("Value is required")
        .with_validator(length_5_to_10())
        .bind("before".to_string());

    field.input("ab".to_string());

    assert!(!binder.is_valid().unwrap());
    assert_eq!(field.error_message().as_deref(), Some(LENGTH_MESSAGE));
    assert_eq!(binding.value().unwrap(), "before");
    assert_eq!(binder.value().unwrap(), "before");
    assert!(field.is_required_indicator_visible());
}

#[test]
fn test_integer_conversion_error_is_not_a_validation_error() {
    let field = text_field();
    let binder: Binder<i64> = Binder::new();
    let binding = binder
        .for_field(Rc::clone(&field))
        .with_converter(StringToIntegerConverter::new("This is not a number"))
        .with_validator(validators::range("Give a number between 5 and 10", Some(5), Some(10)))
        .bind(7);

    field.input("abc".to_string());

    let status = binding.validate(false).unwrap();
    assert_eq!(status.kind(), StatusKind::Error);
    assert_eq!(status.message(), Some("This is not a number"));
    assert!(status.validation_results().iter().all(|result| !result.is_error()));
    assert_eq!(binding.value().unwrap(), 7);

    field.input("12".to_string());
    let status = binding.validate(false).unwrap();
    assert_eq!(status.message(), Some("Give a number between 5 and 10"));
    assert!(status.validation_results().iter().any(|result| result.is_error()));
    assert_eq!(binding.value().unwrap(), 7);

    field.input("9".to_string());
    assert_eq!(binding.value().unwrap(), 9);
}

#[test]
fn test_null_representation_is_dropped_by_converter() {
    let field = text_field();
    let binder: Binder<i64> = Binder::new();
    let binding = binder
        .for_field(Rc::clone(&field))
        .with_null_representation("(none)".to_string())
        .with_converter(StringToIntegerConverter::new("Must enter a number"))
        .bind(4);
    assert_eq!(field.value(), "4");

    binding.reset(None).unwrap();
    assert_eq!(field.value(), "4");
    assert_eq!(binding.value().unwrap(), 4);
}

#[test]
fn test_disabled_default_sentinel_never_reappears() {
    let field = Rc::new(MemoryField::new("EMPTY".to_string()));
    let binder: Binder<i64> = Binder::new();
    let binding = binder
        .for_field(Rc::clone(&field))
        .with_converter(StringToIntegerConverter::new("Must enter a number"))
        .bind(4);

    binding.reset(None).unwrap();
    assert_ne!(field.value(), "EMPTY");
    assert_eq!(field.value(), "4");
}

#[test]
fn test_null_representation_without_converter() {
    let field = text_field();
    let binder: Binder<String> = Binder::new();
    let binding = binder
        .for_field(Rc::clone(&field))
        .with_null_representation("(none)".to_string())
        .bind("x".to_string());

    binding.reset(None).unwrap();
    assert_eq!(field.value(), "(none)");
}

#[test]
fn test_unbind_then_validate_is_detached() {
    let field = text_field();
    let binder: Binder<String> = Binder::new();
    let binding = binder.for_field(Rc::clone(&field)).bind("hello".to_string());

    binding.unbind().unwrap();

    assert!(matches!(binding.validate(true), Err(Error::Detached { .. })));
    assert!(matches!(binding.unbind(), Err(Error::Detached { .. })));
    assert!(matches!(binder.validate(), Err(Error::NoBinding { .. })));
    assert_eq!(field.listener_count(), 0);
}

#[test]
fn test_validate_is_idempotent() {
    let field = text_field();
    let binder: Binder<String> = Binder::new();
    let binding = binder
        .for_field(Rc::clone(&field))
        .with_validator(length_5_to_10())
        .bind("hello".to_string());
    field.input("abc".to_string());

    let first = binding.validate(false).unwrap();
    let second = binding.validate(false).unwrap();
    assert_eq!(first.kind(), second.kind());
    assert_eq!(first.message(), second.message());
    assert_eq!(first.validation_results(), second.validation_results());
}

#[test]
fn test_read_only_keeps_buffer_but_reports() {
    let field = text_field();
    let binder: Binder<String> = Binder::new();
    let log = record_events(&binder);
    let binding = binder
        .for_field(Rc::clone(&field))
        .with_validator(length_5_to_10())
        .bind("hello".to_string());
    binding.set_read_only(true).unwrap();
    assert!(field.is_read_only());

    field.input("abcdefg".to_string());
    field.input("ab".to_string());

    assert_eq!(binding.value().unwrap(), "hello");
    assert!(field.is_invalid());
    let log = log.borrow();
    assert_eq!(log.values.len(), 2);
    assert!(log.values.iter().all(|event| !event.committed));
    assert_eq!(log.statuses.last().map(|s| s.has_validation_errors), Some(true));
}

#[test]
fn test_text_demo_listener_sees_committed_value() {
    let field = text_field();
    let binder: Binder<String> = Binder::new();
    let _binding = binder
        .for_field(Rc::clone(&field))
        .as_required("Value is required")
        .with_validator(length_5_to_10())
        .bind(String::new());

    // A validate right after bind shows the required error
    let status = binder.validate().unwrap();
    assert!(status.has_error());
    assert_eq!(field.error_message().as_deref(), Some("Value is required"));

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let observer = binder.clone();
    let _registration = binder.add_value_change_listener(move |event| {
        let valid = observer.is_valid().unwrap();
        sink.borrow_mut()
            .push((event.value.clone(), observer.value().unwrap(), valid));
    });

    field.input("abc".to_string());
    field.input("abcdef".to_string());

    assert_eq!(
        *seen.borrow(),
        vec![
            (None, String::new(), false),
            (Some("abcdef".to_string()), "abcdef".to_string(), true),
        ]
    );
}

#[test]
fn test_float_demo_custom_handler_replaces_field_display() {
    let field = text_field();
    let latest = Rc::new(Cell::new(0.0));
    let notifications = Rc::new(RefCell::new(Vec::new()));

    let value_sink = Rc::clone(&latest);
    let message_sink = Rc::clone(&notifications);
    let binding = Binder::of(Rc::clone(&field))
        .with_converter(StringToFloatConverter::new("This is not a number"))
        .with_validator(validators::range("Give a number between -10 and 10", Some(-10.0), Some(10.0)))
        .with_validation_status_handler(move |status: &BindingValidationStatus<f64>| {
            if let Some(message) = status.message() {
                message_sink.borrow_mut().push(message.to_string());
            }
            if let (false, Some(value)) = (status.is_error(), status.value()) {
                value_sink.set(*value);
            }
        })
        .unwrap()
        .bind(0.0);
    binding
        .binder()
        .unwrap()
        .set_locale_resolver(Rc::new(FixedLocale(Locale::new("en-US"))));

    field.input("2.5".to_string());
    field.input("11".to_string());
    field.input("x".to_string());

    assert_eq!(latest.get(), 2.5);
    assert_eq!(binding.value().unwrap(), 2.5);
    assert_eq!(
        *notifications.borrow(),
        vec!["Give a number between -10 and 10".to_string(), "This is not a number".to_string()]
    );
    assert!(!field.is_invalid());
}

#[test]
fn test_date_demo_status_label_and_epoch_fallback() {
    let today = Utc::now().date_naive();
    let field: Rc<MemoryField<Option<NaiveDate>>> = Rc::new(MemoryField::new(None));
    let label = Rc::new(MemoryLabel::new());

    let binding = Binder::of(Rc::clone(&field))
        .with_validator(validators::range("Date can't be in the past", Some(today), None).optional())
        .with_converter(DateToDateTimeConverter::new())
        .with_status_label(Rc::clone(&label))
        .unwrap()
        .bind(Utc::now());
    assert_eq!(field.value(), Some(today));

    field.input(Some(today - Duration::days(1)));
    assert!(label.is_visible());
    assert_eq!(label.text(), "Date can't be in the past");
    assert!(!field.is_invalid());

    let tomorrow = today + Duration::days(1);
    field.input(Some(tomorrow));
    assert!(!label.is_visible());
    assert_eq!(label.text(), "");
    assert_eq!(binding.value().unwrap().date_naive(), tomorrow);

    field.input(None);
    assert_eq!(binding.value().unwrap(), DateTime::<Utc>::default());
}

#[test]
fn test_binder_label_shows_first_error() {
    let field = text_field();
    let label = Rc::new(MemoryLabel::new());
    let binder: Binder<String> = Binder::new();
    binder.set_status_label(Rc::clone(&label)).unwrap();
    assert!(matches!(
        binder.set_validation_status_handler(|_| {}),
        Err(Error::StatusHandlerConflict { .. })
    ));

    let _binding = binder
        .for_field(Rc::clone(&field))
        .with_validator(length_5_to_10())
        .bind("hello".to_string());

    field.input("x".to_string());
    assert_eq!(label.text(), LENGTH_MESSAGE);
    assert!(label.is_visible());
    assert!(field.is_invalid());

    field.input("hello!".to_string());
    assert_eq!(label.text(), "");
    assert!(!label.is_visible());
}

#[test]
fn test_warning_is_shown_but_committed() {
    let field = text_field();
    let binder: Binder<String> = Binder::new();
    let binding = binder
        .for_field(Rc::clone(&field))
        .with_validator_level(|s: &String| !s.contains(' '), "Spaces are discouraged", Severity::Warning)
        .bind("plain".to_string());

    field.input("has space".to_string());

    assert_eq!(binding.value().unwrap(), "has space");
    assert_eq!(field.error_message().as_deref(), Some("Spaces are discouraged"));
    assert!(!field.is_invalid());
    assert!(binder.is_valid().unwrap());
}

#[test]
fn test_rebinding_replaces_previous_binding() {
    let first = text_field();
    let second = text_field();
    let binder: Binder<String> = Binder::new();

    let old = binder.for_field(Rc::clone(&first)).bind("one".to_string());
    first.input("changed".to_string());
    assert!(binder.has_changes());

    let new = binder.for_field(Rc::clone(&second)).bind("two".to_string());
    assert!(!old.is_bound());
    assert!(new.is_bound());
    assert!(!binder.has_changes());
    assert_eq!(binder.field_id(), Some(new.field_id()));

    first.input("ignored".to_string());
    assert!(!binder.has_changes());
    assert_eq!(binder.value().unwrap(), "two");
}
