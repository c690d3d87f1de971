//! Built-in validators

use crate::chain::Validator;
use crate::error::{Error, Result};
use crate::result::ValidationResult;
use regex::Regex;
use std::sync::OnceLock;

/// Character count within `[min, max]`; either bound may be open
pub fn string_length(message: impl Into<String>, min: Option<usize>, max: Option<usize>) -> Validator<String> {
    let message = message.into();
    Validator::new("string-length", move |value: &String, _ctx| {
        let length = value.chars().count();
        let above_min = min.map_or(true, |min| length >= min);
        let below_max = max.map_or(true, |max| length <= max);
        if above_min && below_max {
            ValidationResult::ok()
        } else {
            ValidationResult::error(message.clone())
        }
    })
}

/// Value within `[min, max]`; either bound may be open
pub fn range<T>(message: impl Into<String>, min: Option<T>, max: Option<T>) -> Validator<T>
where
    T: PartialOrd + 'static,
{
    let message = message.into();
    Validator::new("range", move |value: &T, _ctx| {
        let above_min = min.as_ref().map_or(true, |min| value >= min);
        let below_max = max.as_ref().map_or(true, |max| value <= max);
        if above_min && below_max {
            ValidationResult::ok()
        } else {
            ValidationResult::error(message.clone())
        }
    })
}

/// The whole value must match `pattern`
pub fn pattern(message: impl Into<String>, pattern: &str) -> Result<Validator<String>> {
    let anchored = format!("^(?:{})$", pattern);
    let regex = Regex::new(&anchored)
        .map_err(|e| Error::configuration_with(format!("invalid pattern '{}'", pattern), e))?;
    let message = message.into();
    Ok(Validator::new("pattern", move |value: &String, _ctx| {
        if regex.is_match(value) {
            ValidationResult::ok()
        } else {
            ValidationResult::error(message.clone())
        }
    }))
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
            .expect("Valid regex pattern")
    })
}

/// Empty input passes; combine with a required check to reject it
pub fn email(message: impl Into<String>) -> Validator<String> {
    let message = message.into();
    Validator::new("email", move |value: &String, _ctx| {
        if value.is_empty() || email_regex().is_match(value) {
            ValidationResult::ok()
        } else {
            ValidationResult::error(message.clone())
        }
    })
}

pub fn not_blank(message: impl Into<String>) -> Validator<String> {
    Validator::from_predicate(|value: &String| !value.trim().is_empty(), message).named("not-blank")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ValueContext;

    #[test]
    fn test_string_length_counts_chars() {
        let ctx = ValueContext::default();
        let validator = string_length("5 to 10", Some(5), Some(10));
        assert!(validator.apply(&"ab".to_string(), &ctx).is_error());
        assert!(validator.apply(&"äöüßé".to_string(), &ctx).is_ok());
        assert!(validator.apply(&"12345678901".to_string(), &ctx).is_error());

        let open = string_length("at least 2", Some(2), None);
        assert!(open.apply(&"a very long value indeed".to_string(), &ctx).is_ok());
    }

    #[test]
    fn test_range_inclusive() {
        let ctx = ValueContext::default();
        let validator = range("between -10 and 10", Some(-10.0), Some(10.0));
        assert!(validator.apply(&-10.0, &ctx).is_ok());
        assert!(validator.apply(&10.0, &ctx).is_ok());
        assert!(validator.apply(&10.5, &ctx).is_error());
        assert_eq!(validator.apply(&-11.0, &ctx).message(), Some("between -10 and 10"));
    }

    #[test]
    fn test_pattern_full_match() {
        let ctx = ValueContext::default();
        let validator = pattern("digits only", "[0-9]+").unwrap();
        assert!(validator.apply(&"123".to_string(), &ctx).is_ok());
        assert!(validator.apply(&"123a".to_string(), &ctx).is_error());

        let err = pattern("broken", "(").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_email_and_not_blank() {
        let ctx = ValueContext::default();
        let email = email("bad email");
        assert!(email.apply(&"someone@example.com".to_string(), &ctx).is_ok());
        assert!(email.apply(&"someone@".to_string(), &ctx).is_error());
        assert!(email.apply(&String::new(), &ctx).is_ok());

        let blank = not_blank("required");
        assert!(blank.apply(&"   ".to_string(), &ctx).is_error());
        assert!(blank.apply(&" x ".to_string(), &ctx).is_ok());
    }
}
