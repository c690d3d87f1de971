//! Named predicates producing a [`ValidationResult`]
//!
//! Copyright (c) 2025 Fieldbind Team
//! Licensed under the Apache-2.0 license

use crate::context::ValueContext;
use crate::result::{ResultAggregator, Severity, ValidationResult};
use std::fmt;
use std::rc::Rc;

type Check<T> = Rc<dyn Fn(&T, &ValueContext) -> ValidationResult>;

/// A validator over `T`
///
/// Cheap to clone; clones share the same check.
pub struct Validator<T> {
    name: Rc<str>,
    check: Check<T>,
}

impl<T> Clone for Validator<T> {
    fn clone(&self) -> Self {
        Self {
            name: Rc::clone(&self.name),
            check: Rc::clone(&self.check),
        }
    }
}

impl<T> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").field("name", &self.name).finish()
    }
}

impl<T: 'static> Validator<T> {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&T, &ValueContext) -> ValidationResult + 'static,
    {
        let name: String = name.into();
        Self {
            name: Rc::from(name),
            check: Rc::new(check),
        }
    }

    /// Error with `message` whenever `predicate` is false
    pub fn from_predicate<F>(predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        Self::from_predicate_with_level(predicate, message, Severity::Error)
    }

    /// Like [`from_predicate`](Self::from_predicate) with a chosen severity
    pub fn from_predicate_with_level<F>(predicate: F, message: impl Into<String>, severity: Severity) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        let message = message.into();
        Self::new("predicate", move |value, _ctx| {
            if predicate(value) {
                ValidationResult::ok()
            } else {
                ValidationResult::create(message.clone(), severity)
            }
        })
    }

    /// The failure message is produced per call, e.g. for localization
    pub fn from_predicate_with_provider<F, M>(predicate: F, provider: M) -> Self
    where
        F: Fn(&T) -> bool + 'static,
        M: Fn(&ValueContext) -> String + 'static,
    {
        Self::new("predicate", move |value, ctx| {
            if predicate(value) {
                ValidationResult::ok()
            } else {
                ValidationResult::error(provider(ctx))
            }
        })
    }

    pub fn always_pass() -> Self {
        Self::new("always-pass", |_, _| ValidationResult::ok())
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        let name: String = name.into();
        self.name = Rc::from(name);
        self
    }

    /// Report every non-ok outcome at `severity` instead
    pub fn with_severity(self, severity: Severity) -> Self {
        let check = self.check;
        Self {
            name: self.name,
            check: Rc::new(move |value: &T, ctx: &ValueContext| {
                let result = check(value, ctx);
                if result.is_ok() {
                    return result;
                }
                ValidationResult::create(result.error_message(), severity)
            }),
        }
    }

    /// Lift to `Option<T>`; a missing value passes
    pub fn optional(self) -> Validator<Option<T>> {
        let check = self.check;
        Validator {
            name: self.name,
            check: Rc::new(move |value: &Option<T>, ctx: &ValueContext| match value {
                Some(inner) => check(inner, ctx),
                None => ValidationResult::ok(),
            }),
        }
    }
}

impl<T> Validator<T> {
    pub fn apply(&self, value: &T, ctx: &ValueContext) -> ValidationResult {
        (self.check)(value, ctx)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Model direction of the validator used as a chain stage: a single-entry
    /// aggregate that passes `value` through unless the check is an error.
    pub fn check(&self, value: T, ctx: &ValueContext) -> ResultAggregator<T> {
        let result = self.apply(&value, ctx);
        ResultAggregator::from_validation(value, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_levels() {
        let ctx = ValueContext::default();
        let positive = Validator::from_predicate(|v: &i32| *v > 0, "must be positive");
        assert!(positive.apply(&3, &ctx).is_ok());
        assert!(positive.apply(&-3, &ctx).is_error());

        let soft = Validator::from_predicate_with_level(|v: &i32| *v > 0, "looks odd", Severity::Warning);
        let result = soft.apply(&-1, &ctx);
        assert_eq!(result.severity(), Severity::Warning);
        assert_eq!(result.message(), Some("looks odd"));
    }

    #[test]
    fn test_provider_sees_locale() {
        let validator = Validator::from_predicate_with_provider(
            |v: &String| !v.is_empty(),
            |ctx: &ValueContext| format!("required ({})", ctx.locale),
        );
        let result = validator.apply(&String::new(), &ValueContext::default());
        assert_eq!(result.message(), Some("required (en-US)"));
    }

    #[test]
    fn test_optional_passes_missing() {
        let ctx = ValueContext::default();
        let validator = Validator::from_predicate(|v: &i32| *v < 10, "too big").optional();
        assert!(validator.apply(&None, &ctx).is_ok());
        assert!(validator.apply(&Some(42), &ctx).is_error());
    }

    #[test]
    fn test_with_severity_downgrades() {
        let ctx = ValueContext::default();
        let validator = Validator::from_predicate(|v: &i32| *v < 10, "too big").with_severity(Severity::Info);
        assert_eq!(validator.apply(&42, &ctx).severity(), Severity::Info);
        assert!(validator.apply(&1, &ctx).is_ok());
    }

    #[test]
    fn test_check_wraps_single_entry() {
        let ctx = ValueContext::default();
        let validator = Validator::from_predicate(|v: &i32| *v < 10, "too big").named("max-10");
        let agg = validator.check(42, &ctx);
        assert!(agg.is_error());
        assert_eq!(agg.validation_results().len(), 1);
        assert_eq!(validator.name(), "max-10");
    }
}
