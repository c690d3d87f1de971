//! Conversion result that remembers every validation outcome along a chain
//!
//! A later stage still needs to see earlier non-fatal warnings, so each
//! pipeline step returns a [`ResultAggregator`] and steps are glued together
//! with [`ResultAggregator::flat_map`], which concatenates the recorded
//! results in registration order.
//!
//! Copyright (c) 2025 Fieldbind Team
//! Licensed under the Apache-2.0 license

use super::{ConversionResult, ValidationResult};
use serde::{Deserialize, Serialize};

/// A [`ConversionResult`] plus the ordered validation results that produced it
///
/// # Invariants
///
/// 1. `validation_results` is in chain registration order.
/// 2. [`is_error`](Self::is_error) reflects the wrapped result only; warnings
///    and infos in the list never make the aggregate an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultAggregator<T> {
    result: ConversionResult<T>,
    validation_results: Vec<ValidationResult>,
}

impl<T> ResultAggregator<T> {
    /// Wrap a plain conversion outcome with no validation entries
    pub fn from_result(result: ConversionResult<T>) -> Self {
        Self {
            result,
            validation_results: Vec::new(),
        }
    }

    pub fn ok(value: T) -> Self {
        Self::from_result(ConversionResult::Ok(value))
    }

    /// Single-entry aggregate for one validator outcome.
    ///
    /// An error result turns into a failed conversion carrying the
    /// validator's message; anything else passes `value` through.
    pub fn from_validation(value: T, validation: ValidationResult) -> Self {
        let result = if validation.is_error() {
            ConversionResult::Err(validation.error_message().to_string())
        } else {
            ConversionResult::Ok(value)
        };
        Self {
            result,
            validation_results: vec![validation],
        }
    }

    /// Run the next step on success, concatenating recorded results
    pub fn flat_map<U, F>(self, mapper: F) -> ResultAggregator<U>
    where
        F: FnOnce(T) -> ResultAggregator<U>,
    {
        let Self {
            result,
            mut validation_results,
        } = self;
        match result {
            ConversionResult::Ok(value) => {
                let next = mapper(value);
                validation_results.extend(next.validation_results);
                ResultAggregator {
                    result: next.result,
                    validation_results,
                }
            }
            ConversionResult::Err(message) => ResultAggregator {
                result: ConversionResult::Err(message),
                validation_results,
            },
        }
    }

    pub fn map<U, F>(self, mapper: F) -> ResultAggregator<U>
    where
        F: FnOnce(T) -> U,
    {
        self.flat_map(|value| ResultAggregator::ok(mapper(value)))
    }

    pub fn is_error(&self) -> bool {
        self.result.is_error()
    }

    pub fn message(&self) -> Option<&str> {
        self.result.message()
    }

    pub fn result(&self) -> &ConversionResult<T> {
        &self.result
    }

    pub fn value(&self) -> Option<&T> {
        self.result.value()
    }

    pub fn validation_results(&self) -> &[ValidationResult] {
        &self.validation_results
    }

    pub fn into_result(self) -> ConversionResult<T> {
        self.result
    }

    pub fn into_parts(self) -> (ConversionResult<T>, Vec<ValidationResult>) {
        (self.result, self.validation_results)
    }
}
