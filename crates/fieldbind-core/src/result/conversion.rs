//! Success-or-message result of a conversion step

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Either a converted value or a user-facing failure message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionResult<T> {
    /// Conversion succeeded
    Ok(T),
    /// Conversion failed with a message meant for the user
    Err(String),
}

impl<T> ConversionResult<T> {
    pub fn ok(value: T) -> Self {
        ConversionResult::Ok(value)
    }

    pub fn error(message: impl Into<String>) -> Self {
        ConversionResult::Err(message.into())
    }

    /// Lift a std result, using the error's display text as the message
    pub fn from_result<E: Display>(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(value) => ConversionResult::Ok(value),
            Err(err) => ConversionResult::Err(err.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ConversionResult::Err(_))
    }

    pub fn is_ok(&self) -> bool {
        !self.is_error()
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ConversionResult::Ok(_) => None,
            ConversionResult::Err(message) => Some(message),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ConversionResult::Ok(value) => Some(value),
            ConversionResult::Err(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            ConversionResult::Ok(value) => Some(value),
            ConversionResult::Err(_) => None,
        }
    }

    /// Chain another fallible step; an error short-circuits.
    pub fn flat_map<U, F>(self, mapper: F) -> ConversionResult<U>
    where
        F: FnOnce(T) -> ConversionResult<U>,
    {
        match self {
            ConversionResult::Ok(value) => mapper(value),
            ConversionResult::Err(message) => ConversionResult::Err(message),
        }
    }

    pub fn map<U, F>(self, mapper: F) -> ConversionResult<U>
    where
        F: FnOnce(T) -> U,
    {
        self.flat_map(|value| ConversionResult::Ok(mapper(value)))
    }

    /// Invoke exactly one of the two callbacks
    pub fn handle<OnOk, OnErr>(self, on_ok: OnOk, on_err: OnErr)
    where
        OnOk: FnOnce(T),
        OnErr: FnOnce(String),
    {
        match self {
            ConversionResult::Ok(value) => on_ok(value),
            ConversionResult::Err(message) => on_err(message),
        }
    }

    pub fn if_ok<F: FnOnce(T)>(self, consumer: F) {
        self.handle(consumer, |_| {});
    }

    /// Unwrap the value or map the message into a caller-chosen error
    pub fn get_or_throw<E, F>(self, on_err: F) -> std::result::Result<T, E>
    where
        F: FnOnce(String) -> E,
    {
        match self {
            ConversionResult::Ok(value) => Ok(value),
            ConversionResult::Err(message) => Err(on_err(message)),
        }
    }

    pub fn as_ref(&self) -> ConversionResult<&T> {
        match self {
            ConversionResult::Ok(value) => ConversionResult::Ok(value),
            ConversionResult::Err(message) => ConversionResult::Err(message.clone()),
        }
    }
}

impl<T, E: Display> From<std::result::Result<T, E>> for ConversionResult<T> {
    fn from(result: std::result::Result<T, E>) -> Self {
        ConversionResult::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_map_short_circuits() {
        let mut called = false;
        let result: ConversionResult<i32> = ConversionResult::<i32>::error("not a number")
            .flat_map(|v| {
                called = true;
                ConversionResult::ok(v + 1)
            });
        assert!(!called);
        assert_eq!(result.message(), Some("not a number"));
    }

    #[test]
    fn test_handle_invokes_one_arm() {
        let mut values = Vec::new();
        let mut messages = Vec::new();
        ConversionResult::ok(4).handle(|v| values.push(v), |m| messages.push(m));
        assert_eq!(values, vec![4]);
        assert!(messages.is_empty());

        let mut values = Vec::new();
        let mut messages = Vec::new();
        ConversionResult::<i32>::error("bad").handle(|v| values.push(v), |m| messages.push(m));
        assert!(values.is_empty());
        assert_eq!(messages, vec!["bad".to_string()]);
    }

    #[test]
    fn test_get_or_throw() {
        let ok: Result<i32, String> = ConversionResult::ok(7).get_or_throw(|m| m);
        assert_eq!(ok, Ok(7));
        let err: Result<i32, usize> = ConversionResult::error("four").get_or_throw(|m| m.len());
        assert_eq!(err, Err(4));
    }

    #[test]
    fn test_from_std_result() {
        let parsed: ConversionResult<i64> = "12".parse::<i64>().into();
        assert_eq!(parsed, ConversionResult::Ok(12));
        let failed: ConversionResult<i64> = "x".parse::<i64>().into();
        assert!(failed.is_error());
    }
}
