//! Outcome of a single validator or converter step
//!
//! Copyright (c) 2025 Fieldbind Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a validation outcome
///
/// The declaration order is the "worst result wins" order:
/// `Error > Warning > Info > Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Passed
    Ok,
    /// Informational, value is accepted
    Info,
    /// Should be reviewed, value is accepted
    Warning,
    /// Value is rejected
    Error,
}

impl Severity {
    /// Only `Error` rejects a value
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Ok => "ok",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// Immutable result of one validation step
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationResult {
    severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ValidationResult {
    /// A passing result without a message
    pub fn ok() -> Self {
        Self {
            severity: Severity::Ok,
            message: None,
        }
    }

    /// A rejecting result
    pub fn error(message: impl Into<String>) -> Self {
        Self::create(message, Severity::Error)
    }

    /// A non-fatal warning
    pub fn warning(message: impl Into<String>) -> Self {
        Self::create(message, Severity::Warning)
    }

    /// A non-fatal informational note
    pub fn info(message: impl Into<String>) -> Self {
        Self::create(message, Severity::Info)
    }

    /// Create a result with an explicit severity.
    ///
    /// An `Ok` severity never carries a message.
    pub fn create(message: impl Into<String>, severity: Severity) -> Self {
        match severity {
            Severity::Ok => Self::ok(),
            _ => Self {
                severity,
                message: Some(message.into()),
            },
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The severity, or `None` for a passing result
    pub fn error_level(&self) -> Option<Severity> {
        match self.severity {
            Severity::Ok => None,
            level => Some(level),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The message, or an empty string when there is none
    pub fn error_message(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }

    pub fn is_ok(&self) -> bool {
        self.severity == Severity::Ok
    }

    /// The first result of the highest severity, if any.
    pub fn worst<'a, I>(results: I) -> Option<&'a ValidationResult>
    where
        I: IntoIterator<Item = &'a ValidationResult>,
    {
        results.into_iter().fold(None, |worst, candidate| match worst {
            Some(current) if current.severity >= candidate.severity => Some(current),
            _ => Some(candidate),
        })
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.severity, message),
            None => write!(f, "{}", self.severity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(Severity::Info > Severity::Ok);
    }

    #[test]
    fn test_ok_drops_message() {
        let result = ValidationResult::create("ignored", Severity::Ok);
        assert!(result.is_ok());
        assert_eq!(result.message(), None);
        assert_eq!(result.error_level(), None);
    }

    #[test]
    fn test_worst_prefers_first_on_ties() {
        let results = vec![
            ValidationResult::ok(),
            ValidationResult::warning("first"),
            ValidationResult::info("note"),
            ValidationResult::warning("second"),
        ];
        let worst = ValidationResult::worst(&results).unwrap();
        assert_eq!(worst.message(), Some("first"));

        let empty: Vec<ValidationResult> = Vec::new();
        assert!(ValidationResult::worst(&empty).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(ValidationResult::error("too short").to_string(), "error: too short");
        assert_eq!(ValidationResult::ok().to_string(), "ok");
    }
}
