//! Error types for the Fieldbind core library
//!
//! Conversion and validation failures are never raised as errors: they travel
//! as data inside [`ConversionResult`](crate::ConversionResult) and
//! [`ValidationResult`](crate::ValidationResult) and end up in status
//! handlers. The [`Error`] enum below only covers programming and state
//! errors, which are always surfaced to the caller immediately.

use thiserror::Error;

/// Main error type for Fieldbind operations
#[derive(Error, Debug)]
pub enum Error {
    /// A status handler or status label was configured twice on a builder
    #[error("Status handler already set: {message}")]
    HandlerAlreadySet { message: String },

    /// A binder was given both a status label and a custom status handler
    #[error("Status handler conflict: {message}")]
    StatusHandlerConflict { message: String },

    /// The binding has been unbound or its binder is gone
    #[error("Binding is detached: {message}")]
    Detached { message: String },

    /// The binder has no active binding to operate on
    #[error("No active binding: {message}")]
    NoBinding { message: String },

    /// A field or binding passed to the binder is not the active one
    #[error("Not in binder: {message}")]
    NotInBinder { message: String },

    /// Invalid declarative chain configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a detached-binding error
    pub fn detached() -> Self {
        Self::Detached {
            message: "this binding is no longer attached to a binder".to_string(),
        }
    }

    /// Create a missing-binding error
    pub fn no_binding() -> Self {
        Self::NoBinding {
            message: "bind a field before using the binder".to_string(),
        }
    }

    /// Create a not-in-binder error for the given subject
    pub fn not_in_binder(subject: &str) -> Self {
        Self::NotInBinder {
            message: format!("provided {} is not in this binder", subject),
        }
    }

    /// Create a configuration error without an underlying cause
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error wrapping an underlying cause
    pub fn configuration_with(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Whether this error reports misuse of the binding lifecycle
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::HandlerAlreadySet { .. }
                | Self::StatusHandlerConflict { .. }
                | Self::Detached { .. }
                | Self::NoBinding { .. }
                | Self::NotInBinder { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_message() {
        let err = Error::detached();
        assert!(err.to_string().contains("no longer attached"));
        assert!(err.is_state_error());
    }

    #[test]
    fn test_configuration_keeps_source() {
        let cause = anyhow::anyhow!("bad bound");
        let err = Error::configuration_with("range validator", cause);
        assert!(!err.is_state_error());
        assert!(std::error::Error::source(&err).is_some());
    }
}
