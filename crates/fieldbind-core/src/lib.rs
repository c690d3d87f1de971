//! Fieldbind Core - typed binding of a single input field to a model value
//!
//! This crate connects one input field to a buffered model value through a
//! chain of converters and validators. User input is converted and checked
//! on every change; valid values are committed to the buffer and errors are
//! routed to the field, a status label, or custom handlers.
//!
//! # Main Components
//!
//! - **Results**: [`ValidationResult`], [`ConversionResult`] and the
//!   [`ResultAggregator`] that carries every outcome along a chain
//! - **Chain**: [`Converter`], [`Validator`] and the type-changing [`Pipeline`]
//! - **Fields**: the [`Field`] trait and its capability traits, with
//!   [`MemoryField`] as an in-memory implementation
//! - **Binder**: [`Binder`], [`BindingBuilder`] and [`Binding`]
//! - **Catalog**: serializable chain descriptions in [`catalog`]
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use fieldbind_core::converters::StringToIntegerConverter;
//! use fieldbind_core::{Binder, MemoryField, Result};
//!
//! fn example() -> Result<()> {
//!     let field = Rc::new(MemoryField::text());
//!     let binder: Binder<i64> = Binder::new();
//!     let binding = binder
//!         .for_field(Rc::clone(&field))
//!         .with_converter(StringToIntegerConverter::new("Must enter a number"))
//!         .with_validator_fn(|n: &i64| *n >= 0, "Must not be negative")
//!         .bind(3);
//!
//!     field.input("-1".to_string());
//!     assert!(binder.validate()?.has_error());
//!     field.input("12".to_string());
//!     assert_eq!(binding.value()?, 12);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod binder;
pub mod catalog;
pub mod chain;
pub mod context;
pub mod converters;
pub mod error;
pub mod field;
pub mod result;
pub mod validators;

#[cfg(test)]
mod proptest_strategies;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use result::{ConversionResult, ResultAggregator, Severity, ValidationResult};
pub use context::{FixedLocale, Locale, LocaleResolver, ProcessLocale, ValueContext};
pub use chain::{Chained, Converter, FnConverter, Identity, NullRepresentationAdapter, Pipeline, Validator};
pub use field::{
    ChangeListener, Field, FieldChange, FieldId, MemoryField, MemoryLabel, ReadOnlyToggle,
    Registration, RequiredIndicator, StatusLabel, ValidationDisplay,
};
pub use binder::{
    Binder, BinderEvent, BinderValidationStatus, Binding, BindingBuilder, BindingSnapshot,
    BindingValidationStatus, EventKind, StatusChangeEvent, StatusKind, ValueChangeEvent,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_creation() {
        let err = Error::configuration("bad bound");
        assert!(err.to_string().contains("bad bound"));
        assert!(!err.is_state_error());
        assert!(Error::detached().is_state_error());
    }
}
