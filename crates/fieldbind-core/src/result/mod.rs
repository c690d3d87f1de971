//! Value types produced by conversion and validation steps
//!
//! - [`validation`] - [`ValidationResult`] and its [`Severity`]
//! - [`conversion`] - [`ConversionResult`], the success-or-message union
//! - [`aggregator`] - [`ResultAggregator`], which keeps every validation
//!   outcome produced along a chain

pub mod aggregator;
pub mod conversion;
pub mod validation;

pub use aggregator::ResultAggregator;
pub use conversion::ConversionResult;
pub use validation::{Severity, ValidationResult};
