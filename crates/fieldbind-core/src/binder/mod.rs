//! The binding engine
//!
//! This module provides:
//! - [`Binder`] - coordinator owning at most one active binding
//! - [`BindingBuilder`] - chain configuration, consumed by `bind`
//! - [`Binding`] - handle to a bound field
//! - validation statuses and binder events
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use fieldbind_core::{Binder, MemoryField};
//!
//! let field = Rc::new(MemoryField::text());
//! let binder: Binder<String> = Binder::new();
//! let binding = binder
//!     .for_field(Rc::clone(&field))
//!     .with_validator_fn(|s: &String| s.chars().count() >= 5, "At least 5 characters")
//!     .bind("hello".to_string());
//!
//! field.input("ab".to_string());
//! assert_eq!(field.error_message().as_deref(), Some("At least 5 characters"));
//! assert_eq!(binding.value().unwrap(), "hello");
//! ```

mod binding;
mod builder;
mod engine;
mod event;
mod status;

pub use binding::{Binding, BindingSnapshot};
pub use builder::BindingBuilder;
pub use engine::Binder;
pub use event::{BinderEvent, EventKind, StatusChangeEvent, ValueChangeEvent};
pub use status::{BinderValidationStatus, BindingValidationStatus, StatusKind};
