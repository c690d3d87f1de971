//! Capabilities the engine consumes from an input field
//!
//! The engine never renders anything. It talks to a field through the
//! narrow [`Field`] trait and reaches optional display capabilities through
//! `Option<&dyn _>` accessors, so a field only implements what it supports.
//!
//! Copyright (c) 2025 Fieldbind Team
//! Licensed under the Apache-2.0 license

mod memory;

pub use memory::{MemoryField, MemoryLabel};

use crate::chain::Validator;
use crate::context::Locale;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Identity of a field instance, stable for the field's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(u64);

impl FieldId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Identity derived from the shared allocation of `field`
    pub fn of<F: ?Sized>(field: &Rc<F>) -> Self {
        Self(Rc::as_ptr(field) as *const () as usize as u64)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field-{:x}", self.0)
    }
}

/// Handle returned by listener registration
///
/// The listener stays registered until [`remove`](Self::remove) is called;
/// dropping the handle does not remove it.
#[must_use = "keep the registration to be able to remove the listener"]
pub struct Registration {
    remover: Option<Box<dyn FnOnce()>>,
}

impl Registration {
    pub fn new(remover: impl FnOnce() + 'static) -> Self {
        Self {
            remover: Some(Box::new(remover)),
        }
    }

    /// A registration with nothing to remove
    pub fn noop() -> Self {
        Self { remover: None }
    }

    pub fn remove(mut self) {
        if let Some(remover) = self.remover.take() {
            remover();
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("active", &self.remover.is_some())
            .finish()
    }
}

/// Change notification published by a field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange<V> {
    pub old_value: V,
    pub value: V,
    /// `true` when the change came from the user rather than from code
    pub from_client: bool,
}

pub type ChangeListener<V> = Box<dyn Fn(&FieldChange<V>)>;

/// An interactive input holding a presentation value
pub trait Field: 'static {
    type Value: Clone + PartialEq + 'static;

    fn value(&self) -> Self::Value;

    /// Set the value; implementations notify listeners when it changes
    fn set_value(&self, value: Self::Value);

    fn add_change_listener(&self, listener: ChangeListener<Self::Value>) -> Registration;

    /// The value representing "nothing entered"
    fn empty_value(&self) -> Self::Value;

    /// Validator the field wants applied to every binding
    fn default_validator(&self) -> Option<Validator<Self::Value>> {
        None
    }

    fn locale(&self) -> Option<Locale> {
        None
    }

    fn validation_display(&self) -> Option<&dyn ValidationDisplay> {
        None
    }

    fn required_indicator(&self) -> Option<&dyn RequiredIndicator> {
        None
    }

    fn read_only_toggle(&self) -> Option<&dyn ReadOnlyToggle> {
        None
    }
}

/// Shows or hides an invalid state and its message
pub trait ValidationDisplay {
    fn set_invalid(&self, invalid: bool);
    fn set_error_message(&self, message: Option<&str>);
}

pub trait RequiredIndicator {
    fn set_required_indicator_visible(&self, visible: bool);
}

pub trait ReadOnlyToggle {
    fn set_read_only(&self, read_only: bool);
}

/// A text label showing the binder-level status
pub trait StatusLabel {
    fn set_text(&self, text: &str);
    fn set_visible(&self, visible: bool);
}
