//! In-memory field and label

use super::{
    ChangeListener, Field, FieldChange, ReadOnlyToggle, Registration, RequiredIndicator,
    StatusLabel, ValidationDisplay,
};
use crate::chain::Validator;
use crate::context::Locale;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type SharedListener<V> = Rc<dyn Fn(&FieldChange<V>)>;
type ListenerList<V> = Rc<RefCell<Vec<(u64, SharedListener<V>)>>>;

/// Field that keeps its value and display state in memory
///
/// Supports every optional capability. The read-only flag is display state
/// only; [`input`](Self::input) still applies.
pub struct MemoryField<V> {
    value: RefCell<V>,
    empty: V,
    listeners: ListenerList<V>,
    next_listener: Cell<u64>,
    invalid: Cell<bool>,
    error_message: RefCell<Option<String>>,
    required_visible: Cell<bool>,
    read_only: Cell<bool>,
    locale: Option<Locale>,
    default_validator: Option<Validator<V>>,
}

impl<V: Clone + PartialEq + 'static> MemoryField<V> {
    /// Field starting at its empty value
    pub fn new(empty: V) -> Self {
        Self {
            value: RefCell::new(empty.clone()),
            empty,
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_listener: Cell::new(0),
            invalid: Cell::new(false),
            error_message: RefCell::new(None),
            required_visible: Cell::new(false),
            read_only: Cell::new(false),
            locale: None,
            default_validator: None,
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn with_default_validator(mut self, validator: Validator<V>) -> Self {
        self.default_validator = Some(validator);
        self
    }

    /// Simulate a user edit
    pub fn input(&self, value: V) {
        self.update(value, true);
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid.get()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error_message.borrow().clone()
    }

    pub fn is_required_indicator_visible(&self) -> bool {
        self.required_visible.get()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.get()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn update(&self, value: V, from_client: bool) {
        if *self.value.borrow() == value {
            return;
        }
        let old_value = self.value.replace(value.clone());
        let change = FieldChange {
            old_value,
            value,
            from_client,
        };
        let listeners: Vec<SharedListener<V>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&change);
        }
    }
}

impl MemoryField<String> {
    /// Text field whose empty value is `""`
    pub fn text() -> Self {
        Self::new(String::new())
    }
}

impl<V: fmt::Debug> fmt::Debug for MemoryField<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryField")
            .field("value", &self.value.borrow())
            .field("invalid", &self.invalid.get())
            .field("error_message", &self.error_message.borrow())
            .field("read_only", &self.read_only.get())
            .finish()
    }
}

impl<V: Clone + PartialEq + 'static> Field for MemoryField<V> {
    type Value = V;

    fn value(&self) -> V {
        self.value.borrow().clone()
    }

    fn set_value(&self, value: V) {
        self.update(value, false);
    }

    fn add_change_listener(&self, listener: ChangeListener<V>) -> Registration {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::from(listener)));

        let listeners = Rc::downgrade(&self.listeners);
        Registration::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.borrow_mut().retain(|(existing, _)| *existing != id);
            }
        })
    }

    fn empty_value(&self) -> V {
        self.empty.clone()
    }

    fn default_validator(&self) -> Option<Validator<V>> {
        self.default_validator.clone()
    }

    fn locale(&self) -> Option<Locale> {
        self.locale.clone()
    }

    fn validation_display(&self) -> Option<&dyn ValidationDisplay> {
        Some(self)
    }

    fn required_indicator(&self) -> Option<&dyn RequiredIndicator> {
        Some(self)
    }

    fn read_only_toggle(&self) -> Option<&dyn ReadOnlyToggle> {
        Some(self)
    }
}

impl<V> ValidationDisplay for MemoryField<V> {
    fn set_invalid(&self, invalid: bool) {
        self.invalid.set(invalid);
    }

    fn set_error_message(&self, message: Option<&str>) {
        *self.error_message.borrow_mut() = message.map(str::to_string);
    }
}

impl<V> RequiredIndicator for MemoryField<V> {
    fn set_required_indicator_visible(&self, visible: bool) {
        self.required_visible.set(visible);
    }
}

impl<V> ReadOnlyToggle for MemoryField<V> {
    fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }
}

/// Label that records its text and visibility
#[derive(Debug, Default)]
pub struct MemoryLabel {
    text: RefCell<String>,
    visible: Cell<bool>,
}

impl MemoryLabel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }
}

impl StatusLabel for MemoryLabel {
    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }
}
