//! Single-binding coordinator
//!
//! A [`Binder`] owns at most one active binding, the listener registry and
//! the binder-level status output (a status label or a custom handler, never
//! both). Field changes arrive here from the binding's field listener and
//! run through the same dispatch path as explicit validation.
//!
//! Copyright (c) 2025 Fieldbind Team
//! Licensed under the Apache-2.0 license

use super::binding::{Binding, BindingCore};
use super::builder::BindingBuilder;
use super::event::{BinderEvent, EventKind, ListenerRegistry, StatusChangeEvent, ValueChangeEvent};
use super::status::{BinderValidationStatus, BindingValidationStatus};
use crate::chain::{NullRepresentationAdapter, Pipeline, Validator};
use crate::context::{LocaleResolver, ProcessLocale, ValueContext};
use crate::error::{Error, Result};
use crate::field::{Field, FieldId, Registration, StatusLabel};
use crate::result::ValidationResult;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

pub(crate) type BinderStatusHandler<M> = Rc<dyn Fn(&BinderValidationStatus<M>)>;

pub(crate) struct BinderInner<M> {
    binding: RefCell<Option<Rc<BindingCore<M>>>>,
    listeners: ListenerRegistry<M>,
    status_label: RefCell<Option<Rc<dyn StatusLabel>>>,
    status_handler: RefCell<Option<BinderStatusHandler<M>>>,
    changed: Cell<bool>,
    validators: RefCell<Vec<Validator<M>>>,
    locale_resolver: RefCell<Rc<dyn LocaleResolver>>,
}

impl<M: Clone + 'static> BinderInner<M> {
    fn new() -> Self {
        Self {
            binding: RefCell::new(None),
            listeners: ListenerRegistry::new(),
            status_label: RefCell::new(None),
            status_handler: RefCell::new(None),
            changed: Cell::new(false),
            validators: RefCell::new(Vec::new()),
            locale_resolver: RefCell::new(Rc::new(ProcessLocale)),
        }
    }

    pub(crate) fn active(&self) -> Option<Rc<BindingCore<M>>> {
        self.binding.borrow().clone()
    }

    pub(crate) fn context(&self, core: &BindingCore<M>) -> ValueContext {
        let resolver = Rc::clone(&*self.locale_resolver.borrow());
        ValueContext::resolve(core.field.locale(), resolver.as_ref(), core.field.id())
    }

    /// Make `core` the active binding, detaching the previous one
    pub(crate) fn install(self: &Rc<Self>, core: Rc<BindingCore<M>>) {
        core.attach(self);
        let previous = self.binding.replace(Some(core));
        if let Some(previous) = previous {
            debug!(field = %previous.field.id(), "replacing active binding");
            previous.detach();
        }
        self.changed.set(false);
    }

    pub(crate) fn detach(&self, core: &Rc<BindingCore<M>>) {
        let is_active = self
            .binding
            .borrow()
            .as_ref()
            .map_or(false, |active| Rc::ptr_eq(active, core));
        if is_active {
            self.binding.replace(None);
        }
        core.detach();
    }

    pub(crate) fn run_binder_validators(
        &self,
        status: &BindingValidationStatus<M>,
        ctx: &ValueContext,
    ) -> Vec<ValidationResult> {
        let value = match status.value() {
            Some(value) if !status.is_error() => value,
            _ => return Vec::new(),
        };
        let validators = self.validators.borrow().clone();
        validators
            .iter()
            .map(|validator| validator.apply(value, ctx))
            .collect()
    }

    fn validate_active(&self, fire_event: bool) -> Result<BinderValidationStatus<M>> {
        let core = self.active().ok_or_else(Error::no_binding)?;
        let ctx = self.context(&core);
        let binding_status = core.status(&ctx);
        let binder_results = self.run_binder_validators(&binding_status, &ctx);
        let status = BinderValidationStatus::new(binding_status, binder_results);
        if fire_event {
            self.publish_status(&core, &status);
        }
        Ok(status)
    }

    /// Dispatch a status and publish the matching status change event
    pub(crate) fn publish_status(&self, core: &BindingCore<M>, status: &BinderValidationStatus<M>) {
        self.dispatch(core, status);
        self.listeners.fire(&BinderEvent::StatusChange(StatusChangeEvent {
            has_validation_errors: status.has_error(),
        }));
    }

    /// The binding handler always sees the field status. The custom handler,
    /// when set, replaces the status label update.
    fn dispatch(&self, core: &BindingCore<M>, status: &BinderValidationStatus<M>) {
        core.notify(status.field_validation_status());

        let handler = self.status_handler.borrow().clone();
        if let Some(handler) = handler {
            handler(status);
            return;
        }
        let label = self.status_label.borrow().clone();
        if let Some(label) = label {
            label.set_text(status.first_error_message().unwrap_or(""));
            label.set_visible(status.has_error());
        }
    }

    pub(crate) fn handle_field_change(&self, core: &Rc<BindingCore<M>>, from_client: bool) {
        self.changed.set(true);
        let ctx = self.context(core);
        let binding_status = core.status(&ctx);

        let value = binding_status.value().cloned();
        let committed = match &value {
            Some(value) if !core.is_read_only() => {
                core.commit(value.clone());
                debug!(field = %core.field.id(), "committed field value");
                true
            }
            _ => false,
        };

        let binder_results = self.run_binder_validators(&binding_status, &ctx);
        let status = BinderValidationStatus::new(binding_status, binder_results);
        self.publish_status(core, &status);

        self.listeners.fire(&BinderEvent::ValueChange(ValueChangeEvent {
            field: core.field.id(),
            from_client,
            value,
            committed,
        }));
    }

    fn add_listener(self: &Rc<Self>, kind: EventKind, listener: Rc<dyn Fn(&BinderEvent<M>)>) -> Registration {
        let id = self.listeners.add(kind, listener);
        let registry = Rc::downgrade(self);
        Registration::new(move || {
            if let Some(inner) = registry.upgrade() {
                inner.listeners.remove(kind, id);
            }
        })
    }
}

/// Coordinates at most one binding at a time
///
/// `Binder` is a cheap handle; clones share the same state.
pub struct Binder<M> {
    pub(crate) inner: Rc<BinderInner<M>>,
}

impl<M> Clone for Binder<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M: Clone + 'static> Default for Binder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for Binder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self.inner.binding.borrow().as_ref().map(|core| core.field.id());
        f.debug_struct("Binder")
            .field("active", &active)
            .field("changed", &self.inner.changed.get())
            .finish()
    }
}

impl<M: Clone + 'static> Binder<M> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(BinderInner::new()),
        }
    }

    pub(crate) fn from_inner(inner: Rc<BinderInner<M>>) -> Self {
        Self { inner }
    }

    /// Start configuring a binding for `field`.
    ///
    /// Clears the field's error display and the status label. The chain
    /// starts with the null-representation stage followed by the field's
    /// default validator.
    pub fn for_field<F: Field>(&self, field: Rc<F>) -> BindingBuilder<F, F::Value, M> {
        if let Some(display) = field.validation_display() {
            display.set_invalid(false);
            display.set_error_message(None);
        }
        let label = self.inner.status_label.borrow().clone();
        if let Some(label) = label {
            label.set_text("");
        }

        let adapter = Rc::new(NullRepresentationAdapter::new(field.empty_value()));
        let default_validator = field
            .default_validator()
            .unwrap_or_else(Validator::always_pass);
        let pipeline = Pipeline::null_representation(Rc::clone(&adapter)).then_validator(default_validator);
        BindingBuilder::new(self.clone(), field, pipeline, adapter)
    }

    /// Builder on a fresh binder
    pub fn of<F: Field>(field: Rc<F>) -> BindingBuilder<F, F::Value, M> {
        Self::new().for_field(field)
    }

    /// Validate the active binding and binder-level validators, firing events
    pub fn validate(&self) -> Result<BinderValidationStatus<M>> {
        self.inner.validate_active(true)
    }

    /// Validate without firing any handler or event
    pub fn is_valid(&self) -> Result<bool> {
        Ok(self.inner.validate_active(false)?.is_ok())
    }

    /// Whether the field changed since the current binding was bound
    pub fn has_changes(&self) -> bool {
        self.inner.changed.get()
    }

    pub fn value(&self) -> Result<M> {
        self.inner
            .active()
            .map(|core| core.value())
            .ok_or_else(Error::no_binding)
    }

    pub fn field_id(&self) -> Option<FieldId> {
        self.inner.active().map(|core| core.field.id())
    }

    pub fn binding(&self) -> Option<Binding<M>> {
        self.inner
            .active()
            .map(|core| Binding::new(core, Rc::clone(&self.inner)))
    }

    /// Replace the status label update with a custom handler
    pub fn set_validation_status_handler<H>(&self, handler: H) -> Result<()>
    where
        H: Fn(&BinderValidationStatus<M>) + 'static,
    {
        if self.inner.status_label.borrow().is_some() {
            return Err(Error::StatusHandlerConflict {
                message: "a status label is already set on this binder".to_string(),
            });
        }
        *self.inner.status_handler.borrow_mut() = Some(Rc::new(handler));
        Ok(())
    }

    pub fn set_status_label<L: StatusLabel + 'static>(&self, label: Rc<L>) -> Result<()> {
        if self.inner.status_handler.borrow().is_some() {
            return Err(Error::StatusHandlerConflict {
                message: "a custom status handler is already set on this binder".to_string(),
            });
        }
        let label: Rc<dyn StatusLabel> = label;
        *self.inner.status_label.borrow_mut() = Some(label);
        Ok(())
    }

    pub fn add_value_change_listener<L>(&self, listener: L) -> Registration
    where
        L: Fn(&ValueChangeEvent<M>) + 'static,
    {
        self.inner.add_listener(
            EventKind::ValueChange,
            Rc::new(move |event: &BinderEvent<M>| {
                if let BinderEvent::ValueChange(event) = event {
                    listener(event);
                }
            }),
        )
    }

    pub fn add_status_change_listener<L>(&self, listener: L) -> Registration
    where
        L: Fn(&StatusChangeEvent) + 'static,
    {
        self.inner.add_listener(
            EventKind::StatusChange,
            Rc::new(move |event: &BinderEvent<M>| {
                if let BinderEvent::StatusChange(event) = event {
                    listener(event);
                }
            }),
        )
    }

    /// Unbind the active binding if it is bound to `field`
    pub fn remove_binding<F: ?Sized>(&self, field: &Rc<F>) -> Result<()> {
        let id = FieldId::of(field);
        match self.inner.active() {
            Some(core) if core.field.id() == id => {
                self.inner.detach(&core);
                Ok(())
            }
            _ => Err(Error::not_in_binder("field")),
        }
    }

    pub fn remove_binding_ref(&self, binding: &Binding<M>) -> Result<()> {
        match self.inner.active() {
            Some(core) if Rc::ptr_eq(&core, binding.core()) => {
                self.inner.detach(&core);
                Ok(())
            }
            _ => Err(Error::not_in_binder("binding")),
        }
    }

    /// Add a binder-level validator run on the converted value
    pub fn with_validator(self, validator: Validator<M>) -> Self {
        self.inner.validators.borrow_mut().push(validator);
        self
    }

    pub fn set_locale_resolver(&self, resolver: Rc<dyn LocaleResolver>) {
        *self.inner.locale_resolver.borrow_mut() = resolver;
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self, kind: EventKind) -> usize {
        self.inner.listeners.count(kind)
    }
}
