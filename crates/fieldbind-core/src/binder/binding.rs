//! A live pairing of one field, one chain and one status handler
//!
//! Copyright (c) 2025 Fieldbind Team
//! Licensed under the Apache-2.0 license

use super::engine::{Binder, BinderInner};
use super::status::{BinderValidationStatus, BindingValidationStatus};
use crate::chain::Pipeline;
use crate::context::{Locale, ValueContext};
use crate::error::{Error, Result};
use crate::field::{Field, FieldId, Registration};
use crate::result::{ResultAggregator, ValidationResult};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

pub(crate) type BindingStatusHandler<M> = Rc<dyn Fn(&BindingValidationStatus<M>)>;

/// Type-erased field plus chain, as seen by a binding
pub(crate) trait BoundField<M> {
    fn id(&self) -> FieldId;
    fn locale(&self) -> Option<Locale>;
    /// Run the chain on the field's current value
    fn convert(&self, ctx: &ValueContext) -> ResultAggregator<M>;
    /// Write a model value back into the field
    fn present(&self, value: Option<M>, ctx: &ValueContext);
    fn clear_error(&self);
    fn show_result(&self, result: &ValidationResult);
    fn set_read_only(&self, read_only: bool);
    fn stage_names(&self) -> Vec<String>;
}

pub(crate) struct FieldPipeline<F: Field, M> {
    field: Rc<F>,
    pipeline: Pipeline<F::Value, M>,
}

impl<F: Field, M> FieldPipeline<F, M> {
    pub(crate) fn new(field: Rc<F>, pipeline: Pipeline<F::Value, M>) -> Self {
        Self { field, pipeline }
    }
}

impl<F: Field, M> BoundField<M> for FieldPipeline<F, M> {
    fn id(&self) -> FieldId {
        FieldId::of(&self.field)
    }

    fn locale(&self) -> Option<Locale> {
        self.field.locale()
    }

    fn convert(&self, ctx: &ValueContext) -> ResultAggregator<M> {
        self.pipeline.convert_to_model(self.field.value(), ctx)
    }

    fn present(&self, value: Option<M>, ctx: &ValueContext) {
        // No presentation once the null representation is disabled
        if let Some(presentation) = self.pipeline.convert_to_presentation(value, ctx) {
            self.field.set_value(presentation);
        }
    }

    fn clear_error(&self) {
        if let Some(display) = self.field.validation_display() {
            display.set_invalid(false);
            display.set_error_message(None);
        }
    }

    fn show_result(&self, result: &ValidationResult) {
        if let Some(display) = self.field.validation_display() {
            display.set_invalid(result.is_error());
            display.set_error_message(result.message());
        }
    }

    fn set_read_only(&self, read_only: bool) {
        if let Some(toggle) = self.field.read_only_toggle() {
            toggle.set_read_only(read_only);
        }
    }

    fn stage_names(&self) -> Vec<String> {
        self.pipeline.stage_names().to_vec()
    }
}

/// Holds the self-write suppression flag for the guard's lifetime
struct SuppressGuard<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl<'a> SuppressGuard<'a> {
    fn engage(flag: &'a Cell<bool>) -> Self {
        let previous = flag.replace(true);
        Self { flag, previous }
    }
}

impl Drop for SuppressGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

/// Shared state of a binding
///
/// The binder owns it strongly while it is active; the field's change
/// listener only holds a weak reference.
pub(crate) struct BindingCore<M> {
    pub(crate) field: Box<dyn BoundField<M>>,
    status_handler: Option<BindingStatusHandler<M>>,
    value: RefCell<M>,
    read_only: Cell<bool>,
    suppress: Cell<bool>,
    binder: RefCell<Weak<BinderInner<M>>>,
    registration: RefCell<Option<Registration>>,
}

impl<M: Clone + 'static> BindingCore<M> {
    pub(crate) fn new(
        field: Box<dyn BoundField<M>>,
        status_handler: Option<BindingStatusHandler<M>>,
        initial: M,
    ) -> Self {
        Self {
            field,
            status_handler,
            value: RefCell::new(initial),
            read_only: Cell::new(false),
            suppress: Cell::new(false),
            binder: RefCell::new(Weak::new()),
            registration: RefCell::new(None),
        }
    }

    pub(crate) fn attach(&self, binder: &Rc<BinderInner<M>>) {
        *self.binder.borrow_mut() = Rc::downgrade(binder);
    }

    pub(crate) fn set_registration(&self, registration: Registration) {
        *self.registration.borrow_mut() = Some(registration);
    }

    pub(crate) fn binder(&self) -> Option<Rc<BinderInner<M>>> {
        self.binder.borrow().upgrade()
    }

    /// Stop listening to the field and forget the binder
    pub(crate) fn detach(&self) {
        let registration = self.registration.borrow_mut().take();
        if let Some(registration) = registration {
            registration.remove();
        }
        *self.binder.borrow_mut() = Weak::new();
        debug!(field = %self.field.id(), "binding detached");
    }

    pub(crate) fn status(&self, ctx: &ValueContext) -> BindingValidationStatus<M> {
        BindingValidationStatus::from_aggregator(self.field.id(), self.field.convert(ctx))
    }

    /// Binding-level handler, or the field's own error display
    pub(crate) fn notify(&self, status: &BindingValidationStatus<M>) {
        match &self.status_handler {
            Some(handler) => handler(status),
            None => {
                self.field.clear_error();
                if let Some(result) = status.display_result() {
                    self.field.show_result(result);
                }
            }
        }
    }

    pub(crate) fn value(&self) -> M {
        self.value.borrow().clone()
    }

    pub(crate) fn commit(&self, value: M) {
        *self.value.borrow_mut() = value;
    }

    pub(crate) fn is_read_only(&self) -> bool {
        self.read_only.get()
    }

    /// Push a model value into the field without reacting to the echo
    pub(crate) fn present(&self, value: Option<M>, ctx: &ValueContext) {
        let _guard = SuppressGuard::engage(&self.suppress);
        self.field.present(value, ctx);
    }

    pub(crate) fn on_field_change(core: &Rc<Self>, from_client: bool) {
        if core.suppress.get() {
            trace!(field = %core.field.id(), "ignoring self-originated change");
            return;
        }
        if let Some(binder) = core.binder() {
            binder.handle_field_change(core, from_client);
        }
    }
}

/// Serializable view of a binding's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingSnapshot<M> {
    pub field: FieldId,
    pub value: M,
    pub read_only: bool,
    pub locale: Locale,
    pub stages: Vec<String>,
}

/// Handle to a bound field
///
/// Keeps its binder alive. After [`unbind`](Self::unbind) every operation
/// except the read-only accessors fails with [`Error::Detached`].
pub struct Binding<M> {
    core: Rc<BindingCore<M>>,
    binder: Rc<BinderInner<M>>,
}

impl<M> Clone for Binding<M> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
            binder: Rc::clone(&self.binder),
        }
    }
}

impl<M> fmt::Debug for Binding<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("field", &self.core.field.id())
            .field("read_only", &self.core.read_only.get())
            .finish()
    }
}

impl<M: Clone + 'static> Binding<M> {
    pub(crate) fn new(core: Rc<BindingCore<M>>, binder: Rc<BinderInner<M>>) -> Self {
        Self { core, binder }
    }

    pub(crate) fn core(&self) -> &Rc<BindingCore<M>> {
        &self.core
    }

    fn attached(&self) -> Result<Rc<BinderInner<M>>> {
        self.core.binder().ok_or_else(Error::detached)
    }

    /// Re-run the chain on the field's current value.
    ///
    /// With `fire_event` the binding handler and the binder handler each see
    /// the status once and a status change event is published. Never commits.
    pub fn validate(&self, fire_event: bool) -> Result<BindingValidationStatus<M>> {
        let binder = self.attached()?;
        let ctx = binder.context(&self.core);
        let status = self.core.status(&ctx);
        if fire_event {
            let binder_results = binder.run_binder_validators(&status, &ctx);
            let binder_status = BinderValidationStatus::new(status.clone(), binder_results);
            binder.publish_status(&self.core, &binder_status);
        }
        Ok(status)
    }

    /// The last committed model value
    pub fn value(&self) -> Result<M> {
        self.attached()?;
        Ok(self.core.value())
    }

    pub fn unbind(&self) -> Result<()> {
        let binder = self.attached()?;
        binder.detach(&self.core);
        Ok(())
    }

    /// A read-only binding keeps validating but never commits
    pub fn set_read_only(&self, read_only: bool) -> Result<()> {
        self.attached()?;
        self.core.read_only.set(read_only);
        self.core.field.set_read_only(read_only);
        Ok(())
    }

    pub fn is_read_only(&self) -> bool {
        self.core.is_read_only()
    }

    /// Load a model value into the field and clear any shown status.
    ///
    /// `Some` also replaces the buffer; `None` presents the null
    /// representation and keeps the buffer.
    pub fn reset(&self, value: Option<M>) -> Result<()> {
        let binder = self.attached()?;
        let ctx = binder.context(&self.core);
        self.core.present(value.clone(), &ctx);
        if let Some(value) = value {
            self.core.commit(value);
        }
        let status = BinderValidationStatus::unresolved(self.core.field.id());
        binder.publish_status(&self.core, &status);
        Ok(())
    }

    pub fn field_id(&self) -> FieldId {
        self.core.field.id()
    }

    pub fn is_bound(&self) -> bool {
        self.core.binder().is_some()
    }

    pub fn binder(&self) -> Result<Binder<M>> {
        self.attached().map(Binder::from_inner)
    }

    /// Route a status through this binding's handler only
    pub fn notify_status_handler(&self, status: &BindingValidationStatus<M>) {
        self.core.notify(status);
    }

    pub fn stage_names(&self) -> Vec<String> {
        self.core.field.stage_names()
    }

    pub fn snapshot(&self) -> Result<BindingSnapshot<M>> {
        let binder = self.attached()?;
        let ctx = binder.context(&self.core);
        Ok(BindingSnapshot {
            field: self.core.field.id(),
            value: self.core.value(),
            read_only: self.core.is_read_only(),
            locale: ctx.locale,
            stages: self.core.field.stage_names(),
        })
    }

    pub fn ptr_eq(&self, other: &Binding<M>) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }
}
