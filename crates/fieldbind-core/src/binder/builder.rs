//! Fluent construction of a binding
//!
//! The builder is consumed by [`BindingBuilder::bind`], so a bound chain can
//! no longer be changed. Attaching a converter re-types the builder from
//! `T` to the converter's model type; `bind` is only available once the
//! chain produces the binder's model type `M`.
//!
//! Copyright (c) 2025 Fieldbind Team
//! Licensed under the Apache-2.0 license

use super::binding::{Binding, BindingCore, BindingStatusHandler, FieldPipeline};
use super::engine::Binder;
use super::status::{BinderValidationStatus, BindingValidationStatus};
use crate::chain::{Converter, FnConverter, NullRepresentationAdapter, Pipeline, Validator};
use crate::context::ValueContext;
use crate::error::{Error, Result};
use crate::field::{Field, FieldChange, FieldId, StatusLabel};
use crate::result::Severity;
use std::rc::Rc;
use tracing::{debug, warn};

/// Configures the chain and status output of a binding for field `F`
///
/// `T` is the type the chain currently produces and `M` the binder's model
/// type.
pub struct BindingBuilder<F: Field, T, M> {
    binder: Binder<M>,
    field: Rc<F>,
    pipeline: Pipeline<F::Value, T>,
    null_representation: Rc<NullRepresentationAdapter<F::Value>>,
    status_handler: Option<BindingStatusHandler<M>>,
}

impl<F: Field, T: 'static, M: Clone + 'static> BindingBuilder<F, T, M> {
    pub(crate) fn new(
        binder: Binder<M>,
        field: Rc<F>,
        pipeline: Pipeline<F::Value, T>,
        null_representation: Rc<NullRepresentationAdapter<F::Value>>,
    ) -> Self {
        Self {
            binder,
            field,
            pipeline,
            null_representation,
            status_handler: None,
        }
    }

    pub fn field(&self) -> &Rc<F> {
        &self.field
    }

    pub fn binder(&self) -> &Binder<M> {
        &self.binder
    }

    pub fn stage_names(&self) -> &[String] {
        self.pipeline.stage_names()
    }

    pub fn with_validator(mut self, validator: Validator<T>) -> Self {
        self.pipeline = self.pipeline.then_validator(validator);
        self
    }

    pub fn with_validator_fn<P>(self, predicate: P, message: impl Into<String>) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        self.with_validator(Validator::from_predicate(predicate, message))
    }

    pub fn with_validator_level<P>(self, predicate: P, message: impl Into<String>, severity: Severity) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        self.with_validator(Validator::from_predicate_with_level(predicate, message, severity))
    }

    pub fn with_validator_provider<P, E>(self, predicate: P, provider: E) -> Self
    where
        P: Fn(&T) -> bool + 'static,
        E: Fn(&ValueContext) -> String + 'static,
    {
        self.with_validator(Validator::from_predicate_with_provider(predicate, provider))
    }

    /// Append a converter; the null representation is disabled from here on
    pub fn with_converter<N, C>(self, converter: C) -> BindingBuilder<F, N, M>
    where
        N: 'static,
        C: Converter<T, N> + 'static,
    {
        self.null_representation.disable();
        BindingBuilder {
            binder: self.binder,
            field: self.field,
            pipeline: self.pipeline.then_converter(converter),
            null_representation: self.null_representation,
            status_handler: self.status_handler,
        }
    }

    pub fn with_converter_fns<N, ToModel, ToPresentation>(
        self,
        to_model: ToModel,
        to_presentation: ToPresentation,
    ) -> BindingBuilder<F, N, M>
    where
        N: 'static,
        ToModel: Fn(T) -> N + 'static,
        ToPresentation: Fn(N) -> T + 'static,
    {
        self.with_converter(FnConverter::from_fns(to_model, to_presentation))
    }

    /// Converter whose failures are all reported as `message`
    pub fn with_fallible_converter<N, E, ToModel, ToPresentation>(
        self,
        to_model: ToModel,
        to_presentation: ToPresentation,
        message: impl Into<String>,
    ) -> BindingBuilder<F, N, M>
    where
        N: 'static,
        ToModel: Fn(T) -> std::result::Result<N, E> + 'static,
        ToPresentation: Fn(N) -> T + 'static,
    {
        self.with_converter(FnConverter::from_fallible(to_model, to_presentation, message))
    }

    /// Presentation shown for a missing model value.
    ///
    /// Has no effect once a converter has been attached.
    pub fn with_null_representation(self, value: F::Value) -> Self {
        if !self.null_representation.set_sentinel(value) {
            warn!("null representation ignored because a converter is already attached");
        }
        self
    }

    /// Show the required indicator and append `validator`
    pub fn as_required_with(self, validator: Validator<T>) -> Self {
        if let Some(indicator) = self.field.required_indicator() {
            indicator.set_required_indicator_visible(true);
        }
        self.with_validator(validator)
    }

    /// Replace the field's error display with `handler`
    pub fn with_validation_status_handler<H>(self, handler: H) -> Result<Self>
    where
        H: Fn(&BindingValidationStatus<M>) + 'static,
    {
        self.set_status_handler(Rc::new(handler))
    }

    /// Show the binding's error message in `label` instead of the field
    pub fn with_status_label<L: StatusLabel + 'static>(self, label: Rc<L>) -> Result<Self> {
        let label: Rc<dyn StatusLabel> = label;
        self.set_status_handler(Rc::new(move |status: &BindingValidationStatus<M>| {
            label.set_text(status.message().unwrap_or(""));
            label.set_visible(status.is_error());
        }))
    }

    fn set_status_handler(mut self, handler: BindingStatusHandler<M>) -> Result<Self> {
        if self.status_handler.is_some() {
            return Err(Error::HandlerAlreadySet {
                message: "a status handler or status label is already set for this binding".to_string(),
            });
        }
        self.status_handler = Some(handler);
        Ok(self)
    }
}

impl<F: Field, M: Clone + 'static> BindingBuilder<F, F::Value, M> {
    /// Reject the field's empty value with `message`
    pub fn as_required(self, message: impl Into<String>) -> Self {
        let empty = self.field.empty_value();
        let validator = Validator::from_predicate(move |value: &F::Value| *value != empty, message);
        self.as_required_with(validator.named("required"))
    }

    pub fn as_required_with_provider<E>(self, provider: E) -> Self
    where
        E: Fn(&ValueContext) -> String + 'static,
    {
        let empty = self.field.empty_value();
        let validator = Validator::from_predicate_with_provider(move |value: &F::Value| *value != empty, provider);
        self.as_required_with(validator.named("required"))
    }
}

impl<F: Field, M: Clone + 'static> BindingBuilder<F, M, M> {
    /// Finish the binding and make it the binder's active one.
    ///
    /// `initial` becomes the buffer and is written to the field without
    /// triggering validation. Handlers receive an unresolved status, so no
    /// stale error stays visible.
    pub fn bind(self, initial: M) -> Binding<M> {
        let BindingBuilder {
            binder,
            field,
            pipeline,
            status_handler,
            ..
        } = self;

        let id = FieldId::of(&field);
        let bound = FieldPipeline::new(Rc::clone(&field), pipeline);
        let core = Rc::new(BindingCore::new(Box::new(bound), status_handler, initial.clone()));

        let listener_core = Rc::downgrade(&core);
        let registration = field.add_change_listener(Box::new(move |change: &FieldChange<F::Value>| {
            if let Some(core) = listener_core.upgrade() {
                BindingCore::on_field_change(&core, change.from_client);
            }
        }));
        core.set_registration(registration);

        binder.inner.install(Rc::clone(&core));
        let ctx = binder.inner.context(&core);
        core.present(Some(initial), &ctx);
        binder
            .inner
            .publish_status(&core, &BinderValidationStatus::unresolved(id));

        debug!(field = %id, stages = ?core.field.stage_names(), "field bound");
        Binding::new(core, Rc::clone(&binder.inner))
    }
}
