//! Two-way conversion between a presentation type and a model type
//!
//! Copyright (c) 2025 Fieldbind Team
//! Licensed under the Apache-2.0 license

use crate::context::ValueContext;
use crate::result::ConversionResult;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// A named transformation `P -> M` with an inverse `M -> P` for redisplay
///
/// The model direction may fail with a user-facing message; the presentation
/// direction is total.
pub trait Converter<P, M> {
    fn convert_to_model(&self, value: P, ctx: &ValueContext) -> ConversionResult<M>;

    fn convert_to_presentation(&self, value: M, ctx: &ValueContext) -> P;

    /// Name used in stage listings and trace output
    fn name(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Compose with a converter that continues from this one's model type
    fn chain<N, C>(self, next: C) -> Chained<Self, C, M>
    where
        Self: Sized,
        C: Converter<M, N>,
    {
        Chained {
            first: self,
            second: next,
            _middle: PhantomData,
        }
    }
}

impl<P, M, C> Converter<P, M> for Box<C>
where
    C: Converter<P, M> + ?Sized,
{
    fn convert_to_model(&self, value: P, ctx: &ValueContext) -> ConversionResult<M> {
        (**self).convert_to_model(value, ctx)
    }

    fn convert_to_presentation(&self, value: M, ctx: &ValueContext) -> P {
        (**self).convert_to_presentation(value, ctx)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

impl<P, M, C> Converter<P, M> for Rc<C>
where
    C: Converter<P, M> + ?Sized,
{
    fn convert_to_model(&self, value: P, ctx: &ValueContext) -> ConversionResult<M> {
        (**self).convert_to_model(value, ctx)
    }

    fn convert_to_presentation(&self, value: M, ctx: &ValueContext) -> P {
        (**self).convert_to_presentation(value, ctx)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// Strip module paths and generic arguments from a type name
pub(crate) fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// The no-op converter; an empty chain behaves like this
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl<T> Converter<T, T> for Identity {
    fn convert_to_model(&self, value: T, _ctx: &ValueContext) -> ConversionResult<T> {
        ConversionResult::Ok(value)
    }

    fn convert_to_presentation(&self, value: T, _ctx: &ValueContext) -> T {
        value
    }

    fn name(&self) -> String {
        "identity".to_string()
    }
}

/// Result of [`Converter::chain`]
///
/// Model direction runs `first` then `second`, stopping at the first error.
/// Presentation direction runs `second` then `first`.
pub struct Chained<A, B, M> {
    first: A,
    second: B,
    _middle: PhantomData<fn() -> M>,
}

impl<A: Clone, B: Clone, M> Clone for Chained<A, B, M> {
    fn clone(&self) -> Self {
        Self {
            first: self.first.clone(),
            second: self.second.clone(),
            _middle: PhantomData,
        }
    }
}

impl<A: fmt::Debug, B: fmt::Debug, M> fmt::Debug for Chained<A, B, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chained")
            .field("first", &self.first)
            .field("second", &self.second)
            .finish()
    }
}

impl<P, M, N, A, B> Converter<P, N> for Chained<A, B, M>
where
    A: Converter<P, M>,
    B: Converter<M, N>,
{
    fn convert_to_model(&self, value: P, ctx: &ValueContext) -> ConversionResult<N> {
        self.first
            .convert_to_model(value, ctx)
            .flat_map(|middle| self.second.convert_to_model(middle, ctx))
    }

    fn convert_to_presentation(&self, value: N, ctx: &ValueContext) -> P {
        let middle = self.second.convert_to_presentation(value, ctx);
        self.first.convert_to_presentation(middle, ctx)
    }

    fn name(&self) -> String {
        format!("{} -> {}", self.first.name(), self.second.name())
    }
}

type ToModelFn<P, M> = Rc<dyn Fn(P, &ValueContext) -> ConversionResult<M>>;
type ToPresentationFn<P, M> = Rc<dyn Fn(M, &ValueContext) -> P>;

/// Converter built from a pair of closures
pub struct FnConverter<P, M> {
    name: String,
    to_model: ToModelFn<P, M>,
    to_presentation: ToPresentationFn<P, M>,
}

impl<P, M> Clone for FnConverter<P, M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            to_model: Rc::clone(&self.to_model),
            to_presentation: Rc::clone(&self.to_presentation),
        }
    }
}

impl<P, M> fmt::Debug for FnConverter<P, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConverter").field("name", &self.name).finish()
    }
}

impl<P: 'static, M: 'static> FnConverter<P, M> {
    /// Context-aware closures with full control over the failure message
    pub fn new<ToModel, ToPresentation>(to_model: ToModel, to_presentation: ToPresentation) -> Self
    where
        ToModel: Fn(P, &ValueContext) -> ConversionResult<M> + 'static,
        ToPresentation: Fn(M, &ValueContext) -> P + 'static,
    {
        Self {
            name: "converter".to_string(),
            to_model: Rc::new(to_model),
            to_presentation: Rc::new(to_presentation),
        }
    }

    /// Infallible conversion in both directions
    pub fn from_fns<ToModel, ToPresentation>(to_model: ToModel, to_presentation: ToPresentation) -> Self
    where
        ToModel: Fn(P) -> M + 'static,
        ToPresentation: Fn(M) -> P + 'static,
    {
        Self::new(
            move |value, _ctx| ConversionResult::Ok(to_model(value)),
            move |value, _ctx| to_presentation(value),
        )
    }

    /// Fallible model direction; any error is reported as `message`
    pub fn from_fallible<E, ToModel, ToPresentation>(
        to_model: ToModel,
        to_presentation: ToPresentation,
        message: impl Into<String>,
    ) -> Self
    where
        ToModel: Fn(P) -> Result<M, E> + 'static,
        ToPresentation: Fn(M) -> P + 'static,
    {
        let message = message.into();
        Self::new(
            move |value, _ctx| match to_model(value) {
                Ok(converted) => ConversionResult::Ok(converted),
                Err(_) => ConversionResult::Err(message.clone()),
            },
            move |value, _ctx| to_presentation(value),
        )
    }

    /// Fallible model direction; the error's display text is the message
    pub fn from_result<E, ToModel, ToPresentation>(to_model: ToModel, to_presentation: ToPresentation) -> Self
    where
        E: fmt::Display,
        ToModel: Fn(P) -> Result<M, E> + 'static,
        ToPresentation: Fn(M) -> P + 'static,
    {
        Self::new(
            move |value, _ctx| ConversionResult::from_result(to_model(value)),
            move |value, _ctx| to_presentation(value),
        )
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<P, M> Converter<P, M> for FnConverter<P, M> {
    fn convert_to_model(&self, value: P, ctx: &ValueContext) -> ConversionResult<M> {
        (self.to_model)(value, ctx)
    }

    fn convert_to_presentation(&self, value: M, ctx: &ValueContext) -> P {
        (self.to_presentation)(value, ctx)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}
