//! Type-changing conversion pipeline from a field value to a model value
//!
//! A [`Pipeline`] is built front to back. Every step re-types the output:
//! converters change `M`, validators keep it. In the model direction each
//! step returns a [`ResultAggregator`], so results recorded by validators
//! survive later conversion failures. In the presentation direction a
//! missing model value travels as `None` and is only turned into a
//! presentation value by the null-representation stage at the front.
//!
//! Copyright (c) 2025 Fieldbind Team
//! Licensed under the Apache-2.0 license

use super::converter::Converter;
use super::null_representation::NullRepresentationAdapter;
use super::validator::Validator;
use crate::context::ValueContext;
use crate::result::ResultAggregator;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

type ModelFn<P, M> = Rc<dyn Fn(P, &ValueContext) -> ResultAggregator<M>>;
type PresentationFn<P, M> = Rc<dyn Fn(Option<M>, &ValueContext) -> Option<P>>;

/// Ordered chain of converter and validator stages
pub struct Pipeline<P, M> {
    to_model: ModelFn<P, M>,
    to_presentation: PresentationFn<P, M>,
    stages: Vec<String>,
}

impl<P, M> Clone for Pipeline<P, M> {
    fn clone(&self) -> Self {
        Self {
            to_model: Rc::clone(&self.to_model),
            to_presentation: Rc::clone(&self.to_presentation),
            stages: self.stages.clone(),
        }
    }
}

impl<P, M> fmt::Debug for Pipeline<P, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline").field("stages", &self.stages).finish()
    }
}

impl<T: 'static> Pipeline<T, T> {
    /// The empty chain; always succeeds and leaves values untouched
    pub fn identity() -> Self {
        Self {
            to_model: Rc::new(|value: T, _ctx: &ValueContext| ResultAggregator::ok(value)),
            to_presentation: Rc::new(|value: Option<T>, _ctx: &ValueContext| value),
            stages: Vec::new(),
        }
    }

    /// Chain head that presents a missing model value as the adapter's sentinel
    pub fn null_representation(adapter: Rc<NullRepresentationAdapter<T>>) -> Self
    where
        T: Clone,
    {
        Self {
            to_model: Rc::new(|value: T, _ctx: &ValueContext| ResultAggregator::ok(value)),
            to_presentation: Rc::new(move |value: Option<T>, _ctx: &ValueContext| {
                value.or_else(|| adapter.represent())
            }),
            stages: vec!["null-representation".to_string()],
        }
    }
}

impl<P: 'static, M: 'static> Pipeline<P, M> {
    /// Append a converter stage. Missing values bypass the converter.
    pub fn then_converter<N, C>(self, converter: C) -> Pipeline<P, N>
    where
        N: 'static,
        C: Converter<M, N> + 'static,
    {
        let name = converter.name();
        let converter = Rc::new(converter);
        let to_presentation_converter = Rc::clone(&converter);
        let previous_model = self.to_model;
        let previous_presentation = self.to_presentation;
        let stage = name.clone();

        let mut stages = self.stages;
        stages.push(name);

        Pipeline {
            to_model: Rc::new(move |value: P, ctx: &ValueContext| {
                previous_model(value, ctx).flat_map(|middle| {
                    trace!(stage = %stage, "converting to model");
                    ResultAggregator::from_result(converter.convert_to_model(middle, ctx))
                })
            }),
            to_presentation: Rc::new(move |value: Option<N>, ctx: &ValueContext| {
                let middle = value.map(|v| to_presentation_converter.convert_to_presentation(v, ctx));
                previous_presentation(middle, ctx)
            }),
            stages,
        }
    }

    /// Append a validator stage; the presentation direction is untouched
    pub fn then_validator(self, validator: Validator<M>) -> Self {
        let previous_model = self.to_model;
        let mut stages = self.stages;
        stages.push(validator.name().to_string());

        Pipeline {
            to_model: Rc::new(move |value: P, ctx: &ValueContext| {
                previous_model(value, ctx).flat_map(|current| {
                    trace!(validator = %validator.name(), "validating");
                    validator.check(current, ctx)
                })
            }),
            to_presentation: self.to_presentation,
            stages,
        }
    }

    /// Append every stage of `next`
    pub fn chain<N: 'static>(self, next: Pipeline<M, N>) -> Pipeline<P, N> {
        let first_model = self.to_model;
        let first_presentation = self.to_presentation;
        let second_model = next.to_model;
        let second_presentation = next.to_presentation;

        let mut stages = self.stages;
        stages.extend(next.stages);

        Pipeline {
            to_model: Rc::new(move |value: P, ctx: &ValueContext| {
                first_model(value, ctx).flat_map(|middle| second_model(middle, ctx))
            }),
            to_presentation: Rc::new(move |value: Option<N>, ctx: &ValueContext| {
                first_presentation(second_presentation(value, ctx), ctx)
            }),
            stages,
        }
    }
}

impl<P, M> Pipeline<P, M> {
    pub fn convert_to_model(&self, value: P, ctx: &ValueContext) -> ResultAggregator<M> {
        (self.to_model)(value, ctx)
    }

    /// `None` means no presentation could be derived; callers fall back to
    /// the field's empty value.
    pub fn convert_to_presentation(&self, value: Option<M>, ctx: &ValueContext) -> Option<P> {
        (self.to_presentation)(value, ctx)
    }

    pub fn stage_names(&self) -> &[String] {
        &self.stages
    }
}
