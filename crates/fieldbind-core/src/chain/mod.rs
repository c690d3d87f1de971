//! Converter and validator chain
//!
//! - [`converter`] - the [`Converter`] trait, composition and closure-backed
//!   converters
//! - [`validator`] - [`Validator`], a named predicate usable as a chain stage
//! - [`null_representation`] - the one-shot adapter for missing model values
//! - [`pipeline`] - [`Pipeline`], the ordered, type-changing stage list a
//!   binding runs
//!
//! Copyright (c) 2025 Fieldbind Team
//! Licensed under the Apache-2.0 license

pub mod converter;
pub mod null_representation;
pub mod pipeline;
pub mod validator;

pub use converter::{Chained, Converter, FnConverter, Identity};
pub use null_representation::NullRepresentationAdapter;
pub use pipeline::Pipeline;
pub use validator::Validator;
