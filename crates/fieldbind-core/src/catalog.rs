//! Declarative, serializable chain descriptions
//!
//! Closure-based chains cannot be serialized. A [`ChainSpec`] describes a
//! chain over a text field with built-in converters and validators only,
//! and [`apply`] rebuilds the equivalent runtime chain on a builder.
//!
//! Copyright (c) 2025 Fieldbind Team
//! Licensed under the Apache-2.0 license
//!
//! ```
//! use std::rc::Rc;
//! use fieldbind_core::catalog::{self, ChainSpec};
//! use fieldbind_core::{Binder, MemoryField};
//!
//! let spec: ChainSpec = serde_json::from_str(r#"{
//!     "model": "integer",
//!     "converter": { "message": "Must enter a number" },
//!     "model_validators": [
//!         { "kind": "range", "message": "Between 5 and 10", "min": 5, "max": 10 }
//!     ]
//! }"#).unwrap();
//!
//! let field = Rc::new(MemoryField::text());
//! let binder: Binder<i64> = Binder::new();
//! let binding = catalog::apply(&spec, binder.for_field(Rc::clone(&field))).unwrap().bind(7);
//! field.input("12".to_string());
//! assert_eq!(binding.value().unwrap(), 7);
//! ```

use crate::binder::BindingBuilder;
use crate::chain::{Converter, Validator};
use crate::context::ValueContext;
use crate::converters::{StringToDateConverter, StringToFloatConverter, StringToIntegerConverter};
use crate::error::{Error, Result};
use crate::field::Field;
use crate::result::{ConversionResult, Severity};
use crate::validators;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_NUMBER_MESSAGE: &str = "Must enter a number";
pub const DEFAULT_DATE_MESSAGE: &str = "Must enter a valid date";

/// Model type produced by a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Text,
    Integer,
    Float,
    Date,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::Text => "text",
            ModelKind::Integer => "integer",
            ModelKind::Float => "float",
            ModelKind::Date => "date",
        };
        f.write_str(name)
    }
}

/// Range bound as written in a spec file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Integer(value) => write!(f, "{}", value),
            Bound::Float(value) => write!(f, "{}", value),
            Bound::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidatorSpec {
    Length {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        severity: Option<Severity>,
    },
    Range {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<Bound>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<Bound>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        severity: Option<Severity>,
    },
    Pattern {
        message: String,
        pattern: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        severity: Option<Severity>,
    },
    Email {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        severity: Option<Severity>,
    },
    NotBlank {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        severity: Option<Severity>,
    },
}

impl ValidatorSpec {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ValidatorSpec::Length { .. } => "length",
            ValidatorSpec::Range { .. } => "range",
            ValidatorSpec::Pattern { .. } => "pattern",
            ValidatorSpec::Email { .. } => "email",
            ValidatorSpec::NotBlank { .. } => "not_blank",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ValidatorSpec::Length { message, .. }
            | ValidatorSpec::Range { message, .. }
            | ValidatorSpec::Pattern { message, .. }
            | ValidatorSpec::Email { message, .. }
            | ValidatorSpec::NotBlank { message, .. } => message,
        }
    }

    fn severity(&self) -> Option<Severity> {
        match self {
            ValidatorSpec::Length { severity, .. }
            | ValidatorSpec::Range { severity, .. }
            | ValidatorSpec::Pattern { severity, .. }
            | ValidatorSpec::Email { severity, .. }
            | ValidatorSpec::NotBlank { severity, .. } => *severity,
        }
    }

    fn finish<T: 'static>(&self, validator: Validator<T>) -> Validator<T> {
        match self.severity() {
            Some(severity) => validator.with_severity(severity),
            None => validator,
        }
    }

    /// Build a validator over text
    pub fn build_text(&self) -> Result<Validator<String>> {
        let validator = match self {
            ValidatorSpec::Length { message, min, max, .. } => {
                if let (Some(min), Some(max)) = (min, max) {
                    if min > max {
                        return Err(Error::configuration(format!(
                            "length validator has min {} above max {}",
                            min, max
                        )));
                    }
                }
                validators::string_length(message.clone(), *min, *max)
            }
            ValidatorSpec::Range { .. } => return self.build_ordered::<String>(),
            ValidatorSpec::Pattern { message, pattern, .. } => validators::pattern(message.clone(), pattern)?,
            ValidatorSpec::Email { message, .. } => validators::email(message.clone()),
            ValidatorSpec::NotBlank { message, .. } => validators::not_blank(message.clone()),
        };
        Ok(self.finish(validator))
    }

    /// Build a range validator over an ordered model type
    pub fn build_ordered<T: CatalogModel + PartialOrd>(&self) -> Result<Validator<T>> {
        match self {
            ValidatorSpec::Range { message, min, max, .. } => {
                let min = min.as_ref().map(T::from_bound).transpose()?;
                let max = max.as_ref().map(T::from_bound).transpose()?;
                Ok(self.finish(validators::range(message.clone(), min, max)))
            }
            other => Err(Error::configuration(format!(
                "{} validator applies to text values, not {}",
                other.kind_name(),
                T::KIND
            ))),
        }
    }
}

/// Converter settings for non-text models
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// `chrono` format string for dates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Model value used for blank input instead of failing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_value: Option<String>,
}

/// Full description of a chain over a text field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainSpec {
    #[serde(default)]
    pub model: ModelKind,
    /// Message for the required check, when the field is required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_representation: Option<String>,
    /// Validators run on the raw text, before conversion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presentation_validators: Vec<ValidatorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter: Option<ConverterSpec>,
    /// Validators run on the converted value
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub model_validators: Vec<ValidatorSpec>,
}

/// Model types a [`ChainSpec`] can produce
pub trait CatalogModel: Clone + fmt::Debug + fmt::Display + Serialize + 'static {
    const KIND: ModelKind;

    /// Append the converter for this model, if it needs one
    fn attach_converter<F>(
        builder: BindingBuilder<F, String, Self>,
        spec: Option<&ConverterSpec>,
    ) -> Result<BindingBuilder<F, Self, Self>>
    where
        F: Field<Value = String>;

    fn build_validator(spec: &ValidatorSpec) -> Result<Validator<Self>>;

    fn from_bound(bound: &Bound) -> Result<Self>;

    /// Parse presentation text the way the attached converter would
    fn parse(text: &str, spec: Option<&ConverterSpec>, ctx: &ValueContext) -> Result<Self>;
}

fn converter_message(spec: Option<&ConverterSpec>, default: &str) -> String {
    spec.and_then(|s| s.message.clone())
        .unwrap_or_else(|| default.to_string())
}

fn conversion<T>(result: ConversionResult<T>, text: &str) -> Result<T> {
    result.get_or_throw(|message| Error::configuration(format!("cannot read '{}': {}", text, message)))
}

fn integer_converter(spec: Option<&ConverterSpec>) -> Result<StringToIntegerConverter> {
    let converter = StringToIntegerConverter::new(converter_message(spec, DEFAULT_NUMBER_MESSAGE));
    match spec.and_then(|s| s.empty_value.as_deref()) {
        Some(empty) => {
            let value = empty
                .trim()
                .parse::<i64>()
                .map_err(|e| Error::configuration_with(format!("invalid empty value '{}'", empty), e))?;
            Ok(converter.with_empty_value(value))
        }
        None => Ok(converter),
    }
}

fn float_converter(spec: Option<&ConverterSpec>) -> Result<StringToFloatConverter> {
    let converter = StringToFloatConverter::new(converter_message(spec, DEFAULT_NUMBER_MESSAGE));
    match spec.and_then(|s| s.empty_value.as_deref()) {
        Some(empty) => {
            let value = empty
                .trim()
                .parse::<f64>()
                .map_err(|e| Error::configuration_with(format!("invalid empty value '{}'", empty), e))?;
            Ok(converter.with_empty_value(value))
        }
        None => Ok(converter),
    }
}

fn date_converter(spec: Option<&ConverterSpec>) -> StringToDateConverter {
    let converter = StringToDateConverter::new(converter_message(spec, DEFAULT_DATE_MESSAGE));
    match spec.and_then(|s| s.format.clone()) {
        Some(format) => converter.with_format(format),
        None => converter,
    }
}

impl CatalogModel for String {
    const KIND: ModelKind = ModelKind::Text;

    fn attach_converter<F>(
        builder: BindingBuilder<F, String, Self>,
        spec: Option<&ConverterSpec>,
    ) -> Result<BindingBuilder<F, Self, Self>>
    where
        F: Field<Value = String>,
    {
        match spec {
            Some(_) => Err(Error::configuration("a text model takes no converter")),
            None => Ok(builder),
        }
    }

    fn build_validator(spec: &ValidatorSpec) -> Result<Validator<Self>> {
        spec.build_text()
    }

    fn from_bound(bound: &Bound) -> Result<Self> {
        Ok(bound.to_string())
    }

    fn parse(text: &str, _spec: Option<&ConverterSpec>, _ctx: &ValueContext) -> Result<Self> {
        Ok(text.to_string())
    }
}

impl CatalogModel for i64 {
    const KIND: ModelKind = ModelKind::Integer;

    fn attach_converter<F>(
        builder: BindingBuilder<F, String, Self>,
        spec: Option<&ConverterSpec>,
    ) -> Result<BindingBuilder<F, Self, Self>>
    where
        F: Field<Value = String>,
    {
        Ok(builder.with_converter(integer_converter(spec)?))
    }

    fn build_validator(spec: &ValidatorSpec) -> Result<Validator<Self>> {
        spec.build_ordered()
    }

    fn from_bound(bound: &Bound) -> Result<Self> {
        match bound {
            Bound::Integer(value) => Ok(*value),
            Bound::Float(value) if value.fract() == 0.0 => Ok(*value as i64),
            Bound::Float(value) => Err(Error::configuration(format!("integer bound expected, got {}", value))),
            Bound::Text(text) => text
                .trim()
                .parse()
                .map_err(|e| Error::configuration_with(format!("invalid integer bound '{}'", text), e)),
        }
    }

    fn parse(text: &str, spec: Option<&ConverterSpec>, ctx: &ValueContext) -> Result<Self> {
        let converter = integer_converter(spec)?;
        conversion(converter.convert_to_model(text.to_string(), ctx), text)
    }
}

impl CatalogModel for f64 {
    const KIND: ModelKind = ModelKind::Float;

    fn attach_converter<F>(
        builder: BindingBuilder<F, String, Self>,
        spec: Option<&ConverterSpec>,
    ) -> Result<BindingBuilder<F, Self, Self>>
    where
        F: Field<Value = String>,
    {
        Ok(builder.with_converter(float_converter(spec)?))
    }

    fn build_validator(spec: &ValidatorSpec) -> Result<Validator<Self>> {
        spec.build_ordered()
    }

    fn from_bound(bound: &Bound) -> Result<Self> {
        match bound {
            Bound::Integer(value) => Ok(*value as f64),
            Bound::Float(value) => Ok(*value),
            Bound::Text(text) => text
                .trim()
                .parse()
                .map_err(|e| Error::configuration_with(format!("invalid float bound '{}'", text), e)),
        }
    }

    fn parse(text: &str, spec: Option<&ConverterSpec>, ctx: &ValueContext) -> Result<Self> {
        let converter = float_converter(spec)?;
        conversion(converter.convert_to_model(text.to_string(), ctx), text)
    }
}

impl CatalogModel for NaiveDate {
    const KIND: ModelKind = ModelKind::Date;

    fn attach_converter<F>(
        builder: BindingBuilder<F, String, Self>,
        spec: Option<&ConverterSpec>,
    ) -> Result<BindingBuilder<F, Self, Self>>
    where
        F: Field<Value = String>,
    {
        Ok(builder.with_converter(date_converter(spec)))
    }

    fn build_validator(spec: &ValidatorSpec) -> Result<Validator<Self>> {
        spec.build_ordered()
    }

    fn from_bound(bound: &Bound) -> Result<Self> {
        match bound {
            Bound::Text(text) => NaiveDate::parse_from_str(text.trim(), crate::converters::DEFAULT_DATE_FORMAT)
                .map_err(|e| Error::configuration_with(format!("invalid date bound '{}'", text), e)),
            other => Err(Error::configuration(format!(
                "date bound must be written as YYYY-MM-DD, got {}",
                other
            ))),
        }
    }

    fn parse(text: &str, spec: Option<&ConverterSpec>, ctx: &ValueContext) -> Result<Self> {
        conversion(date_converter(spec).convert_to_model(text.to_string(), ctx), text)
    }
}

/// Rebuild the chain described by `spec` on `builder`.
///
/// Order: null representation, required check, presentation validators,
/// converter, model validators.
pub fn apply<F, M>(spec: &ChainSpec, builder: BindingBuilder<F, String, M>) -> Result<BindingBuilder<F, M, M>>
where
    F: Field<Value = String>,
    M: CatalogModel,
{
    if spec.model != M::KIND {
        return Err(Error::configuration(format!(
            "chain produces {} values but the binder expects {}",
            spec.model,
            M::KIND
        )));
    }

    let mut builder = builder;
    if let Some(sentinel) = &spec.null_representation {
        builder = builder.with_null_representation(sentinel.clone());
    }
    if let Some(message) = &spec.required {
        builder = builder.as_required(message.clone());
    }
    for validator in &spec.presentation_validators {
        builder = builder.with_validator(validator.build_text()?.named(validator.kind_name()));
    }

    let mut builder = M::attach_converter(builder, spec.converter.as_ref())?;
    for validator in &spec.model_validators {
        builder = builder.with_validator(M::build_validator(validator)?.named(validator.kind_name()));
    }
    Ok(builder)
}
