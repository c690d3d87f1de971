//! Validation statuses reported to status handlers
//!
//! Copyright (c) 2025 Fieldbind Team
//! Licensed under the Apache-2.0 license

use crate::field::FieldId;
use crate::result::{ConversionResult, ResultAggregator, ValidationResult};
use serde::{Deserialize, Serialize};

/// Outcome class of a binding validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Ok,
    Error,
    /// Nothing has been validated yet; handlers clear their display
    Unresolved,
}

/// Status of one binding after running its chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingValidationStatus<M> {
    kind: StatusKind,
    field: FieldId,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<M>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<ValidationResult>,
    #[serde(default)]
    validation_results: Vec<ValidationResult>,
}

impl<M> BindingValidationStatus<M> {
    pub fn from_aggregator(field: FieldId, aggregator: ResultAggregator<M>) -> Self {
        let (result, validation_results) = aggregator.into_parts();
        let (kind, value, result) = match result {
            ConversionResult::Ok(value) => (StatusKind::Ok, Some(value), ValidationResult::ok()),
            ConversionResult::Err(message) => (StatusKind::Error, None, ValidationResult::error(message)),
        };
        Self {
            kind,
            field,
            value,
            result: Some(result),
            validation_results,
        }
    }

    pub fn unresolved(field: FieldId) -> Self {
        Self {
            kind: StatusKind::Unresolved,
            field,
            value: None,
            result: None,
            validation_results: Vec::new(),
        }
    }

    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }

    pub fn field(&self) -> FieldId {
        self.field
    }

    /// Converted value when the chain succeeded
    pub fn value(&self) -> Option<&M> {
        self.value.as_ref()
    }

    /// Overall outcome; `None` while unresolved
    pub fn result(&self) -> Option<&ValidationResult> {
        self.result.as_ref()
    }

    /// Every result recorded along the chain, in stage order
    pub fn validation_results(&self) -> &[ValidationResult] {
        &self.validation_results
    }

    pub fn message(&self) -> Option<&str> {
        if !self.is_error() {
            return None;
        }
        self.result.as_ref().and_then(ValidationResult::message)
    }

    /// The result a field should display
    ///
    /// On error this is the worst validator error, or the conversion failure
    /// when no validator failed. Otherwise it is the first non-ok result in
    /// chain order, if any.
    pub fn display_result(&self) -> Option<&ValidationResult> {
        match self.kind {
            StatusKind::Error => ValidationResult::worst(&self.validation_results)
                .filter(|r| r.is_error())
                .or(self.result.as_ref()),
            StatusKind::Ok => self.validation_results.iter().find(|r| !r.is_ok()),
            StatusKind::Unresolved => None,
        }
    }
}

/// Status of a whole binder: the binding status plus binder-level results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinderValidationStatus<M> {
    binding_status: BindingValidationStatus<M>,
    #[serde(default)]
    binder_results: Vec<ValidationResult>,
}

impl<M> BinderValidationStatus<M> {
    pub fn new(binding_status: BindingValidationStatus<M>, binder_results: Vec<ValidationResult>) -> Self {
        Self {
            binding_status,
            binder_results,
        }
    }

    pub fn unresolved(field: FieldId) -> Self {
        Self::new(BindingValidationStatus::unresolved(field), Vec::new())
    }

    pub fn is_ok(&self) -> bool {
        !self.has_error()
    }

    pub fn has_error(&self) -> bool {
        self.binding_status.is_error() || self.binder_results.iter().any(ValidationResult::is_error)
    }

    pub fn field_validation_status(&self) -> &BindingValidationStatus<M> {
        &self.binding_status
    }

    pub fn field_validation_error(&self) -> Option<&BindingValidationStatus<M>> {
        self.binding_status.is_error().then_some(&self.binding_status)
    }

    pub fn binder_results(&self) -> &[ValidationResult] {
        &self.binder_results
    }

    /// Field error first, then binder-level errors in registration order
    pub fn validation_errors(&self) -> Vec<&ValidationResult> {
        let field_error = self
            .field_validation_error()
            .and_then(BindingValidationStatus::result);
        field_error
            .into_iter()
            .chain(self.binder_results.iter().filter(|r| r.is_error()))
            .collect()
    }

    pub fn first_error_message(&self) -> Option<&str> {
        self.validation_errors()
            .into_iter()
            .find_map(ValidationResult::message)
    }

    pub fn into_binding_status(self) -> BindingValidationStatus<M> {
        self.binding_status
    }
}
