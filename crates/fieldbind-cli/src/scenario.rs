//! Scenario files
//!
//! A scenario pairs a declarative chain with an initial value and the
//! sequence of steps to apply to an in-memory text field. Running it
//! produces a [`ScenarioReport`] with the binding state after every step.

use crate::config;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use fieldbind_core::catalog::{self, CatalogModel, ChainSpec, ModelKind, ValidatorSpec};
use fieldbind_core::{
    Binder, Field, Locale, MemoryField, MemoryLabel, Severity, StatusKind, ValueChangeEvent, ValueContext,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(default)]
    pub chain: ChainSpec,

    /// Initial model value, written in presentation form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,

    /// Validators run by the binder on the converted value
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub binder_validators: Vec<ValidatorSpec>,

    /// Route binder status into a status label and report its text
    #[serde(default)]
    pub status_label: bool,

    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One step applied to the field or binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    /// User input
    Input(String),
    /// Programmatic value change
    Set { set: String },
    Action { action: Action },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ReadOnly,
    Editable,
    /// Explicit binder validation, firing handlers
    Validate,
    /// Present the null representation and clear the status
    Reset,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Input(text) => write!(f, "input {:?}", text),
            Step::Set { set } => write!(f, "set {:?}", set),
            Step::Action { action } => {
                let name = match action {
                    Action::ReadOnly => "read-only",
                    Action::Editable => "editable",
                    Action::Validate => "validate",
                    Action::Reset => "reset",
                };
                f.write_str(name)
            }
        }
    }
}

/// Binding state after one step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub step: String,
    /// Field text after the step
    pub field: String,
    pub status: StatusKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Whether the step's field change was committed; absent when the step
    /// changed nothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committed: Option<bool>,
    pub buffer: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub model: ModelKind,
    pub locale: Locale,
    pub stages: Vec<String>,
    pub steps: Vec<StepReport>,
    pub buffer: String,
    pub valid: bool,
    pub has_changes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<serde_json::Value>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let scenario: Scenario = config::read_file(path)?;
        debug!(path = %path.display(), steps = scenario.steps.len(), "loaded scenario");
        Ok(scenario)
    }

    /// Locale precedence: explicit override, scenario, config, process
    pub fn resolve_locale(&self, cli: Option<&str>, config: Option<&str>) -> Locale {
        cli.or(self.locale.as_deref())
            .or(config)
            .map(Locale::new)
            .unwrap_or_else(Locale::process_default)
    }

    /// Build the binding, apply every step and report the outcome
    pub fn run(&self, locale: Locale, with_snapshot: bool) -> Result<ScenarioReport> {
        if self.initial.is_none() && self.chain.model != ModelKind::Text {
            return Err(Error::scenario(format!(
                "an initial value is required for {} scenarios",
                self.chain.model
            )));
        }
        match self.chain.model {
            ModelKind::Text => self.run_typed::<String>(locale, with_snapshot),
            ModelKind::Integer => self.run_typed::<i64>(locale, with_snapshot),
            ModelKind::Float => self.run_typed::<f64>(locale, with_snapshot),
            ModelKind::Date => self.run_typed::<NaiveDate>(locale, with_snapshot),
        }
    }

    fn run_typed<M: CatalogModel>(&self, locale: Locale, with_snapshot: bool) -> Result<ScenarioReport> {
        let field = Rc::new(MemoryField::text().with_locale(locale.clone()));
        let mut binder: Binder<M> = Binder::new();
        for spec in &self.binder_validators {
            binder = binder.with_validator(M::build_validator(spec)?);
        }
        let label = Rc::new(MemoryLabel::new());
        if self.status_label {
            binder.set_status_label(Rc::clone(&label))?;
        }

        let ctx = ValueContext::new(locale.clone());
        let initial = M::parse(
            self.initial.as_deref().unwrap_or_default(),
            self.chain.converter.as_ref(),
            &ctx,
        )?;
        let binding = catalog::apply(&self.chain, binder.for_field(Rc::clone(&field)))?.bind(initial);

        let committed = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&committed);
        let _events = binder.add_value_change_listener(move |event: &ValueChangeEvent<M>| {
            *sink.borrow_mut() = Some(event.committed);
        });

        let mut steps = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            debug!(index, step = %step, "applying step");
            let status = match step {
                Step::Input(text) => {
                    field.input(text.clone());
                    binding.validate(false)?
                }
                Step::Set { set } => {
                    field.set_value(set.clone());
                    binding.validate(false)?
                }
                Step::Action { action: Action::ReadOnly } => {
                    binding.set_read_only(true)?;
                    binding.validate(false)?
                }
                Step::Action { action: Action::Editable } => {
                    binding.set_read_only(false)?;
                    binding.validate(false)?
                }
                Step::Action { action: Action::Validate } => binder.validate()?.into_binding_status(),
                Step::Action { action: Action::Reset } => {
                    binding.reset(None)?;
                    binding.validate(false)?
                }
            };

            let display = status.display_result();
            steps.push(StepReport {
                index: index + 1,
                step: step.to_string(),
                field: field.value(),
                status: status.kind(),
                message: display.and_then(|result| result.message()).map(str::to_string),
                severity: display.map(|result| result.severity()),
                committed: committed.borrow_mut().take(),
                buffer: binding.value()?.to_string(),
                valid: binder.is_valid()?,
                label: self.status_label.then(|| label.text()),
            });
        }

        let snapshot = if with_snapshot {
            Some(serde_json::to_value(binding.snapshot()?)?)
        } else {
            None
        };
        let report = ScenarioReport {
            name: self.name.clone().unwrap_or_else(|| "scenario".to_string()),
            model: M::KIND,
            locale,
            stages: binding.stage_names(),
            steps,
            buffer: binding.value()?.to_string(),
            valid: binder.is_valid()?,
            has_changes: binder.has_changes(),
            snapshot,
        };
        info!(name = %report.name, valid = report.valid, steps = report.steps.len(), "scenario finished");
        Ok(report)
    }
}
