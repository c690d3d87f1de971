//! Built-in demo bindings
//!
//! Four small forms, each binding one field in a different way: a required
//! text field, an integer behind a text converter, a float with a custom
//! status handler and a date reported through a status label. Inputs are
//! replayed as if typed by the user and everything the listeners and
//! handlers print is captured per input.

use crate::cli::{DemoArgs, DemoName, OutputFormat};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use fieldbind_core::converters::{DateToDateTimeConverter, StringToFloatConverter, StringToIntegerConverter};
use fieldbind_core::{
    validators, Binder, BindingValidationStatus, FixedLocale, Locale, MemoryField, MemoryLabel, ValueChangeEvent,
};
use serde::Serialize;
use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoReport {
    pub name: String,
    pub description: String,
    /// Lines printed while the form was set up
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub setup: Vec<String>,
    pub steps: Vec<DemoStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoStep {
    pub input: String,
    /// Lines printed by listeners and handlers for this input
    pub log: Vec<String>,
    pub buffer: String,
    pub valid: bool,
}

/// Collects the lines that the demo callbacks print
#[derive(Clone, Default)]
struct Console(Rc<RefCell<Vec<String>>>);

impl Console {
    fn println(&self, line: String) {
        debug!(line = %line, "demo output");
        self.0.borrow_mut().push(line);
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Handle the demo command
#[instrument(skip(config, output), fields(demo = ?args.name))]
pub fn handle_demo(args: DemoArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let locale = config
        .locale
        .as_deref()
        .map(Locale::new)
        .unwrap_or_else(Locale::process_default);
    let names = match args.name {
        Some(name) => vec![name],
        None => DemoName::all().to_vec(),
    };

    let mut reports = Vec::with_capacity(names.len());
    for name in names {
        let inputs = if args.inputs.is_empty() {
            config.demo.inputs(name).to_vec()
        } else {
            args.inputs.clone()
        };
        let _timer = Timer::new(&format!("demo_{}", name.as_str()));
        reports.push(run_demo(name, &inputs, locale.clone())?);
    }

    if output.format() == OutputFormat::Human {
        for report in &reports {
            output.demo_report(report)?;
        }
        Ok(())
    } else if let [report] = reports.as_slice() {
        output.data(report)
    } else {
        output.data(&reports)
    }
}

pub fn run_demo(name: DemoName, inputs: &[String], locale: Locale) -> Result<DemoReport> {
    match name {
        DemoName::Text => text_demo(inputs, locale),
        DemoName::Integer => integer_demo(inputs, locale),
        DemoName::Float => float_demo(inputs, locale),
        DemoName::Date => date_demo(inputs, locale),
    }
}

/// Prints every value change together with the binder state it left behind
fn print_value_changes<M>(binder: &Binder<M>, console: &Console)
where
    M: Clone + Debug + 'static,
{
    let observer = binder.clone();
    let console = console.clone();
    // Lives as long as the binder
    let _registration = binder.add_value_change_listener(move |event: &ValueChangeEvent<M>| {
        let valid = observer.is_valid().unwrap_or(false);
        match observer.value() {
            Ok(buffer) => console.println(format!(
                "value changed: converted={:?}, buffer={:?}, valid={}",
                event.value, buffer, valid
            )),
            Err(e) => console.println(format!("value changed while detached: {}", e)),
        }
    });
}

fn text_demo(inputs: &[String], locale: Locale) -> Result<DemoReport> {
    let console = Console::default();
    let field = Rc::new(MemoryField::text().with_locale(locale));
    let binder: Binder<String> = Binder::new();
    let binding = binder
        .for_field(Rc::clone(&field))
        .as_required("Value is required")
        .with_validator(validators::string_length(
            "Must be between 5 and 10 characters",
            Some(5),
            Some(10),
        ))
        .bind(String::new());

    if let Some(message) = binder.validate()?.first_error_message() {
        console.println(format!("initial validation: {}", message));
    }
    print_value_changes(&binder, &console);
    let setup = console.take();

    let mut steps = Vec::with_capacity(inputs.len());
    for input in inputs {
        field.input(input.clone());
        if let Some(error) = field.error_message() {
            console.println(format!("field error: {}", error));
        }
        steps.push(DemoStep {
            input: input.clone(),
            log: console.take(),
            buffer: binding.value()?,
            valid: binder.is_valid()?,
        });
    }

    Ok(DemoReport {
        name: DemoName::Text.as_str().to_string(),
        description: "Required text field of 5 to 10 characters".to_string(),
        setup,
        steps,
    })
}

fn integer_demo(inputs: &[String], locale: Locale) -> Result<DemoReport> {
    let console = Console::default();
    let field = Rc::new(MemoryField::text().with_locale(locale));
    let binder: Binder<i64> = Binder::new();
    let binding = binder
        .for_field(Rc::clone(&field))
        .with_converter(StringToIntegerConverter::new("This is not a number"))
        .with_validator(validators::range("Give a number between 5 and 10", Some(5), Some(10)))
        .bind(5);
    print_value_changes(&binder, &console);

    let mut steps = Vec::with_capacity(inputs.len());
    for input in inputs {
        field.input(input.clone());
        if let Some(error) = field.error_message() {
            console.println(format!("field error: {}", error));
        }
        steps.push(DemoStep {
            input: input.clone(),
            log: console.take(),
            buffer: binding.value()?.to_string(),
            valid: binder.is_valid()?,
        });
    }

    Ok(DemoReport {
        name: DemoName::Integer.as_str().to_string(),
        description: "Integer between 5 and 10 typed into a text field".to_string(),
        setup: Vec::new(),
        steps,
    })
}

fn float_demo(inputs: &[String], locale: Locale) -> Result<DemoReport> {
    let console = Console::default();
    let field = Rc::new(MemoryField::text());

    let handler_console = console.clone();
    let binding = Binder::of(Rc::clone(&field))
        .with_converter(StringToFloatConverter::new("This is not a number"))
        .with_validator(validators::range(
            "Give a number between -10 and 10",
            Some(-10.0),
            Some(10.0),
        ))
        .with_validation_status_handler(move |status: &BindingValidationStatus<f64>| {
            if let Some(message) = status.message() {
                handler_console.println(format!("notification: {}", message));
            }
            if let (false, Some(value)) = (status.is_error(), status.value()) {
                handler_console.println(format!("latest valid value: {}", value));
            }
        })?
        .bind(0.0);
    let binder = binding.binder()?;
    binder.set_locale_resolver(Rc::new(FixedLocale(locale)));
    // Bind publishes an unresolved status, which the handler ignores
    console.take();

    let mut steps = Vec::with_capacity(inputs.len());
    for input in inputs {
        field.input(input.clone());
        steps.push(DemoStep {
            input: input.clone(),
            log: console.take(),
            buffer: binding.value()?.to_string(),
            valid: binder.is_valid()?,
        });
    }

    Ok(DemoReport {
        name: DemoName::Float.as_str().to_string(),
        description: "Float between -10 and 10 reported through notifications".to_string(),
        setup: Vec::new(),
        steps,
    })
}

fn date_demo(inputs: &[String], locale: Locale) -> Result<DemoReport> {
    let today = Utc::now().date_naive();
    let field: Rc<MemoryField<Option<NaiveDate>>> = Rc::new(MemoryField::new(None).with_locale(locale));
    let label = Rc::new(MemoryLabel::new());

    let binding = Binder::of(Rc::clone(&field))
        .with_validator(validators::range("Date can't be in the past", Some(today), None).optional())
        .with_converter(DateToDateTimeConverter::new())
        .with_status_label(Rc::clone(&label))?
        .bind(Utc::now());
    let binder = binding.binder()?;

    let mut steps = Vec::with_capacity(inputs.len());
    for input in inputs {
        field.input(parse_date_input(input, today)?);
        let mut log = Vec::new();
        if label.is_visible() {
            log.push(format!("status label: {}", label.text()));
        }
        steps.push(DemoStep {
            input: input.clone(),
            log,
            buffer: format_instant(binding.value()?),
            valid: binder.is_valid()?,
        });
    }

    Ok(DemoReport {
        name: DemoName::Date.as_str().to_string(),
        description: "Date that may not lie in the past, with errors in a status label".to_string(),
        setup: Vec::new(),
        steps,
    })
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parse `YYYY-MM-DD`, `today`, `today+N` or `today-N`; empty means no date
fn parse_date_input(input: &str, today: NaiveDate) -> Result<Option<NaiveDate>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let invalid = || Error::other(format!("Invalid date input '{}': expected YYYY-MM-DD or today[+-N]", input));

    if let Some(offset) = input.strip_prefix("today") {
        let days = match offset {
            "" => 0,
            _ if offset.starts_with('+') || offset.starts_with('-') => {
                offset.parse::<i64>().map_err(|_| invalid())?
            }
            _ => return Err(invalid()),
        };
        return today
            .checked_add_signed(Duration::days(days))
            .map(Some)
            .ok_or_else(invalid);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn en() -> Locale {
        Locale::new("en-US")
    }

    #[test]
    fn test_text_demo_reports_listener_output() {
        let report = run_demo(DemoName::Text, &inputs(&["abc", "hello"]), en()).unwrap();

        assert_eq!(report.setup, vec!["initial validation: Value is required"]);
        assert_eq!(report.steps[0].buffer, "");
        assert!(!report.steps[0].valid);
        assert!(report.steps[0]
            .log
            .contains(&"field error: Must be between 5 and 10 characters".to_string()));
        assert_eq!(report.steps[1].buffer, "hello");
        assert!(report.steps[1].valid);
        assert_eq!(
            report.steps[1].log,
            vec!["value changed: converted=Some(\"hello\"), buffer=\"hello\", valid=true"]
        );
    }

    #[test]
    fn test_integer_demo_distinguishes_error_kinds() {
        let report = run_demo(DemoName::Integer, &inputs(&["abc", "12", "7"]), en()).unwrap();

        let buffers: Vec<&str> = report.steps.iter().map(|s| s.buffer.as_str()).collect();
        assert_eq!(buffers, vec!["5", "5", "7"]);
        assert!(report.steps[0].log.contains(&"field error: This is not a number".to_string()));
        assert!(report.steps[1]
            .log
            .contains(&"field error: Give a number between 5 and 10".to_string()));
        assert!(report.steps[2].valid);
    }

    #[test]
    fn test_float_demo_uses_notifications() {
        let report = run_demo(DemoName::Float, &inputs(&["2.5", "11", "x"]), en()).unwrap();

        assert_eq!(report.steps[0].log, vec!["latest valid value: 2.5"]);
        assert_eq!(report.steps[1].log, vec!["notification: Give a number between -10 and 10"]);
        assert_eq!(report.steps[2].log, vec!["notification: This is not a number"]);
        assert_eq!(report.steps[2].buffer, "2.5");
    }

    #[test]
    fn test_date_demo_label_and_fallback() {
        let report = run_demo(DemoName::Date, &inputs(&["today-1", "today+1", ""]), en()).unwrap();

        assert_eq!(report.steps[0].log, vec!["status label: Date can't be in the past"]);
        assert!(!report.steps[0].valid);
        assert!(report.steps[1].log.is_empty());
        assert_eq!(report.steps[2].buffer, "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_parse_date_input() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        assert_eq!(parse_date_input("", today).unwrap(), None);
        assert_eq!(parse_date_input("today", today).unwrap(), Some(today));
        assert_eq!(
            parse_date_input("today+2", today).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(
            parse_date_input("2023-12-31", today).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
        assert!(parse_date_input("tomorrow", today).is_err());
        assert!(parse_date_input("today*2", today).is_err());
    }
}
