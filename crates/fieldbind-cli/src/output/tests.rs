// Tests for report formatting and the output writer

use super::*;
use crate::handlers::demo::DemoStep;
use fieldbind_core::catalog::ModelKind;
use fieldbind_core::Locale;
use std::cell::RefCell;
use std::rc::Rc;

/// Writer whose contents stay readable after being boxed
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn step(index: usize, step: &str, status: StatusKind, message: Option<&str>, severity: Option<Severity>) -> StepReport {
    StepReport {
        index,
        step: step.to_string(),
        field: "x".to_string(),
        status,
        message: message.map(str::to_string),
        severity,
        committed: Some(status == StatusKind::Ok),
        buffer: "7".to_string(),
        valid: status == StatusKind::Ok,
        label: None,
    }
}

fn sample_report() -> ScenarioReport {
    ScenarioReport {
        name: "age".to_string(),
        model: ModelKind::Integer,
        locale: Locale::new("en-US"),
        stages: vec!["null-representation".to_string(), "converter".to_string(), "range".to_string()],
        steps: vec![
            step(1, "input \"abc\"", StatusKind::Error, Some("This is not a number"), Some(Severity::Error)),
            step(2, "input \"7\"", StatusKind::Ok, Some("Odd"), Some(Severity::Warning)),
        ],
        buffer: "7".to_string(),
        valid: true,
        has_changes: true,
        snapshot: None,
    }
}

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    (OutputWriter::with_writer(format, false, quiet, Box::new(buffer.clone())), buffer)
}

#[test]
fn test_scenario_report_human() {
    let formatted = OutputFormat::Human.format_scenario_report(&sample_report(), false).unwrap();

    assert!(formatted.starts_with("=== Scenario: age (integer, en-US) ==="));
    assert!(formatted.contains("Chain: null-representation -> converter -> range"));
    assert!(formatted.contains("✗ error"));
    assert!(formatted.contains("(not committed)  This is not a number"));
    assert!(formatted.contains("! warning"));
    assert!(formatted.contains("Result: valid, buffer=7, changed"));
}

#[test]
fn test_scenario_report_machine_formats() {
    let report = sample_report();

    let json: serde_json::Value =
        serde_json::from_str(&OutputFormat::Json.format_scenario_report(&report, false).unwrap()).unwrap();
    assert_eq!(json["model"], "integer");
    assert_eq!(json["steps"][0]["status"], "error");
    assert!(json.get("snapshot").is_none());

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(&OutputFormat::Yaml.format_scenario_report(&report, false).unwrap()).unwrap();
    assert_eq!(yaml["locale"], serde_yaml::Value::from("en-US"));
}

#[test]
fn test_demo_report_human() {
    let report = DemoReport {
        name: "text".to_string(),
        description: "Required text".to_string(),
        setup: vec!["initial validation: Value is required".to_string()],
        steps: vec![DemoStep {
            input: "hello".to_string(),
            log: vec!["value changed".to_string()],
            buffer: "hello".to_string(),
            valid: true,
        }],
    };
    let formatted = OutputFormat::Human.format_demo_report(&report, false).unwrap();

    assert!(formatted.contains("=== Demo: text ==="));
    assert!(formatted.contains("  initial validation: Value is required"));
    assert!(formatted.contains("> \"hello\"  valid buffer=hello"));
    assert!(formatted.contains("    value changed"));
}

#[test]
fn test_quiet_suppresses_info_but_not_data() {
    let (mut output, buffer) = writer(OutputFormat::Human, true);
    output.info("hidden").unwrap();
    output.success("hidden").unwrap();
    output.warning("shown").unwrap();
    output.text_or_data("plain", &1).unwrap();

    assert_eq!(buffer.contents(), "WARNING: shown\nplain\n");
}

#[test]
fn test_machine_formats_skip_messages() {
    let (mut output, buffer) = writer(OutputFormat::Json, false);
    output.info("hidden").unwrap();
    output.warning("hidden").unwrap();
    output.text_or_data("plain", &serde_json::json!({ "a": 1 })).unwrap();

    assert_eq!(buffer.contents(), "{\"a\":1}\n");
}
