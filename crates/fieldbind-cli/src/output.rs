//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! human formatting for scenario and demo reports.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::handlers::demo::DemoReport;
use crate::scenario::{ScenarioReport, StepReport};
use colored::Colorize;
use fieldbind_core::{Severity, StatusKind};
use serde::Serialize;
use std::io::{self, Write};
use tracing::trace;

/// Formatting with specialized support for report types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    fn format_scenario_report(&self, report: &ScenarioReport, use_color: bool) -> Result<String>;

    fn format_demo_report(&self, report: &DemoReport, use_color: bool) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // Types without a dedicated human layout fall back to pretty JSON
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_scenario_report(&self, report: &ScenarioReport, use_color: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_scenario_report_human(report, use_color)),
            _ => self.format(report),
        }
    }

    fn format_demo_report(&self, report: &DemoReport, use_color: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_demo_report_human(report, use_color)),
            _ => self.format(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Informational line, human format only
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "writing data");
        self.writeln(formatted.trim_end())
    }

    /// Plain text in human format, `value` otherwise
    pub fn text_or_data<T: Serialize>(&mut self, text: &str, value: &T) -> Result<()> {
        if self.format == OutputFormat::Human {
            self.writeln(text)
        } else {
            self.data(value)
        }
    }

    pub fn scenario_report(&mut self, report: &ScenarioReport) -> Result<()> {
        let formatted = self.format.format_scenario_report(report, self.use_color)?;
        self.writeln(formatted.trim_end())
    }

    pub fn demo_report(&mut self, report: &DemoReport) -> Result<()> {
        let formatted = self.format.format_demo_report(report, self.use_color)?;
        self.writeln(formatted.trim_end())
    }
}

fn header(title: &str, use_color: bool) -> String {
    if use_color {
        format!("═══ {} ═══", title).bright_blue().to_string()
    } else {
        format!("=== {} ===", title)
    }
}

fn validity(valid: bool, use_color: bool) -> String {
    match (valid, use_color) {
        (true, true) => "valid".green().to_string(),
        (false, true) => "invalid".red().bold().to_string(),
        (true, false) => "valid".to_string(),
        (false, false) => "invalid".to_string(),
    }
}

fn status_marker(step: &StepReport, use_color: bool) -> String {
    let (marker, name) = match (step.status, step.severity) {
        (StatusKind::Error, _) => ("✗", "error"),
        (StatusKind::Unresolved, _) => ("·", "unresolved"),
        (StatusKind::Ok, Some(Severity::Warning)) => ("!", "warning"),
        (StatusKind::Ok, Some(Severity::Info)) => ("i", "info"),
        (StatusKind::Ok, _) => ("✓", "ok"),
    };
    let text = format!("{} {:<10}", marker, name);
    if !use_color {
        return text;
    }
    match step.status {
        StatusKind::Error => text.red().to_string(),
        StatusKind::Unresolved => text.dimmed().to_string(),
        StatusKind::Ok if step.severity.is_some() => text.yellow().to_string(),
        StatusKind::Ok => text.green().to_string(),
    }
}

/// Format a scenario report for human reading
fn format_scenario_report_human(report: &ScenarioReport, use_color: bool) -> String {
    let mut output = String::new();
    output.push_str(&header(
        &format!("Scenario: {} ({}, {})", report.name, report.model, report.locale),
        use_color,
    ));
    output.push('\n');
    output.push_str(&format!("Chain: {}\n\n", report.stages.join(" -> ")));

    let width = report.steps.iter().map(|s| s.step.chars().count()).max().unwrap_or(0);
    for step in &report.steps {
        output.push_str(&format!(
            "{:>3}. {:<width$}  {}",
            step.index,
            step.step,
            status_marker(step, use_color),
            width = width
        ));
        output.push_str(&format!(" buffer={}", step.buffer));
        if let Some(false) = step.committed {
            output.push_str(" (not committed)");
        }
        if let Some(message) = &step.message {
            output.push_str(&format!("  {}", message));
        }
        if let Some(label) = step.label.as_deref().filter(|l| !l.is_empty()) {
            output.push_str(&format!("  [label: {}]", label));
        }
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&format!(
        "Result: {}, buffer={}, {}\n",
        validity(report.valid, use_color),
        report.buffer,
        if report.has_changes { "changed" } else { "unchanged" }
    ));
    if let Some(snapshot) = &report.snapshot {
        output.push_str("Snapshot:\n");
        output.push_str(&serde_json::to_string_pretty(snapshot).unwrap_or_default());
        output.push('\n');
    }
    output
}

/// Format a demo report for human reading
fn format_demo_report_human(report: &DemoReport, use_color: bool) -> String {
    let mut output = String::new();
    output.push_str(&header(&format!("Demo: {}", report.name), use_color));
    output.push('\n');
    output.push_str(&report.description);
    output.push('\n');
    for line in &report.setup {
        output.push_str(&format!("  {}\n", line));
    }
    output.push('\n');

    for step in &report.steps {
        let input = if use_color {
            format!("{:?}", step.input).bold().to_string()
        } else {
            format!("{:?}", step.input)
        };
        output.push_str(&format!(
            "> {}  {} buffer={}\n",
            input,
            validity(step.valid, use_color),
            step.buffer
        ));
        for line in &step.log {
            output.push_str(&format!("    {}\n", line));
        }
    }
    output
}

#[cfg(test)]
pub(crate) mod tests;
