//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Fieldbind CLI - drive single-field bindings from scenario files
///
/// Builds a binding from a declarative chain, feeds it a sequence of field
/// inputs and reports every validation status along the way.
#[derive(Parser, Debug)]
#[command(
    name = "fieldbind",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "FIELDBIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a scenario file against a binding and report each status
    Check(CheckArgs),

    /// Replay one or all of the built-in demo bindings
    Demo(DemoArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the scenario file (YAML, JSON or TOML)
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Locale used for conversion, overriding scenario and config
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Print the binding snapshot after the last input
    #[arg(long)]
    pub snapshot: bool,
}

#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Demo to replay; all demos run when omitted
    #[arg(value_enum)]
    pub name: Option<DemoName>,

    /// Inputs to feed instead of the configured ones (repeatable)
    #[arg(short, long = "input", value_name = "TEXT")]
    pub inputs: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DemoName {
    /// Required text of 5 to 10 characters
    Text,
    /// Integer between 5 and 10 through a text converter
    Integer,
    /// Float between -10 and 10 with a custom status handler
    Float,
    /// Date that may not lie in the past, shown in a status label
    Date,
}

impl DemoName {
    pub fn all() -> [DemoName; 4] {
        [DemoName::Text, DemoName::Integer, DemoName::Float, DemoName::Date]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DemoName::Text => "text",
            DemoName::Integer => "integer",
            DemoName::Float => "float",
            DemoName::Date => "date",
        }
    }
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Show the effective configuration
    Show(ConfigShowArgs),

    /// Print the configuration file in use, if any
    Path,
}

#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Target file (defaults to the user config location)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Force overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
