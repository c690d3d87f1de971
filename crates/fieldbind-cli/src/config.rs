//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML, JSON or TOML, chosen by extension)
//! - Environment variables and command-line arguments, applied by the caller

use crate::cli::{DemoName, OutputFormat};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_EXTENSIONS: [&str; 4] = ["yaml", "yml", "json", "toml"];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Locale for conversions; the process locale when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    pub output: OutputConfig,

    pub logging: LoggingSettings,

    /// Inputs replayed by `fieldbind demo`
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output when writing to a terminal
    pub color: bool,
}

/// Logging settings; `-v`, `RUST_LOG` and `FIELDBIND_LOG_*` take precedence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Log format (compact, full, json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub text: Vec<String>,
    pub integer: Vec<String>,
    pub float: Vec<String>,
    /// `YYYY-MM-DD`, `today`, `today+N`, `today-N`, or empty for no date
    pub date: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        let inputs = |values: &[&str]| values.iter().map(|v| v.to_string()).collect();
        Self {
            text: inputs(&["abc", "hello world!", "hello"]),
            integer: inputs(&["abc", "12", "7"]),
            float: inputs(&["2.5", "11", "x", "-3.25"]),
            date: inputs(&["today-1", "today+1", ""]),
        }
    }
}

impl DemoConfig {
    pub fn inputs(&self, demo: DemoName) -> &[String] {
        match demo {
            DemoName::Text => &self.text,
            DemoName::Integer => &self.integer,
            DemoName::Float => &self.float,
            DemoName::Date => &self.date,
        }
    }
}

/// Serialization format of a config or scenario file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
    Toml,
}

impl FileFormat {
    /// Format implied by the file extension; JSON when unknown
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            Some("toml") => FileFormat::Toml,
            _ => FileFormat::Json,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FileFormat::Yaml => "YAML",
            FileFormat::Json => "JSON",
            FileFormat::Toml => "TOML",
        }
    }
}

/// Read and deserialize a YAML, JSON or TOML file
pub fn read_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let value = match FileFormat::from_path(path) {
        FileFormat::Yaml => serde_yaml::from_str(&content)?,
        FileFormat::Toml => toml::from_str(&content)?,
        FileFormat::Json => serde_json::from_str(&content)?,
    };
    Ok(value)
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        read_file(path)
    }

    /// Config file that `load_with_file` would read, if any
    pub fn locate(file: Option<&Path>) -> Option<PathBuf> {
        match file {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_config_paths().into_iter().find(|path| path.exists()),
        }
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            return Self::from_file(path);
        }
        for path in Self::default_config_paths() {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded configuration");
                    return Ok(config);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                }
            }
        }
        Ok(Self::default())
    }

    /// Default location for `fieldbind config init`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fieldbind").join("config.toml"))
    }

    /// Get default configuration file paths to check, in order
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        for ext in CONFIG_EXTENSIONS {
            paths.push(PathBuf::from(format!(".fieldbind.{}", ext)));
        }

        if let Some(config_dir) = dirs::config_dir() {
            let fieldbind_dir = config_dir.join("fieldbind");
            for ext in CONFIG_EXTENSIONS {
                paths.push(fieldbind_dir.join(format!("config.{}", ext)));
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            for ext in CONFIG_EXTENSIONS {
                paths.push(home_dir.join(format!(".fieldbind.{}", ext)));
            }
        }

        paths
    }

    /// Serialize in the given format
    pub fn render(&self, format: FileFormat) -> Result<String> {
        let content = match format {
            FileFormat::Yaml => serde_yaml::to_string(self)?,
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))?,
        };
        Ok(content)
    }

    /// Save configuration to a file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.render(FileFormat::from_path(path))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
