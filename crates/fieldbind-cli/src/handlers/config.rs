//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::{Config, FileFormat};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use anyhow::Context;
use std::path::PathBuf;

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, config_file: Option<PathBuf>, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
        ConfigAction::Path => handle_config_path(config_file, output),
    }
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => Config::user_config_path().ok_or_else(|| Error::config("Unable to determine user config directory"))?,
    };

    if path.exists() && !args.force {
        output.warning(&format!("Config already exists at {} (use --force to overwrite)", path.display()))?;
        return Ok(());
    }

    Config::default()
        .save(&path)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    output.success(&format!("✓ Created config at {}", path.display()))?;
    output.info("Edit it to change the locale, output format or demo inputs.")?;
    Ok(())
}

/// Handle config show subcommand
fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let format = match args.format {
        ConfigFormat::Toml => FileFormat::Toml,
        ConfigFormat::Json => FileFormat::Json,
        ConfigFormat::Yaml => FileFormat::Yaml,
    };
    let content = config.render(format)?;
    output.writeln(content.trim_end())
}

fn handle_config_path(config_file: Option<PathBuf>, output: &mut OutputWriter) -> Result<()> {
    match Config::locate(config_file.as_deref()) {
        Some(path) => output.text_or_data(&path.display().to_string(), &serde_json::json!({ "path": path })),
        None => {
            output.warning("No configuration file found; using defaults")?;
            output.text_or_data("", &serde_json::json!({ "path": null }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::output::tests::SharedBuffer;
    use tempfile::TempDir;

    fn writer(buffer: &SharedBuffer) -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Human, false, false, Box::new(buffer.clone()))
    }

    #[test]
    fn test_init_respects_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fieldbind.toml");
        std::fs::write(&path, "locale = \"de-DE\"\n").unwrap();

        let buffer = SharedBuffer::default();
        let init = |force| ConfigInitArgs {
            path: Some(path.clone()),
            force,
        };
        handle_config_init(init(false), &mut writer(&buffer)).unwrap();
        assert!(buffer.contents().contains("already exists"));
        assert_eq!(Config::from_file(&path).unwrap().locale.as_deref(), Some("de-DE"));

        handle_config_init(init(true), &mut writer(&buffer)).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_reports_unwritable_target() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("config.toml");

        let buffer = SharedBuffer::default();
        let result = handle_config_init(ConfigInitArgs { path: Some(path), force: false }, &mut writer(&buffer));

        match result {
            Err(Error::Other { message }) => {
                assert!(message.starts_with("Failed to write config to"));
                assert!(message.contains("IO error"));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_show_renders_requested_format() {
        let buffer = SharedBuffer::default();
        let config = Config {
            locale: Some("fi-FI".to_string()),
            ..Config::default()
        };
        handle_config_show(
            ConfigShowArgs {
                format: ConfigFormat::Json,
            },
            &config,
            &mut writer(&buffer),
        )
        .unwrap();
        let shown: Config = serde_json::from_str(&buffer.contents()).unwrap();
        assert_eq!(shown, config);
    }

    #[test]
    fn test_path_prints_explicit_file() {
        let buffer = SharedBuffer::default();
        handle_config_path(Some(PathBuf::from("custom.yaml")), &mut writer(&buffer)).unwrap();
        assert_eq!(buffer.contents().trim(), "custom.yaml");
    }
}
