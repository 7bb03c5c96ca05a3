mod cli;

use crate::Logger;
use crate::domain::Level;
use crate::render::{AnyLogger, JsonLogger, LogFormat, TextLogger};
use crate::sink::Sink;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use cli::Cli;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Where rendered lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    #[default]
    Stderr,
    Stdout,
    /// Append to the file named by `file`
    File,
}

/// Templates for the text renderer; unset keys keep the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    pub format: Option<String>,
    pub error_format: Option<String>,
    pub fields_format: Option<String>,
}

/// Logger configuration as read from TOML.
///
/// ```toml
/// format = "json"
/// level = "trace"
/// output = "file"
/// file = "/var/log/app.log"
///
/// [fields]
/// service = "ingest"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub format: LogFormat,
    pub level: Level,
    pub datetime_format: Option<String>,
    pub output: OutputTarget,
    pub file: Option<PathBuf>,
    pub text: TextConfig,
    pub fields: BTreeMap<String, Value>,
}

impl LoggerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: LoggerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output == OutputTarget::File && self.file.is_none() {
            return Err(ConfigError::InvalidConfig(
                "output = \"file\" requires a file path".to_string(),
            ));
        }

        let templates = [
            ("datetime_format", &self.datetime_format),
            ("text.format", &self.text.format),
            ("text.error_format", &self.text.error_format),
            ("text.fields_format", &self.text.fields_format),
        ];
        for (name, template) in templates {
            if template.as_deref().is_some_and(str::is_empty) {
                return Err(ConfigError::InvalidConfig(format!(
                    "{name} cannot be empty"
                )));
            }
        }

        if self.fields.keys().any(String::is_empty) {
            return Err(ConfigError::InvalidConfig(
                "field names cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Opens the configured output. Files are opened in append mode.
    pub fn open_sink(&self) -> Result<Sink, ConfigError> {
        match self.output {
            OutputTarget::Stderr => Ok(Sink::stderr()),
            OutputTarget::Stdout => Ok(Sink::stdout()),
            OutputTarget::File => {
                let path = self.file.as_ref().ok_or_else(|| {
                    ConfigError::InvalidConfig("output = \"file\" requires a file path".to_string())
                })?;
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Ok(Sink::new(file))
            }
        }
    }

    pub fn build(&self) -> Result<AnyLogger, ConfigError> {
        self.validate()?;
        let sink = self.open_sink()?;
        Ok(self.build_with_sink(sink))
    }

    /// Builds the logger around an already opened sink.
    pub fn build_with_sink(&self, sink: Sink) -> AnyLogger {
        let logger = match self.format {
            LogFormat::Text => {
                let mut text = TextLogger::new();
                if let Some(format) = &self.text.format {
                    text = text.with_format(format.as_str());
                }
                if let Some(format) = &self.text.error_format {
                    text = text.with_error_format(format.as_str());
                }
                if let Some(format) = &self.text.fields_format {
                    text = text.with_fields_format(format.as_str());
                }
                AnyLogger::Text(text)
            }
            LogFormat::Json => AnyLogger::Json(JsonLogger::new()),
        };

        let mut logger = logger.with_level(self.level).with_output(sink);
        if let Some(format) = &self.datetime_format {
            logger = logger.with_datetime_format(format.as_str());
        }
        if self.fields.is_empty() {
            logger
        } else {
            logger.with_fields(self.fields.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::SharedBuffer;

    #[test]
    fn test_default_config() {
        let config = LoggerConfig::default();
        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.level, Level::Info);
        assert_eq!(config.output, OutputTarget::Stderr);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = LoggerConfig::from_toml_str("").unwrap();
        assert_eq!(config, LoggerConfig::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let config = LoggerConfig::from_toml_str(
            r#"
format = "json"
level = "trace"
datetime_format = "%Y"
output = "stdout"

[text]
format = "%L %m\n"

[fields]
service = "ingest"
replicas = 3
"#,
        )
        .unwrap();

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, Level::Trace);
        assert_eq!(config.datetime_format.as_deref(), Some("%Y"));
        assert_eq!(config.output, OutputTarget::Stdout);
        assert_eq!(config.text.format.as_deref(), Some("%L %m\n"));
        assert_eq!(config.fields["service"], "ingest");
        assert_eq!(config.fields["replicas"], 3);
    }

    #[test]
    fn test_invalid_level_is_parse_error() {
        let err = LoggerConfig::from_toml_str("level = \"INFO\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = LoggerConfig::from_toml_str("colour = true").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_file_output_requires_path() {
        let err = LoggerConfig::from_toml_str("output = \"file\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_template_is_rejected() {
        let err = LoggerConfig::from_toml_str("[text]\nformat = \"\"").unwrap_err();
        assert!(err.to_string().contains("text.format"));
    }

    #[test]
    fn test_build_text_with_templates_and_fields() {
        let config = LoggerConfig::from_toml_str(
            r#"
[text]
format = "%L|%m|%region\n"

[fields]
region = "eu-west"
"#,
        )
        .unwrap();
        let buffer = SharedBuffer::new();
        let logger = config.build_with_sink(buffer.clone().into());

        logger.warn("disk low").unwrap();
        assert_eq!(buffer.contents(), "warn|disk low|eu-west\n");
    }

    #[test]
    fn test_build_json_respects_level() {
        let config = LoggerConfig {
            format: LogFormat::Json,
            level: Level::Error,
            ..LoggerConfig::default()
        };
        let buffer = SharedBuffer::new();
        let logger = config.build_with_sink(buffer.clone().into());

        logger.warn("filtered").unwrap();
        assert!(buffer.is_empty());
        logger.error("kept").unwrap();
        assert!(buffer.contents().contains("\"message\":\"kept\""));
    }

    #[test]
    fn test_config_serializes_back_to_toml() {
        let config = LoggerConfig {
            format: LogFormat::Json,
            level: Level::Warn,
            ..LoggerConfig::default()
        };
        let rendered = toml::to_string(&config).unwrap();
        assert!(rendered.contains("format = \"json\""));
        assert!(rendered.contains("level = \"warn\""));
    }
}
