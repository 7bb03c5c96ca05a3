use super::{ConfigError, LoggerConfig, OutputTarget};
use crate::domain::{DiagnosticError, ErrorCode, Level};
use crate::render::LogFormat;
use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Write one structured log entry", long_about = None)]
pub struct Cli {
    /// TOML logger configuration; flags below override it
    #[arg(long, env = "RASK_LOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, env = "RASK_LOG_FORMAT", value_enum)]
    pub format: Option<LogFormat>,

    /// Verbosity threshold of the logger
    #[arg(long, env = "RASK_LOG_LEVEL", value_enum)]
    pub level: Option<Level>,

    /// chrono strftime format for the datetime
    #[arg(long)]
    pub datetime_format: Option<String>,

    /// Text template, e.g. "[%L] %T: %e%m%f\n"
    #[arg(long)]
    pub template: Option<String>,

    /// Additional field as key=value; JSON literals keep their type
    #[arg(long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, Value)>,

    /// Message of an error to attach
    #[arg(long)]
    pub error: Option<String>,

    /// Classification code of the attached error
    #[arg(long, requires = "error")]
    pub error_code: Option<ErrorCode>,

    /// Level of the emitted message
    #[arg(long, value_enum, default_value_t = Level::Info)]
    pub at: Level,

    /// Write to stdout instead of the configured output
    #[arg(long)]
    pub stdout: bool,

    /// Message words, joined with spaces
    #[arg(required = true)]
    pub message: Vec<String>,
}

impl Cli {
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Cli::try_parse_from(args)
    }

    /// Loads the config file, if any, and applies flag overrides.
    pub fn to_config(&self) -> Result<LoggerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => LoggerConfig::from_file(path)?,
            None => LoggerConfig::default(),
        };

        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(format) = &self.datetime_format {
            config.datetime_format = Some(format.clone());
        }
        if let Some(template) = &self.template {
            config.text.format = Some(unescape_newlines(template));
        }
        for (key, value) in &self.fields {
            config.fields.insert(key.clone(), value.clone());
        }
        if self.stdout {
            config.output = OutputTarget::Stdout;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn message(&self) -> String {
        self.message.join(" ")
    }

    pub fn attached_error(&self) -> Option<DiagnosticError> {
        self.error.as_ref().map(|message| {
            DiagnosticError::new(self.error_code.unwrap_or_default(), message.as_str())
        })
    }
}

fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid field '{raw}', expected key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid field '{raw}', key cannot be empty"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

// Shells make a literal newline awkward to pass, so accept "\n".
fn unescape_newlines(template: &str) -> String {
    template.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_minimal_args() {
        let cli = Cli::from_args(["rask-log", "hello", "world"]).unwrap();
        assert_eq!(cli.message(), "hello world");
        assert_eq!(cli.at, Level::Info);
        assert!(cli.attached_error().is_none());

        let config = cli.to_config().unwrap();
        assert_eq!(config, LoggerConfig::default());
    }

    #[test]
    fn test_message_is_required() {
        assert!(Cli::from_args(["rask-log"]).is_err());
    }

    #[test]
    fn test_level_flag_is_case_sensitive() {
        assert!(Cli::from_args(["rask-log", "--level", "trace", "m"]).is_ok());
        assert!(Cli::from_args(["rask-log", "--level", "TRACE", "m"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::from_args([
            "rask-log",
            "--format",
            "json",
            "--level",
            "warn",
            "--datetime-format",
            "%Y",
            "--field",
            "service=ingest",
            "--field",
            "attempt=3",
            "--stdout",
            "--at",
            "error",
            "boom",
        ])
        .unwrap();

        let config = cli.to_config().unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, Level::Warn);
        assert_eq!(config.datetime_format.as_deref(), Some("%Y"));
        assert_eq!(config.output, OutputTarget::Stdout);
        assert_eq!(config.fields["service"], json!("ingest"));
        assert_eq!(config.fields["attempt"], json!(3));
        assert_eq!(cli.at, Level::Error);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "format = \"json\"\nlevel = \"error\"\n[fields]\nregion = \"eu\"").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = Cli::from_args([
            "rask-log",
            "--config",
            path.as_str(),
            "--level",
            "trace",
            "--field",
            "region=us",
            "m",
        ])
        .unwrap();

        let config = cli.to_config().unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, Level::Trace);
        assert_eq!(config.fields["region"], json!("us"));
    }

    #[test]
    fn test_attached_error() {
        let cli = Cli::from_args([
            "rask-log",
            "--error",
            "disk full",
            "--error-code",
            "unavailable",
            "m",
        ])
        .unwrap();
        let err = cli.attached_error().unwrap();
        assert_eq!(err.message(), "disk full");
        assert_eq!(err.code(), ErrorCode::Unavailable);
    }

    #[test]
    fn test_error_code_requires_error() {
        assert!(Cli::from_args(["rask-log", "--error-code", "internal", "m"]).is_err());
    }

    #[test]
    fn test_template_newline_escape() {
        let cli = Cli::from_args(["rask-log", "--template", "%L %m\\n", "m"]).unwrap();
        let config = cli.to_config().unwrap();
        assert_eq!(config.text.format.as_deref(), Some("%L %m\n"));
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("k=v").unwrap(),
            ("k".to_string(), json!("v"))
        );
        assert_eq!(parse_field("ok=true").unwrap().1, json!(true));
        assert_eq!(parse_field("id=007").unwrap().1, json!("007"));
        assert_eq!(parse_field("expr=a=b").unwrap().1, json!("a=b"));
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=v").is_err());
    }
}
