//! Structured logging infrastructure for sdraw

use crate::{DrawError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, colored output
    #[default]
    Pretty,
    /// Single-line output
    Compact,
    /// Newline-delimited JSON
    Json,
}

impl FromStr for LogFormat {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(DrawError::validation_field(
                format!("unknown log format '{other}'"),
                "logging.format",
            )),
        }
    }
}

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "sdraw_plots=trace")
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Optional file path for log output
    pub file_path: Option<String>,
    /// Whether to include spans in the output
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

/// Build the env filter, falling back to `info` when the directive is invalid
fn build_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| DrawError::config_with_source("Invalid log filter", e))
}

fn open_log_file(path: &str) -> Result<Mutex<std::fs::File>> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(Mutex::new(file))
}

fn init_error(err: tracing_subscriber::util::TryInitError) -> DrawError {
    DrawError::with_source("Failed to install tracing subscriber", err)
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// fmt layer for the configured format, writing to the log file when one is set
fn fmt_layer(config: &LoggingConfig) -> Result<BoxedLayer> {
    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let file = config.file_path.as_deref().map(open_log_file).transpose()?;
    let targets = config.include_targets;

    let layer: BoxedLayer = match (config.format, file) {
        (LogFormat::Json, Some(file)) => Box::new(
            fmt::layer()
                .json()
                .with_span_events(span_events)
                .with_target(targets)
                .with_writer(file),
        ),
        (LogFormat::Json, None) => Box::new(
            fmt::layer()
                .json()
                .with_span_events(span_events)
                .with_target(targets),
        ),
        (LogFormat::Pretty, Some(file)) => Box::new(
            fmt::layer()
                .pretty()
                .with_span_events(span_events)
                .with_target(targets)
                .with_ansi(false)
                .with_writer(file),
        ),
        (LogFormat::Pretty, None) => Box::new(
            fmt::layer()
                .pretty()
                .with_span_events(span_events)
                .with_target(targets),
        ),
        (LogFormat::Compact, Some(file)) => Box::new(
            fmt::layer()
                .compact()
                .with_span_events(span_events)
                .with_target(targets)
                .with_ansi(false)
                .with_writer(file),
        ),
        (LogFormat::Compact, None) => Box::new(
            fmt::layer()
                .compact()
                .with_span_events(span_events)
                .with_target(targets),
        ),
    };
    Ok(layer)
}

/// Build the subscriber described by `config` without installing it
pub fn build_subscriber(config: &LoggingConfig) -> Result<impl Subscriber + Send + Sync> {
    let env_filter = build_filter(&config.level)?;
    Ok(tracing_subscriber::registry()
        .with(fmt_layer(config)?)
        .with(env_filter))
}

/// Initialize the tracing subscriber with the given configuration
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    build_subscriber(&config)?.try_init().map_err(init_error)
}

/// Initialize logging with default configuration
pub fn init_default_logging() -> Result<()> {
    init_logging(LoggingConfig::default())
}

/// Configuration used by [`init_dev_logging`]: pretty, debug level, with spans
pub fn dev_config() -> LoggingConfig {
    LoggingConfig {
        level: "debug".to_string(),
        format: LogFormat::Pretty,
        include_spans: true,
        ..LoggingConfig::default()
    }
}

/// Initialize logging for development (pretty, debug level)
pub fn init_dev_logging() -> Result<()> {
    init_logging(dev_config())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file_path.is_none());
        assert!(!config.include_spans);
        assert!(config.include_targets);
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        let err = "xml".parse::<LogFormat>().unwrap_err();
        assert_eq!(err.field(), Some("logging.format"));
    }

    #[test]
    fn test_invalid_level_falls_back() {
        assert!(build_filter("not a [valid directive").is_ok());
    }

    #[test]
    fn test_dev_config() {
        let config = dev_config();
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.include_spans);
    }

    #[test]
    fn test_json_output_to_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("sdraw.log");
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Json,
            file_path: Some(path.to_string_lossy().into_owned()),
            ..LoggingConfig::default()
        };

        let subscriber = build_subscriber(&config).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(bins = 12, "binned points");
            tracing::trace!("filtered out");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        let event: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(event["level"], "DEBUG");
        assert_eq!(event["fields"]["message"], "binned points");
        assert_eq!(event["fields"]["bins"], 12);
    }

    #[test]
    fn test_compact_output_to_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("compact.log");
        let config = LoggingConfig {
            format: LogFormat::Compact,
            file_path: Some(path.to_string_lossy().into_owned()),
            ..LoggingConfig::default()
        };

        let subscriber = build_subscriber(&config).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("rendered hexbin");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("rendered hexbin"));
        assert!(contents.contains("INFO"));
        assert!(!contents.contains('\u{1b}'));
    }
}
