//! Logging configuration.

use super::ConfigError;
use super::schema::{self, EnvSource, Reader};

/// Log line encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "json" => Some(LogFormat::Json),
            "text" => Some(LogFormat::Text),
            _ => None,
        }
    }
}

/// Log destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    File,
}

impl LogOutput {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "stdout" => Some(LogOutput::Stdout),
            "file" => Some(LogOutput::File),
            _ => None,
        }
    }
}

/// Logging settings.
///
/// `format` and `output` hold the raw strings; unknown values are rejected by
/// [`Config::validate`](super::Config::validate), not at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// "json" or "text".
    pub format: String,
    /// "stdout" or "file".
    pub output: String,
    /// Required when `output` is "file".
    pub file_path: Option<String>,
    /// Size at which the log file is rotated, e.g. "10MB".
    pub rotation_size: String,
    /// Rotated files older than this many days are deleted.
    pub retention_days: i64,
}

impl LoggingConfig {
    pub(super) fn read<E: EnvSource + ?Sized>(env: &Reader<'_, E>) -> Result<Self, ConfigError> {
        Ok(Self {
            format: env.string(&schema::LOG_FORMAT)?,
            output: env.string(&schema::LOG_OUTPUT)?,
            file_path: env.optional(&schema::LOG_FILE_PATH)?,
            rotation_size: env.string(&schema::LOG_ROTATION_SIZE)?,
            retention_days: env.integer(&schema::LOG_RETENTION_DAYS)?,
        })
    }

    pub fn log_format(&self) -> Option<LogFormat> {
        LogFormat::parse(&self.format)
    }

    pub fn log_output(&self) -> Option<LogOutput> {
        LogOutput::parse(&self.output)
    }

    /// File path, treating an empty value as unset.
    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref().filter(|p| !p.is_empty())
    }
}
