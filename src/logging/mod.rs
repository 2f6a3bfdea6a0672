//! Tracing subscriber setup.
//!
//! Format, destination and level come from the validated [`Config`]. `RUST_LOG`
//! still overrides the level when present.

mod rotation;

pub use rotation::{RotatingFile, parse_size};

use std::io::{self, Write};
use std::sync::Mutex;

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::{Config, LogFormat, LogOutput};

/// Buffered lines used when MAX_QUEUE_SIZE is not a positive number.
const DEFAULT_QUEUE_SIZE: usize = 128_000;

/// Logging setup error.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid logging setting: {0}")]
    InvalidSetting(&'static str),
    #[error("invalid LOG_ROTATION_SIZE: {0}")]
    RotationSize(String),
    #[error("failed to open log file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to install subscriber: {0}")]
    Init(String),
}

/// Keeps the background log writer alive. Dropping it flushes pending lines.
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

/// Install the global subscriber.
pub fn init(config: &Config) -> Result<LogGuard, LoggingError> {
    let format = config
        .logging
        .log_format()
        .ok_or(LoggingError::InvalidSetting("LOG_FORMAT"))?;
    let output = config
        .logging
        .log_output()
        .ok_or(LoggingError::InvalidSetting("LOG_OUTPUT"))?;

    let sink: Box<dyn Write + Send> = match output {
        LogOutput::Stdout => Box::new(io::stdout()),
        LogOutput::File => {
            let path = config
                .logging
                .file_path()
                .ok_or(LoggingError::InvalidSetting("LOG_FILE_PATH"))?;
            let max_bytes =
                parse_size(&config.logging.rotation_size).map_err(LoggingError::RotationSize)?;
            Box::new(RotatingFile::open(
                path,
                max_bytes,
                config.logging.retention_days,
            )?)
        }
    };

    let (writer, worker) = if config.features.async_logging {
        let (non_blocking, guard) = NonBlockingBuilder::default()
            .buffered_lines_limit(queue_size(config.performance.max_queue_size))
            .lossy(true)
            .finish(sink);
        (BoxMakeWriter::new(non_blocking), Some(guard))
    } else {
        (BoxMakeWriter::new(Mutex::new(sink)), None)
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(level_filter(&config.app.log_level).into())
    });

    let layer = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_current_span(true)
            .boxed(),
        LogFormat::Text => fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(output == LogOutput::Stdout)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(LogGuard { _worker: worker })
}

/// Map a LOG_LEVEL name to a level filter. Unknown names fall back to info.
pub fn level_filter(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" | "warning" => LevelFilter::WARN,
        "error" | "critical" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

fn queue_size(max_queue_size: i64) -> usize {
    usize::try_from(max_queue_size)
        .ok()
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_QUEUE_SIZE)
}
