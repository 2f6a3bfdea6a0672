//! Environment variable table.
//!
//! Every variable the service reads is declared here once, together with the
//! literal used when it is unset. Sections read through [`Reader`], which owns
//! the coercion rules (flags, integers, comma lists).

use std::collections::HashMap;
use std::env;

use super::ConfigError;

/// Source of raw environment values.
pub trait EnvSource {
    /// Returns the raw value of `name`, or `None` when it is unset.
    ///
    /// A value that is set but cannot be read as text is an error, never a
    /// reason to fall back to the default.
    fn get(&self, name: &'static str) -> Result<Option<String>, ConfigError>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &'static str) -> Result<Option<String>, ConfigError> {
        match env::var_os(name) {
            None => Ok(None),
            Some(raw) => raw.into_string().map(Some).map_err(|raw| {
                ConfigError::invalid_value(name, raw.to_string_lossy(), "not valid unicode")
            }),
        }
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, name: &'static str) -> Result<Option<String>, ConfigError> {
        Ok(HashMap::get(self, name).cloned())
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn get(&self, name: &'static str) -> Result<Option<String>, ConfigError> {
        Ok(HashMap::get(self, name).map(|v| v.to_string()))
    }
}

/// A single environment variable and its default literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvVar {
    /// Variable name as read from the environment.
    pub name: &'static str,
    /// `None` means the field itself is optional.
    pub default: Option<&'static str>,
}

impl EnvVar {
    const fn new(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            default: Some(default),
        }
    }

    const fn optional(name: &'static str) -> Self {
        Self {
            name,
            default: None,
        }
    }
}

// App
pub const APP_NAME: EnvVar = EnvVar::new("APP_NAME", "logging_service");
pub const ENVIRONMENT: EnvVar = EnvVar::new("ENVIRONMENT", "development");
pub const DEBUG: EnvVar = EnvVar::new("DEBUG", "True");
pub const LOG_LEVEL: EnvVar = EnvVar::new("LOG_LEVEL", "INFO");

// Server
pub const HOST: EnvVar = EnvVar::new("HOST", "0.0.0.0");
pub const PORT: EnvVar = EnvVar::new("PORT", "8000");

// Logging
pub const LOG_FORMAT: EnvVar = EnvVar::new("LOG_FORMAT", "json");
pub const LOG_OUTPUT: EnvVar = EnvVar::new("LOG_OUTPUT", "stdout");
pub const LOG_FILE_PATH: EnvVar = EnvVar::optional("LOG_FILE_PATH");
pub const LOG_ROTATION_SIZE: EnvVar = EnvVar::new("LOG_ROTATION_SIZE", "10MB");
pub const LOG_RETENTION_DAYS: EnvVar = EnvVar::new("LOG_RETENTION_DAYS", "30");

// Database
pub const DB_HOST: EnvVar = EnvVar::new("DB_HOST", "localhost");
pub const DB_PORT: EnvVar = EnvVar::new("DB_PORT", "5432");
pub const DB_NAME: EnvVar = EnvVar::new("DB_NAME", "logging_db");
pub const DB_USER: EnvVar = EnvVar::new("DB_USER", "logger");
pub const DB_PASSWORD: EnvVar = EnvVar::new("DB_PASSWORD", "");

// Redis
pub const REDIS_HOST: EnvVar = EnvVar::new("REDIS_HOST", "localhost");
pub const REDIS_PORT: EnvVar = EnvVar::new("REDIS_PORT", "6379");
pub const REDIS_DB: EnvVar = EnvVar::new("REDIS_DB", "0");
pub const REDIS_PASSWORD: EnvVar = EnvVar::new("REDIS_PASSWORD", "");

// Security
pub const SECRET_KEY: EnvVar = EnvVar::new("SECRET_KEY", "");
pub const ALLOWED_HOSTS: EnvVar = EnvVar::new("ALLOWED_HOSTS", "localhost");
pub const CORS_ORIGINS: EnvVar = EnvVar::new("CORS_ORIGINS", "http://localhost:3000");

// Rate limiting
pub const RATE_LIMIT_ENABLED: EnvVar = EnvVar::new("RATE_LIMIT_ENABLED", "True");
pub const RATE_LIMIT_DEFAULT: EnvVar = EnvVar::new("RATE_LIMIT_DEFAULT", "100/minute");

// Monitoring
pub const ENABLE_METRICS: EnvVar = EnvVar::new("ENABLE_METRICS", "True");
pub const METRICS_PORT: EnvVar = EnvVar::new("METRICS_PORT", "9090");

// Dependencies
pub const DEPENDENT_SERVICE_URL: EnvVar =
    EnvVar::new("DEPENDENT_SERVICE_URL", "http://localhost:8001");
pub const DEPENDENT_SERVICE_TIMEOUT: EnvVar = EnvVar::new("DEPENDENT_SERVICE_TIMEOUT", "30");

// Features
pub const ENABLE_BATCH_PROCESSING: EnvVar = EnvVar::new("ENABLE_BATCH_PROCESSING", "False");
pub const ENABLE_ASYNC_LOGGING: EnvVar = EnvVar::new("ENABLE_ASYNC_LOGGING", "True");

// Performance
pub const WORKER_PROCESSES: EnvVar = EnvVar::new("WORKER_PROCESSES", "4");
pub const THREAD_POOL_SIZE: EnvVar = EnvVar::new("THREAD_POOL_SIZE", "10");
pub const MAX_QUEUE_SIZE: EnvVar = EnvVar::new("MAX_QUEUE_SIZE", "1000");

// Backup
pub const BACKUP_ENABLED: EnvVar = EnvVar::new("BACKUP_ENABLED", "True");
pub const BACKUP_RETENTION_DAYS: EnvVar = EnvVar::new("BACKUP_RETENTION_DAYS", "7");
pub const BACKUP_S3_BUCKET: EnvVar = EnvVar::new("BACKUP_S3_BUCKET", "logging-service-backups");

/// Every variable the service reads, in section order.
pub const ALL: &[EnvVar] = &[
    APP_NAME,
    ENVIRONMENT,
    DEBUG,
    LOG_LEVEL,
    HOST,
    PORT,
    LOG_FORMAT,
    LOG_OUTPUT,
    LOG_FILE_PATH,
    LOG_ROTATION_SIZE,
    LOG_RETENTION_DAYS,
    DB_HOST,
    DB_PORT,
    DB_NAME,
    DB_USER,
    DB_PASSWORD,
    REDIS_HOST,
    REDIS_PORT,
    REDIS_DB,
    REDIS_PASSWORD,
    SECRET_KEY,
    ALLOWED_HOSTS,
    CORS_ORIGINS,
    RATE_LIMIT_ENABLED,
    RATE_LIMIT_DEFAULT,
    ENABLE_METRICS,
    METRICS_PORT,
    DEPENDENT_SERVICE_URL,
    DEPENDENT_SERVICE_TIMEOUT,
    ENABLE_BATCH_PROCESSING,
    ENABLE_ASYNC_LOGGING,
    WORKER_PROCESSES,
    THREAD_POOL_SIZE,
    MAX_QUEUE_SIZE,
    BACKUP_ENABLED,
    BACKUP_RETENTION_DAYS,
    BACKUP_S3_BUCKET,
];

/// Typed access to an [`EnvSource`], falling back to each variable's default.
pub struct Reader<'a, E: EnvSource + ?Sized> {
    source: &'a E,
}

impl<'a, E: EnvSource + ?Sized> Reader<'a, E> {
    pub fn new(source: &'a E) -> Self {
        Self { source }
    }

    fn raw(&self, var: &EnvVar) -> Result<Option<String>, ConfigError> {
        Ok(self
            .source
            .get(var.name)?
            .or_else(|| var.default.map(str::to_string)))
    }

    pub fn string(&self, var: &EnvVar) -> Result<String, ConfigError> {
        Ok(self.raw(var)?.unwrap_or_default())
    }

    /// Unset stays `None`; a set-but-empty value is `Some("")`.
    pub fn optional(&self, var: &EnvVar) -> Result<Option<String>, ConfigError> {
        self.raw(var)
    }

    /// True only for a case-insensitive "true".
    pub fn flag(&self, var: &EnvVar) -> Result<bool, ConfigError> {
        Ok(self.string(var)?.to_lowercase() == "true")
    }

    /// Base-10 integer. No range checks.
    pub fn integer(&self, var: &EnvVar) -> Result<i64, ConfigError> {
        let raw = self.string(var)?;
        raw.trim()
            .parse::<i64>()
            .map_err(|e| ConfigError::invalid_value(var.name, raw.clone(), e))
    }

    /// Comma separated list, entries kept verbatim.
    pub fn list(&self, var: &EnvVar) -> Result<Vec<String>, ConfigError> {
        Ok(self.string(var)?.split(',').map(str::to_string).collect())
    }
}
