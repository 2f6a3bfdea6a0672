//! Configuration loading and validation for the logging service.
//!
//! The whole configuration is a one-shot snapshot of the process environment
//! taken at startup. Every variable and its default is declared in [`schema`];
//! each section reads its own variables, and [`Config::validate`] enforces the
//! cross-field rules that must hold before the service may start.

mod app;
mod backup;
mod database;
mod dependency;
mod error;
mod feature;
mod logging;
mod monitoring;
mod performance;
mod rate_limit;
mod redis;
pub mod schema;
mod security;
mod server;

pub use app::{AppConfig, Environment};
pub use backup::BackupConfig;
pub use database::DatabaseConfig;
pub use dependency::DependencyConfig;
pub use error::{ConfigError, ConfigErrorKind};
pub use feature::FeatureConfig;
pub use logging::{LogFormat, LogOutput, LoggingConfig};
pub use monitoring::MonitoringConfig;
pub use performance::PerformanceConfig;
pub use rate_limit::RateLimitConfig;
pub use redis::RedisConfig;
pub use schema::{EnvSource, ProcessEnv};
pub use security::SecurityConfig;
pub use server::ServerConfig;

use schema::Reader;

/// Root configuration aggregating every section.
///
/// Built once at startup and shared read-only behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Service identity, environment, debug mode and log level.
    pub app: AppConfig,
    /// HTTP listener address.
    pub server: ServerConfig,
    /// Log format, destination and rotation.
    pub logging: LoggingConfig,
    /// PostgreSQL connection settings.
    pub database: DatabaseConfig,
    /// Redis cache connection settings.
    pub redis: RedisConfig,
    /// Secret key plus allowed hosts and CORS origins.
    pub security: SecurityConfig,
    /// Per-client request rate limiting.
    pub rate_limit: RateLimitConfig,
    /// Prometheus metrics exposition.
    pub monitoring: MonitoringConfig,
    /// Downstream service this one calls.
    pub dependencies: DependencyConfig,
    /// Feature toggles.
    pub features: FeatureConfig,
    /// Runtime and log queue sizing.
    pub performance: PerformanceConfig,
    /// Backup retention and destination bucket.
    pub backup: BackupConfig,
}

impl Config {
    /// Load and validate configuration from the process environment.
    ///
    /// Variables from a `.env` file should already have been merged into the
    /// environment by the caller.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Read every section from the process environment without validating.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&ProcessEnv)
    }

    /// Read every section from `source`, applying defaults for unset variables.
    ///
    /// The first value that fails to coerce aborts the load.
    pub fn load_from<E: EnvSource + ?Sized>(source: &E) -> Result<Self, ConfigError> {
        let env = Reader::new(source);

        Ok(Self {
            app: AppConfig::read(&env)?,
            server: ServerConfig::read(&env)?,
            logging: LoggingConfig::read(&env)?,
            database: DatabaseConfig::read(&env)?,
            redis: RedisConfig::read(&env)?,
            security: SecurityConfig::read(&env)?,
            rate_limit: RateLimitConfig::read(&env)?,
            monitoring: MonitoringConfig::read(&env)?,
            dependencies: DependencyConfig::read(&env)?,
            features: FeatureConfig::read(&env)?,
            performance: PerformanceConfig::read(&env)?,
            backup: BackupConfig::read(&env)?,
        })
    }

    /// Validate cross-field rules.
    ///
    /// Rules run in a fixed order and the first failure is returned. The
    /// production block is skipped for every other environment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app.environment.is_production() {
            if self.security.secret_key.is_empty() {
                return Err(ConfigError::violation(
                    "SECRET_KEY",
                    "SECRET_KEY must be set in production",
                ));
            }

            if self.app.debug {
                return Err(ConfigError::violation(
                    "DEBUG",
                    "DEBUG should be False in production",
                ));
            }

            if self.security.allowed_hosts.iter().any(|h| h == "localhost") {
                return Err(ConfigError::violation(
                    "ALLOWED_HOSTS",
                    "localhost should not be in ALLOWED_HOSTS in production",
                ));
            }

            if self.database.password.is_empty() {
                return Err(ConfigError::violation(
                    "DB_PASSWORD",
                    "Database password must be set in production",
                ));
            }

            if self.redis.password.is_empty() {
                return Err(ConfigError::violation(
                    "REDIS_PASSWORD",
                    "Redis password must be set in production",
                ));
            }
        }

        if self.logging.log_format().is_none() {
            return Err(ConfigError::violation("LOG_FORMAT", "Invalid LOG_FORMAT"));
        }

        match self.logging.log_output() {
            None => Err(ConfigError::violation("LOG_OUTPUT", "Invalid LOG_OUTPUT")),
            Some(LogOutput::File) if self.logging.file_path().is_none() => {
                Err(ConfigError::violation(
                    "LOG_FILE_PATH",
                    "LOG_FILE_PATH must be set when LOG_OUTPUT is file",
                ))
            }
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests;
