//! Application-level configuration.

use std::fmt;

use serde::{Serialize, Serializer};

use super::ConfigError;
use super::schema::{self, EnvSource, Reader};

/// Deployment environment.
///
/// Unknown names are kept verbatim so they can still be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Testing,
    Staging,
    Production,
    Other(String),
}

impl Environment {
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Development => "development",
            Environment::Testing => "testing",
            Environment::Staging => "staging",
            Environment::Production => "production",
            Environment::Other(name) => name,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl From<String> for Environment {
    fn from(value: String) -> Self {
        match value.as_str() {
            "development" => Environment::Development,
            "testing" => Environment::Testing,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            _ => Environment::Other(value),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Application-level settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Service name used in logs, metrics and the root endpoint.
    pub name: String,
    /// Deployment environment; production enables the strict rules.
    pub environment: Environment,
    /// Enables the `/config` endpoint and SQL statement logging.
    pub debug: bool,
    /// Logging verbosity: "DEBUG", "INFO", "WARNING", "ERROR".
    pub log_level: String,
}

impl AppConfig {
    pub(super) fn read<E: EnvSource + ?Sized>(env: &Reader<'_, E>) -> Result<Self, ConfigError> {
        Ok(Self {
            name: env.string(&schema::APP_NAME)?,
            environment: Environment::from(env.string(&schema::ENVIRONMENT)?),
            debug: env.flag(&schema::DEBUG)?,
            log_level: env.string(&schema::LOG_LEVEL)?,
        })
    }
}
