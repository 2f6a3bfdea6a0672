//! Downstream service configuration.

use std::time::Duration;

use super::ConfigError;
use super::schema::{self, EnvSource, Reader};

/// Settings for the service this one depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyConfig {
    /// Base URL of the downstream service.
    pub service_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: i64,
}

impl DependencyConfig {
    pub(super) fn read<E: EnvSource + ?Sized>(env: &Reader<'_, E>) -> Result<Self, ConfigError> {
        Ok(Self {
            service_url: env.string(&schema::DEPENDENT_SERVICE_URL)?,
            timeout_secs: env.integer(&schema::DEPENDENT_SERVICE_TIMEOUT)?,
        })
    }

    /// Timeout as a duration; negative values clamp to zero.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::try_from(self.timeout_secs).unwrap_or(0))
    }
}
