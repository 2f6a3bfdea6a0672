//! Monitoring configuration.

use super::ConfigError;
use super::schema::{self, EnvSource, Reader};

/// Metrics exposition settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringConfig {
    /// Mounts `/metrics` and starts the metrics listener.
    pub metrics_enabled: bool,
    /// Port of the dedicated metrics listener.
    pub metrics_port: i64,
}

impl MonitoringConfig {
    pub(super) fn read<E: EnvSource + ?Sized>(env: &Reader<'_, E>) -> Result<Self, ConfigError> {
        Ok(Self {
            metrics_enabled: env.flag(&schema::ENABLE_METRICS)?,
            metrics_port: env.integer(&schema::METRICS_PORT)?,
        })
    }
}
