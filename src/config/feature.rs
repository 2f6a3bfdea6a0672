//! Feature flags.

use super::ConfigError;
use super::schema::{self, EnvSource, Reader};

/// Feature toggles.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    /// Accept log entries in batches.
    pub batch_processing: bool,
    /// Write log lines through a background worker.
    pub async_logging: bool,
}

impl FeatureConfig {
    pub(super) fn read<E: EnvSource + ?Sized>(env: &Reader<'_, E>) -> Result<Self, ConfigError> {
        Ok(Self {
            batch_processing: env.flag(&schema::ENABLE_BATCH_PROCESSING)?,
            async_logging: env.flag(&schema::ENABLE_ASYNC_LOGGING)?,
        })
    }
}
