//! Rate limiting configuration.

use super::ConfigError;
use super::schema::{self, EnvSource, Reader};

/// Request rate limiting settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    /// Whether requests are limited at all.
    pub enabled: bool,
    /// Default rule in `<count>/<period>` form, e.g. "100/minute".
    pub default_rule: String,
}

impl RateLimitConfig {
    pub(super) fn read<E: EnvSource + ?Sized>(env: &Reader<'_, E>) -> Result<Self, ConfigError> {
        Ok(Self {
            enabled: env.flag(&schema::RATE_LIMIT_ENABLED)?,
            default_rule: env.string(&schema::RATE_LIMIT_DEFAULT)?,
        })
    }
}
