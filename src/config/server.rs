//! HTTP server configuration.

use super::ConfigError;
use super::schema::{self, EnvSource, Reader};

/// Listener settings for the HTTP service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Interface to bind, e.g. "0.0.0.0".
    pub host: String,
    /// Not range checked here; the listener rejects values outside `u16`.
    pub port: i64,
}

impl ServerConfig {
    pub(super) fn read<E: EnvSource + ?Sized>(env: &Reader<'_, E>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: env.string(&schema::HOST)?,
            port: env.integer(&schema::PORT)?,
        })
    }
}
