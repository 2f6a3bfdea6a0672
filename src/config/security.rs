//! Security configuration.

use super::ConfigError;
use super::schema::{self, EnvSource, Reader};

/// Secrets and host/origin allow lists.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityConfig {
    /// Required in production.
    pub secret_key: String,
    /// Must not contain "localhost" in production.
    pub allowed_hosts: Vec<String>,
    /// Origins allowed by the CORS layer. "*" mirrors any origin.
    pub cors_origins: Vec<String>,
}

impl SecurityConfig {
    pub(super) fn read<E: EnvSource + ?Sized>(env: &Reader<'_, E>) -> Result<Self, ConfigError> {
        Ok(Self {
            secret_key: env.string(&schema::SECRET_KEY)?,
            allowed_hosts: env.list(&schema::ALLOWED_HOSTS)?,
            cors_origins: env.list(&schema::CORS_ORIGINS)?,
        })
    }
}
