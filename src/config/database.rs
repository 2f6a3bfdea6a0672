//! Database configuration.

use super::ConfigError;
use super::schema::{self, EnvSource, Reader};

/// PostgreSQL connection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Server hostname.
    pub host: String,
    /// Server port. Checked when the pool options are built.
    pub port: i64,
    /// Database name.
    pub name: String,
    /// Login role.
    pub user: String,
    /// Required in production.
    pub password: String,
}

impl DatabaseConfig {
    pub(super) fn read<E: EnvSource + ?Sized>(env: &Reader<'_, E>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: env.string(&schema::DB_HOST)?,
            port: env.integer(&schema::DB_PORT)?,
            name: env.string(&schema::DB_NAME)?,
            user: env.string(&schema::DB_USER)?,
            password: env.string(&schema::DB_PASSWORD)?,
        })
    }
}
