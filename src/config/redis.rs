//! Redis cache configuration.

use super::ConfigError;
use super::schema::{self, EnvSource, Reader};

/// Redis connection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RedisConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: i64,
    /// Logical database index.
    pub db: i64,
    /// Required in production.
    pub password: String,
}

impl RedisConfig {
    pub(super) fn read<E: EnvSource + ?Sized>(env: &Reader<'_, E>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: env.string(&schema::REDIS_HOST)?,
            port: env.integer(&schema::REDIS_PORT)?,
            db: env.integer(&schema::REDIS_DB)?,
            password: env.string(&schema::REDIS_PASSWORD)?,
        })
    }

    /// Connection URL in `redis://[:password@]host:port/db` form.
    pub fn url(&self) -> String {
        self.render_url(&urlencoding::encode(&self.password))
    }

    /// Same as [`url`](Self::url) with the password masked, for logs.
    pub fn redacted_url(&self) -> String {
        self.render_url("***")
    }

    fn render_url(&self, password: &str) -> String {
        if self.password.is_empty() {
            format!("redis://{}:{}/{}", self.host, self.port, self.db)
        } else {
            format!(
                "redis://:{}@{}:{}/{}",
                password, self.host, self.port, self.db
            )
        }
    }
}
