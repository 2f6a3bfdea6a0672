//! Backup configuration.

use super::ConfigError;
use super::schema::{self, EnvSource, Reader};

/// Backup settings.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupConfig {
    /// Whether backups are taken.
    pub enabled: bool,
    /// Days a backup is kept before deletion.
    pub retention_days: i64,
    /// Destination bucket name.
    pub s3_bucket: String,
}

impl BackupConfig {
    pub(super) fn read<E: EnvSource + ?Sized>(env: &Reader<'_, E>) -> Result<Self, ConfigError> {
        Ok(Self {
            enabled: env.flag(&schema::BACKUP_ENABLED)?,
            retention_days: env.integer(&schema::BACKUP_RETENTION_DAYS)?,
            s3_bucket: env.string(&schema::BACKUP_S3_BUCKET)?,
        })
    }
}
