//! Performance tuning configuration.

use super::ConfigError;
use super::schema::{self, EnvSource, Reader};

/// Runtime sizing.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceConfig {
    /// Async runtime worker threads.
    pub worker_processes: i64,
    /// Upper bound of the blocking thread pool.
    pub thread_pool_size: i64,
    /// Buffered log lines before the async log writer drops new ones.
    pub max_queue_size: i64,
}

impl PerformanceConfig {
    pub(super) fn read<E: EnvSource + ?Sized>(env: &Reader<'_, E>) -> Result<Self, ConfigError> {
        Ok(Self {
            worker_processes: env.integer(&schema::WORKER_PROCESSES)?,
            thread_pool_size: env.integer(&schema::THREAD_POOL_SIZE)?,
            max_queue_size: env.integer(&schema::MAX_QUEUE_SIZE)?,
        })
    }
}
