//! Tokio runtime sizing.

use tokio::runtime::{Builder, Runtime};
use tracing::warn;

use crate::config::PerformanceConfig;

/// Build the multi-threaded runtime sized from the performance section.
///
/// Non-positive values keep tokio's own defaults.
pub fn build(config: &PerformanceConfig) -> std::io::Result<Runtime> {
    let mut builder = Builder::new_multi_thread();
    builder.enable_all();

    if let Some(workers) = thread_count("WORKER_PROCESSES", config.worker_processes) {
        builder.worker_threads(workers);
    }
    if let Some(blocking) = thread_count("THREAD_POOL_SIZE", config.thread_pool_size) {
        builder.max_blocking_threads(blocking);
    }

    builder.build()
}

fn thread_count(name: &'static str, value: i64) -> Option<usize> {
    match usize::try_from(value) {
        Ok(n) if n > 0 => Some(n),
        _ => {
            warn!(setting = name, value, "Ignoring non-positive thread count");
            None
        }
    }
}
