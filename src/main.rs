use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use logging_service::config::Config;
use logging_service::database::Database;
use logging_service::http;
use logging_service::logging;
use logging_service::metrics::Metrics;
use logging_service::runtime;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Database(#[from] logging_service::database::DatabaseError),

    #[error(transparent)]
    Server(#[from] http::ServerError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match logging::init(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match runtime::build(&config.performance) {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to build runtime");
            return ExitCode::FAILURE;
        }
    };

    let init_db = env::args().skip(1).any(|arg| arg == "--init-db");

    match runtime.block_on(run(config, init_db)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Service stopped with error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config, init_db: bool) -> Result<(), StartupError> {
    let database = Database::connect_lazy(&config)?;

    if init_db {
        database.init().await?;
        database.close().await;
        return Ok(());
    }

    let metrics = Metrics::new()?;
    metrics.set_app_info(&config.app.name, config.app.environment.as_str());

    info!(
        url = %config.redis.redacted_url(),
        "Cache configured"
    );
    info!(
        url = %config.dependencies.service_url,
        timeout_secs = config.dependencies.timeout_secs,
        "Dependent service configured"
    );
    info!(
        enabled = config.rate_limit.enabled,
        rule = %config.rate_limit.default_rule,
        "Rate limiting"
    );
    if config.backup.enabled {
        info!(
            bucket = %config.backup.s3_bucket,
            retention_days = config.backup.retention_days,
            "Backups enabled"
        );
    }

    let result = http::serve(Arc::new(config), metrics).await;
    database.close().await;
    result.map_err(StartupError::from)
}
