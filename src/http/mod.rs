//! HTTP service.
//!
//! Exposes service information, health, a debug-only configuration view and
//! Prometheus metrics. CORS origins, rate limiting and the metrics listener are
//! all driven by the shared [`Config`].

mod rate_limit;
mod routes;

pub use rate_limit::{RateLimitRule, RateLimiter};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{MatchedPath, Request, State},
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::metrics::Metrics;

/// HTTP server error.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{name} out of range: {port}")]
    InvalidPort { name: &'static str, port: i64 },
    #[error("invalid RATE_LIMIT_DEFAULT: {0}")]
    RateLimit(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub metrics: Metrics,
    pub limiter: Option<Arc<RateLimiter>>,
}

impl AppState {
    /// Build handler state; fails when rate limiting is on and its rule is invalid.
    pub fn new(config: Arc<Config>, metrics: Metrics) -> Result<Self, ServerError> {
        let limiter = if config.rate_limit.enabled {
            let rule = RateLimitRule::parse(&config.rate_limit.default_rule)
                .map_err(ServerError::RateLimit)?;
            Some(Arc::new(RateLimiter::new(rule)))
        } else {
            None
        };

        Ok(Self {
            config,
            metrics,
            limiter,
        })
    }
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/config", get(routes::config));

    if state.config.monitoring.metrics_enabled {
        router = router.route("/metrics", get(routes::metrics));
    }

    let cors = cors_layer(&state.config.security.cors_origins);

    router
        .route_layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::enforce,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Router for the dedicated metrics listener.
pub fn metrics_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(routes::metrics))
        .with_state(state)
}

/// CORS with credentials. A "*" entry mirrors the request origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Skipping invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Count every routed response by matched path and status.
async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let response = next.run(request).await;
    state
        .metrics
        .record_request(&path, response.status().as_u16());
    response
}

fn port(name: &'static str, port: i64) -> Result<u16, ServerError> {
    u16::try_from(port).map_err(|_| ServerError::InvalidPort { name, port })
}

/// Serve until Ctrl-C or SIGTERM.
///
/// When metrics are enabled on a port other than the main one, a second
/// listener serving only `/metrics` runs alongside.
pub async fn serve(config: Arc<Config>, metrics: Metrics) -> Result<(), ServerError> {
    let state = AppState::new(Arc::clone(&config), metrics)?;
    let host = config.server.host.as_str();
    let server_port = port("PORT", config.server.port)?;

    let metrics_task = if config.monitoring.metrics_enabled
        && config.monitoring.metrics_port != config.server.port
    {
        let metrics_port = port("METRICS_PORT", config.monitoring.metrics_port)?;
        let listener = TcpListener::bind((host, metrics_port)).await?;
        info!(address = %listener.local_addr()?, "Metrics listener starting");

        let app = metrics_router(state.clone());
        Some(tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!(error = %e, "Metrics listener failed");
            }
        }))
    } else {
        None
    };

    let listener = TcpListener::bind((host, server_port)).await?;
    info!(
        address = %listener.local_addr()?,
        app_name = %config.app.name,
        environment = %config.app.environment,
        "Application starting"
    );

    let app = router(state).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = metrics_task {
        task.abort();
    }

    info!(
        app_name = %config.app.name,
        environment = %config.app.environment,
        "Application shutting down"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
