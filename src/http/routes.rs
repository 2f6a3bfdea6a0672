//! Route handlers.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info};

use super::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub(super) struct ServiceInfo {
    service: String,
    environment: String,
    status: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct HealthStatus {
    status: &'static str,
    timestamp: String,
    environment: String,
    version: &'static str,
}

/// Non-sensitive configuration, served only in debug mode.
#[derive(Debug, Serialize)]
pub(super) struct ConfigView {
    app_name: String,
    environment: String,
    debug: bool,
    log_level: String,
    metrics_enabled: bool,
    features: FeatureView,
}

#[derive(Debug, Serialize)]
pub(super) struct FeatureView {
    batch_processing: bool,
    async_logging: bool,
}

/// JSON error body in `{"detail": ...}` form.
pub(super) fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

pub(super) async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    info!("Root endpoint accessed");
    let app = &state.config.app;
    Json(ServiceInfo {
        service: app.name.clone(),
        environment: app.environment.to_string(),
        status: "operational",
    })
}

pub(super) async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    debug!("Health check endpoint accessed");
    Json(HealthStatus {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        environment: state.config.app.environment.to_string(),
        version: VERSION,
    })
}

pub(super) async fn config(State(state): State<AppState>) -> Response {
    let config = &state.config;
    if !config.app.debug {
        return detail(
            StatusCode::FORBIDDEN,
            "Configuration endpoint only available in debug mode",
        );
    }

    info!("Configuration endpoint accessed");
    Json(ConfigView {
        app_name: config.app.name.clone(),
        environment: config.app.environment.to_string(),
        debug: config.app.debug,
        log_level: config.app.log_level.clone(),
        metrics_enabled: config.monitoring.metrics_enabled,
        features: FeatureView {
            batch_processing: config.features.batch_processing,
            async_logging: config.features.async_logging,
        },
    })
    .into_response()
}

pub(super) async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
            .body(Body::from(body))
            .unwrap_or_else(|e| {
                error!(error = %e, "Failed to build metrics response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            detail(StatusCode::INTERNAL_SERVER_ERROR, "failed to render metrics")
        }
    }
}
