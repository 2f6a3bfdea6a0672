//! Logging service: environment-driven configuration, structured logging, and
//! an HTTP surface exposing health, configuration, and Prometheus metrics.

pub mod config;
pub mod database;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod runtime;
