//! Prometheus metrics registry.
//!
//! The registry is owned by the service rather than the process-global default
//! so that tests can build isolated instances.

use std::sync::Arc;

use prometheus::{Encoder, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};

/// Prometheus-backed metrics shared across handlers.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    app_info: IntGaugeVec,
}

impl Metrics {
    /// Build a registry with the service collectors registered.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests by path and status"),
            &["path", "status"],
        )?;
        let app_info = IntGaugeVec::new(
            Opts::new("app_info", "Static service information"),
            &["name", "environment", "version"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(app_info.clone()))?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                app_info,
            }),
        })
    }

    /// Publish the service identity as a constant gauge.
    pub fn set_app_info(&self, name: &str, environment: &str) {
        self.inner
            .app_info
            .with_label_values(&[name, environment, env!("CARGO_PKG_VERSION")])
            .set(1);
    }

    pub fn record_request(&self, path: &str, status: u16) {
        let status = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[path, status.as_str()])
            .inc();
    }

    /// Current request count for `path` and `status`.
    ///
    /// Reads the gathered samples so a lookup never creates a series.
    pub fn requests_total(&self, path: &str, status: u16) -> u64 {
        let status = status.to_string();
        self.inner
            .registry
            .gather()
            .iter()
            .filter(|family| family.name() == "http_requests_total")
            .flat_map(|family| family.get_metric())
            .find(|metric| {
                let label = |name: &str| {
                    metric
                        .get_label()
                        .iter()
                        .find(|pair| pair.name() == name)
                        .map(|pair| pair.value())
                };
                label("path") == Some(path) && label("status") == Some(status.as_str())
            })
            .map(|metric| metric.get_counter().value() as u64)
            .unwrap_or(0)
    }

    /// Render every collector in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
