//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;

static DATE_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d[^/]*").unwrap());

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("climate_api_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path.clone();

    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record one climate store query
pub fn record_store_query(operation: &'static str, success: bool, duration: Duration) {
    let labels = [
        ("operation", operation.to_string()),
        ("status", if success { "success" } else { "error" }.to_string()),
    ];

    counter!("store_queries_total", &labels).increment(1);
    histogram!("store_query_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Collapse date segments into `{date}`
fn sanitize_path(path: &str) -> String {
    DATE_SEGMENT
        .replace_all(path, "/{date}")
        .chars()
        .take(50)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_start_date() {
        assert_eq!(sanitize_path("/api/v1.0/2016-05-31"), "/api/v1.0/{date}");
    }

    #[test]
    fn test_sanitize_path_start_end_date() {
        assert_eq!(
            sanitize_path("/api/v1.0/2016-05-31/2016-08-25"),
            "/api/v1.0/{date}/{date}"
        );
    }

    #[test]
    fn test_sanitize_path_keeps_named_routes() {
        assert_eq!(sanitize_path("/api/v1.0/precipitation"), "/api/v1.0/precipitation");
        assert_eq!(sanitize_path("/health"), "/health");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        assert!(sanitize_path(path).len() <= 50);
    }
}
