//! Observability configuration

use serde::Deserialize;

/// Main observability configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub tracing: TracingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Distributed tracing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TracingConfig {
    /// Enable OpenTelemetry tracing export
    #[serde(default)]
    pub enabled: bool,
    /// OTLP endpoint (e.g., http://localhost:4317)
    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,
    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Sampling ratio (0.0 to 1.0)
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

/// Prometheus metrics configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Metrics endpoint path
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

fn default_otlp_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "climate-api".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: default_otlp_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_metrics_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;

    fn load(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_missing_observability_section_uses_defaults() {
        let config = load("[server]\nport = 5000\n");

        assert!(!config.observability.tracing.enabled);
        assert_eq!(config.observability.tracing.service_name, "climate-api");
        assert_eq!(config.observability.tracing.otlp_endpoint, "http://localhost:4317");
        assert!(config.observability.metrics.enabled);
        assert_eq!(config.observability.metrics.path, "/metrics");
    }

    #[test]
    fn test_partial_tracing_section_keeps_service_name() {
        let config = load("[observability.tracing]\nenabled = true\nsampling_ratio = 0.25\n");

        assert!(config.observability.tracing.enabled);
        assert_eq!(config.observability.tracing.sampling_ratio, 0.25);
        assert_eq!(config.observability.tracing.service_name, "climate-api");
    }

    #[test]
    fn test_shipped_default_file_matches_builtin_defaults() {
        let config = load(include_str!("../../../config/default.toml"));

        assert_eq!(config.observability.tracing.service_name, "climate-api");
        assert_eq!(config.observability.metrics.path, "/metrics");
        assert_eq!(config.database.max_connections, 5);
    }
}
