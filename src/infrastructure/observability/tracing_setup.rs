//! OpenTelemetry distributed tracing setup

use opentelemetry::{trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use super::config::TracingConfig;
use crate::config::{LogFormat, LoggingConfig};

/// Initialize tracing with optional OpenTelemetry export
pub fn init_tracing(logging_config: &LoggingConfig, tracing_config: &TracingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging_config.level));

    let (provider, otel_error) = if tracing_config.enabled {
        match init_otel_tracing(tracing_config) {
            Ok(provider) => (Some(provider), None),
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };

    let telemetry_layer = provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(tracing_config.service_name.clone()))
    });

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(telemetry_layer);

    match logging_config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init(),
    }

    match (provider, otel_error) {
        (Some(provider), _) => {
            opentelemetry::global::set_tracer_provider(provider);
            tracing::info!(
                "Tracing initialized with OpenTelemetry export to {}",
                tracing_config.otlp_endpoint
            );
        }
        (None, Some(e)) => {
            tracing::warn!("Failed to initialize OpenTelemetry: {}. Tracing disabled.", e);
        }
        (None, None) => tracing::info!("Tracing initialized (OpenTelemetry disabled)"),
    }
}

fn init_otel_tracing(
    config: &TracingConfig,
) -> Result<TracerProvider, opentelemetry::trace::TraceError> {
    let resource = Resource::new(vec![KeyValue::new(
        "service.name",
        config.service_name.clone(),
    )]);

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.otlp_endpoint)
        .build()?;

    let provider = TracerProvider::builder()
        .with_sampler(sampler_for(config.sampling_ratio))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .with_batch_exporter(exporter, runtime::Tokio)
        .build();

    Ok(provider)
}

fn sampler_for(ratio: f64) -> Sampler {
    if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}

/// Shutdown tracing and flush pending spans
pub fn shutdown_tracing() {
    opentelemetry::global::shutdown_tracer_provider();
    tracing::info!("Tracing shutdown complete");
}
