//! Process-wide tracing setup for the shorturl binaries.
//!
//! [`init`] installs a `tracing` subscriber with an env filter, a text or
//! JSON formatter, a `log` bridge and, when an endpoint is configured, an
//! OTLP span exporter.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};
use typed_builder::TypedBuilder;

pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },
    #[error("failed to install log bridge: {0}")]
    LogBridge(String),
    #[error("failed to build otlp exporter: {0}")]
    Exporter(String),
    #[error("failed to install global subscriber: {0}")]
    Subscriber(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct TelemetryConfig {
    /// Reported as `service.name` on exported spans.
    #[builder(setter(into))]
    pub service_name: String,
    #[builder(default)]
    pub format: LogFormat,
    /// Used when `RUST_LOG` is unset.
    #[builder(default = DEFAULT_FILTER.to_string(), setter(into))]
    pub default_filter: String,
    /// OTLP/gRPC collector endpoint, e.g. `http://localhost:4317`.
    #[builder(default, setter(into))]
    pub otlp_endpoint: Option<String>,
}

/// Keeps the span exporter alive. Dropping it flushes pending spans.
#[must_use = "dropping the guard shuts down span export"]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("failed to shut down tracer provider: {e}");
            }
        }
    }
}

/// Installs the global subscriber. Call once, early in `main`.
pub fn init(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let filter = build_filter(
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        &config.default_filter,
    )?;

    let fmt_layer = match config.format {
        LogFormat::Text => fmt::layer().boxed(),
        LogFormat::Json => fmt::layer().json().with_current_span(true).boxed(),
    };

    let provider = config
        .otlp_endpoint
        .as_deref()
        .map(|endpoint| tracer_provider(endpoint, &config.service_name))
        .transpose()?;
    let otel_layer = provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(config.service_name.clone()))
    });

    let subscriber = Registry::default()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer);

    LogTracer::init().map_err(|e| TelemetryError::LogBridge(e.to_string()))?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| TelemetryError::Subscriber(e.to_string()))?;

    Ok(TelemetryGuard { provider })
}

/// Builds the level filter from `RUST_LOG` if set, else `default_directive`.
fn build_filter(
    env: Option<String>,
    default_directive: &str,
) -> Result<EnvFilter, TelemetryError> {
    let directive = env
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_directive.to_string());

    EnvFilter::try_new(&directive).map_err(|e| TelemetryError::InvalidFilter {
        reason: e.to_string(),
        directive,
    })
}

fn tracer_provider(
    endpoint: &str,
    service_name: &str,
) -> Result<SdkTracerProvider, TelemetryError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}
