//! Logging and optional OpenTelemetry export

use crate::config::LogFormat;
use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the trace exporter alive; flushes on drop
pub struct TelemetryGuard {
    #[cfg(feature = "telemetry")]
    provider: Option<opentelemetry_sdk::trace::TracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        #[cfg(feature = "telemetry")]
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("Failed to flush traces: {}", e);
            }
        }
    }
}

/// Install the global subscriber.
///
/// # Environment Variables
///
/// - `RUST_LOG`: filter (default `waitlist=info`)
/// - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint, e.g. http://localhost:4317
/// - `OTEL_SERVICE_NAME`: service name (default: waitlistd)
pub fn init(format: LogFormat) -> Result<TelemetryGuard> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("waitlist=info"))?;

    #[cfg_attr(not(feature = "telemetry"), allow(unused_mut))]
    let mut layers: Vec<BoxedLayer> = vec![match format {
        LogFormat::Json => fmt::layer().json().boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
    }];

    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();

    #[cfg(feature = "telemetry")]
    let provider = match &endpoint {
        Some(endpoint) => {
            let (layer, provider) = otel_layer(endpoint)?;
            layers.push(layer);
            Some(provider)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    #[cfg(not(feature = "telemetry"))]
    if endpoint.is_some() {
        tracing::warn!("OpenTelemetry endpoint set but feature 'telemetry' not enabled");
        tracing::warn!("Rebuild with: cargo build --features telemetry");
    }

    Ok(TelemetryGuard {
        #[cfg(feature = "telemetry")]
        provider,
    })
}

#[cfg(feature = "telemetry")]
fn otel_layer(endpoint: &str) -> Result<(BoxedLayer, opentelemetry_sdk::trace::TracerProvider)> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::{SpanExporter, WithExportConfig};
    use opentelemetry_sdk::{runtime, trace::TracerProvider, Resource};

    let service_name = std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "waitlistd".to_string());

    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            service_name.clone(),
        )]))
        .build();

    let tracer = provider.tracer(service_name);
    let layer = tracing_opentelemetry::layer().with_tracer(tracer).boxed();

    Ok((layer, provider))
}
