use std::path::Path;
use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{MetricExporter, SpanExporter};
use opentelemetry_sdk::{Resource, metrics::SdkMeterProvider, trace::SdkTracerProvider};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_opentelemetry::MetricsLayer;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::Layer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

const SERVICE_NAME: &str = "siteprofile";

/// OTLP export is enabled only when an endpoint is configured
const OTLP_ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

fn get_resource() -> Resource {
    static RESOURCE: OnceLock<Resource> = OnceLock::new();
    RESOURCE
        .get_or_init(|| Resource::builder().with_service_name(SERVICE_NAME).build())
        .clone()
}

fn init_traces() -> anyhow::Result<SdkTracerProvider> {
    let exporter = SpanExporter::builder().with_http().build()?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(get_resource())
        .build())
}

fn init_metrics() -> anyhow::Result<SdkMeterProvider> {
    let exporter = MetricExporter::builder().with_http().build()?;

    Ok(SdkMeterProvider::builder()
        .with_periodic_exporter(exporter)
        .with_resource(get_resource())
        .build())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing-subscriber.
///
/// Logs go to stderr and, when `log_file` is given, to that file as well.
/// Returns a guard flushing OpenTelemetry on drop when OTLP export is enabled.
pub fn init_tracing_subscriber(log_file: Option<&Path>) -> anyhow::Result<Option<OtelGuard>> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter());

    let file_layer = match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            std::fs::create_dir_all(directory)?;
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Invalid log file path: {}", path.display()))?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(file_name.to_string_lossy())
                .build(directory)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_filter(env_filter()),
            )
        }
        None => None,
    };

    let providers = if std::env::var_os(OTLP_ENDPOINT_VAR).is_some() {
        Some((init_traces()?, init_metrics()?))
    } else {
        None
    };
    let (metrics_layer, trace_layer) = match &providers {
        Some((tracer_provider, meter_provider)) => (
            Some(MetricsLayer::new(meter_provider.clone())),
            Some(OpenTelemetryLayer::new(tracer_provider.tracer(SERVICE_NAME))),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(metrics_layer)
        .with(trace_layer)
        .init();

    Ok(providers.map(|(tracer_provider, meter_provider)| OtelGuard {
        tracer_provider,
        meter_provider,
    }))
}

pub struct OtelGuard {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
}

impl Drop for OtelGuard {
    fn drop(&mut self) {
        if let Err(err) = self.tracer_provider.shutdown() {
            eprintln!("{err:?}");
        }
        if let Err(err) = self.meter_provider.shutdown() {
            eprintln!("{err:?}");
        }
    }
}
