//! Subscriber setup.

use super::tracer::{file_tracer_provider, SCOPE};
use crate::infrastructure::paths::trace_file;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// [`Config::log_level`], otherwise `info`. Events are formatted to stderr.
/// With [`Config::trace_export`] enabled, spans are additionally exported as
/// OTLP JSON to `cinelist-otlp.json` in the data directory.
///
/// Safe to call more than once; only the first call installs anything.
/// Failing to prepare the trace file disables export but keeps logging.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(config.log_level.as_deref().unwrap_or("info"))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let otel_layer = config.trace_export.then(|| {
        let data_dir = config.data_dir();
        std::fs::create_dir_all(&data_dir).ok()?;

        let resource = Resource::new(vec![
            KeyValue::new("service.name", SCOPE),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ]);
        let provider = file_tracer_provider(trace_file(&data_dir), resource);
        Some(OpenTelemetryLayer::new(provider.tracer(SCOPE)))
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer.flatten())
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(trace_export = config.trace_export, "tracing initialized");
    }
}
