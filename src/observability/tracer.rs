//! Tracer provider exporting finished spans to a local file.

use super::file_writer::RotatingWriter;
use super::span_formatter::OtlpJsonEncoder;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;

/// Instrumentation scope name recorded on every exported batch.
pub const SCOPE: &str = "cinelist";

/// Span exporter writing one OTLP JSON document per batch.
#[derive(Debug)]
struct JsonLinesExporter {
    writer: RotatingWriter,
    encoder: OtlpJsonEncoder,
    stopped: bool,
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.stopped {
            Err(TraceError::from("trace exporter stopped"))
        } else {
            let line = self.encoder.encode(&batch).to_string();
            self.writer
                .write_line(&line)
                .map_err(|e| TraceError::from(format!("trace file write failed: {e}")))
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.stopped = true;
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.encoder = OtlpJsonEncoder::new(resource, SCOPE);
    }
}

/// Builds a provider whose spans end up as JSON lines in `file_path`.
///
/// Spans are exported synchronously as they close.
#[must_use]
pub fn file_tracer_provider(file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = JsonLinesExporter {
        writer: RotatingWriter::new(file_path),
        encoder: OtlpJsonEncoder::new(&resource, SCOPE),
        stopped: false,
    };

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
