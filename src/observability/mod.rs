//! Logging and trace export.
//!
//! Everything in the crate logs through `tracing`. [`init_tracing`] wires the
//! subscriber:
//!
//! ```text
//! tracing macros ─┬─▶ EnvFilter ─▶ fmt layer ─▶ stderr
//!                 └─▶ OpenTelemetryLayer ─▶ TracerProvider ─▶ JsonLinesExporter
//!                                                              └─▶ rotating OTLP JSON file
//! ```
//!
//! The OpenTelemetry branch is only installed when trace export is enabled in
//! [`Config`](crate::Config).

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::init_tracing;
