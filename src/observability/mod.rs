//! OpenTelemetry tracing with file-based export.
//!
//! ```text
//! tracing spans → tracing-opentelemetry → OtlpFileExporter → /data/zcontacts-otlp.json
//! ```
//!
//! Zellij plugins have no network access, so spans are written as OTLP JSON
//! lines to the plugin data directory instead of a collector. The file rotates
//! at 10 MB and keeps three backups. Worker spans join the plugin's traces
//! through the `TraceContext` carried by every worker message.
//!
//! The level comes from the `trace_level` plugin option (an `EnvFilter`
//! directive such as `debug` or `zcontacts::app=trace`) and defaults to `info`.

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, SERVICE_NAME, TRACE_FILE};
