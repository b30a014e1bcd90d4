//! Subscriber setup.

use super::tracer;
use crate::domain::error::Result;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use std::path::Path;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const SERVICE_NAME: &str = "zcontacts";
pub const TRACE_FILE: &str = "zcontacts-otlp.json";

/// Installs the global subscriber, exporting to `/data/zcontacts-otlp.json`.
///
/// The filter is `config.trace_level`, or `info` when unset. Only the first
/// successful call per thread group takes effect; later calls are no-ops.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created. The plugin
/// keeps running without tracing in that case.
pub fn init_tracing(config: &Config) -> Result<()> {
    init_tracing_in(&crate::infrastructure::get_data_dir(), config.trace_level.as_deref())
}

fn init_tracing_in(data_dir: &Path, level: Option<&str>) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SERVICE_NAME)]);
    let provider = tracer::create_tracer_provider(data_dir.join(TRACE_FILE), resource, SERVICE_NAME);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let filter = EnvFilter::try_new(level.unwrap_or("info")).unwrap_or_else(|e| {
        eprintln!("{SERVICE_NAME}: invalid trace_level, using info: {e}");
        EnvFilter::new("info")
    });

    let _ = tracing_subscriber::registry().with(filter).with(otel_layer).try_init();
    Ok(())
}
