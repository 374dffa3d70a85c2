//! Tracing subscriber setup.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the OTLP trace file inside the data directory.
pub const TRACE_FILE_NAME: &str = "tweetline-otlp.json";

/// Installs the global tracing subscriber.
///
/// The pipeline is:
///
/// 1. an [`EnvFilter`] from `RUST_LOG`, falling back to `config.trace_level`, then
///    `"info"`
/// 2. a human-readable layer on stderr when `config.log_to_stderr` is set
/// 3. an OpenTelemetry layer exporting spans to `<data_dir>/tweetline-otlp.json`
///
/// If the data directory cannot be created the file export is skipped and the rest
/// of the pipeline is still installed. Calling this more than once is harmless; only
/// the first call takes effect.
///
/// # Example
///
/// ```rust
/// use tweetline::observability::init_tracing;
/// use tweetline::Config;
///
/// let dir = tempfile::tempdir()?;
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     data_dir: Some(dir.path().to_path_buf()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let data_dir = config.resolved_data_dir();
    let otel_layer = match std::fs::create_dir_all(&data_dir) {
        Ok(()) => {
            let resource = Resource::new(vec![
                opentelemetry::KeyValue::new("service.name", "tweetline"),
                opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            ]);
            let provider =
                tracer::create_tracer_provider(data_dir.join(TRACE_FILE_NAME), resource);
            Some(OpenTelemetryLayer::new(provider.tracer(tracer::SCOPE_NAME)))
        }
        Err(e) => {
            eprintln!(
                "tweetline: trace export disabled, cannot create {}: {e}",
                data_dir.display()
            );
            None
        }
    };

    let stderr_layer = config
        .log_to_stderr
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(otel_layer);

    if subscriber.try_init().is_ok() {
        tracing::debug!(data_dir = %data_dir.display(), level, "tracing initialized");
    }
}
