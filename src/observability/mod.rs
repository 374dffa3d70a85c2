//! OpenTelemetry tracing with file-based export.
//!
//! Spans from `tracing` are bridged into OpenTelemetry and written as OTLP JSON,
//! one batch per line, to a size-rotated file in the data directory:
//!
//! ```text
//! tracing → tracing-opentelemetry → SDK tracer provider → FileSpanExporter → tweetline-otlp.json
//! ```
//!
//! The file rotates at 10 MB and keeps three backups. Gateway spans are parented to
//! the span that submitted the intent through the intent's trace context, so one
//! user action shows up as one trace across tasks.
//!
//! # Configuration
//!
//! The filter is resolved from:
//! 1. `RUST_LOG` (highest priority)
//! 2. `trace_level` in the config file
//! 3. `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - `tracer`: Tracer provider and the file span exporter
//! - `span_formatter`: OTLP JSON encoding
//! - `file_writer`: Size-rotated line writer

mod file_writer;
pub mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, TRACE_FILE_NAME};
