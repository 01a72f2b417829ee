//! Telemetry for taskhub
//!
//! Local structured logging via the `tracing` ecosystem, crash reporting to
//! a DSN-addressed monitoring collaborator, and request-log forwarding to a
//! log-ingestion collaborator. All external forwarding is fire-and-forget:
//! delivery failures are logged locally and never reach a request's
//! response path.

pub mod logship;
pub mod reporter;

pub use logship::{IngestSink, LogSink, RequestLogRecord};
pub use reporter::{DsnReporter, ErrorReporter, TelemetryContext};

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the provided default filter.
pub fn init(log_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
