#![allow(clippy::must_use_candidate)]

//! Environment-sourced configuration for taskhub
//!
//! All configuration is read from process environment variables by
//! [`Config::from_env`] and validated up front; a malformed value is a
//! startup error, never a runtime surprise.

mod environment;
mod loader;
pub mod logging;
pub mod reporter;
pub mod server;
pub mod store;

pub use environment::Environment;
pub use logging::LogIngestConfig;
pub use reporter::{Dsn, ReporterConfig};
pub use server::ServerConfig;
pub use store::StoreConfig;

/// Top-level taskhub configuration
#[derive(Debug)]
pub struct Config {
    /// Deployment environment; gates debug-detail exposure
    pub environment: Environment,
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Crash reporting; `None` disables reporting entirely
    pub reporter: Option<ReporterConfig>,
    /// Request-log forwarding; `None` disables forwarding entirely
    pub log_ingest: Option<LogIngestConfig>,
    /// Hosted Postgres/auth service
    pub store: StoreConfig,
}
