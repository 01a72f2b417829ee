//! HTTP server: routes, middleware pipeline, and lifecycle
//!
//! The layer order matters. From the outside in: request logging wraps
//! everything so every response is measured; the terminal error handler
//! sits just inside it so errored responses are shaped (and reported)
//! before they are logged; CORS and tracing follow; authentication and
//! request-context capture are route layers on the task router only.

mod auth;
mod auth_routes;
mod error_handler;
mod health;
mod rejection;
mod request_context;
mod request_logger;
mod tasks;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use taskhub_config::Config;
use taskhub_store::Store;
use taskhub_telemetry::{DsnReporter, ErrorReporter, IngestSink, LogSink};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error_handler::{ErrorPipeline, error_handler_middleware};
use crate::request_logger::{RequestLoggerState, request_logger_middleware};

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the store client cannot be constructed
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let store = Store::new(&config.store)?;

        let reporter: Option<Arc<dyn ErrorReporter>> = config
            .reporter
            .map(|reporter_config| Arc::new(DsnReporter::new(reporter_config)) as Arc<dyn ErrorReporter>);
        let sink: Option<Arc<dyn LogSink>> = config
            .log_ingest
            .map(|ingest_config| Arc::new(IngestSink::new(ingest_config)) as Arc<dyn LogSink>);

        let mut app = Router::new();

        // Health check
        app = app.merge(
            Router::new()
                .route("/health", axum::routing::get(health::health_handler))
                .with_state(config.environment),
        );

        // Session routes
        app = app.merge(auth_routes::auth_router(store.clone()));

        // Task routes (carry their own auth and context layers)
        app = app.merge(tasks::tasks_router(store));

        // Apply global middleware layers (innermost first)

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS (the API is consumed by a browser SPA on another origin)
        app = app.layer(CorsLayer::permissive());

        // Terminal error handling: shapes and reports every error
        let pipeline = ErrorPipeline {
            environment: config.environment,
            reporter,
        };
        app = app.layer(axum::middleware::from_fn(move |req, next| {
            let pipeline = pipeline.clone();
            async move { error_handler_middleware(pipeline, req, next).await }
        }));

        // Request logging (outermost, sees the final status of every request)
        let logger = RequestLoggerState {
            environment: config.environment,
            sink,
        };
        app = app.layer(axum::middleware::from_fn(move |req, next| {
            let logger = logger.clone();
            async move { request_logger_middleware(logger, req, next).await }
        }));

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
