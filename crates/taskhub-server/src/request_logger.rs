use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use taskhub_config::Environment;
use taskhub_telemetry::{LogSink, RequestLogRecord};

/// State for the request-logging layer
#[derive(Clone)]
pub struct RequestLoggerState {
    pub environment: Environment,
    /// External log sink; `None` disables forwarding entirely
    pub sink: Option<Arc<dyn LogSink>>,
}

/// Outermost middleware: emit one structured record per completed request
///
/// Runs for every request, success or error, any status. Local emission
/// happens in development; forwarding to the configured sink is
/// fire-and-forget and never delays the response.
pub async fn request_logger_middleware(state: RequestLoggerState, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_owned();
    let user_agent = request
        .headers()
        .get(http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let client_ip = client_ip(&request);

    let response = next.run(request).await;

    let record = RequestLogRecord {
        method,
        path,
        status_code: response.status().as_u16(),
        response_time_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        user_agent,
        client_ip,
        timestamp: jiff::Timestamp::now().to_string(),
    };

    if state.environment.is_development() {
        tracing::info!(
            target: "taskhub::request",
            method = %record.method,
            path = %record.path,
            status = record.status_code,
            response_time_ms = record.response_time_ms,
            "request completed"
        );
    }

    if let Some(sink) = &state.sink {
        sink.ship(record);
    }

    response
}

/// Best-effort client address: proxy header first, then the socket peer
fn client_ip(request: &Request) -> Option<String> {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return Some(first.to_owned());
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
}
