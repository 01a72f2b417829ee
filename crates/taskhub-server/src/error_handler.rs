use std::sync::Arc;

use axum::Json;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use taskhub_config::Environment;
use taskhub_core::{AppError, RequestContext};
use taskhub_telemetry::{ErrorReporter, TelemetryContext};

/// State for the terminal error-handling layer
///
/// The reporter is injected at startup; `None` means crash reporting is
/// disabled and no collaborator call is ever attempted.
#[derive(Clone)]
pub struct ErrorPipeline {
    pub environment: Environment,
    pub reporter: Option<Arc<dyn ErrorReporter>>,
}

/// Terminal middleware: report and render any error the inner stack produced
///
/// Applied outside every route so each `Rejection` reaches it. Renders the
/// `{"success": false, "error": ...}` envelope with the error's status;
/// stack traces are included only in development. Reporting happens as a
/// fire-and-forget side channel and can never affect the response.
pub async fn error_handler_middleware(pipeline: ErrorPipeline, request: Request, next: Next) -> Response {
    // Capture reportable request material before the inner stack consumes
    // the request. If authentication runs deeper inside, a richer context
    // (with the user attached) arrives via the response extensions.
    let (parts, body) = request.into_parts();
    let fallback = RequestContext {
        parts: parts.clone(),
        user: None,
    };
    let request = Request::from_parts(parts, body);

    let mut response = next.run(request).await;

    let context = response.extensions_mut().remove::<RequestContext>();
    let Some(error) = response.extensions_mut().remove::<AppError>() else {
        return response;
    };

    if let Some(reporter) = &pipeline.reporter {
        let context = context.as_ref().unwrap_or(&fallback);
        reporter.report(&error, &TelemetryContext::from_request(context));
    }

    let include_stack = pipeline.environment.is_development();
    (error.status(), Json(error.envelope(include_stack))).into_response()
}
