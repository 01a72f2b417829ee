use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use taskhub_core::{AuthUser, RequestContext};

/// Middleware that constructs a `RequestContext` from the incoming request
///
/// Runs after authentication so the context carries the verified user.
/// The context is attached to the response as well, which is how the
/// terminal error layer (which sits outside authentication) gets the
/// enriched view when assembling telemetry context.
pub async fn request_context_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    let user = parts.extensions.get::<AuthUser>().cloned();
    let context = RequestContext {
        parts: parts.clone(),
        user,
    };

    let mut request = Request::from_parts(parts, body);
    request.extensions_mut().insert(context.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(context);
    response
}
