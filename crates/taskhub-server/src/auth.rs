use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use taskhub_core::AppError;
use taskhub_store::Store;

use crate::rejection::Rejection;

/// Authenticate requests via bearer token
///
/// Verifies the token against the hosted auth provider and attaches the
/// resulting `AuthUser` to the request. Any verification failure is
/// surfaced as a 401 through the error pipeline; the upstream detail is
/// kept in the local log only.
pub async fn auth_middleware(store: Store, request: Request, next: Next) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return Rejection(AppError::unauthorized("No token provided")).into_response();
    };
    let token = token.to_owned();

    match store.verify_token(&token).await {
        Ok(user) => {
            let mut request = request;
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(error = %e, "token verification failed");
            Rejection(AppError::unauthorized("Invalid token")).into_response()
        }
    }
}

/// Extract the bearer token from the Authorization header
pub fn bearer_token(headers: &http::HeaderMap) -> Option<&str> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}
