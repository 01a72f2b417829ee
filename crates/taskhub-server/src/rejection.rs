use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use taskhub_core::{AppError, Violation};
use taskhub_store::StoreError;

/// Handler-side error carrier
///
/// Handlers classify failures into the taxonomy and return them through
/// this wrapper; they never format error bodies themselves. As a response
/// it renders a safe (stackless) envelope and stashes the `AppError` in
/// the response extensions so the terminal error-handler layer can report
/// it and re-render with environment-aware detail.
#[derive(Debug)]
pub struct Rejection(pub AppError);

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let error = self.0;
        let mut response = (error.status(), Json(error.envelope(false))).into_response();
        response.extensions_mut().insert(error);
        response
    }
}

impl From<AppError> for Rejection {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl From<StoreError> for Rejection {
    fn from(error: StoreError) -> Self {
        Self(error.into())
    }
}

impl From<anyhow::Error> for Rejection {
    fn from(error: anyhow::Error) -> Self {
        Self(error.into())
    }
}

/// Map a malformed or undeserializable JSON body to a validation error
pub fn invalid_body(message: &str, rejection: &JsonRejection) -> Rejection {
    Rejection(AppError::validation(
        message,
        Some(vec![Violation::field("body", rejection.body_text())]),
    ))
}
