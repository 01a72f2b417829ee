use std::backtrace::Backtrace;

use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Message used whenever an error reaches the client without one of its own
const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// Closed set of failure classes the API can surface
///
/// Every error sent to a client is one of these. Status code and
/// machine-readable code are fixed per kind, except `Generic` where the
/// constructing code may supply its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client input failed validation (400)
    Validation,
    /// Referenced resource does not exist (404)
    NotFound,
    /// Missing or invalid credential (401)
    Unauthorized,
    /// Authenticated but not allowed (403)
    Forbidden,
    /// Anything else, including unexpected internal failures (500 default)
    Generic,
}

impl ErrorKind {
    /// Machine-readable code for this kind; `Generic` has none by default
    pub const fn code(self) -> Option<&'static str> {
        match self {
            Self::Validation => Some("VALIDATION_ERROR"),
            Self::NotFound => Some("NOT_FOUND"),
            Self::Unauthorized => Some("UNAUTHORIZED"),
            Self::Forbidden => Some("FORBIDDEN"),
            Self::Generic => None,
        }
    }

    const fn status(self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Generic => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn default_message(self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::Validation | Self::NotFound | Self::Generic => FALLBACK_MESSAGE,
        }
    }
}

/// A single field-level validation failure
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    /// Path to the offending field (e.g. `["due_date"]`)
    pub path: Vec<String>,
    /// What was wrong with it
    pub message: String,
}

impl Violation {
    /// Violation for a single top-level field
    pub fn field(name: &str, message: impl Into<String>) -> Self {
        Self {
            path: vec![name.to_owned()],
            message: message.into(),
        }
    }
}

/// Canonical internal representation of a request failure
///
/// Construction never fails and always captures a backtrace; the backtrace
/// is only ever rendered into a response in development (see
/// [`AppError::body`]).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    status: StatusCode,
    code: Option<String>,
    details: Option<Value>,
    stack: String,
}

impl AppError {
    fn new(kind: ErrorKind, message: String, status: StatusCode, code: Option<String>, details: Option<Value>) -> Self {
        let message = if message.trim().is_empty() {
            kind.default_message().to_owned()
        } else {
            message
        };

        Self {
            kind,
            message,
            status,
            code,
            details,
            stack: Backtrace::force_capture().to_string(),
        }
    }

    /// 400 — client input failed validation
    ///
    /// When violations are provided they are attached under
    /// `details.violations`.
    pub fn validation(message: impl Into<String>, violations: Option<Vec<Violation>>) -> Self {
        let kind = ErrorKind::Validation;
        let details = violations.map(|v| serde_json::json!({ "violations": v }));
        Self::new(kind, message.into(), kind.status(), kind.code().map(str::to_owned), details)
    }

    /// 404 — the named resource does not exist
    pub fn not_found(resource: &str) -> Self {
        let kind = ErrorKind::NotFound;
        Self::new(
            kind,
            format!("{resource} not found"),
            kind.status(),
            kind.code().map(str::to_owned),
            None,
        )
    }

    /// 401 — missing or invalid credential
    ///
    /// An empty message falls back to `"Unauthorized"`.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        let kind = ErrorKind::Unauthorized;
        Self::new(kind, message.into(), kind.status(), kind.code().map(str::to_owned), None)
    }

    /// 403 — authenticated but not allowed
    ///
    /// An empty message falls back to `"Forbidden"`.
    pub fn forbidden(message: impl Into<String>) -> Self {
        let kind = ErrorKind::Forbidden;
        Self::new(kind, message.into(), kind.status(), kind.code().map(str::to_owned), None)
    }

    /// Ad-hoc error with a caller-supplied status
    ///
    /// Statuses outside the 4xx/5xx range are coerced to 500 so every
    /// surfaced error stays an error status.
    pub fn generic(message: impl Into<String>, status: StatusCode) -> Self {
        let status = if status.is_client_error() || status.is_server_error() {
            status
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(ErrorKind::Generic, message.into(), status, None, None)
    }

    /// Internal failure (500) with no machine-readable code
    pub fn internal(message: impl Into<String>) -> Self {
        Self::generic(message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Attach a machine-readable code
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach structured details
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Normalize an arbitrary failure into the taxonomy
    ///
    /// Anything that is not already an `AppError` becomes `Generic`/500
    /// carrying the source's message, or the fixed fallback when the source
    /// has none. Total; never panics.
    pub fn from_unhandled(err: &dyn std::fmt::Display) -> Self {
        Self::internal(err.to_string())
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable message; never empty
    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Render the wire body
    ///
    /// `stack` is included only when explicitly asked for; `code` and
    /// `details` only when present on the error.
    pub fn body(&self, include_stack: bool) -> ErrorBody {
        ErrorBody {
            message: self.message.clone(),
            code: self.code.clone(),
            stack: include_stack.then(|| self.stack.clone()),
            details: self.details.clone(),
        }
    }

    /// Render the full `{"success": false, "error": ...}` envelope
    pub fn envelope(&self, include_stack: bool) -> ErrorResponse {
        ErrorResponse {
            success: false,
            error: self.body(include_stack),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::from_unhandled(&err)
    }
}

/// The `error` object inside the client-visible envelope
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Client-visible error envelope; `success` is always `false`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}
