use serde::{Deserialize, Serialize};

/// Identity of the authenticated caller
///
/// Produced by token verification against the hosted auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    /// Stable user id from the auth provider
    pub id: String,
    /// Email the account was registered with
    #[serde(default)]
    pub email: String,
}

/// Runtime context for a single request
///
/// Built by middleware once authentication has run and consumed by the
/// error pipeline when assembling telemetry context. Lives for the
/// duration of one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP request parts (method, URI, headers, extensions)
    pub parts: http::request::Parts,
    /// Authenticated caller, when a valid credential was presented
    pub user: Option<AuthUser>,
}

impl RequestContext {
    /// Access request headers
    pub fn headers(&self) -> &http::HeaderMap {
        &self.parts.headers
    }

    /// Authenticated user id, if any
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}
