use http::StatusCode;
use serde::{Deserialize, Serialize};
use taskhub_core::AuthUser;

use crate::client::upstream;
use crate::{Store, StoreError};

/// An authenticated session issued by the auth provider
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user: AuthUser,
    /// Bearer token for subsequent API calls
    pub token: String,
}

/// Wire shape of the provider's session responses
#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: Option<String>,
    user: AuthUser,
}

impl From<SessionResponse> for Session {
    fn from(wire: SessionResponse) -> Self {
        Self {
            user: wire.user,
            token: wire.access_token.unwrap_or_default(),
        }
    }
}

impl Store {
    /// Register a new account
    ///
    /// # Errors
    ///
    /// `Upstream` when the provider rejects the registration (e.g. the
    /// email is already taken); `Transport` on connection failure
    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<Session, StoreError> {
        let url = self.endpoint("/auth/v1/signup")?;
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "data": { "name": name },
        });

        let response = self.request(reqwest::Method::POST, url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(upstream(response).await);
        }

        let wire: SessionResponse = response.json().await?;
        Ok(wire.into())
    }

    /// Exchange an email/password pair for a session
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` when the pair is rejected; `Upstream` or
    /// `Transport` otherwise
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, StoreError> {
        let mut url = self.endpoint("/auth/v1/token")?;
        url.set_query(Some("grant_type=password"));
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self.request(reqwest::Method::POST, url).json(&body).send().await?;
        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(StoreError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(upstream(response).await);
        }

        let wire: SessionResponse = response.json().await?;
        Ok(wire.into())
    }

    /// Revoke the session behind an access token
    ///
    /// # Errors
    ///
    /// `InvalidToken` when the token is already invalid; `Upstream` or
    /// `Transport` otherwise
    pub async fn sign_out(&self, token: &str) -> Result<(), StoreError> {
        let url = self.endpoint("/auth/v1/logout")?;

        let response = self
            .request(reqwest::Method::POST, url)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::InvalidToken);
        }
        if !status.is_success() {
            return Err(upstream(response).await);
        }

        Ok(())
    }
}
